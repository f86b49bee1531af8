use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, error, info, warn};

use super::clock::SourceClock;
use super::sink::{create_sink_at, probe_duration};
use super::types::{Generation, OutputCmd, OutputEvent, OutputEventKind};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// State owned by the audio thread for the currently loaded source.
struct Loaded {
    source: String,
    sink: Option<Sink>,
    clock: SourceClock,
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<OutputCmd>,
    events: Sender<OutputEvent>,
    initial_volume: f32,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => s,
            Err(e) => {
                error!(error = %e, "no audio output device; playback is silent");
                drain_without_device(rx);
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        let mut volume = initial_volume;
        let mut loaded: Option<Loaded> = None;

        let emit = |ev: OutputEvent| {
            // The receiver only goes away during shutdown.
            let _ = events.send(ev);
        };

        loop {
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(cmd) => match cmd {
                    OutputCmd::Load { source, generation } => {
                        if let Some(sink) = loaded.as_ref().and_then(|l| l.sink.as_ref()) {
                            sink.stop();
                        }
                        loaded = Some(load_source(&stream, source, generation, volume, &emit));
                    }
                    OutputCmd::Play => {
                        if let Some(l) = loaded.as_mut() {
                            if let Some(ref s) = l.sink {
                                s.play();
                            }
                            l.clock.playing = true;
                        }
                    }
                    OutputCmd::Pause => {
                        if let Some(l) = loaded.as_mut() {
                            if let Some(ref s) = l.sink {
                                s.pause();
                            }
                            l.clock.playing = false;
                        }
                    }
                    OutputCmd::Seek(secs) => {
                        if let Some(l) = loaded.as_mut() {
                            seek_loaded(&stream, l, secs, volume);
                            emit(OutputEvent::new(
                                l.clock.generation,
                                OutputEventKind::PositionChanged(secs),
                            ));
                        }
                    }
                    OutputCmd::SetVolume(v) => {
                        volume = v;
                        if let Some(s) = loaded.as_ref().and_then(|l| l.sink.as_ref()) {
                            s.set_volume(v);
                        }
                    }
                    OutputCmd::Quit { fade_out_ms } => {
                        if let Some(s) = loaded.as_ref().and_then(|l| l.sink.as_ref()) {
                            // Fade out gently before stopping.
                            fade_out_sink(s, volume, fade_out_ms);
                            s.stop();
                        }
                        info!("audio thread stopped");
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    // periodic position publish + end-of-media detection
                    if let Some(l) = loaded.as_mut() {
                        let (drained, pos) = match l.sink.as_ref() {
                            Some(s) => (s.empty(), s.get_pos()),
                            None => continue,
                        };
                        if let Some(ev) = l.clock.tick(drained, pos) {
                            emit(ev);
                        }
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

fn load_source(
    stream: &OutputStream,
    source: String,
    generation: Generation,
    volume: f32,
    emit: &impl Fn(OutputEvent),
) -> Loaded {
    debug!(%generation, source = %source, "loading source");

    let sink = match create_sink_at(stream, &source, Duration::ZERO, volume) {
        Ok((sink, total)) => {
            match total.or_else(|| probe_duration(&source)) {
                Some(d) => emit(OutputEvent::new(
                    generation,
                    OutputEventKind::DurationKnown(d.as_secs_f64()),
                )),
                None => debug!(%generation, "duration unknown for source"),
            }
            Some(sink)
        }
        Err(e) => {
            // Unplayable source: duration simply stays unknown.
            warn!(%generation, error = %e, "could not load source");
            None
        }
    };

    Loaded {
        source,
        sink,
        clock: SourceClock::loaded(generation),
    }
}

fn seek_loaded(stream: &OutputStream, l: &mut Loaded, secs: f64, volume: f32) {
    let target = Duration::from_secs_f64(secs.max(0.0));

    if let Some(s) = l.sink.as_ref() {
        if !s.empty() {
            match s.try_seek(target) {
                Ok(()) => {
                    l.clock.seeked(Duration::ZERO);
                    return;
                }
                Err(e) => debug!(error = %e, "try_seek failed; rebuilding sink"),
            }
        }
        s.stop();
    }

    // Rebuild the sink and skip into the file. This also replays a drained source.
    match create_sink_at(stream, &l.source, target, volume) {
        Ok((sink, _)) => {
            if l.clock.playing {
                sink.play();
            }
            l.sink = Some(sink);
            l.clock.seeked(target);
        }
        Err(e) => {
            warn!(error = %e, "could not rebuild sink for seek");
            l.sink = None;
        }
    }
}

fn fade_out_sink(sink: &Sink, from_volume: f32, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(from_volume * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}

/// Keep the command channel alive without a device so callers never block or error.
fn drain_without_device(rx: Receiver<OutputCmd>) {
    while let Ok(cmd) = rx.recv() {
        if let OutputCmd::Quit { .. } = cmd {
            break;
        }
    }
}
