//! Utilities for creating `rodio` sinks from media source references.
//!
//! The helper here encapsulates opening/decoding a file and preparing a
//! paused `Sink` at the requested start position.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use lofty::file::AudioFile;
use rodio::{Decoder, OutputStream, Sink, Source};
use thiserror::Error;

#[derive(Error, Debug)]
pub(super) enum SinkError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: String,
        source: rodio::decoder::DecoderError,
    },
}

/// Create a paused `Sink` for `source` that starts playback at `start_at`.
///
/// Also returns the total duration when the decoder can tell.
pub(super) fn create_sink_at(
    handle: &OutputStream,
    source: &str,
    start_at: Duration,
    volume: f32,
) -> Result<(Sink, Option<Duration>), SinkError> {
    let file = File::open(source).map_err(|e| SinkError::Open {
        path: source.to_string(),
        source: e,
    })?;

    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| SinkError::Decode {
        path: source.to_string(),
        source: e,
    })?;
    let total = decoder.total_duration();

    let sink = Sink::connect_new(handle.mixer());
    sink.set_volume(volume);
    // `skip_duration` is the fallback seeking primitive; Duration::ZERO is fine.
    sink.append(decoder.skip_duration(start_at));
    sink.pause();
    Ok((sink, total))
}

/// Read the duration from container metadata when the decoder cannot tell.
pub(super) fn probe_duration(source: &str) -> Option<Duration> {
    lofty::read_from_path(Path::new(source))
        .ok()
        .map(|tagged| tagged.properties().duration())
        .filter(|d| !d.is_zero())
}
