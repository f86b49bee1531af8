//! MPRIS (D-Bus) control surface.
//!
//! Desktop media keys and tools like `playerctl` reach the player through
//! here. Incoming method calls become [`ControlCmd`]s on a channel that the
//! event loop drains; outgoing state is a snapshot the runtime publishes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc::Sender};

use async_io::{Timer, block_on};
use tracing::{info, warn};
use zbus::{Connection, interface};
use zvariant::{OwnedObjectPath, OwnedValue, Value};

use crate::catalog::TrackDescriptor;
use crate::player::{RepeatMode, TransportState};

const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
const BUS_NAME: &str = "org.mpris.MediaPlayer2.encore";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
}

#[derive(Debug, Default)]
struct SharedState {
    playing: bool,
    repeat: RepeatMode,
    shuffle: bool,
    volume: f64,
    title: Option<String>,
    artist: Vec<String>,
    album: Option<String>,
    url: Option<String>,
    art_url: Option<String>,
    length_micros: Option<i64>,
    track_id: Option<OwnedObjectPath>,
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
}

impl MprisHandle {
    /// A handle with no bus behind it.
    #[cfg(test)]
    pub(crate) fn detached() -> Self {
        Self {
            state: Arc::new(Mutex::new(SharedState::default())),
        }
    }

    /// Publish transport flags (status, loop, shuffle, volume).
    pub fn set_transport(&self, transport: &TransportState) {
        if let Ok(mut s) = self.state.lock() {
            s.playing = transport.is_playing;
            s.repeat = transport.repeat_mode;
            s.shuffle = transport.shuffled;
            s.volume = f64::from(transport.volume);
        }
    }

    /// Publish metadata for the current track, or clear it with `None`.
    ///
    /// `duration_secs` is the best known length: the output's report when
    /// available, the catalog hint otherwise.
    pub fn set_track_metadata(
        &self,
        current: Option<(usize, &TrackDescriptor)>,
        duration_secs: Option<f64>,
    ) {
        let Ok(mut s) = self.state.lock() else {
            return;
        };

        match current {
            Some((index, track)) => {
                s.title = Some(track.title.clone());
                s.artist = if track.artist.trim().is_empty() {
                    Vec::new()
                } else {
                    vec![track.artist.clone()]
                };
                s.album = track.album.clone();
                s.url = Some(source_url(&track.source));
                s.art_url = track.art.as_deref().map(source_url);
                s.length_micros = duration_secs
                    .or_else(|| track.duration_hint.map(|d| d.as_secs_f64()))
                    .filter(|d| d.is_finite() && *d >= 0.0)
                    .map(|d| (d * 1_000_000.0) as i64);
                s.track_id =
                    OwnedObjectPath::try_from(format!("{OBJECT_PATH}/track/{index}")).ok();
            }
            None => {
                s.title = None;
                s.artist.clear();
                s.album = None;
                s.url = None;
                s.art_url = None;
                s.length_micros = None;
                s.track_id = None;
            }
        }
    }
}

/// Local paths become `file://` URLs; anything with a scheme is kept as is.
fn source_url(source: &str) -> String {
    if source.contains("://") {
        source.to_string()
    } else {
        format!("file://{source}")
    }
}

fn owned(v: Value<'_>) -> Option<OwnedValue> {
    OwnedValue::try_from(v).ok()
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No-op for TUI.
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "encore"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["file".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        match self.state.lock() {
            Ok(s) if s.playing => "Playing",
            Ok(_) => "Paused",
            Err(_) => "Stopped",
        }
    }

    #[zbus(property)]
    fn loop_status(&self) -> &str {
        let repeat = self.state.lock().map(|s| s.repeat).unwrap_or_default();
        match repeat {
            RepeatMode::Off => "None",
            RepeatMode::All => "Playlist",
            RepeatMode::One => "Track",
        }
    }

    #[zbus(property)]
    fn shuffle(&self) -> bool {
        self.state.lock().map(|s| s.shuffle).unwrap_or(false)
    }

    #[zbus(property)]
    fn volume(&self) -> f64 {
        self.state.lock().map(|s| s.volume).unwrap_or(0.0)
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        let mut put = |key: &str, v: Option<OwnedValue>| {
            if let Some(v) = v {
                map.insert(key.to_string(), v);
            }
        };

        put(
            "mpris:trackid",
            s.track_id
                .as_ref()
                .and_then(|p| owned(Value::from(p.clone().into_inner()))),
        );
        put("xesam:title", s.title.clone().and_then(|t| owned(Value::from(t))));
        if !s.artist.is_empty() {
            put("xesam:artist", owned(Value::from(s.artist.clone())));
        }
        put("xesam:album", s.album.clone().and_then(|a| owned(Value::from(a))));
        put("xesam:url", s.url.clone().and_then(|u| owned(Value::from(u))));
        put("mpris:artUrl", s.art_url.clone().and_then(|u| owned(Value::from(u))));
        put("mpris:length", s.length_micros.and_then(|l| owned(Value::from(l))));

        map
    }
}

pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            let connection = match Connection::session().await {
                Ok(c) => c,
                Err(e) => {
                    warn!(error = %e, "MPRIS: failed to connect to session bus");
                    return;
                }
            };

            if let Err(e) = connection.request_name(BUS_NAME).await {
                warn!(error = %e, "MPRIS: failed to acquire name");
                return;
            }

            let object_server = connection.object_server();

            if let Err(e) = object_server
                .at(OBJECT_PATH, RootIface { tx: tx.clone() })
                .await
            {
                warn!(error = %e, "MPRIS: failed to register root iface");
                return;
            }

            if let Err(e) = object_server
                .at(
                    OBJECT_PATH,
                    PlayerIface {
                        tx,
                        state: state_for_thread,
                    },
                )
                .await
            {
                warn!(error = %e, "MPRIS: failed to register player iface");
                return;
            }

            info!(name = BUS_NAME, "MPRIS service registered");

            // Keep the service alive.
            loop {
                Timer::after(std::time::Duration::from_secs(3600)).await;
            }
        });
    });

    MprisHandle { state }
}

#[cfg(test)]
mod tests;
