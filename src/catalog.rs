//! Track catalog: the ordered, validated list of tracks for a session.
//!
//! The catalog comes either from `[[tracks]]` entries in the config file or,
//! when none are configured, from scanning a music directory.

mod display;
mod model;
mod scan;

use std::path::Path;

use tracing::info;

use crate::config::{LibrarySettings, TrackEntry};
use crate::error::Result;

pub use display::display_from_fields;
pub use model::*;
pub use scan::scan;

/// Build descriptors from configured entries, keeping file order.
pub fn tracks_from_entries(
    entries: &[TrackEntry],
    library: &LibrarySettings,
) -> Result<Vec<TrackDescriptor>> {
    entries
        .iter()
        .enumerate()
        .map(|(index, e)| {
            let duration_hint = e
                .duration
                .map(|secs| model::duration_hint_from_secs(index, secs))
                .transpose()?;
            let display = display_from_fields(
                &e.source,
                &e.title,
                &e.artist,
                e.album.as_deref(),
                &library.display_fields,
                &library.display_separator,
            );
            Ok(TrackDescriptor {
                title: e.title.clone(),
                artist: e.artist.clone(),
                album: e.album.clone(),
                duration_hint,
                art: e.art.clone(),
                source: e.source.clone(),
                display,
            })
        })
        .collect()
}

/// Resolve the session catalog: configured tracks win over a directory scan.
pub fn load_catalog(
    dir: &Path,
    entries: &[TrackEntry],
    library: &LibrarySettings,
) -> Result<Catalog> {
    let tracks = if entries.is_empty() {
        let tracks = scan(dir, library);
        info!(dir = %dir.display(), count = tracks.len(), "scanned music directory");
        tracks
    } else {
        info!(count = entries.len(), "using configured track list");
        tracks_from_entries(entries, library)?
    };
    Catalog::new(tracks)
}
