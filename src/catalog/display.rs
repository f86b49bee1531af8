use std::path::Path;

use crate::config::TrackDisplayField;

fn non_blank(s: &str) -> Option<String> {
    Some(s.trim()).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Compose a display label from track metadata.
///
/// Fields are emitted in the configured order, blank values are skipped, and
/// the result falls back to `title` when nothing was produced.
pub fn display_from_fields(
    source: &str,
    title: &str,
    artist: &str,
    album: Option<&str>,
    fields: &[TrackDisplayField],
    sep: &str,
) -> String {
    let parts: Vec<String> = fields
        .iter()
        .flat_map(|field| -> Vec<String> {
            match field {
                // Same shape as the player's byline: artist, then title.
                TrackDisplayField::Display => {
                    [non_blank(artist), non_blank(title)].into_iter().flatten().collect()
                }
                TrackDisplayField::Title => non_blank(title).into_iter().collect(),
                TrackDisplayField::Artist => non_blank(artist).into_iter().collect(),
                TrackDisplayField::Album => album.and_then(non_blank).into_iter().collect(),
                TrackDisplayField::Filename => Path::new(source)
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .and_then(non_blank)
                    .into_iter()
                    .collect(),
                TrackDisplayField::Path => vec![source.to_string()],
            }
        })
        .collect();

    if parts.is_empty() {
        title.to_string()
    } else {
        parts.join(sep)
    }
}
