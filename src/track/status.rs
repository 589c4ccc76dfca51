/// Observable state of one track's source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TrackStatus {
    /// Opened, duration not known yet.
    #[default]
    Loading,
    Ready,
    /// The source could not be opened or decoded; the track stays silent.
    Failed(String),
    /// The engine was released.
    Disposed,
}

/// What changed during one `TrackController::sample` call.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackEvent {
    /// The engine-reported playing state changed (or was observed for the first time).
    PlayingChanged(bool),
    DurationKnown(f64),
    Failed(String),
}

/// Display name for a source: the last path segment up to its first `.`.
///
/// Query strings and fragments (e.g. signed-URL parameters) are ignored.
pub fn track_id(source_uri: &str) -> String {
    let path = source_uri.split(['?', '#']).next().unwrap_or(source_uri);
    let segment = path
        .trim_end_matches('/')
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(path);
    let stem = segment.split('.').next().unwrap_or(segment);

    if !stem.is_empty() {
        stem.to_string()
    } else if !segment.is_empty() {
        segment.to_string()
    } else {
        source_uri.to_string()
    }
}
