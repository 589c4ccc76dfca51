//! Engine traits shared by every backend.

/// Load state reported by an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineStatus {
    /// The source is still being opened or probed.
    Loading,
    /// The source can be played.
    Ready,
    /// The source could not be opened or decoded.
    Failed(String),
}

/// One playable audio source.
///
/// Commands never fail synchronously: problems show up through `status`.
/// Times are in seconds.
pub trait PlaybackEngine {
    fn play(&mut self);
    fn pause(&mut self);
    /// Whether audio is actually advancing right now (false once the source ended).
    fn is_playing(&self) -> bool;
    fn set_volume(&mut self, volume: f32);
    fn position(&self) -> f64;
    fn seek(&mut self, secs: f64);
    /// `None` while the duration is not known yet.
    fn duration(&self) -> Option<f64>;
    fn status(&self) -> EngineStatus;
}

/// Opens engines for source URIs.
pub trait EngineBackend {
    fn open(&mut self, source_uri: &str) -> Box<dyn PlaybackEngine>;
}
