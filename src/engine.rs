//! Playback engines.
//!
//! An engine is whatever actually decodes and outputs one audio source. Track
//! controllers only ever talk to the `PlaybackEngine` trait; backends open one
//! engine per source URI. Two backends ship with the crate: `RodioBackend` for
//! real output through the default audio device, and `HeadlessBackend`, a
//! clock-driven stand-in with no audio device that scripts load delays and
//! failures.

mod headless;
mod output;
mod types;

pub use headless::{HeadlessBackend, HeadlessClock, HeadlessEngine, HeadlessMedia};
pub use output::{RodioBackend, RodioEngine};
pub use types::{EngineBackend, EngineStatus, PlaybackEngine};
