//! Synchronized playback of several audio tracks as one performance.
//!
//! A session plays an ordered list of sources (for example the voice parts of
//! one song). The first source leads: play and pause go to it alone, and the
//! other tracks follow its observed playing state. Seeks reach every track.
//! Each track keeps its own volume.
//!
//! - [`session::Coordinator`] is the single-threaded, tick-driven core.
//! - [`player::SessionPlayer`] runs a coordinator on its own thread and
//!   publishes snapshots.
//! - [`engine`] holds the audio backends (rodio output and a headless clock).
//! - [`library`] resolves song folders to source lists and [`signing`] caches
//!   time-limited object URLs.

pub mod config;
pub mod engine;
pub mod error;
pub mod library;
pub mod player;
pub mod session;
pub mod signing;
pub mod track;

pub use config::Settings;
pub use error::{EngineError, ResolveError, SessionError, SignError, TrackError};
pub use player::SessionPlayer;
pub use session::Coordinator;
