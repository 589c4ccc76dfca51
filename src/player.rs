//! Threaded driver for a playback session.
//!
//! `SessionPlayer` runs one `Coordinator` on a dedicated thread: commands come
//! in over a channel, the coordinator ticks at the position cadence, and after
//! every tick a `SessionSnapshot` is published to a shared handle the UI can
//! read without touching the tracks.

mod session_player;
mod thread;
mod types;

pub use session_player::SessionPlayer;
pub use types::{SessionCmd, SessionHandle, SessionSnapshot, TrackSnapshot};
