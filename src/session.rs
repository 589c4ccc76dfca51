//! Playback sessions: one leader track, any number of followers.
//!
//! The `Coordinator` owns every `TrackController` of a session. Transport
//! commands go to the leader only; followers pick up the leader's *observed*
//! playing state during `tick`, so they mirror what the leader's engine
//! actually does rather than what it was told. Seeks are the exception and fan
//! out to every track in one call.

mod coordinator;
mod events;
mod volume;

pub use coordinator::Coordinator;
pub use events::SessionEvent;
pub use volume::VolumeHandle;
