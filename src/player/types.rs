//! Commands and shared state handles of the session player.

use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use crate::session::Coordinator;
use crate::track::TrackStatus;

#[derive(Debug)]
pub enum SessionCmd {
    /// Start the leader; followers follow on the next ticks.
    Play,
    /// Pause the leader; followers follow on the next ticks.
    Pause,
    /// Flip the session's playing state.
    TogglePlayback,
    /// Seek every track; `ack` fires once all of them were instructed.
    SeekTo { secs: f64, ack: Sender<()> },
    /// Set one track's volume (clamped to `0.0..=1.0`).
    SetVolume { index: usize, volume: f32 },
    /// Dispose the session and stop the thread.
    Quit,
}

#[derive(Debug, Clone)]
/// Per-track view published after every tick.
pub struct TrackSnapshot {
    pub id: String,
    pub playing: bool,
    pub volume: f32,
    pub position: f64,
    pub duration: Option<f64>,
    pub status: TrackStatus,
}

#[derive(Debug, Clone, Default)]
/// Session view shared with the UI.
pub struct SessionSnapshot {
    /// The leader's playing state.
    pub playing: bool,
    /// The leader's position in seconds.
    pub current_time: f64,
    /// The leader's duration in seconds, if known.
    pub duration: Option<f64>,
    /// All tracks, leader first.
    pub tracks: Vec<TrackSnapshot>,
    /// Whether the session has been torn down.
    pub disposed: bool,
}

impl SessionSnapshot {
    pub(super) fn capture(session: &Coordinator) -> Self {
        Self {
            playing: session.is_playing(),
            current_time: session.current_time(),
            duration: session.duration(),
            tracks: session
                .tracks()
                .iter()
                .map(|t| TrackSnapshot {
                    id: t.id().to_string(),
                    playing: t.is_playing(),
                    volume: t.volume(),
                    position: t.position(),
                    duration: t.duration(),
                    status: t.status().clone(),
                })
                .collect(),
            disposed: session.is_disposed(),
        }
    }
}

pub type SessionHandle = Arc<Mutex<SessionSnapshot>>;
