use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Instant;

use log::{debug, info, warn};

use crate::config::PlaybackSettings;
use crate::engine::EngineBackend;
use crate::error::SessionError;
use crate::track::{TrackController, TrackEvent, TrackStatus};

use super::events::SessionEvent;
use super::volume::VolumeHandle;

/// Index of the leader in `tracks`.
const LEADER: usize = 0;

/// A leader track plus its followers, exposed as one playback unit.
pub struct Coordinator {
    /// Input order; `tracks[LEADER]` is the leader, the rest are followers.
    tracks: Vec<TrackController>,
    subscribers: Vec<Sender<SessionEvent>>,
    disposed: bool,
}

impl Coordinator {
    /// Open one track per source. The first source leads.
    ///
    /// Fails with `SessionError::EmptySourceList` before opening anything when
    /// `sources` is empty.
    pub fn new<S: AsRef<str>>(
        sources: &[S],
        backend: &mut dyn EngineBackend,
        settings: &PlaybackSettings,
    ) -> Result<Self, SessionError> {
        if sources.is_empty() {
            return Err(SessionError::EmptySourceList);
        }

        let tracks: Vec<TrackController> = sources
            .iter()
            .map(|uri| {
                let uri = uri.as_ref();
                TrackController::new(uri, backend.open(uri), settings)
            })
            .collect();

        info!(
            "session opened: leader '{}', {} follower(s)",
            tracks[LEADER].id(),
            tracks.len() - 1
        );

        Ok(Self {
            tracks,
            subscribers: Vec::new(),
            disposed: false,
        })
    }

    pub fn leader(&self) -> &TrackController {
        &self.tracks[LEADER]
    }

    pub fn followers(&self) -> &[TrackController] {
        &self.tracks[LEADER + 1..]
    }

    /// All tracks in input order, leader first.
    pub fn tracks(&self) -> &[TrackController] {
        &self.tracks
    }

    pub fn is_playing(&self) -> bool {
        self.leader().is_playing()
    }

    pub fn current_time(&self) -> f64 {
        self.leader().position()
    }

    pub fn duration(&self) -> Option<f64> {
        self.leader().duration()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Volume handles for every track, leader first.
    pub fn volumes(&mut self) -> Vec<VolumeHandle<'_>> {
        self.tracks.iter_mut().map(VolumeHandle::new).collect()
    }

    pub fn volume(&mut self, index: usize) -> Option<VolumeHandle<'_>> {
        self.tracks.get_mut(index).map(VolumeHandle::new)
    }

    pub fn play(&mut self) -> Result<(), SessionError> {
        self.set_leader_playing(true)
    }

    pub fn pause(&mut self) -> Result<(), SessionError> {
        self.set_leader_playing(false)
    }

    /// Play if the session is paused, pause if it is playing. Returns the
    /// requested state.
    pub fn toggle_playback(&mut self) -> Result<bool, SessionError> {
        let playing = !self.is_playing();
        self.set_leader_playing(playing)?;
        Ok(playing)
    }

    /// Seek every track to `secs` before returning.
    ///
    /// Each track clamps on its own; a track that cannot seek does not stop
    /// the others.
    pub fn seek_to(&mut self, secs: f64) -> Result<(), SessionError> {
        self.ensure_live()?;
        debug!("session: seek to {secs:.3}s on {} track(s)", self.tracks.len());
        for track in &mut self.tracks {
            if let Err(err) = track.seek_to(secs) {
                warn!("seek failed: {err}");
            }
        }
        Ok(())
    }

    /// Register an observer. Disconnected receivers are dropped on the next event.
    pub fn subscribe(&mut self) -> Receiver<SessionEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// One scheduling step: sample the leader, propagate a change of its
    /// playing state to every follower, then sample the followers.
    pub fn tick_at(&mut self, now: Instant) {
        if self.disposed {
            return;
        }

        let mut published = Vec::new();
        let (leader, followers) = self.tracks.split_at_mut(LEADER + 1);
        let leader = &mut leader[LEADER];

        for event in leader.sample(now) {
            match event {
                TrackEvent::PlayingChanged(playing) => {
                    debug!(
                        "leader '{}' playing={playing}, propagating to {} follower(s)",
                        leader.id(),
                        followers.len()
                    );
                    for follower in followers.iter_mut() {
                        if let Err(err) = follower.set_playing(playing) {
                            warn!("propagation failed: {err}");
                        }
                    }
                    published.push(SessionEvent::PlayingChanged(playing));
                }
                TrackEvent::DurationKnown(duration) => {
                    published.push(SessionEvent::DurationKnown(duration));
                }
                TrackEvent::Failed(reason) => {
                    published.push(SessionEvent::TrackFailed {
                        index: LEADER,
                        id: leader.id().to_string(),
                        reason,
                    });
                }
            }
        }

        for (offset, follower) in followers.iter_mut().enumerate() {
            for event in follower.sample(now) {
                if let TrackEvent::Failed(reason) = event {
                    published.push(SessionEvent::TrackFailed {
                        index: LEADER + 1 + offset,
                        id: follower.id().to_string(),
                        reason,
                    });
                }
            }
        }

        for event in published {
            self.publish(event);
        }
    }

    /// Dispose every track and stop all sampling. Accessors keep returning the
    /// last observed values; commands return `SessionError::Disposed`.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        for track in &mut self.tracks {
            track.dispose();
        }
        self.disposed = true;
        self.publish(SessionEvent::Disposed);
        self.subscribers.clear();
        info!("session disposed");
    }

    fn set_leader_playing(&mut self, playing: bool) -> Result<(), SessionError> {
        self.ensure_live()?;
        let leader = &mut self.tracks[LEADER];
        if matches!(leader.status(), TrackStatus::Failed(_)) {
            warn!("leader '{}' failed to load; playing={playing} has no effect", leader.id());
        }
        leader.set_playing(playing)?;
        Ok(())
    }

    fn ensure_live(&self) -> Result<(), SessionError> {
        if self.disposed {
            return Err(SessionError::Disposed);
        }
        Ok(())
    }

    fn publish(&mut self, event: SessionEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.dispose();
    }
}
