use std::time::Instant;

use log::{debug, info, warn};

use crate::config::PlaybackSettings;
use crate::engine::{EngineStatus, PlaybackEngine};
use crate::error::TrackError;

use super::cadence::Cadence;
use super::status::{TrackEvent, TrackStatus, track_id};

/// Owns one engine and the last values sampled from it.
///
/// Commands go straight to the engine; the accessors only ever return what
/// `sample` last observed (or what a seek just set), so reading never blocks.
pub struct TrackController {
    id: String,
    source_uri: String,
    engine: Option<Box<dyn PlaybackEngine>>,
    /// `None` until the first position sample.
    observed_playing: Option<bool>,
    volume: f32,
    position: f64,
    duration: Option<f64>,
    status: TrackStatus,
    position_cadence: Cadence,
    duration_cadence: Cadence,
}

impl TrackController {
    /// Bind to `engine`. Never blocks on loading and never fails; load errors
    /// surface as `TrackStatus::Failed` once sampled.
    pub fn new(
        source_uri: &str,
        mut engine: Box<dyn PlaybackEngine>,
        settings: &PlaybackSettings,
    ) -> Self {
        let volume = settings.default_volume.clamp(0.0, 1.0);
        engine.set_volume(volume);

        Self {
            id: track_id(source_uri),
            source_uri: source_uri.to_string(),
            engine: Some(engine),
            observed_playing: None,
            volume,
            position: 0.0,
            duration: None,
            status: TrackStatus::Loading,
            position_cadence: Cadence::new(settings.position_interval()),
            duration_cadence: Cadence::new(settings.duration_interval()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source_uri(&self) -> &str {
        &self.source_uri
    }

    /// Engine-reported playing state as of the last sample.
    pub fn is_playing(&self) -> bool {
        self.observed_playing.unwrap_or(false)
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Position in seconds.
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Duration in seconds, `None` while unknown.
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn status(&self) -> &TrackStatus {
        &self.status
    }

    pub fn is_disposed(&self) -> bool {
        self.engine.is_none()
    }

    /// Ask the engine to start or stop. A no-op when the engine already is in
    /// that state or the source failed to load.
    pub fn set_playing(&mut self, playing: bool) -> Result<(), TrackError> {
        let Some(engine) = self.engine.as_mut() else {
            return Err(TrackError::Disposed {
                id: self.id.clone(),
            });
        };
        if let TrackStatus::Failed(reason) = &self.status {
            debug!("track '{}': ignoring playing={playing}, source failed: {reason}", self.id);
            return Ok(());
        }
        if engine.is_playing() == playing {
            return Ok(());
        }

        debug!("track '{}': playing={playing}", self.id);
        if playing {
            engine.play();
        } else {
            engine.pause();
        }
        Ok(())
    }

    /// Set the volume, clamped to `0.0..=1.0`. Returns the stored value.
    ///
    /// NaN leaves the volume unchanged.
    pub fn set_volume(&mut self, volume: f32) -> Result<f32, TrackError> {
        let Some(engine) = self.engine.as_mut() else {
            return Err(TrackError::Disposed {
                id: self.id.clone(),
            });
        };
        if volume.is_nan() {
            warn!("track '{}': ignoring NaN volume", self.id);
            return Ok(self.volume);
        }

        let clamped = volume.clamp(0.0, 1.0);
        engine.set_volume(clamped);
        self.volume = clamped;
        Ok(clamped)
    }

    /// Jump to `secs`. Clamped to `0.0..=duration` when the duration is known,
    /// passed through otherwise. Returns the applied target, which the position
    /// accessor reports until the next sample.
    pub fn seek_to(&mut self, secs: f64) -> Result<f64, TrackError> {
        let Some(engine) = self.engine.as_mut() else {
            return Err(TrackError::Disposed {
                id: self.id.clone(),
            });
        };
        if secs.is_nan() {
            warn!("track '{}': ignoring NaN seek target", self.id);
            return Ok(self.position);
        }

        let target = match engine.duration().or(self.duration) {
            Some(duration) => secs.clamp(0.0, duration.max(0.0)),
            None => secs,
        };
        debug!("track '{}': seek to {target:.3}s", self.id);
        engine.seek(target);
        self.position = target;
        Ok(target)
    }

    /// Poll the engine if a cadence is due and report what changed.
    ///
    /// Position and playing state follow the fast cadence; duration and load
    /// status the slow one. The first call samples both.
    pub fn sample(&mut self, now: Instant) -> Vec<TrackEvent> {
        let mut events = Vec::new();
        let Some(engine) = self.engine.as_ref() else {
            return events;
        };

        if self.duration_cadence.due(now) {
            let duration = engine.duration();
            if duration != self.duration {
                if let Some(d) = duration {
                    events.push(TrackEvent::DurationKnown(d));
                }
                self.duration = duration;
            }

            match engine.status() {
                EngineStatus::Failed(reason) => {
                    if !matches!(self.status, TrackStatus::Failed(_)) {
                        warn!("track '{}' failed: {reason}", self.id);
                        self.status = TrackStatus::Failed(reason.clone());
                        events.push(TrackEvent::Failed(reason));
                    }
                }
                EngineStatus::Ready => {
                    if self.status == TrackStatus::Loading {
                        debug!("track '{}' ready", self.id);
                        self.status = TrackStatus::Ready;
                    }
                }
                EngineStatus::Loading => {}
            }
        }

        if self.position_cadence.due(now) {
            self.position = engine.position();
            let playing = engine.is_playing();
            if self.observed_playing != Some(playing) {
                self.observed_playing = Some(playing);
                events.push(TrackEvent::PlayingChanged(playing));
            }
        }

        events
    }

    /// Release the engine and stop sampling. Position and duration keep their
    /// last observed values; every later command returns `TrackError::Disposed`.
    pub fn dispose(&mut self) {
        let Some(mut engine) = self.engine.take() else {
            return;
        };
        engine.pause();
        drop(engine);

        self.position_cadence.stop();
        self.duration_cadence.stop();
        self.observed_playing = Some(false);
        self.status = TrackStatus::Disposed;
        info!("track '{}' disposed", self.id);
    }
}

impl Drop for TrackController {
    fn drop(&mut self) {
        self.dispose();
    }
}
