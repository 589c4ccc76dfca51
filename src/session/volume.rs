use crate::error::TrackError;
use crate::track::TrackController;

/// Volume control for one track of a session, without access to its transport.
pub struct VolumeHandle<'a> {
    track: &'a mut TrackController,
}

impl<'a> VolumeHandle<'a> {
    pub(super) fn new(track: &'a mut TrackController) -> Self {
        Self { track }
    }

    pub fn id(&self) -> &str {
        self.track.id()
    }

    pub fn get(&self) -> f32 {
        self.track.volume()
    }

    /// Set this track's volume, clamped to `0.0..=1.0`. Returns the stored value.
    pub fn set(&mut self, volume: f32) -> Result<f32, TrackError> {
        self.track.set_volume(volume)
    }
}
