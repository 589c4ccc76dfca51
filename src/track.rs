//! Track controllers: one audio source's transport state, volume and
//! position/duration observation.

mod cadence;
mod controller;
mod status;

pub use cadence::Cadence;
pub use controller::TrackController;
pub use status::{TrackEvent, TrackStatus, track_id};

#[cfg(test)]
mod tests;
