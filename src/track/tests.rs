use std::time::{Duration, Instant};

use super::*;
use crate::config::PlaybackSettings;
use crate::engine::{EngineBackend, HeadlessBackend, HeadlessClock, HeadlessMedia};
use crate::error::TrackError;

fn open(backend: &mut HeadlessBackend, uri: &str) -> TrackController {
    let engine = backend.open(uri);
    TrackController::new(uri, engine, &PlaybackSettings::default())
}

#[test]
fn track_id_uses_last_segment_without_extension() {
    assert_eq!(track_id("lead.mp3"), "lead");
    assert_eq!(track_id("/music/Ave Verum/Alto 1.mp3"), "Alto 1");
    assert_eq!(track_id("file:///music/tenor.flac"), "tenor");
    assert_eq!(track_id("noext"), "noext");
    assert_eq!(
        track_id("https://bucket.example/mp3s/song/Bass.mp3?X-Amz-Credential=a%2Fb/c"),
        "Bass"
    );
}

#[test]
fn track_id_strips_from_the_first_dot() {
    assert_eq!(track_id("soprano.v2.mp3"), "soprano");
    // Nothing left before the dot: keep the whole segment.
    assert_eq!(track_id("/music/.hidden.mp3"), ".hidden.mp3");
}

#[test]
fn cadence_fires_first_poll_then_once_per_period() {
    let t0 = Instant::now();
    let mut cadence = Cadence::new(Duration::from_millis(50));

    assert!(cadence.due(t0));
    assert!(!cadence.due(t0 + Duration::from_millis(10)));
    assert!(cadence.due(t0 + Duration::from_millis(50)));
    assert!(!cadence.due(t0 + Duration::from_millis(60)));

    cadence.stop();
    assert!(cadence.is_stopped());
    assert!(!cadence.due(t0 + Duration::from_secs(10)));
}

#[test]
fn new_track_starts_paused_loading_at_default_volume() {
    let mut backend = HeadlessBackend::new(HeadlessClock::new()).with_media(
        "lead.mp3",
        HeadlessMedia::default().loading_for(Duration::from_secs(1)),
    );
    let track = open(&mut backend, "lead.mp3");

    assert_eq!(track.id(), "lead");
    assert_eq!(track.source_uri(), "lead.mp3");
    assert!(!track.is_playing());
    assert_eq!(track.volume(), 0.5);
    assert_eq!(track.position(), 0.0);
    assert_eq!(track.duration(), None);
    assert_eq!(track.status(), &TrackStatus::Loading);
}

#[test]
fn set_volume_clamps_to_unit_range() {
    let mut backend = HeadlessBackend::new(HeadlessClock::new());
    let mut track = open(&mut backend, "lead.mp3");

    assert_eq!(track.set_volume(-0.3).unwrap(), 0.0);
    assert_eq!(track.volume(), 0.0);
    assert_eq!(track.set_volume(1.7).unwrap(), 1.0);
    assert_eq!(track.volume(), 1.0);
    assert_eq!(track.set_volume(0.25).unwrap(), 0.25);
    assert_eq!(track.set_volume(f32::NAN).unwrap(), 0.25);
    assert_eq!(track.volume(), 0.25);
}

#[test]
fn volume_reaches_the_engine() {
    let mut backend = HeadlessBackend::new(HeadlessClock::new());
    let mut track = open(&mut backend, "lead.mp3");
    assert_eq!(backend.volume_of("lead.mp3"), Some(0.5));

    track.set_volume(0.8).unwrap();
    assert_eq!(backend.volume_of("lead.mp3"), Some(0.8));

    track.set_volume(f32::NAN).unwrap();
    track.set_volume(3.0).unwrap();
    assert_eq!(backend.volume_of("lead.mp3"), Some(1.0));
    assert_eq!(backend.volume_of("alt.mp3"), None);
}

#[test]
fn seek_clamps_to_known_duration() {
    let mut backend = HeadlessBackend::new(HeadlessClock::new())
        .with_media("lead.mp3", HeadlessMedia::with_duration(120.0));
    let mut track = open(&mut backend, "lead.mp3");
    track.sample(Instant::now());
    assert_eq!(track.duration(), Some(120.0));

    assert_eq!(track.seek_to(-5.0).unwrap(), 0.0);
    assert_eq!(track.seek_to(500.0).unwrap(), 120.0);
    assert_eq!(track.seek_to(42.0).unwrap(), 42.0);
    assert_eq!(track.position(), 42.0);
}

#[test]
fn seek_passes_through_while_duration_is_unknown() {
    let mut backend = HeadlessBackend::new(HeadlessClock::new()).with_media(
        "lead.mp3",
        HeadlessMedia::with_duration(120.0).loading_for(Duration::from_secs(10)),
    );
    let mut track = open(&mut backend, "lead.mp3");
    track.sample(Instant::now());
    assert_eq!(track.duration(), None);

    assert_eq!(track.seek_to(500.0).unwrap(), 500.0);
    assert_eq!(track.position(), 500.0);
    assert_eq!(track.seek_to(-3.0).unwrap(), -3.0);
    assert_eq!(track.seek_to(f64::NAN).unwrap(), -3.0);
}

#[test]
fn playing_state_is_observed_on_the_next_sample() {
    let clock = HeadlessClock::new();
    let mut backend = HeadlessBackend::new(clock.clone());
    let mut track = open(&mut backend, "lead.mp3");
    let t0 = Instant::now();

    assert_eq!(
        track.sample(t0),
        vec![
            TrackEvent::DurationKnown(180.0),
            TrackEvent::PlayingChanged(false)
        ]
    );

    track.set_playing(true).unwrap();
    assert!(!track.is_playing());

    clock.advance(Duration::from_millis(50));
    let events = track.sample(t0 + Duration::from_millis(50));
    assert_eq!(events, vec![TrackEvent::PlayingChanged(true)]);
    assert!(track.is_playing());
    assert!((track.position() - 0.05).abs() < 1e-6);

    // Same value again: nothing changes.
    track.set_playing(true).unwrap();
    clock.advance(Duration::from_millis(50));
    assert!(track.sample(t0 + Duration::from_millis(100)).is_empty());
    assert!(track.is_playing());
}

#[test]
fn position_follows_the_fast_cadence_only() {
    let clock = HeadlessClock::new();
    let mut backend = HeadlessBackend::new(clock.clone());
    let mut track = open(&mut backend, "lead.mp3");
    let t0 = Instant::now();
    track.sample(t0);
    track.set_playing(true).unwrap();

    clock.advance(Duration::from_secs(1));
    track.sample(t0 + Duration::from_millis(10));
    assert_eq!(track.position(), 0.0);

    track.sample(t0 + Duration::from_millis(50));
    assert!((track.position() - 1.0).abs() < 1e-6);
}

#[test]
fn engine_failure_surfaces_as_status_not_error() {
    let mut backend = HeadlessBackend::new(HeadlessClock::new())
        .with_media("alt.mp3", HeadlessMedia::failing("decode error"));
    let mut track = open(&mut backend, "alt.mp3");

    assert!(track.set_playing(true).is_ok());

    let events = track.sample(Instant::now());
    assert!(events.contains(&TrackEvent::Failed("decode error".to_string())));
    assert_eq!(
        track.status(),
        &TrackStatus::Failed("decode error".to_string())
    );
    assert!(!track.is_playing());
    assert_eq!(track.duration(), None);

    // Still failed, but reported only once.
    let later = track.sample(Instant::now() + Duration::from_secs(5));
    assert!(!later.iter().any(|e| matches!(e, TrackEvent::Failed(_))));
}

#[test]
fn dispose_freezes_observations_and_rejects_commands() {
    let clock = HeadlessClock::new();
    let mut backend = HeadlessBackend::new(clock.clone());
    let mut track = open(&mut backend, "lead.mp3");
    let t0 = Instant::now();
    track.sample(t0);
    track.set_playing(true).unwrap();
    clock.advance(Duration::from_secs(3));
    track.sample(t0 + Duration::from_millis(50));
    let position = track.position();
    assert!(position > 2.9);

    track.dispose();
    assert!(track.is_disposed());
    assert_eq!(track.status(), &TrackStatus::Disposed);

    clock.advance(Duration::from_secs(3));
    assert!(track.sample(t0 + Duration::from_secs(5)).is_empty());
    assert_eq!(track.position(), position);
    assert_eq!(track.duration(), Some(180.0));
    assert!(!track.is_playing());

    assert!(matches!(
        track.set_playing(true),
        Err(TrackError::Disposed { ref id }) if id == "lead"
    ));
    assert!(track.set_volume(0.9).is_err());
    assert!(track.seek_to(1.0).is_err());
    assert_eq!(track.volume(), 0.5);

    // Idempotent.
    track.dispose();
    assert_eq!(track.status(), &TrackStatus::Disposed);
}
