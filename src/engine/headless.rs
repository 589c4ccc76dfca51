//! Engines without an audio device, driven by a manually advanced clock.
//!
//! Positions advance only when the shared `HeadlessClock` is advanced, which
//! makes convergence of a whole session reproducible tick by tick. Per-source
//! `HeadlessMedia` scripts control the duration, how long metadata takes to
//! load, and whether the source fails or refuses to start.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use super::types::{EngineBackend, EngineStatus, PlaybackEngine};

/// Shared media clock, in microseconds since creation.
#[derive(Debug, Clone, Default)]
pub struct HeadlessClock {
    micros: Arc<AtomicU64>,
}

impl HeadlessClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.micros
            .fetch_add(by.as_micros() as u64, Ordering::SeqCst);
    }

    /// Current media time in seconds.
    pub fn now(&self) -> f64 {
        self.micros.load(Ordering::SeqCst) as f64 / 1_000_000.0
    }
}

/// Script for one headless source.
#[derive(Debug, Clone)]
pub struct HeadlessMedia {
    /// Length of the source in seconds.
    pub duration: f64,
    /// Clock time after opening before the duration becomes known.
    pub load_delay: Duration,
    /// When set, the source never loads and reports this reason.
    pub failure: Option<String>,
    /// When set, `play` is ignored (e.g. playback blocked by the platform).
    pub refuses_play: bool,
}

impl Default for HeadlessMedia {
    fn default() -> Self {
        Self {
            duration: 180.0,
            load_delay: Duration::ZERO,
            failure: None,
            refuses_play: false,
        }
    }
}

impl HeadlessMedia {
    pub fn with_duration(secs: f64) -> Self {
        Self {
            duration: secs,
            ..Self::default()
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            failure: Some(reason.to_string()),
            ..Self::default()
        }
    }

    pub fn loading_for(mut self, delay: Duration) -> Self {
        self.load_delay = delay;
        self
    }

    pub fn refusing_play(mut self) -> Self {
        self.refuses_play = true;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessBackend {
    clock: HeadlessClock,
    media: HashMap<String, HeadlessMedia>,
    opened: Vec<String>,
    volumes: HashMap<String, Arc<AtomicU32>>,
}

impl HeadlessBackend {
    pub fn new(clock: HeadlessClock) -> Self {
        Self {
            clock,
            ..Self::default()
        }
    }

    /// Script the source at `source_uri`; unscripted sources use `HeadlessMedia::default()`.
    pub fn with_media(mut self, source_uri: &str, media: HeadlessMedia) -> Self {
        self.media.insert(source_uri.to_string(), media);
        self
    }

    pub fn clock(&self) -> &HeadlessClock {
        &self.clock
    }

    /// Source URIs opened so far, in order.
    pub fn opened(&self) -> &[String] {
        &self.opened
    }

    /// Volume last applied to the engine opened for `source_uri`.
    pub fn volume_of(&self, source_uri: &str) -> Option<f32> {
        self.volumes
            .get(source_uri)
            .map(|v| f32::from_bits(v.load(Ordering::SeqCst)))
    }
}

impl EngineBackend for HeadlessBackend {
    fn open(&mut self, source_uri: &str) -> Box<dyn PlaybackEngine> {
        self.opened.push(source_uri.to_string());
        let media = self.media.get(source_uri).cloned().unwrap_or_default();
        let engine = HeadlessEngine::new(self.clock.clone(), media);
        self.volumes
            .insert(source_uri.to_string(), engine.volume.clone());
        Box::new(engine)
    }
}

pub struct HeadlessEngine {
    clock: HeadlessClock,
    media: HeadlessMedia,
    opened_at: f64,
    playing: bool,
    /// Position at `anchor_time`; while playing, position advances with the clock from here.
    anchor_position: f64,
    anchor_time: f64,
    /// `f32` bits, shared with the backend.
    volume: Arc<AtomicU32>,
}

impl HeadlessEngine {
    pub fn new(clock: HeadlessClock, media: HeadlessMedia) -> Self {
        let now = clock.now();
        Self {
            clock,
            media,
            opened_at: now,
            playing: false,
            anchor_position: 0.0,
            anchor_time: now,
            volume: Arc::new(AtomicU32::new(1.0f32.to_bits())),
        }
    }

    pub fn volume(&self) -> f32 {
        f32::from_bits(self.volume.load(Ordering::SeqCst))
    }

    fn anchor(&mut self, position: f64) {
        self.anchor_position = position;
        self.anchor_time = self.clock.now();
    }

    fn ended(&self) -> bool {
        self.position() >= self.media.duration
    }
}

impl PlaybackEngine for HeadlessEngine {
    fn play(&mut self) {
        if self.media.failure.is_some() || self.media.refuses_play {
            return;
        }
        let start = if self.ended() { 0.0 } else { self.position() };
        self.anchor(start);
        self.playing = true;
    }

    fn pause(&mut self) {
        self.anchor(self.position());
        self.playing = false;
    }

    fn is_playing(&self) -> bool {
        self.playing && !self.ended()
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume.store(volume.to_bits(), Ordering::SeqCst);
    }

    fn position(&self) -> f64 {
        let elapsed = if self.playing {
            self.clock.now() - self.anchor_time
        } else {
            0.0
        };
        (self.anchor_position + elapsed).clamp(0.0, self.media.duration)
    }

    fn seek(&mut self, secs: f64) {
        if self.media.failure.is_some() {
            return;
        }
        self.anchor(secs);
    }

    fn duration(&self) -> Option<f64> {
        if self.media.failure.is_some() {
            return None;
        }
        let loaded = self.clock.now() - self.opened_at >= self.media.load_delay.as_secs_f64();
        loaded.then_some(self.media.duration)
    }

    fn status(&self) -> EngineStatus {
        match (&self.media.failure, self.duration()) {
            (Some(reason), _) => EngineStatus::Failed(reason.clone()),
            (None, Some(_)) => EngineStatus::Ready,
            (None, None) => EngineStatus::Loading,
        }
    }
}
