//! `rodio`-backed engines playing local files through the default output device.
//!
//! Seeking rebuilds the sink and skips into the file, the same primitive
//! used for scrubbing: it works for every format the decoder supports.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use lofty::prelude::AudioFile;
use log::{debug, warn};
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use crate::error::EngineError;

use super::types::{EngineBackend, EngineStatus, PlaybackEngine};

/// Opens one `RodioEngine` per source, all mixed into a single output stream.
pub struct RodioBackend {
    stream: Rc<OutputStream>,
}

impl RodioBackend {
    pub fn open_default() -> Result<Self, EngineError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| EngineError::OutputStream(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped; sessions drop it on teardown.
        stream.log_on_drop(false);
        Ok(Self {
            stream: Rc::new(stream),
        })
    }
}

impl EngineBackend for RodioBackend {
    fn open(&mut self, source_uri: &str) -> Box<dyn PlaybackEngine> {
        Box::new(RodioEngine::open(self.stream.clone(), source_uri))
    }
}

pub struct RodioEngine {
    stream: Rc<OutputStream>,
    path: Option<PathBuf>,
    sink: Option<Sink>,
    /// Position the current sink started at; `Sink::get_pos` counts from zero.
    offset: Duration,
    volume: f32,
    duration: Option<f64>,
    failure: Option<String>,
    /// Last `play`/`pause` request; survives the sink running dry.
    wants_play: bool,
}

impl RodioEngine {
    fn open(stream: Rc<OutputStream>, source_uri: &str) -> Self {
        let mut engine = Self {
            stream,
            path: None,
            sink: None,
            offset: Duration::ZERO,
            volume: 1.0,
            duration: None,
            failure: None,
            wants_play: false,
        };
        match local_path(source_uri) {
            Ok(path) => {
                engine.path = Some(path);
                engine.rebuild(Duration::ZERO, false);
            }
            Err(err) => engine.fail(err),
        }
        engine
    }

    /// Replace the sink with a fresh one starting at `start_at`.
    fn rebuild(&mut self, start_at: Duration, play: bool) {
        let Some(path) = self.path.as_deref() else {
            return;
        };
        if let Some(old) = self.sink.take() {
            old.stop();
        }

        match create_sink_at(&self.stream, path, start_at) {
            Ok((sink, total)) => {
                sink.set_volume(self.volume);
                if play {
                    sink.play();
                }
                if self.duration.is_none() {
                    self.duration = total
                        .map(|d| d.as_secs_f64())
                        .filter(|d| *d > 0.0)
                        .or_else(|| probe_duration(path));
                }
                debug!("rebuilt sink for {:?} at {:.3}s", path, start_at.as_secs_f64());
                self.sink = Some(sink);
                self.offset = start_at;
            }
            Err(err) => self.fail(err),
        }
    }

    fn fail(&mut self, err: EngineError) {
        warn!("{err}");
        self.failure = Some(err.to_string());
        self.sink = None;
    }
}

impl PlaybackEngine for RodioEngine {
    fn play(&mut self) {
        self.wants_play = true;
        if self.sink.as_ref().is_some_and(|s| s.empty()) {
            // Finished sources restart from the top.
            self.rebuild(Duration::ZERO, true);
            return;
        }
        if let Some(s) = &self.sink {
            s.play();
        }
    }

    fn pause(&mut self) {
        self.wants_play = false;
        if let Some(s) = &self.sink {
            s.pause();
        }
    }

    fn is_playing(&self) -> bool {
        self.sink
            .as_ref()
            .is_some_and(|s| !s.is_paused() && !s.empty())
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(s) = &self.sink {
            s.set_volume(volume);
        }
    }

    fn position(&self) -> f64 {
        let played = self.sink.as_ref().map_or(Duration::ZERO, Sink::get_pos);
        (self.offset + played).as_secs_f64()
    }

    fn seek(&mut self, secs: f64) {
        if self.failure.is_some() {
            return;
        }
        let Some(start_at) = seek_offset(secs) else {
            warn!("ignoring seek to {secs}s: not a playable offset");
            return;
        };
        // A sink that ran dry while playing resumes from the new offset.
        self.rebuild(start_at, self.wants_play);
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn status(&self) -> EngineStatus {
        match (&self.failure, &self.sink) {
            (Some(reason), _) => EngineStatus::Failed(reason.clone()),
            (None, Some(_)) => EngineStatus::Ready,
            (None, None) => EngineStatus::Loading,
        }
    }
}

impl Drop for RodioEngine {
    fn drop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
    }
}

/// Map a source URI to a local path. Remote URIs are not fetched.
pub(super) fn local_path(source_uri: &str) -> Result<PathBuf, EngineError> {
    if let Some(rest) = source_uri.strip_prefix("file://") {
        return Ok(PathBuf::from(rest));
    }
    if source_uri.contains("://") {
        // Drop the query so signed-URL credentials stay out of logs.
        let uri = source_uri.split('?').next().unwrap_or(source_uri);
        return Err(EngineError::UnsupportedSource {
            uri: uri.to_string(),
        });
    }
    Ok(PathBuf::from(source_uri))
}

/// Seek target as a sink offset. Negative targets start at zero; NaN,
/// infinite and out-of-range targets have no offset.
pub(super) fn seek_offset(secs: f64) -> Option<Duration> {
    if secs.is_nan() {
        return None;
    }
    Duration::try_from_secs_f64(secs.max(0.0)).ok()
}

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
fn create_sink_at(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), EngineError> {
    let file = File::open(path).map_err(|source| EngineError::Open {
        path: path.display().to_string(),
        source,
    })?;

    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| EngineError::Decode {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let total = decoder.total_duration();
    let source = decoder.skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok((sink, total))
}

/// Read the duration from the file's tags when the decoder cannot tell.
fn probe_duration(path: &Path) -> Option<f64> {
    lofty::read_from_path(path)
        .ok()
        .map(|tagged| tagged.properties().duration().as_secs_f64())
        .filter(|d| *d > 0.0)
}
