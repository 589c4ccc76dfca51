use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::config::PlaybackSettings;
use crate::engine::EngineBackend;
use crate::error::{EngineError, SessionError};

use super::thread::spawn_session_thread;
use super::types::{SessionCmd, SessionHandle, SessionSnapshot};

pub struct SessionPlayer {
    tx: Sender<SessionCmd>,
    session: SessionHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl SessionPlayer {
    /// Start a session over `sources` (first one leads) on its own thread.
    ///
    /// Returns once the backend and every track are open, or with the
    /// construction error. An empty source list fails before any thread starts.
    pub fn spawn<B, F>(
        sources: Vec<String>,
        settings: PlaybackSettings,
        make_backend: F,
    ) -> Result<Self, SessionError>
    where
        B: EngineBackend + 'static,
        F: FnOnce() -> Result<B, EngineError> + Send + 'static,
    {
        if sources.is_empty() {
            return Err(SessionError::EmptySourceList);
        }

        let (tx, rx) = mpsc::channel::<SessionCmd>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), SessionError>>();
        let session: SessionHandle = Arc::new(Mutex::new(SessionSnapshot::default()));

        let handle = spawn_session_thread(
            sources,
            settings,
            make_backend,
            rx,
            session.clone(),
            ready_tx,
        );

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                tx,
                session,
                join: Mutex::new(Some(handle)),
            }),
            Ok(Err(err)) => {
                let _ = handle.join();
                Err(err)
            }
            Err(_) => {
                let _ = handle.join();
                Err(SessionError::PlayerGone)
            }
        }
    }

    pub fn session_handle(&self) -> SessionHandle {
        self.session.clone()
    }

    /// Copy of the most recently published snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.session
            .lock()
            .map(|s| s.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn send(&self, cmd: SessionCmd) -> Result<(), SessionError> {
        self.tx.send(cmd).map_err(|_| SessionError::PlayerGone)
    }

    pub fn play(&self) -> Result<(), SessionError> {
        self.send(SessionCmd::Play)
    }

    pub fn pause(&self) -> Result<(), SessionError> {
        self.send(SessionCmd::Pause)
    }

    pub fn toggle_playback(&self) -> Result<(), SessionError> {
        self.send(SessionCmd::TogglePlayback)
    }

    pub fn set_volume(&self, index: usize, volume: f32) -> Result<(), SessionError> {
        self.send(SessionCmd::SetVolume { index, volume })
    }

    /// Seek every track to `secs`; returns after all of them were instructed.
    pub fn seek_to(&self, secs: f64) -> Result<(), SessionError> {
        let (ack, done) = mpsc::channel();
        self.send(SessionCmd::SeekTo { secs, ack })?;
        done.recv().map_err(|_| SessionError::PlayerGone)
    }

    /// Dispose the session and wait for the thread to finish.
    pub fn quit(&self) {
        let _ = self.send(SessionCmd::Quit);

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl Drop for SessionPlayer {
    fn drop(&mut self) {
        self.quit();
    }
}
