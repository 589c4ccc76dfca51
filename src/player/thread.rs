use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;

use log::{debug, info, warn};

use crate::config::PlaybackSettings;
use crate::engine::EngineBackend;
use crate::error::{EngineError, SessionError};
use crate::session::Coordinator;

use super::types::{SessionCmd, SessionHandle, SessionSnapshot};

/// Start the session thread.
///
/// The backend is built on the thread itself (audio output streams are not
/// `Send`). `ready` receives the construction result before the first command
/// is read.
pub(super) fn spawn_session_thread<B, F>(
    sources: Vec<String>,
    settings: PlaybackSettings,
    make_backend: F,
    rx: Receiver<SessionCmd>,
    session: SessionHandle,
    ready: Sender<Result<(), SessionError>>,
) -> JoinHandle<()>
where
    B: EngineBackend + 'static,
    F: FnOnce() -> Result<B, EngineError> + Send + 'static,
{
    thread::spawn(move || {
        let mut backend = match make_backend() {
            Ok(b) => b,
            Err(err) => {
                let _ = ready.send(Err(SessionError::Backend(err)));
                return;
            }
        };

        let mut coordinator = match Coordinator::new(sources.as_slice(), &mut backend, &settings) {
            Ok(c) => c,
            Err(err) => {
                let _ = ready.send(Err(err));
                return;
            }
        };

        coordinator.tick();
        publish(&session, &coordinator);
        let _ = ready.send(Ok(()));

        let poll = settings.position_interval();
        loop {
            match rx.recv_timeout(poll) {
                Ok(SessionCmd::Quit) => break,
                Ok(cmd) => apply(&mut coordinator, cmd),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            coordinator.tick();
            publish(&session, &coordinator);
        }

        coordinator.dispose();
        publish(&session, &coordinator);
        info!("session thread stopped");
    })
}

fn apply(coordinator: &mut Coordinator, cmd: SessionCmd) {
    debug!("session command: {cmd:?}");
    let result = match cmd {
        SessionCmd::Play => coordinator.play(),
        SessionCmd::Pause => coordinator.pause(),
        SessionCmd::TogglePlayback => coordinator.toggle_playback().map(|_| ()),
        SessionCmd::SeekTo { secs, ack } => {
            let result = coordinator.seek_to(secs);
            // Acked on failure too.
            let _ = ack.send(());
            result
        }
        SessionCmd::SetVolume { index, volume } => match coordinator.volume(index) {
            Some(mut handle) => handle.set(volume).map(|_| ()).map_err(SessionError::from),
            None => {
                warn!("no track at index {index}, ignoring volume change");
                Ok(())
            }
        },
        // Handled by the loop.
        SessionCmd::Quit => Ok(()),
    };

    if let Err(err) = result {
        warn!("session command failed: {err}");
    }
}

fn publish(session: &SessionHandle, coordinator: &Coordinator) {
    if let Ok(mut snapshot) = session.lock() {
        *snapshot = SessionSnapshot::capture(coordinator);
    }
}
