use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::transport::{GenerateRequest, Transport, TransportError};
use super::types::{ControllerOptions, SendOptions, SessionId, SessionStatus, Snapshot};
use crate::patch::{apply_op, Patch, PatchDecoder};
use crate::tree::Tree;

/// Owns at most one running session and publishes its snapshots.
///
/// Cloning yields another handle onto the same controller.
pub struct SessionController<T> {
    transport: Arc<T>,
    options: ControllerOptions,
    shared: Arc<Shared>,
}

impl<T> Clone for SessionController<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            options: self.options.clone(),
            shared: self.shared.clone(),
        }
    }
}

struct Shared {
    snapshot: watch::Sender<Snapshot>,
    next_id: AtomicU64,
    active: Mutex<Option<ActiveSession>>,
}

struct ActiveSession {
    id: SessionId,
    cancel: CancellationToken,
}

impl Shared {
    fn active(&self) -> MutexGuard<'_, Option<ActiveSession>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Transport> SessionController<T> {
    pub fn new(transport: T, options: ControllerOptions) -> Self {
        let (snapshot, _) = watch::channel(Snapshot::idle());
        Self {
            transport: Arc::new(transport),
            options,
            shared: Arc::new(Shared {
                snapshot,
                next_id: AtomicU64::new(0),
                active: Mutex::new(None),
            }),
        }
    }

    /// Start a new session, superseding the running one if any.
    ///
    /// The session's loop is spawned onto the current tokio runtime; this
    /// panics when called outside of one, like `tokio::spawn`.
    pub fn send(&self, prompt: impl Into<String>, options: SendOptions) -> SessionHandle {
        let SendOptions {
            previous_tree,
            context,
        } = options;
        let seeded = previous_tree.filter(|tree| !tree.root.is_empty());
        let baseline = Arc::new(seeded.as_ref().map(Tree::seeded_from).unwrap_or_default());
        let cancel = CancellationToken::new();

        let id = {
            let mut active = self.shared.active();
            if let Some(previous) = active.take() {
                previous.cancel.cancel();
                tracing::debug!(session = previous.id, "session superseded");
            }
            let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed) + 1;
            *active = Some(ActiveSession {
                id,
                cancel: cancel.clone(),
            });
            self.shared.snapshot.send_replace(Snapshot {
                session: id,
                status: SessionStatus::Sending,
                tree: Some(baseline.clone()),
                error: None,
            });
            id
        };
        tracing::debug!(session = id, seeded = seeded.is_some(), "session sending");

        let request = GenerateRequest {
            prompt: prompt.into(),
            context,
            current_tree: seeded,
            cancel: cancel.clone(),
        };
        let session = SessionLoop {
            id,
            cancel: cancel.clone(),
            shared: self.shared.clone(),
            decoder: PatchDecoder::new(self.options.decoder.clone()),
            tree: baseline,
        };
        let task = tokio::spawn(session.run(self.transport.clone(), request));
        SessionHandle { id, cancel, task }
    }

    /// Cancel the running session. The partial tree stays published.
    pub fn cancel(&self) {
        let mut active = self.shared.active();
        let Some(session) = active.take() else {
            return;
        };
        session.cancel.cancel();
        self.shared.snapshot.send_if_modified(|snap| {
            if snap.session != session.id || snap.status.is_terminal() {
                return false;
            }
            snap.status = SessionStatus::Cancelled;
            true
        });
        tracing::debug!(session = session.id, "session cancelled");
    }

    /// Drop the published tree and error. Session state is left alone.
    pub fn clear(&self) {
        self.shared.snapshot.send_modify(|snap| {
            snap.tree = None;
            snap.error = None;
        });
    }
}

impl<T> SessionController<T> {
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.shared.snapshot.subscribe()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.shared.snapshot.borrow().clone()
    }

    pub fn is_streaming(&self) -> bool {
        self.shared.snapshot.borrow().is_streaming()
    }

    pub fn status(&self) -> SessionStatus {
        self.shared.snapshot.borrow().status
    }

    pub fn error(&self) -> Option<TransportError> {
        self.shared.snapshot.borrow().error.clone()
    }

    pub fn tree(&self) -> Option<Arc<Tree>> {
        self.shared.snapshot.borrow().tree.clone()
    }

    /// Id of the most recently started session, `0` before the first send.
    pub fn current_session(&self) -> SessionId {
        self.shared.snapshot.borrow().session
    }
}

impl<T> std::fmt::Debug for SessionController<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snap = self.shared.snapshot.borrow();
        f.debug_struct("SessionController")
            .field("session", &snap.session)
            .field("status", &snap.status)
            .finish()
    }
}

/// A started session.
#[derive(Debug)]
pub struct SessionHandle {
    id: SessionId,
    cancel: CancellationToken,
    task: JoinHandle<SessionStatus>,
}

impl SessionHandle {
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Cancel this session only; a newer session is unaffected.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the session's terminal status.
    pub async fn finished(self) -> SessionStatus {
        match self.task.await {
            Ok(status) => status,
            Err(err) => {
                tracing::warn!(session = self.id, error = %err, "session task failed");
                SessionStatus::Errored
            }
        }
    }
}

enum Exit {
    Completed,
    Cancelled,
    Faulted(TransportError),
}

/// The decode/apply loop of one session.
struct SessionLoop {
    id: SessionId,
    cancel: CancellationToken,
    shared: Arc<Shared>,
    decoder: PatchDecoder,
    tree: Arc<Tree>,
}

impl SessionLoop {
    async fn run<T: Transport>(mut self, transport: Arc<T>, request: GenerateRequest) -> SessionStatus {
        let exit = self.drive(transport.as_ref(), request).await;
        self.settle(exit)
    }

    async fn drive<T: Transport>(&mut self, transport: &T, request: GenerateRequest) -> Exit {
        let opened = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Exit::Cancelled,
            opened = transport.open(request) => opened,
        };
        let mut stream = match opened {
            Ok(stream) => stream,
            Err(err) => return Exit::Faulted(err),
        };

        let mut streaming = false;
        loop {
            let next = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Exit::Cancelled,
                next = stream.next() => next,
            };
            let patches = match next {
                Some(Ok(fragment)) => {
                    if !streaming {
                        streaming = true;
                        if !self.publish(|snap| snap.status = SessionStatus::Streaming) {
                            return Exit::Cancelled;
                        }
                        tracing::debug!(session = self.id, "session streaming");
                    }
                    self.decoder.push(&fragment)
                }
                Some(Err(err)) => return Exit::Faulted(err),
                None => {
                    let tail = self.decoder.finish();
                    return if self.apply_all(tail) {
                        Exit::Completed
                    } else {
                        Exit::Cancelled
                    };
                }
            };
            if !self.apply_all(patches) {
                return Exit::Cancelled;
            }
        }
    }

    /// Apply and publish one patch at a time. Returns `false` once this
    /// session may no longer publish.
    fn apply_all(&mut self, patches: Vec<Patch>) -> bool {
        for patch in patches {
            let mut next = Tree::clone(&self.tree);
            if !apply_op(&mut next, &patch) {
                tracing::trace!(session = self.id, op = patch.op.as_str(), path = %patch.path, "patch was a no-op");
                continue;
            }
            let next = Arc::new(next);
            if !self.publish(|snap| snap.tree = Some(next.clone())) {
                return false;
            }
            self.tree = next;
        }
        true
    }

    /// Publish only while this session is current and not cancelled. The
    /// check runs under the channel's write lock, so a superseding `send`
    /// cannot interleave with it.
    fn publish(&self, update: impl FnOnce(&mut Snapshot)) -> bool {
        self.shared.snapshot.send_if_modified(|snap| {
            if snap.session != self.id || self.cancel.is_cancelled() {
                return false;
            }
            update(snap);
            true
        })
    }

    fn settle(&self, exit: Exit) -> SessionStatus {
        let (status, error) = match exit {
            _ if self.cancel.is_cancelled() => (SessionStatus::Cancelled, None),
            Exit::Completed => (SessionStatus::Completed, None),
            Exit::Cancelled => (SessionStatus::Cancelled, None),
            Exit::Faulted(err) => {
                tracing::warn!(session = self.id, error = %err, "session transport failed");
                (SessionStatus::Errored, Some(err))
            }
        };

        let mut active = self.shared.active();
        if active.as_ref().is_some_and(|session| session.id == self.id) {
            *active = None;
            self.shared.snapshot.send_if_modified(|snap| {
                if snap.session != self.id {
                    return false;
                }
                snap.status = status;
                snap.error = error;
                true
            });
        }
        tracing::debug!(session = self.id, status = status.as_str(), "session finished");
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::transport::FragmentStream;
    use async_trait::async_trait;
    use futures::stream;

    struct Lines(&'static str);

    #[async_trait]
    impl Transport for Lines {
        async fn open(&self, _request: GenerateRequest) -> Result<FragmentStream, TransportError> {
            let fragments: Vec<Result<Vec<u8>, TransportError>> =
                self.0.as_bytes().chunks(7).map(|c| Ok(c.to_vec())).collect();
            Ok(stream::iter(fragments).boxed())
        }
    }

    struct Refuses;

    #[async_trait]
    impl Transport for Refuses {
        async fn open(&self, _request: GenerateRequest) -> Result<FragmentStream, TransportError> {
            Err(TransportError::Request("503".into()))
        }
    }

    #[tokio::test]
    async fn cancel_after_completion_keeps_status() {
        let controller = SessionController::new(
            Lines("{\"op\":\"set\",\"path\":\"/root\",\"value\":\"r\"}\n"),
            ControllerOptions::default(),
        );
        let status = controller.send("go", SendOptions::default()).finished().await;
        assert!(status.is_terminal());
        controller.cancel();
        assert_eq!(controller.status(), SessionStatus::Completed);
    }

    #[tokio::test]
    async fn idle_before_first_send() {
        let controller = SessionController::new(Lines(""), ControllerOptions::default());
        assert_eq!(controller.snapshot(), Snapshot::idle());
        assert!(!controller.is_streaming());
        controller.cancel();
        assert_eq!(controller.status(), SessionStatus::Idle);
    }

    #[tokio::test]
    async fn completes_and_keeps_tree() {
        let controller = SessionController::new(
            Lines("{\"op\":\"set\",\"path\":\"/root\",\"value\":\"r\"}\n"),
            ControllerOptions::default(),
        );
        let handle = controller.send("go", SendOptions::default());
        assert_eq!(handle.id(), 1);
        assert_eq!(handle.finished().await, SessionStatus::Completed);
        assert_eq!(controller.status(), SessionStatus::Completed);
        assert_eq!(controller.tree().unwrap().root, "r");
        assert_eq!(controller.error(), None);
    }

    #[tokio::test]
    async fn open_failure_is_errored() {
        let controller = SessionController::new(Refuses, ControllerOptions::default());
        let handle = controller.send("go", SendOptions::default());
        assert_eq!(handle.finished().await, SessionStatus::Errored);
        assert_eq!(controller.error(), Some(TransportError::Request("503".into())));
        assert_eq!(controller.tree().as_deref(), Some(&Tree::new()));
    }

    #[tokio::test]
    async fn ids_increase() {
        let controller = SessionController::new(Lines(""), ControllerOptions::default());
        let first = controller.send("a", SendOptions::default());
        let second = controller.send("b", SendOptions::default());
        assert!(second.id() > first.id());
        assert_eq!(controller.current_session(), second.id());
        assert_eq!(first.finished().await, SessionStatus::Cancelled);
        assert_eq!(second.finished().await, SessionStatus::Completed);
    }
}
