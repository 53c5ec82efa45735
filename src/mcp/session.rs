//! Session registry for the protocol gateway.
//!
//! A session binds one identifier to at most one live transport handle.
//! Both HTTP transport adapters share this registry and its contract:
//! create on `initialize` or stream-open, look up by identifier on every
//! subsequent use, tear down explicitly or on transport failure. A
//! terminated identifier is removed and never matched again: reuse is
//! rejected, not treated as a fresh create.
//!
//! Registry operations hold the lock only for the duration of the map
//! mutation, never across an await point, so interleaved request handling
//! cannot observe a half-applied transition.

use crate::{Error, Result, current_timestamp_ms};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Capacity of a session's push-frame channel.
pub const FRAME_CHANNEL_CAPACITY: usize = 64;

/// A server-pushed frame destined for a session's event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    /// SSE event name (`endpoint`, `message`).
    pub event: &'static str,
    /// Frame payload.
    pub data: String,
}

/// Sending half of a session's push channel.
pub type FrameSender = mpsc::Sender<SseFrame>;

/// Receiving half of a session's push channel.
pub type FrameReceiver = mpsc::Receiver<SseFrame>;

/// How a session exchanges identity and frames with its client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    /// Identifier travels in the `Mcp-Session-Id` header; a push channel
    /// is optional and the session outlives it.
    Stateless,
    /// The event stream is the session: its teardown terminates the
    /// session.
    Duplex,
}

impl SessionKind {
    /// Metric label for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stateless => "stateless",
            Self::Duplex => "duplex",
        }
    }
}

/// An attached push channel. The epoch distinguishes successive channels
/// on the same session so a replaced channel's teardown cannot detach its
/// successor.
#[derive(Debug)]
struct ChannelHandle {
    epoch: u64,
    tx: FrameSender,
}

/// Session lifecycle state. `Pending` exists only during the creation
/// round-trip; `Closed` is terminal.
#[derive(Debug, Default)]
enum SessionState {
    /// Being created; not yet routable.
    #[default]
    Pending,
    /// Registered and routable, with at most one live push channel.
    Active {
        /// The push channel, if one is attached.
        channel: Option<ChannelHandle>,
    },
    /// Terminated; the identifier is never matched again.
    Closed,
}

/// One logical client conversation.
#[derive(Debug)]
pub struct Session {
    id: String,
    kind: SessionKind,
    created_at_ms: u64,
    state: SessionState,
    next_epoch: u64,
}

impl Session {
    /// Creates a pending session with a fresh identifier.
    fn new(kind: SessionKind) -> Self {
        Self {
            id: mint_session_id(),
            kind,
            created_at_ms: current_timestamp_ms(),
            state: SessionState::Pending,
            next_epoch: 0,
        }
    }

    /// Returns the session identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the session kind.
    #[must_use]
    pub const fn kind(&self) -> SessionKind {
        self.kind
    }

    /// Returns the creation timestamp in Unix milliseconds.
    #[must_use]
    pub const fn created_at_ms(&self) -> u64 {
        self.created_at_ms
    }

    /// Transitions `Pending → Active`, optionally with an initial channel.
    fn activate(&mut self, tx: Option<FrameSender>) {
        let channel = tx.map(|tx| ChannelHandle {
            epoch: self.bump_epoch(),
            tx,
        });
        self.state = SessionState::Active { channel };
    }

    /// Attaches (or replaces) the push channel. Returns the new channel's
    /// epoch. Fails unless the session is active.
    fn attach(&mut self, tx: FrameSender) -> Result<u64> {
        let epoch = self.bump_epoch();
        match &mut self.state {
            SessionState::Active { channel } => {
                *channel = Some(ChannelHandle { epoch, tx });
                Ok(epoch)
            },
            SessionState::Pending | SessionState::Closed => {
                Err(Error::SessionNotFound(self.id.clone()))
            },
        }
    }

    /// Detaches the push channel if `epoch` still identifies it. A stale
    /// epoch (channel already replaced) is a no-op.
    fn detach(&mut self, epoch: u64) {
        if let SessionState::Active { channel } = &mut self.state {
            if channel.as_ref().is_some_and(|c| c.epoch == epoch) {
                *channel = None;
            }
        }
    }

    /// Returns a clone of the push channel sender, if attached.
    fn sender(&self) -> Option<FrameSender> {
        match &self.state {
            SessionState::Active {
                channel: Some(handle),
            } => Some(handle.tx.clone()),
            _ => None,
        }
    }

    /// Transitions to `Closed`, dropping any attached channel.
    fn close(&mut self) {
        self.state = SessionState::Closed;
    }

    fn bump_epoch(&mut self) -> u64 {
        self.next_epoch += 1;
        self.next_epoch
    }
}

/// Generates a fresh session identifier: a timestamp combined with a
/// random component so identifiers cannot collide accidentally.
fn mint_session_id() -> String {
    format!(
        "mcp-{}-{}",
        current_timestamp_ms(),
        Uuid::new_v4().simple()
    )
}

/// Shared registry mapping session identifier → session.
///
/// Cloning is cheap; all clones observe the same registry.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<Mutex<HashMap<String, Session>>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates and registers a session, returning its identifier.
    ///
    /// The session is activated (with `tx` as its channel, if given)
    /// before the identifier is released to the caller, so a looked-up
    /// session is always routable.
    pub fn create(&self, kind: SessionKind, tx: Option<FrameSender>) -> String {
        let mut session = Session::new(kind);
        session.activate(tx);
        let id = session.id.clone();

        self.lock().insert(id.clone(), session);
        metrics::counter!("mcp_sessions_created_total", "kind" => kind.as_str()).increment(1);
        tracing::info!(session_id = %id, kind = kind.as_str(), "Session created");

        id
    }

    /// Returns whether `id` names a live session.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.lock().contains_key(id)
    }

    /// Attaches (or replaces) the push channel of a live session,
    /// returning the channel's epoch for later [`detach_channel`] calls.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionNotFound`] if `id` is not registered.
    ///
    /// [`detach_channel`]: Self::detach_channel
    pub fn attach_channel(&self, id: &str, tx: FrameSender) -> Result<u64> {
        let mut sessions = self.lock();
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))?;
        session.attach(tx)
    }

    /// Detaches a session's push channel if `epoch` still identifies it.
    /// Unknown identifiers and stale epochs are no-ops.
    pub fn detach_channel(&self, id: &str, epoch: u64) {
        if let Some(session) = self.lock().get_mut(id) {
            session.detach(epoch);
        }
    }

    /// Delivers a frame to a session's push channel.
    ///
    /// The sender is cloned out of the registry before awaiting so the
    /// lock is never held across the send. Frames for one session are
    /// delivered in enqueue order; nothing is promised across sessions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionNotFound`] if the session is unknown, has
    /// no channel, or its receiver has gone away.
    pub async fn push(&self, id: &str, frame: SseFrame) -> Result<()> {
        let tx = self
            .lock()
            .get(id)
            .and_then(Session::sender)
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))?;

        tx.send(frame)
            .await
            .map_err(|_| Error::SessionNotFound(id.to_string()))
    }

    /// Terminates a session: `Active → Closed`, then removed from the
    /// registry. Any later use of the identifier, including a second
    /// terminate, reports not-found.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionNotFound`] if `id` is not registered.
    pub fn terminate(&self, id: &str) -> Result<()> {
        let mut sessions = self.lock();
        let mut session = sessions
            .remove(id)
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))?;
        session.close();
        drop(sessions);

        metrics::counter!("mcp_sessions_terminated_total", "kind" => session.kind.as_str())
            .increment(1);
        tracing::info!(session_id = %id, "Session terminated");
        Ok(())
    }

    /// Returns the number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns whether no sessions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Session>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
