//! Chat session state and the turn that drives it.
//!
//! A [`ChatSession`] is the ordered history of one browser session.  A [`Reframer`] runs one
//! turn against it: append the user's text, ask the model, append the reply if there is one.
//! The [`SessionStore`] hands out one session per session id and forgets sessions that have
//! sat idle longer than its timeout.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;
use uuid::Uuid;

use crate::error::Result;
use crate::model_client::ModelClient;
use crate::observability::{
    SESSION_TURN_FAILURES, SESSION_TURNS, WEB_SESSIONS, WEB_SESSIONS_EVICTED,
};
use crate::prompt::PromptComposer;
use crate::types::MessageParam;

/// The history of one interactive session.
///
/// Messages are only ever appended; nothing edits or removes them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChatSession {
    messages: Vec<MessageParam>,
}

impl ChatSession {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// The history in the order it happened.
    pub fn history(&self) -> &[MessageParam] {
        &self.messages
    }

    /// Returns the number of messages in the conversation.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Returns true before the first submission.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn push(&mut self, message: MessageParam) -> &MessageParam {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }
}

/// Runs turns: compose a prompt, call the model, record the outcome.
#[derive(Clone)]
pub struct Reframer {
    composer: PromptComposer,
    model: Arc<dyn ModelClient>,
}

impl Reframer {
    /// Creates a reframer from a composer and a model client.
    pub fn new(composer: PromptComposer, model: Arc<dyn ModelClient>) -> Self {
        Self { composer, model }
    }

    /// The composer used for every turn.
    pub fn composer(&self) -> &PromptComposer {
        &self.composer
    }

    /// Take one turn for `input`.
    ///
    /// The user's message is appended unconditionally.  The assistant's reply is appended only
    /// when the model call succeeds; on failure the error is returned for the caller to show
    /// and the session stays usable.
    pub async fn take_turn<'a>(
        &self,
        session: &'a mut ChatSession,
        input: &str,
    ) -> Result<&'a MessageParam> {
        SESSION_TURNS.click();
        session.push(MessageParam::user(input));
        let prompt = self.composer.compose(input);
        match self.model.generate(&prompt).await {
            Ok(reply) => Ok(session.push(MessageParam::assistant(reply))),
            Err(err) => {
                SESSION_TURN_FAILURES.click();
                tracing::warn!(
                    error = %err,
                    failure = ?err.failure(),
                    "reframing turn failed"
                );
                Err(err)
            }
        }
    }
}

/// A session that a web request can lock for the length of a turn.
pub type SharedSession = Arc<tokio::sync::Mutex<ChatSession>>;

/// How long a session may go unused before the store drops it.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

struct Entry {
    session: SharedSession,
    last_seen: Instant,
}

/// Every live session, keyed by the id held in the browser's cookie.
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, Entry>>,
    idle_timeout: Duration,
}

impl SessionStore {
    /// Creates an empty store that evicts after [`DEFAULT_IDLE_TIMEOUT`].
    pub fn new() -> Self {
        Self::with_idle_timeout(DEFAULT_IDLE_TIMEOUT)
    }

    /// Creates an empty store that evicts sessions idle for longer than `idle_timeout`.
    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout,
        }
    }

    /// The idle period after which a session is dropped.
    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// Look up a live session without creating one.
    pub fn get(&self, id: Uuid) -> Option<SharedSession> {
        let now = Instant::now();
        let mut sessions = self.sessions.lock();
        self.sweep(&mut sessions, now);
        sessions.get_mut(&id).map(|entry| {
            entry.last_seen = now;
            Arc::clone(&entry.session)
        })
    }

    /// Look up the session for `id`, creating a fresh one when the id is absent, unknown, or
    /// expired.
    ///
    /// Returns the id the caller should remember, which differs from `id` exactly when a new
    /// session was created.
    pub fn get_or_create(&self, id: Option<Uuid>) -> (Uuid, SharedSession) {
        let now = Instant::now();
        let mut sessions = self.sessions.lock();
        self.sweep(&mut sessions, now);
        if let Some(id) = id
            && let Some(entry) = sessions.get_mut(&id)
        {
            entry.last_seen = now;
            return (id, Arc::clone(&entry.session));
        }
        let id = Uuid::new_v4();
        let session = SharedSession::default();
        sessions.insert(
            id,
            Entry {
                session: Arc::clone(&session),
                last_seen: now,
            },
        );
        WEB_SESSIONS.click();
        tracing::debug!(session = %id, "created session");
        (id, session)
    }

    fn sweep(&self, sessions: &mut HashMap<Uuid, Entry>, now: Instant) {
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) <= self.idle_timeout);
        let evicted = before - sessions.len();
        if evicted > 0 {
            WEB_SESSIONS_EVICTED.count(evicted as u64);
            tracing::debug!(evicted, "dropped idle sessions");
        }
    }

    /// The number of sessions held.
    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Returns true when no session is held.
    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
