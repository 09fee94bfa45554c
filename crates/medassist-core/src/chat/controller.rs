//! Chat controller orchestrating one conversation against the backend.
//!
//! The controller owns the pending input buffer, pending attachments, the
//! backend session id, and the [`TurnState`]. A turn is optimistic: the user
//! message is appended before the backend answers, and any failure restores
//! the pre-turn message list together with the draft that failed to send.
//!
//! Turns are serialized by `&mut self`. If a turn future is dropped before it
//! completes, the state stays busy and further submissions are refused until
//! [`ChatController::stop`] is called.

use std::sync::Arc;

use medassist_types::attachment::Attachment;
use medassist_types::chat::ChatMessage;
use medassist_types::error::{ApiError, ChatError, StorageError};
use medassist_types::remote::{ChatReply, DeleteAck};
use medassist_types::turn::TurnState;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::chat::attachments::{compose_message, process_attachments};
use crate::chat::pinned::PinnedFiles;
use crate::chat::store::SessionStore;
use crate::remote::backend::ChatBackend;
use crate::storage::kv_store::{KvStore, SESSION_ID_KEY};

/// Drives chat turns for a single local conversation.
///
/// Generic over `ChatBackend` and `KvStore` so tests can substitute
/// in-memory fakes for the HTTP client and the durable store.
pub struct ChatController<B: ChatBackend, K: KvStore> {
    backend: Arc<B>,
    kv: Arc<K>,
    store: SessionStore<K>,
    pins: PinnedFiles<K>,
    session_id: Option<String>,
    input: String,
    attachments: Vec<Attachment>,
    state: TurnState,
}

impl<B: ChatBackend, K: KvStore> ChatController<B, K> {
    /// Restore messages, pinned files, and the session id from `kv`.
    pub async fn load(backend: Arc<B>, kv: Arc<K>) -> Self {
        let store = SessionStore::load(kv.clone()).await;
        let pins = PinnedFiles::load(kv.clone()).await;
        let session_id = load_session_id(kv.as_ref()).await;

        Self {
            backend,
            kv,
            store,
            pins,
            session_id,
            input: String::new(),
            attachments: Vec::new(),
            state: TurnState::Idle,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.store.messages()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn state(&self) -> &TurnState {
        &self.state
    }

    pub fn pins(&self) -> &PinnedFiles<K> {
        &self.pins
    }

    pub fn pins_mut(&mut self) -> &mut PinnedFiles<K> {
        &mut self.pins
    }

    // --- Draft ---

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn attach(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn clear_attachments(&mut self) {
        self.attachments.clear();
    }

    // --- Turns ---

    /// Send the pending input (and attachments) as one turn.
    ///
    /// Returns the assistant reply, or `None` when there was nothing to send.
    pub async fn submit(&mut self) -> Result<Option<ChatMessage>, ChatError> {
        if self.state.is_busy() {
            return Err(ChatError::Busy);
        }
        if self.input.trim().is_empty() && self.attachments.is_empty() {
            debug!("Nothing to submit");
            return Ok(None);
        }

        let text = std::mem::take(&mut self.input);
        let attachments = std::mem::take(&mut self.attachments);
        let snapshot = self.store.snapshot();
        self.run_turn(text, attachments, snapshot).await.map(Some)
    }

    /// Drop the latest message and send the latest user message again.
    ///
    /// Needs at least two messages; otherwise a no-op returning `None`.
    /// Pending attachments are left alone. On failure the input buffer is
    /// replaced by the regenerated text, discarding any draft typed before.
    pub async fn regenerate_last(&mut self) -> Result<Option<ChatMessage>, ChatError> {
        if self.state.is_busy() {
            return Err(ChatError::Busy);
        }
        if self.store.len() < 2 {
            return Ok(None);
        }
        let Some(text) = self.store.last_user_content().map(str::to_string) else {
            return Ok(None);
        };

        let snapshot = self.store.snapshot();
        self.store.pop_last().await?;
        info!("Regenerating last reply");
        self.run_turn(text, Vec::new(), snapshot).await.map(Some)
    }

    /// Return to `Idle`. Does not cancel a request already on the wire.
    pub fn stop(&mut self) {
        if self.state != TurnState::Idle {
            info!(from = %self.state, "Turn stopped");
        }
        self.transition(TurnState::Idle);
    }

    /// Forget the conversation locally: messages and session id.
    /// Pinned files are kept.
    ///
    /// The session id goes first so a failure never leaves an old session
    /// attached to an emptied conversation.
    pub async fn clear(&mut self) -> Result<(), ChatError> {
        self.forget_session().await?;
        self.store.clear().await?;
        self.transition(TurnState::Idle);
        info!("Conversation cleared");
        Ok(())
    }

    /// Delete a session on the backend. Deleting the active session also
    /// forgets its id locally so the next turn starts a new one.
    pub async fn delete_remote(&mut self, session_id: &str) -> Result<DeleteAck, ChatError> {
        let ack = self.backend.delete_chat(session_id).await?;
        if self.session_id.as_deref() == Some(session_id) {
            self.forget_session().await?;
        }
        info!(session_id = %session_id, "Remote session deleted");
        Ok(ack)
    }

    async fn run_turn(
        &mut self,
        text: String,
        attachments: Vec<Attachment>,
        snapshot: Vec<ChatMessage>,
    ) -> Result<ChatMessage, ChatError> {
        match self.exchange(&text, &attachments).await {
            Ok(reply) => {
                self.transition(TurnState::Idle);
                Ok(reply)
            }
            Err(err) => {
                warn!("Turn failed, rolling back: {err}");
                if let Err(e) = self.store.restore(snapshot).await {
                    warn!("Failed to persist rollback: {e}");
                }
                self.input = text;
                if !attachments.is_empty() {
                    self.attachments = attachments;
                }
                self.transition(TurnState::Error(err.to_string()));
                Err(err)
            }
        }
    }

    async fn exchange(
        &mut self,
        text: &str,
        attachments: &[Attachment],
    ) -> Result<ChatMessage, ChatError> {
        let mut content = text.trim().to_string();

        if !attachments.is_empty() {
            self.transition(TurnState::AwaitingFileUpload);
            let batch =
                process_attachments(self.backend.as_ref(), self.session_id.as_deref(), attachments)
                    .await?;
            if batch.created_session {
                self.adopt_session(batch.session_id.clone()).await?;
            }
            content = compose_message(&content, &batch.summary());
        }

        self.store.append_user(&content).await?;
        self.transition(TurnState::AwaitingReply);

        let reply = match self.session_id.clone() {
            Some(session_id) => {
                self.backend
                    .send_message(&session_id, &content, &[])
                    .await?
            }
            None => {
                let reply = self.backend.create_new_chat(&content).await?;
                let session_id = new_session_id(&reply)?;
                self.adopt_session(session_id).await?;
                reply
            }
        };

        let message = self
            .store
            .append_assistant(&reply.content, reply.sources)
            .await?;
        Ok(message)
    }

    async fn adopt_session(&mut self, session_id: String) -> Result<(), StorageError> {
        self.kv
            .set(SESSION_ID_KEY, &Value::String(session_id.clone()))
            .await?;
        info!(session_id = %session_id, "Backend session assigned");
        self.session_id = Some(session_id);
        Ok(())
    }

    async fn forget_session(&mut self) -> Result<(), StorageError> {
        self.kv.delete(SESSION_ID_KEY).await?;
        self.session_id = None;
        Ok(())
    }

    fn transition(&mut self, next: TurnState) {
        debug_assert!(
            self.state.can_transition_to(&next),
            "illegal turn transition {} -> {}",
            self.state,
            next
        );
        debug!(from = %self.state, to = %next, "Turn state");
        self.state = next;
    }
}

fn new_session_id(reply: &ChatReply) -> Result<String, ApiError> {
    reply
        .session_id
        .clone()
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| {
            ApiError::Deserialization("new chat response carried no session_id".to_string())
        })
}

async fn load_session_id<K: KvStore>(kv: &K) -> Option<String> {
    match kv.get(SESSION_ID_KEY).await {
        Ok(Some(Value::String(id))) if !id.is_empty() => Some(id),
        Ok(Some(other)) => {
            warn!("Ignoring malformed saved session id: {other}");
            None
        }
        Ok(None) => None,
        Err(e) => {
            warn!("Failed to read saved session id: {e}");
            None
        }
    }
}
