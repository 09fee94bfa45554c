//! Session store: the conversation's message list and its local durability.
//!
//! Every mutation builds the next message list, writes it in full under
//! [`CONVERSATION_KEY`], and only then replaces the in-memory list. A failed
//! write therefore leaves memory and storage agreeing on the previous state.

use std::sync::Arc;

use medassist_types::chat::{ChatMessage, Source};
use medassist_types::error::StorageError;
use serde_json::Value;
use tracing::{debug, warn};

use crate::chat::id::MessageIdGenerator;
use crate::storage::kv_store::{KvStore, CONVERSATION_KEY};

/// Owns the active conversation's messages.
pub struct SessionStore<K: KvStore> {
    kv: Arc<K>,
    messages: Vec<ChatMessage>,
    ids: MessageIdGenerator,
}

impl<K: KvStore> SessionStore<K> {
    /// An empty store that has not read persisted state.
    pub fn new(kv: Arc<K>) -> Self {
        Self {
            kv,
            messages: Vec::new(),
            ids: MessageIdGenerator::default(),
        }
    }

    /// Restore the persisted conversation.
    ///
    /// Missing, unreadable, or malformed records are logged and treated as an
    /// empty conversation; loading never fails.
    pub async fn load(kv: Arc<K>) -> Self {
        let messages = match kv.get(CONVERSATION_KEY).await {
            Ok(Some(value)) => decode_messages(value),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read saved conversation, starting empty: {e}");
                Vec::new()
            }
        };
        debug!(count = messages.len(), "Conversation loaded");

        let ids = MessageIdGenerator::after(messages.iter().map(|m| m.id).max());
        Self { kv, messages, ids }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Content of the most recent user message.
    pub fn last_user_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.is_user())
            .map(|m| m.content.as_str())
    }

    /// Append a user message. Blank content is a no-op and returns `None`.
    pub async fn append_user(
        &mut self,
        content: &str,
    ) -> Result<Option<ChatMessage>, StorageError> {
        if content.trim().is_empty() {
            return Ok(None);
        }
        let message = ChatMessage::user(self.ids.next(), content);
        self.push(message.clone()).await?;
        Ok(Some(message))
    }

    /// Append an assistant reply.
    pub async fn append_assistant(
        &mut self,
        content: &str,
        sources: Vec<Source>,
    ) -> Result<ChatMessage, StorageError> {
        let message = ChatMessage::assistant(self.ids.next(), content, sources);
        self.push(message.clone()).await?;
        Ok(message)
    }

    /// Remove the most recent message.
    pub async fn pop_last(&mut self) -> Result<Option<ChatMessage>, StorageError> {
        let Some((last, rest)) = self.messages.split_last() else {
            return Ok(None);
        };
        let last = last.clone();
        let rest = rest.to_vec();
        self.commit(rest).await?;
        Ok(Some(last))
    }

    /// Copy of the current list, for rollback.
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.clone()
    }

    /// Replace the list with an earlier snapshot.
    pub async fn restore(&mut self, snapshot: Vec<ChatMessage>) -> Result<(), StorageError> {
        self.commit(snapshot).await
    }

    /// Empty the conversation and drop its persisted record.
    pub async fn clear(&mut self) -> Result<(), StorageError> {
        self.kv.delete(CONVERSATION_KEY).await?;
        self.messages.clear();
        Ok(())
    }

    async fn push(&mut self, message: ChatMessage) -> Result<(), StorageError> {
        let mut next = self.messages.clone();
        next.push(message);
        self.commit(next).await
    }

    async fn commit(&mut self, next: Vec<ChatMessage>) -> Result<(), StorageError> {
        let value = serde_json::to_value(&next)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.kv.set(CONVERSATION_KEY, &value).await?;
        self.messages = next;
        Ok(())
    }
}

fn decode_messages(value: Value) -> Vec<ChatMessage> {
    match serde_json::from_value::<Vec<ChatMessage>>(value) {
        Ok(messages) => messages,
        Err(e) => {
            warn!("Saved conversation is malformed, starting empty: {e}");
            Vec::new()
        }
    }
}
