//! Message id generation.

use chrono::Utc;
use medassist_types::chat::MessageId;

/// Hands out wall-clock millisecond ids that never repeat or go backwards,
/// even when two messages are created within the same millisecond or the
/// clock steps back.
#[derive(Debug, Clone, Default)]
pub struct MessageIdGenerator {
    last: i64,
}

impl MessageIdGenerator {
    /// Start after the largest id already in use.
    pub fn after(last: Option<MessageId>) -> Self {
        Self {
            last: last.map(|id| id.0).unwrap_or(0),
        }
    }

    pub fn next(&mut self) -> MessageId {
        self.next_at(Utc::now().timestamp_millis())
    }

    fn next_at(&mut self, now_ms: i64) -> MessageId {
        self.last = now_ms.max(self.last + 1);
        MessageId(self.last)
    }
}
