//! Explicit state of the current chat turn.
//!
//! Replaces independent loading/typing/error flags with one enum whose
//! transitions are checked in one place.

use std::fmt;

/// Where the controller is within a turn.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TurnState {
    #[default]
    Idle,
    AwaitingFileUpload,
    AwaitingReply,
    /// The last turn failed; the message is shown to the user.
    Error(String),
}

impl TurnState {
    /// A request is in flight (or was abandoned mid-flight and not stopped).
    pub fn is_busy(&self) -> bool {
        matches!(self, TurnState::AwaitingFileUpload | TurnState::AwaitingReply)
    }

    /// Whether `next` is a legal successor of `self`.
    ///
    /// `Idle`/`Error` start a turn, upload leads to reply, and any state may
    /// go back to `Idle` (stop) or to `Error` (failure).
    pub fn can_transition_to(&self, next: &TurnState) -> bool {
        use TurnState::*;
        match (self, next) {
            (_, Idle) | (_, Error(_)) => true,
            (Idle | Error(_), AwaitingFileUpload | AwaitingReply) => true,
            (AwaitingFileUpload, AwaitingReply) => true,
            _ => false,
        }
    }
}

impl fmt::Display for TurnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnState::Idle => write!(f, "idle"),
            TurnState::AwaitingFileUpload => write!(f, "processing files"),
            TurnState::AwaitingReply => write!(f, "awaiting reply"),
            TurnState::Error(msg) => write!(f, "error: {msg}"),
        }
    }
}
