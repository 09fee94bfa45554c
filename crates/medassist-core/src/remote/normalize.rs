//! Reply normalization.
//!
//! The backend has shipped several reply shapes over time: the current
//! `{ "response": { "content": ... } }`, and older flat `{ "message": ... }`
//! or `{ "content": ... }` bodies. A successful reply is reduced to one
//! content string by trying [`REPLY_RULES`] in order. A 200 response that
//! matches no rule is not an error: the user sees [`FALLBACK_REPLY`].

use medassist_types::chat::Source;
use medassist_types::remote::ChatReply;
use serde_json::Value;
use tracing::{debug, warn};

/// Shown in place of a reply whose content could not be located.
pub const FALLBACK_REPLY: &str = "Unable to display response. Please try again.";

/// One way of locating the reply text inside an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionRule {
    /// Human-readable field path, used in logs.
    pub field: &'static str,
    /// RFC 6901 JSON pointer into the envelope.
    pub pointer: &'static str,
}

impl ExtractionRule {
    /// The non-blank string at this rule's location, if any.
    pub fn apply<'a>(&self, envelope: &'a ReplyEnvelope) -> Option<&'a str> {
        envelope
            .0
            .pointer(self.pointer)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }
}

/// Reply content locations, highest priority first.
pub const REPLY_RULES: &[ExtractionRule] = &[
    ExtractionRule {
        field: "response.content",
        pointer: "/response/content",
    },
    ExtractionRule {
        field: "message",
        pointer: "/message",
    },
    ExtractionRule {
        field: "content",
        pointer: "/content",
    },
];

/// Locations of the optional citation list, highest priority first.
const SOURCE_POINTERS: &[&str] = &["/sources", "/response/sources"];

/// Raw JSON body of a chat reply, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplyEnvelope(pub Value);

impl ReplyEnvelope {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Reply text per [`REPLY_RULES`], or [`FALLBACK_REPLY`].
    pub fn content(&self) -> String {
        for rule in REPLY_RULES {
            if let Some(text) = rule.apply(self) {
                debug!(field = rule.field, "Reply content located");
                return text.to_string();
            }
        }
        warn!("Reply matched no known shape, substituting fallback text");
        FALLBACK_REPLY.to_string()
    }

    /// Backend-assigned session id (present on `POST /chat/new` replies).
    pub fn session_id(&self) -> Option<String> {
        self.string_at("/session_id")
    }

    pub fn session_title(&self) -> Option<String> {
        self.string_at("/session_title")
    }

    /// Citations, if the envelope carries a well-formed list.
    pub fn sources(&self) -> Vec<Source> {
        for pointer in SOURCE_POINTERS {
            let Some(raw) = self.0.pointer(pointer) else {
                continue;
            };
            match serde_json::from_value::<Vec<Source>>(raw.clone()) {
                Ok(sources) => return sources,
                Err(e) => debug!(pointer, "Ignoring malformed sources: {e}"),
            }
        }
        Vec::new()
    }

    /// Reduce the envelope to a [`ChatReply`].
    pub fn normalize(&self) -> ChatReply {
        ChatReply {
            session_id: self.session_id(),
            session_title: self.session_title(),
            content: self.content(),
            sources: self.sources(),
        }
    }

    fn string_at(&self, pointer: &str) -> Option<String> {
        self.0
            .pointer(pointer)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}
