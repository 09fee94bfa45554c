//! Remote chat API abstractions.
//!
//! `ChatBackend` is the port the HTTP client implements; `normalize` turns
//! the backend's loosely shaped reply envelopes into a [`ChatReply`].
//!
//! [`ChatReply`]: medassist_types::remote::ChatReply

pub mod backend;
pub mod normalize;

use medassist_types::error::ApiError;

/// Reject an empty or whitespace-only chat message before any request is made.
pub fn validate_message(message: &str) -> Result<(), ApiError> {
    if message.trim().is_empty() {
        return Err(ApiError::Validation("message must not be empty".to_string()));
    }
    Ok(())
}

/// Reject a missing session id for operations bound to an existing session.
pub fn validate_session_id(session_id: &str) -> Result<(), ApiError> {
    if session_id.trim().is_empty() {
        return Err(ApiError::Validation("session id is required".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_message() {
        assert!(validate_message("What is fever?").is_ok());
        assert!(matches!(validate_message("  \n\t"), Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_validate_session_id() {
        assert!(validate_session_id("abc123").is_ok());
        assert!(matches!(validate_session_id(""), Err(ApiError::Validation(_))));
    }
}
