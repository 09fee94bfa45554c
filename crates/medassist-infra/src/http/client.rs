//! HttpChatBackend -- concrete [`ChatBackend`] over the MedAssist chat API.
//!
//! One request per call, no retries. Chat replies are normalized through
//! [`ReplyEnvelope`] so any of the backend's reply shapes yields content;
//! the fixed-schema endpoints (history, list, delete, process-file) fail with
//! `Deserialization` when the body does not match.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and only exposed when
//! the `X-API-Key` header is set.

use std::time::Duration;

use medassist_core::remote::backend::ChatBackend;
use medassist_core::remote::normalize::ReplyEnvelope;
use medassist_core::remote::{validate_message, validate_session_id};
use medassist_types::attachment::{Attachment, FileProcessingResult};
use medassist_types::chat::Source;
use medassist_types::config::ClientConfig;
use medassist_types::error::ApiError;
use medassist_types::remote::{ChatReply, DeleteAck, RemoteSession, SessionList};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

/// Header the backend reads the static API key from.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// reqwest-based chat backend.
///
/// Does not derive Debug so the key cannot end up in log output.
pub struct HttpChatBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<SecretString>,
}

impl HttpChatBackend {
    /// Build a client for `config.api_base_url` with the configured timeout.
    pub fn new(config: &ClientConfig, api_key: Option<SecretString>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.api_key {
            Some(key) => builder.header(API_KEY_HEADER, key.expose_secret()),
            None => builder,
        }
    }

    /// Send and map transport failures and non-2xx statuses.
    async fn execute(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await.map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn chat_reply(&self, builder: RequestBuilder) -> Result<ChatReply, ApiError> {
        let response = self.execute(builder).await?;
        let text = response.text().await.map_err(transport_error)?;
        // A body that is not JSON at all still yields the fallback reply.
        let value = serde_json::from_str::<Value>(&text).unwrap_or(Value::Null);
        Ok(ReplyEnvelope::new(value).normalize())
    }

    async fn fixed<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = self.execute(builder).await?;
        let text = response.text().await.map_err(transport_error)?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::Deserialization(format!("unexpected response body: {e}")))
    }
}

fn transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Transport(format!("request timed out: {e}"))
    } else {
        ApiError::Transport(e.to_string())
    }
}

fn file_form(file: &Attachment) -> Result<Form, ApiError> {
    let part = Part::bytes(file.bytes.clone())
        .file_name(file.name.clone())
        .mime_str(&file.mime_type)
        .map_err(|e| ApiError::Validation(format!("invalid MIME type for {}: {e}", file.name)))?;
    Ok(Form::new().part("file", part))
}

impl ChatBackend for HttpChatBackend {
    async fn create_new_chat(&self, message: &str) -> Result<ChatReply, ApiError> {
        validate_message(message)?;
        debug!("POST /chat/new");

        let builder = self
            .request(Method::POST, "/chat/new")
            .json(&json!({ "message": message }));
        self.chat_reply(builder).await
    }

    async fn send_message(
        &self,
        session_id: &str,
        message: &str,
        sources: &[Source],
    ) -> Result<ChatReply, ApiError> {
        validate_session_id(session_id)?;
        validate_message(message)?;
        debug!(session_id = %session_id, "POST /chat/{{session_id}}");

        let builder = self
            .request(Method::POST, &format!("/chat/{session_id}"))
            .json(&json!({ "message": message, "sources": sources }));
        self.chat_reply(builder).await
    }

    async fn get_chat_history(&self, session_id: &str) -> Result<RemoteSession, ApiError> {
        validate_session_id(session_id)?;
        debug!(session_id = %session_id, "GET /chat/{{session_id}}");

        self.fixed(self.request(Method::GET, &format!("/chat/{session_id}")))
            .await
    }

    async fn get_all_chats(&self) -> Result<SessionList, ApiError> {
        debug!("GET /chat/");
        self.fixed(self.request(Method::GET, "/chat/")).await
    }

    async fn delete_chat(&self, session_id: &str) -> Result<DeleteAck, ApiError> {
        validate_session_id(session_id)?;
        debug!(session_id = %session_id, "DELETE /chat/{{session_id}}");

        self.fixed(self.request(Method::DELETE, &format!("/chat/{session_id}")))
            .await
    }

    async fn upload_file(&self, file: &Attachment) -> Result<Value, ApiError> {
        debug!(file = %file.name, size = file.bytes.len(), "POST /chat/upload");
        let builder = self
            .request(Method::POST, "/chat/upload")
            .multipart(file_form(file)?);
        self.fixed(builder).await
    }

    async fn process_file(
        &self,
        file: &Attachment,
        session_id: &str,
    ) -> Result<FileProcessingResult, ApiError> {
        validate_session_id(session_id)?;
        debug!(
            file = %file.name,
            size = file.bytes.len(),
            session_id = %session_id,
            "POST /chat/process-file/{{session_id}}"
        );

        let builder = self
            .request(Method::POST, &format!("/chat/process-file/{session_id}"))
            .multipart(file_form(file)?);
        self.fixed(builder).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medassist_core::remote::normalize::FALLBACK_REPLY;
    use medassist_types::attachment::FileProcessingStatus;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn backend_for(server: &MockServer) -> HttpChatBackend {
        let config = ClientConfig {
            api_base_url: format!("{}/api/v1/", server.uri()),
            request_timeout_secs: 5,
            api_key: None,
        };
        HttpChatBackend::new(&config, Some(SecretString::from("test-key"))).unwrap()
    }

    async fn request_count(server: &MockServer) -> usize {
        server.received_requests().await.map(|r| r.len()).unwrap_or(0)
    }

    #[tokio::test]
    async fn test_create_new_chat_sends_key_and_normalizes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat/new"))
            .and(header("X-API-Key", "test-key"))
            .and(body_json(json!({"message": "What is fever?"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": {"role": "assistant", "content": "Fever is...", "timestamp": "2025-01-01T10:00:00"},
                "session_id": "abc123",
                "session_title": "Fever"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = backend_for(&server).create_new_chat("What is fever?").await.unwrap();
        assert_eq!(reply.content, "Fever is...");
        assert_eq!(reply.session_id.as_deref(), Some("abc123"));
        assert_eq!(reply.session_title.as_deref(), Some("Fever"));
    }

    #[tokio::test]
    async fn test_send_message_posts_sources() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat/abc123"))
            .and(body_json(json!({"message": "And chills?", "sources": []})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Chills often..."})))
            .expect(1)
            .mount(&server)
            .await;

        let reply = backend_for(&server)
            .send_message("abc123", "And chills?", &[])
            .await
            .unwrap();
        assert_eq!(reply.content, "Chills often...");
        assert_eq!(reply.session_id, None);
    }

    #[tokio::test]
    async fn test_unrecognized_reply_uses_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat/abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let reply = backend_for(&server)
            .send_message("abc123", "hello", &[])
            .await
            .unwrap();
        assert_eq!(reply.content, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_validation_happens_before_request() {
        let server = MockServer::start().await;
        let backend = backend_for(&server);

        let err = backend.create_new_chat("   ").await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        let err = backend.send_message("", "hello", &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        let err = backend.delete_chat(" ").await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        assert_eq!(request_count(&server).await, 0);
    }

    #[tokio::test]
    async fn test_delete_unknown_session_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/chat/missing"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_json(json!({"detail": "Chat session not found or access denied"})),
            )
            .mount(&server)
            .await;

        let err = backend_for(&server).delete_chat("missing").await.unwrap_err();
        match err {
            ApiError::Http { status, body } => {
                assert_eq!(status, 403);
                assert!(body.contains("not found"));
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete_ack() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/chat/abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"status": "success", "message": "Chat abc123 deleted"}),
            ))
            .mount(&server)
            .await;

        let ack = backend_for(&server).delete_chat("abc123").await.unwrap();
        assert_eq!(ack.status, "success");
    }

    #[tokio::test]
    async fn test_history_with_wrong_shape_is_deserialization_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/chat/abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
            .mount(&server)
            .await;

        let err = backend_for(&server).get_chat_history("abc123").await.unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[tokio::test]
    async fn test_get_all_chats() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/chat/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sessions": [{
                    "id": "abc123",
                    "user_id": "user123",
                    "created_at": "2025-01-01T10:00:00",
                    "updated_at": "2025-01-01T10:05:00",
                    "title": "Fever",
                    "messages": []
                }]
            })))
            .mount(&server)
            .await;

        let list = backend_for(&server).get_all_chats().await.unwrap();
        assert_eq!(list.sessions.len(), 1);
        assert_eq!(list.sessions[0].title, "Fever");
    }

    #[tokio::test]
    async fn test_process_file_uploads_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat/process-file/abc123"))
            .and(header("X-API-Key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "summary": "Hemoglobin within normal range"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let file = Attachment::new("labs.pdf", "application/pdf", b"%PDF-1.7".to_vec());
        let result = backend_for(&server).process_file(&file, "abc123").await.unwrap();
        assert_eq!(result.status, FileProcessingStatus::Success);
        assert_eq!(result.detail(), Some("Hemoglobin within normal range"));

        let requests = server.received_requests().await.unwrap();
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains(r#"name="file""#));
        assert!(body.contains(r#"filename="labs.pdf""#));
    }

    #[tokio::test]
    async fn test_server_error_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat/upload"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;

        let file = Attachment::new("note.txt", "text/plain", b"hello".to_vec());
        let err = backend_for(&server).upload_file(&file).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let config = ClientConfig {
            api_base_url: "http://127.0.0.1:9/api/v1".to_string(),
            request_timeout_secs: 2,
            api_key: None,
        };
        let backend = HttpChatBackend::new(&config, None).unwrap();

        let err = backend.create_new_chat("What is fever?").await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert!(err.is_network());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = ClientConfig {
            api_base_url: "http://localhost:8000/api/v1/".to_string(),
            ..ClientConfig::default()
        };
        let backend = HttpChatBackend::new(&config, None).unwrap();
        assert_eq!(backend.base_url(), "http://localhost:8000/api/v1");
        assert_eq!(backend.url("/chat/new"), "http://localhost:8000/api/v1/chat/new");
    }
}
