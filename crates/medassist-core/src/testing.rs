//! In-crate fakes for the storage and backend ports.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use medassist_types::attachment::{Attachment, FileProcessingResult, FileProcessingStatus};
use medassist_types::chat::Source;
use medassist_types::error::{ApiError, StorageError};
use medassist_types::remote::{ChatReply, DeleteAck, RemoteSession, SessionList};
use serde_json::Value;

use crate::remote::backend::ChatBackend;
use crate::storage::kv_store::KvStore;

/// Map-backed `KvStore` that can be told to fail writes and deletes.
#[derive(Default)]
pub struct FakeKv {
    entries: Mutex<BTreeMap<String, Value>>,
    pub writes: AtomicUsize,
    pub fail_writes: AtomicBool,
}

impl FakeKv {
    pub fn raw(&self, key: &str) -> Option<Value> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn put_raw(&self, key: &str, value: Value) {
        self.entries.lock().unwrap().insert(key.to_string(), value);
    }
}

impl KvStore for FakeKv {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Query("disk full".to_string()));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.put_raw(key, value.clone());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Query("disk full".to_string()));
        }
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

/// A backend call as observed by [`ScriptedBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateNewChat { message: String },
    SendMessage { session_id: String, message: String },
    GetChatHistory { session_id: String },
    GetAllChats,
    DeleteChat { session_id: String },
    UploadFile { name: String },
    ProcessFile { name: String, session_id: String },
}

/// `ChatBackend` that records every call and answers from queued scripts.
///
/// Chat calls without a queued reply answer `"reply to: <message>"` and a
/// `session_id` of `"sess-1"`; file calls default to `success`.
#[derive(Default)]
pub struct ScriptedBackend {
    calls: Mutex<Vec<Call>>,
    replies: Mutex<VecDeque<Result<ChatReply, ApiError>>>,
    file_results: Mutex<VecDeque<Result<FileProcessingResult, ApiError>>>,
    pub hang: AtomicBool,
}

impl ScriptedBackend {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn push_reply(&self, reply: Result<ChatReply, ApiError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn push_file_result(&self, result: Result<FileProcessingResult, ApiError>) {
        self.file_results.lock().unwrap().push_back(result);
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_reply(&self, message: &str) -> Result<ChatReply, ApiError> {
        self.replies.lock().unwrap().pop_front().unwrap_or_else(|| {
            Ok(reply(Some("sess-1"), &format!("reply to: {message}")))
        })
    }

    async fn maybe_hang(&self) {
        if self.hang.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
    }
}

pub fn reply(session_id: Option<&str>, content: &str) -> ChatReply {
    ChatReply {
        session_id: session_id.map(str::to_string),
        session_title: None,
        content: content.to_string(),
        sources: Vec::new(),
    }
}

pub fn file_ok(summary: &str) -> FileProcessingResult {
    FileProcessingResult {
        status: FileProcessingStatus::Success,
        extracted_text: None,
        summary: Some(summary.to_string()),
        message: None,
    }
}

pub fn transport_error() -> ApiError {
    ApiError::Transport("connection refused".to_string())
}

impl ChatBackend for ScriptedBackend {
    async fn create_new_chat(&self, message: &str) -> Result<ChatReply, ApiError> {
        self.record(Call::CreateNewChat {
            message: message.to_string(),
        });
        self.maybe_hang().await;
        self.next_reply(message)
    }

    async fn send_message(
        &self,
        session_id: &str,
        message: &str,
        _sources: &[Source],
    ) -> Result<ChatReply, ApiError> {
        self.record(Call::SendMessage {
            session_id: session_id.to_string(),
            message: message.to_string(),
        });
        self.maybe_hang().await;
        self.next_reply(message)
    }

    async fn get_chat_history(&self, session_id: &str) -> Result<RemoteSession, ApiError> {
        self.record(Call::GetChatHistory {
            session_id: session_id.to_string(),
        });
        Err(ApiError::Http {
            status: 403,
            body: "not found".to_string(),
        })
    }

    async fn get_all_chats(&self) -> Result<SessionList, ApiError> {
        self.record(Call::GetAllChats);
        Ok(SessionList::default())
    }

    async fn delete_chat(&self, session_id: &str) -> Result<DeleteAck, ApiError> {
        self.record(Call::DeleteChat {
            session_id: session_id.to_string(),
        });
        if session_id == "missing" {
            return Err(ApiError::Http {
                status: 403,
                body: r#"{"detail":"Chat session not found"}"#.to_string(),
            });
        }
        Ok(DeleteAck {
            status: "success".to_string(),
            message: Some(format!("Chat {session_id} deleted")),
        })
    }

    async fn upload_file(&self, file: &Attachment) -> Result<Value, ApiError> {
        self.record(Call::UploadFile {
            name: file.name.clone(),
        });
        Ok(serde_json::json!({"status": "success"}))
    }

    async fn process_file(
        &self,
        file: &Attachment,
        session_id: &str,
    ) -> Result<FileProcessingResult, ApiError> {
        self.record(Call::ProcessFile {
            name: file.name.clone(),
            session_id: session_id.to_string(),
        });
        self.file_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(file_ok(&format!("summary of {}", file.name))))
    }
}
