//! Local conversation management.
//!
//! `SessionStore` owns the message list and its persistence, `PinnedFiles`
//! the pinned file list, `attachments` the per-turn file pipeline, and
//! `ChatController` ties them to a [`ChatBackend`] as one serialized turn
//! at a time.
//!
//! [`ChatBackend`]: crate::remote::backend::ChatBackend

pub mod attachments;
pub mod controller;
pub mod export;
pub mod id;
pub mod pinned;
pub mod store;
