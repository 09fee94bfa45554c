//! Shared domain types for the MedAssist chat client.
//!
//! This crate contains the core domain types used across the workspace:
//! chat messages, pinned files, attachments, the turn state machine, the
//! backend wire shapes, client configuration, and their error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod attachment;
pub mod chat;
pub mod config;
pub mod error;
pub mod pinned;
pub mod remote;
pub mod turn;
