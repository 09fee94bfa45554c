//! Session logic and port trait definitions for the MedAssist chat client.
//!
//! This crate defines the "ports" (`KvStore`, `ChatBackend`) that the
//! infrastructure layer implements, and everything that runs on top of them:
//! the session store, pinned files, the attachment pipeline, and the chat
//! controller. It depends only on `medassist-types` -- never on
//! `medassist-infra` or any database/IO crate.

pub mod chat;
pub mod remote;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;
