//! Infrastructure layer for the MedAssist chat client.
//!
//! Contains implementations of the ports defined in `medassist-core`:
//! SQLite and in-memory key-value stores, the reqwest-based chat backend,
//! and filesystem/config helpers used by the binary.

pub mod config;
pub mod filesystem;
pub mod http;
pub mod memory;
pub mod sqlite;
