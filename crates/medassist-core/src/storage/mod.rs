//! Local storage abstractions.
//!
//! Defines the key-value store trait the session store persists through.
//! Implementations live in medassist-infra.

pub mod kv_store;
