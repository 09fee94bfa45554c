//! HTTP adapter for the remote chat API.

pub mod client;

pub use client::HttpChatBackend;
