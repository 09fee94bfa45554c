//! Observability setup for the MedAssist chat client.

pub mod tracing_setup;
