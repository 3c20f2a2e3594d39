#![deny(missing_docs)]

//! Core library for the readability cache server.

/// HTTP routing and JSON handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Article extraction from upstream pages.
pub mod extractor;
/// Structured logging and tracing setup.
pub mod logging;
/// Retrieval counters.
pub mod metrics;
/// Read-through retrieval orchestration.
pub mod reader;
/// Cache store backends and key layout.
pub mod store;
