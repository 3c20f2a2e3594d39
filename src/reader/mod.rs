//! Article retrieval pipeline: cache lookup, extraction fallback, and index maintenance.

mod service;
pub mod types;

pub use service::{ReaderApi, ReaderService};
pub use types::{ArticleRecord, ReaderError};
