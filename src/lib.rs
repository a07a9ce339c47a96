//! Content storage and publishing workflow for the blog admin panel.
//!
//! The crate's boundary is the [`storage::Storage`] trait and the
//! [`workflow::ContentWorkflow`] built on top of it. Route handlers live
//! elsewhere: they translate requests into the field-value structs in
//! [`models`] and call workflow operations, which return plain records.

pub mod config;
pub mod error;
pub mod models;
pub mod seeder;
pub mod storage;
pub mod utils;
pub mod workflow;

pub use config::Config;
pub use error::{Error, Result};
pub use storage::{MemoryStorage, PostFilter, PostgresStorage, Storage};
pub use workflow::ContentWorkflow;
