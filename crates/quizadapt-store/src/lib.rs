//! quizadapt-store — Performance persistence backends.
//!
//! Implements the `PerformanceStore` trait for an in-process map, a JSON
//! file, and a scriptable mock, plus the TOML configuration that selects
//! between them.

pub mod config;
pub mod error;
pub mod json_file;
pub mod memory;
pub mod mock;

pub use config::{create_store, load_config, QuizadaptConfig, StoreConfig};
pub use error::StoreError;
