//! Shared types for the configuration rewriter
//!
//! This crate contains the error types used across the rewriter library and
//! its binary.

pub mod error;

// Re-export commonly used types
pub use error::{ConfigError, Result, RewriterError};
