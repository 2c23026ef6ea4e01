//! Configuration rewriting for the Iceberg REST server
//!
//! This crate parses the flat `key = value` server configuration, overlays
//! the default and environment-derived overrides under the
//! `gravitino.iceberg-rest.` namespace, and writes the result back to disk.

pub mod env;
pub mod overrides;
pub mod properties;
pub mod rewrite;
pub mod schema;
pub mod writer;

pub use env::{EnvSource, MapEnv, ProcessEnv};
pub use overrides::*;
pub use properties::PropertiesMap;
pub use rewrite::{ConfigRewriter, RewriteReport};
pub use schema::*;
pub use writer::{write_properties, WriteMode};
