//! Shared types, error model, and configuration for qhelpkit.
//!
//! This crate is the foundation depended on by all other qhelpkit crates.
//! It provides:
//! - [`QhelpkitError`] — the unified error type
//! - Domain types ([`KeywordEntry`], [`IndexSource`], [`HelpProjectDescriptor`], [`RunId`])
//! - Configuration ([`AppConfig`], [`ProductConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CONFIG_FILE_NAME, CompilerConfig, OutputNames, ProductConfig, init_config,
    load_config_from, sample_config,
};
pub use error::{QhelpkitError, Result};
pub use types::{
    CURRENT_SCHEMA_VERSION, HelpProjectDescriptor, IndexFormat, IndexSource, KeywordEntry,
    RawKeyword, RunId, TocSection, TocSkeleton,
};
