//! Shared types, error model, and configuration for toolcard.
//!
//! This crate is the foundation depended on by the other toolcard crates.
//! It provides:
//! - [`ToolcardError`]: the unified error type
//! - Domain types ([`ToolResultRecord`], [`Value`], [`Entity`], [`Status`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, ScanConfig, config_dir, config_file_path, init_config, load_config,
    load_config_from,
};
pub use error::{Result, ToolcardError};
pub use types::{Entity, Status, ToolResultRecord, UNKNOWN_TOOL, Value};
