//! Configuration module for manhours-cli
//!
//! This module provides configuration management including:
//! - Data directory resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::ManhoursPaths;
pub use settings::{LlmSettings, Settings};
