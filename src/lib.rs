pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;

pub use crate::adapters::LocalStorage;
pub use crate::config::{toml_config::TomlConfig, EtlPaths, LogFormat};
pub use crate::core::etl::{execution_summary, EtlEngine, Stage, StageResult};
pub use crate::utils::error::{EtlError, Result};
