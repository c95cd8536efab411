use crate::config::{validate_provider, EtlPaths, LogFormat, DEFAULT_DATA_DIR};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "stylz-etl")]
#[command(about = "Normalize salon CSV exports and build appointment/revenue reports")]
pub struct CliConfig {
    /// Directory holding the source and output CSV files [default: .]
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Path to a TOML configuration file (its paths take precedence over the per-file flags)
    #[arg(short, long)]
    pub config: Option<String>,

    #[command(flatten)]
    pub paths: EtlPaths,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Log output format
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Show the stage plan and check source files without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Write a JSON execution summary to this path
    #[arg(long)]
    pub report: Option<String>,
}

impl ConfigProvider for CliConfig {
    fn data_dir(&self) -> &str {
        self.data_dir.as_deref().unwrap_or(DEFAULT_DATA_DIR)
    }

    fn paths(&self) -> &EtlPaths {
        &self.paths
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_uses_defaults() {
        let config = CliConfig::parse_from(["stylz-etl"]);

        assert_eq!(config.data_dir(), ".");
        assert_eq!(config.paths(), &EtlPaths::default());
        assert!(config.config.is_none());
        assert!(!config.dry_run);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_per_file_overrides() {
        let config = CliConfig::parse_from([
            "stylz-etl",
            "--data-dir",
            "/srv/salon",
            "--employee-source",
            "staff_export.csv",
            "--log-format",
            "json",
        ]);

        assert_eq!(config.data_dir(), "/srv/salon");
        assert_eq!(config.paths.employee_source, "staff_export.csv");
        assert_eq!(config.paths.employee_output, "employees.csv");
        assert_eq!(config.log_format, Some(LogFormat::Json));
    }
}
