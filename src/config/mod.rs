#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_distinct_paths, validate_file_extension, validate_path};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DATA_DIR: &str = ".";

/// Source and output file names for every stage, relative to the data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
#[serde(default)]
pub struct EtlPaths {
    /// Raw employee export
    #[cfg_attr(feature = "cli", arg(long, default_value = "employees_source.csv"))]
    pub employee_source: String,

    /// Normalized employees
    #[cfg_attr(feature = "cli", arg(long, default_value = "employees.csv"))]
    pub employee_output: String,

    /// Raw customer export
    #[cfg_attr(feature = "cli", arg(long, default_value = "customers_source.csv"))]
    pub customer_source: String,

    /// Normalized customers
    #[cfg_attr(feature = "cli", arg(long, default_value = "customers.csv"))]
    pub customer_output: String,

    /// Raw appointment export
    #[cfg_attr(feature = "cli", arg(long, default_value = "appointments_source.csv"))]
    pub appointment_source: String,

    /// Normalized appointments
    #[cfg_attr(feature = "cli", arg(long, default_value = "appointments.csv"))]
    pub appointment_output: String,

    /// Appointments joined with employee/customer names
    #[cfg_attr(feature = "cli", arg(long, default_value = "appointments_enriched.csv"))]
    pub enriched_output: String,

    /// Daily revenue per employee
    #[cfg_attr(feature = "cli", arg(long, default_value = "daily_summary.csv"))]
    pub daily_summary_output: String,
}

impl Default for EtlPaths {
    fn default() -> Self {
        Self {
            employee_source: "employees_source.csv".to_string(),
            employee_output: "employees.csv".to_string(),
            customer_source: "customers_source.csv".to_string(),
            customer_output: "customers.csv".to_string(),
            appointment_source: "appointments_source.csv".to_string(),
            appointment_output: "appointments.csv".to_string(),
            enriched_output: "appointments_enriched.csv".to_string(),
            daily_summary_output: "daily_summary.csv".to_string(),
        }
    }
}

impl EtlPaths {
    /// 所有設定項目 (名稱, 路徑)，來源在前、輸出在後
    pub fn entries(&self) -> [(&'static str, &str); 8] {
        [
            ("employee_source", &self.employee_source),
            ("customer_source", &self.customer_source),
            ("appointment_source", &self.appointment_source),
            ("employee_output", &self.employee_output),
            ("customer_output", &self.customer_output),
            ("appointment_output", &self.appointment_output),
            ("enriched_output", &self.enriched_output),
            ("daily_summary_output", &self.daily_summary_output),
        ]
    }

    pub fn validate(&self) -> Result<()> {
        let entries = self.entries();

        for (field, path) in entries {
            validate_path(field, path)?;
            validate_file_extension(field, path, &["csv"])?;
        }

        validate_distinct_paths(&entries)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

pub fn validate_provider(config: &dyn ConfigProvider) -> Result<()> {
    validate_path("data_dir", config.data_dir())?;
    config.paths().validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths_are_valid() {
        assert!(EtlPaths::default().validate().is_ok());
    }

    #[test]
    fn test_output_cannot_overwrite_source() {
        let paths = EtlPaths {
            employee_output: "employees_source.csv".to_string(),
            ..Default::default()
        };

        let err = paths.validate().unwrap_err();
        assert!(err.to_string().contains("employee_output"));
    }

    #[test]
    fn test_non_csv_output_is_rejected() {
        let paths = EtlPaths {
            daily_summary_output: "daily_summary.json".to_string(),
            ..Default::default()
        };
        assert!(paths.validate().is_err());
    }
}
