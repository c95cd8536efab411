use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Source file not found: {path}")]
    MissingFileError { path: String },

    #[error("Missing required field '{field}'{}", line_suffix(.line))]
    MissingFieldError { field: String, line: Option<u64> },

    #[error("Failed to parse field '{field}' (value '{value}'){}: {reason}", line_suffix(.line))]
    ParseError {
        field: String,
        value: String,
        reason: String,
        line: Option<u64>,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Stage '{stage}' failed: {source}")]
    StageError {
        stage: String,
        #[source]
        source: Box<EtlError>,
    },
}

fn line_suffix(line: &Option<u64>) -> String {
    match line {
        Some(line) => format!(" on line {}", line),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn parse(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl ToString,
        line: Option<u64>,
    ) -> Self {
        EtlError::ParseError {
            field: field.into(),
            value: value.into(),
            reason: reason.to_string(),
            line,
        }
    }

    pub fn in_stage(self, stage: impl Into<String>) -> Self {
        EtlError::StageError {
            stage: stage.into(),
            source: Box::new(self),
        }
    }

    /// 取得最內層的錯誤（略過 StageError 包裝）
    pub fn root(&self) -> &EtlError {
        match self {
            EtlError::StageError { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self.root() {
            EtlError::MissingFileError { .. } => ErrorCategory::Input,
            EtlError::MissingFieldError { .. }
            | EtlError::ParseError { .. }
            | EtlError::CsvError(_) => ErrorCategory::Data,
            EtlError::ConfigError { .. } | EtlError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            EtlError::IoError(_) => ErrorCategory::System,
            EtlError::StageError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        let stage = match self {
            EtlError::StageError { stage, .. } => format!("[{}] ", stage),
            _ => String::new(),
        };

        let message = match self.root() {
            EtlError::MissingFileError { path } => {
                format!("Required input file is missing: {}", path)
            }
            EtlError::MissingFieldError { field, line } => format!(
                "Input row is missing the '{}' column{}",
                field,
                line_suffix(line)
            ),
            EtlError::ParseError {
                field, value, line, ..
            } => format!(
                "Value '{}' in column '{}' has an unexpected format{}",
                value,
                field,
                line_suffix(line)
            ),
            EtlError::CsvError(e) => format!("The CSV file could not be read: {}", e),
            EtlError::ConfigError { message } => format!("Configuration problem: {}", message),
            EtlError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
            other => other.to_string(),
        };

        format!("{}{}", stage, message)
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.root() {
            EtlError::MissingFileError { .. } => {
                "Check --data-dir and the configured file names, or run the earlier stages first"
            }
            EtlError::MissingFieldError { .. } => {
                "Make sure the CSV header contains every required column"
            }
            EtlError::ParseError { .. } => {
                "Fix the offending value (dates: YYYY-MM-DD, times: YYYY-MM-DD HH:MM, numbers: decimal)"
            }
            EtlError::CsvError(_) => "Check that every row has the same number of columns as the header",
            EtlError::ConfigError { .. } | EtlError::InvalidConfigValueError { .. } => {
                "Review the TOML configuration and command line flags"
            }
            _ => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
