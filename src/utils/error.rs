use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("XML writing error: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("Rendered document is not valid UTF-8: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Malformed purchase order: {message}")]
    ContractViolation { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Configuration,
    Output,
    Contract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ConvertError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ConvertError::IoError(_) => ErrorCategory::Io,
            ConvertError::CsvError(_)
            | ConvertError::SerializationError(_)
            | ConvertError::XmlError(_)
            | ConvertError::Utf8Error(_) => ErrorCategory::Output,
            ConvertError::ConfigError { .. }
            | ConvertError::ConfigValidationError { .. }
            | ConvertError::InvalidConfigValueError { .. }
            | ConvertError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ConvertError::ContractViolation { .. } => ErrorCategory::Contract,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 檔案可能暫時被鎖定，可重試
            ErrorCategory::Io => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Output => ErrorSeverity::High,
            ErrorCategory::Contract => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ConvertError::IoError(e) => format!("Could not read or write a file: {}", e),
            ConvertError::CsvError(_) => "Failed to write the CSV line report".to_string(),
            ConvertError::SerializationError(_) => {
                "Failed to write the JSON purchase order".to_string()
            }
            ConvertError::XmlError(_) | ConvertError::Utf8Error(_) => {
                "Failed to write the XML purchase order".to_string()
            }
            ConvertError::ConfigError { message } => format!("Configuration problem: {}", message),
            ConvertError::ConfigValidationError { field, message } => {
                format!("Configuration field '{}' is invalid: {}", field, message)
            }
            ConvertError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration field '{}' is invalid: {}", field, reason)
            }
            ConvertError::MissingConfigError { field } => {
                format!("Configuration field '{}' is required", field)
            }
            ConvertError::ContractViolation { message } => {
                format!("Internal error while building the purchase order: {}", message)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Io => "Check that the input file exists and the output directory is writable",
            ErrorCategory::Configuration => "Fix the configuration value and run again",
            ErrorCategory::Output => "Try again with fewer output formats, e.g. --output-formats xml",
            ErrorCategory::Contract => "Report this as a bug together with the input file",
        }
    }

    /// Process exit code for a failed run.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
