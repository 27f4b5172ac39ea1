use thiserror::Error;

#[derive(Error, Debug)]
pub enum CcpError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

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

    #[error("Input has no column named '{column}'")]
    MissingColumnError { column: String },

    #[error("Row {row}: invalid CCP account '{account}' ({reason})")]
    InvalidAccountError {
        row: usize,
        account: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Io,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CcpError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CcpError::IoError(_) => ErrorCategory::Io,
            CcpError::CsvError(_)
            | CcpError::SerializationError(_)
            | CcpError::MissingColumnError { .. }
            | CcpError::InvalidAccountError { .. } => ErrorCategory::Data,
            CcpError::ConfigValidationError { .. }
            | CcpError::InvalidConfigValueError { .. }
            | CcpError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CcpError::InvalidAccountError { .. } => ErrorSeverity::Medium,
            CcpError::CsvError(_)
            | CcpError::SerializationError(_)
            | CcpError::MissingColumnError { .. }
            | CcpError::ConfigValidationError { .. }
            | CcpError::InvalidConfigValueError { .. }
            | CcpError::MissingConfigError { .. } => ErrorSeverity::High,
            CcpError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CcpError::IoError(e) => format!("Could not read or write a file: {}", e),
            CcpError::CsvError(e) => format!("The input file is not valid CSV: {}", e),
            CcpError::SerializationError(e) => format!("Could not produce JSON output: {}", e),
            CcpError::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            CcpError::InvalidConfigValueError { field, value, reason } => {
                format!("'{}' is not a valid value for '{}': {}", value, field, reason)
            }
            CcpError::MissingConfigError { field } => {
                format!("The setting '{}' is required", field)
            }
            CcpError::MissingColumnError { column } => {
                format!("The input file has no '{}' column", column)
            }
            CcpError::InvalidAccountError { row, account, reason } => {
                format!("Row {} holds an invalid CCP account '{}': {}", row, account, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Io => "Check that the paths exist and are readable/writable",
            ErrorCategory::Configuration => "Review the configuration file or command-line flags",
            ErrorCategory::Data => match self {
                CcpError::MissingColumnError { .. } => {
                    "Set account_column to the header that holds the CCP numbers"
                }
                CcpError::InvalidAccountError { .. } => {
                    "Fix the row, or set on_invalid to \"keep\" or \"skip\""
                }
                _ => "Check the input file encoding and delimiter",
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, CcpError>;
