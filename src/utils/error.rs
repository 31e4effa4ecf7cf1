use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractorError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Input file not found: {path}")]
    InputNotFound { path: String },

    #[error("Output file already exists: {path}")]
    OutputAlreadyExists { path: String },

    #[error("Identifier {position} is {length} characters long; a spreadsheet cell holds at most {limit}")]
    IdentifierTooLong {
        position: usize,
        length: usize,
        limit: usize,
    },

    #[error("Lookup for '{identifier}' failed: {message}")]
    LookupTransportError { identifier: String, message: String },

    #[error("Interrupted by user")]
    Interrupted,

    #[error("Prompt input closed before an answer was given")]
    InputClosed,

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl ExtractorError {
    pub fn user_friendly_message(&self) -> String {
        match self {
            ExtractorError::ApiError(_) | ExtractorError::LookupTransportError { .. } => {
                format!("Could not reach the lookup service ({})", self)
            }
            ExtractorError::SpreadsheetError(_) => {
                format!("Could not build the spreadsheet ({})", self)
            }
            ExtractorError::IoError(e) => format!("File system error: {}", e),
            ExtractorError::Interrupted => "Goodbye...".to_string(),
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ExtractorError::ApiError(_) | ExtractorError::LookupTransportError { .. } => {
                "Check the endpoint and your network, or run with --failure-policy not-found"
            }
            ExtractorError::InputNotFound { .. } => "Check the input file name and directory",
            ExtractorError::OutputAlreadyExists { .. } => "Choose another output file name",
            ExtractorError::ConfigError { .. }
            | ExtractorError::ConfigValidationError { .. }
            | ExtractorError::InvalidConfigValueError { .. } => {
                "Review the configuration file and command-line flags"
            }
            ExtractorError::IdentifierTooLong { .. } => {
                "Put one CPF per line in the input file; no lookups were made"
            }
            ExtractorError::InputClosed => "Run the tool from an interactive terminal",
            ExtractorError::SpreadsheetError(_) | ExtractorError::IoError(_) => {
                "Check write permissions and free space for the output location"
            }
            ExtractorError::Interrupted => "Run the tool again when ready",
        }
    }

    /// Process exit code for a fatal error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExtractorError::Interrupted => 0,
            ExtractorError::ConfigError { .. }
            | ExtractorError::ConfigValidationError { .. }
            | ExtractorError::InvalidConfigValueError { .. } => 2,
            ExtractorError::ApiError(_) | ExtractorError::LookupTransportError { .. } => 3,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractorError>;
