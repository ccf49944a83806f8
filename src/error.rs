//! Error types for the provisioning inventory.
//!
//! Uses `thiserror` for library-style errors with automatic `Display` and `Error` implementations.

use thiserror::Error;

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

/// Configuration loading and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Invalid setting {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Okta API errors.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate limited (429): Too many requests")]
    RateLimited,

    #[error("Unauthorized (401): API token rejected")]
    Unauthorized,

    #[error("Forbidden (403): Insufficient permissions")]
    Forbidden,

    #[error("Not found (404): {0}")]
    NotFound(String),

    #[error("Operation not supported: {0}")]
    NotSupported(String),

    #[error("HTTP {status}: {summary}")]
    Status { status: u16, summary: String },

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Report export errors.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ApiError {
    /// Returns true for a 429 response, the only error the resolvers retry.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited)
    }

    /// Returns true when the endpoint reports that the app lacks the capability.
    pub fn is_not_supported(&self) -> bool {
        matches!(self, Self::NotSupported(_) | Self::NotFound(_))
    }
}

impl AppError {
    /// Returns a user-friendly message for the console.
    pub fn user_message(&self) -> &str {
        match self {
            Self::Config(ConfigError::Missing(_)) => {
                "Okta domain and API token are required. Set OKTA_DOMAIN and OKTA_API_TOKEN \
                 or create okta-inventory.toml."
            }
            Self::Config(_) => "Configuration error. Please check settings.",
            Self::Api(ApiError::Unauthorized) => "The Okta API token was rejected.",
            Self::Api(ApiError::Forbidden) => "The API token lacks permission to read applications.",
            Self::Api(ApiError::RateLimited) => "Okta rate limit hit while listing applications.",
            Self::Api(ApiError::Network(_)) => "Network error. Check the Okta domain and your connection.",
            Self::Api(ApiError::InvalidUrl(_)) => "The configured Okta domain is not a valid URL.",
            Self::Api(_) => "Unexpected response from Okta while listing applications.",
            Self::Report(_) => "Failed to write the report file.",
        }
    }
}
