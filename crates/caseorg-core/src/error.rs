use caseorg_client::ApiError;
use std::fmt;

/// Result type for caseorg-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the browser core
#[derive(Debug)]
pub enum Error {
    /// Backend call failed (transport, status or `ok: false`)
    Api(ApiError),

    /// Required selection or state missing; raised before any request
    Validation(String),

    /// Configuration error
    Config(String),

    /// IO operation failed
    Io(std::io::Error),
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// Message suitable for an alert or inline error row
    pub fn user_message(&self) -> String {
        match self {
            Error::Api(err) => err.user_message(),
            Error::Validation(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Api(err) => write!(f, "Backend error: {}", err),
            Error::Validation(msg) => write!(f, "{}", msg),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Api(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Validation(_) | Error::Config(_) => None,
        }
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Error::Api(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}
