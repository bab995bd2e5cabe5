use thiserror::Error;

/// Uniform failure of a backend call.
///
/// Non-2xx statuses and `ok: false` bodies are both failures; the caller
/// never has to inspect a body to learn that a call did not succeed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("{}", status_message(.status, .message))]
    Status { status: u16, message: Option<String> },

    #[error("{}", rejected_message(.message))]
    Rejected { message: Option<String> },
}

impl ApiError {
    pub fn rejected(message: impl Into<String>) -> Self {
        ApiError::Rejected {
            message: Some(message.into()),
        }
    }

    pub fn status(status: u16, message: Option<String>) -> Self {
        ApiError::Status { status, message }
    }

    /// Network or parse failure (as opposed to a backend-reported one)
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Decode(_))
    }

    /// Text shown to the user: the server message when there is one
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

fn status_message(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(msg) if !msg.trim().is_empty() => msg.clone(),
        _ => format!("Request failed (HTTP {})", status),
    }
}

fn rejected_message(message: &Option<String>) -> String {
    match message {
        Some(msg) if !msg.trim().is_empty() => msg.clone(),
        _ => "Request failed".to_string(),
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
