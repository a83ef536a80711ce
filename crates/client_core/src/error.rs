use shared::error::TransitionError;
use thiserror::Error;

/// Failure kinds a screen controller has to tell apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),
    /// 401: credential missing, expired or invalid.
    #[error("unauthorized")]
    Unauthorized,
    /// 403 carrying the desktop-only denial message.
    #[error("access restricted: {0}")]
    AccessRestricted(String),
    /// 400/422: malformed or conflicting input.
    #[error("validation failed ({status}): {message}")]
    Validation { status: u16, message: String },
    /// Any other non-2xx response.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),
    /// Login rejected the email/password pair.
    #[error("Unauthorized: Invalid email or password.")]
    InvalidCredentials,
    /// Credentials were accepted but the account may not use the dashboard.
    #[error("You're not permitted to access this page")]
    NotPermitted,
    /// Rejected locally before any request was sent.
    #[error("{0}")]
    InvalidInput(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    pub fn requires_reauth(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Network error: Please check your internet connection.".to_string(),
            Self::Unauthorized => "Unauthorized: Please log in again.".to_string(),
            Self::AccessRestricted(message) => message.clone(),
            Self::Validation { message, .. } => message.clone(),
            Self::Server { message, .. } => format!("An error occurred: {message}"),
            Self::Decode(_) => "An error occurred: unexpected response from server".to_string(),
            other => other.to_string(),
        }
    }
}
