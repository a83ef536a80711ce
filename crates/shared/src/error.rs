use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message the backend sends with a 403 when the caller is not a desktop client.
pub const DESKTOP_ONLY_DENIAL: &str = "Access denied. Please use a desktop client.";

/// Body carried by every non-2xx backend response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn is_desktop_only_denial(&self) -> bool {
        self.message == DESKTOP_ONLY_DENIAL
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("review status cannot move from {from} to {to}")]
pub struct TransitionError {
    pub from: &'static str,
    pub to: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}
