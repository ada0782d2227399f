//! Client error types.

use thiserror::Error;

/// SQLSTATE reported when a row fails a check constraint.
pub const CHECK_VIOLATION_CODE: &str = "23514";

/// Errors returned by the REST client and the steps built on it.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Timeout, connection refused, TLS failure...
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a status other than the expected one
    #[error("Erreur {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the expected JSON array of rows
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// The client could not be constructed
    #[error("Invalid client configuration: {0}")]
    Build(String),
}

impl ClientError {
    /// HTTP status for application-level failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body or transport error text.
    pub fn detail(&self) -> String {
        match self {
            ClientError::Status { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }

    /// Whether the server refused the row's content: a `400` answer, or any
    /// answer carrying the check violation code. Timeouts and access-policy
    /// rejections do not qualify.
    pub fn is_check_violation(&self) -> bool {
        match self {
            ClientError::Status { status, body } => {
                *status == 400 || body.contains(CHECK_VIOLATION_CODE)
            }
            _ => false,
        }
    }

    /// Whether the error text contains `marker`, ignoring case.
    pub fn is_policy_rejection(&self, marker: &str) -> bool {
        self.detail()
            .to_lowercase()
            .contains(&marker.to_lowercase())
    }
}
