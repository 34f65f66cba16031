//! Session Error Types

use thiserror::Error;

/// Failure talking to the auth API
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The server answered with an error envelope or a non-2xx status
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Rejected { status, .. } => Some(*status),
            GatewayError::Transport(e) => e.status().map(|s| s.as_u16()),
            GatewayError::InvalidResponse(_) => None,
        }
    }
}

/// Failure reading or writing the persisted token
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Token store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Token store is corrupt: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Token store lock poisoned")]
    Poisoned,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SessionError {
    /// Message suitable for showing to the user. Server rejections carry
    /// the server's own message.
    pub fn user_message(&self) -> &str {
        match self {
            SessionError::Gateway(GatewayError::Rejected { message, .. }) => message,
            SessionError::Gateway(_) => "Network error. Please try again.",
            SessionError::Store(_) => "Could not save the session on this device",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_message_passes_through() {
        let err = SessionError::from(GatewayError::Rejected {
            status: 401,
            message: "Invalid credentials".into(),
        });
        assert_eq!(err.user_message(), "Invalid credentials");
        assert!(matches!(err, SessionError::Gateway(ref g) if g.status() == Some(401)));
    }

    #[test]
    fn test_invalid_response_is_generic() {
        let err = SessionError::from(GatewayError::InvalidResponse("missing data".into()));
        assert_eq!(err.user_message(), "Network error. Please try again.");
    }
}
