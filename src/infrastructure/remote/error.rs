//! # Remote Service Errors
//!
//! Normalized error type for every call made to the remote dealership
//! service.
//!
//! # Examples
//!
//! ```
//! use dealer_reservation::infrastructure::remote::error::ServiceError;
//!
//! let error = ServiceError::transport("connection refused");
//! assert!(error.is_retryable());
//!
//! let error = ServiceError::rejected(400, "Reserva no activa");
//! assert_eq!(error.message(), "Reserva no activa");
//! assert!(!error.is_retryable());
//! ```

use thiserror::Error;

/// Message used when the server rejects a call without explaining why.
pub const GENERIC_REJECTION: &str = "the remote service rejected the request";

/// Error type for remote service calls.
///
/// Carries no partial state: a failed call has no observable effect on the
/// client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// No credential was available, or the server refused the one sent.
    #[error("authentication required")]
    Unauthenticated,

    /// The request never produced a response.
    #[error("transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
    },

    /// The server answered with a non-success status.
    #[error("remote service rejected the request: {message}")]
    RemoteRejected {
        /// HTTP status, when the rejection came over HTTP.
        status: Option<u16>,
        /// Server-supplied message, or a generic one.
        message: String,
    },

    /// The server answered successfully but the body did not match the
    /// contract.
    #[error("invalid response from remote service: {message}")]
    InvalidResponse {
        /// Error message.
        message: String,
    },
}

impl ServiceError {
    /// Creates a transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a rejection carrying an HTTP status.
    #[must_use]
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::RemoteRejected {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Creates a rejection with the server's message, falling back to a
    /// generic message when the server sent none.
    #[must_use]
    pub fn rejected_with(status: u16, message: Option<String>) -> Self {
        Self::rejected(
            status,
            message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_REJECTION.to_string()),
        )
    }

    /// Creates an invalid response error.
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Returns true if the same call may succeed when repeated by the user.
    ///
    /// No error is ever retried automatically.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Returns true if the caller must authenticate first.
    #[inline]
    #[must_use]
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }

    /// Returns true if the server rejected the call.
    #[inline]
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::RemoteRejected { .. })
    }

    /// Returns the HTTP status of a rejection, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteRejected { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns the message suitable for display.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Unauthenticated => "authentication required",
            Self::Transport { message }
            | Self::RemoteRejected { message, .. }
            | Self::InvalidResponse { message } => message,
        }
    }
}

/// Result type for remote service calls.
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_is_retryable() {
        assert!(ServiceError::transport("reset").is_retryable());
    }

    #[test]
    fn rejection_is_not_retryable() {
        let error = ServiceError::rejected(409, "taken");
        assert!(!error.is_retryable());
        assert!(error.is_rejected());
        assert_eq!(error.status(), Some(409));
    }

    #[test]
    fn unauthenticated_is_flagged() {
        assert!(ServiceError::Unauthenticated.is_unauthenticated());
        assert!(!ServiceError::Unauthenticated.is_retryable());
    }

    #[test]
    fn rejected_with_falls_back_to_generic_message() {
        assert_eq!(
            ServiceError::rejected_with(500, None).message(),
            GENERIC_REJECTION
        );
        assert_eq!(
            ServiceError::rejected_with(500, Some("  ".to_string())).message(),
            GENERIC_REJECTION
        );
        assert_eq!(
            ServiceError::rejected_with(400, Some("Cotización vencida".to_string())).message(),
            "Cotización vencida"
        );
    }

    #[test]
    fn display_format() {
        let display = ServiceError::invalid_response("missing total").to_string();
        assert!(display.contains("invalid response"));
        assert!(display.contains("missing total"));
    }
}
