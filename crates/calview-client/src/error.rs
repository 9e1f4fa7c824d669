//! Error types for remote calendar operations.
//!
//! The taxonomy distinguishes credential problems (which require
//! re-authentication), transport failures (transient, window fetch
//! aborted), malformed server payloads, and rejected mutations. None of
//! these are fatal to the host: the caller surfaces them and the local
//! store keeps its last good snapshot.

use std::fmt;

use thiserror::Error;

/// Result type for remote calendar operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Which mutation a [`ApiError::Mutation`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    /// Creating a new event.
    Create,
    /// Updating an existing event.
    Update,
    /// Cancelling an event.
    Cancel,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Cancel => "cancel",
        };
        write!(f, "{name}")
    }
}

/// Errors that can occur when talking to the remote calendar.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, expired, or rejected credential. The caller must
    /// re-authenticate; this is never retried with the same token.
    #[error("authentication required: {message}")]
    Auth {
        /// What went wrong with the credential.
        message: String,
    },

    /// Network failure or a non-success status without a more specific
    /// meaning. A window fetch that hits this is abandoned whole; any
    /// partially retrieved pages are discarded.
    #[error("transport failure: {message}")]
    Transport {
        /// Description of the failure.
        message: String,
        /// HTTP status, when one was received.
        status: Option<u16>,
    },

    /// A server payload was missing a structurally required field or
    /// carried an unparseable value.
    #[error("malformed record{}: {message}", id_suffix(.id))]
    MalformedRecord {
        /// The record's id, when it was present.
        id: Option<String>,
        /// Which requirement was violated.
        message: String,
    },

    /// A create/update/cancel request was rejected by the server. The
    /// local store is left untouched and the request is not retried.
    #[error("{kind} rejected{}: {message}", status_suffix(.status_hint))]
    Mutation {
        /// Which mutation was rejected.
        kind: MutationKind,
        /// HTTP status hint for user-visible messaging.
        status_hint: Option<u16>,
        /// Server-provided detail, when available.
        message: String,
    },

    /// A draft failed client-side validation; nothing was dispatched.
    #[error("invalid draft: {message}")]
    InvalidDraft {
        /// Which precondition failed.
        message: String,
    },
}

fn id_suffix(id: &Option<String>) -> String {
    id.as_deref()
        .map(|id| format!(" {id}"))
        .unwrap_or_default()
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

impl ApiError {
    /// Creates an authentication error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Creates a transport error without a status.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            status: None,
        }
    }

    /// Creates a transport error carrying the HTTP status.
    pub fn transport_status(status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            status: Some(status),
        }
    }

    /// Creates a malformed record error.
    pub fn malformed(id: Option<&str>, message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            id: id.map(String::from),
            message: message.into(),
        }
    }

    /// Creates a mutation error.
    pub fn mutation(kind: MutationKind, status_hint: Option<u16>, message: impl Into<String>) -> Self {
        Self::Mutation {
            kind,
            status_hint,
            message: message.into(),
        }
    }

    /// Creates an invalid draft error.
    pub fn invalid_draft(message: impl Into<String>) -> Self {
        Self::InvalidDraft {
            message: message.into(),
        }
    }

    /// Returns true if this error means the credential must be renewed.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// Returns true if this error is a transient transport failure.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_classification() {
        let err = ApiError::auth("token expired");
        assert!(err.is_auth());
        assert!(!err.is_transport());
        assert_eq!(err.to_string(), "authentication required: token expired");
    }

    #[test]
    fn transport_carries_status() {
        let err = ApiError::transport_status(503, "service unavailable");
        assert!(err.is_transport());
        match err {
            ApiError::Transport { status, .. } => assert_eq!(status, Some(503)),
            _ => panic!("expected transport error"),
        }
    }

    #[test]
    fn malformed_display_includes_id() {
        let err = ApiError::malformed(Some("evt-1"), "missing start");
        assert_eq!(err.to_string(), "malformed record evt-1: missing start");

        let err = ApiError::malformed(None, "missing id");
        assert_eq!(err.to_string(), "malformed record: missing id");
    }

    #[test]
    fn mutation_display() {
        let err = ApiError::mutation(MutationKind::Cancel, Some(404), "event not found");
        assert_eq!(err.to_string(), "cancel rejected (404): event not found");

        let err = ApiError::mutation(MutationKind::Create, None, "bad payload");
        assert_eq!(err.to_string(), "create rejected: bad payload");
    }

    #[test]
    fn mutation_kind_display() {
        assert_eq!(MutationKind::Create.to_string(), "create");
        assert_eq!(MutationKind::Update.to_string(), "update");
        assert_eq!(MutationKind::Cancel.to_string(), "cancel");
    }
}
