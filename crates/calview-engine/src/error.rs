//! Engine error types.

use thiserror::Error;

use calview_client::ApiError;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by the sync engine.
///
/// None of these are fatal: the engine stays usable after any single
/// failure and the store keeps its last good snapshot.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A remote operation failed; see the wrapped taxonomy.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// No non-expired credential is available. The caller must
    /// re-authenticate; no request was issued.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The targeted event is not in the local store. Raised before any
    /// request, e.g. on a double-submitted cancellation.
    #[error("unknown event: {id}")]
    UnknownEvent {
        /// The id that was not found.
        id: String,
    },
}

impl EngineError {
    /// Creates an unknown event error.
    pub fn unknown_event(id: impl Into<String>) -> Self {
        Self::UnknownEvent { id: id.into() }
    }

    /// Returns true if this failure requires re-authentication.
    pub fn requires_reauth(&self) -> bool {
        match self {
            Self::NotAuthenticated => true,
            Self::Api(api) => api.is_auth(),
            Self::UnknownEvent { .. } => false,
        }
    }
}
