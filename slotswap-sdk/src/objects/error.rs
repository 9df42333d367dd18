use serde::{Deserialize, Serialize};

/// Machine-readable error category carried in every error response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed input; not retryable without changing it.
    Validation,
    /// Missing or invalid session token.
    Unauthorized,
    /// The caller is not allowed to act on this resource.
    Forbidden,
    NotFound,
    /// Valid request, but current state forbids it. Retry after re-reading.
    Conflict,
    /// A referenced slot is no longer SWAPPABLE.
    Unavailable,
    /// An identical PENDING request already exists.
    Duplicate,
    Internal,
}

/// JSON body of every non-2xx response.
///
/// ```json
/// {"error":"conflict","message":"swap request 7 is already ACCEPTED"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: ErrorKind,
    pub message: String,
}
