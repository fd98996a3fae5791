use thiserror::Error;

/// Failure taxonomy for every portal operation. Storage errors are caught
/// at each component's boundary and folded into `Persistence`; raw
/// database errors never cross the HTTP surface.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Login failed. Unknown identifier and wrong password are
    /// deliberately indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The admin gate password did not match the shared secret.
    #[error("invalid admin password")]
    InvalidAdminPassword,

    /// A gated operation was attempted without a valid session or admin token.
    #[error("unauthorized")]
    Unauthorized,

    /// The operation targeted a user that does not exist.
    #[error("user not found")]
    NotFound,

    /// The request payload was malformed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The storage layer was unreachable or rejected the operation.
    /// Callers must not assume any state changed.
    #[error("storage unavailable")]
    Persistence(#[from] sqlx::Error),

    /// Unexpected internal failure (e.g. password hashing).
    #[error("internal error: {0}")]
    Internal(String),
}
