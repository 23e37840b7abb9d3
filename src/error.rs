use thiserror::Error;

/// Failure modes of the remote data gateway.
///
/// Everything the backend can do wrong collapses into three cases: the
/// bearer token could not be obtained, the server rejected the operation
/// with a message, or the response did not have the expected shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("{0}")]
    Remote(String),

    #[error("malformed response from server")]
    Malformed,
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Token acquisition failure, raised by a [`TokenProvider`] implementation.
///
/// [`TokenProvider`]: crate::gateway::TokenProvider
#[derive(Error, Debug, Clone)]
#[error("token acquisition failed: {0}")]
pub struct TokenError(pub String);

/// Invariant violation in an input payload (`NewBudget` / `NewExpense`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("validation error: {0}")]
pub struct ValidationError(pub String);
