use thiserror::Error;

/// Rejected tool arguments. Raised before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid type for `{field}`: expected {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Failure of a single `get_products` invocation. Nothing is retried.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("upstream product source unreachable: {0}")]
    UpstreamUnreachable(#[source] reqwest::Error),
    #[error("malformed upstream response: {0}")]
    MalformedUpstreamResponse(String),
}
