use thiserror::Error;

/// Errors raised while validating multiline codec settings.
///
/// These are fatal to the owning stream's startup and are never retried.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("multiline codec pattern must be specified")]
    EmptyPattern,
    #[error("failed to compile multiline codec pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("unknown multiline `what` value `{value}` (expected `previous` or `next`)")]
    InvalidWhat { value: String },
}
