//! Error types for agora.

use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Client Errors ===
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Content item not found: {0}")]
    ItemNotFound(String),

    #[error("Unsupported content kind: {0}")]
    InvalidVariant(String),

    #[error("Option not found: {0}")]
    OptionNotFound(String),

    #[error("Voting has closed on item: {0}")]
    Expired(String),

    #[error("Multiple answers are not allowed")]
    MultipleAnswersNotAllowed,

    #[error("Bad request: {0}")]
    BadRequest(String),

    // === Server Errors ===
    #[error("Write conflict on item: {0}")]
    ConcurrencyConflict(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::ItemNotFound(_) => "ITEM_NOT_FOUND",
            Self::InvalidVariant(_) => "INVALID_VARIANT",
            Self::OptionNotFound(_) => "OPTION_NOT_FOUND",
            Self::Expired(_) => "EXPIRED",
            Self::MultipleAnswersNotAllowed => "MULTIPLE_ANSWERS_NOT_ALLOWED",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::ConcurrencyConflict(_) => "CONCURRENCY_CONFLICT",
            Self::Store(_) => "STORE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error was caused by the caller's request.
    ///
    /// Client errors are detected before any write is attempted and are never
    /// retried.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::ItemNotFound(_)
                | Self::InvalidVariant(_)
                | Self::OptionNotFound(_)
                | Self::Expired(_)
                | Self::MultipleAnswersNotAllowed
                | Self::BadRequest(_)
        )
    }

    /// Returns whether the caller may retry the whole operation.
    ///
    /// Only true for [`Self::ConcurrencyConflict`]: the retry ceiling was
    /// exhausted under unusually high contention on one item, not a logic
    /// error.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrencyConflict(_))
    }
}

// === From implementations ===

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}
