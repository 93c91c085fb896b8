use thiserror::Error;

/// Failure reported by the query driver, from either the cursor open call or
/// a row pull. Constructed by [`LazyQuery`](super::LazyQuery) and
/// [`RowCursor`](super::RowCursor) implementations.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct DriverError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl DriverError {
    /// Builds a driver error from a message alone.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Builds a driver error wrapping an underlying driver failure.
    #[must_use]
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

/// Terminal failure delivered through a [`CursorStream`](super::CursorStream).
#[derive(Debug, Error)]
pub enum StreamError {
    /// The driver failed independently of cancellation.
    #[error("query driver failure: {0}")]
    Driver(#[from] DriverError),

    /// The stream was stopped cooperatively. Driver failures that are a side
    /// effect of the adapter's own cancel request are reclassified into this
    /// variant.
    #[error("query stream cancelled")]
    Cancelled,
}

impl StreamError {
    /// Returns true for the cooperative-stop variant.
    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        matches!(self, StreamError::Cancelled)
    }
}
