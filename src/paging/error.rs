use thiserror::Error;

/// Errors raised while building keyset boundary predicates.
#[derive(Debug, Error)]
pub enum PagingError {
    /// The component list passed to the boundary builder was empty.
    #[error("keyset boundary requires at least one component")]
    EmptyKeyset,

    /// A token component failed its typed decode.
    #[error("invalid boundary value {value:?} for column '{column}': {source}")]
    Decode {
        /// Column the component belongs to.
        column: String,
        /// Raw token component that failed to decode.
        value: String,
        /// Underlying decoder failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
