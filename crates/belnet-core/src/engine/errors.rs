//! Error types for network construction and inference.

use thiserror::Error;

/// Errors that can occur while declaring probabilities or answering queries.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in the future without breaking changes.
///
/// All public APIs return `Result<T, ModelError>`; library code never panics
/// on bad input. Errors are synchronous and propagate to the immediate
/// caller — nothing is retried or suppressed internally.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ModelError {
    /// An argument of the wrong kind (e.g. a `given` row naming different
    /// parents than the row that opened the table).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An assigned probability falls outside `[0, 100]`.
    #[error("probability {0} out of range")]
    OutOfRange(f64),

    /// A commit or query referenced an event not present in the registry.
    #[error("unknown event: {0}")]
    UnknownEvent(String),

    /// A query needed a table entry that was never assigned. Incomplete
    /// networks fail loudly instead of producing silently wrong numbers.
    #[error("no probability assigned for {0}")]
    MissingProbability(String),

    /// A joint query omitted a parent of one of its events in both
    /// polarities, so the parent's truth value cannot be resolved.
    #[error("unresolved dependency: {0}")]
    UnresolvedDependency(String),
}
