use thiserror::Error;

/// Structural problem found while building a chain.
///
/// These are the only hard failures the crate produces. Everything that goes
/// wrong while a chain runs is reported through the result sequence instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ChainError {
    /// An operation was registered with an empty name.
    #[error("operation at position {position} has an empty name")]
    EmptyName {
        /// Zero-based position of the operation in the builder.
        position: usize,
    },

    /// Two operations share a name.
    #[error("operation name '{name}' is used more than once")]
    DuplicateName {
        /// The repeated name.
        name: String,
    },

    /// A link, divergence or termination refers to an operation that is not part of the chain.
    #[error("'{from}' refers to unknown operation '{to}'")]
    UnknownOperation {
        /// Operation (or builder call) holding the reference.
        from: String,
        /// The name that could not be resolved.
        to: String,
    },

    /// Following `next` and divergence links from an operation leads back to it.
    #[error("operation '{name}' is part of a cycle")]
    Cycle {
        /// An operation on the cycle.
        name: String,
    },
}
