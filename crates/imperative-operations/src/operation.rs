use async_trait::async_trait;

use crate::outcome::Outcome;

/// Failure reported by a forward or undo action.
pub type ActionError = Box<dyn std::error::Error + Send + Sync>;

/// Value passed to an undo action.
///
/// Carries the input the forward action received together with what it
/// produced, so the action can reverse exactly that work.
#[derive(Debug, Clone, PartialEq)]
pub struct UndoRequest<T> {
    /// Running value handed to the forward action.
    pub input: Option<T>,
    /// Output recorded on the operation's result.
    pub output: Option<T>,
    /// Application object recorded on the operation's result.
    pub operation_object: Option<serde_json::Value>,
}

/// One unit of work in a chain.
///
/// An operation transforms the running value of an execution and reports how
/// it went through an [`Outcome`]. Operations that can reverse their effects
/// declare it with [`Operation::undo_supported`] and implement
/// [`Operation::undo`].
///
/// # Type Parameters
///
/// - `T`: the running parameter/output value threaded through the chain.
///   `None` stands for "no parameters".
#[async_trait]
pub trait Operation<T>: Send + Sync
where
    T: Send + 'static,
{
    /// Name used in results and diagnostics. Unique within a chain.
    fn name(&self) -> &str;

    /// Whether a failure of this operation stops the chain and unwinds it.
    fn critical(&self) -> bool {
        true
    }

    /// Whether this operation has a compensating action.
    ///
    /// Fixed per operation: the engine snapshots it into every result and
    /// only calls [`Operation::undo`] when it is `true`.
    fn undo_supported(&self) -> bool {
        false
    }

    /// Perform the operation's work.
    ///
    /// # Errors
    ///
    /// An error is recorded on the result as a failure of this operation.
    async fn forward(&self, input: Option<T>) -> Result<Outcome<T>, ActionError>;

    /// Reverse the operation's work after a later critical failure.
    ///
    /// The default implementation does nothing.
    ///
    /// # Errors
    ///
    /// An error marks the undo as failed; the rest of the cascade still runs.
    async fn undo(&self, request: UndoRequest<T>) -> Result<(), ActionError> {
        let _ = request;
        Ok(())
    }
}
