/// Completion signal of a forward action.
///
/// The engine turns an outcome into an [`OperationResult`](crate::OperationResult),
/// adding the operation name and the undo bookkeeping itself.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Outcome<T> {
    pub(crate) result_message: String,
    pub(crate) info_messages: Vec<String>,
    pub(crate) error_messages: Vec<String>,
    pub(crate) failed: bool,
    pub(crate) diverge: bool,
    pub(crate) continue_path: bool,
    pub(crate) output: Option<T>,
    pub(crate) operation_object: Option<serde_json::Value>,
}

impl<T> Outcome<T> {
    /// The operation completed and the chain may proceed.
    pub fn success() -> Self {
        Self {
            result_message: String::new(),
            info_messages: Vec::new(),
            error_messages: Vec::new(),
            failed: false,
            diverge: false,
            continue_path: true,
            output: None,
            operation_object: None,
        }
    }

    /// The operation failed; `message` becomes both the result message and an error message.
    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        let mut outcome = Self::success();
        outcome.failed = true;
        outcome.error_messages.push(message.clone());
        outcome.result_message = message;
        outcome
    }

    /// Failure without any detail attached.
    pub(crate) fn silent_failure() -> Self {
        let mut outcome = Self::success();
        outcome.failed = true;
        outcome
    }

    /// Set the value handed to the next operation.
    pub fn with_output(mut self, output: T) -> Self {
        self.output = Some(output);
        self
    }

    /// Attach an application object to the result.
    pub fn with_object(mut self, object: serde_json::Value) -> Self {
        self.operation_object = Some(object);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.result_message = message.into();
        self
    }

    pub fn info(mut self, message: impl Into<String>) -> Self {
        self.info_messages.push(message.into());
        self
    }

    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.error_messages.push(message.into());
        self
    }

    /// Continue with the operation's divergence target instead of its `next`.
    pub fn diverge(mut self) -> Self {
        self.diverge = true;
        self
    }

    /// Stop the forward pass after this operation without it being a failure.
    pub fn halt(mut self) -> Self {
        self.continue_path = false;
        self
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.failed
    }
}

impl<T> Default for Outcome<T> {
    fn default() -> Self {
        Self::success()
    }
}
