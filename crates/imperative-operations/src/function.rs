use std::future::Future;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::operation::{ActionError, Operation, UndoRequest};
use crate::outcome::Outcome;

type ForwardFn<T> =
    Box<dyn Fn(Option<T>) -> BoxFuture<'static, Result<Outcome<T>, ActionError>> + Send + Sync>;

type UndoFn<T> =
    Box<dyn Fn(UndoRequest<T>) -> BoxFuture<'static, Result<(), ActionError>> + Send + Sync>;

/// An [`Operation`] assembled from closures.
///
/// ```
/// use imperative_operations::{FnOperation, Outcome};
///
/// let op = FnOperation::new("double", |input: Option<i32>| async move {
///     Ok(Outcome::success().with_output(input.unwrap_or_default() * 2))
/// })
/// .with_undo(|_request| async { Ok(()) });
/// # let _ = op;
/// ```
pub struct FnOperation<T> {
    name: String,
    critical: bool,
    forward: ForwardFn<T>,
    undo: Option<UndoFn<T>>,
}

impl<T> FnOperation<T>
where
    T: Send + 'static,
{
    /// Create a critical operation without undo support.
    #[must_use]
    pub fn new<F, Fut>(name: impl Into<String>, forward: F) -> Self
    where
        F: Fn(Option<T>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Outcome<T>, ActionError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            critical: true,
            forward: Box::new(move |input| Box::pin(forward(input))),
            undo: None,
        }
    }

    /// Give the operation a compensating action, which also marks it as undoable.
    #[must_use]
    pub fn with_undo<U, Fut>(mut self, undo: U) -> Self
    where
        U: Fn(UndoRequest<T>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ActionError>> + Send + 'static,
    {
        self.undo = Some(Box::new(move |request| Box::pin(undo(request))));
        self
    }

    /// Let failures of this operation be recorded without stopping the chain.
    #[must_use]
    pub fn non_critical(mut self) -> Self {
        self.critical = false;
        self
    }
}

#[async_trait]
impl<T> Operation<T> for FnOperation<T>
where
    T: Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn critical(&self) -> bool {
        self.critical
    }

    fn undo_supported(&self) -> bool {
        self.undo.is_some()
    }

    async fn forward(&self, input: Option<T>) -> Result<Outcome<T>, ActionError> {
        (self.forward)(input).await
    }

    async fn undo(&self, request: UndoRequest<T>) -> Result<(), ActionError> {
        match &self.undo {
            Some(undo) => undo(request).await,
            None => Ok(()),
        }
    }
}
