use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tracing::{debug, warn};

use crate::chain::Chain;
use crate::operation::UndoRequest;
use crate::outcome::Outcome;
use crate::result::{OperationResult, ResultSequence};

/// Final state of an execution, as handed to the completion callback.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion<T> {
    /// Running value after the last operation reached.
    pub output: Option<T>,
    /// Results of every executed operation, in execution order.
    pub results: ResultSequence<T>,
}

/// An executed operation: which node ran and the value it was given.
struct Visit<T> {
    node: usize,
    input: Option<T>,
}

impl<T> Chain<T>
where
    T: Clone + Send + 'static,
{
    /// Execute the chain and hand the outcome to `on_complete`.
    ///
    /// Operations run one at a time, starting with the first one. A critical
    /// failure stops the forward pass and undoes every executed operation that
    /// supports undo, most recent first. `on_complete` is then called exactly
    /// once with the final running value and the result sequence, and its
    /// return value is passed through.
    ///
    /// Nothing that happens inside an operation escapes as an error or a
    /// panic; all of it is reported in the results.
    pub async fn execute<F, R>(&self, input: Option<T>, on_complete: F) -> R
    where
        F: FnOnce(Option<T>, ResultSequence<T>) -> R,
    {
        let (output, results) = self.execute_internal(input).await;
        on_complete(output, ResultSequence::new(results))
    }

    /// Execute the chain and return its [`Completion`].
    pub async fn run(&self, input: Option<T>) -> Completion<T> {
        self.execute(input, |output, results| Completion { output, results })
            .await
    }

    async fn execute_internal(&self, input: Option<T>) -> (Option<T>, Vec<OperationResult<T>>) {
        let mut results: Vec<OperationResult<T>> = Vec::new();
        let mut visits: Vec<Visit<T>> = Vec::new();
        let mut value = input;
        let mut current = self.entry();

        while let Some(index) = current {
            let node = &self.nodes[index];
            let operation = &node.operation;
            debug!(operation = operation.name(), "executing operation");

            let input = value.clone();
            let outcome = match AssertUnwindSafe(operation.forward(input.clone()))
                .catch_unwind()
                .await
            {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(error)) => Outcome::failure(error.to_string()),
                Err(_) => {
                    warn!(operation = operation.name(), "operation panicked");
                    Outcome::silent_failure()
                }
            };

            let diverge_to = if outcome.diverge {
                node.diverge_target
            } else {
                None
            };
            let critical = operation.critical();
            let failed = outcome.failed;
            let halted = !outcome.continue_path;

            if let Some(output) = &outcome.output {
                value = Some(output.clone());
            }

            debug!(
                operation = operation.name(),
                failed,
                critical,
                halted,
                diverged = diverge_to.is_some(),
                "operation completed"
            );

            visits.push(Visit { node: index, input });
            results.push(OperationResult {
                operation_name: operation.name().to_string(),
                result_message: outcome.result_message,
                info_messages: outcome.info_messages,
                error_messages: outcome.error_messages,
                operation_failed: failed,
                critical,
                diverge: outcome.diverge,
                diverge_to: diverge_to
                    .map(|target| self.nodes[target].operation.name().to_string()),
                continue_path: outcome.continue_path,
                output: outcome.output,
                operation_object: outcome.operation_object,
                operation_undo_possible: operation.undo_supported(),
                operation_undo_attempted: false,
                operation_undo_failed: false,
            });

            if failed && critical {
                warn!(
                    operation = operation.name(),
                    "critical operation failed, undoing completed operations"
                );
                self.undo(&mut results, visits).await;
                return (value, results);
            }

            if halted {
                debug!(operation = operation.name(), "operation halted the chain");
                break;
            }

            current = diverge_to.or(node.next);
        }

        (value, results)
    }

    async fn undo(&self, results: &mut [OperationResult<T>], visits: Vec<Visit<T>>) {
        for (result, visit) in results.iter_mut().zip(visits).rev() {
            if !result.operation_undo_possible {
                debug!(
                    operation = result.operation_name.as_str(),
                    "operation cannot be undone, skipping"
                );
                continue;
            }

            let operation = &self.nodes[visit.node].operation;
            let request = UndoRequest {
                input: visit.input,
                output: result.output.clone(),
                operation_object: result.operation_object.clone(),
            };

            result.operation_undo_attempted = true;
            match AssertUnwindSafe(operation.undo(request)).catch_unwind().await {
                Ok(Ok(())) => {
                    debug!(operation = operation.name(), "operation undone");
                }
                Ok(Err(error)) => {
                    warn!(operation = operation.name(), %error, "undo failed");
                    result.operation_undo_failed = true;
                    result.error_messages.push(format!("undo failed: {error}"));
                }
                Err(_) => {
                    warn!(operation = operation.name(), "undo panicked");
                    result.operation_undo_failed = true;
                }
            }
        }
    }
}
