//! Operation chains with branching and best-effort undo.
//!
//! A [`Chain`] is a graph of [`Operation`]s authored once and executed any
//! number of times. Each execution runs the operations one at a time, records
//! an [`OperationResult`] for every operation it visits, and may branch to an
//! operation's divergence target on request. When a critical operation fails,
//! every executed operation that supports undo is compensated in reverse order
//! before the completion callback runs.
//!
//! Failures inside operations never escape [`Chain::execute`]; they are data
//! in the [`ResultSequence`].

mod chain;
mod engine;
mod error;
mod function;
mod operation;
mod outcome;
mod result;

pub use async_trait::async_trait;
pub use chain::{Chain, ChainBuilder};
pub use engine::Completion;
pub use error::ChainError;
pub use function::FnOperation;
pub use operation::{ActionError, Operation, UndoRequest};
pub use outcome::Outcome;
pub use result::{OperationResult, ResultNode, ResultSequence};
