use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ChainError;
use crate::operation::Operation;

pub(crate) struct Node<T>
where
    T: Send + 'static,
{
    pub(crate) operation: Arc<dyn Operation<T>>,
    pub(crate) next: Option<usize>,
    pub(crate) diverge_target: Option<usize>,
}

/// A validated, immutable graph of operations.
///
/// Execution starts at the first operation added to the builder and follows
/// each operation's `next` link, or its divergence target when the operation
/// asks to branch. The graph is acyclic, so every execution terminates.
///
/// A chain holds no per-execution state. It can be shared between any number
/// of concurrent executions.
pub struct Chain<T>
where
    T: Send + 'static,
{
    pub(crate) nodes: Vec<Node<T>>,
}

impl<T> Chain<T>
where
    T: Clone + Send + 'static,
{
    #[must_use]
    pub fn builder() -> ChainBuilder<T> {
        ChainBuilder::new()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Names of all operations in the order they were added.
    pub fn operation_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|node| node.operation.name())
    }

    pub(crate) fn entry(&self) -> Option<usize> {
        (!self.nodes.is_empty()).then_some(0)
    }
}

impl<T> Clone for Chain<T>
where
    T: Send + 'static,
{
    fn clone(&self) -> Self {
        Self {
            nodes: self
                .nodes
                .iter()
                .map(|node| Node {
                    operation: Arc::clone(&node.operation),
                    next: node.next,
                    diverge_target: node.diverge_target,
                })
                .collect(),
        }
    }
}

enum Edit {
    Link { from: String, to: String },
    Terminate { name: String },
    Diverge { from: String, to: String },
}

/// Builder for [`Chain`].
///
/// Operations run in the order they are added unless the order is changed
/// with [`link`](ChainBuilder::link) or [`terminate`](ChainBuilder::terminate).
/// References by name are resolved when the chain is built.
///
/// ```
/// use imperative_operations::{Chain, FnOperation, Outcome};
///
/// let chain: Chain<u32> = Chain::builder()
///     .then(FnOperation::new("check", |_| async { Ok(Outcome::success().diverge()) }))
///     .then(FnOperation::new("slow_path", |_| async { Ok(Outcome::success()) }))
///     .then(FnOperation::new("fast_path", |_| async { Ok(Outcome::success()) }))
///     .then(FnOperation::new("finish", |_| async { Ok(Outcome::success()) }))
///     .link("slow_path", "finish")
///     .diverge("check", "fast_path")
///     .build()
///     .expect("chain is well formed");
///
/// assert_eq!(chain.len(), 4);
/// ```
pub struct ChainBuilder<T>
where
    T: Send + 'static,
{
    operations: Vec<Arc<dyn Operation<T>>>,
    edits: Vec<Edit>,
}

impl<T> ChainBuilder<T>
where
    T: Clone + Send + 'static,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            operations: Vec::new(),
            edits: Vec::new(),
        }
    }

    /// Append an operation. Its `next` is whatever operation is appended after it.
    #[must_use]
    pub fn then<O>(self, operation: O) -> Self
    where
        O: Operation<T> + 'static,
    {
        self.then_shared(Arc::new(operation))
    }

    /// Append an operation that is shared with other chains.
    #[must_use]
    pub fn then_shared(mut self, operation: Arc<dyn Operation<T>>) -> Self {
        self.operations.push(operation);
        self
    }

    /// Make `to` the operation that follows `from`.
    #[must_use]
    pub fn link(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.edits.push(Edit::Link {
            from: from.into(),
            to: to.into(),
        });
        self
    }

    /// Make `name` a terminal operation.
    #[must_use]
    pub fn terminate(mut self, name: impl Into<String>) -> Self {
        self.edits.push(Edit::Terminate { name: name.into() });
        self
    }

    /// Declare `to` as the operation `from` branches to when it diverges.
    #[must_use]
    pub fn diverge(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.edits.push(Edit::Diverge {
            from: from.into(),
            to: to.into(),
        });
        self
    }

    /// Validate the graph and produce the chain.
    ///
    /// # Errors
    ///
    /// Returns a [`ChainError`] when an operation name is empty or repeated,
    /// when a link refers to an unknown operation, or when the links form a
    /// cycle.
    pub fn build(self) -> Result<Chain<T>, ChainError> {
        let mut index_by_name: HashMap<String, usize> = HashMap::new();
        for (position, operation) in self.operations.iter().enumerate() {
            let name = operation.name();
            if name.is_empty() {
                return Err(ChainError::EmptyName { position });
            }
            if index_by_name.insert(name.to_string(), position).is_some() {
                return Err(ChainError::DuplicateName {
                    name: name.to_string(),
                });
            }
        }

        let count = self.operations.len();
        let mut next: Vec<Option<usize>> = (0..count)
            .map(|index| (index + 1 < count).then_some(index + 1))
            .collect();
        let mut diverge_target: Vec<Option<usize>> = vec![None; count];

        let resolve = |from: &str, to: &str| {
            index_by_name
                .get(to)
                .copied()
                .ok_or_else(|| ChainError::UnknownOperation {
                    from: from.to_string(),
                    to: to.to_string(),
                })
        };

        for edit in &self.edits {
            match edit {
                Edit::Link { from, to } => {
                    let source = resolve("link", from)?;
                    next[source] = Some(resolve(from, to)?);
                }
                Edit::Terminate { name } => {
                    let source = resolve("terminate", name)?;
                    next[source] = None;
                }
                Edit::Diverge { from, to } => {
                    let source = resolve("diverge", from)?;
                    diverge_target[source] = Some(resolve(from, to)?);
                }
            }
        }

        let nodes: Vec<Node<T>> = self
            .operations
            .into_iter()
            .zip(next.into_iter().zip(diverge_target))
            .map(|(operation, (next, diverge_target))| Node {
                operation,
                next,
                diverge_target,
            })
            .collect();

        check_acyclic(&nodes)?;

        Ok(Chain { nodes })
    }
}

impl<T> Default for ChainBuilder<T>
where
    T: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

fn check_acyclic<T>(nodes: &[Node<T>]) -> Result<(), ChainError>
where
    T: Send + 'static,
{
    let mut marks = vec![Mark::Unvisited; nodes.len()];

    for start in 0..nodes.len() {
        if marks[start] != Mark::Unvisited {
            continue;
        }

        // Iterative depth-first walk; each frame remembers how many successors it has tried.
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        marks[start] = Mark::InProgress;

        while let Some((index, tried)) = stack.last_mut() {
            let node = &nodes[*index];
            let successors = [node.next, node.diverge_target];

            if let Some(successor) = successors.get(*tried) {
                *tried += 1;
                let Some(successor) = *successor else {
                    continue;
                };
                match marks[successor] {
                    Mark::InProgress => {
                        return Err(ChainError::Cycle {
                            name: nodes[successor].operation.name().to_string(),
                        });
                    }
                    Mark::Unvisited => {
                        marks[successor] = Mark::InProgress;
                        stack.push((successor, 0));
                    }
                    Mark::Done => {}
                }
            } else {
                marks[*index] = Mark::Done;
                stack.pop();
            }
        }
    }

    Ok(())
}
