use std::ops::Deref;

use serde::Serialize;

/// Record of one executed operation.
///
/// The engine creates exactly one result per operation it runs. The undo pass
/// updates that same record instead of appending a new one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResult<T> {
    /// Name of the operation that produced this result.
    pub operation_name: String,
    pub result_message: String,
    pub info_messages: Vec<String>,
    pub error_messages: Vec<String>,
    /// The forward action reported failure.
    pub operation_failed: bool,
    /// Snapshot of the operation's criticality.
    pub critical: bool,
    /// The forward action asked to branch.
    pub diverge: bool,
    /// Operation the execution branched to, if the branch was taken.
    pub diverge_to: Option<String>,
    /// `false` when the operation halted the forward pass.
    pub continue_path: bool,
    pub output: Option<T>,
    pub operation_object: Option<serde_json::Value>,
    /// Snapshot of the operation's undo support.
    pub operation_undo_possible: bool,
    /// The undo pass invoked this operation's compensating action.
    pub operation_undo_attempted: bool,
    /// The compensating action itself failed.
    pub operation_undo_failed: bool,
}

impl<T> OperationResult<T> {
    fn status_marker(&self) -> &'static str {
        if self.operation_undo_failed {
            "⚠"
        } else if self.operation_undo_attempted {
            "↩"
        } else if self.operation_failed {
            "✗"
        } else if self.diverge_to.is_some() {
            "⤷"
        } else {
            "✓"
        }
    }
}

/// Results of one execution, in the order the operations ran.
///
/// Branches that were not taken leave no trace here.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultSequence<T> {
    results: Vec<OperationResult<T>>,
}

impl<T> ResultSequence<T> {
    pub(crate) fn new(results: Vec<OperationResult<T>>) -> Self {
        Self { results }
    }

    /// First result of the sequence, or `None` when nothing ran.
    #[must_use]
    pub fn head(&self) -> Option<ResultNode<'_, T>> {
        if self.results.is_empty() {
            None
        } else {
            Some(ResultNode {
                results: &self.results,
                index: 0,
            })
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&OperationResult<T>> {
        self.results.get(index)
    }

    /// Result of the operation with the given name.
    #[must_use]
    pub fn find(&self, operation_name: &str) -> Option<&OperationResult<T>> {
        self.results
            .iter()
            .find(|result| result.operation_name == operation_name)
    }

    /// The critical failure that stopped the execution, if any.
    #[must_use]
    pub fn failed_operation(&self) -> Option<&OperationResult<T>> {
        self.results
            .iter()
            .find(|result| result.operation_failed && result.critical)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OperationResult<T>> {
        self.results.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[OperationResult<T>] {
        &self.results
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<OperationResult<T>> {
        self.results
    }

    /// One line per result for display.
    #[must_use]
    pub fn summary(&self) -> String {
        self.results
            .iter()
            .map(|result| format!("{} {}", result.status_marker(), result.operation_name))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<'a, T> IntoIterator for &'a ResultSequence<T> {
    type Item = &'a OperationResult<T>;
    type IntoIter = std::slice::Iter<'a, OperationResult<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

impl<T> IntoIterator for ResultSequence<T> {
    type Item = OperationResult<T>;
    type IntoIter = std::vec::IntoIter<OperationResult<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

/// Linked view of a result inside its sequence.
///
/// Dereferences to the [`OperationResult`] and follows
/// [`next_operation_result`](ResultNode::next_operation_result) to the result
/// of the operation that ran after it.
pub struct ResultNode<'a, T> {
    results: &'a [OperationResult<T>],
    index: usize,
}

impl<'a, T> ResultNode<'a, T> {
    /// Result of the next executed operation; `None` on the last one.
    #[must_use]
    pub fn next_operation_result(&self) -> Option<ResultNode<'a, T>> {
        let index = self.index + 1;
        (index < self.results.len()).then_some(ResultNode {
            results: self.results,
            index,
        })
    }

    /// Position of this result in execution order.
    #[must_use]
    pub fn position(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn result(&self) -> &'a OperationResult<T> {
        &self.results[self.index]
    }
}

impl<T> Clone for ResultNode<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ResultNode<'_, T> {}

impl<T> Deref for ResultNode<'_, T> {
    type Target = OperationResult<T>;

    fn deref(&self) -> &Self::Target {
        self.result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str) -> OperationResult<()> {
        OperationResult {
            operation_name: name.to_string(),
            result_message: String::new(),
            info_messages: Vec::new(),
            error_messages: Vec::new(),
            operation_failed: false,
            critical: true,
            diverge: false,
            diverge_to: None,
            continue_path: true,
            output: None,
            operation_object: None,
            operation_undo_possible: true,
            operation_undo_attempted: false,
            operation_undo_failed: false,
        }
    }

    #[test]
    fn empty_sequence_has_no_head() {
        let sequence: ResultSequence<()> = ResultSequence::new(Vec::new());

        assert!(sequence.head().is_none());
        assert!(sequence.is_empty());
    }

    #[test]
    fn nodes_link_in_execution_order() {
        let sequence = ResultSequence::new(vec![result("a"), result("b"), result("c")]);

        let mut names = Vec::new();
        let mut node = sequence.head();
        while let Some(current) = node {
            names.push(current.operation_name.clone());
            node = current.next_operation_result();
        }

        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn last_node_has_no_next() {
        let sequence = ResultSequence::new(vec![result("only")]);

        let head = sequence.head().expect("sequence has a head");

        assert_eq!(head.position(), 0);
        assert!(head.next_operation_result().is_none());
    }

    #[test]
    fn find_looks_up_by_name() {
        let sequence = ResultSequence::new(vec![result("a"), result("b")]);

        assert_eq!(
            sequence.find("b").map(|r| r.operation_name.as_str()),
            Some("b")
        );
        assert!(sequence.find("z").is_none());
    }

    #[test]
    fn failed_operation_ignores_non_critical_failures() {
        let mut soft = result("soft");
        soft.operation_failed = true;
        soft.critical = false;
        let mut hard = result("hard");
        hard.operation_failed = true;

        let sequence = ResultSequence::new(vec![soft, hard]);

        assert_eq!(
            sequence.failed_operation().map(|r| r.operation_name.as_str()),
            Some("hard")
        );
    }

    #[test]
    fn summary_marks_each_state() {
        let executed = result("executed");
        let mut failed = result("failed");
        failed.operation_failed = true;
        let mut undone = result("undone");
        undone.operation_undo_attempted = true;
        let mut undo_failed = result("undo_failed");
        undo_failed.operation_undo_attempted = true;
        undo_failed.operation_undo_failed = true;
        let mut branched = result("branched");
        branched.diverge = true;
        branched.diverge_to = Some("elsewhere".to_string());

        let summary =
            ResultSequence::new(vec![executed, failed, undone, undo_failed, branched]).summary();

        assert_eq!(
            summary,
            "✓ executed\n✗ failed\n↩ undone\n⚠ undo_failed\n⤷ branched"
        );
    }

    #[test]
    fn serializes_with_camel_case_fields() -> anyhow::Result<()> {
        let sequence = ResultSequence::new(vec![result("a")]);

        let json = serde_json::to_value(&sequence)?;

        assert_eq!(json[0]["operationName"], "a");
        assert_eq!(json[0]["operationUndoPossible"], true);
        assert_eq!(json[0]["divergeTo"], serde_json::Value::Null);
        Ok(())
    }
}
