//! Integration tests for the undo cascade after a critical failure.

use std::sync::{Arc, Mutex};

use imperative_operations::{
    ActionError, Chain, FnOperation, Operation, Outcome, UndoRequest, async_trait,
};

type Log = Arc<Mutex<Vec<String>>>;

fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().expect("log lock poisoned").clone()
}

struct TrackedOperation {
    name: &'static str,
    undo_supported: bool,
    fails: bool,
    undo_fails: bool,
    log: Log,
}

impl TrackedOperation {
    fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            undo_supported: true,
            fails: false,
            undo_fails: false,
            log: Arc::clone(log),
        }
    }

    fn without_undo(mut self) -> Self {
        self.undo_supported = false;
        self
    }

    fn failing(mut self) -> Self {
        self.fails = true;
        self
    }

    fn with_failing_undo(mut self) -> Self {
        self.undo_fails = true;
        self
    }
}

#[async_trait]
impl Operation<i32> for TrackedOperation {
    fn name(&self) -> &str {
        self.name
    }

    fn undo_supported(&self) -> bool {
        self.undo_supported
    }

    async fn forward(&self, input: Option<i32>) -> Result<Outcome<i32>, ActionError> {
        self.log
            .lock()
            .expect("log lock poisoned")
            .push(format!("forward {}", self.name));
        if self.fails {
            return Err(ActionError::from(format!("{} failed", self.name)));
        }
        Ok(Outcome::success().with_output(input.unwrap_or_default() + 1))
    }

    async fn undo(&self, request: UndoRequest<i32>) -> Result<(), ActionError> {
        self.log.lock().expect("log lock poisoned").push(format!(
            "undo {}: input was {:?}",
            self.name, request.input
        ));
        if self.undo_fails {
            return Err(ActionError::from("cannot undo"));
        }
        Ok(())
    }
}

fn explode(reason: &str) -> Result<Outcome<i32>, ActionError> {
    panic!("{reason}")
}

#[tokio::test]
async fn critical_failure_undoes_every_undoable_operation() -> anyhow::Result<()> {
    let log = new_log();
    let chain = Chain::builder()
        .then(TrackedOperation::new("Initialize Test Sub Op 1", &log))
        .then(TrackedOperation::new("Initialize Test Sub Op 2", &log))
        .then(TrackedOperation::new("Initialize Test Sub Op No Undo", &log).without_undo())
        .then(TrackedOperation::new("Initialize Test Sub Op 4", &log))
        .then(TrackedOperation::new("Initialize Test Sub Op 5", &log))
        .then(
            TrackedOperation::new("Initialize Test Sub Op fail", &log)
                .failing()
                .with_failing_undo(),
        )
        .build()?;

    let completion = chain.run(None).await;
    let results = completion.results.as_slice();

    // (name, failed, undo possible, undo attempted, undo failed)
    let expected = [
        ("Initialize Test Sub Op 1", false, true, true, false),
        ("Initialize Test Sub Op 2", false, true, true, false),
        ("Initialize Test Sub Op No Undo", false, false, false, false),
        ("Initialize Test Sub Op 4", false, true, true, false),
        ("Initialize Test Sub Op 5", false, true, true, false),
        ("Initialize Test Sub Op fail", true, true, true, true),
    ];
    assert_eq!(results.len(), expected.len());
    for (result, (name, failed, possible, attempted, undo_failed)) in results.iter().zip(expected)
    {
        assert_eq!(result.operation_name, name);
        assert_eq!(result.operation_failed, failed, "{name}");
        assert_eq!(result.operation_undo_possible, possible, "{name}");
        assert_eq!(result.operation_undo_attempted, attempted, "{name}");
        assert_eq!(result.operation_undo_failed, undo_failed, "{name}");
    }
    Ok(())
}

#[tokio::test]
async fn undo_runs_in_reverse_execution_order() -> anyhow::Result<()> {
    let log = new_log();
    let chain = Chain::builder()
        .then(TrackedOperation::new("a", &log))
        .then(TrackedOperation::new("b", &log))
        .then(TrackedOperation::new("c", &log))
        .then(TrackedOperation::new("boom", &log).failing().without_undo())
        .build()?;

    chain.run(Some(10)).await;

    assert_eq!(
        entries(&log),
        vec![
            "forward a",
            "forward b",
            "forward c",
            "forward boom",
            "undo c: input was Some(12)",
            "undo b: input was Some(11)",
            "undo a: input was Some(10)",
        ]
    );
    Ok(())
}

#[tokio::test]
async fn failing_operation_is_undone_when_it_supports_undo() -> anyhow::Result<()> {
    let log = new_log();
    let chain = Chain::builder()
        .then(TrackedOperation::new("a", &log))
        .then(TrackedOperation::new("b", &log).failing())
        .build()?;

    let completion = chain.run(None).await;

    let failed = completion
        .results
        .find("b")
        .expect("failing operation has a result");
    assert!(failed.operation_failed);
    assert!(failed.operation_undo_attempted);
    assert!(!failed.operation_undo_failed);
    assert_eq!(
        entries(&log)[2..],
        ["undo b: input was Some(1)", "undo a: input was None"]
    );
    Ok(())
}

#[tokio::test]
async fn undo_failure_does_not_stop_the_cascade() -> anyhow::Result<()> {
    let log = new_log();
    let chain = Chain::builder()
        .then(TrackedOperation::new("first", &log))
        .then(TrackedOperation::new("stubborn", &log).with_failing_undo())
        .then(TrackedOperation::new("last", &log).failing().without_undo())
        .build()?;

    let completion = chain.run(None).await;

    let stubborn = completion.results.find("stubborn").expect("stubborn ran");
    assert!(stubborn.operation_undo_attempted);
    assert!(stubborn.operation_undo_failed);
    assert_eq!(stubborn.error_messages, vec!["undo failed: cannot undo"]);

    let first = completion.results.find("first").expect("first ran");
    assert!(first.operation_undo_attempted);
    assert!(!first.operation_undo_failed);
    Ok(())
}

#[tokio::test]
async fn failure_of_the_first_operation_undoes_only_itself() -> anyhow::Result<()> {
    let log = new_log();
    let chain = Chain::builder()
        .then(TrackedOperation::new("only", &log).failing())
        .then(TrackedOperation::new("never", &log))
        .build()?;

    let completion = chain.run(Some(5)).await;

    assert_eq!(completion.results.len(), 1);
    assert_eq!(entries(&log), vec!["forward only", "undo only: input was Some(5)"]);
    assert_eq!(completion.output, Some(5));
    Ok(())
}

#[tokio::test]
async fn forward_error_text_is_recorded() -> anyhow::Result<()> {
    let log = new_log();
    let chain = Chain::builder()
        .then(TrackedOperation::new("broken", &log).failing().without_undo())
        .build()?;

    let completion = chain.run(None).await;

    let result = completion.results.find("broken").expect("broken ran");
    assert_eq!(result.error_messages, vec!["broken failed"]);
    assert_eq!(result.result_message, "broken failed");
    assert!(!result.operation_undo_attempted);
    Ok(())
}

#[tokio::test]
async fn non_critical_failure_neither_halts_nor_undoes() -> anyhow::Result<()> {
    let log = new_log();
    let chain = Chain::builder()
        .then(TrackedOperation::new("a", &log))
        .then(
            FnOperation::new("optional", |_| async {
                Ok(Outcome::failure("optional step skipped"))
            })
            .non_critical(),
        )
        .then(TrackedOperation::new("c", &log))
        .build()?;

    let completion = chain.run(None).await;

    assert_eq!(completion.results.len(), 3);
    let optional = completion.results.find("optional").expect("optional ran");
    assert!(optional.operation_failed);
    assert!(!optional.critical);
    assert!(completion.results.failed_operation().is_none());
    assert!(
        completion
            .results
            .iter()
            .all(|result| !result.operation_undo_attempted)
    );
    assert_eq!(entries(&log), vec!["forward a", "forward c"]);
    Ok(())
}

#[tokio::test]
async fn panicking_operation_is_a_failure_without_detail() -> anyhow::Result<()> {
    let log = new_log();
    let chain = Chain::builder()
        .then(TrackedOperation::new("before", &log))
        .then(FnOperation::new("explodes", |_: Option<i32>| async {
            explode("unexpected state")
        }))
        .build()?;

    let completion = chain.run(None).await;

    let exploded = completion.results.find("explodes").expect("explodes ran");
    assert!(exploded.operation_failed);
    assert!(exploded.error_messages.is_empty());
    assert!(exploded.result_message.is_empty());
    assert!(!exploded.operation_undo_possible);

    let before = completion.results.find("before").expect("before ran");
    assert!(before.operation_undo_attempted);
    Ok(())
}

#[tokio::test]
async fn panicking_undo_is_an_undo_failure() -> anyhow::Result<()> {
    let chain: Chain<i32> = Chain::builder()
        .then(
            FnOperation::new("fragile", |_| async { Ok(Outcome::success()) })
                .with_undo(|_| async { explode("undo blew up").map(|_| ()) }),
        )
        .then(FnOperation::new("boom", |_| async {
            Ok(Outcome::failure("boom"))
        }))
        .build()?;

    let completion = chain.run(None).await;

    let fragile = completion.results.find("fragile").expect("fragile ran");
    assert!(fragile.operation_undo_attempted);
    assert!(fragile.operation_undo_failed);
    Ok(())
}

#[tokio::test]
async fn critical_failure_that_halts_still_undoes() -> anyhow::Result<()> {
    let log = new_log();
    let chain = Chain::builder()
        .then(TrackedOperation::new("a", &log))
        .then(FnOperation::new("stop", |_| async {
            Ok(Outcome::failure("stop here").halt())
        }))
        .build()?;

    let completion = chain.run(None).await;

    assert!(!completion.results.find("stop").expect("stop ran").continue_path);
    assert!(
        completion
            .results
            .find("a")
            .expect("a ran")
            .operation_undo_attempted
    );
    Ok(())
}
