//! A single chain shared by concurrent executions.

use std::sync::Arc;
use std::time::Duration;

use imperative_operations::{Chain, FnOperation, Outcome};

fn slow_increment(name: &str) -> FnOperation<u64> {
    FnOperation::new(name, |input: Option<u64>| async move {
        tokio::time::sleep(Duration::from_millis(5)).await;
        Ok(Outcome::success().with_output(input.unwrap_or_default() + 1))
    })
    .with_undo(|_| async { Ok(()) })
}

fn reject_odd() -> FnOperation<u64> {
    FnOperation::new("reject_odd", |input: Option<u64>| async move {
        Ok(match input {
            Some(value) if value % 2 == 1 => Outcome::failure(format!("{value} is odd")),
            _ => Outcome::success(),
        })
    })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn executions_do_not_share_state() -> anyhow::Result<()> {
    let chain = Arc::new(
        Chain::builder()
            .then(slow_increment("first"))
            .then(slow_increment("second"))
            .then(reject_odd())
            .build()?,
    );

    let handles: Vec<_> = (0..16_u64)
        .map(|seed| {
            let chain = Arc::clone(&chain);
            tokio::spawn(async move { (seed, chain.run(Some(seed)).await) })
        })
        .collect();

    for handle in handles {
        let (seed, completion) = handle.await?;
        assert_eq!(completion.results.len(), 3);
        assert_eq!(completion.output, Some(seed + 2));

        let rejected = completion
            .results
            .find("reject_odd")
            .expect("reject_odd ran");
        if seed % 2 == 1 {
            assert!(rejected.operation_failed);
            assert_eq!(rejected.error_messages, vec![format!("{} is odd", seed + 2)]);
            assert!(
                completion
                    .results
                    .iter()
                    .filter(|result| result.operation_undo_possible)
                    .all(|result| result.operation_undo_attempted)
            );
        } else {
            assert!(completion.results.failed_operation().is_none());
        }
    }
    Ok(())
}
