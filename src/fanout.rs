//! Launch a batch of independent lookups together, wait for every one of them
//! to settle, then fold the outcomes with a reducer.
//!
//! Outcomes are returned in input order, never completion order.

use std::future::Future;

use futures::future::join_all;

/// Runs every operation concurrently and hands the settled outcomes, in input
/// order, to `reduce`.
pub async fn fan_out<I, Fut, T, E, R>(ops: I, reduce: impl FnOnce(Vec<Result<T, E>>) -> R) -> R
where
    I: IntoIterator<Item = Fut>,
    Fut: Future<Output = Result<T, E>>,
{
    let outcomes = join_all(ops).await;
    reduce(outcomes)
}

/// Keeps the successes, or returns every failure if nothing succeeded.
///
/// An empty batch counts as "all failed" with no reasons.
pub fn successes_or_all_failed<T, E>(outcomes: Vec<Result<T, E>>) -> Result<Vec<T>, Vec<E>> {
    let mut successes = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(value) => successes.push(value),
            Err(err) => failures.push(err),
        }
    }

    if successes.is_empty() {
        Err(failures)
    } else {
        Ok(successes)
    }
}

/// Replaces every failure with the value `recover` builds from it.
pub fn recover_each<T, E>(outcomes: Vec<Result<T, E>>, mut recover: impl FnMut(E) -> T) -> Vec<T> {
    outcomes
        .into_iter()
        .map(|outcome| outcome.unwrap_or_else(&mut recover))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn after(ms: u64, outcome: Result<u32, &'static str>) -> Result<u32, &'static str> {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        outcome
    }

    #[tokio::test(start_paused = true)]
    async fn outcomes_follow_input_order_not_completion_order() {
        let started = tokio::time::Instant::now();
        let outcomes = fan_out(
            vec![after(30, Ok(1)), after(10, Err("two")), after(20, Ok(3))],
            |outcomes| outcomes,
        )
        .await;

        assert_eq!(outcomes, vec![Ok(1), Err("two"), Ok(3)]);
        // All three ran side by side.
        assert!(started.elapsed() < Duration::from_millis(60));
    }

    #[test]
    fn all_failed_keeps_reasons_in_order() {
        let outcomes: Vec<Result<u32, &str>> = vec![Err("a"), Err("b")];
        assert_eq!(successes_or_all_failed(outcomes), Err(vec!["a", "b"]));

        let outcomes: Vec<Result<u32, &str>> = vec![Err("a"), Ok(2), Ok(3)];
        assert_eq!(successes_or_all_failed(outcomes), Ok(vec![2, 3]));

        let outcomes: Vec<Result<u32, &str>> = Vec::new();
        assert_eq!(successes_or_all_failed(outcomes), Err(vec![]));
    }

    #[test]
    fn recover_each_fills_in_failures() {
        let outcomes: Vec<Result<u32, &str>> = vec![Ok(1), Err("boom"), Ok(3)];
        assert_eq!(recover_each(outcomes, |_| 0), vec![1, 0, 3]);
    }
}
