//! Ordered, one-at-a-time async evaluation that stops at the first satisfying result.
//!
//! Responsibility:
//! - Visit candidates strictly in order; candidate `i + 1` starts only after `i` finished
//! - Turn a failed step into a regular outcome via `recover` so the sequence keeps going
//! - Stop at the first `(candidate, outcome)` accepted by `stop`
//!
//! Notes:
//! - Nothing here knows about users or groups.
//! - `evaluate` may refuse to start a step by returning `Err`; that aborts the whole run
//!   and is returned to the caller untouched.
//! - No timeout is applied. Callers that need one wrap the step future themselves.

use std::future::Future;

/// Final state of a sequence run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sequenced<C, O, R> {
    /// `stop` accepted this candidate; later candidates were never evaluated.
    Satisfied { candidate: C, outcome: O },
    /// Every candidate was evaluated and rejected; carries `on_exhausted()`.
    Exhausted(R),
}

/// Run `evaluate` over `candidates` in order until `stop` returns `true`.
///
/// - `evaluate(c)` returns `Ok(step)` to start a step or `Err(fatal)` to abort the run.
/// - A step that resolves to `Err(e)` is mapped through `recover(c, e)`.
/// - `on_exhausted` is only called when no candidate satisfied `stop`.
pub async fn run_until_satisfied<I, C, O, E, F, R, Fut>(
    candidates: I,
    mut evaluate: impl FnMut(&C) -> Result<Fut, F>,
    mut recover: impl FnMut(&C, E) -> O,
    mut stop: impl FnMut(&C, &O) -> bool,
    on_exhausted: impl FnOnce() -> R,
) -> Result<Sequenced<C, O, R>, F>
where
    I: IntoIterator<Item = C>,
    Fut: Future<Output = Result<O, E>>,
{
    for (index, candidate) in candidates.into_iter().enumerate() {
        let step = evaluate(&candidate)?;

        let outcome = match step.await {
            Ok(outcome) => outcome,
            Err(err) => recover(&candidate, err),
        };

        if stop(&candidate, &outcome) {
            tracing::trace!(index, "sequence satisfied");
            return Ok(Sequenced::Satisfied { candidate, outcome });
        }
    }

    tracing::trace!("sequence exhausted");
    Ok(Sequenced::Exhausted(on_exhausted()))
}
