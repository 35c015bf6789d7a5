use std::future::Future;
use std::time::Duration;

use tracing::{Instrument, debug, info_span, warn};

use crate::gemini::{CallError, ContentGenerator};
use crate::state_machine::{AttemptOutcome, CallAttempt, RetryMachine, RetryPolicy, Transition};

/// Suspends the current task between attempts.
pub trait Sleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Sleeps on the tokio timer, yielding to other tasks meanwhile.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

/// Runs prompts through a [`ContentGenerator`] with bounded exponential backoff.
pub struct CallExecutor<G, S = TokioSleeper> {
    generator: G,
    sleeper: S,
    policy: RetryPolicy,
}

impl<G: ContentGenerator> CallExecutor<G, TokioSleeper> {
    pub fn new(generator: G, policy: RetryPolicy) -> Self {
        Self::with_sleeper(generator, TokioSleeper, policy)
    }
}

impl<G: ContentGenerator, S: Sleeper> CallExecutor<G, S> {
    pub fn with_sleeper(generator: G, sleeper: S, policy: RetryPolicy) -> Self {
        Self {
            generator,
            sleeper,
            policy,
        }
    }

    /// Execute a prompt with the configured retry policy.
    pub async fn execute(&self, prompt: &str) -> Result<String, CallError> {
        self.execute_with_policy(prompt, self.policy).await
    }

    /// Execute a prompt, retrying rate limits, transport and server failures
    /// up to `policy.max_retries` total attempts.
    ///
    /// Only the last attempt's error is returned. A malformed success body
    /// is returned immediately without another attempt.
    pub async fn execute_with_policy(
        &self,
        prompt: &str,
        policy: RetryPolicy,
    ) -> Result<String, CallError> {
        let mut call = CallAttempt::new(policy);
        let span = info_span!("call", call_id = %call.call_id);

        async move {
            loop {
                let result = self.generator.generate(prompt).await;
                let outcome = match &result {
                    Ok(_) => AttemptOutcome::Success,
                    Err(e) if e.is_retryable() => AttemptOutcome::Retryable,
                    Err(_) => AttemptOutcome::Fatal,
                };
                let attempt = call.attempt;

                match RetryMachine::next(&mut call, outcome) {
                    Transition::Backoff { delay } => {
                        if let Err(e) = &result {
                            log_retry(attempt, call.policy.max_retries, e, delay);
                        }
                        self.sleeper.sleep(delay).await;
                        RetryMachine::resume(&mut call);
                    }
                    Transition::Succeed => {
                        debug_assert!(call.state.is_terminal());
                        debug!(
                            attempts = attempt,
                            elapsed_ms = call.elapsed_ms(),
                            "call succeeded"
                        );
                        return result;
                    }
                    Transition::Exhaust | Transition::Fail => {
                        if let Err(e) = &result {
                            debug!(
                                attempts = attempt,
                                kind = e.kind(),
                                state = %call.state,
                                elapsed_ms = call.elapsed_ms(),
                                "call gave up: {e}"
                            );
                        }
                        return result;
                    }
                }
            }
        }
        .instrument(span)
        .await
    }
}

fn log_retry(attempt: u32, max: u32, err: &CallError, delay: Duration) {
    match err {
        CallError::RateLimited { .. } => warn!(
            attempt,
            max,
            "Rate limit exceeded. Retrying in {}s...",
            delay.as_secs_f64()
        ),
        _ => warn!(
            attempt,
            max,
            kind = err.kind(),
            "API call error: {err}. Retrying in {}ms",
            delay.as_millis()
        ),
    }
}
