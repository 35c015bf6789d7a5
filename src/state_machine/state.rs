use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::attempt::{AttemptOutcome, CallAttempt};

/// States of a single resilient call.
///
/// Each call flows through: ATTEMPTING → (BACKOFF → ATTEMPTING)* → terminal,
/// where terminal is one of SUCCEEDED, EXHAUSTED or FAILED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallState {
    Attempting,
    Backoff,
    Succeeded,
    /// Retryable failure with no budget left.
    Exhausted,
    /// Non-retryable failure.
    Failed,
}

impl CallState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            CallState::Succeeded | CallState::Exhausted | CallState::Failed
        )
    }
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallState::Attempting => write!(f, "ATTEMPTING"),
            CallState::Backoff => write!(f, "BACKOFF"),
            CallState::Succeeded => write!(f, "SUCCEEDED"),
            CallState::Exhausted => write!(f, "EXHAUSTED"),
            CallState::Failed => write!(f, "FAILED"),
        }
    }
}

/// The result of evaluating an attempt outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Sleep for `delay`, then `resume` and attempt again.
    Backoff { delay: Duration },
    Succeed,
    Exhaust,
    Fail,
}

/// Pure transition function over a [`CallAttempt`]. No I/O, no clock.
pub struct RetryMachine;

impl RetryMachine {
    /// Compute and apply the transition for the outcome of the current attempt.
    ///
    /// - Success completes the call.
    /// - A retryable failure backs off while budget remains, otherwise exhausts.
    ///   Backing off hands out the current delay, then doubles it and advances
    ///   the attempt index.
    /// - A fatal failure completes the call immediately.
    /// - Terminal states are absorbing and repeat their own transition.
    pub fn next(call: &mut CallAttempt, outcome: AttemptOutcome) -> Transition {
        match call.state {
            CallState::Succeeded => return Transition::Succeed,
            CallState::Exhausted => return Transition::Exhaust,
            CallState::Failed => return Transition::Fail,
            // An outcome reported during BACKOFF belongs to the next attempt.
            CallState::Backoff => Self::resume(call),
            CallState::Attempting => {}
        }

        let transition = match outcome {
            AttemptOutcome::Success => Transition::Succeed,
            AttemptOutcome::Fatal => Transition::Fail,
            AttemptOutcome::Retryable if call.remaining > 0 => Transition::Backoff {
                delay: call.current_delay(),
            },
            AttemptOutcome::Retryable => Transition::Exhaust,
        };

        call.state_history.push(call.state);
        match transition {
            Transition::Backoff { .. } => {
                call.state = CallState::Backoff;
                call.remaining -= 1;
                call.attempt += 1;
                call.delay_ms = call.delay_ms.saturating_mul(2);
            }
            Transition::Succeed => call.state = CallState::Succeeded,
            Transition::Exhaust => call.state = CallState::Exhausted,
            Transition::Fail => call.state = CallState::Failed,
        }

        transition
    }

    /// Leave BACKOFF once the delay has elapsed.
    pub fn resume(call: &mut CallAttempt) {
        if call.state == CallState::Backoff {
            call.state_history.push(call.state);
            call.state = CallState::Attempting;
        }
    }
}
