use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::state::CallState;

/// What a single attempt produced, as seen by the retry machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    /// Rate limit, transport or server failure.
    Retryable,
    /// Failure that must surface without another attempt.
    Fatal,
}

/// Retry behavior for one `execute` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one.
    pub max_retries: u32,
    /// Delay before the second attempt, in milliseconds.
    pub initial_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 1000,
        }
    }
}

impl RetryPolicy {
    /// Delay slept before the given 1-based attempt.
    /// delay = initial_delay_ms * 2^(attempt - 2), and zero for the first attempt.
    #[allow(dead_code)]
    pub fn delay_before_attempt(&self, attempt: u32) -> u64 {
        if attempt < 2 {
            return 0;
        }
        let exp = attempt - 2;
        2u64.checked_pow(exp)
            .and_then(|factor| self.initial_delay_ms.checked_mul(factor))
            .unwrap_or(u64::MAX)
    }
}

/// One in-progress `execute` call.
#[derive(Debug, Clone)]
pub struct CallAttempt {
    pub call_id: String,
    /// 1-based index of the current (or last) attempt.
    pub attempt: u32,
    /// Delay to sleep if the current attempt triggers a retry.
    pub delay_ms: u64,
    /// Attempts still available after the current one.
    pub remaining: u32,
    pub state: CallState,
    pub state_history: Vec<CallState>,
    pub policy: RetryPolicy,
    pub started_at: DateTime<Utc>,
}

impl CallAttempt {
    pub fn new(policy: RetryPolicy) -> Self {
        let max = policy.max_retries.max(1);
        Self {
            call_id: Uuid::new_v4().to_string(),
            attempt: 1,
            delay_ms: policy.initial_delay_ms,
            remaining: max - 1,
            state: CallState::Attempting,
            state_history: Vec::new(),
            policy,
            started_at: Utc::now(),
        }
    }

    pub fn current_delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn elapsed_ms(&self) -> i64 {
        (Utc::now() - self.started_at).num_milliseconds()
    }
}
