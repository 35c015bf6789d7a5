mod attempt;
mod state;

pub use attempt::{AttemptOutcome, CallAttempt, RetryPolicy};
pub use state::{CallState, RetryMachine, Transition};
