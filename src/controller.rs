//! Maps user actions onto prompts, calls and presentation updates.
//!
//! The controller owns the shared field values and the result slot. Every
//! action that writes the slot takes a generation token when it starts; a
//! completion whose token has been superseded (by a later action or a clear)
//! is dropped instead of overwriting newer state.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, error};

use crate::error::ValidationError;
use crate::executor::{CallExecutor, Sleeper, TokioSleeper};
use crate::gemini::{CallError, ContentGenerator};
use crate::prompt::{self, TweetFields};

/// Text written into the result slot when tweet generation fails.
pub const GENERATE_FAILURE: &str = "Failed to generate tweet. Please try again.";

/// The five user-triggerable actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Generate,
    SuggestHashtags,
    Summarize,
    Expand,
    Clear,
}

impl Action {
    /// Message shown while the action is in flight.
    pub fn busy_label(self) -> &'static str {
        match self {
            Action::Generate => "Generating tweet...",
            Action::SuggestHashtags => "Suggesting hashtags...",
            Action::Summarize => "Summarizing tweet...",
            Action::Expand => "Expanding tweet...",
            Action::Clear => "Clearing...",
        }
    }

    fn failure_notice(self) -> &'static str {
        match self {
            Action::Generate => GENERATE_FAILURE,
            Action::SuggestHashtags => "Failed to generate hashtags. Please try again.",
            Action::Summarize => "Failed to summarize tweet. Please try again.",
            Action::Expand => "Failed to expand tweet. Please try again.",
            Action::Clear => "",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Generate => write!(f, "generate"),
            Action::SuggestHashtags => write!(f, "suggest-hashtags"),
            Action::Summarize => write!(f, "summarize"),
            Action::Expand => write!(f, "expand"),
            Action::Clear => write!(f, "clear"),
        }
    }
}

/// Presentation capabilities the controller drives. Implementations must not
/// call back into the controller.
pub trait Presenter {
    fn set_busy(&self, action: Action, busy: bool);
    fn show_result(&self, text: &str, visible: bool);
    fn show_hashtags(&self, hashtags: &str);
    /// Shows a dismissible notice, replacing any notice already shown.
    fn show_notice(&self, message: &str);
    fn dismiss_notice(&self) {}
}

/// The shared "current result" cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSlot {
    text: String,
    visible: bool,
    generation: u64,
}

impl ResultSlot {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the slot holds a tweet that can be summarized or expanded.
    pub fn has_tweet(&self) -> bool {
        !self.text.is_empty() && !self.text.contains(GENERATE_FAILURE)
    }

    /// Starts a write; any earlier outstanding token becomes stale.
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Writes `text` and shows the slot if `token` is still current.
    pub fn commit(&mut self, token: u64, text: String) -> bool {
        if token != self.generation {
            return false;
        }
        self.text = text;
        self.visible = true;
        true
    }

    pub fn clear(&mut self) {
        self.generation += 1;
        self.text.clear();
        self.visible = false;
    }
}

/// What an action ended with.
#[derive(Debug)]
pub enum ActionOutcome {
    Updated,
    Cleared,
    Rejected(ValidationError),
    Failed(CallError),
    /// The call finished after a newer action took over the result slot.
    Superseded,
}

struct SharedState {
    fields: TweetFields,
    slot: ResultSlot,
}

/// Clears the busy state on every exit path.
struct BusyGuard<'a, P: Presenter> {
    presenter: &'a P,
    action: Action,
}

impl<'a, P: Presenter> BusyGuard<'a, P> {
    fn start(presenter: &'a P, action: Action) -> Self {
        presenter.set_busy(action, true);
        Self { presenter, action }
    }
}

impl<P: Presenter> Drop for BusyGuard<'_, P> {
    fn drop(&mut self) {
        self.presenter.set_busy(self.action, false);
    }
}

pub struct InteractionController<G, P, S = TokioSleeper> {
    executor: CallExecutor<G, S>,
    presenter: P,
    state: Mutex<SharedState>,
}

impl<G: ContentGenerator, P: Presenter, S: Sleeper> InteractionController<G, P, S> {
    pub fn new(executor: CallExecutor<G, S>, presenter: P, fields: TweetFields) -> Self {
        Self {
            executor,
            presenter,
            state: Mutex::new(SharedState {
                fields,
                slot: ResultSlot::default(),
            }),
        }
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn fields(&self) -> TweetFields {
        self.lock().fields.clone()
    }

    pub fn update_fields(&self, update: impl FnOnce(&mut TweetFields)) {
        update(&mut self.lock().fields);
    }

    pub fn result(&self) -> ResultSlot {
        self.lock().slot.clone()
    }

    /// Puts existing text into the result slot without presenting it.
    pub fn seed_result(&self, text: &str) {
        let mut state = self.lock();
        let token = state.slot.begin();
        state.slot.commit(token, text.to_string());
    }

    pub async fn on_action(&self, action: Action) -> ActionOutcome {
        match action {
            Action::Generate => self.generate().await,
            Action::SuggestHashtags => self.suggest_hashtags().await,
            Action::Summarize => {
                self.transform(action, ValidationError::NothingToSummarize, prompt::summarize_prompt)
                    .await
            }
            Action::Expand => {
                self.transform(action, ValidationError::NothingToExpand, prompt::expand_prompt)
                    .await
            }
            Action::Clear => self.clear(),
        }
    }

    async fn generate(&self) -> ActionOutcome {
        let (prompt, token) = {
            let mut state = self.lock();
            if state.fields.topic.trim().is_empty() {
                drop(state);
                return self.reject(ValidationError::MissingTopicForTweet);
            }
            (prompt::tweet_prompt(&state.fields), state.slot.begin())
        };

        let _busy = BusyGuard::start(&self.presenter, Action::Generate);
        match self.executor.execute(&prompt).await {
            Ok(text) => self.commit(token, text),
            Err(e) => {
                error!(action = %Action::Generate, "Failed to generate tweet: {e}");
                self.commit(token, GENERATE_FAILURE.to_string());
                ActionOutcome::Failed(e)
            }
        }
    }

    async fn suggest_hashtags(&self) -> ActionOutcome {
        let prompt = {
            let state = self.lock();
            if state.fields.topic.trim().is_empty() {
                drop(state);
                return self.reject(ValidationError::MissingTopicForHashtags);
            }
            prompt::hashtags_prompt(&state.fields.topic)
        };

        let _busy = BusyGuard::start(&self.presenter, Action::SuggestHashtags);
        match self.executor.execute(&prompt).await {
            Ok(text) => {
                let hashtags = text.trim().to_string();
                self.lock().fields.hashtags = hashtags.clone();
                self.presenter.show_hashtags(&hashtags);
                ActionOutcome::Updated
            }
            Err(e) => self.fail(Action::SuggestHashtags, e),
        }
    }

    async fn transform(
        &self,
        action: Action,
        missing: ValidationError,
        build: fn(&str) -> String,
    ) -> ActionOutcome {
        let (prompt, token) = {
            let mut state = self.lock();
            if !state.slot.has_tweet() {
                drop(state);
                return self.reject(missing);
            }
            let prompt = build(state.slot.text());
            (prompt, state.slot.begin())
        };

        let _busy = BusyGuard::start(&self.presenter, action);
        match self.executor.execute(&prompt).await {
            Ok(text) => self.commit(token, text),
            Err(e) => self.fail(action, e),
        }
    }

    fn clear(&self) -> ActionOutcome {
        self.lock().slot.clear();
        self.presenter.show_result("", false);
        ActionOutcome::Cleared
    }

    fn commit(&self, token: u64, text: String) -> ActionOutcome {
        let committed = self.lock().slot.commit(token, text.clone());
        if committed {
            self.presenter.show_result(&text, true);
            ActionOutcome::Updated
        } else {
            debug!(token, "dropping result of superseded call");
            ActionOutcome::Superseded
        }
    }

    fn fail(&self, action: Action, e: CallError) -> ActionOutcome {
        error!(%action, "Failed to {action}: {e}");
        self.presenter.show_notice(action.failure_notice());
        ActionOutcome::Failed(e)
    }

    fn reject(&self, reason: ValidationError) -> ActionOutcome {
        self.presenter.show_notice(&reason.to_string());
        ActionOutcome::Rejected(reason)
    }

    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
