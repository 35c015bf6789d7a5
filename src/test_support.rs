//! Fakes shared by the unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::controller::{Action, Presenter};
use crate::executor::Sleeper;
use crate::gemini::{CallError, ContentGenerator};

/// A canned reply for [`ScriptedGenerator`].
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    RateLimited,
    Server(u16, String),
    Structural(String),
    /// Sleeps on the tokio clock before answering with the text.
    Delayed(Duration, String),
}

impl Reply {
    pub fn text(s: &str) -> Self {
        Reply::Text(s.to_string())
    }

    pub fn server(status: u16, body: &str) -> Self {
        Reply::Server(status, body.to_string())
    }
}

/// Answers prompts from a fixed script and records every prompt received.
///
/// Once the script runs out, the last reply repeats.
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Reply>>,
    last: Mutex<Option<Reply>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            last: Mutex::new(None),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn next_reply(&self, prompt: &str) -> Reply {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let mut last = self.last.lock().unwrap();
        let reply = match self.replies.lock().unwrap().pop_front() {
            Some(reply) => reply,
            None => last.clone().expect("ScriptedGenerator has no replies"),
        };
        *last = Some(reply.clone());
        reply
    }
}

impl ContentGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, CallError> {
        match self.next_reply(prompt) {
            Reply::Text(text) => Ok(text),
            Reply::RateLimited => Err(CallError::RateLimited {
                retry_after_secs: None,
            }),
            Reply::Server(status, body) => Err(CallError::Server { status, body }),
            Reply::Structural(reason) => Err(CallError::Structural(reason)),
            Reply::Delayed(delay, text) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
        }
    }
}

/// Records requested sleeps and returns immediately.
#[derive(Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

impl<T: Sleeper + Sync> Sleeper for &T {
    async fn sleep(&self, duration: Duration) {
        (**self).sleep(duration).await
    }
}

impl<T: ContentGenerator + Sync> ContentGenerator for &T {
    async fn generate(&self, prompt: &str) -> Result<String, CallError> {
        (**self).generate(prompt).await
    }
}

/// One presenter call, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Busy(Action, bool),
    Result(String, bool),
    Hashtags(String),
    Notice(String),
}

#[derive(Default)]
pub struct RecordingPresenter {
    events: Mutex<Vec<Event>>,
}

impl RecordingPresenter {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl Presenter for RecordingPresenter {
    fn set_busy(&self, action: Action, busy: bool) {
        self.push(Event::Busy(action, busy));
    }

    fn show_result(&self, text: &str, visible: bool) {
        self.push(Event::Result(text.to_string(), visible));
    }

    fn show_hashtags(&self, hashtags: &str) {
        self.push(Event::Hashtags(hashtags.to_string()));
    }

    fn show_notice(&self, message: &str) {
        self.push(Event::Notice(message.to_string()));
    }
}
