use thiserror::Error;

use crate::gemini::CallError;

#[derive(Debug, Error)]
pub enum TweetsmithError {
    #[error("Gemini API error: {0}")]
    Call(#[from] CallError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Missing user input, detected before any call is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a topic to generate a tweet.")]
    MissingTopicForTweet,

    #[error("Please enter a topic to generate hashtags.")]
    MissingTopicForHashtags,

    #[error("No tweet to summarize.")]
    NothingToSummarize,

    #[error("No tweet to expand.")]
    NothingToExpand,
}
