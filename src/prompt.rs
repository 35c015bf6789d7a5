//! Prompt templates for the four generation actions.

/// User-editable inputs that feed the tweet prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TweetFields {
    pub topic: String,
    pub tone: String,
    pub audience: String,
    pub hashtags: String,
}

pub fn tweet_prompt(fields: &TweetFields) -> String {
    format!(
        "Generate a tweet about the topic \"{}\". The tone should be \"{}\" and the audience is \"{}\". \
         Incorporate the following hashtags: {}. The tweet should be under 280 characters.",
        fields.topic, fields.tone, fields.audience, fields.hashtags
    )
}

pub fn hashtags_prompt(topic: &str) -> String {
    format!(
        "Generate a list of 5 to 10 popular and relevant hashtags for the topic \"{topic}\". \
         Provide only the hashtags, separated by spaces."
    )
}

pub fn summarize_prompt(tweet: &str) -> String {
    format!(
        "Summarize the following tweet into a shorter version. \
         The summary should be concise and retain the core message: \"{tweet}\""
    )
}

pub fn expand_prompt(tweet: &str) -> String {
    format!(
        "Expand the following short tweet into a more detailed version, \
         adding more context and information: \"{tweet}\""
    )
}
