//! Interactive line-oriented session over stdin.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::controller::{Action, InteractionController, Presenter, ResultSlot};
use crate::error::TweetsmithError;
use crate::executor::Sleeper;
use crate::gemini::ContentGenerator;
use crate::prompt::TweetFields;

pub const HELP: &str = "\
Commands:
  topic <text>       set the topic
  tone <text>        set the tone
  audience <text>    set the audience
  hashtags <text>    set the hashtags
  generate           generate a tweet from the fields
  suggest            suggest hashtags for the topic
  summarize          shorten the current tweet
  expand             expand the current tweet
  clear              clear the current tweet
  show               print fields and current tweet
  help               print this help
  quit               leave the session";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Topic,
    Tone,
    Audience,
    Hashtags,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Set(Field, String),
    Run(Action),
    Show,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl SessionCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return SessionCommand::Empty;
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let field = match word.to_ascii_lowercase().as_str() {
            "topic" => Some(Field::Topic),
            "tone" => Some(Field::Tone),
            "audience" => Some(Field::Audience),
            "hashtags" => Some(Field::Hashtags),
            _ => None,
        };
        if let Some(field) = field {
            return SessionCommand::Set(field, rest.to_string());
        }

        if !rest.is_empty() {
            return SessionCommand::Unknown(line.to_string());
        }
        match word.to_ascii_lowercase().as_str() {
            "generate" | "g" => SessionCommand::Run(Action::Generate),
            "suggest" => SessionCommand::Run(Action::SuggestHashtags),
            "summarize" => SessionCommand::Run(Action::Summarize),
            "expand" => SessionCommand::Run(Action::Expand),
            "clear" => SessionCommand::Run(Action::Clear),
            "show" => SessionCommand::Show,
            "help" | "?" => SessionCommand::Help,
            "quit" | "exit" | "q" => SessionCommand::Quit,
            _ => SessionCommand::Unknown(line.to_string()),
        }
    }
}

/// Renders the current fields and result for `show`.
pub fn describe(fields: &TweetFields, slot: &ResultSlot) -> String {
    let tweet = if slot.is_visible() {
        slot.text()
    } else {
        "(hidden)"
    };
    format!(
        "topic:    {}\ntone:     {}\naudience: {}\nhashtags: {}\ntweet:    {}",
        fields.topic, fields.tone, fields.audience, fields.hashtags, tweet
    )
}

/// Reads commands until `quit` or end of input.
pub async fn run<G, P, S, R>(
    controller: &InteractionController<G, P, S>,
    input: R,
) -> Result<(), TweetsmithError>
where
    G: ContentGenerator,
    P: Presenter,
    S: Sleeper,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let command = SessionCommand::parse(&line);
        if command != SessionCommand::Empty {
            controller.presenter().dismiss_notice();
        }
        match command {
            SessionCommand::Set(field, value) => controller.update_fields(|f| match field {
                Field::Topic => f.topic = value,
                Field::Tone => f.tone = value,
                Field::Audience => f.audience = value,
                Field::Hashtags => f.hashtags = value,
            }),
            SessionCommand::Run(action) => {
                controller.on_action(action).await;
            }
            SessionCommand::Show => {
                println!("{}", describe(&controller.fields(), &controller.result()));
            }
            SessionCommand::Help => println!("{HELP}"),
            SessionCommand::Quit => break,
            SessionCommand::Empty => {}
            SessionCommand::Unknown(line) => {
                controller
                    .presenter()
                    .show_notice(&format!("Unknown command: {line} (try `help`)"));
            }
        }
    }
    Ok(())
}
