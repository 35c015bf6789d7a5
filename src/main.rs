mod cli;
mod config;
mod controller;
mod error;
mod executor;
mod gemini;
mod prompt;
mod session;
mod state_machine;
#[cfg(test)]
mod test_support;
mod ui;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tokio::io::BufReader;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, FieldArgs};
use config::AppConfig;
use controller::{Action, ActionOutcome, InteractionController};
use error::TweetsmithError;
use executor::CallExecutor;
use gemini::GeminiClient;
use prompt::TweetFields;
use ui::TerminalPresenter;

type TerminalController = InteractionController<GeminiClient, TerminalPresenter>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_overrides(cli.max_retries, cli.initial_delay_ms);
    config.validate()?;

    match cli.command {
        Command::Generate { fields } => {
            let controller = build_controller(&config, initial_fields(fields, &config))?;
            Ok(run_once(&controller, Action::Generate).await)
        }
        Command::Hashtags { topic } => {
            let fields = TweetFields {
                topic,
                ..initial_fields(FieldArgs::default(), &config)
            };
            let controller = build_controller(&config, fields)?;
            Ok(run_once(&controller, Action::SuggestHashtags).await)
        }
        Command::Summarize { text } => {
            let controller =
                build_controller(&config, initial_fields(FieldArgs::default(), &config))?;
            controller.seed_result(&text);
            Ok(run_once(&controller, Action::Summarize).await)
        }
        Command::Expand { text } => {
            let controller =
                build_controller(&config, initial_fields(FieldArgs::default(), &config))?;
            controller.seed_result(&text);
            Ok(run_once(&controller, Action::Expand).await)
        }
        Command::Session { fields } => {
            let controller = build_controller(&config, initial_fields(fields, &config))?;
            println!("{}", session::HELP);
            session::run(&controller, BufReader::new(tokio::io::stdin())).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "tweetsmith=debug" } else { "tweetsmith=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_controller(
    config: &AppConfig,
    fields: TweetFields,
) -> Result<TerminalController, TweetsmithError> {
    let client = GeminiClient::new(&config.api())?;
    debug!(
        endpoint = client.endpoint(),
        max_retries = config.max_retries,
        initial_delay_ms = config.initial_delay_ms,
        "client ready"
    );
    let executor = CallExecutor::new(client, config.retry_policy());
    Ok(InteractionController::new(
        executor,
        TerminalPresenter::new(),
        fields,
    ))
}

/// Form fields from the command line, falling back to configured defaults.
fn initial_fields(args: FieldArgs, config: &AppConfig) -> TweetFields {
    TweetFields {
        topic: args.topic.unwrap_or_default(),
        tone: args.tone.unwrap_or_else(|| config.tone.clone()),
        audience: args.audience.unwrap_or_else(|| config.audience.clone()),
        hashtags: args.hashtags.unwrap_or_default(),
    }
}

async fn run_once(controller: &TerminalController, action: Action) -> ExitCode {
    match controller.on_action(action).await {
        ActionOutcome::Rejected(reason) => {
            debug!(%action, %reason, "input rejected");
            ExitCode::FAILURE
        }
        ActionOutcome::Failed(e) => {
            debug!(%action, kind = e.kind(), "action failed");
            ExitCode::FAILURE
        }
        ActionOutcome::Updated | ActionOutcome::Cleared | ActionOutcome::Superseded => {
            ExitCode::SUCCESS
        }
    }
}
