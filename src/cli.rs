//! Interface de linha de comando do tweetsmith baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (generate, hashtags,
//! summarize, expand, session) e flags globais (--config, --max-retries,
//! --initial-delay-ms, --verbose).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// tweetsmith — Compositor de tweets com a API Gemini.
#[derive(Debug, Parser)]
#[command(name = "tweetsmith", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Caminho do arquivo de configuração (padrão: ./tweetsmith.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Número total de tentativas por chamada.
    #[arg(long, global = true)]
    pub max_retries: Option<u32>,

    /// Atraso inicial do backoff em milissegundos.
    #[arg(long, global = true)]
    pub initial_delay_ms: Option<u64>,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

/// Campos do formulário aceitos pelos subcomandos.
#[derive(Debug, Clone, Default, Args)]
pub struct FieldArgs {
    /// Assunto do tweet.
    #[arg(long, short)]
    pub topic: Option<String>,

    /// Tom do tweet (ex.: casual, professional, witty).
    #[arg(long)]
    pub tone: Option<String>,

    /// Público-alvo.
    #[arg(long)]
    pub audience: Option<String>,

    /// Hashtags a incorporar, separadas por espaço.
    #[arg(long)]
    pub hashtags: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Gera um tweet a partir dos campos.
    Generate {
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Sugere hashtags para um assunto.
    Hashtags {
        /// Assunto para as hashtags.
        topic: String,
    },

    /// Resume um tweet existente.
    Summarize {
        /// Texto do tweet.
        text: String,
    },

    /// Expande um tweet existente.
    Expand {
        /// Texto do tweet.
        text: String,
    },

    /// Inicia uma sessão interativa.
    Session {
        #[command(flatten)]
        fields: FieldArgs,
    },
}
