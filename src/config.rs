//! Configuração do tweetsmith carregada a partir de `tweetsmith.toml`.
//!
//! A struct [`AppConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! A variável de ambiente `GEMINI_API_KEY` tem precedência sobre o arquivo.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::Path;

use crate::state_machine::RetryPolicy;

/// Arquivo procurado no diretório atual quando `--config` não é informado.
pub const DEFAULT_CONFIG_FILE: &str = "tweetsmith.toml";

/// Variável de ambiente que sobrescreve `api_key`.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Configuração de nível superior carregada de `tweetsmith.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Chave da API Gemini, enviada como parâmetro de query `key`.
    #[serde(default)]
    pub api_key: String,

    /// URL base da API, sem barra final.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Modelo usado no endpoint `generateContent`.
    #[serde(default = "default_model")]
    pub model: String,

    /// Número total de tentativas por chamada (mínimo 1).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Atraso inicial em milissegundos para backoff exponencial.
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Timeout de conexão em segundos.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Timeout total da requisição em segundos.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Tom padrão usado quando o campo não é informado.
    #[serde(default = "default_tone")]
    pub tone: String,

    /// Público padrão usado quando o campo não é informado.
    #[serde(default)]
    pub audience: String,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash-preview-05-20".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_tone() -> String {
    "casual".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            model: default_model(),
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            tone: default_tone(),
            audience: String::new(),
        }
    }
}

/// Parâmetros de transporte injetados no cliente HTTP.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl ApiConfig {
    /// URL completa do endpoint `generateContent`, sem a chave.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl AppConfig {
    /// Carrega a configuração do caminho informado ou de `tweetsmith.toml`
    /// no diretório atual. Usa valores padrão se o arquivo padrão não existir;
    /// um caminho explícito inexistente é erro.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)?
                } else {
                    Self::default()
                }
            }
        };

        // Variável de ambiente tem precedência sobre o arquivo para a chave API.
        if let Ok(key) = std::env::var(API_KEY_ENV)
            && !key.trim().is_empty()
        {
            config.api_key = key;
        }

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = toml::from_str::<AppConfig>(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Aplica sobrescritas vindas da linha de comando.
    pub fn apply_overrides(&mut self, max_retries: Option<u32>, initial_delay_ms: Option<u64>) {
        if let Some(n) = max_retries {
            self.max_retries = n;
        }
        if let Some(ms) = initial_delay_ms {
            self.initial_delay_ms = ms;
        }
    }

    /// Rejeita configurações com as quais nenhuma chamada pode ter sucesso.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            bail!("missing API key: set `api_key` in {DEFAULT_CONFIG_FILE} or the {API_KEY_ENV} environment variable");
        }
        if self.max_retries == 0 {
            bail!("max_retries must be at least 1");
        }
        if self.initial_delay_ms == 0 {
            bail!("initial_delay_ms must be greater than 0");
        }
        Ok(())
    }

    pub fn api(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            api_key: self.api_key.clone(),
            connect_timeout_secs: self.connect_timeout_secs,
            request_timeout_secs: self.request_timeout_secs,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            initial_delay_ms: self.initial_delay_ms,
        }
    }
}
