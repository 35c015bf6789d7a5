//! Tipos de erro para o cliente da API Gemini.
//!
//! Define [`CallError`] com variantes para rate limiting, falhas de transporte,
//! erros do servidor e respostas malformadas. Apenas a última variante é
//! terminal; as demais são retentadas pelo executor.

use thiserror::Error;

/// Erros que podem ocorrer em uma chamada à API Gemini.
///
/// - [`RateLimited`](CallError::RateLimited): o servidor retornou HTTP 429
/// - [`Transport`](CallError::Transport): falha na camada de rede
/// - [`Server`](CallError::Server): qualquer outro status não-2xx
/// - [`Structural`](CallError::Structural): resposta 2xx sem o texto esperado
#[derive(Debug, Error)]
pub enum CallError {
    /// O servidor sinalizou excesso de requisições (HTTP 429).
    /// `retry_after_secs` vem do cabeçalho `Retry-After`, quando presente,
    /// e serve apenas para diagnóstico.
    #[error("rate limited (status 429){}", retry_after_note(.retry_after_secs))]
    RateLimited { retry_after_secs: Option<u64> },

    /// Falha de rede subjacente (DNS, conexão recusada, timeout).
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// Erro retornado pela API com o corpo de diagnóstico preservado.
    #[error("API call failed with status {status}: {body}")]
    Server { status: u16, body: String },

    /// Resposta de sucesso sem `candidates[0].content.parts[0].text`.
    #[error("malformed response: {0}")]
    Structural(String),
}

fn retry_after_note(retry_after_secs: &Option<u64>) -> String {
    match retry_after_secs {
        Some(secs) => format!(", retry after {secs}s"),
        None => String::new(),
    }
}

impl CallError {
    /// Indica se a falha pode ser retentada dentro do orçamento da chamada.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, CallError::Structural(_))
    }

    /// Nome curto da classificação, usado nos logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CallError::RateLimited { .. } => "rate_limited",
            CallError::Transport(_) => "transport",
            CallError::Server { .. } => "server",
            CallError::Structural(_) => "structural",
        }
    }
}
