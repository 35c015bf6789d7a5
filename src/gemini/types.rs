//! Tipos de dados para requisições e respostas do endpoint `generateContent` do Gemini.
//!
//! As structs derivam `Serialize` e `Deserialize` para conversão JSON no formato
//! esperado pela API. Os campos da resposta são opcionais: a ausência de qualquer
//! nível do caminho `candidates[0].content.parts[0].text` é tratada como erro
//! estrutural por [`GenerateContentResponse::first_text`].

use serde::{Deserialize, Serialize};

/// Corpo da requisição para `models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateContentRequest {
    /// Conteúdos enviados ao modelo. Este cliente sempre envia exatamente um.
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// Monta a requisição com um único conteúdo contendo o prompt como texto.
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        }
    }
}

/// Um conteúdo composto por uma ou mais partes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Uma parte de conteúdo. Apenas partes textuais são produzidas ou consumidas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Resposta retornada pelo endpoint `generateContent`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateContentResponse {
    /// Candidatos gerados. `None` quando o provedor omite o campo
    /// (por exemplo, quando o prompt foi bloqueado).
    #[serde(default)]
    pub candidates: Option<Vec<Candidate>>,
}

/// Uma opção de resposta gerada pelo provedor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Extrai o texto da primeira parte do primeiro candidato.
    ///
    /// Retorna uma descrição do primeiro nível ausente em caso de falha.
    pub fn first_text(&self) -> Result<&str, &'static str> {
        let candidate = self
            .candidates
            .as_deref()
            .ok_or("response has no `candidates` field")?
            .first()
            .ok_or("response `candidates` is empty")?;
        let content = candidate
            .content
            .as_ref()
            .ok_or("first candidate has no `content`")?;
        let part = content
            .parts
            .first()
            .ok_or("first candidate has no `parts`")?;
        part.text
            .as_deref()
            .ok_or("first part of first candidate has no `text`")
    }
}
