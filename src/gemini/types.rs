//! Tipos de dados para requisições e respostas da API Gemini.
//!
//! Todas as structs derivam `Serialize` e `Deserialize` para conversão JSON
//! conforme o formato esperado pelo endpoint `generateContent` do Google.

use serde::{Deserialize, Serialize};

/// Corpo da requisição para o endpoint `models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Conteúdos da conversa; para este pipeline, sempre um único turno.
    pub contents: Vec<Content>,
}

impl GenerateRequest {
    /// Requisição de turno único contendo apenas texto.
    pub fn from_text(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part::text(prompt)],
            }],
        }
    }

    /// Requisição de turno único com texto e um anexo binário
    /// (imagem ou PDF) codificado em base64.
    pub fn from_text_and_data(
        prompt: impl Into<String>,
        mime_type: impl Into<String>,
        data_base64: impl Into<String>,
    ) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![
                    Part::text(prompt),
                    Part::inline(mime_type, data_base64),
                ],
            }],
        }
    }
}

/// Um turno de conversa composto por uma ou mais partes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Uma parte de conteúdo: texto ou dados binários embutidos.
///
/// Os campos são serializados em camelCase (`inlineData`, `mimeType`)
/// conforme o formato JSON da API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn inline(mime_type: impl Into<String>, data_base64: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data_base64.into(),
            }),
        }
    }
}

/// Dados binários embutidos, codificados em base64.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

/// Resposta do endpoint `generateContent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// Um candidato de resposta gerado pelo modelo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateResponse {
    /// Texto concatenado do primeiro candidato, se houver.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() { None } else { Some(text) }
    }
}
