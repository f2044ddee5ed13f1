//! Tipos de erro para o cliente da API Gemini.
//!
//! Define [`GeminiError`] com variantes para rate limiting, erros da API,
//! falhas de rede e respostas vazias. Usa `thiserror` para derivar `Display`
//! e `Error` automaticamente a partir dos atributos `#[error(...)]`.

use thiserror::Error;

/// Erros que podem ocorrer ao interagir com a API do Gemini.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// O servidor retornou HTTP 429 (rate limit).
    /// O campo `retry_after_ms` indica quantos milissegundos esperar antes de retentar.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Erro retornado pela API (ex.: 400 chave inválida, 500 erro interno).
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Falha de rede subjacente (DNS, conexão recusada, timeout).
    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// A API respondeu sem nenhum candidato de texto utilizável.
    #[error("model returned an empty response")]
    EmptyResponse,
}
