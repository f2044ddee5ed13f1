pub mod client;
pub mod error;
pub mod types;

pub use client::GeminiClient;
pub use error::GeminiError;
pub use types::{GenerateRequest, GenerateResponse};

/// Abstraction over the generative model call, so processors can be tested
/// against a mock instead of the live API.
pub trait ContentGenerator {
    async fn generate(
        &self,
        model: &str,
        req: &GenerateRequest,
    ) -> Result<GenerateResponse, GeminiError>;
}
