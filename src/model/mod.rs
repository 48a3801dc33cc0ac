use crate::error::Result;


#[derive(Clone, Debug, PartialEq)]
pub struct GenerationParams {
pub temperature: f32,
pub top_p: f32,
pub max_output_tokens: u32,
}


impl Default for GenerationParams {
fn default() -> Self {
Self { temperature: 1.2, top_p: 0.9, max_output_tokens: 100 }
}
}


/// A text generation capability. `Ok(None)` means the provider answered but
/// carried no text.
#[async_trait::async_trait]
pub trait LlmBackend: Send + Sync + 'static {
async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<Option<String>>;
}


pub mod gemini;
