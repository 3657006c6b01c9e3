use anyhow::Result;

/// Trait for hosted generative models (Gemini, or a scripted mock in tests).
///
/// Both calls return the model's reply text, which is empty when the model
/// produced none.
#[async_trait::async_trait]
pub trait AIService: Send + Sync {
    async fn generate_text(&self, prompt: &str) -> Result<String>;
    async fn generate_with_image(&self, prompt: &str, image: &[u8], mime_type: &str) -> Result<String>;
}
