pub mod gemini;
pub mod image;

use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// One completion call: a single user turn, optionally with an image.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub system_instruction: Option<String>,
    pub prompt: String,
    pub image: Option<InlineImage>,
    pub max_output_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl GenerationRequest {
    pub fn new(model: &str, prompt: impl Into<String>) -> Self {
        Self {
            model: model.to_string(),
            system_instruction: None,
            prompt: prompt.into(),
            image: None,
            max_output_tokens: None,
            temperature: None,
        }
    }

    pub fn system(mut self, instruction: &str) -> Self {
        self.system_instruction = Some(instruction.trim().to_string());
        self
    }

    pub fn sampling(mut self, max_output_tokens: u32, temperature: f32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self.temperature = Some(temperature);
        self
    }

    pub fn with_image(mut self, image: InlineImage) -> Self {
        self.image = Some(image);
        self
    }
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> anyhow::Result<String>;
}
