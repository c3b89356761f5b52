pub mod client;
pub mod wire;

use async_trait::async_trait;

use crate::{
    error::Result,
    models::{ContentRequest, GenerationOutput},
};

pub use client::GeminiClient;

/// A multimodal model that turns a prompt plus images into text and/or an
/// image. Handlers only see this trait.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, request: ContentRequest) -> Result<GenerationOutput>;

    fn model(&self) -> &str;
}
