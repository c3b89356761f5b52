use async_trait::async_trait;
use reqwest::Client;

use crate::{
    config::GeminiConfig,
    error::{Result, TattooError},
    gemini::{
        wire::{ErrorEnvelope, GenerateContentRequest, GenerateContentResponse},
        ContentGenerator,
    },
    models::{ContentRequest, GenerationOutput},
};

const MAX_ERROR_CHARS: usize = 500;

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    api_base: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            api_key,
            model: config.model().to_string(),
            api_base: config.api_base().to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        let model = self.model.trim_start_matches("models/");
        format!("{}/models/{}:generateContent", self.api_base, model)
    }

    pub async fn generate_content(&self, request: &ContentRequest) -> Result<GenerationOutput> {
        let body = GenerateContentRequest::from(request);

        log::info!(
            "Invoking model: {} ({} image part(s))",
            self.model,
            request.images.len()
        );
        log::debug!("Prompt: {}", request.prompt);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                log::error!("Gemini request failed: {}", e);
                TattooError::NetworkError(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = Self::error_message(&text);
            log::error!("Gemini returned {}: {}", status, message);
            return Err(TattooError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let payload: GenerateContentResponse = response.json().await.map_err(|e| {
            TattooError::ResponseError(format!("could not parse Gemini response: {}", e))
        })?;
        let output = payload.into_output()?;

        log::debug!(
            "Gemini answered with {} chars of text and {}",
            output.text_or_empty().len(),
            if output.image.is_some() { "an image" } else { "no image" }
        );
        Ok(output)
    }

    fn error_message(body: &str) -> String {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => match envelope.error.status {
                Some(status) => format!("{}: {}", status, envelope.error.message),
                None => envelope.error.message,
            },
            Err(_) => body.chars().take(MAX_ERROR_CHARS).collect(),
        }
    }
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    async fn generate(&self, request: ContentRequest) -> Result<GenerationOutput> {
        self.generate_content(&request).await
    }

    fn model(&self) -> &str {
        &self.model
    }
}
