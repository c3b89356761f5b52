//! Request/response bodies of the `generateContent` REST call.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, TattooError},
    models::{ContentRequest, GenerationOutput, InlineImage},
};

/// Finish reasons that mean the candidate was withheld.
const BLOCKED_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "IMAGE_SAFETY",
    "IMAGE_PROHIBITED_CONTENT",
    "PROHIBITED_CONTENT",
    "BLOCKLIST",
    "SPII",
    "RECITATION",
    "IMAGE_RECITATION",
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RequestPart {
    Text { text: String },
    InlineData { inline_data: RequestBlob },
}

#[derive(Debug, Serialize)]
pub struct RequestBlob {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<String>,
}

impl From<&ContentRequest> for GenerateContentRequest {
    /// The prompt goes first, followed by the images in request order.
    fn from(request: &ContentRequest) -> Self {
        let mut parts = vec![RequestPart::Text {
            text: request.prompt.clone(),
        }];
        parts.extend(request.images.iter().map(|image| RequestPart::InlineData {
            inline_data: RequestBlob {
                mime_type: image.mime_type.clone(),
                data: image.to_base64(),
            },
        }));

        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts,
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["TEXT".to_string(), "IMAGE".to_string()],
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, alias = "inline_data")]
    pub inline_data: Option<ResponseBlob>,
    #[serde(default)]
    pub thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBlob {
    #[serde(default, alias = "mime_type")]
    pub mime_type: Option<String>,
    pub data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
    #[serde(default)]
    pub block_reason_message: Option<String>,
}

/// Google's standard error envelope: `{"error": {"code", "message", "status"}}`.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl GenerateContentResponse {
    /// Joins the text parts of the first candidate and takes its first image.
    pub fn into_output(self) -> Result<GenerationOutput> {
        if let Some(feedback) = &self.prompt_feedback {
            if let Some(reason) = &feedback.block_reason {
                let msg = feedback
                    .block_reason_message
                    .clone()
                    .unwrap_or_else(|| format!("prompt blocked: {}", reason));
                return Err(TattooError::ContentBlocked(msg));
            }
        }

        let candidate = self.candidates.into_iter().next().ok_or_else(|| {
            TattooError::ResponseError("No candidates in Gemini response".into())
        })?;

        if let Some(reason) = candidate.finish_reason.as_deref() {
            if BLOCKED_FINISH_REASONS.contains(&reason) {
                return Err(TattooError::ContentBlocked(format!(
                    "response withheld by Gemini: {}",
                    reason
                )));
            }
        }

        let mut text = String::new();
        let mut image = None;
        for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
            if part.thought {
                continue;
            }
            if let Some(fragment) = part.text {
                text.push_str(&fragment);
            }
            if let (None, Some(blob)) = (&image, part.inline_data) {
                let data = STANDARD.decode(blob.data.as_bytes()).map_err(|e| {
                    TattooError::ResponseError(format!("image part is not valid base64: {}", e))
                })?;
                let mime_type = blob.mime_type.unwrap_or_else(|| "image/png".to_string());
                image = Some(InlineImage::new(mime_type, data));
            }
        }

        let text = Some(text.trim().to_string()).filter(|t| !t.is_empty());
        Ok(GenerationOutput { text, image })
    }
}
