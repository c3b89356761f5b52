use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Raw image bytes plus their MIME type, as exchanged with the model.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl InlineImage {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    pub fn png(data: Vec<u8>) -> Self {
        Self::new("image/png", data)
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }
}

/// A single prompt plus the images that accompany it, in order.
#[derive(Debug, Clone)]
pub struct ContentRequest {
    pub prompt: String,
    pub images: Vec<InlineImage>,
}

impl ContentRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            images: Vec::new(),
        }
    }

    pub fn with_image(mut self, image: InlineImage) -> Self {
        self.images.push(image);
        self
    }
}

/// What came back: every text part joined in order, and the first image part.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationOutput {
    pub text: Option<String>,
    pub image: Option<InlineImage>,
}

impl GenerationOutput {
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}
