use serde::{Deserialize, Serialize};

use super::tattoo::TattooParams;

/// JSON body of `POST /generate-tattoo`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum GenerateResponse {
    Success {
        generated_text: String,
        image_base64: Option<String>,
    },
    Failure {
        error: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlterRequest {
    pub feedback: String,
    pub style: String,
    pub theme: String,
    pub color_mode: String,
    pub size: String,
    #[serde(default)]
    pub physical_attributes: Option<String>,
    pub generated_image_base64: String,
}

impl AlterRequest {
    pub fn params(&self) -> TattooParams {
        let mut params = TattooParams::new(&self.style, &self.theme, &self.color_mode)
            .with_size(&self.size);
        if let Some(attributes) = &self.physical_attributes {
            params = params.with_physical_attributes(attributes);
        }
        params
    }
}

/// JSON body of `POST /alter-tattoo`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AlterResponse {
    Success {
        idea: String,
        image_base64: String,
    },
    Failure {
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        idea: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generate_response_shapes() {
        let ok = GenerateResponse::Success {
            generated_text: "a koi".into(),
            image_base64: None,
        };
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({ "generated_text": "a koi", "image_base64": null })
        );

        let failed = GenerateResponse::Failure {
            error: "boom".into(),
        };
        assert_eq!(serde_json::to_value(&failed).unwrap(), json!({ "error": "boom" }));
    }

    #[test]
    fn test_alter_request_params() {
        let request: AlterRequest = serde_json::from_value(json!({
            "feedback": "thicker lines",
            "style": "traditional",
            "theme": "swallow",
            "color_mode": "color",
            "size": "small",
            "generated_image_base64": "AAAA"
        }))
        .unwrap();
        let params = request.params();
        assert_eq!(params.size.as_deref(), Some("small"));
        assert_eq!(params.physical_attributes, None);
    }
}
