use serde::{Deserialize, Serialize};

use crate::error::{Result, TattooError};

/// Style fields shared by the generate and alter endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TattooParams {
    pub style: String,
    pub theme: String,
    pub color_mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_attributes: Option<String>,
}

impl TattooParams {
    pub fn new(
        style: impl Into<String>,
        theme: impl Into<String>,
        color_mode: impl Into<String>,
    ) -> Self {
        Self {
            style: style.into(),
            theme: theme.into(),
            color_mode: color_mode.into(),
            size: None,
            physical_attributes: None,
        }
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn with_physical_attributes(mut self, attributes: impl Into<String>) -> Self {
        self.physical_attributes = Some(attributes.into());
        self
    }

    /// Trims every field and drops blank optional ones. Older clients send
    /// `size`, newer ones `physical_attributes`; at least one is required.
    pub fn normalized(self) -> Result<Self> {
        fn opt(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        let params = Self {
            style: self.style.trim().to_string(),
            theme: self.theme.trim().to_string(),
            color_mode: self.color_mode.trim().to_string(),
            size: opt(self.size),
            physical_attributes: opt(self.physical_attributes),
        };

        if params.size.is_none() && params.physical_attributes.is_none() {
            return Err(TattooError::RequestError(
                "either `size` or `physical_attributes` is required".into(),
            ));
        }
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_trims_and_drops_blanks() {
        let params = TattooParams::new(" blackwork ", "koi\n", "black and grey")
            .with_size(" forearm ")
            .with_physical_attributes("   ")
            .normalized()
            .unwrap();
        assert_eq!(params.style, "blackwork");
        assert_eq!(params.theme, "koi");
        assert_eq!(params.size.as_deref(), Some("forearm"));
        assert_eq!(params.physical_attributes, None);
    }

    #[test]
    fn test_requires_size_or_attributes() {
        let err = TattooParams::new("a", "b", "c").normalized().unwrap_err();
        assert!(matches!(err, TattooError::RequestError(_)));

        assert!(TattooParams::new("a", "b", "c")
            .with_physical_attributes("tall, olive skin")
            .normalized()
            .is_ok());
    }
}
