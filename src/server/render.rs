use actix_web::{http::header, HttpRequest};
use minijinja::{context, Environment};
use serde::Serialize;

use crate::{error::Result, models::TattooParams};

const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");
const RESULT_TEMPLATE: &str = include_str!("../../templates/result.html");

/// Everything the result page shows; mirrors the JSON payload.
#[derive(Debug, Default, Serialize)]
pub struct ResultView {
    pub generated_text: Option<String>,
    pub image_base64: Option<String>,
    pub image_mime: Option<String>,
    pub saved_as: Option<String>,
    pub params: Option<TattooParams>,
    pub error: Option<String>,
}

impl ResultView {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template("index.html", INDEX_TEMPLATE)?;
        env.add_template("result.html", RESULT_TEMPLATE)?;
        Ok(Self { env })
    }

    pub fn render_index(&self, model: &str) -> Result<String> {
        let template = self.env.get_template("index.html")?;
        Ok(template.render(context! { model => model })?)
    }

    pub fn render_result(&self, view: &ResultView) -> Result<String> {
        let template = self.env.get_template("result.html")?;
        Ok(template.render(view)?)
    }
}

/// True when the caller's `Accept` header lists a JSON media type.
pub fn wants_json(req: &HttpRequest) -> bool {
    req.headers()
        .get_all(header::ACCEPT)
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(|media| media.split(';').next().unwrap_or("").trim().to_ascii_lowercase())
        .any(|media| media == "application/json" || media.ends_with("+json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_wants_json() {
        let req = TestRequest::default()
            .insert_header((header::ACCEPT, "application/json"))
            .to_http_request();
        assert!(wants_json(&req));

        let req = TestRequest::default()
            .insert_header((header::ACCEPT, "text/html, application/json;q=0.9"))
            .to_http_request();
        assert!(wants_json(&req));

        let req = TestRequest::default()
            .insert_header((header::ACCEPT, "text/html,application/xhtml+xml,*/*;q=0.8"))
            .to_http_request();
        assert!(!wants_json(&req));

        assert!(!wants_json(&TestRequest::default().to_http_request()));
    }

    #[test]
    fn test_render_index() {
        let templates = Templates::new().unwrap();
        let html = templates.render_index("gemini-test").unwrap();
        assert!(html.contains("action=\"/generate-tattoo\""));
        assert!(html.contains("gemini-test"));
    }

    #[test]
    fn test_render_result_escapes_text() {
        let templates = Templates::new().unwrap();
        let view = ResultView {
            generated_text: Some("<b>bold</b> rose".into()),
            image_base64: Some("AQID".into()),
            image_mime: Some("image/png".into()),
            saved_as: Some("generated_image1.png".into()),
            params: Some(TattooParams::new("fine line", "rose", "black").with_size("wrist")),
            error: None,
        };
        let html = templates.render_result(&view).unwrap();
        assert!(html.contains(";base64,AQID"));
        assert!(html.contains("&lt;b&gt;bold"));
        assert!(html.contains("generated_image1.png"));
        assert!(html.contains("fine line"));
        assert!(!html.contains("Generation failed"));
    }

    #[test]
    fn test_render_result_error() {
        let templates = Templates::new().unwrap();
        let html = templates
            .render_result(&ResultView::failed("Network error: timed out"))
            .unwrap();
        assert!(html.contains("Generation failed: Network error: timed out"));
        assert!(!html.contains("<img"));
    }
}
