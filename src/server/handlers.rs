use actix_multipart::form::{bytes::Bytes, text::Text, MultipartForm};
use actix_web::{web, HttpRequest, HttpResponse};

use crate::{
    error::{Result, TattooError},
    imaging, logger,
    models::{
        AlterRequest, AlterResponse, ContentRequest, GenerateResponse, HealthResponse,
        InlineImage, TattooParams,
    },
    prompt,
    server::{
        render::{wants_json, ResultView},
        state::AppState,
    },
    storage::{local::file_name, SavedImage},
};

#[derive(MultipartForm)]
pub struct GenerateForm {
    pub photo: Bytes,
    pub reference: Option<Bytes>,
    pub style: Text<String>,
    pub theme: Text<String>,
    pub color_mode: Text<String>,
    pub size: Option<Text<String>>,
    pub physical_attributes: Option<Text<String>>,
}

impl GenerateForm {
    fn params(&self) -> TattooParams {
        TattooParams {
            style: self.style.0.clone(),
            theme: self.theme.0.clone(),
            color_mode: self.color_mode.0.clone(),
            size: self.size.as_ref().map(|t| t.0.clone()),
            physical_attributes: self.physical_attributes.as_ref().map(|t| t.0.clone()),
        }
    }
}

struct Generated {
    text: String,
    image: Option<InlineImage>,
    saved: Option<SavedImage>,
}

/// GET / - upload form
pub async fn index(state: web::Data<AppState>) -> Result<HttpResponse> {
    let html = state.templates.render_index(state.generator.model())?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

/// GET /health
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        model: state.generator.model().to_string(),
    })
}

/// POST /generate-tattoo - photo + style fields in, design out.
///
/// Failures inside the generation flow come back as HTTP 200 with an `error`
/// field; only malformed forms are rejected with 400.
pub async fn generate_tattoo(
    req: HttpRequest,
    state: web::Data<AppState>,
    MultipartForm(form): MultipartForm<GenerateForm>,
) -> Result<HttpResponse> {
    let request_id = logger::request_id();
    let params = form.params().normalized()?;
    log::info!(
        "[req:{}] generate-tattoo: style={:?} theme={:?} color_mode={:?}",
        request_id,
        params.style,
        params.theme,
        params.color_mode
    );

    let outcome = run_generation(&state, &params, &form, &request_id).await;
    if let Err(e) = &outcome {
        log::error!("[req:{}] generate-tattoo failed: {}", request_id, e);
    }

    if wants_json(&req) {
        let body = match outcome {
            Ok(generated) => GenerateResponse::Success {
                generated_text: generated.text,
                image_base64: generated.image.map(|image| image.to_base64()),
            },
            Err(e) => GenerateResponse::Failure {
                error: e.to_string(),
            },
        };
        return Ok(HttpResponse::Ok().json(body));
    }

    let view = match outcome {
        Ok(generated) => ResultView {
            generated_text: Some(generated.text),
            image_mime: generated.image.as_ref().map(|image| image.mime_type.clone()),
            image_base64: generated.image.map(|image| image.to_base64()),
            saved_as: generated.saved.map(|saved| file_name(saved.index)),
            params: Some(params),
            error: None,
        },
        Err(e) => ResultView::failed(e.to_string()),
    };
    let html = state.templates.render_result(&view)?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

async fn run_generation(
    state: &AppState,
    params: &TattooParams,
    form: &GenerateForm,
    request_id: &str,
) -> Result<Generated> {
    let photo = imaging::decode_upload(&form.photo.data)?;
    // Browsers submit an empty part when the optional file input is left blank.
    let reference = match &form.reference {
        Some(upload) if !upload.data.is_empty() => Some(imaging::decode_upload(&upload.data)?),
        _ => None,
    };

    let mut request =
        ContentRequest::new(prompt::generation_prompt(params, reference.is_some())).with_image(photo);
    if let Some(reference) = reference {
        request = request.with_image(reference);
    }

    let mut timer = logger::timer(&format!("[req:{}] model call", request_id));
    let output = match state.generator.generate(request).await {
        Ok(output) => output,
        Err(e) => {
            timer.fail(&e);
            return Err(e);
        }
    };
    drop(timer);

    let text = output.text.unwrap_or_default();
    let image = output.image.map(imaging::normalize_output);
    let saved = match &image {
        Some(image) => Some(state.storage.save(image).await?),
        None => {
            log::warn!("[req:{}] model returned no image", request_id);
            None
        }
    };

    Ok(Generated { text, image, saved })
}

/// POST /alter-tattoo - revise a previously generated image.
///
/// The image is decoded before the model is called: bad input is a 400, a
/// reply without an image is a 502, other failures are a 200 with `error`.
pub async fn alter_tattoo(
    state: web::Data<AppState>,
    body: web::Json<AlterRequest>,
) -> Result<HttpResponse> {
    let request_id = logger::request_id();
    let body = body.into_inner();

    let image = imaging::decode_base64_image(&body.generated_image_base64).map_err(|e| {
        log::warn!("[req:{}] alter-tattoo rejected image: {}", request_id, e);
        e
    })?;
    let params = body.params().normalized()?;
    log::info!(
        "[req:{}] alter-tattoo: feedback={:?}",
        request_id,
        body.feedback
    );

    let request =
        ContentRequest::new(prompt::alteration_prompt(&params, &body.feedback)).with_image(image);

    let mut timer = logger::timer(&format!("[req:{}] model call", request_id));
    let result = state.generator.generate(request).await;
    if let Err(e) = &result {
        timer.fail(e);
    }
    drop(timer);

    let output = match result {
        Ok(output) => output,
        Err(e) => {
            log::error!("[req:{}] alter-tattoo failed: {}", request_id, e);
            return Ok(HttpResponse::Ok().json(AlterResponse::Failure {
                error: e.to_string(),
                idea: None,
            }));
        }
    };

    let Some(image) = output.image else {
        log::warn!("[req:{}] model returned no image", request_id);
        return Ok(HttpResponse::BadGateway().json(AlterResponse::Failure {
            error: TattooError::NoImage.to_string(),
            idea: output.text,
        }));
    };

    let image = imaging::normalize_output(image);
    if let Err(e) = state.storage.save(&image).await {
        log::error!("[req:{}] could not persist altered image: {}", request_id, e);
        return Ok(HttpResponse::Ok().json(AlterResponse::Failure {
            error: e.to_string(),
            idea: output.text,
        }));
    }

    Ok(HttpResponse::Ok().json(AlterResponse::Success {
        idea: output.text.unwrap_or_default(),
        image_base64: image.to_base64(),
    }))
}
