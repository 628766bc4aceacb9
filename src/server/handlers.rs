use super::AppState;
use crate::{
    error::GenError,
    models::{
        ErrorResponse, GenerateRequest, GenerateResponse, HealthResponse, ModelsResponse,
        SetupGuide,
    },
};
use actix_web::{
    error::InternalError,
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    web, HttpResponse, Responder,
};

/// Rejects unreadable JSON bodies with the same `{"error": ..}` shape as the
/// handlers.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = format!("Invalid request body: {}", err);
        log::warn!("{}", message);
        let response = HttpResponse::BadRequest().json(ErrorResponse::new(message));
        InternalError::from_response(err, response).into()
    })
}

fn model_names(state: &AppState) -> Vec<String> {
    state
        .generator
        .models()
        .names()
        .into_iter()
        .map(String::from)
        .collect()
}

pub async fn generate(
    state: web::Data<AppState>,
    body: web::Json<GenerateRequest>,
) -> impl Responder {
    let request = body.into_inner();
    let Some(prompt) = request.prompt() else {
        return HttpResponse::BadRequest().json(ErrorResponse::new("No prompt provided"));
    };

    let model = request.model.as_deref().unwrap_or(&state.default_model);

    log::info!("Generating AI image for prompt: {}", prompt);
    log::info!("Using model: {}", model);

    let generated = state.generator.generate(prompt, model).await;

    let store = state.store.clone();
    let image = generated.image;
    let stored = match web::block(move || store.save(&image)).await {
        Ok(Ok(stored)) => stored,
        Ok(Err(e)) => {
            log::error!("❌ Failed to save image: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse::new(e.to_string()));
        }
        Err(e) => {
            log::error!("❌ Save task was cancelled: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse::new(e.to_string()));
        }
    };

    let (note, message) = if generated.provenance.is_placeholder() {
        (
            "Placeholder image: no AI model could be reached".to_string(),
            "⚠️ Using placeholder (AI models unavailable)".to_string(),
        )
    } else {
        (
            "AI-generated image created successfully!".to_string(),
            "✅ AI Image generated successfully!".to_string(),
        )
    };

    HttpResponse::Ok().json(GenerateResponse {
        success: true,
        image: stored.base64(),
        filename: stored.filename,
        prompt: prompt.to_string(),
        model_used: generated.provenance.model().map(String::from),
        provenance: generated.provenance,
        note,
        message,
        attempts: generated.attempts,
    })
}

pub async fn models(state: web::Data<AppState>) -> impl Responder {
    let current_token = if state.has_token {
        "configured"
    } else {
        "not_configured"
    };
    HttpResponse::Ok().json(ModelsResponse {
        models: model_names(&state),
        current_token: current_token.to_string(),
    })
}

pub async fn download(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let filename = path.into_inner();
    match state.store.open(&filename) {
        Ok(bytes) => HttpResponse::Ok()
            .content_type("image/png")
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(filename)],
            })
            .body(bytes),
        Err(e @ (GenError::NotFound(_) | GenError::InvalidFilename(_))) => {
            HttpResponse::NotFound().json(ErrorResponse::new(e.to_string()))
        }
        Err(e) => HttpResponse::InternalServerError().json(ErrorResponse::new(e.to_string())),
    }
}

pub async fn health(state: web::Data<AppState>) -> impl Responder {
    let ai_mode = if state.has_token {
        "Real AI Ready"
    } else {
        "Placeholder Mode"
    };
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        ai_mode: ai_mode.to_string(),
        available_models: model_names(&state),
        note: "Text-to-image generation with model cascade and placeholder fallback".to_string(),
    })
}

pub async fn setup_guide(state: web::Data<AppState>) -> impl Responder {
    let current_status = if state.has_token {
        "HF_TOKEN configured, real AI generation enabled"
    } else {
        "Placeholder mode, working without authentication"
    };
    HttpResponse::Ok().json(SetupGuide {
        message: "To enable real AI generation:".to_string(),
        steps: vec![
            "1. Get a free Hugging Face token from: https://huggingface.co/settings/tokens"
                .to_string(),
            "2. Add HF_TOKEN=your_token_here to the .env file".to_string(),
            "3. Restart the server".to_string(),
            "4. Enjoy real AI-generated images!".to_string(),
        ],
        current_status: current_status.to_string(),
    })
}
