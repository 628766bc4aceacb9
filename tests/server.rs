#![cfg(feature = "server")]

mod common;

use actix_web::{http::StatusCode, test, web, App};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::{png, sample_image, table, RecordingBackend};
use promptcanvas::server::{routes, AppState};
use promptcanvas::{Config, ImageGenerator, ImageStore, PlaceholderSynthesizer};
use serde_json::{json, Value};
use std::sync::Arc;

fn state(backend: RecordingBackend, dir: &tempfile::TempDir) -> web::Data<AppState> {
    let generator =
        ImageGenerator::with_backend(table(), Arc::new(backend), PlaceholderSynthesizer::builtin());
    let store = ImageStore::new(dir.path()).unwrap();
    web::Data::new(AppState::new(generator, store, false))
}

#[actix_web::test]
async fn request_without_model_starts_with_configured_default() {
    let dir = tempfile::tempdir().unwrap();
    let backend = Arc::new(RecordingBackend::new());
    let generator = ImageGenerator::with_backend(
        table(),
        backend.clone(),
        PlaceholderSynthesizer::builtin(),
    );
    let store = ImageStore::new(dir.path()).unwrap();
    let state = AppState::new(generator, store, false).with_default_model("dreamlike");
    let data = web::Data::new(state);
    let app = test::init_service(App::new().app_data(data).configure(routes)).await;

    let req = test::TestRequest::post()
        .uri("/generate")
        .set_json(json!({ "prompt": "cat" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(
        backend.called_models(),
        vec!["dreamlike", "stable_diffusion", "openjourney", "realistic"]
    );
}

#[actix_web::test]
async fn state_from_config_keeps_default_model() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::default()
        .with_output_dir(dir.path().join("out"))
        .with_default_model("openjourney");
    let state = AppState::from_config(&config).unwrap();
    assert_eq!(state.default_model, "openjourney");
    assert!(dir.path().join("out").is_dir());
}

#[actix_web::test]
async fn malformed_body_gets_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let data = state(RecordingBackend::new(), &dir);
    let app = test::init_service(App::new().app_data(data).configure(routes)).await;

    let req = test::TestRequest::post()
        .uri("/generate")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"prompt\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body"));

    let req = test::TestRequest::post().uri("/generate").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn empty_prompt_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let data = state(RecordingBackend::new(), &dir);
    let app = test::init_service(App::new().app_data(data).configure(routes)).await;

    let req = test::TestRequest::post()
        .uri("/generate")
        .set_json(json!({ "prompt": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "No prompt provided");
}

#[actix_web::test]
async fn generate_falls_back_to_placeholder_and_saves_it() {
    let dir = tempfile::tempdir().unwrap();
    let data = state(RecordingBackend::new(), &dir);
    let app = test::init_service(App::new().app_data(data).configure(routes)).await;

    let req = test::TestRequest::post()
        .uri("/generate")
        .set_json(json!({ "prompt": "A beautiful sunset over mountains" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["provenance"]["kind"], "placeholder");
    assert!(body["model_used"].is_null());
    assert!(body["provenance"]["caption"]
        .as_str()
        .unwrap()
        .contains("A beautiful sunset over mountains"));

    let bytes = STANDARD.decode(body["image"].as_str().unwrap()).unwrap();
    let image = image::load_from_memory(&bytes).unwrap();
    assert_eq!((image.width(), image.height()), (512, 512));

    let filename = body["filename"].as_str().unwrap();
    assert!(dir.path().join(filename).exists());
}

#[actix_web::test]
async fn generate_reports_remote_model() {
    let dir = tempfile::tempdir().unwrap();
    let backend = RecordingBackend::new().reply("openjourney", Ok(png(&sample_image())));
    let app = test::init_service(App::new().app_data(state(backend, &dir)).configure(routes)).await;

    let req = test::TestRequest::post()
        .uri("/generate")
        .set_json(json!({ "prompt": "cat", "model": "openjourney" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["model_used"], "openjourney");
    assert_eq!(body["provenance"]["kind"], "remote");
}

#[actix_web::test]
async fn download_serves_saved_png_and_404s_otherwise() {
    let dir = tempfile::tempdir().unwrap();
    let data = state(RecordingBackend::new(), &dir);
    let stored = data.store.save(&sample_image()).unwrap();
    let app = test::init_service(App::new().app_data(data.clone()).configure(routes)).await;

    let req = test::TestRequest::get()
        .uri(&format!("/download/{}", stored.filename))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert_eq!(body.as_ref(), stored.png_bytes.as_slice());

    let req = test::TestRequest::get()
        .uri("/download/ai_generated_0_00000000.png")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn models_and_health_list_the_table() {
    let dir = tempfile::tempdir().unwrap();
    let data = state(RecordingBackend::new(), &dir);
    let app = test::init_service(App::new().app_data(data).configure(routes)).await;

    let req = test::TestRequest::get().uri("/models").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        body["models"],
        json!(["stable_diffusion", "openjourney", "dreamlike", "realistic"])
    );
    assert_eq!(body["current_token"], "not_configured");

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["ai_mode"], "Placeholder Mode");

    let req = test::TestRequest::get().uri("/setup-guide").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["steps"].as_array().unwrap().len(), 4);
}
