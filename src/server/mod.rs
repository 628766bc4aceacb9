pub mod handlers;

use crate::{
    config::{Config, DEFAULT_MODEL},
    error::{GenError, Result},
    pipeline::ImageGenerator,
    storage::ImageStore,
};
use actix_web::{web, App, HttpServer};

/// Shared, read-only request state.
pub struct AppState {
    pub generator: ImageGenerator,
    pub store: ImageStore,
    pub has_token: bool,
    /// Model tried first when a request names none.
    pub default_model: String,
}

impl AppState {
    pub fn new(generator: ImageGenerator, store: ImageStore, has_token: bool) -> Self {
        Self {
            generator,
            store,
            has_token,
            default_model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let state = Self::new(
            ImageGenerator::from_config(config)?,
            ImageStore::new(config.output_dir.clone())?,
            config.has_token(),
        );
        Ok(state.with_default_model(config.default_model.clone()))
    }
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(handlers::json_config())
        .route("/generate", web::post().to(handlers::generate))
        .route("/models", web::get().to(handlers::models))
        .route("/download/{filename}", web::get().to(handlers::download))
        .route("/health", web::get().to(handlers::health))
        .route("/setup-guide", web::get().to(handlers::setup_guide));
}

pub async fn run(config: Config) -> Result<()> {
    config.validate()?;
    let state = web::Data::new(AppState::from_config(&config)?);
    crate::logger::log_config_info(&config, &state.generator.models().names());

    HttpServer::new(move || App::new().app_data(state.clone()).configure(routes))
        .bind((config.host.as_str(), config.port))
        .map_err(|e| {
            GenError::Config(format!("cannot bind {}:{}: {}", config.host, config.port, e))
        })?
        .run()
        .await
        .map_err(|e| GenError::Internal(format!("server stopped: {}", e)))
}
