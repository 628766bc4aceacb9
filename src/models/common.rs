use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
    pub current_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub ai_mode: String,
    pub available_models: Vec<String>,
    pub note: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SetupGuide {
    pub message: String,
    pub steps: Vec<String>,
    pub current_status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
