use crate::inference::AttemptSummary;
use crate::pipeline::Provenance;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: String,
    /// Preferred model; the service default when absent.
    #[serde(default)]
    pub model: Option<String>,
}

impl GenerateRequest {
    /// Prompt with surrounding whitespace removed, `None` when nothing is left.
    pub fn prompt(&self) -> Option<&str> {
        let prompt = self.prompt.trim();
        (!prompt.is_empty()).then_some(prompt)
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub image: String, // Base64 encoded PNG
    pub filename: String,
    pub prompt: String,
    pub model_used: Option<String>,
    pub provenance: Provenance,
    pub note: String,
    pub message: String,
    pub attempts: Vec<AttemptSummary>,
}
