use super::{FailureReason, InferenceBackend, ModelSpec, ModelTable};
use crate::CANVAS_SIZE;
use image::{imageops::FilterType, RgbImage};
use serde::Serialize;
use std::sync::Arc;

/// Image returned by a remote model.
#[derive(Debug, Clone)]
pub struct RemoteImage {
    pub image: RgbImage,
    pub model: String,
    pub attempts: Vec<AttemptSummary>,
}

#[derive(Debug, Clone)]
pub enum AttemptOutcome {
    Succeeded(RgbImage),
    Failed(FailureReason),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptSummary {
    pub model: String,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Every candidate model failed.
#[derive(Debug, Clone, Default)]
pub struct CascadeFailure {
    pub failures: Vec<(String, FailureReason)>,
}

impl CascadeFailure {
    pub fn attempts(&self) -> Vec<AttemptSummary> {
        self.failures
            .iter()
            .map(|(model, reason)| AttemptSummary {
                model: model.clone(),
                succeeded: false,
                reason: Some(reason.to_string()),
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub enum Resolution {
    Generated(RemoteImage),
    Exhausted(CascadeFailure),
}

impl Resolution {
    pub fn is_generated(&self) -> bool {
        matches!(self, Resolution::Generated(_))
    }
}

/// Turns a 200 body into a canonical RGB image.
pub fn decode_payload(bytes: &[u8]) -> std::result::Result<RgbImage, FailureReason> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| FailureReason::Undecodable(e.to_string()))?;
    let rgb = decoded.to_rgb8();

    if rgb.dimensions() == (CANVAS_SIZE, CANVAS_SIZE) {
        Ok(rgb)
    } else {
        Ok(image::imageops::resize(
            &rgb,
            CANVAS_SIZE,
            CANVAS_SIZE,
            FilterType::Lanczos3,
        ))
    }
}

/// Walks the model table in order until one endpoint returns an image.
#[derive(Clone)]
pub struct CascadeResolver {
    table: Arc<ModelTable>,
    backend: Arc<dyn InferenceBackend>,
}

impl CascadeResolver {
    pub fn new(table: Arc<ModelTable>, backend: Arc<dyn InferenceBackend>) -> Self {
        Self { table, backend }
    }

    pub fn table(&self) -> &ModelTable {
        &self.table
    }

    async fn attempt(&self, prompt: &str, model: &ModelSpec) -> AttemptOutcome {
        let enhanced = model.enhance(prompt);
        log::info!("Trying model: {}", model.name);
        log::debug!("Enhanced prompt for {}: {}", model.name, enhanced);

        match self.backend.infer(model, &enhanced).await {
            Ok(bytes) => match decode_payload(&bytes) {
                Ok(image) => AttemptOutcome::Succeeded(image),
                Err(reason) => AttemptOutcome::Failed(reason),
            },
            Err(reason) => AttemptOutcome::Failed(reason),
        }
    }

    pub async fn resolve(&self, prompt: &str, preferred: &str) -> Resolution {
        if !self.table.contains(preferred) {
            log::debug!("Preferred model '{}' is unknown, using default order", preferred);
        }

        let mut failure = CascadeFailure::default();

        for model in self.table.candidates(preferred) {
            match self.attempt(prompt, model).await {
                AttemptOutcome::Succeeded(image) => {
                    log::info!("✅ Successfully generated with {}", model.name);
                    let mut attempts = failure.attempts();
                    attempts.push(AttemptSummary {
                        model: model.name.clone(),
                        succeeded: true,
                        reason: None,
                    });
                    return Resolution::Generated(RemoteImage {
                        image,
                        model: model.name.clone(),
                        attempts,
                    });
                }
                AttemptOutcome::Failed(reason) => {
                    log::warn!("❌ Failed with {}: {}", model.name, reason);
                    failure.failures.push((model.name.clone(), reason));
                }
            }
        }

        log::warn!(
            "All {} model attempts failed for prompt",
            failure.failures.len()
        );
        Resolution::Exhausted(failure)
    }
}
