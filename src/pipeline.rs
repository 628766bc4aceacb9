use crate::{
    config::Config,
    error::Result,
    inference::{
        AttemptSummary, CascadeResolver, HttpInference, InferenceBackend, ModelTable, Resolution,
    },
    logger,
    placeholder::{caption, PlaceholderSynthesizer},
};
use image::RgbImage;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;
use std::sync::Arc;

/// Where a generated image came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Provenance {
    Remote { model: String },
    Placeholder { caption: String },
}

impl Provenance {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Provenance::Placeholder { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Provenance::Remote { .. } => "remote",
            Provenance::Placeholder { .. } => "placeholder",
        }
    }

    pub fn model(&self) -> Option<&str> {
        match self {
            Provenance::Remote { model } => Some(model),
            Provenance::Placeholder { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub image: RgbImage,
    pub provenance: Provenance,
    pub attempts: Vec<AttemptSummary>,
}

/// Cascade first, placeholder when every model failed. Always yields one
/// image.
#[derive(Clone)]
pub struct ImageGenerator {
    resolver: CascadeResolver,
    synthesizer: Arc<PlaceholderSynthesizer>,
}

impl ImageGenerator {
    pub fn new(resolver: CascadeResolver, synthesizer: Arc<PlaceholderSynthesizer>) -> Self {
        Self {
            resolver,
            synthesizer,
        }
    }

    pub fn with_backend(
        table: Arc<ModelTable>,
        backend: Arc<dyn InferenceBackend>,
        synthesizer: PlaceholderSynthesizer,
    ) -> Self {
        Self::new(
            CascadeResolver::new(table, backend),
            Arc::new(synthesizer),
        )
    }

    /// Production wiring: Hugging Face model table over HTTP, default font
    /// chain.
    pub fn from_config(config: &Config) -> Result<Self> {
        let table = Arc::new(ModelTable::huggingface(&config.inference_base_url)?);
        let backend: Arc<dyn InferenceBackend> = Arc::new(HttpInference::from_config(config)?);
        let synthesizer = PlaceholderSynthesizer::with_bundled_font(config.font_path.clone());
        Ok(Self::with_backend(table, backend, synthesizer))
    }

    pub fn models(&self) -> &ModelTable {
        self.resolver.table()
    }

    pub async fn generate(&self, prompt: &str, preferred: &str) -> GeneratedImage {
        let _timer = logger::timer("image generation");
        let mut rng = StdRng::from_entropy();
        self.generate_with_rng(prompt, preferred, &mut rng).await
    }

    /// Same as `generate` with a caller-supplied RNG for the placeholder.
    pub async fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        prompt: &str,
        preferred: &str,
        rng: &mut R,
    ) -> GeneratedImage {
        match self.resolver.resolve(prompt, preferred).await {
            Resolution::Generated(remote) => GeneratedImage {
                image: remote.image,
                provenance: Provenance::Remote {
                    model: remote.model,
                },
                attempts: remote.attempts,
            },
            Resolution::Exhausted(failure) => {
                log::warn!("AI generation failed, using placeholder");
                GeneratedImage {
                    image: self.synthesizer.synthesize_with_rng(prompt, rng),
                    provenance: Provenance::Placeholder {
                        caption: caption(prompt),
                    },
                    attempts: failure.attempts(),
                }
            }
        }
    }
}
