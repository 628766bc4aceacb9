pub mod config;
pub mod error;
pub mod inference;
pub mod logger;
pub mod models;
pub mod pipeline;
pub mod placeholder;
#[cfg(feature = "server")]
pub mod server;
pub mod storage;

/// Width and height of every image the pipeline hands out.
pub const CANVAS_SIZE: u32 = 512;

pub use config::Config;
pub use error::{GenError, Result};
pub use inference::{
    enhance_prompt, CascadeFailure, CascadeResolver, FailureReason, HttpInference,
    InferenceBackend, ModelSpec, ModelTable, PromptStyle, Resolution,
};
pub use pipeline::{GeneratedImage, ImageGenerator, Provenance};
pub use placeholder::PlaceholderSynthesizer;
pub use storage::{ImageStore, StoredImage};
