#![allow(dead_code)]

use async_trait::async_trait;
use image::{ImageFormat, Rgb, RgbImage};
use promptcanvas::{FailureReason, InferenceBackend, ModelSpec, ModelTable};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

/// Canned reply per model name; unknown models get a connection error.
#[derive(Default)]
pub struct RecordingBackend {
    replies: HashMap<String, Result<Vec<u8>, FailureReason>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, model: &str, reply: Result<Vec<u8>, FailureReason>) -> Self {
        self.replies.insert(model.to_string(), reply);
        self
    }

    /// Models called so far, in order.
    pub fn called_models(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(model, _)| model.clone())
            .collect()
    }

    pub fn inputs_for(&self, model: &str) -> Option<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|(called, _)| called == model)
            .map(|(_, inputs)| inputs.clone())
    }
}

#[async_trait]
impl InferenceBackend for RecordingBackend {
    async fn infer(&self, spec: &ModelSpec, inputs: &str) -> Result<Vec<u8>, FailureReason> {
        self.calls
            .lock()
            .unwrap()
            .push((spec.name.clone(), inputs.to_string()));
        self.replies
            .get(&spec.name)
            .cloned()
            .unwrap_or_else(|| Err(FailureReason::Transport("connection refused".into())))
    }
}

pub fn table() -> Arc<ModelTable> {
    Arc::new(ModelTable::huggingface("http://127.0.0.1:9/models").unwrap())
}

pub fn sample_image() -> RgbImage {
    RgbImage::from_fn(512, 512, |x, y| {
        Rgb([(x % 251) as u8, (y % 241) as u8, ((x + y) % 256) as u8])
    })
}

pub fn png(image: &RgbImage) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

pub fn server_error() -> Result<Vec<u8>, FailureReason> {
    Err(FailureReason::Status {
        code: 503,
        body: "Model is currently loading".into(),
    })
}
