pub mod cascade;
pub mod client;

use crate::error::{GenError, Result};
use std::collections::HashSet;

pub use cascade::{
    AttemptOutcome, AttemptSummary, CascadeFailure, CascadeResolver, RemoteImage, Resolution,
};
pub use client::{FailureReason, HttpInference, InferenceBackend};

/// Style qualifiers wrapped around a prompt before it is sent to a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStyle {
    Masterpiece,
    Midjourney,
    Photoreal,
}

impl PromptStyle {
    pub fn for_model(name: &str) -> Self {
        match name {
            "openjourney" => PromptStyle::Midjourney,
            "dreamlike" => PromptStyle::Photoreal,
            _ => PromptStyle::Masterpiece,
        }
    }

    pub fn apply(&self, prompt: &str) -> String {
        let prompt = prompt.trim();
        match self {
            PromptStyle::Masterpiece => format!("high quality, detailed, {}, masterpiece", prompt),
            PromptStyle::Midjourney => format!("mdjrny-v4 style, {}, high quality, detailed", prompt),
            PromptStyle::Photoreal => {
                format!("photorealistic, {}, high quality, detailed, 8k", prompt)
            }
        }
    }
}

/// Enhanced prompt for `model`, using the default transform for unknown names.
pub fn enhance_prompt(prompt: &str, model: &str) -> String {
    PromptStyle::for_model(model).apply(prompt)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSpec {
    pub name: String,
    pub endpoint: String,
    pub style: PromptStyle,
}

impl ModelSpec {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        let name = name.into();
        let style = PromptStyle::for_model(&name);
        Self {
            name,
            endpoint: endpoint.into(),
            style,
        }
    }

    pub fn with_style(mut self, style: PromptStyle) -> Self {
        self.style = style;
        self
    }

    pub fn enhance(&self, prompt: &str) -> String {
        self.style.apply(prompt)
    }
}

/// Hosted model repositories, in default cascade order.
pub const HUGGINGFACE_MODELS: &[(&str, &str)] = &[
    ("stable_diffusion", "runwayml/stable-diffusion-v1-5"),
    ("openjourney", "prompthero/openjourney"),
    ("dreamlike", "dreamlike-art/dreamlike-photoreal-2.0"),
    ("realistic", "CompVis/stable-diffusion-v1-4"),
];

/// Read-only registry of known models plus the order the cascade falls
/// back through.
#[derive(Debug, Clone)]
pub struct ModelTable {
    specs: Vec<ModelSpec>,
    default_order: Vec<String>,
}

impl ModelTable {
    pub fn new(specs: Vec<ModelSpec>, default_order: Vec<String>) -> Result<Self> {
        if specs.is_empty() {
            return Err(GenError::Config("model table is empty".into()));
        }

        let mut seen = HashSet::new();
        for spec in &specs {
            if !seen.insert(spec.name.as_str()) {
                return Err(GenError::Config(format!(
                    "duplicate model name '{}'",
                    spec.name
                )));
            }
        }
        if let Some(unknown) = default_order.iter().find(|name| !seen.contains(name.as_str())) {
            return Err(GenError::Config(format!(
                "default order names unknown model '{}'",
                unknown
            )));
        }

        Ok(Self {
            specs,
            default_order,
        })
    }

    /// Table whose default order is the order of `specs`.
    pub fn from_specs(specs: Vec<ModelSpec>) -> Result<Self> {
        let order = specs.iter().map(|spec| spec.name.clone()).collect();
        Self::new(specs, order)
    }

    pub fn huggingface(base_url: &str) -> Result<Self> {
        let base = base_url.trim_end_matches('/');
        let specs = HUGGINGFACE_MODELS
            .iter()
            .map(|(name, repo)| ModelSpec::new(*name, format!("{}/{}", base, repo)))
            .collect();
        Self::from_specs(specs)
    }

    pub fn get(&self, name: &str) -> Option<&ModelSpec> {
        self.specs.iter().find(|spec| spec.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.specs.iter().map(|spec| spec.name.as_str()).collect()
    }

    /// Preferred model first when known, then the default order, without
    /// repeats.
    pub fn candidates(&self, preferred: &str) -> Vec<&ModelSpec> {
        let mut ordered: Vec<&ModelSpec> = Vec::with_capacity(self.specs.len());
        let names = std::iter::once(preferred).chain(self.default_order.iter().map(String::as_str));

        for name in names {
            if let Some(spec) = self.get(name) {
                if !ordered.iter().any(|seen| seen.name == spec.name) {
                    ordered.push(spec);
                }
            }
        }
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(candidates: Vec<&ModelSpec>) -> Vec<&str> {
        candidates.into_iter().map(|spec| spec.name.as_str()).collect()
    }

    #[test]
    fn test_enhancement_templates() {
        assert_eq!(
            enhance_prompt("a red fox", "stable_diffusion"),
            "high quality, detailed, a red fox, masterpiece"
        );
        assert_eq!(
            enhance_prompt("a red fox", "openjourney"),
            "mdjrny-v4 style, a red fox, high quality, detailed"
        );
        assert_eq!(
            enhance_prompt("a red fox", "dreamlike"),
            "photorealistic, a red fox, high quality, detailed, 8k"
        );
        assert_eq!(
            enhance_prompt("a red fox", "something_else"),
            "high quality, detailed, a red fox, masterpiece"
        );
    }

    #[test]
    fn test_enhancement_trims_prompt() {
        assert_eq!(
            enhance_prompt("  cat \n", "openjourney"),
            "mdjrny-v4 style, cat, high quality, detailed"
        );
    }

    #[test]
    fn test_huggingface_table_endpoints() {
        let table = ModelTable::huggingface("https://example.test/models/").unwrap();
        assert_eq!(
            table.get("openjourney").unwrap().endpoint,
            "https://example.test/models/prompthero/openjourney"
        );
        assert_eq!(
            table.names(),
            vec!["stable_diffusion", "openjourney", "dreamlike", "realistic"]
        );
    }

    #[test]
    fn test_candidates_put_known_preference_first() {
        let table = ModelTable::huggingface("http://localhost").unwrap();
        assert_eq!(
            names(table.candidates("dreamlike")),
            vec!["dreamlike", "stable_diffusion", "openjourney", "realistic"]
        );
        assert_eq!(
            names(table.candidates("stable_diffusion")),
            vec!["stable_diffusion", "openjourney", "dreamlike", "realistic"]
        );
    }

    #[test]
    fn test_candidates_ignore_unknown_preference() {
        let table = ModelTable::huggingface("http://localhost").unwrap();
        assert_eq!(
            names(table.candidates("dall-e")),
            vec!["stable_diffusion", "openjourney", "dreamlike", "realistic"]
        );
    }

    #[test]
    fn test_table_rejects_duplicates_and_unknown_order() {
        let dup = vec![
            ModelSpec::new("a", "http://a"),
            ModelSpec::new("a", "http://b"),
        ];
        assert!(ModelTable::from_specs(dup).is_err());

        let specs = vec![ModelSpec::new("a", "http://a")];
        assert!(ModelTable::new(specs, vec!["b".to_string()]).is_err());
        assert!(ModelTable::from_specs(Vec::new()).is_err());
    }

    #[test]
    fn test_realistic_uses_default_style() {
        let table = ModelTable::huggingface("http://localhost").unwrap();
        assert_eq!(table.get("realistic").unwrap().style, PromptStyle::Masterpiece);
    }
}
