use crate::error::{GenError, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_INFERENCE_BASE_URL: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_OUTPUT_DIR: &str = "static/generated_images";
pub const DEFAULT_FONT_PATH: &str = "assets/fonts/DejaVuSans.ttf";
pub const DEFAULT_MODEL: &str = "stable_diffusion";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub hf_token: Option<String>,
    pub output_dir: PathBuf,
    pub inference_base_url: String,
    pub request_timeout: Duration,
    pub font_path: PathBuf,
    pub default_model: String,
    pub json_logs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "0.0.0.0".to_string(),
            port: 5000,
            hf_token: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            inference_base_url: DEFAULT_INFERENCE_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            font_path: PathBuf::from(DEFAULT_FONT_PATH),
            default_model: DEFAULT_MODEL.to_string(),
            json_logs: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the process environment. Call `dotenv::dotenv()` first if a
    /// `.env` file should be honoured.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let host = env::var("HOST").unwrap_or(defaults.host);
        let port = env::var("PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(defaults.port);
        // An empty token behaves like no token at all.
        let hf_token = env::var("HF_TOKEN")
            .ok()
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());
        let output_dir = env::var("UPLOAD_FOLDER")
            .map(PathBuf::from)
            .unwrap_or(defaults.output_dir);
        let inference_base_url =
            env::var("INFERENCE_BASE_URL").unwrap_or(defaults.inference_base_url);
        let request_timeout = env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|secs| secs.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);
        let font_path = env::var("FONT_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.font_path);
        let default_model = env::var("DEFAULT_MODEL").unwrap_or(defaults.default_model);
        let json_logs = env::var("LOG_FORMAT").map_or(false, |val| val == "json");

        Config {
            host,
            port,
            hf_token,
            output_dir,
            inference_base_url,
            request_timeout,
            font_path,
            default_model,
            json_logs,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.hf_token = Some(token.into());
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_inference_base_url(mut self, url: impl Into<String>) -> Self {
        self.inference_base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_path = path.into();
        self
    }

    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    pub fn has_token(&self) -> bool {
        self.hf_token.is_some()
    }

    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(GenError::Config("PORT must be non-zero".into()));
        }
        if self.request_timeout.is_zero() {
            return Err(GenError::Config(
                "REQUEST_TIMEOUT_SECS must be greater than zero".into(),
            ));
        }
        if self.inference_base_url.trim().is_empty() {
            return Err(GenError::Config("INFERENCE_BASE_URL is empty".into()));
        }
        Ok(())
    }
}
