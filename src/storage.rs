use crate::error::{GenError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, RgbImage};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct StoredImage {
    pub filename: String,
    pub path: PathBuf,
    pub png_bytes: Vec<u8>,
}

impl StoredImage {
    pub fn base64(&self) -> String {
        STANDARD.encode(&self.png_bytes)
    }
}

pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

/// `ai_generated_{unix seconds}_{8 hex chars}.png`
pub fn generate_filename() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "ai_generated_{}_{}.png",
        chrono::Utc::now().timestamp(),
        &suffix[..8]
    )
}

/// Generated images on disk, one flat directory.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    /// Opens the store, creating the directory when missing.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn save(&self, image: &RgbImage) -> Result<StoredImage> {
        let png_bytes = encode_png(image)?;
        let filename = generate_filename();
        let path = self.root.join(&filename);
        fs::write(&path, &png_bytes)?;
        log::info!("💾 Image saved to: {}", path.display());

        Ok(StoredImage {
            filename,
            path,
            png_bytes,
        })
    }

    fn resolve(&self, filename: &str) -> Result<PathBuf> {
        let plain = !filename.is_empty()
            && !filename.contains(['/', '\\'])
            && filename != "."
            && filename != "..";
        if !plain {
            return Err(GenError::InvalidFilename(filename.to_string()));
        }
        Ok(self.root.join(filename))
    }

    pub fn open(&self, filename: &str) -> Result<Vec<u8>> {
        let path = self.resolve(filename)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(GenError::NotFound(filename.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
