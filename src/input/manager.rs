//! Input manager: loads resume files from disk and stages them for analysis

use crate::config::InputConfig;
use crate::error::{Result, ResumeScannerError};
use crate::input::file_detector::FileType;
use log::{debug, info};
use std::path::{Path, PathBuf};
use tokio::fs;

/// A resume file read into memory, ready for text extraction.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub file_name: String,
    pub source_path: PathBuf,
    pub staged_path: Option<PathBuf>,
    pub file_type: FileType,
    pub bytes: Vec<u8>,
}

pub struct InputManager {
    uploads_dir: Option<PathBuf>,
    max_file_bytes: Option<u64>,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            uploads_dir: None,
            max_file_bytes: None,
        }
    }

    pub fn from_config(config: &InputConfig) -> Self {
        let manager = Self::new().with_max_file_bytes(config.max_file_bytes);
        if config.stage_uploads {
            manager.with_staging(config.uploads_dir.clone())
        } else {
            manager
        }
    }

    /// Copy every loaded file into `uploads_dir` before it is analysed.
    pub fn with_staging(mut self, uploads_dir: impl Into<PathBuf>) -> Self {
        self.uploads_dir = Some(uploads_dir.into());
        self
    }

    pub fn without_staging(mut self) -> Self {
        self.uploads_dir = None;
        self
    }

    pub fn with_max_file_bytes(mut self, limit: Option<u64>) -> Self {
        self.max_file_bytes = limit;
        self
    }

    pub async fn load(&self, path: &Path) -> Result<LoadedDocument> {
        if !path.exists() {
            return Err(ResumeScannerError::FileNotFound(path.display().to_string()));
        }

        let metadata = fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(ResumeScannerError::InvalidInput(format!(
                "Not a regular file: {}",
                path.display()
            )));
        }

        if let Some(limit) = self.max_file_bytes {
            if metadata.len() > limit {
                return Err(ResumeScannerError::InputTooLarge {
                    size: metadata.len(),
                    limit,
                });
            }
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| {
                ResumeScannerError::InvalidInput(format!("Path has no file name: {}", path.display()))
            })?;

        let file_type = FileType::from_path(path);
        info!("Reading {} file: {}", file_type, path.display());
        let bytes = fs::read(path).await?;

        let staged_path = match &self.uploads_dir {
            Some(dir) => Some(self.stage(path, &file_name, &bytes, dir).await?),
            None => None,
        };

        Ok(LoadedDocument {
            file_name,
            source_path: path.to_path_buf(),
            staged_path,
            file_type,
            bytes,
        })
    }

    async fn stage(&self, source: &Path, file_name: &str, bytes: &[u8], dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir).await?;
        let target = dir.join(file_name);

        // Re-analysing a file that already lives in the uploads directory
        if let (Ok(src), Ok(dst)) = (fs::canonicalize(source).await, fs::canonicalize(&target).await) {
            if src == dst {
                debug!("{} is already staged", target.display());
                return Ok(target);
            }
        }

        fs::write(&target, bytes).await?;
        info!("Staged upload at {}", target.display());
        Ok(target)
    }
}
