use anyhow::Result;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::config::ExportConfig;

/// Writes the document text, byte for byte, to `<dir>/<filename>`.
pub struct Exporter {
    filename: String,
}

impl Exporter {
    pub fn new(config: &ExportConfig) -> Self {
        Self {
            filename: config.filename.clone(),
        }
    }

    pub fn target_in(&self, dir: &Path) -> PathBuf {
        dir.join(&self.filename)
    }

    pub async fn export(&self, dir: &Path, text: &str) -> Result<PathBuf> {
        if !dir.exists() {
            match fs::create_dir_all(dir).await {
                Ok(_) => {
                    log::info!("Created directory: {}", dir.display());
                }
                Err(e) => {
                    return Err(anyhow::anyhow!(
                        "Failed to create export directory: {} - {}",
                        dir.display(),
                        e
                    ));
                }
            }
        }

        let path = self.target_in(dir);
        if path.exists() {
            match fs::metadata(&path).await {
                Ok(metadata) => {
                    if metadata.permissions().readonly() {
                        return Err(anyhow::anyhow!(
                            "Export target is read-only: {}",
                            path.display()
                        ));
                    }
                }
                Err(e) => {
                    log::warn!("Failed to check target file metadata: {}", e);
                }
            }
        }

        match fs::write(&path, text.as_bytes()).await {
            Ok(_) => {
                log::info!("Exported {} bytes to: {}", text.len(), path.display());
                Ok(path)
            }
            Err(e) => {
                let error_msg = match e.kind() {
                    std::io::ErrorKind::PermissionDenied => {
                        format!("No permission to write: {}", path.display())
                    }
                    std::io::ErrorKind::WriteZero => {
                        format!("Disk may be full: {}", path.display())
                    }
                    _ => {
                        format!("Failed to write {}: {}", path.display(), e)
                    }
                };
                Err(anyhow::anyhow!(error_msg))
            }
        }
    }
}
