use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs::try_exists;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub editor: EditorConfig,
    pub share: ShareConfig,
    pub export: ExportConfig,
    pub qr: QrConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    pub tab_width: usize,
    pub undo_quiet_ms: u64,
    pub save_quiet_ms: u64,
    pub history_limit: usize,
}

impl EditorConfig {
    pub fn undo_quiet_period(&self) -> Duration {
        Duration::from_millis(self.undo_quiet_ms)
    }

    pub fn save_quiet_period(&self) -> Duration {
        Duration::from_millis(self.save_quiet_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Address the token is appended to as a `#fragment`.
    pub base_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub filename: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrConfig {
    pub cell_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            editor: EditorConfig {
                tab_width: txtcore::splice::TAB_WIDTH,
                undo_quiet_ms: 300,
                save_quiet_ms: 300,
                history_limit: txtcore::history::DEFAULT_HISTORY_LIMIT,
            },
            share: ShareConfig {
                base_address: String::from("http://localhost:8080/"),
            },
            export: ExportConfig {
                filename: String::from("TxtUrl.md"),
            },
            qr: QrConfig {
                cell_size: 8,
            },
        }
    }
}

impl Config {
    pub async fn load() -> Result<Self> {
        if let Some(config_path) = Self::config_path() {
            if try_exists(&config_path).await? {
                match tokio::fs::read_to_string(&config_path).await {
                    Ok(content) => {
                        if content.trim().is_empty() {
                            log::warn!("Config file is empty, creating new one");
                            let default_config = Self::default();
                            let _ = default_config.save().await;
                            return Ok(default_config);
                        }

                        match serde_json::from_str::<Self>(&content) {
                            Ok(mut config) => {
                                config.validate()?;
                                log::info!(
                                    "Successfully loaded config from: {}",
                                    config_path.display()
                                );
                                return Ok(config);
                            }
                            Err(json_err) => {
                                log::error!("Failed to parse config file: {}", json_err);

                                // Keep the broken file around for the user to inspect
                                let backup_path = config_path.with_extension("bak");
                                if let Err(e) = tokio::fs::copy(&config_path, &backup_path).await {
                                    log::warn!("Failed to backup broken config: {}", e);
                                } else {
                                    log::info!(
                                        "Backed up broken config to: {}",
                                        backup_path.display()
                                    );
                                }

                                let default_config = Self::default();
                                let _ = default_config.save().await;
                                return Ok(default_config);
                            }
                        }
                    }
                    Err(io_err) => {
                        log::error!("Failed to read config file: {}", io_err);
                    }
                }
            } else {
                log::info!("Config file does not exist, creating default");
            }
        }

        let default_config = Self::default();
        let _ = default_config.save().await;
        Ok(default_config)
    }

    pub async fn save(&self) -> Result<()> {
        if let Some(config_path) = Self::config_path() {
            let mut config_to_save = self.clone();
            config_to_save.validate()?;

            if let Some(parent) = config_path.parent() {
                if let Err(e) = tokio::fs::create_dir_all(parent).await {
                    return Err(anyhow::anyhow!(
                        "Failed to create config directory: {} - {}",
                        parent.display(),
                        e
                    ));
                }
            }

            let content = serde_json::to_string_pretty(&config_to_save)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            if let Err(e) = tokio::fs::write(&config_path, content).await {
                return Err(anyhow::anyhow!(
                    "Failed to write config file: {} - {}",
                    config_path.display(),
                    e
                ));
            }
            log::info!("Successfully saved config to: {}", config_path.display());
        }
        Ok(())
    }

    /// Validate configuration values and fix invalid ones
    pub fn validate(&mut self) -> Result<()> {
        let defaults = Self::default();
        let mut has_issues = false;

        if self.editor.tab_width == 0 || self.editor.tab_width > 16 {
            log::warn!("Invalid tab width: {}, using default", self.editor.tab_width);
            self.editor.tab_width = defaults.editor.tab_width;
            has_issues = true;
        }

        if self.editor.undo_quiet_ms > 10_000 {
            log::warn!("Undo quiet period too long: {}ms, using default", self.editor.undo_quiet_ms);
            self.editor.undo_quiet_ms = defaults.editor.undo_quiet_ms;
            has_issues = true;
        }

        if self.editor.save_quiet_ms > 10_000 {
            log::warn!("Save quiet period too long: {}ms, using default", self.editor.save_quiet_ms);
            self.editor.save_quiet_ms = defaults.editor.save_quiet_ms;
            has_issues = true;
        }

        if self.editor.history_limit < 2 {
            log::warn!("History limit must be at least 2, using default");
            self.editor.history_limit = defaults.editor.history_limit;
            has_issues = true;
        }

        if self.share.base_address.is_empty() || self.share.base_address.contains('#') {
            log::warn!(
                "Invalid base address: {:?}, using default",
                self.share.base_address
            );
            self.share.base_address = defaults.share.base_address;
            has_issues = true;
        }

        if self.export.filename.trim().is_empty()
            || self.export.filename.contains(|c: char| c == '/' || c == '\\')
        {
            log::warn!("Invalid export filename: {:?}, using default", self.export.filename);
            self.export.filename = defaults.export.filename;
            has_issues = true;
        }

        if self.qr.cell_size == 0 {
            log::warn!("QR cell size must be positive, using default");
            self.qr.cell_size = defaults.qr.cell_size;
            has_issues = true;
        }

        if has_issues {
            log::info!("Configuration validation completed with corrections");
        }

        Ok(())
    }

    fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("TXTURL_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }

        if let Ok(dir) = std::env::var("TXTURL_CONFIG_DIR") {
            return Some(PathBuf::from(dir).join("config.json"));
        }

        ProjectDirs::from("com", "txturl", "txturl")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }
}
