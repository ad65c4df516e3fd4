use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::Deserialize;
use std::{fs, path::Path, path::PathBuf, time::Duration};

const APP_DIR: &str = "multipick";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PickerConfig {
    #[serde(default)]
    pub extensions: Option<String>,
    #[serde(default)]
    pub start_dir: Option<PathBuf>,
    #[serde(default = "default_notice_ms")]
    pub notice_ms: u64,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            extensions: None,
            start_dir: None,
            notice_ms: default_notice_ms(),
            log_file: None,
        }
    }
}

impl PickerConfig {
    /// Reads `config.json` from the user config dir. A missing file means
    /// defaults; the file is never written.
    pub fn load() -> Result<Self> {
        let path = base_config_dir()?.join("config.json");
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parse config {}", path.display()))
    }

    pub fn notice_duration(&self) -> Duration {
        Duration::from_millis(self.notice_ms)
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.log_file {
            return Ok(path.clone());
        }
        Ok(base_data_dir()?.join("multipick.log"))
    }
}

fn default_notice_ms() -> u64 {
    2000
}

fn base_config_dir() -> Result<PathBuf> {
    let base = BaseDirs::new().context("resolve home dir")?;
    Ok(base.config_dir().join(APP_DIR))
}

fn base_data_dir() -> Result<PathBuf> {
    let base = BaseDirs::new().context("resolve home dir")?;
    Ok(base.data_local_dir().join(APP_DIR))
}
