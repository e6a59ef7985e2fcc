use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// On-disk configuration for the `plm` binary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlmConfig {
    /// Root directory for list metadata and file-backed items.
    pub data_dir: PathBuf,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for PlmConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".plm"),
            log_level: "info".into(),
        }
    }
}

impl PlmConfig {
    /// Read the configuration at `path`; a missing file yields defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// JSON document holding list metadata records.
    pub fn metadata_path(&self) -> PathBuf {
        self.data_dir.join("lists.json")
    }

    /// Directory used by the file provider.
    pub fn items_dir(&self) -> PathBuf {
        self.data_dir.join("items")
    }
}
