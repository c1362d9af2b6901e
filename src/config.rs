use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Console tables and one `<router>.txt` per router
    Text,
    /// `tables.json` in the output directory
    Json,
    Both,
}

impl OutputFormat {
    pub fn wants_text(self) -> bool {
        matches!(self, OutputFormat::Text | OutputFormat::Both)
    }

    pub fn wants_json(self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Both)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub topology: PathBuf,
    /// Advertisement order, distance-vector only
    pub messages: PathBuf,
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    /// Log every engine step (tables after each advertisement, working tables)
    pub trace_steps: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            topology: PathBuf::from("topology.txt"),
            messages: PathBuf::from("messages.txt"),
            output_dir: PathBuf::from("output"),
            format: OutputFormat::Text,
            trace_steps: false,
        }
    }
}

impl RunConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: RunConfig = serde_json::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn json_path(&self) -> PathBuf {
        self.output_dir.join("tables.json")
    }
}
