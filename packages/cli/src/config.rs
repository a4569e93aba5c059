use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tutorly_editor::EditorTimings;

pub const DEFAULT_CONFIG_NAME: &str = "tutorly.config.json";

/// Tutorly configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding one `<id>.json` per lesson
    #[serde(default = "default_store_dir")]
    pub store_dir: String,

    /// Where exports are written
    #[serde(default = "default_out_dir")]
    pub out_dir: String,

    /// Editor timing overrides
    #[serde(default)]
    pub editor: EditorTimings,
}

fn default_store_dir() -> String {
    "lessons".to_string()
}

fn default_out_dir() -> String {
    "export".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn get_store_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.store_dir)
    }

    pub fn get_out_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.out_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            out_dir: default_out_dir(),
            editor: EditorTimings::default(),
        }
    }
}
