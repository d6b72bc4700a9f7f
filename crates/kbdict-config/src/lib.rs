use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use self::dictionary::DictionaryConfig;

pub mod dictionary;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dictionary: DictionaryConfig,
}

impl Config {
    /// Defaults plus environment overrides (`.env` is honored when present)
    pub fn new() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    /// Load a JSON config file, then apply environment overrides
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        tracing::info!("Loading config from {}", path.display());
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut config: Config = serde_json::from_reader(reader)?;
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!("no .env loaded: {e}");
        }

        if let Ok(dir) = env::var("KBDICT_DATA_DIR") {
            self.dictionary.data_dir = PathBuf::from(dir);
        }

        if let Ok(path) = env::var("KBDICT_PACKAGE_PATH") {
            self.dictionary.package_path = Some(PathBuf::from(path));
        }

        if let Ok(path) = env::var("KBDICT_PACKAGE_MANIFEST") {
            self.dictionary.package_manifest = Some(PathBuf::from(path));
        }
    }
}
