use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_extension() -> String {
    "dict".to_string()
}

fn default_main_prefix() -> String {
    "main".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DictionaryConfig {
    /// When false no main dictionary is loaded at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// User-installed overrides, defaults to `<data_dir>/custom`
    pub custom_dir: Option<PathBuf>,
    /// Packaged dictionaries, one subdirectory per locale; defaults to `<data_dir>/dicts`
    pub assets_dir: Option<PathBuf>,
    /// Application package holding embedded fallback dictionaries
    pub package_path: Option<PathBuf>,
    /// JSON manifest describing the regions inside `package_path`
    pub package_manifest: Option<PathBuf>,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default = "default_main_prefix")]
    pub main_prefix: String,
}

impl DictionaryConfig {
    pub fn custom_dir(&self) -> PathBuf {
        self.custom_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("custom"))
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.assets_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("dicts"))
    }

    /// File name of a main dictionary for the given locale tag, e.g. `main_en_US.dict`
    pub fn main_file_name(&self, locale_tag: &str) -> String {
        format!("{}_{}.{}", self.main_prefix, locale_tag, self.extension)
    }
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            data_dir: default_data_dir(),
            custom_dir: None,
            assets_dir: None,
            package_path: None,
            package_manifest: None,
            extension: default_extension(),
            main_prefix: default_main_prefix(),
        }
    }
}
