use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::address::AssetFileAddress;
use crate::locale::Locale;

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Package is not a file: {0}")]
    NotAFile(PathBuf),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceEntry {
    pub name: String,
    pub offset: u64,
    pub length: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageManifest {
    #[serde(default)]
    pub resources: Vec<ResourceEntry>,
}

/// Named byte regions inside the application package
#[derive(Debug, Clone)]
pub struct ResourcePackage {
    path: PathBuf,
    entries: HashMap<String, ResourceEntry>,
}

impl ResourcePackage {
    pub fn load(package_path: &Path, manifest_path: &Path) -> Result<Self, ManifestError> {
        let reader = BufReader::new(File::open(manifest_path)?);
        let manifest: PackageManifest = serde_json::from_reader(reader)?;
        Self::from_manifest(package_path, manifest)
    }

    pub fn from_manifest(
        package_path: &Path,
        manifest: PackageManifest,
    ) -> Result<Self, ManifestError> {
        if !package_path.is_file() {
            return Err(ManifestError::NotAFile(package_path.to_path_buf()));
        }

        let entries = manifest
            .resources
            .into_iter()
            .map(|entry| (entry.name.to_ascii_lowercase(), entry))
            .collect();

        Ok(Self {
            path: package_path.to_path_buf(),
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn locate(&self, name: &str) -> Option<AssetFileAddress> {
        let entry = self.entries.get(&name.to_ascii_lowercase())?;
        let address = AssetFileAddress::from_region(&self.path, entry.offset, entry.length);
        if address.is_none() {
            tracing::error!(
                "resource {name} ({}+{}) does not fit in {}",
                entry.offset,
                entry.length,
                self.path.display()
            );
        }
        address
    }

    /// Main dictionary region for a locale, trying `main_en_us` then `main_en`.
    /// Without a locale only the bare `main` resource is considered.
    pub fn main_dictionary(
        &self,
        prefix: &str,
        locale: Option<&Locale>,
    ) -> Option<AssetFileAddress> {
        let names: Vec<String> = match locale {
            Some(locale) => locale
                .resource_suffixes()
                .into_iter()
                .map(|suffix| format!("{prefix}_{suffix}"))
                .collect(),
            None => vec![prefix.to_string()],
        };

        names.iter().find_map(|name| self.locate(name))
    }
}
