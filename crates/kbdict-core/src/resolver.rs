use std::fs;
use std::path::{Path, PathBuf};

use kbdict_config::dictionary::DictionaryConfig;

use crate::address::AssetFileAddress;
use crate::locale::Locale;
use crate::package::ResourcePackage;

/// Candidate sources for a locale, before any of them is opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedSources {
    /// User-installed dictionary; nothing else is consulted when present
    CustomOverride(AssetFileAddress),
    /// Packaged dictionaries in resolution order, possibly none
    AssetSet(Vec<AssetFileAddress>),
}

/// A source tagged with how the factory must treat it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionarySource {
    Custom(AssetFileAddress),
    Asset(AssetFileAddress),
    Embedded(AssetFileAddress),
}

impl DictionarySource {
    pub fn address(&self) -> &AssetFileAddress {
        match self {
            DictionarySource::Custom(a)
            | DictionarySource::Asset(a)
            | DictionarySource::Embedded(a) => a,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DictionarySource::Custom(_) => "custom",
            DictionarySource::Asset(_) => "asset",
            DictionarySource::Embedded(_) => "embedded",
        }
    }
}

/// Read-only enumeration of dictionary storage. Implementations must not
/// open dictionaries or touch quarantine state.
pub trait SourceResolver: Send + Sync {
    fn custom_override(&self, locale: &Locale) -> Option<AssetFileAddress>;

    fn asset_sources(&self, locale: &Locale) -> Vec<AssetFileAddress>;

    /// The override when one exists, otherwise the packaged set
    fn resolve(&self, locale: &Locale) -> ResolvedSources {
        match self.custom_override(locale) {
            Some(custom) => ResolvedSources::CustomOverride(custom),
            None => ResolvedSources::AssetSet(self.asset_sources(locale)),
        }
    }

    /// The single dictionary bundled in the application package, if any
    fn embedded_fallback(&self, locale: Option<&Locale>) -> Option<AssetFileAddress>;
}

/// Resolves sources from the directories and package named in the config
#[derive(Debug, Clone)]
pub struct FsSourceResolver {
    config: DictionaryConfig,
    package: Option<ResourcePackage>,
}

impl FsSourceResolver {
    /// Loads the resource package if one is configured; a broken package is
    /// logged and treated as absent
    pub fn new(config: DictionaryConfig) -> Self {
        let package = match (&config.package_path, &config.package_manifest) {
            (Some(pkg), Some(manifest)) => match ResourcePackage::load(pkg, manifest) {
                Ok(package) => Some(package),
                Err(e) => {
                    tracing::error!("could not load resource package {}: {e}", pkg.display());
                    None
                }
            },
            (Some(pkg), None) => {
                tracing::warn!("package {} configured without a manifest", pkg.display());
                None
            }
            _ => None,
        };

        Self::with_package(config, package)
    }

    pub fn with_package(config: DictionaryConfig, package: Option<ResourcePackage>) -> Self {
        Self { config, package }
    }

    fn custom_path(&self, locale: &Locale) -> PathBuf {
        self.config
            .custom_dir()
            .join(self.config.main_file_name(&locale.to_string()))
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext == extension)
}

impl SourceResolver for FsSourceResolver {
    fn custom_override(&self, locale: &Locale) -> Option<AssetFileAddress> {
        AssetFileAddress::from_file(self.custom_path(locale))
    }

    fn asset_sources(&self, locale: &Locale) -> Vec<AssetFileAddress> {
        let dir = self.config.assets_dir().join(locale.to_string());
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!("no asset directory {}: {e}", dir.display());
                return Vec::new();
            }
        };

        let mut paths: Vec<_> = entries
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry.path()),
                Err(e) => {
                    tracing::warn!("skipping unreadable entry in {}: {e}", dir.display());
                    None
                }
            })
            .filter(|path| has_extension(path, &self.config.extension))
            .collect();
        paths.sort();

        paths.into_iter().filter_map(AssetFileAddress::from_file).collect()
    }

    fn embedded_fallback(&self, locale: Option<&Locale>) -> Option<AssetFileAddress> {
        self.package
            .as_ref()?
            .main_dictionary(&self.config.main_prefix, locale)
    }
}
