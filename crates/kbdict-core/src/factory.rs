use kbdict_config::dictionary::DictionaryConfig;

use crate::binary::{BinaryDictionaryOpener, DictionaryOpener, OpenOutcome};
use crate::collection::DictionaryCollection;
use crate::dictionary::{Dictionary, DictionaryType};
use crate::locale::Locale;
use crate::quarantine::QuarantineManager;
use crate::resolver::{DictionarySource, FsSourceResolver, ResolvedSources, SourceResolver};

/// Builds main dictionary collections.
///
/// Priority is custom override, then packaged assets, then the single embedded
/// fallback. Every path ends in a collection, possibly empty; I/O and format
/// failures only ever shrink it.
pub struct DictionaryFactory {
    resolver: Box<dyn SourceResolver>,
    opener: Box<dyn DictionaryOpener>,
    quarantine: QuarantineManager,
    enabled: bool,
}

impl DictionaryFactory {
    pub fn new(
        resolver: impl SourceResolver + 'static,
        opener: impl DictionaryOpener + 'static,
    ) -> Self {
        Self {
            resolver: Box::new(resolver),
            opener: Box::new(opener),
            quarantine: QuarantineManager::new(),
            enabled: true,
        }
    }

    /// Filesystem resolver and binary reader configured from `config`
    pub fn from_config(config: &DictionaryConfig) -> Self {
        Self::new(FsSourceResolver::new(config.clone()), BinaryDictionaryOpener)
            .enabled(config.enabled)
    }

    /// A disabled factory hands out empty collections without touching storage
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn create_main_dictionary(&self, locale: Option<&Locale>) -> DictionaryCollection {
        let kind = DictionaryType::Main;

        if !self.enabled {
            tracing::info!("main dictionary disabled");
            return DictionaryCollection::empty(kind, locale.cloned());
        }

        let Some(locale) = locale else {
            tracing::error!("No locale defined for dictionary");
            let members = self.best_effort_embedded();
            return DictionaryCollection::new(kind, None, members);
        };

        let assets = match self.resolver.resolve(locale) {
            ResolvedSources::CustomOverride(address) => {
                let source = DictionarySource::Custom(address);
                if let Some(custom) = self.admit(&source, Some(locale)) {
                    tracing::info!("using custom dictionary for {locale}");
                    return DictionaryCollection::new(kind, Some(locale.clone()), vec![custom]);
                }
                self.resolver.asset_sources(locale)
            }
            ResolvedSources::AssetSet(assets) => assets,
        };

        let mut members: Vec<Box<dyn Dictionary>> = assets
            .into_iter()
            .filter_map(|address| self.admit(&DictionarySource::Asset(address), Some(locale)))
            .collect();

        if members.is_empty() {
            members = self.embedded_member(locale).into_iter().collect();
        }

        tracing::info!("main dictionary for {locale}: {} member(s)", members.len());
        DictionaryCollection::new(kind, Some(locale.clone()), members)
    }

    fn embedded_member(&self, locale: &Locale) -> Option<Box<dyn Dictionary>> {
        let Some(address) = self.resolver.embedded_fallback(Some(locale)) else {
            tracing::debug!("no embedded dictionary bundled for {locale}");
            return None;
        };
        self.admit(&DictionarySource::Embedded(address), Some(locale))
    }

    /// Without a locale the bundled dictionary is kept even when invalid
    fn best_effort_embedded(&self) -> Option<Box<dyn Dictionary>> {
        let Some(address) = self.resolver.embedded_fallback(None) else {
            tracing::debug!("no locale-neutral embedded dictionary bundled");
            return None;
        };

        match self.opener.open(&address, None, DictionaryType::Main) {
            OpenOutcome::Valid(dictionary) => Some(dictionary),
            OpenOutcome::Invalid(dictionary, err) => {
                tracing::warn!(
                    "bundled dictionary in {} is corrupt: {err}",
                    address.path().display()
                );
                Some(dictionary)
            }
            OpenOutcome::Unavailable(e) => {
                tracing::warn!(
                    "could not open bundled dictionary {}: {e}",
                    address.path().display()
                );
                None
            }
        }
    }

    /// Open one source and apply its admission policy
    fn admit(
        &self,
        source: &DictionarySource,
        locale: Option<&Locale>,
    ) -> Option<Box<dyn Dictionary>> {
        let address = source.address();

        match self.opener.open(address, locale, DictionaryType::Main) {
            OpenOutcome::Valid(dictionary) => {
                tracing::debug!(
                    "loaded {} dictionary {}",
                    source.kind(),
                    address.path().display()
                );
                Some(dictionary)
            }
            OpenOutcome::Invalid(mut dictionary, err) => match source {
                DictionarySource::Custom(_) => {
                    tracing::warn!(
                        "custom dictionary {} is invalid ({err}), keeping it",
                        address.path().display()
                    );
                    Some(dictionary)
                }
                DictionarySource::Asset(_) => {
                    tracing::warn!("dictionary {} is corrupt: {err}", address.path().display());
                    dictionary.close();
                    self.quarantine.quarantine(address);
                    None
                }
                DictionarySource::Embedded(_) => {
                    tracing::warn!(
                        "bundled dictionary in {} is corrupt: {err}",
                        address.path().display()
                    );
                    dictionary.close();
                    None
                }
            },
            OpenOutcome::Unavailable(e) => {
                tracing::warn!(
                    "could not open {} dictionary {}: {e}",
                    source.kind(),
                    address.path().display()
                );
                None
            }
        }
    }
}
