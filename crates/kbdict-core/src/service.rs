use std::sync::Arc;

use kbdict_config::Config;
use tokio::sync::RwLock;

use crate::collection::DictionaryCollection;
use crate::dictionary::{Dictionary, DictionaryType};
use crate::factory::DictionaryFactory;
use crate::locale::Locale;

/// Build a main dictionary on the blocking pool.
///
/// Resolution blocks on storage, so it never runs on an async worker thread.
pub async fn load_main_dictionary(
    factory: Arc<DictionaryFactory>,
    locale: Option<Locale>,
) -> DictionaryCollection {
    let fallback_locale = locale.clone();
    let task = tokio::task::spawn_blocking(move || factory.create_main_dictionary(locale.as_ref()));

    match task.await {
        Ok(collection) => collection,
        Err(e) => {
            tracing::error!("dictionary loader task failed: {e}");
            DictionaryCollection::empty(DictionaryType::Main, fallback_locale)
        }
    }
}

/// Owns the main dictionary of the active locale between `init` and `teardown`
pub struct DictionaryService {
    factory: Arc<DictionaryFactory>,
    current: RwLock<Option<DictionaryCollection>>,
}

impl DictionaryService {
    pub fn init(factory: DictionaryFactory) -> Self {
        Self {
            factory: Arc::new(factory),
            current: RwLock::new(None),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::init(DictionaryFactory::from_config(&config.dictionary))
    }

    /// Load the dictionary for `locale` and make it current, closing the
    /// previous one. Returns the new member count.
    pub async fn switch_locale(&self, locale: Option<Locale>) -> usize {
        let collection = load_main_dictionary(Arc::clone(&self.factory), locale).await;
        let members = collection.len();

        let previous = self.current.write().await.replace(collection);
        if let Some(mut previous) = previous {
            previous.close();
        }
        members
    }

    /// Run `f` against the current collection, if one is loaded
    pub async fn with_current<R>(&self, f: impl FnOnce(&DictionaryCollection) -> R) -> Option<R> {
        let current = self.current.read().await;
        current.as_ref().map(f)
    }

    pub async fn teardown(&self) {
        if let Some(mut current) = self.current.write().await.take() {
            current.close();
            tracing::info!("dictionary service torn down");
        }
    }
}
