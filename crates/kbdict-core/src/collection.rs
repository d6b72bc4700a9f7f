use std::collections::HashSet;
use std::fmt;

use crate::dictionary::{Dictionary, DictionaryType, SearchOptions, Suggestion};
use crate::locale::Locale;

/// Several dictionaries presented as one.
///
/// Member order is significant: when two members suggest the same word the
/// earlier member's entry is kept. A collection with no members is a normal,
/// usable value whose lookups all come back empty.
pub struct DictionaryCollection {
    dictionary_type: DictionaryType,
    locale: Option<Locale>,
    members: Vec<Box<dyn Dictionary>>,
    closed: bool,
}

impl DictionaryCollection {
    pub fn new(
        dictionary_type: DictionaryType,
        locale: Option<Locale>,
        members: impl IntoIterator<Item = Box<dyn Dictionary>>,
    ) -> Self {
        Self {
            dictionary_type,
            locale,
            members: members.into_iter().collect(),
            closed: false,
        }
    }

    pub fn empty(dictionary_type: DictionaryType, locale: Option<Locale>) -> Self {
        Self::new(dictionary_type, locale, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn members(&self) -> impl Iterator<Item = &dyn Dictionary> {
        self.members.iter().map(|d| d.as_ref())
    }

    /// Appends a member. Ignored once the collection is closed.
    pub fn add_dictionary(&mut self, mut dictionary: Box<dyn Dictionary>) {
        if self.closed {
            tracing::warn!("add_dictionary on closed {} collection", self.dictionary_type);
            dictionary.close();
            return;
        }
        self.members.push(dictionary);
    }

    /// Detaches the member at `index`, handing ownership back to the caller
    pub fn remove_dictionary(&mut self, index: usize) -> Option<Box<dyn Dictionary>> {
        if index < self.members.len() {
            Some(self.members.remove(index))
        } else {
            None
        }
    }

    /// Highest frequency among members that know `word`
    pub fn max_frequency(&self, word: &str) -> Option<u32> {
        self.members.iter().filter_map(|d| d.frequency(word)).max()
    }
}

impl Dictionary for DictionaryCollection {
    fn dictionary_type(&self) -> DictionaryType {
        self.dictionary_type
    }

    fn locale(&self) -> Option<&Locale> {
        self.locale.as_ref()
    }

    fn is_valid(&self) -> bool {
        self.members.iter().any(|d| d.is_valid())
    }

    fn is_in_dictionary(&self, word: &str) -> bool {
        self.members.iter().any(|d| d.is_in_dictionary(word))
    }

    fn frequency(&self, word: &str) -> Option<u32> {
        self.max_frequency(word)
    }

    fn suggestions(&self, query: &str, options: &SearchOptions) -> Vec<Suggestion> {
        // Members must not truncate, or a word an earlier member cut could
        // resurface from a later one.
        let unbounded = SearchOptions {
            max_results: usize::MAX,
            ..options.clone()
        };

        let mut seen = HashSet::new();
        let mut merged: Vec<Suggestion> = self
            .members
            .iter()
            .flat_map(|d| d.suggestions(query, &unbounded))
            .filter(|s| seen.insert(s.word.clone()))
            .collect();

        // Stable, so equal frequencies keep member order.
        merged.sort_by(|a, b| b.frequency.cmp(&a.frequency));
        merged.truncate(options.max_results);
        merged
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        for member in self.members.iter_mut() {
            member.close();
        }
        self.members.clear();
        tracing::debug!(
            "closed {} collection for {}",
            self.dictionary_type,
            self.locale.as_ref().map(|l| l.to_string()).unwrap_or_else(|| "<none>".into())
        );
    }
}

impl Drop for DictionaryCollection {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for DictionaryCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DictionaryCollection")
            .field("dictionary_type", &self.dictionary_type)
            .field("locale", &self.locale)
            .field("members", &self.members.len())
            .field("closed", &self.closed)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// In-memory member that counts how often it is closed
    pub(crate) struct FakeDictionary {
        pub words: BTreeMap<String, u32>,
        pub valid: bool,
        pub closes: Arc<AtomicUsize>,
        closed: bool,
    }

    impl FakeDictionary {
        pub(crate) fn new(words: &[(&str, u32)]) -> Self {
            Self {
                words: words.iter().map(|(w, f)| (w.to_string(), *f)).collect(),
                valid: true,
                closes: Arc::new(AtomicUsize::new(0)),
                closed: false,
            }
        }
    }

    impl Dictionary for FakeDictionary {
        fn dictionary_type(&self) -> DictionaryType {
            DictionaryType::Main
        }

        fn locale(&self) -> Option<&Locale> {
            None
        }

        fn is_valid(&self) -> bool {
            self.valid
        }

        fn is_in_dictionary(&self, word: &str) -> bool {
            self.words.contains_key(word)
        }

        fn frequency(&self, word: &str) -> Option<u32> {
            self.words.get(word).copied()
        }

        fn suggestions(&self, query: &str, options: &SearchOptions) -> Vec<Suggestion> {
            self.words
                .iter()
                .filter(|(w, _)| options.match_type.matches(w, query))
                .map(|(w, f)| Suggestion {
                    word: w.clone(),
                    frequency: *f,
                    source: DictionaryType::Main,
                })
                .collect()
        }

        fn close(&mut self) {
            if !self.closed {
                self.closed = true;
                self.closes.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn boxed(words: &[(&str, u32)]) -> Box<dyn Dictionary> {
        Box::new(FakeDictionary::new(words))
    }

    #[test]
    fn empty_collection_is_neutral() {
        let mut empty = DictionaryCollection::empty(DictionaryType::Main, None);
        assert!(empty.is_empty());
        assert!(!empty.is_valid());
        assert!(!empty.is_in_dictionary("anything"));
        assert_eq!(empty.frequency("anything"), None);
        assert!(empty.suggestions("a", &SearchOptions::default()).is_empty());
        empty.close();
    }

    #[test]
    fn first_member_wins_duplicate_words() {
        let collection = DictionaryCollection::new(
            DictionaryType::Main,
            None,
            vec![
                boxed(&[("hello", 100), ("help", 80)]),
                boxed(&[("hello", 150), ("helmet", 80)]),
            ],
        );

        let found = collection.suggestions("hel", &SearchOptions::default());
        let words: Vec<_> = found.iter().map(|s| (s.word.as_str(), s.frequency)).collect();
        assert_eq!(words, vec![("hello", 100), ("help", 80), ("helmet", 80)]);
        assert_eq!(collection.frequency("hello"), Some(150));
    }

    #[test]
    fn suggestions_respect_limit() {
        let collection = DictionaryCollection::new(
            DictionaryType::Main,
            None,
            vec![boxed(&[("ab", 1), ("ac", 2)]), boxed(&[("ad", 3)])],
        );
        let options = SearchOptions {
            max_results: 2,
            ..Default::default()
        };
        let words: Vec<_> = collection
            .suggestions("a", &options)
            .into_iter()
            .map(|s| s.word)
            .collect();
        assert_eq!(words, vec!["ad", "ac"]);
    }

    #[test]
    fn earlier_member_entry_wins_past_its_own_limit() {
        use crate::address::AssetFileAddress;
        use crate::binary::{BinaryDictionary, DictionaryWriter};

        let dir = tempfile::tempdir().unwrap();
        let open = |name: &str, writer: DictionaryWriter| -> Box<dyn Dictionary> {
            let path = dir.path().join(name);
            std::fs::write(&path, writer.to_bytes().unwrap()).unwrap();
            let address = AssetFileAddress::from_file(path).unwrap();
            Box::new(BinaryDictionary::open(&address, None, DictionaryType::Main).unwrap())
        };

        let first = open(
            "first.dict",
            DictionaryWriter::new().word("ha", 9).word("hb", 8).word("hello", 1),
        );
        let second = open("second.dict", DictionaryWriter::new().word("hello", 150));
        let collection = DictionaryCollection::new(DictionaryType::Main, None, vec![first, second]);

        let options = SearchOptions {
            max_results: 2,
            ..Default::default()
        };
        let found: Vec<_> = collection
            .suggestions("h", &options)
            .into_iter()
            .map(|s| (s.word, s.frequency))
            .collect();
        assert_eq!(found, vec![("ha".to_string(), 9), ("hb".to_string(), 8)]);
    }

    #[test]
    fn close_releases_each_member_once() {
        let first = FakeDictionary::new(&[("a", 1)]);
        let second = FakeDictionary::new(&[("b", 1)]);
        let (c1, c2) = (first.closes.clone(), second.closes.clone());

        let mut collection = DictionaryCollection::new(
            DictionaryType::Main,
            None,
            vec![Box::new(first) as Box<dyn Dictionary>, Box::new(second)],
        );
        collection.close();
        collection.close();
        drop(collection);

        assert_eq!(c1.load(Ordering::SeqCst), 1);
        assert_eq!(c2.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn closed_collection_behaves_empty() {
        let mut collection =
            DictionaryCollection::new(DictionaryType::Main, None, vec![boxed(&[("a", 1)])]);
        collection.close();
        assert!(collection.is_empty());
        assert!(!collection.is_in_dictionary("a"));

        let late = FakeDictionary::new(&[("b", 1)]);
        let closes = late.closes.clone();
        collection.add_dictionary(Box::new(late));
        assert!(collection.is_empty());
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn remove_detaches_member() {
        let mut collection = DictionaryCollection::new(
            DictionaryType::Main,
            None,
            vec![boxed(&[("a", 1)]), boxed(&[("b", 1)])],
        );
        let removed = collection.remove_dictionary(0).unwrap();
        assert!(removed.is_in_dictionary("a"));
        assert_eq!(collection.len(), 1);
        assert!(collection.remove_dictionary(5).is_none());
    }
}
