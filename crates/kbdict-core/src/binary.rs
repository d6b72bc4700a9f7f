//! Read-only binary dictionary regions.
//!
//! Region layout (all integers big-endian):
//! ```text
//! [4 bytes]  magic 0x9BC13AFE
//! [2 bytes]  format version (2..=4)
//! [2 bytes]  flags
//! [4 bytes]  header size, at least 16 and within the region
//! [4 bytes]  entry count
//! ...        header padding up to header size
//! entries:   [1 byte frequency][1 byte length][length bytes UTF-8 word]
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use unicode_normalization::UnicodeNormalization;

use crate::address::AssetFileAddress;
use crate::dictionary::{Dictionary, DictionaryType, MatchType, SearchOptions, Suggestion};
use crate::error::{FormatError, LoadError};
use crate::locale::Locale;

pub const MAGIC: u32 = 0x9BC1_3AFE;
pub const FORMAT_VERSION: u16 = 2;
const SUPPORTED_VERSIONS: std::ops::RangeInclusive<u16> = 2..=4;
const HEADER_LEN: u32 = 16;

/// Result of opening one source: opened and valid, opened but corrupt, or not openable
pub enum OpenOutcome {
    Valid(Box<dyn Dictionary>),
    Invalid(Box<dyn Dictionary>, FormatError),
    Unavailable(LoadError),
}

/// Opens a dictionary region; the seam between resolution and the on-disk format
pub trait DictionaryOpener: Send + Sync {
    fn open(
        &self,
        address: &AssetFileAddress,
        locale: Option<&Locale>,
        dictionary_type: DictionaryType,
    ) -> OpenOutcome;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BinaryDictionaryOpener;

impl DictionaryOpener for BinaryDictionaryOpener {
    fn open(
        &self,
        address: &AssetFileAddress,
        locale: Option<&Locale>,
        dictionary_type: DictionaryType,
    ) -> OpenOutcome {
        match BinaryDictionary::open(address, locale.cloned(), dictionary_type) {
            Ok(dict) => match dict.validation_error() {
                None => OpenOutcome::Valid(Box::new(dict)),
                Some(err) => {
                    let err = err.clone();
                    OpenOutcome::Invalid(Box::new(dict), err)
                }
            },
            Err(e) => OpenOutcome::Unavailable(e),
        }
    }
}

#[derive(Debug)]
pub struct BinaryDictionary {
    address: AssetFileAddress,
    locale: Option<Locale>,
    dictionary_type: DictionaryType,
    validation: Result<(), FormatError>,
    words: BTreeMap<String, u32>,
    closed: bool,
}

impl BinaryDictionary {
    /// Read and validate the region. Corruption yields an invalid dictionary, not an error.
    pub fn open(
        address: &AssetFileAddress,
        locale: Option<Locale>,
        dictionary_type: DictionaryType,
    ) -> Result<Self, LoadError> {
        let bytes = read_region(address)?;

        let (validation, words) = match parse(&bytes) {
            Ok(words) => (Ok(()), words),
            Err(e) => (Err(e), BTreeMap::new()),
        };

        Ok(Self {
            address: address.clone(),
            locale,
            dictionary_type,
            validation,
            words,
            closed: false,
        })
    }

    pub fn validation_error(&self) -> Option<&FormatError> {
        self.validation.as_ref().err()
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }
}

impl Dictionary for BinaryDictionary {
    fn dictionary_type(&self) -> DictionaryType {
        self.dictionary_type
    }

    fn locale(&self) -> Option<&Locale> {
        self.locale.as_ref()
    }

    fn is_valid(&self) -> bool {
        self.validation.is_ok()
    }

    fn is_in_dictionary(&self, word: &str) -> bool {
        self.frequency(word).is_some()
    }

    fn frequency(&self, word: &str) -> Option<u32> {
        let word: String = word.nfc().collect();
        self.words.get(&word).copied()
    }

    fn suggestions(&self, query: &str, options: &SearchOptions) -> Vec<Suggestion> {
        let query: String = query.nfc().collect();

        let mut found: Vec<Suggestion> = self
            .words
            .range(query.clone()..)
            .take_while(|(word, _)| word.starts_with(&query))
            .filter(|(word, _)| options.match_type.matches(word, &query))
            .map(|(word, &frequency)| Suggestion {
                word: word.clone(),
                frequency,
                source: self.dictionary_type,
            })
            .collect();

        if options.match_type == MatchType::Prefix {
            found.sort_by(|a, b| b.frequency.cmp(&a.frequency));
        }
        found.truncate(options.max_results);
        found
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.words = BTreeMap::new();
        tracing::trace!("closed dictionary at {}", self.address.path().display());
    }
}

fn read_region(address: &AssetFileAddress) -> Result<Vec<u8>, LoadError> {
    let mut file = File::open(address.path()).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::FileNotFound(address.path().to_path_buf()),
        _ => LoadError::IoError(e),
    })?;

    let file_len = file.metadata()?.len();
    let region_end = address.offset().checked_add(address.length());
    if region_end.is_none_or(|end| end > file_len) {
        return Err(LoadError::InvalidRegion {
            offset: address.offset(),
            length: address.length(),
        });
    }

    let length = usize::try_from(address.length()).map_err(|_| LoadError::InvalidRegion {
        offset: address.offset(),
        length: address.length(),
    })?;

    file.seek(SeekFrom::Start(address.offset()))?;
    let mut bytes = vec![0u8; length];
    file.read_exact(&mut bytes)?;
    Ok(bytes)
}

fn parse(bytes: &[u8]) -> Result<BTreeMap<String, u32>, FormatError> {
    let length = bytes.len() as u64;
    let mut cursor = Cursor::new(bytes);
    let truncated = |_| FormatError::Truncated(length);

    let magic = cursor.read_u32::<BigEndian>().map_err(truncated)?;
    if magic != MAGIC {
        return Err(FormatError::BadMagic(magic));
    }

    let version = cursor.read_u16::<BigEndian>().map_err(truncated)?;
    let _flags = cursor.read_u16::<BigEndian>().map_err(truncated)?;
    let header_size = cursor.read_u32::<BigEndian>().map_err(truncated)?;
    let entry_count = cursor.read_u32::<BigEndian>().map_err(truncated)?;

    if !SUPPORTED_VERSIONS.contains(&version) {
        return Err(FormatError::UnsupportedVersion(version));
    }
    if header_size < HEADER_LEN || u64::from(header_size) > length {
        return Err(FormatError::HeaderSize {
            header_size,
            length,
        });
    }

    cursor.set_position(u64::from(header_size));
    let mut words = BTreeMap::new();

    for index in 0..entry_count {
        let overrun = |_| FormatError::EntryOverrun { index };
        let frequency = cursor.read_u8().map_err(overrun)?;
        let len = cursor.read_u8().map_err(overrun)?;

        let mut raw = vec![0u8; usize::from(len)];
        cursor.read_exact(&mut raw).map_err(overrun)?;
        let word = String::from_utf8(raw).map_err(|_| FormatError::InvalidWord { index })?;

        let word: String = word.nfc().collect();
        let slot = words.entry(word).or_insert(0);
        *slot = (*slot).max(u32::from(frequency));
    }

    Ok(words)
}

/// Builds dictionary regions in the layout `BinaryDictionary` reads
#[derive(Debug, Clone)]
pub struct DictionaryWriter {
    version: u16,
    entries: Vec<(String, u8)>,
}

impl Default for DictionaryWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DictionaryWriter {
    pub fn new() -> Self {
        Self {
            version: FORMAT_VERSION,
            entries: Vec::new(),
        }
    }

    pub fn version(mut self, version: u16) -> Self {
        self.version = version;
        self
    }

    /// Words longer than 255 bytes do not fit the entry layout and are dropped
    pub fn word(mut self, word: &str, frequency: u8) -> Self {
        if word.len() > usize::from(u8::MAX) {
            tracing::warn!("skipping {}-byte word, too long for entry", word.len());
            return self;
        }
        self.entries.push((word.to_string(), frequency));
        self
    }

    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let entry_count = u32::try_from(self.entries.len()).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, "too many entries for header")
        })?;

        let mut out = Vec::with_capacity(HEADER_LEN as usize + self.entries.len() * 8);
        out.write_u32::<BigEndian>(MAGIC)?;
        out.write_u16::<BigEndian>(self.version)?;
        out.write_u16::<BigEndian>(0)?;
        out.write_u32::<BigEndian>(HEADER_LEN)?;
        out.write_u32::<BigEndian>(entry_count)?;

        // `word` only admits entries whose length fits in a byte.
        for (word, frequency) in &self.entries {
            out.write_u8(*frequency)?;
            out.write_u8(word.len() as u8)?;
            out.extend_from_slice(word.as_bytes());
        }
        Ok(out)
    }
}
