pub mod address;
pub mod binary;
pub mod collection;
pub mod dictionary;
pub mod error;
pub mod factory;
pub mod locale;
pub mod package;
pub mod quarantine;
pub mod resolver;
pub mod service;

pub use address::AssetFileAddress;
pub use binary::{
    BinaryDictionary, BinaryDictionaryOpener, DictionaryOpener, DictionaryWriter, OpenOutcome,
};
pub use collection::DictionaryCollection;
pub use dictionary::{Dictionary, DictionaryType, MatchType, SearchOptions, Suggestion};
pub use error::{FormatError, LoadError, LocaleError};
pub use factory::DictionaryFactory;
pub use locale::Locale;
pub use package::{ManifestError, PackageManifest, ResourceEntry, ResourcePackage};
pub use quarantine::{QuarantineManager, QuarantineOutcome};
pub use resolver::{DictionarySource, FsSourceResolver, ResolvedSources, SourceResolver};
pub use service::{DictionaryService, load_main_dictionary};
