use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LocaleError;

/// Language plus optional region, compared by exact match only
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale {
    language: String,
    region: Option<String>,
}

impl Locale {
    pub fn new(language: &str, region: Option<&str>) -> Result<Self, LocaleError> {
        let language = language.trim();
        if language.is_empty() {
            return Err(LocaleError::Empty);
        }
        if !language.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(LocaleError::Invalid(language.to_string()));
        }

        let region = match region.map(str::trim) {
            None | Some("") => None,
            Some(r) if r.chars().all(|c| c.is_ascii_alphanumeric()) => Some(r.to_ascii_uppercase()),
            Some(r) => return Err(LocaleError::Invalid(r.to_string())),
        };

        Ok(Self {
            language: language.to_ascii_lowercase(),
            region,
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Lowercased resource name suffixes, most specific first: `en_us`, then `en`
    pub fn resource_suffixes(&self) -> Vec<String> {
        let mut suffixes = Vec::with_capacity(2);
        if let Some(region) = &self.region {
            suffixes.push(format!("{}_{}", self.language, region.to_ascii_lowercase()));
        }
        suffixes.push(self.language.clone());
        suffixes
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}_{}", self.language, region),
            None => f.write_str(&self.language),
        }
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(LocaleError::Empty);
        }

        let mut parts = s.splitn(2, ['_', '-']);
        let language = parts.next().unwrap_or_default();
        let region = parts.next();
        if region.is_some_and(|r| r.contains(['_', '-'])) {
            return Err(LocaleError::Invalid(s.to_string()));
        }

        Locale::new(language, region)
    }
}

impl TryFrom<String> for Locale {
    type Error = LocaleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.to_string()
    }
}
