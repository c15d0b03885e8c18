//! Supported corpus languages.
//!
//! Each [`Language`] carries its own lexical configuration (stopword set and
//! optional Snowball stemmer), so adding a language is a compile-checked
//! change rather than a new dictionary key.

use crate::text::stopwords;
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// A corpus language, serialized as its ISO 639-1 code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Language {
    /// English (`en`)
    #[serde(rename = "en")]
    English,
    /// Spanish (`es`)
    #[serde(rename = "es")]
    Spanish,
    /// Hindi (`hi`)
    #[serde(rename = "hi")]
    Hindi,
}

impl Language {
    /// Every supported language, in the reference deployment's merge order.
    pub const ALL: [Language; 3] = [Language::English, Language::Spanish, Language::Hindi];

    /// ISO 639-1 code.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
            Language::Hindi => "hi",
        }
    }

    /// English name, for display.
    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::Hindi => "Hindi",
        }
    }

    /// Parses a language tag such as `"es"`, `"EN"` or `"en-US"`.
    ///
    /// Returns `None` for anything outside the supported set. Callers treat
    /// `None` as "undetected" and let the router fall back.
    pub fn from_code(code: &str) -> Option<Language> {
        let primary = code
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match primary.as_str() {
            "en" => Some(Language::English),
            "es" => Some(Language::Spanish),
            "hi" => Some(Language::Hindi),
            _ => None,
        }
    }

    /// Stopwords removed before indexing. Empty for Hindi.
    pub fn stopwords(&self) -> &'static HashSet<&'static str> {
        match self {
            Language::English => &stopwords::ENGLISH,
            Language::Spanish => &stopwords::SPANISH,
            Language::Hindi => &stopwords::NONE,
        }
    }

    /// Snowball stemmer, if one is configured for this language.
    pub fn stemmer(&self) -> Option<Stemmer> {
        match self {
            Language::English => Some(Stemmer::create(Algorithm::English)),
            Language::Spanish => Some(Stemmer::create(Algorithm::Spanish)),
            Language::Hindi => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_code(s).ok_or_else(|| format!("unsupported language '{}'", s))
    }
}
