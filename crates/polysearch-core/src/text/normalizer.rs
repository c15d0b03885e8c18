use crate::language::Language;
use rust_stemmers::Stemmer;
use std::collections::HashSet;
use std::fmt;
use unicode_properties::{GeneralCategoryGroup, UnicodeGeneralCategory};

/// Per-language lexical normalization pipeline.
///
/// Steps, in order:
/// 1. lowercase, then keep only word characters (general category letter or
///    number, plus `_`) and whitespace. Combining marks are dropped, so
///    Devanagari vowel signs, anusvara and virama do not survive.
/// 2. split on whitespace
/// 3. drop stopwords for the language
/// 4. stem surviving tokens when the language has a stemmer
///
/// The lexical index keeps the normalizer it was built with and runs queries
/// through the same instance, so index-time and query-time tokens always
/// agree.
///
/// # Examples
///
/// ```
/// use polysearch_core::language::Language;
/// use polysearch_core::text::TextNormalizer;
///
/// let normalizer = TextNormalizer::new(Language::English);
/// assert_eq!(normalizer.normalize("The cars!"), vec!["car".to_string()]);
/// ```
pub struct TextNormalizer {
    language: Language,
    stopwords: &'static HashSet<&'static str>,
    stemmer: Option<Stemmer>,
}

impl TextNormalizer {
    /// Creates the normalizer configured for `language`.
    pub fn new(language: Language) -> Self {
        Self {
            language,
            stopwords: language.stopwords(),
            stemmer: language.stemmer(),
        }
    }

    /// Language this normalizer was configured for.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Runs the full pipeline over `text`.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        let cleaned: String = text
            .to_lowercase()
            .chars()
            .filter(|&c| is_word_char(c) || c.is_whitespace())
            .collect();

        cleaned
            .split_whitespace()
            .filter(|token| !self.stopwords.contains(token))
            .map(|token| match &self.stemmer {
                Some(stemmer) => stemmer.stem(token).into_owned(),
                None => token.to_string(),
            })
            .collect()
    }
}

impl fmt::Debug for TextNormalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextNormalizer")
            .field("language", &self.language)
            .field("stopwords", &self.stopwords.len())
            .field("stemming", &self.stemmer.is_some())
            .finish()
    }
}

/// Letter (L*), number (N*) or underscore.
fn is_word_char(c: char) -> bool {
    c == '_'
        || matches!(
            c.general_category_group(),
            GeneralCategoryGroup::Letter | GeneralCategoryGroup::Number
        )
}

/// Normalizes `text` for `language` with a freshly configured pipeline.
pub fn normalize(text: &str, language: Language) -> Vec<String> {
    TextNormalizer::new(language).normalize(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_punctuation_and_lowercases() {
        let tokens = normalize("Hello, World! Rust_lang @#$ 2024", Language::Hindi);
        assert_eq!(tokens, vec!["hello", "world", "rust_lang", "2024"]);
    }

    #[test]
    fn test_removes_english_stopwords_and_stems() {
        let tokens = normalize("The cars are running", Language::English);
        assert_eq!(tokens, vec!["car", "run"]);
    }

    #[test]
    fn test_spanish_pipeline() {
        let tokens = normalize("Los coches de la ciudad", Language::Spanish);
        assert!(!tokens.iter().any(|t| t == "los" || t == "de" || t == "la"));
        assert_eq!(tokens.len(), 2);
        assert_eq!(
            normalize("coches", Language::Spanish),
            normalize("coche", Language::Spanish)
        );
    }

    #[test]
    fn test_hindi_passes_tokens_through() {
        let tokens = normalize("भारत की राजधानी", Language::Hindi);
        assert_eq!(tokens, vec!["भरत", "क", "रजधन"]);
    }

    #[test]
    fn test_combining_marks_are_dropped() {
        // Vowel signs, anusvara and virama are all category M
        assert_eq!(normalize("हिंदी भाषा", Language::Hindi), vec!["हद", "भष"]);
        assert_eq!(normalize("हिन्दी", Language::Hindi), vec!["हनद"]);
        // Decomposed accent goes, precomposed letter stays
        assert_eq!(normalize("cafe\u{301} café", Language::Hindi), vec!["cafe", "café"]);
    }

    #[test]
    fn test_non_ascii_digits_are_kept() {
        assert_eq!(normalize("२०२४ ½", Language::Hindi), vec!["२०२४", "½"]);
    }

    #[test]
    fn test_all_stopwords_yield_no_tokens() {
        assert!(normalize("the and of", Language::English).is_empty());
        assert!(normalize("   ", Language::English).is_empty());
        assert!(normalize("", Language::Spanish).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let text = "Electric vehicles are reshaping urban transport, quickly.";
        for language in Language::ALL {
            assert_eq!(normalize(text, language), normalize(text, language));
        }
    }

    #[test]
    fn test_punctuation_inside_words_is_joined() {
        // Apostrophes are stripped, not split on.
        let tokens = normalize("don't", Language::Hindi);
        assert_eq!(tokens, vec!["dont"]);
    }
}
