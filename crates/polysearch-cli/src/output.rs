//! Output formatting for search results.
//!
//! Supports both human-readable terminal output and JSON for scripting.
//! The JSON shape is the one the web frontend consumes.

use polysearch_core::search::{RankedResult, SearchResponse};
use serde::Serialize;

/// Maximum characters to show in a human-readable snippet
const SNIPPET_MAX_CHARS: usize = 200;

/// JSON output structure for search results
#[derive(Serialize)]
pub struct JsonOutput<'a> {
    /// Language the fusion weights were chosen for
    pub query_detected_lang: &'static str,
    pub results: Vec<JsonResult<'a>>,
    /// Corpora that were skipped; omitted when empty
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<JsonFailure<'a>>,
}

/// One ranked document in JSON format
#[derive(Serialize)]
pub struct JsonResult<'a> {
    pub lang: &'static str,
    pub title: &'a str,
    /// Full document text
    pub summary: &'a str,
    pub url: &'a str,
    /// Fused score
    pub score: f32,
    pub semantic_score: f32,
    pub bm25_score: f32,
}

#[derive(Serialize)]
pub struct JsonFailure<'a> {
    pub lang: &'static str,
    pub reason: &'a str,
}

impl<'a> From<&'a RankedResult> for JsonResult<'a> {
    fn from(result: &'a RankedResult) -> Self {
        Self {
            lang: result.language.code(),
            title: &result.title,
            summary: &result.text,
            url: &result.url,
            score: result.fused_score,
            semantic_score: result.semantic_score,
            bm25_score: result.bm25_score,
        }
    }
}

/// Formats a search response as JSON. Non-ASCII text is emitted as-is.
pub fn format_json(response: &SearchResponse) -> String {
    let output = JsonOutput {
        query_detected_lang: response.primary_language.code(),
        results: response.results.iter().map(JsonResult::from).collect(),
        failures: response
            .failures
            .iter()
            .map(|failure| JsonFailure {
                lang: failure.language.code(),
                reason: &failure.reason,
            })
            .collect(),
    };
    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}

/// Formats a search response for human-readable terminal output.
pub fn format_human(query: &str, response: &SearchResponse) -> String {
    let mut output = String::new();

    if response.results.is_empty() {
        output.push_str(&format!("No results found for \"{}\"\n", query));
    } else {
        let count = response.results.len();
        output.push_str(&format!(
            "Found {} result{} for \"{}\" (query language: {}):\n\n",
            count,
            if count == 1 { "" } else { "s" },
            query,
            response.primary_language.name()
        ));

        for (i, result) in response.results.iter().enumerate() {
            output.push_str(&format!(
                "{}. {} [{}] (score: {:.2})\n",
                i + 1,
                result.title,
                result.language.code(),
                result.fused_score
            ));
            output.push_str(&format!(
                "   [semantic: {:.2}, bm25: {:.2}]\n",
                result.semantic_score, result.bm25_score
            ));
            output.push_str(&format!("   URL: {}\n", result.url));

            let snippet = truncate_text(&result.text, SNIPPET_MAX_CHARS);
            output.push_str(&format!("   {}\n", indent_text(&snippet, "   ")));
            output.push('\n');
        }
    }

    for failure in &response.failures {
        output.push_str(&format!(
            "Warning: {} corpus skipped: {}\n",
            failure.language.name(),
            failure.reason
        ));
    }

    output.trim_end().to_string()
}

/// Truncates text to at most `max_chars` characters, adding an ellipsis.
///
/// Cuts on a char boundary, preferring the last space before the limit.
fn truncate_text(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return text.to_string();
    };

    let truncated = &text[..cut];
    match truncated.rfind(' ') {
        Some(last_space) if last_space > 0 => format!("{}...", &truncated[..last_space]),
        _ => format!("{}...", truncated),
    }
}

/// Indents all lines of text after the first line.
fn indent_text(text: &str, indent: &str) -> String {
    text.lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                line.to_string()
            } else {
                format!("{}{}", indent, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use polysearch_core::language::Language;
    use polysearch_core::search::LanguageFailure;

    fn make_result(language: Language, title: &str, text: &str, score: f32) -> RankedResult {
        RankedResult {
            language,
            title: title.to_string(),
            text: text.to_string(),
            url: format!("https://{}.example/{}", language.code(), title),
            fused_score: score,
            semantic_score: score,
            bm25_score: 0.0,
        }
    }

    fn make_response(results: Vec<RankedResult>) -> SearchResponse {
        SearchResponse {
            primary_language: Language::English,
            results,
            failures: Vec::new(),
        }
    }

    #[test]
    fn test_format_human_empty() {
        let output = format_human("test query", &make_response(vec![]));
        assert!(output.contains("No results found"));
    }

    #[test]
    fn test_format_human_single() {
        let response = make_response(vec![make_result(
            Language::Spanish,
            "Coches",
            "Los coches eléctricos son eficientes",
            0.85,
        )]);
        let output = format_human("electric cars", &response);
        assert!(output.contains("1 result "));
        assert!(output.contains("Coches [es]"));
        assert!(output.contains("0.85"));
        assert!(output.contains("https://es.example/Coches"));
    }

    #[test]
    fn test_format_human_lists_failures() {
        let mut response = make_response(vec![]);
        response.failures.push(LanguageFailure {
            language: Language::Hindi,
            reason: "model failed".to_string(),
        });
        let output = format_human("query", &response);
        assert!(output.contains("Hindi corpus skipped: model failed"));
    }

    #[test]
    fn test_format_json_wire_shape() {
        let response = make_response(vec![make_result(
            Language::Hindi,
            "दिल्ली",
            "भारत की राजधानी दिल्ली है",
            0.9,
        )]);
        let output = format_json(&response);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["query_detected_lang"], "en");
        let first = &value["results"][0];
        assert_eq!(first["lang"], "hi");
        assert_eq!(first["summary"], "भारत की राजधानी दिल्ली है");
        assert_eq!(first["bm25_score"], 0.0);
        assert!(first.get("score").is_some());
        assert!(first.get("semantic_score").is_some());
        assert!(value.get("failures").is_none());

        // Raw UTF-8, not \u escapes
        assert!(output.contains("दिल्ली"));
    }

    #[test]
    fn test_truncate_text() {
        let short = "Short text";
        assert_eq!(truncate_text(short, 50), short);

        let long = "This is a much longer text that should be truncated at a reasonable point";
        let truncated = truncate_text(long, 30);
        assert!(truncated.ends_with("..."));
        assert!(truncated.chars().count() <= 33);
    }

    #[test]
    fn test_truncate_multibyte_text() {
        let hindi = "भारत की राजधानी दिल्ली है";
        let truncated = truncate_text(hindi, 8);
        assert!(truncated.ends_with("..."));
        assert!(hindi.starts_with(truncated.trim_end_matches("...")));
    }
}
