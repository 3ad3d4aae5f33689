//! Assemble stage: OCR response JSON → one combined Markdown document.
//!
//! The response contract is loose — `pages` is optional, each page may carry
//! `markdown`, `text`, both, or neither — so this stage is written against
//! `serde_json::Value` rather than a rigid struct. A response with no
//! usable `pages` array is **not** an error: the output becomes a
//! pretty-printed dump of the whole response so the user can see what the
//! API actually said. That leniency is deliberate and load-bearing; callers
//! depend on getting *something* back from every 200 response.

use crate::output::PageText;
use serde_json::Value;
use tracing::debug;

/// Prefix of the fallback output when the response shape is unrecognised.
pub const UNEXPECTED_SHAPE_NOTE: &str = "Unexpected response structure:";

/// Marker text inserted before each page's content. `{}` is the 1-based
/// page number.
fn page_separator(page_num: usize) -> String {
    format!("\n\n--- PAGE {page_num} ---\n\n")
}

/// The assembled document before run-level stats are attached.
#[derive(Debug)]
pub struct Assembled {
    /// Combined text, trimmed of leading/trailing whitespace.
    pub markdown: String,
    /// Per-page sections (empty in the fallback case).
    pub pages: Vec<PageText>,
    /// Sum of `images` array lengths across all pages.
    pub image_count: usize,
}

/// Walk the response's `pages` array into a single document.
///
/// Per page (1-based index i): append `--- PAGE i ---`, then the page's
/// non-empty `markdown` field, else its non-empty `text` field, else
/// nothing. When `pages` is absent or not an array, the result is the
/// diagnostic dump described in [`UNEXPECTED_SHAPE_NOTE`].
///
/// An *empty* `pages` array is a recognised shape: it yields an empty
/// zero-page document, not the dump. The API told us there were no pages;
/// that is an answer, not an anomaly.
pub fn assemble(response: &Value) -> Assembled {
    let Some(pages) = response.get("pages").and_then(Value::as_array) else {
        debug!("Response has no 'pages' array; emitting diagnostic dump");
        let dump = serde_json::to_string_pretty(response)
            .unwrap_or_else(|_| response.to_string());
        return Assembled {
            markdown: format!("{UNEXPECTED_SHAPE_NOTE}\n\n{dump}")
                .trim()
                .to_string(),
            pages: Vec::new(),
            image_count: 0,
        };
    };

    let mut combined = String::new();
    let mut sections = Vec::with_capacity(pages.len());
    let mut image_count = 0usize;

    for (i, page) in pages.iter().enumerate() {
        let page_num = i + 1;
        combined.push_str(&page_separator(page_num));

        let text = non_empty_str(page, "markdown")
            .or_else(|| non_empty_str(page, "text"))
            .unwrap_or_default();
        combined.push_str(text);

        let images = page
            .get("images")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        image_count += images;

        sections.push(PageText {
            page_num,
            text: text.to_string(),
            image_count: images,
        });
    }

    debug!(
        "Assembled {} pages, {} images, {} chars",
        sections.len(),
        image_count,
        combined.len()
    );

    Assembled {
        markdown: combined.trim().to_string(),
        pages: sections,
        image_count,
    }
}

/// Get `page[key]` as a non-empty string, mirroring the truthiness check
/// the API's own examples use: an empty `markdown` falls through to `text`.
fn non_empty_str<'a>(page: &'a Value, key: &str) -> Option<&'a str> {
    page.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pages_with_markdown_get_ordered_separators() {
        let response = json!({
            "pages": [
                {"markdown": "# One"},
                {"markdown": "# Two"},
                {"markdown": "# Three"}
            ]
        });
        let out = assemble(&response);

        for i in 1..=3 {
            assert!(
                out.markdown.contains(&format!("--- PAGE {i} ---")),
                "missing separator for page {i}"
            );
        }
        let p1 = out.markdown.find("--- PAGE 1 ---").unwrap();
        let p2 = out.markdown.find("--- PAGE 2 ---").unwrap();
        let p3 = out.markdown.find("--- PAGE 3 ---").unwrap();
        assert!(p1 < p2 && p2 < p3, "separators out of order");
        assert_eq!(out.pages.len(), 3);
        assert_eq!(out.markdown.matches("--- PAGE").count(), 3);
    }

    #[test]
    fn text_field_used_when_markdown_missing() {
        let response = json!({"pages": [{"text": "plain body"}]});
        let out = assemble(&response);
        assert!(out.markdown.contains("plain body"));
        assert_eq!(out.pages[0].text, "plain body");
    }

    #[test]
    fn empty_markdown_falls_through_to_text() {
        let response = json!({"pages": [{"markdown": "", "text": "fallback"}]});
        let out = assemble(&response);
        assert!(out.markdown.contains("fallback"));
    }

    #[test]
    fn page_with_neither_still_gets_separator() {
        let response = json!({"pages": [{"markdown": "first"}, {}]});
        let out = assemble(&response);
        assert!(out.markdown.contains("--- PAGE 2 ---"));
        assert_eq!(out.pages[1].text, "");
    }

    #[test]
    fn image_count_sums_across_pages() {
        let response = json!({
            "pages": [
                {"markdown": "a", "images": [{}, {}, {}]},
                {"markdown": "b"},
                {"markdown": "c", "images": [{}]}
            ]
        });
        let out = assemble(&response);
        assert_eq!(out.image_count, 4);
        assert_eq!(out.pages[0].image_count, 3);
        assert_eq!(out.pages[1].image_count, 0);
        assert_eq!(out.pages[2].image_count, 1);
    }

    #[test]
    fn missing_pages_is_diagnostic_dump_not_error() {
        let response = json!({"status": "queued", "job_id": "abc123"});
        let out = assemble(&response);
        assert!(out.markdown.starts_with(UNEXPECTED_SHAPE_NOTE));
        assert!(out.markdown.contains("abc123"));
        assert!(out.pages.is_empty());
        assert_eq!(out.image_count, 0);
    }

    #[test]
    fn pages_not_an_array_is_diagnostic_dump() {
        let response = json!({"pages": "oops"});
        let out = assemble(&response);
        assert!(out.markdown.starts_with(UNEXPECTED_SHAPE_NOTE));
        assert!(out.pages.is_empty());
    }

    #[test]
    fn output_is_trimmed() {
        let response = json!({"pages": [{"markdown": "  \n\nhello\n\n  "}]});
        let out = assemble(&response);
        assert!(!out.markdown.starts_with(char::is_whitespace));
        assert!(!out.markdown.ends_with(char::is_whitespace));
        assert!(out.markdown.ends_with("hello"));
    }

    #[test]
    fn empty_pages_array_yields_empty_document() {
        let response = json!({"pages": []});
        let out = assemble(&response);
        assert_eq!(out.markdown, "");
        assert!(out.pages.is_empty());
    }
}
