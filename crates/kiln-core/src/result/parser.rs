//! Turning model replies into structured results
//!
//! Models are asked for a JSON object, but replies regularly arrive wrapped
//! in a ```json fence, surrounded by prose, or as plain fenced code blocks.
//! Parsing tries the JSON object first and falls back to fenced blocks.

use super::{HtmlCodeResult, MultiFileCodeResult};
use crate::error::{Error, Result};
use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::LazyLock;

static HTML_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```html[ \t]*\r?\n(.*?)```").expect("HTML_BLOCK is a compile-time constant")
});

static CSS_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```css[ \t]*\r?\n(.*?)```").expect("CSS_BLOCK is a compile-time constant")
});

static JS_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:js|javascript)[ \t]*\r?\n(.*?)```")
        .expect("JS_BLOCK is a compile-time constant")
});

static ANY_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[a-zA-Z]*[ \t]*\r?\n.*?```").expect("ANY_BLOCK is a compile-time constant")
});

/// Parse a single-page reply
pub fn parse_html_result(text: &str) -> Result<HtmlCodeResult> {
    if let Some(result) = parse_json_object::<HtmlCodeResult>(text) {
        if !result.html_code.trim().is_empty() {
            return Ok(result);
        }
    }

    if let Some(html) = capture(&HTML_BLOCK, text) {
        return Ok(HtmlCodeResult {
            html_code: html,
            description: prose(text),
        });
    }

    let trimmed = text.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("<!doctype html") || lower.starts_with("<html") {
        return Ok(HtmlCodeResult {
            html_code: trimmed.to_string(),
            description: String::new(),
        });
    }

    Err(Error::Parse("no HTML document found in reply".to_string()))
}

/// Parse an HTML/CSS/JS reply
pub fn parse_multi_file_result(text: &str) -> Result<MultiFileCodeResult> {
    if let Some(result) = parse_json_object::<MultiFileCodeResult>(text) {
        if !result.html_code.trim().is_empty() {
            return Ok(result);
        }
    }

    let html = capture(&HTML_BLOCK, text)
        .ok_or_else(|| Error::Parse("no ```html block found in reply".to_string()))?;

    Ok(MultiFileCodeResult {
        html_code: html,
        css_code: capture(&CSS_BLOCK, text).unwrap_or_default(),
        js_code: capture(&JS_BLOCK, text).unwrap_or_default(),
        description: prose(text),
    })
}

/// Deserialize the outermost `{ ... }` span of `text`, if it is valid JSON.
fn parse_json_object<T: DeserializeOwned>(text: &str) -> Option<T> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

fn capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim_end().to_string())
}

/// Text outside code fences, collapsed to one line.
fn prose(text: &str) -> String {
    ANY_BLOCK
        .replace_all(text, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_from_json() {
        let reply = r#"```json
{"htmlCode": "<!DOCTYPE html><html></html>", "description": "An empty page"}
```"#;
        let result = parse_html_result(reply).unwrap();
        assert_eq!(result.html_code, "<!DOCTYPE html><html></html>");
        assert_eq!(result.description, "An empty page");
    }

    #[test]
    fn test_html_from_fence() {
        let reply = "Here is a counter page.\n```html\n<html><body>0</body></html>\n```\nEnjoy!";
        let result = parse_html_result(reply).unwrap();
        assert_eq!(result.html_code, "<html><body>0</body></html>");
        assert_eq!(result.description, "Here is a counter page. Enjoy!");
    }

    #[test]
    fn test_html_raw_document() {
        let result = parse_html_result("  <!DOCTYPE html>\n<html></html>\n").unwrap();
        assert!(result.html_code.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_html_missing() {
        assert!(matches!(
            parse_html_result("Sorry, I cannot help with that."),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_multi_file_from_json() {
        let reply = r#"{"htmlCode":"<html></html>","cssCode":"body{}","jsCode":"","description":"d"}"#;
        let result = parse_multi_file_result(reply).unwrap();
        assert_eq!(result.css_code, "body{}");
        assert_eq!(result.js_code, "");
    }

    #[test]
    fn test_multi_file_from_fences() {
        let reply = "A todo app.\n\n```html\n<ul id=\"todos\"></ul>\n```\n\n```css\nul { margin: 0; }\n```\n\n```javascript\nconsole.log('ready');\n```\n";
        let result = parse_multi_file_result(reply).unwrap();
        assert_eq!(result.html_code, "<ul id=\"todos\"></ul>");
        assert_eq!(result.css_code, "ul { margin: 0; }");
        assert_eq!(result.js_code, "console.log('ready');");
        assert_eq!(result.description, "A todo app.");
    }

    #[test]
    fn test_multi_file_without_html_fails() {
        let reply = "```css\nbody {}\n```";
        assert!(matches!(parse_multi_file_result(reply), Err(Error::Parse(_))));
    }
}
