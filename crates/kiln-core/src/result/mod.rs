//! Structured generation results

pub mod parser;

use crate::codegen_type::CodeGenType;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

pub use parser::{parse_html_result, parse_multi_file_result};

/// Result of a single-page generation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlCodeResult {
    /// Complete HTML document
    #[serde(default)]
    pub html_code: String,
    /// Short description of what was generated
    #[serde(default)]
    pub description: String,
}

/// Result of an HTML/CSS/JS generation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiFileCodeResult {
    /// HTML document
    #[serde(default)]
    pub html_code: String,
    /// Stylesheet, may be empty
    #[serde(default)]
    pub css_code: String,
    /// Script, may be empty
    #[serde(default)]
    pub js_code: String,
    /// Short description of what was generated
    #[serde(default)]
    pub description: String,
}

/// A structured result of either shape
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationResult {
    /// Single page
    Html(HtmlCodeResult),
    /// HTML/CSS/JS triple
    MultiFile(MultiFileCodeResult),
}

impl GenerationResult {
    /// Output type the result belongs to
    #[must_use]
    pub fn code_gen_type(&self) -> CodeGenType {
        match self {
            Self::Html(_) => CodeGenType::Html,
            Self::MultiFile(_) => CodeGenType::MultiFile,
        }
    }

    /// Description supplied by the model
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::Html(r) => &r.description,
            Self::MultiFile(r) => &r.description,
        }
    }

    /// Text kept as the assistant turn, in memory and in the history log.
    ///
    /// It is the JSON shape the model is asked to produce, so a replayed
    /// session sees its own earlier output.
    pub fn reply_text(&self) -> Result<String> {
        let text = match self {
            Self::Html(r) => serde_json::to_string(r),
            Self::MultiFile(r) => serde_json::to_string(r),
        };
        text.map_err(|e| Error::Parse(e.to_string()))
    }
}

impl From<HtmlCodeResult> for GenerationResult {
    fn from(result: HtmlCodeResult) -> Self {
        Self::Html(result)
    }
}

impl From<MultiFileCodeResult> for GenerationResult {
    fn from(result: MultiFileCodeResult) -> Self {
        Self::MultiFile(result)
    }
}
