//! Single-page saver

use super::template::CodeFileSaver;
use crate::codegen_type::CodeGenType;
use crate::error::{Error, Result};
use crate::result::HtmlCodeResult;
use std::path::{Path, PathBuf};

/// Writes `index.html`
#[derive(Debug, Clone)]
pub struct HtmlCodeSaver {
    root: PathBuf,
}

impl HtmlCodeSaver {
    /// Saver writing under `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl CodeFileSaver for HtmlCodeSaver {
    type Output = HtmlCodeResult;

    fn code_gen_type(&self) -> CodeGenType {
        CodeGenType::Html
    }

    fn root(&self) -> &Path {
        &self.root
    }

    fn validate(&self, result: &HtmlCodeResult) -> Result<()> {
        if result.html_code.trim().is_empty() {
            return Err(Error::Validation("HTML code must not be blank".to_string()));
        }
        Ok(())
    }

    fn files<'a>(&self, result: &'a HtmlCodeResult) -> Vec<(&'static str, &'a str)> {
        vec![("index.html", result.html_code.as_str())]
    }
}
