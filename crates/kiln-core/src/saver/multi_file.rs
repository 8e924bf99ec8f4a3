//! HTML/CSS/JS saver

use super::template::CodeFileSaver;
use crate::codegen_type::CodeGenType;
use crate::error::{Error, Result};
use crate::result::MultiFileCodeResult;
use std::path::{Path, PathBuf};

/// Writes `index.html`, `style.css` and `script.js`; CSS and JS may be empty.
#[derive(Debug, Clone)]
pub struct MultiFileCodeSaver {
    root: PathBuf,
}

impl MultiFileCodeSaver {
    /// Saver writing under `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl CodeFileSaver for MultiFileCodeSaver {
    type Output = MultiFileCodeResult;

    fn code_gen_type(&self) -> CodeGenType {
        CodeGenType::MultiFile
    }

    fn root(&self) -> &Path {
        &self.root
    }

    fn validate(&self, result: &MultiFileCodeResult) -> Result<()> {
        if result.html_code.trim().is_empty() {
            return Err(Error::Validation("HTML code must not be blank".to_string()));
        }
        Ok(())
    }

    fn files<'a>(&self, result: &'a MultiFileCodeResult) -> Vec<(&'static str, &'a str)> {
        vec![
            ("index.html", result.html_code.as_str()),
            ("style.css", result.css_code.as_str()),
            ("script.js", result.js_code.as_str()),
        ]
    }
}
