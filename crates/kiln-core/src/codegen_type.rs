//! Output types and the session cache key

use crate::error::{Error, Result};
use kiln_memory::AppId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shape of the artifact a generation produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeGenType {
    /// One self-contained `index.html`
    Html,
    /// `index.html`, `style.css` and `script.js`
    MultiFile,
    /// A multi-file project written through tool calls
    #[serde(alias = "project")]
    VueProject,
}

impl CodeGenType {
    /// Every output type
    pub const ALL: [CodeGenType; 3] = [Self::Html, Self::MultiFile, Self::VueProject];

    /// Wire value, also used in directory names and cache keys
    #[must_use]
    pub fn value(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::MultiFile => "multi_file",
            Self::VueProject => "vue_project",
        }
    }

    /// Human-readable label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Html => "Single HTML page",
            Self::MultiFile => "HTML/CSS/JS files",
            Self::VueProject => "Vue project",
        }
    }

    /// Whether generation goes through the tool-calling loop
    #[must_use]
    pub fn is_tool_driven(&self) -> bool {
        matches!(self, Self::VueProject)
    }
}

impl fmt::Display for CodeGenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl FromStr for CodeGenType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "html" => Ok(Self::Html),
            "multi_file" => Ok(Self::MultiFile),
            "vue_project" | "project" => Ok(Self::VueProject),
            other => Err(Error::UnsupportedGenerationType(other.to_string())),
        }
    }
}

/// Identity of a cached session: one per application and output type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Application the session serves
    pub app_id: AppId,
    /// Output type the session was built for
    pub code_gen_type: CodeGenType,
}

impl CacheKey {
    /// Create a key
    #[must_use]
    pub fn new(app_id: AppId, code_gen_type: CodeGenType) -> Self {
        Self {
            app_id,
            code_gen_type,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.app_id, self.code_gen_type.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_values_and_alias() {
        assert_eq!("html".parse::<CodeGenType>().unwrap(), CodeGenType::Html);
        assert_eq!(
            "multi_file".parse::<CodeGenType>().unwrap(),
            CodeGenType::MultiFile
        );
        assert_eq!(
            "project".parse::<CodeGenType>().unwrap(),
            CodeGenType::VueProject
        );
        assert!(matches!(
            "pdf".parse::<CodeGenType>(),
            Err(Error::UnsupportedGenerationType(v)) if v == "pdf"
        ));
    }

    #[test]
    fn test_serde_alias() {
        let ty: CodeGenType = serde_json::from_str("\"project\"").unwrap();
        assert_eq!(ty, CodeGenType::VueProject);
        assert_eq!(serde_json::to_string(&ty).unwrap(), "\"vue_project\"");
    }

    #[test]
    fn test_cache_key_display() {
        assert_eq!(CacheKey::new(42, CodeGenType::MultiFile).to_string(), "42_multi_file");
        assert_ne!(
            CacheKey::new(1, CodeGenType::Html),
            CacheKey::new(1, CodeGenType::MultiFile)
        );
    }
}
