//! Dispatch from result shape to saver

use super::{CodeFileSaver, HtmlCodeSaver, MultiFileCodeSaver, SavedArtifactSet};
use crate::error::Result;
use crate::result::GenerationResult;
use kiln_memory::AppId;
use std::path::{Path, PathBuf};

/// Routes each [`GenerationResult`] variant to its saver
#[derive(Debug, Clone)]
pub struct CodeSaverExecutor {
    root: PathBuf,
    html: HtmlCodeSaver,
    multi_file: MultiFileCodeSaver,
}

impl CodeSaverExecutor {
    /// Executor whose savers all write under `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            html: HtmlCodeSaver::new(root.clone()),
            multi_file: MultiFileCodeSaver::new(root.clone()),
            root,
        }
    }

    /// Root of the artifact tree
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Save a result with the saver matching its shape
    pub async fn save(&self, result: &GenerationResult, app_id: AppId) -> Result<SavedArtifactSet> {
        match result {
            GenerationResult::Html(r) => self.html.save(Some(r), app_id).await,
            GenerationResult::MultiFile(r) => self.multi_file.save(Some(r), app_id).await,
        }
    }
}
