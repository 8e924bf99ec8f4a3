//! Template for result savers

use super::writer::write_files;
use super::{artifact_dir, SavedArtifactSet};
use crate::codegen_type::CodeGenType;
use crate::error::{Error, Result};
use async_trait::async_trait;
use kiln_memory::AppId;
use std::path::Path;
use tracing::info;

/// Saves one result shape.
///
/// Implementors describe the shape (type, checks, files); `save` runs the
/// shared steps: base validation, shape validation, directory layout, writes.
#[async_trait]
pub trait CodeFileSaver: Send + Sync {
    /// Result shape handled by this saver
    type Output: Send + Sync;

    /// Output type, used for the directory name
    fn code_gen_type(&self) -> CodeGenType;

    /// Root directory all artifact directories live under
    fn root(&self) -> &Path;

    /// Shape-specific checks
    fn validate(&self, result: &Self::Output) -> Result<()>;

    /// Files to write as `(file name, content)`
    fn files<'a>(&self, result: &'a Self::Output) -> Vec<(&'static str, &'a str)>;

    /// Validate and persist a result
    async fn save(&self, result: Option<&Self::Output>, app_id: AppId) -> Result<SavedArtifactSet> {
        let result = result
            .ok_or_else(|| Error::Validation("generation result is missing".to_string()))?;
        if app_id <= 0 {
            return Err(Error::Validation(format!("invalid app id: {app_id}")));
        }
        self.validate(result)?;

        let dir = artifact_dir(self.root(), app_id, self.code_gen_type());
        let files = write_files(&dir, &self.files(result)).await?;

        info!(
            app_id,
            code_gen_type = %self.code_gen_type(),
            dir = %dir.display(),
            files = files.len(),
            "Artifacts saved"
        );
        Ok(SavedArtifactSet { dir, files })
    }
}
