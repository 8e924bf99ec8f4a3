//! Saver - validation and persistence of generation results
//!
//! Every output type gets its own directory `{root}/{app_id}_{type}/`, which
//! is overwritten by each save. There is no versioning and writes are not
//! transactional.

mod executor;
mod html;
mod multi_file;
mod template;
mod writer;

pub use executor::CodeSaverExecutor;
pub use html::HtmlCodeSaver;
pub use multi_file::MultiFileCodeSaver;
pub use template::CodeFileSaver;
pub use writer::write_files;

use crate::codegen_type::CodeGenType;
use kiln_memory::AppId;
use std::path::{Path, PathBuf};

/// Directory that holds the artifacts of one application and output type
#[must_use]
pub fn artifact_dir(root: &Path, app_id: AppId, code_gen_type: CodeGenType) -> PathBuf {
    root.join(format!("{}_{}", app_id, code_gen_type.value()))
}

/// Files written by one save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArtifactSet {
    /// Target directory
    pub dir: PathBuf,
    /// Written files, in write order
    pub files: Vec<PathBuf>,
}
