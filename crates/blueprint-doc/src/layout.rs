//! Output paths and flushing.
//!
//! Documents are computed first and written afterwards, in one step.

use crate::assemble::{Document, DocumentTarget, Format};
use crate::error::DocError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const UNIT_DIR: &str = "module";
pub const COLLECTION_DIR: &str = "library";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/module/<unit>.<ext>`
    pub fn unit_path(&self, unit: &str, format: Format) -> PathBuf {
        self.root
            .join(UNIT_DIR)
            .join(format!("{unit}.{}", format.extension()))
    }

    /// `<root>/library/<collection>.<ext>`
    pub fn collection_path(&self, collection: &str, format: Format) -> PathBuf {
        self.root
            .join(COLLECTION_DIR)
            .join(format!("{collection}.{}", format.extension()))
    }

    pub fn path_for(&self, document: &Document) -> PathBuf {
        match &document.target {
            DocumentTarget::Unit(unit) => self.unit_path(unit, document.format),
            DocumentTarget::Collection(name) => self.collection_path(name, document.format),
        }
    }

    /// Write every document, creating directories as needed. Returns the
    /// written paths in input order.
    pub fn write_all(&self, documents: &[Document]) -> Result<Vec<PathBuf>, DocError> {
        let mut written = Vec::with_capacity(documents.len());
        for document in documents {
            let path = self.path_for(document);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|source| DocError::WriteFile {
                    path: parent.display().to_string(),
                    source,
                })?;
            }
            fs::write(&path, &document.content).map_err(|source| DocError::WriteFile {
                path: path.display().to_string(),
                source,
            })?;
            debug!(path = %path.display(), digest = %document.digest(), "wrote document");
            written.push(path);
        }
        Ok(written)
    }
}
