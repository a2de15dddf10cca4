//! Blueprint configuration, read from TOML.
//!
//! Every field has a default, so an empty file (or no file) is valid.

use crate::error::DocError;
use blueprint_kernel::BuildOptions;
use blueprint_markdown::RenderOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_ROOT: &str = "blueprint";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlueprintConfig {
    pub nodes: BuildOptions,
    pub render: RenderConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub cite_brackets: bool,
    /// Prepended to node identifiers in `\label` and cross-references.
    pub label_prefix: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cite_brackets: true,
            label_prefix: String::new(),
        }
    }
}

impl RenderConfig {
    pub fn markdown_options(&self) -> RenderOptions {
        RenderOptions {
            cite_brackets: self.cite_brackets,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub root: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
        }
    }
}

impl BlueprintConfig {
    pub fn from_toml_str(text: &str, origin: &str) -> Result<Self, DocError> {
        toml::from_str(text).map_err(|source| DocError::ParseToml {
            path: origin.to_string(),
            source,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| DocError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text, &path.display().to_string())
    }
}
