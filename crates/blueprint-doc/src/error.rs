use blueprint_kernel::KernelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocError {
    #[error("failed to read file: {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write file: {path}: {source}")]
    WriteFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid json at {path}: {source}")]
    ParseJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid toml at {path}: {source}")]
    ParseToml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize {what}: {source}")]
    Serialize {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    #[error(transparent)]
    Kernel(#[from] KernelError),
}
