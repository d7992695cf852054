use std::path::PathBuf;

use thiserror::Error;

/// Load-time failures. Either variant aborts the whole store build; a
/// partially loaded dataset is never returned.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A required identity column could not be determined for a source.
    #[error("source '{source_name}': {detail}")]
    Schema { source_name: String, detail: String },
    /// A named source file is absent or unreadable.
    #[error("source {path:?} is missing or unreadable: {detail}")]
    MissingSource { path: PathBuf, detail: String },
}

impl LoadError {
    pub fn schema(source_name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Schema {
            source_name: source_name.into(),
            detail: detail.into(),
        }
    }

    pub fn missing_source(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self::MissingSource {
            path: path.into(),
            detail: detail.into(),
        }
    }
}
