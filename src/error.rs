use std::path::PathBuf;
use thiserror::Error;

/// Every expected way a conversion can fail.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Source or destination is missing, unreadable, or of the wrong kind.
    #[error("invalid path {}: {reason}", path.display())]
    Path { path: PathBuf, reason: String },

    /// Wrong file extension, or a document that cannot be parsed.
    #[error("bad format in {}: {reason}", path.display())]
    Format { path: PathBuf, reason: String },

    /// A required field is absent from an otherwise present record.
    #[error("missing field `{field}` in {context}")]
    Schema { field: &'static str, context: String },

    #[error("image size {width}x{height} has a zero dimension")]
    InvalidSize { width: u32, height: u32 },

    #[error("no boxes extracted from {}", path.display())]
    EmptyResult { path: PathBuf },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    pub fn path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ConvertError::Path {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn format(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ConvertError::Format {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn schema(field: &'static str, context: impl Into<String>) -> Self {
        ConvertError::Schema {
            field,
            context: context.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
