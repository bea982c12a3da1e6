use crate::format::MeshFormat;

/// Errors that can occur while turning raw bytes into a mesh asset.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to parse {format} data: {reason}")]
    Parse { format: MeshFormat, reason: String },

    #[error("unsupported mesh format: {0}")]
    UnsupportedFormat(String),

    #[error("I/O error reading mesh data: {0}")]
    Io(#[from] std::io::Error),
}

impl AssetError {
    pub(crate) fn parse(format: MeshFormat, reason: impl Into<String>) -> Self {
        Self::Parse {
            format,
            reason: reason.into(),
        }
    }
}
