use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShrinkError {
    #[error("{0}")]
    Configuration(String),

    #[error("{0}")]
    Upload(String),

    #[error("{0}")]
    Download(String),

    #[error("{0}")]
    Encoding(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot prepare {path:?}: {source}")]
    Setup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Walkdir error: {0}")]
    WalkdirError(#[from] walkdir::Error),
}

impl ShrinkError {
    /// Error taxonomy label shown next to per-file failure messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ShrinkError::Configuration(_) => "ConfigurationError",
            ShrinkError::Upload(_) => "UploadError",
            ShrinkError::Download(_) => "DownloadError",
            ShrinkError::Encoding(_) => "EncodingError",
            ShrinkError::Io(_) => "IoError",
            ShrinkError::Setup { .. } | ShrinkError::WalkdirError(_) => "UnrecoverableSetupError",
        }
    }

    /// `"{kind}: {message}"`, the form printed for failed files.
    pub fn describe(&self) -> String {
        format!("{}: {}", self.kind(), self)
    }

    pub(crate) fn setup(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ShrinkError::Setup {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ShrinkError>;
