/// Source classification and derivative output formats
///
/// Source files are classified by extension alone; derivative formats carry
/// their own extension and codec mapping.
use std::fmt;
use std::path::Path;

/// What kind of source image a file is, judged by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Png,
    Jpeg,
    /// Anything else. Not an error, the file is simply skipped.
    Unsupported,
}

impl SourceKind {
    pub fn from_extension(extension: &str) -> Self {
        match extension.to_lowercase().as_str() {
            "png" => SourceKind::Png,
            "jpg" | "jpeg" => SourceKind::Jpeg,
            _ => SourceKind::Unsupported,
        }
    }
}

/// Classify a path by case-insensitive extension match.
pub fn classify(path: &Path) -> SourceKind {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(SourceKind::from_extension)
        .unwrap_or(SourceKind::Unsupported)
}

/// Formats a derivative can be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    WebP,
}

impl OutputFormat {
    /// Target extension including the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => ".jpg",
            OutputFormat::WebP => ".webp",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::WebP => "WebP",
        };
        write!(f, "{}", name)
    }
}
