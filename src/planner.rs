use crate::constants::{JPEG_DERIVATIVE_QUALITY, WEBP_DERIVATIVE_QUALITY};
use crate::formats::{classify, OutputFormat, SourceKind};
use std::path::{Path, PathBuf};

/// A source image discovered during enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Lowercase, without the leading dot. Empty when the file has none.
    pub extension: String,
    pub base_name: String,
}

impl SourceFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let base_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            path,
            extension,
            base_name,
        }
    }

    pub fn kind(&self) -> SourceKind {
        classify(&self.path)
    }
}

/// Codec parameters for one derivative
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeOptions {
    /// `advanced` asks for optimized Huffman tables, see `encoder::encode`.
    Jpeg { quality: u8, advanced: bool },
    WebP { quality: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivativePlan {
    pub format: OutputFormat,
    pub options: EncodeOptions,
}

impl DerivativePlan {
    pub fn jpeg() -> Self {
        Self {
            format: OutputFormat::Jpeg,
            options: EncodeOptions::Jpeg {
                quality: JPEG_DERIVATIVE_QUALITY,
                advanced: true,
            },
        }
    }

    pub fn webp() -> Self {
        Self {
            format: OutputFormat::WebP,
            options: EncodeOptions::WebP {
                quality: WEBP_DERIVATIVE_QUALITY,
            },
        }
    }

    pub fn target_extension(&self) -> &'static str {
        self.format.extension()
    }
}

/// Ordered derivatives to produce for a source kind.
///
/// PNG sources get a JPEG and a WebP, JPEG sources only a WebP, and
/// everything else nothing at all.
pub fn plan_derivatives(kind: SourceKind) -> Vec<DerivativePlan> {
    match kind {
        SourceKind::Png => vec![DerivativePlan::jpeg(), DerivativePlan::webp()],
        SourceKind::Jpeg => vec![DerivativePlan::webp()],
        SourceKind::Unsupported => Vec::new(),
    }
}

/// `{output_dir}/{base_name}{target_extension}`.
///
/// Two sources sharing a base name map to the same path; the later write wins.
pub fn output_path(output_dir: &Path, source: &SourceFile, plan: &DerivativePlan) -> PathBuf {
    output_dir.join(format!("{}{}", source.base_name, plan.target_extension()))
}
