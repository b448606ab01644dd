// CaseFolio - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all CaseFolio operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum CaseFolioError {
    /// Catalog loading failed.
    Catalog(CatalogError),

    /// Image decoding failed.
    Image(ImageError),

    /// Viewer transition was rejected.
    Viewer(ViewerError),

    /// Configuration loading or validation failed.
    Config(ConfigError),
}

impl fmt::Display for CaseFolioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog(e) => write!(f, "Catalog error: {e}"),
            Self::Image(e) => write!(f, "Image error: {e}"),
            Self::Viewer(e) => write!(f, "Viewer error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for CaseFolioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Catalog(e) => Some(e),
            Self::Image(e) => Some(e),
            Self::Viewer(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog errors
// ---------------------------------------------------------------------------

/// Errors that prevent a catalog file from being loaded at all.
///
/// Problems with individual cases (duplicate ids, too many images) are not
/// errors; they surface as loader warnings.
#[derive(Debug)]
pub enum CatalogError {
    /// The catalog file could not be read.
    Io { path: PathBuf, source: io::Error },

    /// The catalog file exceeds the maximum allowed size.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// The file extension is neither `.toml` nor `.json`.
    UnsupportedFormat { path: PathBuf },

    /// TOML content could not be parsed into a catalog.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// JSON content could not be parsed into a catalog.
    JsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Cannot read catalog '{}': {source}", path.display())
            }
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "Catalog '{}' is {size} bytes, exceeding the {max_size} byte limit",
                path.display()
            ),
            Self::UnsupportedFormat { path } => write!(
                f,
                "Catalog '{}' has an unsupported extension (expected .toml or .json)",
                path.display()
            ),
            Self::TomlParse { path, source } => {
                write!(f, "Catalog parse error '{}': {source}", path.display())
            }
            Self::JsonParse { path, source } => {
                write!(f, "Catalog parse error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::TomlParse { source, .. } => Some(source),
            Self::JsonParse { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<CatalogError> for CaseFolioError {
    fn from(e: CatalogError) -> Self {
        Self::Catalog(e)
    }
}

// ---------------------------------------------------------------------------
// Image errors
// ---------------------------------------------------------------------------

/// Errors raised while decoding a case image.
#[derive(Debug)]
pub enum ImageError {
    /// The image file could not be read.
    Io { path: PathBuf, source: io::Error },

    /// The image bytes could not be decoded.
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Cannot read image '{}': {source}", path.display())
            }
            Self::Decode { path, source } => {
                write!(f, "Cannot decode image '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ImageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
        }
    }
}

impl From<ImageError> for CaseFolioError {
    fn from(e: ImageError) -> Self {
        Self::Image(e)
    }
}

// ---------------------------------------------------------------------------
// Viewer errors
// ---------------------------------------------------------------------------

/// A viewer transition that would break the index invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerError {
    /// `select` / `open_lightbox` was given an index outside `[0, count)`.
    IndexOutOfRange { index: usize, count: usize },
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { index, count } => write!(
                f,
                "Image index {index} is out of range for a set of {count} image(s)"
            ),
        }
    }
}

impl std::error::Error for ViewerError {}

impl From<ViewerError> for CaseFolioError {
    fn from(e: ViewerError) -> Self {
        Self::Viewer(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}. Using default."
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for CaseFolioError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for CaseFolio results.
pub type Result<T> = std::result::Result<T, CaseFolioError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_catalog_error_preserves_io_source() {
        let err = CaseFolioError::from(CatalogError::Io {
            path: PathBuf::from("cases.toml"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        });
        assert!(err.to_string().contains("cases.toml"));
        let catalog = err.source().expect("top-level error has a source");
        assert!(catalog.source().is_some());
    }

    #[test]
    fn test_viewer_error_message_names_index_and_count() {
        let err = ViewerError::IndexOutOfRange { index: 7, count: 3 };
        assert_eq!(
            err.to_string(),
            "Image index 7 is out of range for a set of 3 image(s)"
        );
    }
}
