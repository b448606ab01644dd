// CaseFolio - platform/config.rs
//
// Platform-specific configuration, directory resolution, and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::model::ViewMode;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for CaseFolio configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/casefolio/ or %APPDATA%\CaseFolio\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored so a newer config file can be used with
/// an older binary.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub catalog: CatalogSection,
    pub ui: UiSection,
    pub viewer: ViewerSection,
    pub logging: LoggingSection,
}

/// `[catalog]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct CatalogSection {
    /// Catalog opened at startup when none is given on the command line.
    pub path: Option<String>,
}

/// `[ui]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct UiSection {
    /// Theme: "dark" or "light".
    pub theme: Option<String>,
    /// Body font size in points.
    pub font_size: Option<f32>,
    /// Initial gallery layout: "grid" or "list".
    pub view_mode: Option<String>,
}

/// `[viewer]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ViewerSection {
    /// Horizontal travel (logical px) a touch needs to count as a swipe.
    pub swipe_threshold_px: Option<f32>,
    /// Edge length of the thumbnail strip images.
    pub thumbnail_size: Option<f32>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    // -- Catalog --
    pub catalog_path: Option<PathBuf>,

    // -- UI --
    /// Dark mode (true) or light mode (false).
    pub dark_mode: bool,
    pub font_size: f32,
    pub view_mode: ViewMode,

    // -- Viewer --
    pub swipe_threshold_px: f32,
    pub thumbnail_size: f32,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            dark_mode: true,
            font_size: constants::DEFAULT_FONT_SIZE,
            view_mode: ViewMode::Grid,
            swipe_threshold_px: constants::DEFAULT_SWIPE_THRESHOLD_PX,
            thumbnail_size: constants::DEFAULT_THUMBNAIL_SIZE,
            log_level: None,
            log_file: None,
        }
    }
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first run).
/// If the file is unreadable or unparseable, returns defaults with one warning
/// so the application still starts and the user is informed.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<ConfigError>) {
    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(e) => {
            let err = ConfigError::Io {
                path: config_path.to_path_buf(),
                source: e,
            };
            tracing::warn!(error = %err, "Using default configuration");
            return (AppConfig::default(), vec![err]);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            let err = ConfigError::TomlParse {
                path: config_path.to_path_buf(),
                source: e,
            };
            tracing::warn!(error = %err, "Using default configuration");
            return (AppConfig::default(), vec![err]);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let (config, warnings) = validate(raw);
    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }
    (config, warnings)
}

/// Validate each field against named constants, accumulating all problems.
fn validate(raw: RawConfig) -> (AppConfig, Vec<ConfigError>) {
    let mut config = AppConfig::default();
    let mut warnings = Vec::new();

    let mut out_of_range = |field: &str, value: String, expected: String| {
        warnings.push(ConfigError::ValueOutOfRange {
            field: field.to_string(),
            value,
            expected,
        });
    };

    // -- Catalog: path --
    if let Some(path) = raw.catalog.path.filter(|p| !p.is_empty()) {
        config.catalog_path = Some(PathBuf::from(path));
    }

    // -- UI: theme --
    if let Some(ref theme) = raw.ui.theme {
        match theme.to_lowercase().as_str() {
            "dark" => config.dark_mode = true,
            "light" => config.dark_mode = false,
            _ => out_of_range("ui.theme", theme.clone(), "\"dark\" or \"light\"".to_string()),
        }
    }

    // -- UI: font_size --
    if let Some(size) = raw.ui.font_size {
        if (constants::MIN_FONT_SIZE..=constants::MAX_FONT_SIZE).contains(&size) {
            config.font_size = size;
        } else {
            out_of_range(
                "ui.font_size",
                size.to_string(),
                format!("{}-{}", constants::MIN_FONT_SIZE, constants::MAX_FONT_SIZE),
            );
        }
    }

    // -- UI: view_mode --
    if let Some(ref mode) = raw.ui.view_mode {
        match mode.to_lowercase().as_str() {
            "grid" => config.view_mode = ViewMode::Grid,
            "list" => config.view_mode = ViewMode::List,
            _ => out_of_range("ui.view_mode", mode.clone(), "\"grid\" or \"list\"".to_string()),
        }
    }

    // -- Viewer: swipe_threshold_px --
    if let Some(px) = raw.viewer.swipe_threshold_px {
        if (constants::MIN_SWIPE_THRESHOLD_PX..=constants::MAX_SWIPE_THRESHOLD_PX).contains(&px) {
            config.swipe_threshold_px = px;
        } else {
            out_of_range(
                "viewer.swipe_threshold_px",
                px.to_string(),
                format!(
                    "{}-{}",
                    constants::MIN_SWIPE_THRESHOLD_PX,
                    constants::MAX_SWIPE_THRESHOLD_PX
                ),
            );
        }
    }

    // -- Viewer: thumbnail_size --
    if let Some(size) = raw.viewer.thumbnail_size {
        if (constants::MIN_THUMBNAIL_SIZE..=constants::MAX_THUMBNAIL_SIZE).contains(&size) {
            config.thumbnail_size = size;
        } else {
            out_of_range(
                "viewer.thumbnail_size",
                size.to_string(),
                format!(
                    "{}-{}",
                    constants::MIN_THUMBNAIL_SIZE,
                    constants::MAX_THUMBNAIL_SIZE
                ),
            );
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            out_of_range(
                "logging.level",
                level.clone(),
                "error, warn, info, debug or trace".to_string(),
            );
        }
    }

    // -- Logging: file --
    if let Some(file) = raw.logging.file.filter(|f| !f.is_empty()) {
        config.log_file = Some(file);
    }

    (config, warnings)
}
