// CaseFolio - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "CaseFolio";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "CaseFolio";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Gallery
// =============================================================================

/// Category id that disables the category predicate.
pub const ALL_CATEGORY_ID: &str = "all";

/// Display name of the catch-all category pill.
pub const ALL_CATEGORY_NAME: &str = "All Cases";

/// Icon glyph of the catch-all category pill.
pub const ALL_CATEGORY_ICON: &str = "\u{1f9b7}";

// =============================================================================
// Catalog limits
// =============================================================================

/// Maximum catalog file size accepted by the loader.
pub const MAX_CATALOG_FILE_SIZE: u64 = 4 * 1024 * 1024; // 4 MB

/// Maximum number of cases held in memory from a single catalog.
pub const MAX_CASES: usize = 5_000;

/// Maximum number of images attached to a single case.
pub const MAX_IMAGES_PER_CASE: usize = 200;

// =============================================================================
// Image viewer
// =============================================================================

/// Minimum horizontal travel (in logical pixels) for a touch to count as a swipe.
pub const DEFAULT_SWIPE_THRESHOLD_PX: f32 = 50.0;

/// Lower bound for a configured swipe threshold.
pub const MIN_SWIPE_THRESHOLD_PX: f32 = 10.0;

/// Upper bound for a configured swipe threshold.
pub const MAX_SWIPE_THRESHOLD_PX: f32 = 400.0;

/// Edge length of the square thumbnails in the viewer strip.
pub const DEFAULT_THUMBNAIL_SIZE: f32 = 80.0;

/// Lower bound for a configured thumbnail size.
pub const MIN_THUMBNAIL_SIZE: f32 = 40.0;

/// Upper bound for a configured thumbnail size.
pub const MAX_THUMBNAIL_SIZE: f32 = 200.0;

/// Decoded images larger than this on either side are downscaled before
/// being uploaded as textures.
pub const MAX_IMAGE_DIMENSION: u32 = 2_048;

/// Longest side of the reduced decode used for gallery cards and the
/// viewer's thumbnail strip.
pub const THUMBNAIL_DECODE_DIMENSION: u32 = 384;

/// Maximum decoded-image messages drained from the loader per frame.
pub const MAX_IMAGE_MESSAGES_PER_FRAME: usize = 32;

/// Uploaded textures not drawn for this many frames are released.
pub const TEXTURE_IDLE_FRAMES: u64 = 600;

// =============================================================================
// UI
// =============================================================================

/// Default body font size in points.
pub const DEFAULT_FONT_SIZE: f32 = 14.5;

/// Minimum configurable font size.
pub const MIN_FONT_SIZE: f32 = 10.0;

/// Maximum configurable font size.
pub const MAX_FONT_SIZE: f32 = 24.0;

// =============================================================================
// Logging
// =============================================================================

/// Default log level when neither RUST_LOG, --debug nor config sets one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// File names
// =============================================================================

/// Configuration file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// File extensions accepted for catalogs.
pub const CATALOG_EXTENSIONS: &[&str] = &["toml", "json"];
