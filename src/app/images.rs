// CaseFolio - app/images.rs
//
// Background decoding of case images.
//
// Architecture:
//   - `ImageLoader` lives on the UI thread. `request` spawns a worker thread
//     per batch of not-yet-requested paths; the worker decodes the batch in
//     parallel with rayon and sends one `ImageEvent` per path.
//   - The UI drains events with `poll` once per frame and uploads textures.
//   - Each path can be decoded at two sizes (`ImageVariant`): a small one
//     for cards and the thumbnail strip, and a full one for the main image
//     and the lightbox.
//   - A (path, variant) pair is requested at most once per loader until it
//     is forgotten; `reset` forgets all of them (used when a different
//     catalog is opened).

use crate::util::constants;
use crate::util::error::ImageError;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// Decode size of a requested image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageVariant {
    /// Reduced to `THUMBNAIL_DECODE_DIMENSION` for cards and thumbnails.
    Thumbnail,
    /// Reduced only when larger than `MAX_IMAGE_DIMENSION`.
    Full,
}

impl ImageVariant {
    /// Longest side a decode of this variant may have.
    pub fn max_dimension(self) -> u32 {
        match self {
            Self::Thumbnail => constants::THUMBNAIL_DECODE_DIMENSION,
            Self::Full => constants::MAX_IMAGE_DIMENSION,
        }
    }
}

/// An image decoded to straight-alpha RGBA8.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub path: PathBuf,
    pub variant: ImageVariant,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Result of decoding one requested path.
#[derive(Debug)]
pub enum ImageEvent {
    Decoded(DecodedImage),
    Failed {
        path: PathBuf,
        variant: ImageVariant,
        error: String,
    },
}

/// Decode an image file, downscaling anything larger than the variant's
/// `max_dimension` on either side. Aspect ratio is kept.
pub fn decode_image(path: &Path, variant: ImageVariant) -> Result<DecodedImage, ImageError> {
    let bytes = std::fs::read(path).map_err(|e| ImageError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut img = image::load_from_memory(&bytes).map_err(|e| ImageError::Decode {
        path: path.to_path_buf(),
        source: e,
    })?;

    let max = variant.max_dimension();
    if img.width() > max || img.height() > max {
        tracing::debug!(
            path = %path.display(),
            ?variant,
            width = img.width(),
            height = img.height(),
            "Downscaling image"
        );
        img = img.thumbnail(max, max);
    }

    let rgba = img.into_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(DecodedImage {
        path: path.to_path_buf(),
        variant,
        width,
        height,
        rgba: rgba.into_raw(),
    })
}

/// Queues image decodes on background threads and hands results back.
pub struct ImageLoader {
    requested: HashSet<(PathBuf, ImageVariant)>,
    tx: mpsc::Sender<ImageEvent>,
    rx: mpsc::Receiver<ImageEvent>,
}

impl ImageLoader {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            requested: HashSet::new(),
            tx,
            rx,
        }
    }

    /// Decode every path not already requested at `variant`. Returns how
    /// many were queued.
    pub fn request<'a, I>(&mut self, paths: I, variant: ImageVariant) -> usize
    where
        I: IntoIterator<Item = &'a Path>,
    {
        let batch: Vec<PathBuf> = paths
            .into_iter()
            .filter(|p| self.requested.insert((p.to_path_buf(), variant)))
            .map(Path::to_path_buf)
            .collect();
        if batch.is_empty() {
            return 0;
        }

        let queued = batch.len();
        let tx = self.tx.clone();
        std::thread::spawn(move || decode_batch(batch, variant, tx));
        tracing::debug!(count = queued, ?variant, "Image decode batch queued");
        queued
    }

    /// True if `path` has been requested at `variant` (whether or not it
    /// finished) and not forgotten since.
    pub fn is_requested(&self, path: &Path, variant: ImageVariant) -> bool {
        self.requested.contains(&(path.to_path_buf(), variant))
    }

    /// Allow `path` at `variant` to be requested again, e.g. after its
    /// texture was released.
    pub fn forget(&mut self, path: &Path, variant: ImageVariant) {
        self.requested.remove(&(path.to_path_buf(), variant));
    }

    /// Drain up to `max` finished decodes without blocking.
    pub fn poll(&self, max: usize) -> Vec<ImageEvent> {
        self.rx.try_iter().take(max).collect()
    }

    /// Forget every request and discard undelivered results. Workers still
    /// running send into the old channel, which is dropped here.
    pub fn reset(&mut self) {
        let (tx, rx) = mpsc::channel();
        self.tx = tx;
        self.rx = rx;
        self.requested.clear();
    }
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Worker body: decode `batch` in parallel, one event per path.
fn decode_batch(batch: Vec<PathBuf>, variant: ImageVariant, tx: mpsc::Sender<ImageEvent>) {
    batch.par_iter().for_each_with(tx, |tx, path| {
        let event = match decode_image(path, variant) {
            Ok(decoded) => ImageEvent::Decoded(decoded),
            Err(e) => {
                tracing::warn!(error = %e, "Image decode failed");
                ImageEvent::Failed {
                    path: path.clone(),
                    variant,
                    error: e.to_string(),
                }
            }
        };
        // Receiver dropped (loader reset or UI closed): nothing to do.
        let _ = tx.send(event);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    fn write_png(dir: &TempDir, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.path().join(name);
        image::RgbaImage::from_pixel(width, height, image::Rgba([20, 184, 166, 255]))
            .save(&path)
            .unwrap();
        path
    }

    fn collect_events(loader: &ImageLoader, expected: usize) -> Vec<ImageEvent> {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut events = Vec::new();
        while events.len() < expected && Instant::now() < deadline {
            events.extend(loader.poll(usize::MAX));
            std::thread::sleep(Duration::from_millis(10));
        }
        events
    }

    #[test]
    fn test_decode_png() {
        let dir = TempDir::new().unwrap();
        let path = write_png(&dir, "pre.png", 4, 3);
        let decoded = decode_image(&path, ImageVariant::Full).unwrap();
        assert_eq!((decoded.width, decoded.height), (4, 3));
        assert_eq!(decoded.rgba.len(), 4 * 3 * 4);
        assert_eq!(&decoded.rgba[..4], &[20, 184, 166, 255]);
    }

    #[test]
    fn test_oversized_image_is_downscaled() {
        let dir = TempDir::new().unwrap();
        let path = write_png(&dir, "wide.png", constants::MAX_IMAGE_DIMENSION * 2, 8);
        let decoded = decode_image(&path, ImageVariant::Full).unwrap();
        assert!(decoded.width <= constants::MAX_IMAGE_DIMENSION);
        assert!(decoded.height <= 8);
    }

    #[test]
    fn test_thumbnail_variant_is_reduced_keeping_aspect() {
        let dir = TempDir::new().unwrap();
        let path = write_png(&dir, "photo.png", 1_600, 1_200);

        let thumb = decode_image(&path, ImageVariant::Thumbnail).unwrap();
        assert_eq!(thumb.variant, ImageVariant::Thumbnail);
        assert_eq!(thumb.width, constants::THUMBNAIL_DECODE_DIMENSION);
        assert_eq!(thumb.height, constants::THUMBNAIL_DECODE_DIMENSION * 3 / 4);
        assert_eq!(thumb.rgba.len(), (thumb.width * thumb.height * 4) as usize);

        let full = decode_image(&path, ImageVariant::Full).unwrap();
        assert_eq!((full.width, full.height), (1_600, 1_200));
    }

    #[test]
    fn test_small_image_not_upscaled_for_thumbnail() {
        let dir = TempDir::new().unwrap();
        let path = write_png(&dir, "tiny.png", 10, 6);
        let thumb = decode_image(&path, ImageVariant::Thumbnail).unwrap();
        assert_eq!((thumb.width, thumb.height), (10, 6));
    }

    #[test]
    fn test_missing_and_corrupt_files_are_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.png");
        assert!(matches!(
            decode_image(&missing, ImageVariant::Full),
            Err(ImageError::Io { .. })
        ));

        let corrupt = dir.path().join("corrupt.png");
        std::fs::write(&corrupt, b"definitely not a png").unwrap();
        assert!(matches!(
            decode_image(&corrupt, ImageVariant::Thumbnail),
            Err(ImageError::Decode { .. })
        ));
    }

    #[test]
    fn test_loader_delivers_each_path_once() {
        let dir = TempDir::new().unwrap();
        let good = write_png(&dir, "a.png", 2, 2);
        let bad = dir.path().join("nope.png");

        let mut loader = ImageLoader::new();
        assert_eq!(
            loader.request([good.as_path(), bad.as_path()], ImageVariant::Full),
            2
        );
        // Repeat requests are ignored.
        assert_eq!(loader.request([good.as_path()], ImageVariant::Full), 0);
        assert!(loader.is_requested(&good, ImageVariant::Full));
        assert!(!loader.is_requested(&good, ImageVariant::Thumbnail));

        let events = collect_events(&loader, 2);
        assert_eq!(events.len(), 2);
        let decoded = events
            .iter()
            .filter(|e| matches!(e, ImageEvent::Decoded(d) if d.path == good))
            .count();
        let failed = events
            .iter()
            .filter(|e| matches!(e, ImageEvent::Failed { path, .. } if *path == bad))
            .count();
        assert_eq!((decoded, failed), (1, 1));
    }

    #[test]
    fn test_reset_forgets_requests() {
        let dir = TempDir::new().unwrap();
        let path = write_png(&dir, "a.png", 2, 2);
        let mut loader = ImageLoader::new();
        loader.request([path.as_path()], ImageVariant::Full);
        loader.reset();
        assert!(!loader.is_requested(&path, ImageVariant::Full));
        assert_eq!(loader.request([path.as_path()], ImageVariant::Full), 1);
    }

    #[test]
    fn test_variants_are_requested_independently() {
        let dir = TempDir::new().unwrap();
        let path = write_png(&dir, "a.png", 2, 2);
        let mut loader = ImageLoader::new();
        assert_eq!(loader.request([path.as_path()], ImageVariant::Thumbnail), 1);
        assert_eq!(loader.request([path.as_path()], ImageVariant::Full), 1);

        let events = collect_events(&loader, 2);
        let mut variants: Vec<ImageVariant> = events
            .iter()
            .filter_map(|e| match e {
                ImageEvent::Decoded(d) => Some(d.variant),
                ImageEvent::Failed { .. } => None,
            })
            .collect();
        variants.sort_by_key(|v| v.max_dimension());
        assert_eq!(variants, [ImageVariant::Thumbnail, ImageVariant::Full]);

        loader.forget(&path, ImageVariant::Thumbnail);
        assert!(!loader.is_requested(&path, ImageVariant::Thumbnail));
        assert!(loader.is_requested(&path, ImageVariant::Full));
        assert_eq!(loader.request([path.as_path()], ImageVariant::Thumbnail), 1);
    }
}
