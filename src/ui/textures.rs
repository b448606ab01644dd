// CaseFolio - ui/textures.rs
//
// GPU texture cache for case images. Decoding happens off-thread in
// `ImageLoader`; this cache uploads finished decodes a few per frame and
// remembers failures so broken images render as placeholders instead of
// being retried every frame. Textures that go undrawn for
// `TEXTURE_IDLE_FRAMES` frames are released and decoded again on demand.

use crate::app::images::{ImageEvent, ImageLoader, ImageVariant};
use crate::util::constants;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// What is known about one image path.
pub enum TextureSlot {
    Loading,
    Ready(egui::TextureHandle),
    Failed(String),
}

struct CachedTexture {
    slot: TextureSlot,
    /// Frame in which the slot was last looked up.
    last_used: u64,
}

#[derive(Default)]
pub struct TextureCache {
    loader: ImageLoader,
    slots: HashMap<(PathBuf, ImageVariant), CachedTexture>,
    frame: u64,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a path at the given decode size, queueing a decode the first
    /// time it is seen.
    pub fn get(&mut self, path: &Path, variant: ImageVariant) -> &TextureSlot {
        let frame = self.frame;
        let loader = &mut self.loader;
        let entry = self
            .slots
            .entry((path.to_path_buf(), variant))
            .or_insert_with(|| {
                loader.request([path], variant);
                CachedTexture {
                    slot: TextureSlot::Loading,
                    last_used: frame,
                }
            });
        entry.last_used = frame;
        &entry.slot
    }

    /// Start a new frame: release idle textures, then upload finished
    /// decodes. Returns true if anything changed, or while decodes are still
    /// outstanding, so the caller keeps repainting.
    pub fn poll(&mut self, ctx: &egui::Context) -> bool {
        self.frame += 1;
        let evicted = self.evict_idle();

        let events = self.loader.poll(constants::MAX_IMAGE_MESSAGES_PER_FRAME);
        let changed = !events.is_empty();
        for event in events {
            let (key, slot) = match event {
                ImageEvent::Decoded(img) => {
                    let color = egui::ColorImage::from_rgba_unmultiplied(
                        [img.width as usize, img.height as usize],
                        &img.rgba,
                    );
                    let handle = ctx.load_texture(
                        format!("{}#{:?}", img.path.display(), img.variant),
                        color,
                        egui::TextureOptions::LINEAR,
                    );
                    ((img.path, img.variant), TextureSlot::Ready(handle))
                }
                ImageEvent::Failed {
                    path,
                    variant,
                    error,
                } => ((path, variant), TextureSlot::Failed(error)),
            };
            let last_used = self.slots.get(&key).map_or(self.frame, |e| e.last_used);
            self.slots.insert(key, CachedTexture { slot, last_used });
        }
        changed || evicted > 0 || self.pending() > 0
    }

    /// Drop ready textures not looked up within `TEXTURE_IDLE_FRAMES`.
    /// Loading and failed slots stay so nothing is decoded twice at once and
    /// broken files are not retried.
    fn evict_idle(&mut self) -> usize {
        let frame = self.frame;
        let idle: Vec<(PathBuf, ImageVariant)> = self
            .slots
            .iter()
            .filter(|(_, e)| {
                matches!(e.slot, TextureSlot::Ready(_))
                    && frame.saturating_sub(e.last_used) > constants::TEXTURE_IDLE_FRAMES
            })
            .map(|(key, _)| key.clone())
            .collect();
        for key in &idle {
            self.slots.remove(key);
            self.loader.forget(&key.0, key.1);
        }
        if !idle.is_empty() {
            tracing::debug!(count = idle.len(), "Idle textures released");
        }
        idle.len()
    }

    /// Number of images still decoding.
    pub fn pending(&self) -> usize {
        self.slots
            .values()
            .filter(|e| matches!(e.slot, TextureSlot::Loading))
            .count()
    }

    /// Number of textures currently uploaded.
    pub fn resident(&self) -> usize {
        self.slots
            .values()
            .filter(|e| matches!(e.slot, TextureSlot::Ready(_)))
            .count()
    }

    /// Drop every texture (a different catalog was opened).
    pub fn clear(&mut self) {
        self.loader.reset();
        self.slots.clear();
    }
}

/// Draw the image at `path`, decoded at `variant`, fitted inside `size`, or a placeholder box
/// labelled with `alt` while it loads, when it failed, or when there is no
/// image at all.
pub fn show_image(
    ui: &mut egui::Ui,
    cache: &mut TextureCache,
    path: Option<&Path>,
    variant: ImageVariant,
    alt: &str,
    size: egui::Vec2,
    sense: egui::Sense,
) -> egui::Response {
    let (handle, placeholder) = match path.map(|p| cache.get(p, variant)) {
        Some(TextureSlot::Ready(handle)) => (Some(handle.clone()), ""),
        Some(TextureSlot::Loading) => (None, "Loading\u{2026}"),
        Some(TextureSlot::Failed(_)) => (None, alt),
        None => (None, "No image"),
    };

    match handle {
        Some(handle) => ui
            .add(
                egui::Image::new(egui::load::SizedTexture::from_handle(&handle))
                    .fit_to_exact_size(size)
                    .maintain_aspect_ratio(true)
                    .sense(sense),
            )
            .on_hover_text(alt),
        None => {
            let (rect, response) = ui.allocate_exact_size(size, sense);
            let painter = ui.painter();
            painter.rect_filled(rect, 6.0, super::theme::PLACEHOLDER_BG);
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                placeholder,
                egui::FontId::proportional(12.0),
                egui::Color32::from_gray(180),
            );
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    fn write_png(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        image::RgbaImage::from_pixel(900, 600, image::Rgba([20, 184, 166, 255]))
            .save(&path)
            .unwrap();
        path
    }

    /// Poll until `path` at `variant` is no longer loading.
    fn wait_ready(cache: &mut TextureCache, ctx: &egui::Context, path: &Path, variant: ImageVariant) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while Instant::now() < deadline {
            cache.poll(ctx);
            if !matches!(cache.get(path, variant), TextureSlot::Loading) {
                return;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn test_thumbnail_texture_is_reduced() {
        let dir = TempDir::new().unwrap();
        let path = write_png(&dir, "cover.png");
        let ctx = egui::Context::default();
        let mut cache = TextureCache::new();

        wait_ready(&mut cache, &ctx, &path, ImageVariant::Thumbnail);
        match cache.get(&path, ImageVariant::Thumbnail) {
            TextureSlot::Ready(handle) => {
                let [w, h] = handle.size();
                assert_eq!(w, constants::THUMBNAIL_DECODE_DIMENSION as usize);
                assert!(h < w);
            }
            _ => panic!("thumbnail did not load"),
        }
        // The full-size variant is a separate slot.
        assert!(matches!(
            cache.get(&path, ImageVariant::Full),
            TextureSlot::Loading
        ));
    }

    #[test]
    fn test_idle_textures_are_released_and_reloaded() {
        let dir = TempDir::new().unwrap();
        let path = write_png(&dir, "cover.png");
        let ctx = egui::Context::default();
        let mut cache = TextureCache::new();

        wait_ready(&mut cache, &ctx, &path, ImageVariant::Thumbnail);
        assert_eq!(cache.resident(), 1);

        for _ in 0..=constants::TEXTURE_IDLE_FRAMES {
            cache.poll(&ctx);
        }
        assert_eq!(cache.resident(), 0);

        // Drawing it again queues a fresh decode.
        assert!(matches!(
            cache.get(&path, ImageVariant::Thumbnail),
            TextureSlot::Loading
        ));
        wait_ready(&mut cache, &ctx, &path, ImageVariant::Thumbnail);
        assert_eq!(cache.resident(), 1);
    }

    #[test]
    fn test_textures_in_use_are_kept() {
        let dir = TempDir::new().unwrap();
        let path = write_png(&dir, "cover.png");
        let ctx = egui::Context::default();
        let mut cache = TextureCache::new();

        wait_ready(&mut cache, &ctx, &path, ImageVariant::Full);
        for _ in 0..=constants::TEXTURE_IDLE_FRAMES {
            cache.poll(&ctx);
            cache.get(&path, ImageVariant::Full);
        }
        assert_eq!(cache.resident(), 1);
    }
}
