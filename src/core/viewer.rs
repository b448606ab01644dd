// CaseFolio - core/viewer.rs
//
// Case image viewer state machine over (selected index, lightbox open).
//
// Invariant: 0 <= selected < count at all times. `next`/`prev` wrap
// modulo the image count and `select` rejects out-of-range indices, so
// the index can never leave the image set. A viewer for zero images
// cannot be constructed.
//
// While the lightbox is open the viewer holds a `ScrollLockGuard`;
// closing the lightbox or dropping the viewer releases it.

use crate::core::input::{NavKey, ScrollLock, ScrollLockGuard, Swipe};
use crate::util::error::ViewerError;

/// Image carousel with an overlay lightbox.
#[derive(Debug)]
pub struct ImageViewer {
    count: usize,
    selected: usize,
    scroll_lock: ScrollLock,
    /// `Some` exactly while the lightbox is open.
    lightbox: Option<ScrollLockGuard>,
}

impl ImageViewer {
    /// Create a viewer over `count` images, starting at the first image with
    /// the lightbox closed. Returns `None` for an empty image set.
    pub fn new(count: usize, scroll_lock: ScrollLock) -> Option<Self> {
        if count == 0 {
            return None;
        }
        Some(Self {
            count,
            selected: 0,
            scroll_lock,
            lightbox: None,
        })
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn is_lightbox_open(&self) -> bool {
        self.lightbox.is_some()
    }

    /// Advance to the next image, wrapping to the first.
    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.count;
        tracing::trace!(index = self.selected, count = self.count, "Viewer next");
    }

    /// Go back to the previous image, wrapping to the last.
    pub fn prev(&mut self) {
        self.selected = (self.selected + self.count - 1) % self.count;
        tracing::trace!(index = self.selected, count = self.count, "Viewer prev");
    }

    /// Show image `index`.
    pub fn select(&mut self, index: usize) -> Result<(), ViewerError> {
        if index >= self.count {
            return Err(ViewerError::IndexOutOfRange {
                index,
                count: self.count,
            });
        }
        self.selected = index;
        Ok(())
    }

    /// Show image `index` enlarged. Background scrolling stays suppressed
    /// until the lightbox is closed.
    pub fn open_lightbox(&mut self, index: usize) -> Result<(), ViewerError> {
        self.select(index)?;
        if self.lightbox.is_none() {
            self.lightbox = Some(self.scroll_lock.acquire());
            tracing::debug!(index, "Lightbox opened");
        }
        Ok(())
    }

    /// Close the lightbox and restore background scrolling. No-op when closed.
    pub fn close_lightbox(&mut self) {
        if self.lightbox.take().is_some() {
            tracing::debug!(index = self.selected, "Lightbox closed");
        }
    }

    /// Apply a navigation key. Escape only acts while the lightbox is open.
    pub fn handle_key(&mut self, key: NavKey) {
        match key {
            NavKey::ArrowRight => self.next(),
            NavKey::ArrowLeft => self.prev(),
            NavKey::Escape => self.close_lightbox(),
        }
    }

    /// Apply a recognised swipe gesture.
    pub fn handle_swipe(&mut self, swipe: Swipe) {
        match swipe {
            Swipe::Left => self.next(),
            Swipe::Right => self.prev(),
        }
    }
}
