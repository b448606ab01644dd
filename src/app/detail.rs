// CaseFolio - app/detail.rs
//
// A mounted case detail page.
//
// Mounting a case with images creates its `ImageViewer`, subscribes it to
// the window-level `KeyRouter` and gives it a `SwipeTracker`. All three
// live in `MountedViewer`, so unmounting (dropping the `CaseView`) detaches
// the key listener and releases any scroll lock the lightbox held.

use crate::core::input::{KeyRouter, KeySubscription, ScrollLock, SwipeTracker};
use crate::core::model::Case;
use crate::core::viewer::ImageViewer;

/// Viewer plus the input resources it holds while mounted.
#[derive(Debug)]
pub struct MountedViewer {
    pub viewer: ImageViewer,
    keys: KeySubscription,
    swipe: SwipeTracker,
}

/// The case currently shown in the detail view.
#[derive(Debug)]
pub struct CaseView {
    /// Index into the catalog's case list.
    pub case_index: usize,
    viewer: Option<MountedViewer>,
}

impl CaseView {
    /// Mount the detail view for `case`. A case without images gets no
    /// viewer and holds no input resources.
    pub fn mount(
        case_index: usize,
        case: &Case,
        router: &KeyRouter,
        scroll_lock: &ScrollLock,
        swipe_threshold: f32,
    ) -> Self {
        let viewer = ImageViewer::new(case.images.len(), scroll_lock.clone()).map(|viewer| {
            MountedViewer {
                viewer,
                keys: router.subscribe(),
                swipe: SwipeTracker::new(swipe_threshold),
            }
        });
        tracing::debug!(
            case_id = %case.id,
            images = case.images.len(),
            "Case view mounted"
        );
        Self { case_index, viewer }
    }

    pub fn viewer(&self) -> Option<&ImageViewer> {
        self.viewer.as_ref().map(|m| &m.viewer)
    }

    pub fn viewer_mut(&mut self) -> Option<&mut ImageViewer> {
        self.viewer.as_mut().map(|m| &mut m.viewer)
    }

    /// Apply keys routed to this view since the last frame.
    /// Returns the number of keys handled.
    pub fn pump_keys(&mut self) -> usize {
        let Some(mounted) = self.viewer.as_mut() else {
            return 0;
        };
        let keys = mounted.keys.drain();
        for key in &keys {
            mounted.viewer.handle_key(*key);
        }
        keys.len()
    }

    pub fn touch_start(&mut self, x: f32) {
        if let Some(mounted) = self.viewer.as_mut() {
            mounted.swipe.touch_start(x);
        }
    }

    /// Finish a touch; a recognised swipe moves the viewer.
    pub fn touch_end(&mut self, x: f32) {
        if let Some(mounted) = self.viewer.as_mut() {
            if let Some(swipe) = mounted.swipe.touch_end(x) {
                tracing::trace!(?swipe, "Swipe recognised");
                mounted.viewer.handle_swipe(swipe);
            }
        }
    }

    pub fn touch_cancel(&mut self) {
        if let Some(mounted) = self.viewer.as_mut() {
            mounted.swipe.touch_cancel();
        }
    }
}
