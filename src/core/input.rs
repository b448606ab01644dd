// CaseFolio - core/input.rs
//
// Window-level input plumbing shared by mounted widgets:
//   - `KeyRouter` fans navigation keys out to every live `KeySubscription`.
//     A subscription deregisters itself when dropped, so a widget that is
//     unmounted and remounted never leaves a stale listener behind.
//   - `ScrollLock` is a counted lock on background scrolling. Each
//     `ScrollLockGuard` holds one count and releases it on drop.
//   - `SwipeTracker` turns a touch start/end pair into a horizontal swipe.
//
// Everything here is single-threaded (owned by the UI thread), hence Rc.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

// =============================================================================
// Navigation keys
// =============================================================================

/// Keys the image viewer reacts to. The UI layer maps toolkit key events
/// onto these before dispatching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKey {
    ArrowLeft,
    ArrowRight,
    Escape,
}

// =============================================================================
// KeyRouter
// =============================================================================

#[derive(Debug, Default)]
struct RouterInner {
    next_id: u64,
    /// Pending keys per live subscription, keyed by subscription id.
    queues: BTreeMap<u64, Vec<NavKey>>,
}

/// Window-level key dispatcher.
///
/// Cloning yields another handle to the same router.
#[derive(Debug, Clone, Default)]
pub struct KeyRouter {
    inner: Rc<RefCell<RouterInner>>,
}

impl KeyRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new listener. Keys dispatched from now on are queued for
    /// it until it is drained or dropped.
    pub fn subscribe(&self) -> KeySubscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.queues.insert(id, Vec::new());
        tracing::trace!(subscription = id, listeners = inner.queues.len(), "Key listener attached");
        KeySubscription {
            id,
            router: Rc::downgrade(&self.inner),
        }
    }

    /// Deliver a key to every live subscription.
    pub fn dispatch(&self, key: NavKey) {
        let mut inner = self.inner.borrow_mut();
        for queue in inner.queues.values_mut() {
            queue.push(key);
        }
    }

    /// Number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().queues.len()
    }
}

/// A registered key listener. Dropping it detaches the listener.
#[derive(Debug)]
pub struct KeySubscription {
    id: u64,
    router: Weak<RefCell<RouterInner>>,
}

impl KeySubscription {
    /// Take all keys delivered since the last drain, in arrival order.
    pub fn drain(&self) -> Vec<NavKey> {
        let Some(router) = self.router.upgrade() else {
            return Vec::new();
        };
        let mut inner = router.borrow_mut();
        inner
            .queues
            .get_mut(&self.id)
            .map(std::mem::take)
            .unwrap_or_default()
    }
}

impl Drop for KeySubscription {
    fn drop(&mut self) {
        if let Some(router) = self.router.upgrade() {
            let mut inner = router.borrow_mut();
            inner.queues.remove(&self.id);
            tracing::trace!(
                subscription = self.id,
                listeners = inner.queues.len(),
                "Key listener detached"
            );
        }
    }
}

// =============================================================================
// ScrollLock
// =============================================================================

/// Counted lock on background (page) scrolling.
///
/// Cloning yields another handle to the same counter.
#[derive(Debug, Clone, Default)]
pub struct ScrollLock {
    holders: Rc<Cell<usize>>,
}

impl ScrollLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppress background scrolling until the returned guard is dropped.
    pub fn acquire(&self) -> ScrollLockGuard {
        self.holders.set(self.holders.get() + 1);
        ScrollLockGuard {
            holders: Rc::clone(&self.holders),
        }
    }

    /// True while at least one guard is alive.
    pub fn is_locked(&self) -> bool {
        self.holders.get() > 0
    }
}

/// Holds one count on a `ScrollLock`.
#[derive(Debug)]
pub struct ScrollLockGuard {
    holders: Rc<Cell<usize>>,
}

impl Drop for ScrollLockGuard {
    fn drop(&mut self) {
        self.holders.set(self.holders.get().saturating_sub(1));
    }
}

// =============================================================================
// Swipe gestures
// =============================================================================

/// A recognised horizontal swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    /// Finger moved right-to-left: advance to the next image.
    Left,
    /// Finger moved left-to-right: go back to the previous image.
    Right,
}

/// Classify a touch by its horizontal start and end coordinates.
///
/// Motion of `threshold` or less is not a gesture.
pub fn classify_swipe(start_x: f32, end_x: f32, threshold: f32) -> Option<Swipe> {
    let delta = start_x - end_x;
    if delta.abs() <= threshold {
        return None;
    }
    if delta > 0.0 {
        Some(Swipe::Left)
    } else {
        Some(Swipe::Right)
    }
}

/// Tracks one touch from start to end.
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    threshold: f32,
    start_x: Option<f32>,
}

impl SwipeTracker {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            start_x: None,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Record where the touch began.
    pub fn touch_start(&mut self, x: f32) {
        self.start_x = Some(x);
    }

    /// Finish the touch. Returns the swipe, if the motion qualified.
    /// An end without a recorded start is ignored.
    pub fn touch_end(&mut self, x: f32) -> Option<Swipe> {
        let start = self.start_x.take()?;
        classify_swipe(start, x, self.threshold)
    }

    /// Abandon the current touch (e.g. the OS cancelled it).
    pub fn touch_cancel(&mut self) {
        self.start_x = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_reaches_every_subscription() {
        let router = KeyRouter::new();
        let a = router.subscribe();
        let b = router.subscribe();
        router.dispatch(NavKey::ArrowRight);
        router.dispatch(NavKey::Escape);
        assert_eq!(a.drain(), vec![NavKey::ArrowRight, NavKey::Escape]);
        assert_eq!(b.drain(), vec![NavKey::ArrowRight, NavKey::Escape]);
        assert!(a.drain().is_empty());
    }

    #[test]
    fn test_dropped_subscription_detaches() {
        let router = KeyRouter::new();
        for _ in 0..5 {
            let sub = router.subscribe();
            assert_eq!(router.listener_count(), 1);
            drop(sub);
        }
        assert_eq!(router.listener_count(), 0);
    }

    #[test]
    fn test_keys_before_subscribe_are_not_delivered() {
        let router = KeyRouter::new();
        router.dispatch(NavKey::ArrowLeft);
        let sub = router.subscribe();
        assert!(sub.drain().is_empty());
    }

    #[test]
    fn test_subscription_outliving_router_is_harmless() {
        let router = KeyRouter::new();
        let sub = router.subscribe();
        drop(router);
        assert!(sub.drain().is_empty());
        drop(sub);
    }

    #[test]
    fn test_scroll_lock_counts_guards() {
        let lock = ScrollLock::new();
        assert!(!lock.is_locked());
        let first = lock.acquire();
        let second = lock.clone().acquire();
        assert!(lock.is_locked());
        drop(first);
        assert!(lock.is_locked());
        drop(second);
        assert!(!lock.is_locked());
    }

    #[test]
    fn test_swipe_threshold() {
        assert_eq!(classify_swipe(200.0, 160.0, 50.0), None);
        assert_eq!(classify_swipe(200.0, 140.0, 50.0), Some(Swipe::Left));
        assert_eq!(classify_swipe(100.0, 160.0, 50.0), Some(Swipe::Right));
        assert_eq!(classify_swipe(100.0, 150.0, 50.0), None);
    }

    #[test]
    fn test_tracker_requires_start() {
        let mut tracker = SwipeTracker::new(50.0);
        assert_eq!(tracker.touch_end(0.0), None);

        tracker.touch_start(300.0);
        assert_eq!(tracker.touch_end(200.0), Some(Swipe::Left));
        // The start is consumed by the end.
        assert_eq!(tracker.touch_end(0.0), None);

        tracker.touch_start(300.0);
        tracker.touch_cancel();
        assert_eq!(tracker.touch_end(0.0), None);
    }
}
