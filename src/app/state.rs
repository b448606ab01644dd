// CaseFolio - app/state.rs
//
// Application state management. Holds the loaded catalog, the gallery view,
// the mounted case page and the window-level input plumbing.
// Owned by the eframe::App implementation.

use crate::app::catalog::{self, Catalog};
use crate::app::detail::CaseView;
use crate::app::gallery::GalleryView;
use crate::core::filter::FilterState;
use crate::core::input::{KeyRouter, ScrollLock};
use crate::core::model::Case;
use crate::platform::config::AppConfig;
use crate::util::error::Result;
use std::path::Path;

/// Top-level application state.
#[derive(Debug)]
pub struct AppState {
    /// Currently loaded catalog (empty until one is opened).
    pub catalog: Catalog,

    /// Gallery filter and memoised derived views.
    pub gallery: GalleryView,

    /// Case page currently shown instead of the gallery.
    pub open_case: Option<CaseView>,

    /// Window-level key dispatcher shared by mounted viewers.
    pub key_router: KeyRouter,

    /// Background scroll lock held by an open lightbox.
    pub scroll_lock: ScrollLock,

    pub swipe_threshold: f32,
    pub thumbnail_size: f32,

    /// Dark mode (true) or light mode (false).
    pub dark_mode: bool,
    pub font_size: f32,

    /// Status message for the status bar.
    pub status_message: String,

    /// Non-fatal warnings from the most recent catalog load.
    pub catalog_warnings: Vec<String>,

    /// Whether to show the About dialog.
    pub show_about: bool,

    /// Whether to show the catalog warnings dialog.
    pub show_warnings: bool,

    /// Whether debug mode is enabled.
    pub debug_mode: bool,
}

impl AppState {
    /// Create initial state from the validated configuration.
    pub fn new(config: &AppConfig, debug_mode: bool) -> Self {
        Self {
            catalog: Catalog::default(),
            gallery: GalleryView::new(FilterState::default(), config.view_mode),
            open_case: None,
            key_router: KeyRouter::new(),
            scroll_lock: ScrollLock::new(),
            swipe_threshold: config.swipe_threshold_px,
            thumbnail_size: config.thumbnail_size,
            dark_mode: config.dark_mode,
            font_size: config.font_size,
            status_message: "Ready. Open a catalog to browse cases.".to_string(),
            catalog_warnings: Vec::new(),
            show_about: false,
            show_warnings: false,
            debug_mode,
        }
    }

    /// Replace the catalog. The gallery filter starts over and any open case
    /// page is unmounted.
    pub fn set_catalog(&mut self, catalog: Catalog, warnings: Vec<String>) {
        self.close_case();
        self.gallery.reset_filter();
        self.status_message = match &catalog.source {
            Some(path) => format!(
                "Loaded {} case(s) from {}",
                catalog.cases.len(),
                path.display()
            ),
            None => format!("Loaded {} case(s)", catalog.cases.len()),
        };
        if !warnings.is_empty() {
            self.status_message
                .push_str(&format!(" ({} warning(s))", warnings.len()));
        }
        self.catalog = catalog;
        self.catalog_warnings = warnings;
    }

    /// Load a catalog file and make it current.
    ///
    /// On failure the current catalog is kept and the error is reported in
    /// the status bar as well as returned.
    pub fn load_catalog_from(&mut self, path: &Path) -> Result<()> {
        match catalog::load_catalog(path) {
            Ok((catalog, warnings)) => {
                self.set_catalog(catalog, warnings);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Catalog load failed");
                self.status_message = format!("Error: {e}");
                Err(e.into())
            }
        }
    }

    /// Show the case page for `case_index`. Opening another case unmounts the
    /// previous one first. Out-of-range indices are ignored.
    pub fn open_case(&mut self, case_index: usize) {
        // Unmount before mounting so the old listener is gone first.
        self.open_case = None;
        let Some(case) = self.catalog.cases.get(case_index) else {
            tracing::warn!(case_index, "Ignoring request to open unknown case");
            return;
        };
        self.open_case = Some(CaseView::mount(
            case_index,
            case,
            &self.key_router,
            &self.scroll_lock,
            self.swipe_threshold,
        ));
    }

    /// Open a case by id. Returns false if no such case exists.
    pub fn open_case_by_id(&mut self, id: &str) -> bool {
        match self.catalog.position(id) {
            Some(idx) => {
                self.open_case(idx);
                true
            }
            None => false,
        }
    }

    /// Return to the gallery.
    pub fn close_case(&mut self) {
        if self.open_case.take().is_some() {
            tracing::debug!("Case view unmounted");
        }
    }

    /// The case whose page is open.
    pub fn current_case(&self) -> Option<&Case> {
        self.open_case
            .as_ref()
            .and_then(|view| self.catalog.cases.get(view.case_index))
    }
}
