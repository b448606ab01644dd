// CaseFolio - app/mod.rs
//
// Application layer: catalog loading, gallery memoisation, mounted case
// pages, background image decoding and top-level state.
// Dependencies: core, platform (config values), util.
// Must NOT depend on: ui.

pub mod catalog;
pub mod detail;
pub mod gallery;
pub mod images;
pub mod state;
