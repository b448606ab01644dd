// CaseFolio - core/mod.rs
//
// Core business logic layer.
// Dependencies: util, chrono, serde.
// Must NOT depend on: ui, platform, app, or perform any I/O.

pub mod filter;
pub mod input;
pub mod model;
pub mod viewer;
