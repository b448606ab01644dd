// CaseFolio - platform/mod.rs
//
// Platform abstraction layer: config directories and config.toml.
// Dependencies: util, core::model (plain data), directories, toml.
// Must NOT depend on: app, ui.

pub mod config;
