// CaseFolio - ui/mod.rs
//
// UI layer: presentation only.
// Dependencies: app (state, image loader), core (read-only models), egui.
// Must NOT depend on: platform, direct I/O.

pub mod panels;
pub mod textures;
pub mod theme;
