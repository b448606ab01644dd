// CaseFolio - ui/panels/mod.rs

pub mod about;
pub mod case_detail;
pub mod gallery;
pub mod viewer;
pub mod warnings;
