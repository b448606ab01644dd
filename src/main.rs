// CaseFolio - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading
// 3. Logging initialisation (debug mode and config level support)
// 4. Initial catalog load and gallery state from the command line
// 5. eframe GUI launch

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod gui;

// Re-export modules from the library crate so that `gui.rs` and other
// binary-side code can still use `crate::app::...`, `crate::core::...` etc.
pub use casefolio::app;

pub use casefolio::core;
pub use casefolio::platform;
pub use casefolio::ui;
pub use casefolio::util;

use clap::Parser;
use std::path::PathBuf;

/// Configure fonts for the egui context.
///
/// On Windows, adds Segoe UI Emoji and Segoe UI Symbol as fallbacks so
/// category icons and arrows render instead of square glyphs. Other
/// platforms keep the egui defaults.
fn configure_fonts(ctx: &egui::Context) {
    #[cfg(target_os = "windows")]
    {
        let mut fonts = egui::FontDefinitions::default();
        let candidates: &[(&str, &str)] = &[
            ("Segoe UI Emoji", r"C:\Windows\Fonts\seguiemj.ttf"),
            ("Segoe UI Symbol", r"C:\Windows\Fonts\seguisym.ttf"),
        ];

        let mut loaded = Vec::new();
        for (name, path) in candidates {
            match std::fs::read(path) {
                Ok(data) => {
                    fonts
                        .font_data
                        .insert((*name).to_owned(), egui::FontData::from_owned(data).into());
                    loaded.push(*name);
                }
                Err(e) => {
                    tracing::warn!(font = name, error = %e, "Failed to load system font");
                }
            }
        }

        if !loaded.is_empty() {
            if let Some(proportional) = fonts.families.get_mut(&egui::FontFamily::Proportional) {
                proportional.extend(loaded.iter().map(|n| (*n).to_owned()));
            }
            ctx.set_fonts(fonts);
            tracing::debug!(fonts = ?loaded, "Fallback fonts configured");
        }
    }

    #[cfg(not(target_os = "windows"))]
    let _ = ctx;
}

/// CaseFolio - Dental case portfolio viewer.
///
/// Browse a catalog of clinical cases: filter by category or text, open a
/// case to step through its images, and zoom into any image.
#[derive(Parser, Debug)]
#[command(name = "CaseFolio", version, about)]
struct Cli {
    /// Catalog file to open (.toml or .json). Defaults to [catalog] path in config.toml.
    path: Option<PathBuf>,

    /// Initial category filter (e.g. "endodontics").
    #[arg(short = 'c', long = "category")]
    category: Option<String>,

    /// Initial search query.
    #[arg(short = 's', long = "search")]
    search: Option<String>,

    /// Open the case with this id directly.
    #[arg(long = "case")]
    case: Option<String>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    // Config is read before logging exists so its [logging] section can
    // take part in level selection; problems are reported right after init.
    let platform_paths = platform::config::PlatformPaths::resolve();
    let (config, config_warnings) =
        platform::config::load_config(&platform_paths.config_file());

    util::logging::init(
        cli.debug,
        config.log_level.as_deref(),
        config.log_file.as_deref(),
    );

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "CaseFolio starting"
    );
    for warning in &config_warnings {
        tracing::warn!(error = %warning, "Config warning");
    }

    let mut state = app::state::AppState::new(&config, cli.debug);
    if !config_warnings.is_empty() {
        state.status_message = format!(
            "{} config warning(s); defaults used for invalid values.",
            config_warnings.len()
        );
    }

    // Catalog: CLI argument > config.toml
    if let Some(path) = cli.path.clone().or_else(|| config.catalog_path.clone()) {
        // A failed load leaves an empty gallery and the error in the status bar.
        let _ = state.load_catalog_from(&path);
    }

    if let Some(ref category) = cli.category {
        let known = state.catalog.categories.iter().any(|c| &c.id == category);
        if known {
            state.gallery.set_category(category);
        } else {
            tracing::warn!(category = %category, "Unknown --category ignored");
        }
    }
    if let Some(ref query) = cli.search {
        state.gallery.set_search(query);
    }
    if let Some(ref id) = cli.case {
        if !state.open_case_by_id(id) {
            tracing::warn!(case_id = %id, "Unknown --case ignored");
        }
    }

    tracing::info!(cases = state.catalog.cases.len(), "Ready to launch GUI");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{}",
                util::constants::APP_NAME,
                util::constants::APP_VERSION
            ))
            .with_inner_size([1200.0, 820.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        util::constants::APP_NAME,
        native_options,
        Box::new(move |cc| {
            configure_fonts(&cc.egui_ctx);
            Ok(Box::new(gui::CaseFolioApp::new(state)))
        }),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        eprintln!("Error: Failed to launch CaseFolio GUI: {e}");
        std::process::exit(1);
    }
}
