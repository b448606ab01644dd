// CaseFolio - gui.rs
//
// Top-level eframe::App implementation.
// Wires together the panels, routes window-level keys to the mounted case
// page and feeds decoded images into the texture cache.

use crate::app::state::AppState;
use crate::core::input::NavKey;
use crate::ui;
use crate::ui::textures::TextureCache;
use crate::util::constants;

/// The CaseFolio application.
pub struct CaseFolioApp {
    pub state: AppState,
    textures: TextureCache,
    /// Catalog revision the texture cache was filled for.
    textures_revision: u64,
    /// (dark mode, font size) last pushed to the egui context.
    applied_style: Option<(bool, f32)>,
}

impl CaseFolioApp {
    /// Create a new application instance with the given state.
    pub fn new(state: AppState) -> Self {
        let textures_revision = state.catalog.revision();
        Self {
            state,
            textures: TextureCache::new(),
            textures_revision,
            applied_style: None,
        }
    }

    fn open_catalog_dialog(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Case catalog", constants::CATALOG_EXTENSIONS)
            .pick_file()
        else {
            return;
        };
        // Errors are already reported in the status bar.
        let _ = self.state.load_catalog_from(&path);
    }

    /// Map this frame's key presses onto the window-level router.
    fn route_keys(&mut self, ctx: &egui::Context) {
        let keys: Vec<NavKey> = ctx.input(|i| {
            [
                (egui::Key::ArrowLeft, NavKey::ArrowLeft),
                (egui::Key::ArrowRight, NavKey::ArrowRight),
                (egui::Key::Escape, NavKey::Escape),
            ]
            .into_iter()
            .filter(|(key, _)| i.key_pressed(*key))
            .map(|(_, nav)| nav)
            .collect()
        });
        for key in keys {
            self.state.key_router.dispatch(key);
        }
        if let Some(view) = self.state.open_case.as_mut() {
            view.pump_keys();
        }
    }

    fn menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Catalog\u{2026}").clicked() {
                        ui.close_menu();
                        self.open_catalog_dialog();
                    }
                    let source = self.state.catalog.source.clone();
                    ui.add_enabled_ui(source.is_some(), |ui| {
                        if ui.button("Reload Catalog").clicked() {
                            ui.close_menu();
                            if let Some(path) = source {
                                let _ = self.state.load_catalog_from(&path);
                            }
                        }
                    });
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("View", |ui| {
                    let mode = &mut self.state.gallery.view_mode;
                    for option in [
                        crate::core::model::ViewMode::Grid,
                        crate::core::model::ViewMode::List,
                    ] {
                        if ui.radio_value(mode, option, option.label()).clicked() {
                            ui.close_menu();
                        }
                    }
                    ui.separator();
                    ui.checkbox(&mut self.state.dark_mode, "Dark mode");
                    ui.add_enabled_ui(!self.state.gallery.filter().is_empty(), |ui| {
                        if ui.button("Clear Filters").clicked() {
                            self.state.gallery.reset_filter();
                            ui.close_menu();
                        }
                    });
                    ui.separator();
                    let label = format!("Catalog Warnings ({})", self.state.catalog_warnings.len());
                    if ui.button(label).clicked() {
                        self.state.show_warnings = true;
                        ui.close_menu();
                    }
                    if ui.button("About").clicked() {
                        self.state.show_about = true;
                        ui.close_menu();
                    }
                });
            });
        });
    }

    fn status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(egui::Frame::new().fill(ui::theme::STATUS_BG).inner_margin(4.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(ui::theme::STATUS_TEXT, &self.state.status_message);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let total = self.state.catalog.cases.len();
                        if total > 0 {
                            let shown = self.state.gallery.filtered(&self.state.catalog).len();
                            ui.colored_label(
                                ui::theme::STATUS_TEXT,
                                format!("{shown}/{total} cases"),
                            );
                        }
                        if self.state.debug_mode {
                            ui.separator();
                            ui.colored_label(
                                ui::theme::STATUS_TEXT,
                                format!("{} texture(s)", self.textures.resident()),
                            );
                        }
                        let pending = self.textures.pending();
                        if pending > 0 {
                            ui.separator();
                            ui.colored_label(
                                ui::theme::STATUS_TEXT,
                                format!("Loading {pending} image(s)\u{2026}"),
                            );
                        }
                    });
                });
            });
    }

    fn welcome(&mut self, ui: &mut egui::Ui) {
        ui.add_space(80.0);
        ui.vertical_centered(|ui| {
            ui.label(egui::RichText::new(constants::ALL_CATEGORY_ICON).size(48.0));
            ui.heading(constants::APP_NAME);
            ui.label(egui::RichText::new("No catalog loaded.").weak());
            ui.add_space(12.0);
            if ui.button("Open Catalog\u{2026}").clicked() {
                self.open_catalog_dialog();
            }
        });
    }
}

impl eframe::App for CaseFolioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let style = (self.state.dark_mode, self.state.font_size);
        if self.applied_style != Some(style) {
            ui::theme::apply(ctx, style.0, style.1);
            self.applied_style = Some(style);
        }

        // A different catalog invalidates every texture.
        if self.textures_revision != self.state.catalog.revision() {
            self.textures.clear();
            self.textures_revision = self.state.catalog.revision();
        }
        if self.textures.poll(ctx) {
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        }

        self.route_keys(ctx);

        self.menu_bar(ctx);
        self.status_bar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.open_case.is_some() {
                ui::panels::case_detail::render(ui, &mut self.state, &mut self.textures);
            } else if self.state.catalog.is_empty() && self.state.catalog.source.is_none() {
                self.welcome(ui);
            } else {
                ui::panels::gallery::render(ui, &mut self.state, &mut self.textures);
            }
        });

        ui::panels::case_detail::render_overlay(ctx, &mut self.state, &mut self.textures);
        ui::panels::warnings::render(ctx, &mut self.state);
        ui::panels::about::render(ctx, &mut self.state);
    }
}
