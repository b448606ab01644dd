// CaseFolio - ui/panels/warnings.rs
//
// Catalog warnings window: problems found while loading the current
// catalog (skipped cases, truncated image lists, unknown categories).

use crate::app::state::AppState;

/// Render the catalog warnings dialog (if state.show_warnings is true).
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    if !state.show_warnings {
        return;
    }

    let mut open = true;
    egui::Window::new("Catalog Warnings")
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .min_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            if let Some(source) = &state.catalog.source {
                ui.label(egui::RichText::new(source.display().to_string()).small().weak());
                ui.add_space(4.0);
            }

            if state.catalog_warnings.is_empty() {
                ui.label("The catalog loaded without warnings.");
                return;
            }

            ui.strong(format!("{} warning(s)", state.catalog_warnings.len()));
            ui.separator();
            egui::ScrollArea::vertical()
                .id_salt("catalog_warnings")
                .max_height(320.0)
                .show(ui, |ui| {
                    for warning in &state.catalog_warnings {
                        ui.colored_label(
                            egui::Color32::from_rgb(253, 186, 116), // Orange 300
                            format!("\u{26a0} {warning}"),
                        );
                    }
                });
        });

    if !open {
        state.show_warnings = false;
    }
}
