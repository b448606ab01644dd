// CaseFolio - ui/panels/gallery.rs
//
// Gallery page: search box, layout toggle, category pills with count
// badges, result counter and the grid/list of case cards. Clicking a card
// opens the case page.

use crate::app::images::ImageVariant;
use crate::app::state::AppState;
use crate::core::model::{Case, ViewMode};
use crate::ui::textures::{self, TextureCache};
use crate::ui::theme;

/// Render the gallery into the central panel.
pub fn render(ui: &mut egui::Ui, state: &mut AppState, textures: &mut TextureCache) {
    render_controls(ui, state);
    ui.add_space(8.0);
    render_category_pills(ui, state);
    ui.add_space(6.0);

    let visible: Vec<usize> = state.gallery.filtered(&state.catalog).to_vec();
    ui.label(
        egui::RichText::new(format!(
            "{} of {} cases found",
            visible.len(),
            state.catalog.cases.len()
        ))
        .small()
        .weak(),
    );
    ui.separator();

    if visible.is_empty() {
        render_empty(ui, state);
        return;
    }

    // Only the rows in view are laid out, so only their cover images are
    // requested from the texture cache.
    let mut clicked = None;
    let locked = state.scroll_lock.is_locked();
    let spacing = theme::CARD_SPACING;
    ui.scope(|ui| {
        ui.spacing_mut().item_spacing.y = spacing;
        let scroll = egui::ScrollArea::vertical()
            .id_salt("gallery_cards")
            .auto_shrink([false; 2])
            .enable_scrolling(!locked);
        match state.gallery.view_mode {
            ViewMode::Grid => {
                let columns = ((ui.available_width() + spacing) / (theme::CARD_WIDTH + spacing))
                    .floor()
                    .max(1.0) as usize;
                let rows = visible.len().div_ceil(columns);
                scroll.show_rows(ui, theme::CARD_HEIGHT + 2.0, rows, |ui, row_range| {
                    for row in row_range {
                        let start = row * columns;
                        let end = (start + columns).min(visible.len());
                        ui.horizontal(|ui| {
                            ui.spacing_mut().item_spacing.x = spacing;
                            for &idx in &visible[start..end] {
                                if grid_card(ui, &state.catalog.cases[idx], textures) {
                                    clicked = Some(idx);
                                }
                            }
                        });
                    }
                });
            }
            ViewMode::List => {
                scroll.show_rows(ui, theme::LIST_ROW_HEIGHT, visible.len(), |ui, row_range| {
                    for &idx in &visible[row_range] {
                        if list_row(ui, &state.catalog.cases[idx], textures) {
                            clicked = Some(idx);
                        }
                    }
                });
            }
        }
    });

    if let Some(idx) = clicked {
        state.open_case(idx);
    }
}

fn render_controls(ui: &mut egui::Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        ui.label("\u{1f50d}");
        ui.add(
            egui::TextEdit::singleline(state.gallery.search_query_mut())
                .hint_text("Search title, treatment, tooth or tag\u{2026}")
                .desired_width(320.0),
        );
        if !state.gallery.filter().search_query.is_empty()
            && ui
                .small_button("\u{2715}")
                .on_hover_text("Clear search")
                .clicked()
        {
            state.gallery.set_search("");
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            for mode in [ViewMode::List, ViewMode::Grid] {
                ui.selectable_value(&mut state.gallery.view_mode, mode, mode.label());
            }
        });
    });
}

fn render_category_pills(ui: &mut egui::Ui, state: &mut AppState) {
    let badges: Vec<usize> = {
        let counts = state.gallery.counts(&state.catalog);
        state
            .catalog
            .categories
            .iter()
            .map(|c| counts.badge(c))
            .collect()
    };

    let mut selected = None;
    ui.horizontal_wrapped(|ui| {
        for (category, badge) in state.catalog.categories.iter().zip(badges) {
            let active = state.gallery.filter().active_category == category.id;
            let text = egui::RichText::new(format!(
                "{} {}  {}",
                category.icon, category.name, badge
            ));
            let text = if active { text.color(theme::ACCENT).strong() } else { text };
            if ui.selectable_label(active, text).clicked() {
                selected = Some(category.id.clone());
            }
        }
    });

    if let Some(id) = selected {
        state.gallery.set_category(&id);
    }
}

fn render_empty(ui: &mut egui::Ui, state: &mut AppState) {
    ui.add_space(48.0);
    ui.vertical_centered(|ui| {
        ui.label(egui::RichText::new("\u{1f50d}").size(32.0).weak());
        ui.add_space(8.0);
        ui.heading("No cases found");
        ui.label(
            egui::RichText::new("No cases match your search. Try different keywords or filters.")
                .weak(),
        );
        if !state.gallery.filter().is_empty() {
            ui.add_space(8.0);
            if ui.button("Clear filters").clicked() {
                state.gallery.reset_filter();
            }
        }
    });
}

/// One grid card. Returns true when clicked.
fn grid_card(ui: &mut egui::Ui, case: &Case, textures: &mut TextureCache) -> bool {
    let frame = egui::Frame::group(ui.style()).inner_margin(8.0).show(ui, |ui| {
        ui.set_width(theme::CARD_WIDTH - 16.0);
        ui.set_height(theme::CARD_HEIGHT - 16.0);
        ui.vertical(|ui| {
            textures::show_image(
                ui,
                textures,
                case.cover_image(),
                ImageVariant::Thumbnail,
                case.cover_alt(),
                egui::vec2(theme::CARD_WIDTH - 16.0, theme::CARD_IMAGE_HEIGHT),
                egui::Sense::hover(),
            );
            ui.horizontal(|ui| {
                badge(ui, case.category_label(), theme::ACCENT);
                if case.featured {
                    badge(ui, "\u{2b50} Featured", egui::Color32::from_rgb(217, 119, 6));
                }
                if case.extra_image_count() > 0 {
                    ui.label(
                        egui::RichText::new(format!("+{} images", case.extra_image_count()))
                            .small()
                            .weak(),
                    );
                }
            });
            ui.horizontal(|ui| {
                ui.add(egui::Label::new(egui::RichText::new(&case.title).strong()).truncate());
                if let Some(outcome) = &case.outcome {
                    badge(ui, outcome.label(), theme::outcome_colour(outcome));
                }
            });
            ui.add(egui::Label::new(egui::RichText::new(&case.treatment).weak()).truncate());
            meta_line(ui, case);
        });
    });
    frame
        .response
        .interact(egui::Sense::click())
        .on_hover_cursor(egui::CursorIcon::PointingHand)
        .clicked()
}

/// One list row. Returns true when clicked.
fn list_row(ui: &mut egui::Ui, case: &Case, textures: &mut TextureCache) -> bool {
    let frame = egui::Frame::group(ui.style()).inner_margin(6.0).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            textures::show_image(
                ui,
                textures,
                case.cover_image(),
                ImageVariant::Thumbnail,
                case.cover_alt(),
                egui::vec2(theme::LIST_THUMB_SIZE, theme::LIST_THUMB_SIZE),
                egui::Sense::hover(),
            );
            ui.vertical(|ui| {
                ui.horizontal(|ui| {
                    badge(ui, case.category_label(), theme::ACCENT);
                    if case.featured {
                        ui.label("\u{2b50}");
                    }
                });
                ui.label(egui::RichText::new(&case.title).strong());
                ui.add(egui::Label::new(egui::RichText::new(&case.treatment).weak()).truncate());
                meta_line(ui, case);
            });
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(egui::RichText::new("\u{203a}").size(22.0).weak());
            });
        });
    });
    frame
        .response
        .interact(egui::Sense::click())
        .on_hover_cursor(egui::CursorIcon::PointingHand)
        .clicked()
}

/// Date, tooth number and image count.
fn meta_line(ui: &mut egui::Ui, case: &Case) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(case.formatted_date()).small().weak());
        if let Some(tooth) = &case.tooth_number {
            ui.label(egui::RichText::new(format!("Tooth #{tooth}")).small().weak());
        }
        if !case.images.is_empty() {
            ui.label(
                egui::RichText::new(format!("\u{1f5bc} {}", case.images.len()))
                    .small()
                    .weak(),
            );
        }
    });
}

/// Small coloured pill.
pub fn badge(ui: &mut egui::Ui, text: &str, colour: egui::Color32) {
    ui.label(
        egui::RichText::new(format!(" {text} "))
            .small()
            .color(colour)
            .background_color(colour.gamma_multiply(0.15)),
    );
}
