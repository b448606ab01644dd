// CaseFolio - ui/panels/viewer.rs
//
// Case image viewer: main image with stage badge, arrows and counter,
// caption, thumbnail strip, and the full-screen lightbox overlay.
//
// Widgets only report what was clicked; transitions are applied to the
// `ImageViewer` after drawing so a frame never renders a half-updated state.

use crate::app::detail::CaseView;
use crate::app::images::ImageVariant;
use crate::core::model::{Case, CaseImage};
use crate::ui::textures::{self, TextureCache};
use crate::ui::theme;

/// A click collected while drawing.
enum Action {
    Next,
    Prev,
    Select(usize),
    OpenLightbox,
    CloseLightbox,
}

/// Render the inline viewer. Cases without images render nothing.
pub fn render(
    ui: &mut egui::Ui,
    view: &mut CaseView,
    case: &Case,
    textures: &mut TextureCache,
    thumbnail_size: f32,
) {
    let Some(viewer) = view.viewer() else {
        return;
    };
    let count = viewer.count();
    let selected = viewer.selected_index();
    let lightbox_open = viewer.is_lightbox_open();
    let Some(image) = case.images.get(selected) else {
        return;
    };

    let mut action = None;

    // Main image
    let area_size = egui::vec2(ui.available_width(), theme::MAIN_IMAGE_HEIGHT);
    let (area, _) = ui.allocate_exact_size(area_size, egui::Sense::hover());
    ui.painter()
        .rect_filled(area, 12.0, egui::Color32::from_rgb(15, 23, 42)); // Slate 900
    let main = ui.put(area, |ui: &mut egui::Ui| {
        textures::show_image(
            ui,
            textures,
            Some(image.src.as_path()),
            ImageVariant::Full,
            &image.alt,
            area_size,
            egui::Sense::click(),
        )
    });
    if main
        .on_hover_cursor(egui::CursorIcon::ZoomIn)
        .on_hover_text("Click to zoom")
        .clicked()
    {
        action = Some(Action::OpenLightbox);
    }

    if let Some(stage) = image.stage {
        paint_badge(
            ui.painter(),
            area.left_top() + egui::vec2(12.0, 12.0),
            egui::Align2::LEFT_TOP,
            stage.label(),
            theme::stage_colour(&stage),
        );
    }

    if count > 1 {
        if let Some(a) = arrow_buttons(ui, area, 36.0) {
            action = Some(a);
        }
        paint_badge(
            ui.painter(),
            area.center_bottom() - egui::vec2(0.0, 12.0),
            egui::Align2::CENTER_BOTTOM,
            &format!("{} / {}", selected + 1, count),
            egui::Color32::WHITE,
        );
    }

    // The lightbox takes over touch input while it is open.
    if !lightbox_open {
        handle_touch(ui.ctx(), view, area);
    }

    // Caption
    ui.add_space(6.0);
    ui.vertical_centered(|ui| {
        ui.label(egui::RichText::new(&image.alt).weak());
    });

    // Thumbnail strip
    if count > 1 {
        ui.add_space(6.0);
        egui::ScrollArea::horizontal()
            .id_salt("viewer_thumbnails")
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    for (i, thumb) in case.images.iter().enumerate() {
                        if thumbnail(ui, textures, thumb, i == selected, thumbnail_size) {
                            action = Some(Action::Select(i));
                        }
                    }
                });
            });
    }

    apply(view, action);
}

/// Render the lightbox overlay for the open case, if it is open.
pub fn render_lightbox(
    ctx: &egui::Context,
    view: &mut CaseView,
    case: &Case,
    textures: &mut TextureCache,
) {
    let Some(viewer) = view.viewer() else {
        return;
    };
    if !viewer.is_lightbox_open() {
        return;
    }
    let count = viewer.count();
    let selected = viewer.selected_index();
    let Some(image) = case.images.get(selected) else {
        return;
    };

    let screen = ctx.screen_rect();
    let mut action = None;

    egui::Area::new(egui::Id::new("case_lightbox"))
        .order(egui::Order::Foreground)
        .fixed_pos(screen.min)
        .show(ctx, |ui| {
            let (backdrop_rect, backdrop) =
                ui.allocate_exact_size(screen.size(), egui::Sense::click());
            ui.painter()
                .rect_filled(backdrop_rect, 0.0, theme::LIGHTBOX_BACKDROP);

            // Clicks on the image itself must not reach the backdrop.
            let max = screen.size() * 0.9;
            let image_rect = egui::Rect::from_center_size(screen.center(), max);
            ui.put(image_rect, |ui: &mut egui::Ui| {
                textures::show_image(
                    ui,
                    textures,
                    Some(image.src.as_path()),
                    ImageVariant::Full,
                    &image.alt,
                    max,
                    egui::Sense::click(),
                )
            });

            let close_rect = egui::Rect::from_min_size(
                egui::pos2(screen.right() - 60.0, screen.top() + 16.0),
                egui::vec2(44.0, 44.0),
            );
            let close = ui.put(
                close_rect,
                egui::Button::new(egui::RichText::new("\u{2715}").size(20.0)),
            );
            if close.on_hover_text("Close (Esc)").clicked() {
                action = Some(Action::CloseLightbox);
            }

            if count > 1 {
                if let Some(a) = arrow_buttons(ui, screen, 44.0) {
                    action = Some(a);
                }
            }
            ui.painter().text(
                screen.center_bottom() - egui::vec2(0.0, 20.0),
                egui::Align2::CENTER_BOTTOM,
                format!("{} / {}", selected + 1, count),
                egui::FontId::proportional(14.0),
                egui::Color32::WHITE,
            );

            if action.is_none() && backdrop.clicked() {
                action = Some(Action::CloseLightbox);
            }
        });

    handle_touch(ctx, view, screen);
    apply(view, action);
}

/// Previous/next buttons on the left and right edges of `rect`.
fn arrow_buttons(ui: &mut egui::Ui, rect: egui::Rect, size: f32) -> Option<Action> {
    let inset = size / 2.0 + 12.0;
    let left = egui::Rect::from_center_size(
        rect.left_center() + egui::vec2(inset, 0.0),
        egui::vec2(size, size),
    );
    let right = egui::Rect::from_center_size(
        rect.right_center() - egui::vec2(inset, 0.0),
        egui::vec2(size, size),
    );
    let arrow = |glyph: &str| egui::Button::new(egui::RichText::new(glyph).size(size * 0.5));

    if ui.put(left, arrow("\u{25c0}")).on_hover_text("Previous").clicked() {
        return Some(Action::Prev);
    }
    if ui.put(right, arrow("\u{25b6}")).on_hover_text("Next").clicked() {
        return Some(Action::Next);
    }
    None
}

/// One thumbnail button. Returns true when clicked.
fn thumbnail(
    ui: &mut egui::Ui,
    textures: &mut TextureCache,
    image: &CaseImage,
    selected: bool,
    size: f32,
) -> bool {
    let inner = ui.scope(|ui| {
        if !selected {
            ui.multiply_opacity(0.6);
        }
        textures::show_image(
            ui,
            textures,
            Some(image.src.as_path()),
            ImageVariant::Thumbnail,
            &image.alt,
            egui::vec2(size, size),
            egui::Sense::click(),
        )
    });
    let response = inner.inner;
    if selected {
        ui.painter().rect_stroke(
            response.rect.expand(2.0),
            6.0,
            egui::Stroke::new(2.0, theme::ACCENT),
            egui::StrokeKind::Outside,
        );
    }
    if let Some(stage) = image.stage {
        paint_badge(
            ui.painter(),
            response.rect.center_bottom() - egui::vec2(0.0, 4.0),
            egui::Align2::CENTER_BOTTOM,
            stage.label(),
            theme::stage_colour(&stage),
        );
    }
    response.clicked()
}

/// Text on a translucent rounded background.
fn paint_badge(
    painter: &egui::Painter,
    pos: egui::Pos2,
    anchor: egui::Align2,
    text: &str,
    colour: egui::Color32,
) {
    let galley = painter.layout_no_wrap(
        text.to_string(),
        egui::FontId::proportional(12.0),
        colour,
    );
    let padding = egui::vec2(8.0, 3.0);
    let rect = anchor.anchor_size(pos, galley.size() + padding * 2.0);
    painter.rect_filled(rect, 10.0, egui::Color32::from_black_alpha(160));
    painter.galley(rect.min + padding, galley, colour);
}

/// Feed touch events that start inside `rect` to the swipe tracker.
fn handle_touch(ctx: &egui::Context, view: &mut CaseView, rect: egui::Rect) {
    let touches: Vec<(egui::TouchPhase, egui::Pos2)> = ctx.input(|i| {
        i.events
            .iter()
            .filter_map(|event| match event {
                egui::Event::Touch { phase, pos, .. } => Some((*phase, *pos)),
                _ => None,
            })
            .collect()
    });

    for (phase, pos) in touches {
        match phase {
            egui::TouchPhase::Start if rect.contains(pos) => view.touch_start(pos.x),
            egui::TouchPhase::End => view.touch_end(pos.x),
            egui::TouchPhase::Cancel => view.touch_cancel(),
            _ => {}
        }
    }
}

fn apply(view: &mut CaseView, action: Option<Action>) {
    let Some(viewer) = view.viewer_mut() else {
        return;
    };
    let result = match action {
        None => Ok(()),
        Some(Action::Next) => {
            viewer.next();
            Ok(())
        }
        Some(Action::Prev) => {
            viewer.prev();
            Ok(())
        }
        Some(Action::Select(i)) => viewer.select(i),
        Some(Action::OpenLightbox) => {
            let index = viewer.selected_index();
            viewer.open_lightbox(index)
        }
        Some(Action::CloseLightbox) => {
            viewer.close_lightbox();
            Ok(())
        }
    };
    if let Err(e) = result {
        tracing::warn!(error = %e, "Viewer action rejected");
    }
}
