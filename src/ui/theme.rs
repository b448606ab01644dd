// CaseFolio - ui/theme.rs
//
// Colour scheme, stage/outcome colour mapping, and layout constants.
// No dependencies on app state or business logic.

use crate::core::model::{Outcome, Stage};
use egui::Color32;

/// Brand accent used for the active pill, counters and arrows.
pub const ACCENT: Color32 = Color32::from_rgb(13, 148, 136); // Teal 600

/// Colour of an image stage badge.
pub fn stage_colour(stage: &Stage) -> Color32 {
    match stage {
        Stage::Before => Color32::from_rgb(217, 119, 6),  // Amber 600
        Stage::During => Color32::from_rgb(37, 99, 235),  // Blue 600
        Stage::After => Color32::from_rgb(22, 163, 74),   // Green 600
        Stage::Xray => Color32::from_rgb(124, 58, 237),   // Violet 600
        Stage::Other => Color32::from_rgb(75, 85, 99),    // Gray 600
    }
}

/// Colour of an outcome badge.
pub fn outcome_colour(outcome: &Outcome) -> Color32 {
    match outcome {
        Outcome::Excellent => Color32::from_rgb(22, 163, 74),     // Green 600
        Outcome::Good => Color32::from_rgb(13, 148, 136),         // Teal 600
        Outcome::Satisfactory => Color32::from_rgb(202, 138, 4),  // Yellow 600
        Outcome::NeedsFollowUp => Color32::from_rgb(220, 38, 38), // Red 600
    }
}

/// Status bar colours.
pub const STATUS_BG: Color32 = Color32::from_rgb(31, 41, 55); // Gray 800
pub const STATUS_TEXT: Color32 = Color32::from_rgb(209, 213, 219); // Gray 300

/// Lightbox backdrop (black at ~90% opacity).
pub const LIGHTBOX_BACKDROP: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 230);

/// Placeholder fill for images that are loading or failed to decode.
pub const PLACEHOLDER_BG: Color32 = Color32::from_rgb(55, 65, 81); // Gray 700

/// Layout constants.
pub const CARD_WIDTH: f32 = 260.0;
pub const CARD_IMAGE_HEIGHT: f32 = 170.0;
pub const CARD_HEIGHT: f32 = 290.0;
pub const LIST_THUMB_SIZE: f32 = 96.0;
/// Thumbnail plus the row frame's margins and stroke.
pub const LIST_ROW_HEIGHT: f32 = LIST_THUMB_SIZE + 14.0;
pub const MAIN_IMAGE_HEIGHT: f32 = 420.0;
pub const CARD_SPACING: f32 = 12.0;
pub const STATUS_BAR_HEIGHT: f32 = 28.0;

/// Apply the dark/light visuals and body font size to the context.
pub fn apply(ctx: &egui::Context, dark_mode: bool, font_size: f32) {
    let mut visuals = if dark_mode {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };
    visuals.selection.bg_fill = ACCENT;
    visuals.hyperlink_color = ACCENT;
    ctx.set_visuals(visuals);

    ctx.style_mut(|style| {
        for (text_style, font) in style.text_styles.iter_mut() {
            font.size = match text_style {
                egui::TextStyle::Heading => font_size * 1.45,
                egui::TextStyle::Small => font_size * 0.75,
                _ => font_size,
            };
        }
    });
}
