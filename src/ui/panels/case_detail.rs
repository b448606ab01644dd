// CaseFolio - ui/panels/case_detail.rs
//
// Case page: header, image viewer, and the clinical write-up.

use crate::app::state::AppState;
use crate::core::model::Case;
use crate::ui::panels::{gallery, viewer};
use crate::ui::textures::TextureCache;
use crate::ui::theme;

/// Render the open case page into the central panel.
pub fn render(ui: &mut egui::Ui, state: &mut AppState, textures: &mut TextureCache) {
    let thumbnail_size = state.thumbnail_size;
    let locked = state.scroll_lock.is_locked();
    let mut back = false;

    {
        let Some(view) = state.open_case.as_mut() else {
            return;
        };
        let Some(case) = state.catalog.cases.get(view.case_index) else {
            return;
        };

        if ui.button("\u{2190} Back to gallery").clicked() {
            back = true;
        }
        ui.add_space(6.0);

        egui::ScrollArea::vertical()
            .id_salt("case_detail")
            .auto_shrink([false; 2])
            .enable_scrolling(!locked)
            .show(ui, |ui| {
                header(ui, case);
                ui.add_space(12.0);
                viewer::render(ui, view, case, textures, thumbnail_size);
                ui.add_space(16.0);
                clinical_notes(ui, case);
            });
    }

    if back {
        state.close_case();
    }
}

/// Render the lightbox of the open case over everything else.
pub fn render_overlay(ctx: &egui::Context, state: &mut AppState, textures: &mut TextureCache) {
    let Some(view) = state.open_case.as_mut() else {
        return;
    };
    if let Some(case) = state.catalog.cases.get(view.case_index) {
        viewer::render_lightbox(ctx, view, case, textures);
    }
}

fn header(ui: &mut egui::Ui, case: &Case) {
    ui.horizontal(|ui| {
        gallery::badge(
            ui,
            &format!("{} {}", case.category.icon(), case.category_label()),
            theme::ACCENT,
        );
        if case.featured {
            gallery::badge(ui, "\u{2b50} Featured", egui::Color32::from_rgb(217, 119, 6));
        }
        if let Some(outcome) = &case.outcome {
            gallery::badge(ui, outcome.label(), theme::outcome_colour(outcome));
        }
    });
    ui.heading(&case.title);
    ui.label(egui::RichText::new(&case.treatment).weak());
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(case.formatted_date()).small().weak());
        if let Some(tooth) = &case.tooth_number {
            ui.label(egui::RichText::new(format!("Tooth #{tooth}")).small().weak());
        }
        let patient = match (case.patient_age, &case.patient_gender) {
            (Some(age), Some(gender)) => Some(format!("{age}y {}", gender.label())),
            (Some(age), None) => Some(format!("{age}y")),
            (None, Some(gender)) => Some(gender.label().to_string()),
            (None, None) => None,
        };
        if let Some(patient) = patient {
            ui.label(egui::RichText::new(format!("Patient: {patient}")).small().weak());
        }
    });
}

fn clinical_notes(ui: &mut egui::Ui, case: &Case) {
    section(ui, "Chief Complaint", case.chief_complaint.as_deref());
    section(ui, "Diagnosis", case.diagnosis.as_deref());
    list_section(ui, "Materials Used", &case.materials);
    list_section(ui, "Difficulties Encountered", &case.difficulties);
    section(ui, "Key Learnings", case.learnings.as_deref());
    section(ui, "Follow-up", case.follow_up.as_deref());

    if !case.tags.is_empty() {
        ui.add_space(8.0);
        ui.horizontal_wrapped(|ui| {
            for tag in &case.tags {
                ui.label(egui::RichText::new(format!("#{tag}")).small().weak());
            }
        });
    }
}

fn section(ui: &mut egui::Ui, title: &str, body: Option<&str>) {
    let Some(body) = body.filter(|b| !b.trim().is_empty()) else {
        return;
    };
    ui.add_space(8.0);
    ui.label(egui::RichText::new(title).strong());
    ui.label(body);
}

fn list_section(ui: &mut egui::Ui, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    ui.add_space(8.0);
    ui.label(egui::RichText::new(title).strong());
    for item in items {
        ui.label(format!("\u{2022} {item}"));
    }
}
