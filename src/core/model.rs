// CaseFolio - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// Field names deserialise in camelCase so a catalog exported from the
// portfolio site's content collection can be loaded unchanged.

use crate::util::constants;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

// =============================================================================
// Case (one documented clinical case)
// =============================================================================

/// A single clinical case record with its images and metadata.
///
/// Immutable once loaded; the catalog owns every case for the lifetime of
/// the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    /// Unique identifier (the content slug on the site).
    pub id: String,

    pub title: String,

    pub category: CaseCategory,

    /// Date the case was treated. Catalogs carry it as `YYYY-MM-DD` or as a
    /// datetime, whose time part is dropped (see `parse_case_date`).
    #[serde(deserialize_with = "deserialize_case_date")]
    pub date: NaiveDate,

    /// Short description of the treatment performed.
    pub treatment: String,

    #[serde(default)]
    pub patient_age: Option<u32>,

    #[serde(default)]
    pub patient_gender: Option<Gender>,

    /// Tooth number in whatever notation the author uses (e.g. "36", "UR6").
    #[serde(default)]
    pub tooth_number: Option<String>,

    #[serde(default)]
    pub chief_complaint: Option<String>,

    #[serde(default)]
    pub diagnosis: Option<String>,

    #[serde(default)]
    pub materials: Vec<String>,

    #[serde(default)]
    pub difficulties: Vec<String>,

    #[serde(default)]
    pub learnings: Option<String>,

    #[serde(default)]
    pub outcome: Option<Outcome>,

    #[serde(default)]
    pub follow_up: Option<String>,

    /// Ordered image set shown by the case viewer.
    #[serde(default)]
    pub images: Vec<CaseImage>,

    /// Optional dedicated card image; falls back to the first image.
    #[serde(default)]
    pub thumbnail: Option<PathBuf>,

    #[serde(default)]
    pub featured: bool,

    #[serde(default)]
    pub tags: Vec<String>,
}

impl Case {
    /// Image shown on the gallery card: the thumbnail, else the first image.
    /// `None` means the card renders a placeholder.
    pub fn cover_image(&self) -> Option<&Path> {
        self.thumbnail
            .as_deref()
            .or_else(|| self.images.first().map(|img| img.src.as_path()))
    }

    /// Alt text for the card image: first image's alt, else the case title.
    pub fn cover_alt(&self) -> &str {
        self.images
            .first()
            .map(|img| img.alt.as_str())
            .filter(|alt| !alt.is_empty())
            .unwrap_or(self.title.as_str())
    }

    /// Number of images beyond the cover, for the "+N images" badge.
    pub fn extra_image_count(&self) -> usize {
        self.images.len().saturating_sub(1)
    }

    /// Date in the short en-US form used on cards, e.g. "Mar 5, 2024".
    pub fn formatted_date(&self) -> String {
        self.date.format("%b %-d, %Y").to_string()
    }

    /// Display label of the case's category.
    pub fn category_label(&self) -> &'static str {
        self.category.label()
    }
}

/// Parse a catalog date. Accepts a plain `YYYY-MM-DD` date, an RFC 3339
/// datetime (`2024-01-10T00:00:00.000Z`) or a datetime without offset.
/// Datetimes keep the calendar date as written, in their own offset.
pub fn parse_case_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|datetime| datetime.date())
}

/// Deserialise a case date from a string, or from a TOML date/datetime
/// value (which the toml crate hands over as a single-entry map).
fn deserialize_case_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    struct CaseDateVisitor;

    impl<'de> de::Visitor<'de> for CaseDateVisitor {
        type Value = NaiveDate;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a YYYY-MM-DD date or an RFC 3339 datetime")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<NaiveDate, E> {
            parse_case_date(value).ok_or_else(|| E::invalid_value(de::Unexpected::Str(value), &self))
        }

        fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<NaiveDate, A::Error> {
            match map.next_entry::<String, String>()? {
                Some((_, value)) => self.visit_str(&value),
                None => Err(de::Error::invalid_length(0, &self)),
            }
        }
    }

    deserializer.deserialize_any(CaseDateVisitor)
}

// =============================================================================
// Case category
// =============================================================================

/// Fixed set of clinical categories a case can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaseCategory {
    Restorations,
    Endodontics,
    FixedProsthodontics,
    Extractions,
    Periodontics,
    Other,
}

impl CaseCategory {
    /// Returns all variants in display order.
    pub fn all() -> &'static [CaseCategory] {
        &[
            CaseCategory::Restorations,
            CaseCategory::Endodontics,
            CaseCategory::FixedProsthodontics,
            CaseCategory::Extractions,
            CaseCategory::Periodontics,
            CaseCategory::Other,
        ]
    }

    /// Stable identifier, identical to the serialised form.
    pub fn id(&self) -> &'static str {
        match self {
            CaseCategory::Restorations => "restorations",
            CaseCategory::Endodontics => "endodontics",
            CaseCategory::FixedProsthodontics => "fixed-prosthodontics",
            CaseCategory::Extractions => "extractions",
            CaseCategory::Periodontics => "periodontics",
            CaseCategory::Other => "other",
        }
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            CaseCategory::Restorations => "Restorations",
            CaseCategory::Endodontics => "Endodontics",
            CaseCategory::FixedProsthodontics => "Fixed Prosthodontics",
            CaseCategory::Extractions => "Extractions",
            CaseCategory::Periodontics => "Periodontics",
            CaseCategory::Other => "Other",
        }
    }

    /// Default pill icon.
    pub fn icon(&self) -> &'static str {
        match self {
            CaseCategory::Restorations => "\u{2728}",
            CaseCategory::Endodontics => "\u{1f52c}",
            CaseCategory::FixedProsthodontics => "\u{1f451}",
            CaseCategory::Extractions => "\u{1fa7a}",
            CaseCategory::Periodontics => "\u{1f33f}",
            CaseCategory::Other => "\u{1f4cb}",
        }
    }

    /// Look up a category by its identifier.
    pub fn from_id(id: &str) -> Option<CaseCategory> {
        Self::all().iter().copied().find(|c| c.id() == id)
    }
}

impl std::fmt::Display for CaseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Clinical metadata enums
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

/// Treatment outcome as recorded by the clinician.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    Excellent,
    Good,
    Satisfactory,
    NeedsFollowUp,
}

impl Outcome {
    /// Badge text. Only the first hyphen of the id becomes a space, so
    /// `needs-follow-up` reads "needs follow-up".
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Excellent => "excellent",
            Outcome::Good => "good",
            Outcome::Satisfactory => "satisfactory",
            Outcome::NeedsFollowUp => "needs follow-up",
        }
    }
}

// =============================================================================
// Case images
// =============================================================================

/// One image within a case's ordered image set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseImage {
    /// Resolved image location. Relative paths are resolved against the
    /// catalog directory at load time.
    pub src: PathBuf,

    #[serde(default)]
    pub alt: String,

    /// Position of the image in the treatment timeline, if tagged.
    #[serde(default)]
    pub stage: Option<Stage>,
}

/// Classification of an image within the treatment timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Before,
    During,
    After,
    Xray,
    Other,
}

impl Stage {
    /// Badge label.
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Before => "Before",
            Stage::During => "During",
            Stage::After => "After",
            Stage::Xray => "X-Ray",
            Stage::Other => "Other",
        }
    }
}

// =============================================================================
// Category pills (static gallery configuration)
// =============================================================================

/// One filter pill in the gallery header.
///
/// Categories are configuration, not derived from cases: a pill may exist
/// with zero matching cases and simply shows a 0 badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
}

impl Category {
    /// True for the catch-all pill that disables the category predicate.
    pub fn is_all(&self) -> bool {
        self.id == constants::ALL_CATEGORY_ID
    }
}

/// Default pill list: "all" followed by every `CaseCategory` in display order.
pub fn default_categories() -> Vec<Category> {
    let mut categories = Vec::with_capacity(CaseCategory::all().len() + 1);
    categories.push(Category {
        id: constants::ALL_CATEGORY_ID.to_string(),
        name: constants::ALL_CATEGORY_NAME.to_string(),
        icon: constants::ALL_CATEGORY_ICON.to_string(),
    });
    categories.extend(CaseCategory::all().iter().map(|c| Category {
        id: c.id().to_string(),
        name: c.label().to_string(),
        icon: c.icon().to_string(),
    }));
    categories
}

// =============================================================================
// Gallery layout
// =============================================================================

/// How the gallery lays out case cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Grid => "Grid",
            ViewMode::List => "List",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_case(images: Vec<CaseImage>) -> Case {
        Case {
            id: "molar-rct".to_string(),
            title: "Molar RCT".to_string(),
            category: CaseCategory::Endodontics,
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            treatment: "Root canal treatment".to_string(),
            patient_age: None,
            patient_gender: None,
            tooth_number: None,
            chief_complaint: None,
            diagnosis: None,
            materials: Vec::new(),
            difficulties: Vec::new(),
            learnings: None,
            outcome: None,
            follow_up: None,
            images,
            thumbnail: None,
            featured: false,
            tags: Vec::new(),
        }
    }

    fn image(src: &str, alt: &str) -> CaseImage {
        CaseImage {
            src: PathBuf::from(src),
            alt: alt.to_string(),
            stage: None,
        }
    }

    #[test]
    fn test_cover_prefers_thumbnail() {
        let mut case = make_case(vec![image("a.jpg", "Pre-op")]);
        case.thumbnail = Some(PathBuf::from("thumb.jpg"));
        assert_eq!(case.cover_image(), Some(Path::new("thumb.jpg")));
    }

    #[test]
    fn test_cover_falls_back_to_first_image_then_none() {
        let case = make_case(vec![image("a.jpg", "Pre-op"), image("b.jpg", "Post-op")]);
        assert_eq!(case.cover_image(), Some(Path::new("a.jpg")));
        assert_eq!(case.extra_image_count(), 1);

        let empty = make_case(Vec::new());
        assert_eq!(empty.cover_image(), None);
        assert_eq!(empty.extra_image_count(), 0);
        assert_eq!(empty.cover_alt(), "Molar RCT");
    }

    #[test]
    fn test_formatted_date_is_short_us_form() {
        let case = make_case(Vec::new());
        assert_eq!(case.formatted_date(), "Mar 5, 2024");
    }

    #[test]
    fn test_category_ids_round_trip() {
        for category in CaseCategory::all() {
            assert_eq!(CaseCategory::from_id(category.id()), Some(*category));
        }
        assert_eq!(CaseCategory::from_id("all"), None);
    }

    #[test]
    fn test_outcome_label_replaces_first_hyphen_only() {
        assert_eq!(Outcome::NeedsFollowUp.label(), "needs follow-up");
    }

    #[test]
    fn test_default_categories_start_with_all() {
        let categories = default_categories();
        assert!(categories[0].is_all());
        assert_eq!(categories.len(), CaseCategory::all().len() + 1);
        assert_eq!(categories[3].id, "fixed-prosthodontics");
    }

    #[test]
    fn test_parse_case_date_forms() {
        let jan_10 = NaiveDate::from_ymd_opt(2024, 1, 10);
        assert_eq!(parse_case_date("2024-01-10"), jan_10);
        assert_eq!(parse_case_date("2024-01-10T00:00:00.000Z"), jan_10);
        assert_eq!(parse_case_date("2024-01-10T23:30:00-05:00"), jan_10);
        assert_eq!(parse_case_date("2024-01-10T08:15:00"), jan_10);
        assert_eq!(parse_case_date(" 2024-01-10 "), jan_10);
        assert_eq!(parse_case_date("10/01/2024"), None);
        assert_eq!(parse_case_date("2024-13-01"), None);
    }

    #[test]
    fn test_case_date_accepts_iso_datetime() {
        let json = r#"{
            "id": "c", "title": "Crown", "category": "fixed-prosthodontics",
            "date": "2024-01-10T00:00:00.000Z", "treatment": "Crown"
        }"#;
        let case: Case = serde_json::from_str(json).unwrap();
        assert_eq!(case.formatted_date(), "Jan 10, 2024");
    }

    #[test]
    fn test_case_date_accepts_toml_date_values() {
        #[derive(Deserialize)]
        struct Doc {
            cases: Vec<Case>,
        }
        let doc: Doc = toml::from_str(
            r#"
[[cases]]
id = "a"
title = "A"
category = "other"
date = 2024-01-10
treatment = "x"

[[cases]]
id = "b"
title = "B"
category = "other"
date = 2024-01-10T09:30:00Z
treatment = "y"
"#,
        )
        .unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert_eq!(doc.cases[0].date, expected);
        assert_eq!(doc.cases[1].date, expected);
    }

    #[test]
    fn test_case_date_rejects_garbage() {
        let json = r#"{
            "id": "c", "title": "Crown", "category": "other",
            "date": "last tuesday", "treatment": "Crown"
        }"#;
        assert!(serde_json::from_str::<Case>(json).is_err());
    }

    #[test]
    fn test_case_deserialises_camel_case_fields() {
        let json = r#"{
            "id": "bridge-1",
            "title": "Three-unit bridge",
            "category": "fixed-prosthodontics",
            "date": "2023-11-20",
            "treatment": "Zirconia bridge",
            "toothNumber": "24-26",
            "followUp": "6 months",
            "outcome": "needs-follow-up",
            "images": [{ "src": "img/pre.jpg", "alt": "Pre-op", "stage": "xray" }]
        }"#;
        let case: Case = serde_json::from_str(json).unwrap();
        assert_eq!(case.category, CaseCategory::FixedProsthodontics);
        assert_eq!(case.tooth_number.as_deref(), Some("24-26"));
        assert_eq!(case.follow_up.as_deref(), Some("6 months"));
        assert_eq!(case.outcome, Some(Outcome::NeedsFollowUp));
        assert_eq!(case.images[0].stage, Some(Stage::Xray));
        assert!(!case.featured);
        assert!(case.tags.is_empty());
    }
}
