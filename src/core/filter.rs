// CaseFolio - core/filter.rs
//
// Gallery filter engine. The category predicate and the text search
// predicate are AND-combined; results keep catalog order.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::model::{Case, CaseCategory, Category};
use crate::util::constants::ALL_CATEGORY_ID;
use std::collections::HashMap;

/// Gallery filter state. Both fields are AND-combined when applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterState {
    /// Id of the active category pill. `"all"` disables the category predicate.
    pub active_category: String,

    /// Substring text search (case-insensitive). Empty = no filter.
    pub search_query: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            active_category: ALL_CATEGORY_ID.to_string(),
            search_query: String::new(),
        }
    }
}

impl FilterState {
    /// Returns true if no filters are active.
    pub fn is_empty(&self) -> bool {
        self.active_category == ALL_CATEGORY_ID && self.search_query.is_empty()
    }

    /// Reset to the initial "all, no query" state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Apply filters to a slice of cases, returning indices of matching cases
/// in their original order.
pub fn apply_filters(cases: &[Case], filter: &FilterState) -> Vec<usize> {
    if filter.is_empty() {
        return (0..cases.len()).collect();
    }

    let query_lower = filter.search_query.to_lowercase();

    cases
        .iter()
        .enumerate()
        .filter(|(_, case)| {
            matches_category(case, &filter.active_category) && matches_search(case, &query_lower)
        })
        .map(|(idx, _)| idx)
        .collect()
}

/// Category predicate: passes for "all" or an exact category id match.
fn matches_category(case: &Case, active_category: &str) -> bool {
    active_category == ALL_CATEGORY_ID || case.category.id() == active_category
}

/// Search predicate over title, treatment, tags and tooth number.
///
/// `query_lower` must already be lowercased.
fn matches_search(case: &Case, query_lower: &str) -> bool {
    if query_lower.is_empty() {
        return true;
    }
    let contains = |text: &str| text.to_lowercase().contains(query_lower);

    contains(&case.title)
        || contains(&case.treatment)
        || case.tags.iter().any(|tag| contains(tag.as_str()))
        || case.tooth_number.as_deref().is_some_and(contains)
}

// =============================================================================
// Category badge counts
// =============================================================================

/// Per-category case counts for the pill badges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    by_category: HashMap<CaseCategory, usize>,
    total: usize,
}

impl CategoryCounts {
    /// Tally cases by category in a single pass.
    pub fn tally(cases: &[Case]) -> Self {
        let mut by_category = HashMap::new();
        for case in cases {
            *by_category.entry(case.category).or_insert(0) += 1;
        }
        Self {
            by_category,
            total: cases.len(),
        }
    }

    /// Total number of cases (the "all" badge).
    pub fn total(&self) -> usize {
        self.total
    }

    /// Count for a category id. Unknown ids count 0; "all" counts every case.
    pub fn count_for(&self, category_id: &str) -> usize {
        if category_id == ALL_CATEGORY_ID {
            return self.total;
        }
        CaseCategory::from_id(category_id)
            .and_then(|c| self.by_category.get(&c).copied())
            .unwrap_or(0)
    }

    /// Badge value for a pill.
    pub fn badge(&self, category: &Category) -> usize {
        self.count_for(&category.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::default_categories;
    use chrono::NaiveDate;

    fn make_case(id: &str, category: CaseCategory, title: &str, treatment: &str) -> Case {
        Case {
            id: id.to_string(),
            title: title.to_string(),
            category,
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            treatment: treatment.to_string(),
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
            images: Vec::new(),
            thumbnail: None,
            featured: false,
            tags: Vec::new(),
        }
    }

    fn sample_cases() -> Vec<Case> {
        let mut bridge = make_case(
            "bridge",
            CaseCategory::FixedProsthodontics,
            "Anterior bridge",
            "Three-unit zirconia bridge",
        );
        bridge.tags = vec!["Zirconia".to_string(), "aesthetic".to_string()];
        let mut molar = make_case(
            "molar",
            CaseCategory::Endodontics,
            "Lower molar",
            "root canal treatment",
        );
        molar.tooth_number = Some("36".to_string());
        vec![
            molar,
            make_case("wisdom", CaseCategory::Extractions, "Wisdom tooth", "Surgical extraction"),
            bridge,
        ]
    }

    fn filter(category: &str, query: &str) -> FilterState {
        FilterState {
            active_category: category.to_string(),
            search_query: query.to_string(),
        }
    }

    #[test]
    fn test_empty_filter_returns_all_in_order() {
        let cases = sample_cases();
        let result = apply_filters(&cases, &FilterState::default());
        assert_eq!(result, vec![0, 1, 2]);
    }

    #[test]
    fn test_category_filter() {
        let cases = sample_cases();
        assert_eq!(apply_filters(&cases, &filter("extractions", "")), vec![1]);
    }

    #[test]
    fn test_category_with_no_cases_yields_empty() {
        let cases = sample_cases();
        assert!(apply_filters(&cases, &filter("periodontics", "")).is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let cases = sample_cases();
        assert_eq!(apply_filters(&cases, &filter("all", "ROOT")), vec![0]);
    }

    #[test]
    fn test_search_matches_tags_and_tooth_number() {
        let cases = sample_cases();
        assert_eq!(apply_filters(&cases, &filter("all", "zirconia")), vec![2]);
        assert_eq!(apply_filters(&cases, &filter("all", "AESTH")), vec![2]);
        assert_eq!(apply_filters(&cases, &filter("all", "36")), vec![0]);
    }

    #[test]
    fn test_search_does_not_match_unlisted_fields() {
        let mut cases = sample_cases();
        cases[1].diagnosis = Some("impacted".to_string());
        assert!(apply_filters(&cases, &filter("all", "impacted")).is_empty());
    }

    #[test]
    fn test_combined_filters() {
        let cases = sample_cases();
        // "tooth" appears in the extraction title only; category must also match.
        assert_eq!(apply_filters(&cases, &filter("extractions", "tooth")), vec![1]);
        assert!(apply_filters(&cases, &filter("endodontics", "tooth")).is_empty());
    }

    #[test]
    fn test_unknown_category_yields_empty() {
        let cases = sample_cases();
        assert!(apply_filters(&cases, &filter("orthodontics", "")).is_empty());
    }

    #[test]
    fn test_category_counts() {
        let cases = vec![
            make_case("a", CaseCategory::Endodontics, "A", "x"),
            make_case("b", CaseCategory::Extractions, "B", "y"),
        ];
        let counts = CategoryCounts::tally(&cases);
        assert_eq!(counts.count_for("endodontics"), 1);
        assert_eq!(counts.count_for("extractions"), 1);
        assert_eq!(counts.count_for("restorations"), 0);
        assert_eq!(counts.total(), 2);

        let categories = default_categories();
        assert_eq!(counts.badge(&categories[0]), 2);
    }

    #[test]
    fn test_clear_restores_defaults() {
        let mut state = filter("endodontics", "molar");
        assert!(!state.is_empty());
        state.clear();
        assert!(state.is_empty());
        assert_eq!(state.active_category, "all");
    }
}
