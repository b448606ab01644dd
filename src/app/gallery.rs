// CaseFolio - app/gallery.rs
//
// Memoised gallery derivation.
//
// `GalleryView` owns the gallery's filter state and caches the derived
// outputs: the filtered index list keyed on (catalog revision, filter
// state) and the category counts keyed on the catalog revision alone.
// A cached value is returned until one of its inputs changes; the next
// read after a change recomputes it.

use crate::app::catalog::Catalog;
use crate::core::filter::{self, CategoryCounts, FilterState};
use crate::core::model::ViewMode;

#[derive(Debug, Clone)]
struct FilterMemo {
    revision: u64,
    filter: FilterState,
    indices: Vec<usize>,
}

#[derive(Debug, Clone)]
struct CountsMemo {
    revision: u64,
    counts: CategoryCounts,
}

/// Filter state plus cached derived views for one gallery instance.
#[derive(Debug, Clone)]
pub struct GalleryView {
    filter: FilterState,
    pub view_mode: ViewMode,
    filtered: Option<FilterMemo>,
    counts: Option<CountsMemo>,
    recomputations: usize,
}

impl GalleryView {
    pub fn new(filter: FilterState, view_mode: ViewMode) -> Self {
        Self {
            filter,
            view_mode,
            filtered: None,
            counts: None,
            recomputations: 0,
        }
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Select a category pill.
    pub fn set_category(&mut self, category_id: &str) {
        if self.filter.active_category != category_id {
            tracing::debug!(category = category_id, "Gallery category changed");
            self.filter.active_category = category_id.to_string();
        }
    }

    pub fn set_search(&mut self, query: &str) {
        if self.filter.search_query != query {
            self.filter.search_query = query.to_string();
        }
    }

    /// Direct access for text-edit binding. Edits are picked up on the next
    /// read because the memo compares the stored filter with the current one.
    pub fn search_query_mut(&mut self) -> &mut String {
        &mut self.filter.search_query
    }

    /// Back to "all categories, no query".
    pub fn reset_filter(&mut self) {
        self.filter.clear();
    }

    /// Indices into `catalog.cases` that pass the current filter, in catalog order.
    pub fn filtered(&mut self, catalog: &Catalog) -> &[usize] {
        let stale = match &self.filtered {
            Some(memo) => memo.revision != catalog.revision() || memo.filter != self.filter,
            None => true,
        };
        if stale {
            self.filtered = None;
        }
        let current = &self.filter;
        let recomputations = &mut self.recomputations;
        let memo = self.filtered.get_or_insert_with(|| {
            let indices = filter::apply_filters(&catalog.cases, current);
            *recomputations += 1;
            tracing::trace!(
                category = %current.active_category,
                matches = indices.len(),
                total = catalog.cases.len(),
                recomputations = *recomputations,
                "Gallery filter recomputed"
            );
            FilterMemo {
                revision: catalog.revision(),
                filter: current.clone(),
                indices,
            }
        });
        &memo.indices
    }

    /// Category badge counts for the catalog.
    pub fn counts(&mut self, catalog: &Catalog) -> &CategoryCounts {
        let stale = self
            .counts
            .as_ref()
            .map_or(true, |memo| memo.revision != catalog.revision());
        if stale {
            self.counts = None;
        }
        let memo = self.counts.get_or_insert_with(|| CountsMemo {
            revision: catalog.revision(),
            counts: CategoryCounts::tally(&catalog.cases),
        });
        &memo.counts
    }

    /// Number of times the filtered list has been recomputed.
    #[cfg(test)]
    pub(crate) fn recomputations(&self) -> usize {
        self.recomputations
    }
}

impl Default for GalleryView {
    fn default() -> Self {
        Self::new(FilterState::default(), ViewMode::default())
    }
}
