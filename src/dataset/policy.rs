//! Per-class filter policy.
//!
//! The first [`FULL_FILTER_LIMIT`] successfully decoded images of a class get
//! every filter. Later images get histogram equalization only.

use crate::preprocessing::FilterKind;

/// Number of decoded images per class that receive the full filter set
pub const FULL_FILTER_LIMIT: usize = 1000;

/// Filters applied while a class is under its full-filter limit, in write order
const FULL_FILTER_SET: [FilterKind; 4] = [
    FilterKind::HighPass,
    FilterKind::LowPass,
    FilterKind::ContrastStretching,
    FilterKind::HistogramEqualization,
];

/// Filters applied once a class has reached its full-filter limit
const EQUALIZATION_ONLY: [FilterKind; 1] = [FilterKind::HistogramEqualization];

/// Decides which filters an image gets from its position within its class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterPolicy {
    full_filter_limit: usize,
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self {
            full_filter_limit: FULL_FILTER_LIMIT,
        }
    }
}

impl FilterPolicy {
    /// Creates a policy with a custom full-filter limit.
    ///
    /// # Examples
    ///
    /// ```
    /// use dataset_filters::{FilterKind, FilterPolicy};
    ///
    /// let policy = FilterPolicy::with_full_filter_limit(2);
    /// assert_eq!(policy.filters_for(1).len(), 4);
    /// assert_eq!(policy.filters_for(2), &[FilterKind::HistogramEqualization]);
    /// ```
    pub fn with_full_filter_limit(limit: usize) -> Self {
        Self {
            full_filter_limit: limit,
        }
    }

    pub fn full_filter_limit(&self) -> usize {
        self.full_filter_limit
    }

    /// Whether an image preceded by `decoded_so_far` decoded images in its class
    /// gets the full filter set.
    pub fn applies_full_set(&self, decoded_so_far: usize) -> bool {
        decoded_so_far < self.full_filter_limit
    }

    /// Filters for an image preceded by `decoded_so_far` decoded images in its
    /// class. Histogram equalization is always included.
    pub fn filters_for(&self, decoded_so_far: usize) -> &'static [FilterKind] {
        if self.applies_full_set(decoded_so_far) {
            &FULL_FILTER_SET
        } else {
            &EQUALIZATION_ONLY
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limit() {
        assert_eq!(FilterPolicy::default().full_filter_limit(), 1000);
    }

    #[test]
    fn test_boundary_at_limit() {
        let policy = FilterPolicy::default();

        assert!(policy.applies_full_set(0));
        assert!(policy.applies_full_set(999));
        assert!(!policy.applies_full_set(1000));
        assert!(!policy.applies_full_set(5000));
    }

    #[test]
    fn test_full_set_covers_every_filter() {
        let filters = FilterPolicy::default().filters_for(0);

        for kind in FilterKind::ALL {
            assert!(filters.contains(&kind), "{} missing", kind);
        }
    }

    #[test]
    fn test_equalization_always_present() {
        let policy = FilterPolicy::with_full_filter_limit(3);

        for position in 0..10 {
            assert!(policy
                .filters_for(position)
                .contains(&FilterKind::HistogramEqualization));
        }
    }

    #[test]
    fn test_zero_limit_equalizes_only() {
        let policy = FilterPolicy::with_full_filter_limit(0);
        assert_eq!(policy.filters_for(0), &[FilterKind::HistogramEqualization]);
    }
}
