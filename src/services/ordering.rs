//! Most-recent-first ordering for records whose date may be unknown.
//!
//! Two records compare as equal when either date is missing, so the relation
//! is not a total order and must not be fed to `slice::sort_by`, which may
//! panic on inconsistent comparators. [`sort_recent_first`] is an insertion
//! sort: stable, panic-free, and an undated record never moves, acting as a
//! barrier that dated records do not cross.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

/// Descending by date; `Equal` whenever either side is unknown.
pub fn compare_recent_first(a: Option<&DateTime<Utc>>, b: Option<&DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        _ => Ordering::Equal,
    }
}

/// Stable in-place sort with an arbitrary (possibly non-transitive) comparator.
pub fn insertion_sort_by<T, F>(items: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && compare(&items[j - 1], &items[j]) == Ordering::Greater {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Sorts most recent first using `date_of`; undated records keep their index.
pub fn sort_recent_first<T, F>(items: &mut [T], date_of: F)
where
    F: Fn(&T) -> Option<&DateTime<Utc>>,
{
    insertion_sort_by(items, |a, b| compare_recent_first(date_of(a), date_of(b)));
}
