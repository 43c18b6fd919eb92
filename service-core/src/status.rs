//! Active/inactive status for soft-deleted records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const ACTIVE: i16 = 1;
pub const INACTIVE: i16 = 0;

/// Record counts grouped by status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub total: i64,
    pub active: i64,
    pub inactive: i64,
    pub by_status: BTreeMap<String, i64>,
}

impl StatusSummary {
    /// Build from `(status, count)` rows as returned by `GROUP BY status`.
    pub fn from_counts(rows: &[(Option<i16>, i64)]) -> Self {
        let mut summary = Self::default();
        for (status, count) in rows {
            summary.total += count;
            match *status {
                Some(ACTIVE) => summary.active += count,
                Some(INACTIVE) => summary.inactive += count,
                _ => {}
            }
        }
        summary.by_status = counts_by_key(rows.iter().cloned());
        summary
    }
}

/// Counts keyed by the stringified group value. Null groups are left out.
pub fn counts_by_key<K: ToString>(
    rows: impl IntoIterator<Item = (Option<K>, i64)>,
) -> BTreeMap<String, i64> {
    rows.into_iter()
        .filter_map(|(key, count)| key.map(|k| (k.to_string(), count)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_splits_active_and_inactive() {
        let summary = StatusSummary::from_counts(&[(Some(1), 120), (Some(0), 30)]);

        assert_eq!(summary.total, 150);
        assert_eq!(summary.active, 120);
        assert_eq!(summary.inactive, 30);
        assert_eq!(summary.by_status.get("1"), Some(&120));
        assert_eq!(summary.by_status.get("0"), Some(&30));
    }

    #[test]
    fn null_status_counts_toward_total_only() {
        let summary = StatusSummary::from_counts(&[(None, 4), (Some(1), 2)]);

        assert_eq!(summary.total, 6);
        assert_eq!(summary.active, 2);
        assert_eq!(summary.inactive, 0);
        assert_eq!(summary.by_status.len(), 1);
    }

    #[test]
    fn empty_table_gives_zeroes() {
        assert_eq!(StatusSummary::from_counts(&[]), StatusSummary::default());
    }

    #[test]
    fn counts_by_key_drops_null_keys() {
        let counts = counts_by_key(vec![(Some(3), 5), (None, 7), (Some(12), 1)]);

        assert_eq!(counts.len(), 2);
        assert_eq!(counts["3"], 5);
        assert_eq!(counts["12"], 1);
    }
}
