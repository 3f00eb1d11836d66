//! Identifier keys for the patient / admission / ICU stay hierarchy.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of one ICU stay.
///
/// A stay belongs to exactly one admission, which belongs to exactly one
/// patient. Field order defines the sort order used by every grouping pass:
/// `(subject_id, hadm_id, icustay_id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StayKey {
    pub subject_id: i64,
    pub hadm_id: i64,
    pub icustay_id: i64,
}

impl StayKey {
    pub fn new(subject_id: i64, hadm_id: i64, icustay_id: i64) -> Self {
        Self {
            subject_id,
            hadm_id,
            icustay_id,
        }
    }
}

impl fmt::Display for StayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "subject_id={} hadm_id={} icustay_id={}",
            self.subject_id, self.hadm_id, self.icustay_id
        )
    }
}

/// Identity of one timeline row: a stay plus the chart time.
///
/// Ordering is `(subject_id, hadm_id, icustay_id, charttime)` ascending, which
/// is the precondition of the grouped forward fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimelineKey {
    pub stay: StayKey,
    pub charttime: DateTime<Utc>,
}

impl TimelineKey {
    pub fn new(stay: StayKey, charttime: DateTime<Utc>) -> Self {
        Self { stay, charttime }
    }
}

impl fmt::Display for TimelineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} charttime={}",
            self.stay,
            self.charttime.format(CHARTTIME_FORMAT)
        )
    }
}

/// Output format for chart times (naive UTC wall-clock, as in the source exports).
pub const CHARTTIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_stay_keys_sort_by_hierarchy() {
        let mut keys = vec![
            StayKey::new(2, 10, 100),
            StayKey::new(1, 20, 50),
            StayKey::new(1, 10, 300),
            StayKey::new(1, 10, 200),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                StayKey::new(1, 10, 200),
                StayKey::new(1, 10, 300),
                StayKey::new(1, 20, 50),
                StayKey::new(2, 10, 100),
            ]
        );
    }

    #[test]
    fn test_timeline_key_orders_stay_before_time() {
        let early = Utc.with_ymd_and_hms(2101, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2101, 1, 2, 0, 0, 0).unwrap();
        let a = TimelineKey::new(StayKey::new(1, 1, 2), early);
        let b = TimelineKey::new(StayKey::new(1, 1, 1), late);
        assert!(b < a);
    }

    #[test]
    fn test_timeline_key_display_is_naive_utc() {
        let time = Utc.with_ymd_and_hms(2101, 10, 20, 19, 10, 0).unwrap();
        let key = TimelineKey::new(StayKey::new(3, 4, 5), time);
        assert_eq!(
            key.to_string(),
            "subject_id=3 hadm_id=4 icustay_id=5 charttime=2101-10-20 19:10:00"
        );
    }
}
