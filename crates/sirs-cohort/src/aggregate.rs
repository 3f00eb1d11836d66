//! Per-stay aggregation of the annotated timeline.

use std::collections::BTreeMap;

use tracing::warn;

use sirs_model::{AnnotatedTimeline, CohortTable, StayKey, StaySummary};

use crate::error::{CohortError, Result};

#[derive(Debug, Clone)]
struct StayAccumulator {
    sums: Vec<f64>,
    present: Vec<usize>,
    max_sirs_count: u8,
    row_count: usize,
}

impl StayAccumulator {
    fn new(width: usize) -> Self {
        Self {
            sums: vec![0.0; width],
            present: vec![0; width],
            max_sirs_count: 0,
            row_count: 0,
        }
    }

    fn finish(self, stay: StayKey) -> StaySummary {
        let means = self
            .sums
            .iter()
            .zip(&self.present)
            .map(|(sum, &count)| (count > 0).then(|| sum / count as f64))
            .collect();
        StaySummary {
            stay,
            means,
            max_sirs_count: self.max_sirs_count,
            row_count: self.row_count,
        }
    }
}

/// Mean of every measurement column and the maximum `SIRSCount` per stay.
///
/// Means are taken over present values only. A stay with no value for a
/// column gets an absent mean; one `warn!` per affected column reports how
/// many stays are empty.
///
/// Each `icustay_id` must belong to a single admission and patient; a stay
/// seen under two key tuples fails with [`CohortError::ConflictingStay`].
pub fn summarize_stays(timeline: &AnnotatedTimeline) -> Result<CohortTable> {
    let columns = timeline.table.columns.clone();
    let width = columns.len();

    let mut groups: BTreeMap<StayKey, StayAccumulator> = BTreeMap::new();
    for (key, values, flags) in timeline.iter() {
        let acc = groups
            .entry(key.stay)
            .or_insert_with(|| StayAccumulator::new(width));
        acc.row_count += 1;
        acc.max_sirs_count = acc.max_sirs_count.max(flags.count());
        for (idx, value) in values.iter().enumerate() {
            if let Some(value) = value {
                acc.sums[idx] += value;
                acc.present[idx] += 1;
            }
        }
    }

    check_stay_ownership(groups.keys())?;

    let stays: Vec<StaySummary> = groups
        .into_iter()
        .map(|(stay, acc)| acc.finish(stay))
        .collect();

    for (idx, column) in columns.iter().enumerate() {
        let empty_stays = stays.iter().filter(|s| s.means[idx].is_none()).count();
        if empty_stays > 0 {
            warn!(
                column = %column,
                empty_stays,
                total_stays = stays.len(),
                "stays without any value for measurement"
            );
        }
    }

    Ok(CohortTable { columns, stays })
}

fn check_stay_ownership<'a>(stays: impl Iterator<Item = &'a StayKey>) -> Result<()> {
    let mut owners: BTreeMap<i64, StayKey> = BTreeMap::new();
    for stay in stays {
        if let Some(first) = owners.insert(stay.icustay_id, *stay) {
            return Err(CohortError::ConflictingStay {
                icustay_id: stay.icustay_id,
                first,
                second: *stay,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sirs_model::{SirsFlags, TimelineKey, WideTable};

    fn key(icustay: i64, hour: u32) -> TimelineKey {
        TimelineKey::new(
            StayKey::new(1, 10, icustay),
            Utc.with_ymd_and_hms(2101, 1, 1, hour, 0, 0).unwrap(),
        )
    }

    fn flags(count: u8) -> SirsFlags {
        SirsFlags {
            temperature: count >= 1,
            heart_rate: count >= 2,
            respiratory: count >= 3,
            white_cells: count >= 4,
        }
    }

    #[test]
    fn test_means_and_max_per_stay() {
        let mut table = WideTable::new(vec!["HeartRate".into(), "Albumin".into()]);
        table.rows.insert(key(1, 0), vec![Some(80.0), None]);
        table.rows.insert(key(1, 1), vec![Some(100.0), None]);
        table.rows.insert(key(2, 0), vec![None, Some(3.1)]);
        let timeline = AnnotatedTimeline {
            table,
            flags: vec![flags(1), flags(3), flags(0)],
        };

        let cohort = summarize_stays(&timeline).unwrap();

        assert_eq!(cohort.columns, vec!["HeartRate", "Albumin"]);
        assert_eq!(cohort.stays.len(), 2);
        let first = &cohort.stays[0];
        assert_eq!(first.stay.icustay_id, 1);
        assert_eq!(first.means, vec![Some(90.0), None]);
        assert_eq!(first.max_sirs_count, 3);
        assert_eq!(first.row_count, 2);
        assert_eq!(cohort.stays[1].means, vec![None, Some(3.1)]);
        assert_eq!(cohort.absent_cells(), 2);
        assert_eq!(cohort.stays_meeting_threshold(), 1);
    }

    #[test]
    fn test_empty_timeline_gives_empty_cohort() {
        let cohort = summarize_stays(&AnnotatedTimeline::default()).unwrap();
        assert!(cohort.stays.is_empty());
    }

    #[test]
    fn test_stay_under_two_admissions_is_rejected() {
        let at = |hadm: i64, hour: u32| {
            TimelineKey::new(
                StayKey::new(1, hadm, 5),
                Utc.with_ymd_and_hms(2101, 1, 1, hour, 0, 0).unwrap(),
            )
        };
        let mut table = WideTable::new(vec!["HeartRate".into()]);
        table.rows.insert(at(10, 0), vec![Some(80.0)]);
        table.rows.insert(at(11, 1), vec![Some(90.0)]);
        let timeline = AnnotatedTimeline {
            table,
            flags: vec![flags(0), flags(0)],
        };

        let err = summarize_stays(&timeline).unwrap_err();
        match err {
            CohortError::ConflictingStay {
                icustay_id,
                first,
                second,
            } => {
                assert_eq!(icustay_id, 5);
                assert_eq!(first.hadm_id, 10);
                assert_eq!(second.hadm_id, 11);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
