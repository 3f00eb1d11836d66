//! Aggregation through imputation to CSV.

use chrono::{TimeZone, Utc};
use sirs_cohort::{
    CohortError, ImputeError, KnnImputer, Weighting, build_cohort, cohort_frame, summarize_stays,
    write_csv,
};
use sirs_model::{AnnotatedTimeline, SirsFlags, StayKey, TimelineKey, WideTable};

fn key(icustay: i64, hour: u32) -> TimelineKey {
    TimelineKey::new(
        StayKey::new(icustay * 10, icustay * 100, icustay),
        Utc.with_ymd_and_hms(2101, 1, 1, hour, 0, 0).unwrap(),
    )
}

fn sample_timeline() -> AnnotatedTimeline {
    let mut table = WideTable::new(vec!["HeartRate".into(), "Albumin".into()]);
    // Stay 1 never has an albumin measurement.
    table.rows.insert(key(1, 0), vec![Some(110.0), None]);
    table.rows.insert(key(1, 1), vec![Some(100.0), None]);
    table.rows.insert(key(2, 0), vec![Some(70.0), Some(3.0)]);
    table.rows.insert(key(3, 0), vec![Some(98.0), Some(2.4)]);
    table.rows.insert(key(3, 4), vec![Some(102.0), Some(2.6)]);
    let high = SirsFlags {
        heart_rate: true,
        temperature: true,
        ..SirsFlags::default()
    };
    AnnotatedTimeline {
        table,
        flags: vec![high, high, SirsFlags::default(), high, SirsFlags::default()],
    }
}

#[test]
fn test_absent_aggregate_is_filled_by_imputation() {
    let cohort = summarize_stays(&sample_timeline()).unwrap();
    assert_eq!(cohort.stays[0].stay.icustay_id, 1);
    assert_eq!(cohort.stays[0].means[1], None);
    assert_eq!(cohort.absent_cells(), 1);

    let imputed = build_cohort(&cohort, &KnnImputer::new(1)).expect("imputation succeeds");

    assert_eq!(imputed.imputed_cells, 1);
    // Stay 3 (mean HR 100, max count 2) is the nearest donor of stay 1.
    assert!((imputed.stays[0].means[1] - 2.5).abs() < 1e-9);
    assert_eq!(imputed.stays[1].means, vec![70.0, 3.0]);
}

#[test]
fn test_repeated_runs_are_identical() {
    let timeline = sample_timeline();
    let imputer = KnnImputer::default().with_weighting(Weighting::Distance);
    let first = build_cohort(&summarize_stays(&timeline).unwrap(), &imputer).unwrap();
    let second = build_cohort(&summarize_stays(&timeline).unwrap(), &imputer).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_all_absent_measurement_is_fatal() {
    let mut table = WideTable::new(vec!["Bands".into()]);
    table.rows.insert(key(1, 0), vec![None]);
    let timeline = AnnotatedTimeline {
        table,
        flags: vec![SirsFlags::default()],
    };
    let cohort = summarize_stays(&timeline).unwrap();
    let err = build_cohort(&cohort, &KnnImputer::default()).unwrap_err();
    assert!(matches!(
        err,
        CohortError::Impute(ImputeError::EmptyFeature { ref column }) if column == "meanBands"
    ));
}

#[test]
fn test_cohort_csv_has_no_empty_cells() {
    let cohort = summarize_stays(&sample_timeline()).unwrap();
    let imputed = build_cohort(&cohort, &KnnImputer::default()).expect("imputation succeeds");
    let mut df = cohort_frame(&imputed).expect("frame builds");

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("cohort.csv");
    write_csv(&mut df, &path).expect("csv written");

    let text = std::fs::read_to_string(&path).expect("read back");
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("subject_id,hadm_id,icustay_id,meanHeartRate,meanAlbumin,maxSIRSCount")
    );
    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), 3);
    assert!(rows[0].starts_with("10,100,1,105"));
    assert!(rows.iter().all(|row| row.split(',').all(|cell| !cell.is_empty())));
}
