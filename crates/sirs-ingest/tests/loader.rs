//! Integration tests for loading the vitals and labs exports.

use std::io::Write;

use chrono::{TimeZone, Utc};
use tempfile::NamedTempFile;

use sirs_ingest::{IngestError, ReadOptions, SourceSchema, load_long_table};
use sirs_model::{Source, StayKey};

fn create_temp_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

#[test]
fn test_loads_vitals_with_canonical_columns() {
    let file = create_temp_csv(
        "subject_id,hadm_id,icustay_id,charttime,vitalid,valuenum\n\
         3,145834,211552,2101-10-20 19:10:00,HeartRate,90\n\
         3,145834,211552,2101-10-20 19:10:00,TempC,37.5\n\
         3,145834,211552,2101-10-20 20:00:00,RespRate,\n",
    );
    let schema = SourceSchema::for_source(Source::Vitals);
    let table = load_long_table(file.path(), &schema, &ReadOptions::default()).unwrap();

    assert_eq!(table.source, Source::Vitals);
    assert_eq!(table.len(), 3);
    let first = &table.records[0];
    assert_eq!(first.key.stay, StayKey::new(3, 145834, 211552));
    assert_eq!(
        first.key.charttime,
        Utc.with_ymd_and_hms(2101, 10, 20, 19, 10, 0).unwrap()
    );
    assert_eq!(first.column, "HeartRate");
    assert_eq!(first.value, Some(90.0));
    assert_eq!(table.records[2].column, "RespRate");
    assert_eq!(table.records[2].value, None);
}

#[test]
fn test_loads_labs_with_label_codes_and_float_ids() {
    let file = create_temp_csv(
        "SUBJECT_ID,HADM_ID,ICUSTAY_ID,CHARTTIME,LABEL,VALUENUM\n\
         3,145834,211552.0,2101-10-20 18:00:00,ANION GAP,14\n\
         3,145834,211552.0,2101-10-20 18:00:00,PCO2,30\n",
    );
    let schema = SourceSchema::for_source(Source::Labs);
    let table = load_long_table(file.path(), &schema, &ReadOptions::default()).unwrap();

    assert_eq!(table.records[0].key.stay.icustay_id, 211552);
    assert_eq!(table.records[0].column, "AnionGap");
    assert_eq!(table.records[1].column, "PaCO2");
}

#[test]
fn test_missing_required_column_is_malformed_input() {
    let file = create_temp_csv(
        "subject_id,hadm_id,charttime,label,valuenum\n\
         3,145834,2101-10-20 18:00:00,WBC,8\n",
    );
    let schema = SourceSchema::for_source(Source::Labs);
    let err = load_long_table(file.path(), &schema, &ReadOptions::default()).unwrap_err();

    assert!(err.is_malformed_input());
    assert!(matches!(
        err,
        IngestError::MissingColumn { ref column, .. } if column == "icustay_id"
    ));
}

#[test]
fn test_unparseable_value_names_row_and_column() {
    let file = create_temp_csv(
        "subject_id,hadm_id,icustay_id,charttime,label,valuenum\n\
         3,145834,211552,2101-10-20 18:00:00,WBC,8\n\
         3,145834,211552,2101-10-20 19:00:00,WBC,high\n",
    );
    let schema = SourceSchema::for_source(Source::Labs);
    let err = load_long_table(file.path(), &schema, &ReadOptions::default()).unwrap_err();

    match err {
        IngestError::InvalidValue {
            row, column, value, ..
        } => {
            assert_eq!(row, 2);
            assert_eq!(column, "valuenum");
            assert_eq!(value, "high");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_empty_identifier_fails_the_load() {
    let file = create_temp_csv(
        "subject_id,hadm_id,icustay_id,charttime,label,valuenum\n\
         3,145834,,2101-10-20 18:00:00,WBC,8\n",
    );
    let schema = SourceSchema::for_source(Source::Labs);
    let err = load_long_table(file.path(), &schema, &ReadOptions::default()).unwrap_err();

    assert!(matches!(
        err,
        IngestError::InvalidValue { ref column, row: 1, .. } if column == "icustay_id"
    ));
}

#[test]
fn test_bad_timestamp_fails_the_load() {
    let file = create_temp_csv(
        "subject_id,hadm_id,icustay_id,charttime,vitalid,valuenum\n\
         3,145834,211552,yesterday,HeartRate,80\n",
    );
    let schema = SourceSchema::for_source(Source::Vitals);
    let err = load_long_table(file.path(), &schema, &ReadOptions::default()).unwrap_err();

    assert!(matches!(
        err,
        IngestError::InvalidValue { ref column, .. } if column == "charttime"
    ));
}

#[test]
fn test_custom_type_and_value_columns() {
    let file = create_temp_csv(
        "subject_id\thadm_id\ticustay_id\tcharttime\tmeasure\treading\n\
         1\t2\t3\t2101-01-01 00:00:00\tSysBP\t120\n",
    );
    let schema = SourceSchema::for_source(Source::Vitals)
        .with_type_column("measure")
        .with_value_column("reading");
    let options = ReadOptions::default().with_delimiter(b'\t');
    let table = load_long_table(file.path(), &schema, &options).unwrap();

    assert_eq!(table.records[0].column, "SysBP");
    assert_eq!(table.records[0].value, Some(120.0));
}

#[test]
fn test_truncated_row_fails_the_load() {
    let file = create_temp_csv(
        "subject_id,hadm_id,icustay_id,charttime,label,valuenum\n\
         3,145834,211552,2101-10-20 18:00:00,WBC,8\n\
         3,145834,211552,2101-10-20 19:00:00,WBC\n",
    );
    let schema = SourceSchema::for_source(Source::Labs);
    let err = load_long_table(file.path(), &schema, &ReadOptions::default()).unwrap_err();

    assert!(err.is_malformed_input());
    assert!(matches!(
        err,
        IngestError::MalformedRow {
            row: 2,
            expected: 6,
            found: 5,
            ..
        }
    ));
}
