use std::fs;
use std::path::Path;

use campaign_parsing::fields::output_header;
use campaign_parsing::{run_task, RunOptions, RunOutcome, TaskConfig};

const SPRING_COOKIE: &str = "%7B%22Campaign_Name__c%22%3A%22Spring%22%2C%22Campaign_Page__c%22%3A%22https%3A%2F%2Fx.com%2F%3Futm_source%3Dgoogle%22%7D";

fn write_input(path: &Path, rows: &[(&str, &str)]) {
    let mut writer = csv::Writer::from_path(path).unwrap();
    writer.write_record(["ACTIONCAMPAIGNID", "CAMPAIGN_COOKIE_DATA_JSON", "Notes"]).unwrap();
    for (id, cookie) in rows {
        writer.write_record([*id, *cookie, "ignored"]).unwrap();
    }
    writer.flush().unwrap();
}

fn read_output(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let header = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader.records().map(|r| r.unwrap().iter().map(String::from).collect()).collect();
    (header, rows)
}

fn column(header: &[String], name: &str) -> usize {
    header.iter().position(|h| h == name).unwrap()
}

#[test]
fn spring_scenario_produces_one_flat_record() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("export.csv");
    write_input(&input, &[("123", SPRING_COOKIE)]);

    let outcome = run_task(&TaskConfig::new(input, None), RunOptions::default()).unwrap();
    let output = dir.path().join("parsed_export.csv");
    assert_eq!(outcome, RunOutcome::Written { output: output.clone(), records: 1, skipped: 0 });

    let (header, rows) = read_output(&output);
    assert_eq!(header, output_header());
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row[column(&header, "Record ID")], "123");
    assert_eq!(row[column(&header, "Campaign_Name__c")], "Spring");
    assert_eq!(row[column(&header, "utm_source")], "google");
    assert_eq!(row[column(&header, "Campaign_Page__c")], "https://x.com/?utm_source=google");
    assert_eq!(row.iter().filter(|v| !v.is_empty()).count(), 4);
}

#[test]
fn empty_identifier_row_is_skipped_once() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("mixed.csv");
    let output = dir.path().join("out").join("mixed.csv");
    write_input(&input, &[("", SPRING_COOKIE), ("200", SPRING_COOKIE), ("201", "%7Bbroken")]);

    let outcome = run_task(&TaskConfig::new(input, Some(output.clone())), RunOptions::default()).unwrap();
    assert_eq!(outcome, RunOutcome::Written { output: output.clone(), records: 1, skipped: 2 });

    let (header, rows) = read_output(&output);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][column(&header, "Record ID")], "200");
}

#[test]
fn no_valid_records_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.csv");
    write_input(&input, &[("", SPRING_COOKIE), ("5", "%5B%5D")]);

    let outcome = run_task(&TaskConfig::new(input, None), RunOptions::default()).unwrap();
    assert_eq!(outcome, RunOutcome::NoValidRecords { skipped: 2 });
    assert!(!dir.path().join("parsed_bad.csv").exists());
}

#[test]
fn missing_source_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("nowhere.csv");
    let outcome = run_task(&TaskConfig::new(input.clone(), None), RunOptions::default()).unwrap();
    assert_eq!(outcome, RunOutcome::SourceNotFound { input });
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn repeated_runs_write_identical_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.csv");
    let wrapped = urlencoding::encode(
        r#"[{"Visitor_ID__c":"v1","Campaign_Hit_Count__c":3,"utm_source":"cookie","Campaign_Page__c":"https://x.com/a?utm_source=url&utm_medium=%2Bcpc&gclid=g1&gclid=g2"}]"#,
    ).into_owned();
    write_input(&input, &[("1", wrapped.as_str()), ("2", SPRING_COOKIE)]);

    let first = dir.path().join("first.csv");
    run_task(&TaskConfig::new(input.clone(), Some(first.clone())), RunOptions::default()).unwrap();
    let (header, rows) = read_output(&first);
    assert_eq!(rows[0][column(&header, "utm_source")], "url");
    assert_eq!(rows[0][column(&header, "utm_medium")], "+cpc");
    assert_eq!(rows[0][column(&header, "gclid")], "g1");
    assert_eq!(rows[0][column(&header, "Campaign_Hit_Count__c")], "3");

    let second = dir.path().join("second.csv");
    run_task(&TaskConfig::new(input, Some(second.clone())), RunOptions::default()).unwrap();
    assert_eq!(read_output(&second), (header, rows));
}

#[test]
fn unreadable_csv_is_an_error_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("binary.csv");
    fs::write(&input, b"\xff\xfe\x00A").unwrap();
    let output = dir.path().join("out.csv");

    assert!(run_task(&TaskConfig::new(input, Some(output.clone())), RunOptions::default()).is_err());
    assert!(!output.exists());
}
