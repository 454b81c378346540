use chrono::NaiveDate;
use std::fs;
use stock_gdelt::{DatasetRow, DatasetWriter};

use crate::common::temp_csv;

const HEADER: &str =
    "Date,Open,High,Low,Close,Adj Close,Volume,Daily_Return,EMA_7,EMA_21,Ticker,Company,Headlines";

fn row(y: i32, m: u32, day: u32, headlines: Option<&str>) -> DatasetRow {
    DatasetRow {
        date: NaiveDate::from_ymd_opt(y, m, day).unwrap(),
        open: 10.0,
        high: 11.0,
        low: 9.5,
        close: 10.5,
        adj_close: 10.25,
        volume: 1_000,
        daily_return: None,
        ema_7: Some(10.25),
        ema_21: Some(10.25),
        ticker: "ACME".into(),
        company: "Acme Corp".into(),
        headlines: headlines.map(str::to_string),
    }
}

#[test]
fn header_is_written_once_across_blocks() {
    let path = temp_csv("header_once");
    let mut writer = DatasetWriter::create(&path).unwrap();

    writer
        .append_block(&[row(2023, 12, 28, None), row(2023, 12, 29, Some("Acme earnings beat"))])
        .unwrap();
    writer.append_block(&[row(2024, 1, 2, None)]).unwrap();
    assert_eq!(writer.rows_written(), 3);

    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], HEADER);
    assert_eq!(text.matches("Date,Open").count(), 1);
    assert!(lines[1].starts_with("2023-12-28,10.0,11.0,9.5,10.5,10.25,1000,,10.25,10.25,ACME,Acme Corp,"));
    assert!(lines[2].ends_with(",ACME,Acme Corp,Acme earnings beat"));
    assert!(lines[3].starts_with("2024-01-02,"));

    fs::remove_file(&path).ok();
}

#[test]
fn empty_first_block_defers_the_header() {
    let path = temp_csv("empty_first");
    let mut writer = DatasetWriter::create(&path).unwrap();

    writer.append_block(&[]).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "");

    writer.append_block(&[row(2024, 1, 2, None)]).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], HEADER);

    fs::remove_file(&path).ok();
}

#[test]
fn create_truncates_and_makes_parent_dirs() {
    let dir = std::env::temp_dir().join(format!("stock_gdelt_nested_{}", std::process::id()));
    let path = dir.join("out").join("data.csv");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "stale contents\n").unwrap();

    let writer = DatasetWriter::create(&path).unwrap();
    assert_eq!(writer.path(), path.as_path());
    assert_eq!(fs::read_to_string(&path).unwrap(), "");

    fs::remove_dir_all(&dir).ok();

    let fresh = dir.join("a").join("b.csv");
    DatasetWriter::create(&fresh).unwrap();
    assert!(fresh.exists());
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn headlines_with_commas_are_quoted() {
    let path = temp_csv("quoted");
    let mut writer = DatasetWriter::create(&path).unwrap();
    writer
        .append_block(&[row(2024, 1, 2, Some("Acme, Inc. beats | Acme stock up"))])
        .unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let records: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(records.len(), 1);
    assert_eq!(&records[0][12], "Acme, Inc. beats | Acme stock up");

    fs::remove_file(&path).ok();
}
