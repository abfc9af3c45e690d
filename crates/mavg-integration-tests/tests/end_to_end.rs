//! File-to-file runs: JSON-lines events in, JSON-lines averages out.
//!
//! Each test writes an events file into its own temp directory, streams it
//! through `open_events` -> `try_process_all` -> `JsonLinesSink::append`,
//! and checks the lines that land in the derived output file.

use std::fs;
use std::path::{Path, PathBuf};

use mavg_core::{EngineError, ProcessSummary, try_process_all};
use mavg_data::{DataLoadError, JsonLinesSink, open_events, output_path_for};

// ===========================================================================
// Helpers
// ===========================================================================

/// Create a temporary directory with a unique name for test isolation.
fn make_test_dir(suffix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "mavg_e2e_test_{suffix}_{}",
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn cleanup(dir: &Path) {
    let _ = fs::remove_dir_all(dir);
}

/// One input line for an event at `18:MM:SS.ffffff` on 2018-12-26.
fn event_line(time: &str, duration: u64) -> String {
    format!(
        r#"{{"timestamp": "2018-12-26 {time}","translation_id": "5aa5b2f39f7254a75aa5","source_language": "en","target_language": "fr","client_name": "airliberty","event_name": "translation_delivered","nr_words": 30, "duration": {duration}}}"#
    )
}

fn write_events(dir: &Path, events: &[(&str, u64)]) -> PathBuf {
    let path = dir.join("events.json");
    let mut text = String::new();
    for (time, duration) in events {
        text.push_str(&event_line(time, *duration));
        text.push('\n');
    }
    fs::write(&path, text).unwrap();
    path
}

fn run_file(input: &Path, window_size: u32) -> Result<ProcessSummary, EngineError> {
    let events = open_events(input).unwrap();
    let mut sink = JsonLinesSink::append(&output_path_for(input)).unwrap();
    try_process_all(events, window_size, &mut sink)
}

/// Output lines parsed back into `(date, average)` pairs.
fn read_output(input: &Path) -> Vec<(String, f64)> {
    let text = fs::read_to_string(output_path_for(input)).unwrap_or_default();
    text.lines()
        .map(|line| {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            let date = value["date"].as_str().unwrap().to_string();
            let average = value["average_delivery_time"].as_f64().unwrap();
            (date, average)
        })
        .collect()
}

fn expected(rows: &[(&str, f64)]) -> Vec<(String, f64)> {
    rows.iter()
        .map(|(time, average)| (format!("2018-12-26 {time}"), *average))
        .collect()
}

// ===========================================================================
// Scenarios
// ===========================================================================

#[test]
fn window_of_one_minute() {
    let dir = make_test_dir("w1");
    let input = write_events(
        &dir,
        &[("18:12:08.509654", 10), ("18:13:08.509654", 30)],
    );

    let summary = run_file(&input, 1).unwrap();
    assert_eq!(summary.events, 2);
    assert_eq!(summary.records, 3);
    assert_eq!(
        read_output(&input),
        expected(&[("18:12:00", 0.0), ("18:13:00", 10.0), ("18:14:00", 30.0)])
    );
    cleanup(&dir);
}

#[test]
fn window_of_ten_minutes() {
    let dir = make_test_dir("w10");
    let input = write_events(
        &dir,
        &[("18:12:08.509654", 10), ("18:13:08.509654", 30)],
    );

    run_file(&input, 10).unwrap();
    assert_eq!(
        read_output(&input),
        expected(&[("18:12:00", 0.0), ("18:13:00", 10.0), ("18:14:00", 20.0)])
    );
    cleanup(&dir);
}

#[test]
fn events_within_one_minute_share_a_record() {
    let dir = make_test_dir("same_minute");
    let input = write_events(
        &dir,
        &[
            ("18:12:08.509654", 10),
            ("18:12:09.509654", 30),
            ("18:12:11.509654", 50),
        ],
    );

    run_file(&input, 10).unwrap();
    assert_eq!(
        read_output(&input),
        expected(&[("18:12:00", 0.0), ("18:13:00", 30.0)])
    );
    cleanup(&dir);
}

#[test]
fn empty_minute_inside_the_stream() {
    let dir = make_test_dir("gap");
    let input = write_events(
        &dir,
        &[
            ("18:12:08.509654", 10),
            ("18:13:08.509654", 30),
            ("18:15:08.509654", 30),
            ("18:15:11.509654", 50),
        ],
    );

    run_file(&input, 1).unwrap();
    assert_eq!(
        read_output(&input),
        expected(&[
            ("18:12:00", 0.0),
            ("18:13:00", 10.0),
            ("18:14:00", 30.0),
            ("18:15:00", 0.0),
            ("18:16:00", 40.0),
        ])
    );
    cleanup(&dir);
}

#[test]
fn exact_minute_timestamps() {
    let dir = make_test_dir("aligned");
    let input = write_events(
        &dir,
        &[("18:12:00.000000", 10), ("18:13:00.000000", 30)],
    );

    run_file(&input, 1).unwrap();
    assert_eq!(
        read_output(&input),
        expected(&[("18:12:00", 10.0), ("18:13:00", 30.0)])
    );
    cleanup(&dir);
}

#[test]
fn window_of_five_minutes_with_long_gap() {
    let dir = make_test_dir("w5");
    let input = write_events(
        &dir,
        &[
            ("18:12:00.000000", 10),
            ("18:12:08.509654", 30),
            ("18:14:08.509654", 20),
            ("18:20:00.000000", 50),
        ],
    );

    let summary = run_file(&input, 5).unwrap();
    assert_eq!(summary.records, 9);
    assert_eq!(
        read_output(&input),
        expected(&[
            ("18:12:00", 10.0),
            ("18:13:00", 20.0),
            ("18:14:00", 20.0),
            ("18:15:00", 20.0),
            ("18:16:00", 20.0),
            ("18:17:00", 25.0),
            ("18:18:00", 20.0),
            ("18:19:00", 20.0),
            ("18:20:00", 50.0),
        ])
    );
    cleanup(&dir);
}

// ===========================================================================
// File handling
// ===========================================================================

#[test]
fn output_lines_are_exact_json_objects() {
    let dir = make_test_dir("exact");
    let input = write_events(&dir, &[("18:12:08.509654", 10)]);

    run_file(&input, 10).unwrap();
    let text = fs::read_to_string(dir.join("events_output.json")).unwrap();
    assert_eq!(
        text,
        "{\"date\":\"2018-12-26 18:12:00\",\"average_delivery_time\":0}\n\
         {\"date\":\"2018-12-26 18:13:00\",\"average_delivery_time\":10.0}\n"
    );
    cleanup(&dir);
}

#[test]
fn second_run_appends_identical_records() {
    let dir = make_test_dir("append");
    let input = write_events(
        &dir,
        &[("18:12:08.509654", 10), ("18:13:08.509654", 30)],
    );

    run_file(&input, 2).unwrap();
    let first = read_output(&input);
    run_file(&input, 2).unwrap();
    let both = read_output(&input);

    assert_eq!(both.len(), first.len() * 2);
    assert_eq!(&both[..first.len()], &first[..]);
    assert_eq!(&both[first.len()..], &first[..]);
    cleanup(&dir);
}

#[test]
fn empty_input_produces_no_records() {
    let dir = make_test_dir("empty");
    let input = dir.join("events.json");
    fs::write(&input, "\n\n").unwrap();

    let summary = run_file(&input, 10).unwrap();
    assert_eq!(summary, ProcessSummary::default());
    assert!(read_output(&input).is_empty());
    cleanup(&dir);
}

#[test]
fn malformed_line_keeps_earlier_records() {
    let dir = make_test_dir("malformed");
    let input = dir.join("events.json");
    fs::write(
        &input,
        format!(
            "{}\n{}\n{{\"timestamp\": 42}}\n{}\n",
            event_line("18:12:08.509654", 10),
            event_line("18:13:08.509654", 30),
            event_line("18:14:08.509654", 50),
        ),
    )
    .unwrap();

    let err = run_file(&input, 1).unwrap_err();
    let EngineError::Source(source) = &err else {
        panic!("expected source error, got {err:?}");
    };
    let data = source.downcast_ref::<DataLoadError>().unwrap();
    assert!(matches!(data, DataLoadError::Parse { line: 3, .. }));

    // The first two events closed 18:12 and 18:13; the pass stopped before
    // the final flush of 18:14.
    assert_eq!(
        read_output(&input),
        expected(&[("18:12:00", 0.0), ("18:13:00", 10.0)])
    );
    cleanup(&dir);
}

#[test]
fn timestamps_going_backwards_stop_the_run() {
    let dir = make_test_dir("backwards");
    let input = write_events(
        &dir,
        &[("18:13:08.509654", 10), ("18:12:08.509654", 30)],
    );

    let err = run_file(&input, 1).unwrap_err();
    assert!(err.to_string().contains("earlier than the previous event"), "{err}");
    assert_eq!(read_output(&input), expected(&[("18:13:00", 0.0)]));
    cleanup(&dir);
}

#[test]
fn zero_window_creates_no_records() {
    let dir = make_test_dir("zero");
    let input = write_events(&dir, &[("18:12:08.509654", 10)]);

    let err = run_file(&input, 0).unwrap_err();
    assert!(matches!(err, EngineError::InvalidWindowSize(0)));
    assert!(read_output(&input).is_empty());
    cleanup(&dir);
}
