use std::fs;
use std::path::{Path, PathBuf};

use binlog_core::{MessageDecoder, ReaderSource, Tracker, format_line};

fn golden_dir(case: &str) -> PathBuf {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..");
    root.join("tests").join("golden").join(case)
}

fn load_expected(case: &str) -> Vec<String> {
    let path = golden_dir(case).join("expected.txt");
    let text = fs::read_to_string(&path).expect("read expected.txt");
    text.lines().map(str::to_string).collect()
}

fn decoder(case: &str) -> MessageDecoder<ReaderSource<std::io::BufReader<fs::File>>> {
    let input = golden_dir(case).join("input.bin");
    MessageDecoder::new(ReaderSource::open(&input).expect("open input.bin"))
}

#[test]
fn golden_log_lines() {
    let mut decoder = decoder("log_lines");
    let mut actual = Vec::new();
    while let Some(message) = decoder.next_message().expect("decode") {
        actual.push(format_line(&message));
    }

    assert_eq!(actual, load_expected("log_lines"), "golden mismatch in log_lines");
    assert_eq!(decoder.trailing_bytes(), 0);
}

#[test]
fn golden_distances() {
    let mut decoder = decoder("distances");
    let mut tracker = Tracker::default();
    let mut actual = Vec::new();
    while let Some(message) = decoder.next_message().expect("decode") {
        tracker.on_message(&message).expect("distance reading");
        actual.push(tracker.render());
    }

    assert_eq!(actual, load_expected("distances"), "golden mismatch in distances");
}

#[test]
fn golden_distances_cover_every_sensor() {
    let expected = load_expected("distances");
    assert_eq!(expected.len(), 12);
    let last = expected.last().expect("last line");
    for id in ["left=", "front=", "right="] {
        assert!(last.contains(id), "missing {id} in {last}");
    }
}
