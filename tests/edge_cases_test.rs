//! Edge case tests for decoding, keys and amounts through the public API.

use movement_summary::{
    Amount, DecodedRecord, EngineError, GroupKey, RecordError, RunConfig, Strategy,
    SummaryEngine, LAYOUT, MIN_RECORD_LEN, RECORD_LEN,
};
use std::io::Cursor;

// Re-implement the line builder since the crate's fixture is test-private
fn build_line(values: &[(&str, &str)]) -> String {
    let mut bytes = vec![b' '; RECORD_LEN];
    for (name, value) in values {
        let spec = LAYOUT.iter().find(|s| s.name == *name).unwrap();
        let at = spec.start - 1;
        bytes[at..at + value.len()].copy_from_slice(value.as_bytes());
    }
    String::from_utf8(bytes).unwrap()
}

fn movement(client_number: &str, symbol: &str, long: (&str, &str), short: (&str, &str)) -> String {
    build_line(&[
        ("record_code", "315"),
        ("client_type", "CL"),
        ("client_number", client_number),
        ("account_number", "0003"),
        ("sub_account_number", "0001"),
        ("opposite_party_code", "SGXDC"),
        ("product_group_code", "FU"),
        ("exchange_code", "CME"),
        ("symbol", symbol),
        ("expiration_date", "20100910"),
        ("quantity_long_sign", long.0),
        ("quantity_long", long.1),
        ("quantity_short_sign", short.0),
        ("quantity_short", short.1),
    ])
}

fn run(lines: &[String], config: RunConfig) -> Result<movement_summary::SummaryReport, EngineError> {
    SummaryEngine::new(config).run(Cursor::new(lines.join("\n")))
}

// ==================== DECODING ====================

#[test]
fn test_exact_length_line_keeps_every_field() {
    let mut line = movement("1234", "N1", ("+", "0000000004"), ("-", "0000000002"));
    line.replace_range(176..RECORD_LEN, &"F".repeat(RECORD_LEN - 176));
    assert_eq!(line.len(), RECORD_LEN);

    let record = DecodedRecord::decode(&line).unwrap();
    assert_eq!(record.record_code, "315");
    assert_eq!(record.client_number, "1234");
    assert_eq!(record.expiration_date, "20100910");
    assert_eq!(record.quantity_long, "0000000004");
    assert_eq!(record.filler, "F".repeat(127));
}

#[test]
fn test_line_of_exactly_minimum_length() {
    let line = movement("1234", "N1", ("+", "0000000004"), ("-", "0000000002"));
    let record = DecodedRecord::decode(&line[..MIN_RECORD_LEN]).unwrap();

    assert_eq!(record.quantity_short, "0000000002");
    assert_eq!(record.transaction_date, "");
    assert_eq!(record.filler, "");
}

#[test]
fn test_one_byte_short_of_minimum() {
    let line = movement("1234", "N1", ("+", "0000000004"), ("-", "0000000002"));
    assert_eq!(
        DecodedRecord::decode(&line[..MIN_RECORD_LEN - 1]).unwrap_err(),
        RecordError::TooShort {
            len: MIN_RECORD_LEN - 1,
            min: MIN_RECORD_LEN
        }
    );
}

#[test]
fn test_fields_are_trimmed() {
    let line = build_line(&[("client_type", " CL "), ("symbol", "  N1  ")]);
    let record = DecodedRecord::decode(&line).unwrap();
    assert_eq!(record.client_type, "CL");
    assert_eq!(record.symbol, "N1");
}

// ==================== KEYS ====================

#[test]
fn test_empty_key_fields_still_group() {
    let line = build_line(&[("quantity_long", "1"), ("quantity_short", "0")]);
    let record = DecodedRecord::decode(&line).unwrap();
    let key = GroupKey::from_record(&record).unwrap();
    assert_eq!(key.combined(), ",");
}

#[test]
fn test_period_variants_share_a_group() {
    let lines = vec![
        movement("1234", "N1", ("+", "0000000010"), ("+", "0000000000")),
        movement("1234", "N.1", ("+", "0000000005"), ("+", "0000000000")),
        movement("1234", ".N1.", ("+", "0000000001"), ("+", "0000000000")),
    ];
    let report = run(&lines, RunConfig::default()).unwrap();

    assert_eq!(report.len(), 1);
    assert_eq!(
        report.get("CL123400030001,CMEFUN120100910"),
        Some(Amount::from(16))
    );
}

// ==================== AMOUNTS ====================

#[test]
fn test_two_records_share_key_third_is_separate() {
    let lines = vec![
        movement("1234", "N1", ("+", "0000000200"), ("+", "0000000000")),
        movement("1234", "N1", ("+", "0000000085"), ("-", "0000000000")),
        movement("1234", "NK", ("+", "0000000000"), ("+", "0000000215")),
    ];
    let report = run(&lines, RunConfig::default()).unwrap();

    assert_eq!(
        report.get("CL123400030001,CMEFUN120100910"),
        Some(Amount::from(285))
    );
    assert_eq!(
        report.get("CL123400030001,CMEFUNK20100910"),
        Some(Amount::from(-215))
    );
}

#[test]
fn test_large_quantities_stay_exact() {
    let lines: Vec<String> = (0..1000)
        .map(|_| movement("1234", "N1", ("+", "9999999999"), ("+", "0000000000")))
        .collect();
    let report = run(&lines, RunConfig::default()).unwrap();

    assert_eq!(
        report.get("CL123400030001,CMEFUN120100910").unwrap().to_string(),
        "9999999999000.0"
    );
}

#[test]
fn test_fractional_quantities() {
    let lines = vec![
        movement("1234", "N1", ("+", "0000000.10"), ("+", "0000000000")),
        movement("1234", "N1", ("+", "0000000.20"), ("+", "0000000000")),
    ];
    let report = run(&lines, RunConfig::default()).unwrap();

    assert_eq!(
        report.get("CL123400030001,CMEFUN120100910").unwrap().to_string(),
        "0.3"
    );
}

#[test]
fn test_blank_quantity_aborts() {
    let lines = vec![
        movement("1234", "N1", ("+", "0000000001"), ("+", "0000000000")),
        movement("1234", "N1", ("+", ""), ("+", "0000000000")),
    ];
    match run(&lines, RunConfig::default()) {
        Err(EngineError::Record { line, source }) => {
            assert_eq!(line, 2);
            assert_eq!(
                source,
                RecordError::NotNumeric {
                    field: "quantity_long",
                    value: String::new()
                }
            );
        }
        other => panic!("expected numeric fault, got {:?}", other),
    }
}

// ==================== STRATEGIES ====================

#[test]
fn test_fork_join_reports_first_bad_line() {
    let mut lines: Vec<String> = (0..64)
        .map(|_| movement("1234", "N1", ("+", "0000000001"), ("+", "0000000000")))
        .collect();
    lines[20] = lines[20][..40].to_string();
    lines[50] = movement("1234", "N1", ("+", "BAD"), ("+", "0000000000"));

    let config = RunConfig::builder()
        .strategy(Strategy::ForkJoin)
        .fork_threshold(4)
        .build()
        .unwrap();
    match run(&lines, config) {
        Err(EngineError::Record { line, source }) => {
            assert_eq!(line, 21);
            assert!(source.is_format_fault());
        }
        other => panic!("expected format fault, got {:?}", other),
    }
}

#[test]
fn test_single_record_every_strategy() {
    let lines = vec![movement("1234", "N1", ("+", "0000000004"), ("-", "0000000002"))];
    for strategy in [Strategy::Sequential, Strategy::ForkJoin, Strategy::Chunked] {
        let config = RunConfig::builder().strategy(strategy).build().unwrap();
        let report = run(&lines, config).unwrap();
        assert_eq!(
            report.get("CL123400030001,CMEFUN120100910"),
            Some(Amount::from(6))
        );
    }
}
