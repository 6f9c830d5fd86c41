//! Summary report and its renderings.

use crate::decimal::Amount;
use crate::error::SinkError;
use crate::key::GroupKey;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// Column names of the CSV rendering.
pub const CSV_HEADER: [&str; 3] = [
    "Client_Information",
    "Product_Information",
    "Total_Transaction_Amount",
];

/// Final net amount per combined key, in key order. Read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryReport {
    totals: BTreeMap<String, Amount>,
}

/// One line of the report, with the combined key split back in two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportRow<'a> {
    pub client: &'a str,
    pub product: &'a str,
    pub amount: Amount,
}

impl SummaryReport {
    pub(crate) fn new(totals: BTreeMap<String, Amount>) -> Self {
        SummaryReport { totals }
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Net amount for a combined `client,product` key.
    pub fn get(&self, key: &str) -> Option<Amount> {
        self.totals.get(key).copied()
    }

    /// `(combined key, amount)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Amount)> {
        self.totals.iter().map(|(key, amount)| (key.as_str(), *amount))
    }

    pub fn rows(&self) -> impl Iterator<Item = ReportRow<'_>> {
        self.iter().map(|(key, amount)| {
            let (client, product) = GroupKey::split_combined(key);
            ReportRow {
                client,
                product,
                amount,
            }
        })
    }

    /// Writes the header and one row per key. The header is written even
    /// when the report is empty.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), SinkError> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        csv_writer.write_record(CSV_HEADER)?;
        for row in self.rows() {
            csv_writer.serialize(row)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Object mapping each combined key to its amount as a JSON number.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .iter()
            .map(|(key, amount)| (key.to_string(), Value::from(amount.to_f64())))
            .collect();
        Value::Object(map)
    }

    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<(), SinkError> {
        serde_json::to_writer_pretty(&mut writer, &self.to_json())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

/// Destination for a finished report.
pub trait ReportSink {
    fn emit(&mut self, report: &SummaryReport) -> Result<(), SinkError>;
}

/// Writes the CSV rendering.
pub struct CsvSink<W: Write> {
    writer: W,
}

impl<W: Write> CsvSink<W> {
    pub fn new(writer: W) -> Self {
        CsvSink { writer }
    }
}

impl<W: Write> ReportSink for CsvSink<W> {
    fn emit(&mut self, report: &SummaryReport) -> Result<(), SinkError> {
        report.write_csv(&mut self.writer)
    }
}

/// Writes the JSON rendering.
pub struct JsonSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        JsonSink { writer }
    }
}

impl<W: Write> ReportSink for JsonSink<W> {
    fn emit(&mut self, report: &SummaryReport) -> Result<(), SinkError> {
        report.write_json(&mut self.writer)
    }
}

/// Rendering chosen for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl OutputFormat {
    /// A sink writing this format to `writer`.
    pub fn sink<'a, W: Write + 'a>(self, writer: W) -> Box<dyn ReportSink + 'a> {
        match self {
            OutputFormat::Csv => Box::new(CsvSink::new(writer)),
            OutputFormat::Json => Box::new(JsonSink::new(writer)),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown format '{other}' (expected csv or json)")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        })
    }
}
