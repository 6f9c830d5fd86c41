//! Error types for the summary pipeline.

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Faults raised while turning a single line into a contribution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The line ends before the last field the pipeline needs
    #[error("record is {len} bytes long, at least {min} required")]
    TooShort { len: usize, min: usize },

    /// A field boundary falls inside a multi-byte character
    #[error("field `{field}` does not start or end on a character boundary")]
    SplitCharacter { field: &'static str },

    /// The line's bytes are not valid UTF-8
    #[error("line is not valid UTF-8 (invalid byte at offset {offset})")]
    InvalidUtf8 { offset: usize },

    /// A key subfield carries the report delimiter
    #[error("field `{field}` contains a comma and cannot be used in a key")]
    DelimiterInKey { field: &'static str },

    /// A quantity field does not hold a number
    #[error("field `{field}` holds {value:?}, which is not a number")]
    NotNumeric { field: &'static str, value: String },
}

impl RecordError {
    /// Returns `true` for faults about the shape of the line itself.
    pub fn is_format_fault(&self) -> bool {
        !self.is_numeric_fault()
    }

    /// Returns `true` when a quantity could not be parsed.
    pub fn is_numeric_fault(&self) -> bool {
        matches!(self, RecordError::NotNumeric { .. })
    }
}

/// Failures while writing the report.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("CSV output error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("output I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that abort a run.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to open or read the input
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line could not be decoded or its quantities parsed
    #[error("Invalid record at line {line}: {source}")]
    Record {
        line: usize,
        #[source]
        source: RecordError,
    },

    /// The report could not be written
    #[error("Failed to write report: {0}")]
    Sink(#[from] SinkError),

    /// Rejected run settings
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EngineError {
    /// Attaches the 1-based line number to a record fault.
    pub fn at_line(line: usize, source: RecordError) -> Self {
        EngineError::Record { line, source }
    }
}
