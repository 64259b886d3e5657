use thiserror::Error;

#[derive(Error, Debug)]
pub enum SfccError {
    /// Malformed or truncated SFCC header.
    #[error("header error: {0}")]
    Header(String),

    /// Unknown curve, compression or filename component.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid tool or run configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Malformed job log line.
    #[error("job log error: {0}")]
    JobLog(String),

    /// Inconsistent benchmark results while building a report.
    #[error("report error: {0}")]
    Report(String),

    /// Source dataset cannot be turned into an SFCC file.
    #[error("conversion error: {0}")]
    Convert(String),

    /// An external program exited unsuccessfully.
    #[error("command `{command}` failed: {status}")]
    Subprocess { command: String, status: String },

    /// Propagated I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TIFF error: {0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}
