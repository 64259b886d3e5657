use std::fmt;
use std::io;
use std::path::Path;

#[derive(Debug)]
pub struct CliError {
    pub msg: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.msg.fmt(f)
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Format a user friendly I/O error message with suggestions.
pub fn format_io_error(operation: &str, path: &Path, err: &io::Error) -> String {
    use io::ErrorKind::*;
    let suggestion = match err.kind() {
        NotFound => "Check that the file exists and the path is correct.",
        PermissionDenied => "Check permissions or run as a different user.",
        UnexpectedEof => "File appears truncated or corrupted.",
        WriteZero => "Disk may be full. Free up space and try again.",
        Other if err.raw_os_error() == Some(28) => "Disk may be full. Free up space and try again.",
        _ => "Check permissions or free up disk space.",
    };
    format!(
        "Error {} '{}': {}. {}",
        operation,
        path.display(),
        err,
        suggestion
    )
}

/// Convert an I/O error into a CLI error with context.
pub fn io_cli_error(operation: &str, path: &Path, err: io::Error) -> CliError {
    CliError {
        msg: format_io_error(operation, path, &err),
        source: Some(Box::new(err)),
    }
}

/// Simple CLI error from string.
pub fn simple_cli_error(msg: &str) -> CliError {
    CliError {
        msg: msg.to_string(),
        source: None,
    }
}

/// Input is not a GeoTIFF.
pub fn extension_error(path: &Path) -> CliError {
    CliError {
        msg: format!(
            "Invalid file extension for '{}'. Expected .tif or .tiff. Check the input file.",
            path.display()
        ),
        source: None,
    }
}

/// Convert a library error into a CLI error with a hint.
pub fn sfcc_cli_error(context: &str, err: crate::SfccError) -> CliError {
    CliError {
        msg: format!("{}: {}", context, cli_hint(&err)),
        source: Some(Box::new(err)),
    }
}

/// Return an actionable hint for an error variant.
pub fn cli_hint(err: &crate::SfccError) -> String {
    use crate::SfccError::*;
    match err {
        Header(msg) => format!("{msg}. Verify the file is an intact SFCC file."),
        Parse(msg) => format!("{msg}. Check the filename follows the sfccompress naming scheme."),
        Config(msg) => format!("{msg}. Invalid configuration."),
        JobLog(msg) => format!("{msg}. Check the file was written by parallel --joblog."),
        Report(msg) => format!("{msg}. Inputs of different benchmark runs may be mixed."),
        Convert(msg) => msg.clone(),
        Subprocess { command, status } => {
            format!("`{command}` failed with {status}. Check the tool paths and the input file.")
        }
        Io(io) => format!("{io}"),
        Csv(e) => format!("{e}. Check the CSV is well formed."),
        Json(e) => format!("{e}. Check the JSON is well formed."),
        Tiff(e) => format!("{e}. Check the input is a readable GeoTIFF."),
        Pattern(e) => format!("{e}"),
    }
}

/// True when `path` ends in `.tif` or `.tiff`, any case.
pub fn has_tiff_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "tif" | "tiff"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_carry_path_and_hint() {
        let err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let cli = io_cli_error("reading input file", Path::new("dem.sfcc"), err);
        assert!(cli.msg.starts_with("Error reading input file 'dem.sfcc': gone."));
        assert!(cli.msg.contains("Check that the file exists"));
        assert!(std::error::Error::source(&cli).is_some());
    }

    #[test]
    fn hints_per_variant() {
        let cli = sfcc_cli_error("reading header", crate::SfccError::Header("bad magic".into()));
        assert_eq!(cli.msg, "reading header: bad magic. Verify the file is an intact SFCC file.");
        assert!(has_tiff_extension(Path::new("a/dem.TIF")));
        assert!(!has_tiff_extension(Path::new("dem.sfcc")));
    }
}
