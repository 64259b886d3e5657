use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::vocab::Compression;
use crate::SfccError;

/// Environment variable naming a JSON tool configuration.
pub const TOOLS_ENV: &str = "SFCC_TOOLS";

/// Executables invoked by the benchmark driver.
///
/// Every field defaults to the bare program name so it is resolved on
/// `PATH`. A JSON file may override any subset:
///
/// ```json
/// { "sfccompress": "/opt/sfc/bin/sfccompress", "lzo": "/usr/local/bin/lzop" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolPaths {
    pub sfccompress: PathBuf,
    pub gzip: PathBuf,
    pub bzip2: PathBuf,
    pub lz4: PathBuf,
    pub lzo: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            sfccompress: PathBuf::from("sfccompress"),
            gzip: PathBuf::from("gzip"),
            bzip2: PathBuf::from("bzip2"),
            lz4: PathBuf::from("lz4"),
            lzo: PathBuf::from("lzo"),
        }
    }
}

impl ToolPaths {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SfccError> {
        let text = fs::read_to_string(path.as_ref())?;
        serde_json::from_str(&text).map_err(|e| {
            SfccError::Config(format!(
                "invalid tool configuration {}: {e}",
                path.as_ref().display()
            ))
        })
    }

    /// Load from `path` when given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, SfccError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    /// Executable handling `compression`.
    pub fn program_for(&self, compression: Compression) -> &Path {
        match compression {
            Compression::Bzip2 => &self.bzip2,
            Compression::Gzip => &self.gzip,
            Compression::Lz4 => &self.lz4,
            Compression::Lzo => &self.lzo,
            _ => &self.sfccompress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_defaults() {
        let tools: ToolPaths = serde_json::from_str(r#"{"gzip": "/bin/pigz"}"#).unwrap();
        assert_eq!(tools.gzip, PathBuf::from("/bin/pigz"));
        assert_eq!(tools.lz4, PathBuf::from("lz4"));
        assert_eq!(tools.program_for(Compression::Huffman), Path::new("sfccompress"));
    }

    #[test]
    fn unknown_tool_is_rejected() {
        assert!(serde_json::from_str::<ToolPaths>(r#"{"zstd": "zstd"}"#).is_err());
    }
}
