//! Reader for the tab-separated `--joblog` files of GNU parallel.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::SfccError;

/// One finished job.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JobRecord {
    #[serde(rename = "Seq")]
    pub seq: u64,
    #[serde(rename = "Host")]
    pub host: String,
    #[serde(rename = "Starttime")]
    pub start_time: f64,
    /// Wall-clock seconds.
    #[serde(rename = "JobRuntime")]
    pub job_runtime: f64,
    #[serde(rename = "Send")]
    pub send: u64,
    #[serde(rename = "Receive")]
    pub receive: u64,
    #[serde(rename = "Exitval")]
    pub exit_value: i64,
    #[serde(rename = "Signal")]
    pub signal: i64,
    #[serde(rename = "Command")]
    pub command: String,
}

impl JobRecord {
    /// Runtime in whole milliseconds, truncated.
    pub fn runtime_ms(&self) -> u64 {
        (self.job_runtime * 1000.0) as u64
    }

    pub fn succeeded(&self) -> bool {
        self.exit_value == 0 && self.signal == 0
    }
}

/// Parse a job log. `has_header` is false for logs written with the header
/// stripped.
pub fn read_joblog<R: Read>(reader: R, has_header: bool) -> Result<Vec<JobRecord>, SfccError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(has_header)
        .quoting(false)
        .trim(csv::Trim::Fields)
        .from_reader(reader);
    let mut records = Vec::new();
    for (line, result) in rdr.deserialize().enumerate() {
        let record: JobRecord = result.map_err(|e| {
            SfccError::JobLog(format!("entry {}: {e}", line + 1))
        })?;
        records.push(record);
    }
    Ok(records)
}

pub fn read_joblog_file<P: AsRef<Path>>(path: P, has_header: bool) -> Result<Vec<JobRecord>, SfccError> {
    let file = File::open(path)?;
    read_joblog(file, has_header)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = "Seq\tHost\tStarttime\tJobRuntime\tSend\tReceive\tExitval\tSignal\tCommand\n\
        1\t:\t1571920000.123\t1.234\t0\t12\t0\t0\tsfccompress compress -s HILBERT -c LZ77 dem.sfcc\n\
        2\t:\t1571920001.500\t0.5\t0\t0\t1\t0\tgzip -k -9 -f \"dem.sfcc.hbrt\"\n";

    #[test]
    fn parses_header_and_rows() {
        let records = read_joblog(LOG.as_bytes(), true).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].runtime_ms(), 1234);
        assert!(records[0].succeeded());
        assert_eq!(records[0].command, "sfccompress compress -s HILBERT -c LZ77 dem.sfcc");
        assert!(!records[1].succeeded());
        assert_eq!(records[1].command, "gzip -k -9 -f \"dem.sfcc.hbrt\"");
    }

    #[test]
    fn parses_headerless_log() {
        let body = LOG.split_once('\n').unwrap().1;
        let records = read_joblog(body.as_bytes(), false).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].seq, 2);
    }

    #[test]
    fn malformed_row_is_an_error() {
        let bad = "Seq\tHost\tStarttime\tJobRuntime\tSend\tReceive\tExitval\tSignal\tCommand\nx\t:\n";
        assert!(matches!(read_joblog(bad.as_bytes(), true), Err(SfccError::JobLog(_))));
    }
}
