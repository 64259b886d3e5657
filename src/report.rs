//! CSV summaries of file sizes and job runtimes.

use std::collections::HashMap;
use std::io::{Read, Write};

use log::{debug, warn};
use serde::{Deserialize, Serialize, Serializer};

use crate::joblog::JobRecord;
use crate::name::{legacy_command_info, legacy_name_info};
use crate::vocab::{compression_label, Compression};
use crate::SfccError;

/// One `size<TAB>path` line of a `du`-style report.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SizeLine {
    pub size: u64,
    pub path: String,
}

pub fn read_size_lines<R: Read>(reader: R) -> Result<Vec<SizeLine>, SfccError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quoting(false)
        .trim(csv::Trim::Fields)
        .from_reader(reader);
    let mut lines = Vec::new();
    for result in rdr.deserialize() {
        lines.push(result?);
    }
    Ok(lines)
}

/// `True`/`False`, the spelling the benchmark notebooks key on.
pub fn bool_label(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

pub(crate) fn serialize_bool_label<S: Serializer>(
    value: &bool,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(bool_label(*value))
}

#[derive(Debug, Serialize)]
struct SizeRow<'a> {
    bytes: u64,
    name: &'a str,
    curve: String,
    compression: &'a str,
    #[serde(serialize_with = "serialize_bool_label")]
    bittransposed: bool,
}

#[derive(Debug, Serialize)]
struct RuntimeRow<'a> {
    runtime_ms: u64,
    name: &'a str,
    curve: String,
    compression: &'a str,
    #[serde(serialize_with = "serialize_bool_label")]
    bittransposed: bool,
}

/// Size report: `bytes,name,curve,compression,bittransposed`.
///
/// Uncompressed files and BWT files without a BWT-aware scheme are skipped.
pub fn du_to_csv<W: Write>(lines: &[SizeLine], writer: W) -> Result<usize, SfccError> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(["bytes", "name", "curve", "compression", "bittransposed"])?;
    let mut rows = 0;
    for line in lines {
        let info = legacy_name_info(&line.path)?;
        let label = compression_label(info.compression, info.bwt);
        if info.compression == Compression::None || (info.bwt && !label.contains("BWT")) {
            debug!("skipping {}", line.path);
            continue;
        }
        wtr.serialize(SizeRow {
            bytes: line.size,
            name: &info.filename,
            curve: info.sfc.to_string(),
            compression: &label,
            bittransposed: info.bitshuffle,
        })?;
        rows += 1;
    }
    wtr.flush()?;
    Ok(rows)
}

/// Runtime report: `runtime_ms,name,curve,compression,bittransposed`.
///
/// BWT jobs without a BWT-aware scheme are skipped. Failed jobs are kept.
pub fn joblog_to_csv<W: Write>(records: &[JobRecord], writer: W) -> Result<usize, SfccError> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(["runtime_ms", "name", "curve", "compression", "bittransposed"])?;
    let mut rows = 0;
    for record in records {
        if !record.succeeded() {
            warn!("job no. {} failed: {}", record.seq, record.command);
        }
        let info = legacy_command_info(&record.command)?;
        let label = compression_label(info.compression, info.bwt);
        if info.bwt && !label.contains("BWT") {
            debug!("skipping {}", record.command);
            continue;
        }
        wtr.serialize(RuntimeRow {
            runtime_ms: record.runtime_ms(),
            name: &info.filename,
            curve: info.sfc.to_string(),
            compression: &label,
            bittransposed: info.bitshuffle,
        })?;
        rows += 1;
    }
    wtr.flush()?;
    Ok(rows)
}

/// Keys left over after [`combine_stats`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CombineReport {
    /// New rows with no original row of the same key; appended at the end.
    pub unmatched_new: Vec<String>,
    /// BWT rows of the original file that kept their old values.
    pub unreplaced_bwt: Vec<String>,
}

/// Number of leading columns identifying a statistics row.
pub const STATS_KEY_COLUMNS: usize = 4;

fn row_key(record: &csv::StringRecord) -> String {
    record
        .iter()
        .take(STATS_KEY_COLUMNS)
        .collect::<Vec<_>>()
        .join(",")
}

/// Keyed rows in first-seen order; a repeated key replaces the earlier row.
fn keyed_rows<R: Read>(
    reader: R,
) -> Result<(csv::StringRecord, Vec<(String, csv::StringRecord)>), SfccError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let header = rdr.headers()?.clone();
    let mut rows: Vec<(String, csv::StringRecord)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for result in rdr.records() {
        let record = result?;
        let key = row_key(&record);
        match index.get(&key) {
            Some(&i) => rows[i].1 = record,
            None => {
                index.insert(key.clone(), rows.len());
                rows.push((key, record));
            }
        }
    }
    Ok((header, rows))
}

/// Replace rows of `original` with rows of `new` sharing the same key.
pub fn combine_stats<R1: Read, R2: Read, W: Write>(
    original: R1,
    new: R2,
    writer: W,
) -> Result<CombineReport, SfccError> {
    let (header, original_rows) = keyed_rows(original)?;
    let (_, new_rows) = keyed_rows(new)?;
    let mut replacements: HashMap<String, csv::StringRecord> = new_rows.iter().cloned().collect();

    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);
    wtr.write_record(&header)?;
    let mut report = CombineReport::default();
    for (key, record) in original_rows {
        match replacements.remove(&key) {
            Some(replacement) => wtr.write_record(&replacement)?,
            None => {
                if key.contains("BWT") {
                    report.unreplaced_bwt.push(key);
                }
                wtr.write_record(&record)?;
            }
        }
    }
    for (key, record) in new_rows {
        if replacements.remove(&key).is_some() {
            wtr.write_record(&record)?;
            report.unmatched_new.push(key);
        }
    }
    wtr.flush()?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size_lines(text: &str) -> Vec<SizeLine> {
        read_size_lines(text.as_bytes()).unwrap()
    }

    #[test]
    fn du_report_skips_uncompressed_and_plain_bwt() {
        let lines = size_lines(
            "100\t/data/dem.sfcc.hbrt\n\
             40\t/data/dem.sfcc.hbrt.btr.gz\n\
             35\t/data/dem.sfcc.mrtn.bwt.lz77\n\
             50\t/data/dem.sfcc.bwt\n\
             30\t/data/dem.sfcc.bwt.hff\n",
        );
        let mut out = Vec::new();
        let rows = du_to_csv(&lines, &mut out).unwrap();
        assert_eq!(rows, 2);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "bytes,name,curve,compression,bittransposed\n\
             40,dem,Hilbert,GZIP,True\n\
             35,dem,Z-Order,BWT77,False\n"
        );
    }

    #[test]
    fn joblog_report_uses_native_arguments() {
        let log = "Seq\tHost\tStarttime\tJobRuntime\tSend\tReceive\tExitval\tSignal\tCommand\n\
            1\t:\t0\t2.5\t0\t0\t0\t0\tsfccompress compress -s MORTON -c BZIP_LZ77 -b dem.sfcc\n\
            2\t:\t0\t1.0\t0\t0\t0\t0\tsfccompress compress -s ROW_MAJOR -c BWT dem.sfcc\n\
            3\t:\t0\t1.0\t0\t0\t2\t0\tsfccompress compress -s HILBERT -c RLE dem.sfcc\n";
        let records = crate::joblog::read_joblog(log.as_bytes(), true).unwrap();
        let mut out = Vec::new();
        assert_eq!(joblog_to_csv(&records, &mut out).unwrap(), 3);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "runtime_ms,name,curve,compression,bittransposed\n\
             2500,dem,Z-Order,BWT77,True\n\
             1000,dem,Raster,BWT,False\n\
             1000,dem,Hilbert,RLE,False\n"
        );
    }

    #[test]
    fn combine_replaces_matching_rows_and_appends_rest() {
        let original = "name,curve,compression,bwt,bytes\n\
                        dem,Raster,LZ77,false,10\n\
                        dem,Raster,BWT77,true,20\n\
                        dem,Gray,RLE,false,30\n";
        let new = "name,curve,compression,bwt,bytes\n\
                   dem,Gray,RLE,false,31\n\
                   dem,Hilbert,RLE,false,40\n";
        let mut out = Vec::new();
        let report = combine_stats(original.as_bytes(), new.as_bytes(), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "name,curve,compression,bwt,bytes\n\
             dem,Raster,LZ77,false,10\n\
             dem,Raster,BWT77,true,20\n\
             dem,Gray,RLE,false,31\n\
             dem,Hilbert,RLE,false,40\n"
        );
        assert_eq!(report.unmatched_new, vec!["dem,Hilbert,RLE,false"]);
        assert_eq!(report.unreplaced_bwt, vec!["dem,Raster,BWT77,true"]);
    }
}
