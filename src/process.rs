//! Join file sizes and job runtimes into one result per benchmarked file.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Write;
use std::path::Path;

use log::{debug, info};
use serde::Serialize;

use crate::bench_config::BenchConfig;
use crate::joblog::JobRecord;
use crate::name::{parse_command, parse_filename, SfccName};
use crate::report::{serialize_bool_label, SizeLine};
use crate::runner::Direction;
use crate::vocab::Compression;
use crate::SfccError;

/// Measurements collected for one file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Results {
    pub size: Option<u64>,
    pub runtime_compress: Option<u64>,
    pub runtime_decompress: Option<u64>,
}

impl Results {
    pub fn is_complete(&self) -> bool {
        self.size.is_some() && self.runtime_compress.is_some() && self.runtime_decompress.is_some()
    }
}

/// Whether a job log comes from `sfccompress` or from an external compressor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Sfccompress,
    External,
}

#[derive(Debug, Serialize)]
struct ResultRow<'a> {
    bytes: Option<u64>,
    runtime_compress: Option<u64>,
    runtime_decompress: Option<u64>,
    name: &'a str,
    curve: String,
    compression: String,
    #[serde(serialize_with = "serialize_bool_label")]
    bwt: bool,
    #[serde(serialize_with = "serialize_bool_label")]
    bitshuffle: bool,
}

/// Results keyed by file, in the order the size report listed them.
#[derive(Debug, Default)]
pub struct ResultSet {
    order: Vec<SfccName>,
    entries: HashMap<SfccName, Results>,
    external: Vec<SfccName>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, name: &SfccName) -> Option<&Results> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SfccName, &Results)> {
        self.order.iter().map(move |n| (n, &self.entries[n]))
    }

    /// Register every file of a size report.
    pub fn load_sizes(&mut self, lines: &[SizeLine]) -> Result<(), SfccError> {
        for line in lines {
            let base = Path::new(&line.path)
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(&line.path);
            let name = parse_filename(base)?;
            if !self.entries.contains_key(&name) {
                self.order.push(name.clone());
            }
            self.entries.insert(
                name,
                Results {
                    size: Some(line.size),
                    ..Results::default()
                },
            );
        }
        Ok(())
    }

    /// Attach runtimes from a job log. Returns the number of jobs used.
    pub fn load_joblog(
        &mut self,
        records: &[JobRecord],
        direction: Direction,
        source: Source,
    ) -> Result<usize, SfccError> {
        let mut used = 0;
        for record in records {
            if !record.succeeded() {
                debug!("found failed job no. {}", record.seq);
                continue;
            }
            let name = parse_command(&record.command)?;
            let results = self.entries.get_mut(&name).ok_or_else(|| {
                SfccError::Report(format!("found an unexpected SFCC [{name}]: {}", record.command))
            })?;
            let slot = match direction {
                Direction::Compress => &mut results.runtime_compress,
                Direction::Decompress => &mut results.runtime_decompress,
            };
            if slot.is_some() {
                return Err(SfccError::Report(format!(
                    "already existing {} runtime: {}",
                    match direction {
                        Direction::Compress => "compression",
                        Direction::Decompress => "decompression",
                    },
                    record.command
                )));
            }
            *slot = Some(record.runtime_ms());
            if source == Source::External && direction == Direction::Compress {
                self.external.push(name);
            }
            used += 1;
        }
        Ok(used)
    }

    /// Entries missing a size or a runtime. Original files are never
    /// processed and only need a size.
    pub fn incomplete(&self) -> Vec<(&SfccName, &Results)> {
        self.iter()
            .filter(|(n, r)| !r.is_complete() && !n.config().is_original())
            .collect()
    }

    /// Add the reordering runtime to every externally compressed entry.
    ///
    /// External tools only see the already reordered file, so their cost is
    /// the reorder job plus their own. Original files were never reordered
    /// and add nothing.
    pub fn sum_external(&mut self) -> Result<(), SfccError> {
        for name in std::mem::take(&mut self.external) {
            let uncompressed = name.with_compression(Compression::None);
            if uncompressed.config().is_original() {
                continue;
            }
            let base = self.entries.get(&uncompressed).cloned().ok_or_else(|| {
                SfccError::Report(format!("cannot find original SFCC in entries: {uncompressed}"))
            })?;
            let entry = self
                .entries
                .get_mut(&name)
                .ok_or_else(|| SfccError::Report(format!("cannot find SFCC in entries: {name}")))?;
            entry.runtime_compress = add(entry.runtime_compress, base.runtime_compress);
            entry.runtime_decompress = add(entry.runtime_decompress, base.runtime_decompress);
        }
        Ok(())
    }

    /// Drop every entry whose stem is listed.
    pub fn remove_filenames(&mut self, ignore: &HashSet<String>) {
        self.order.retain(|n| !ignore.contains(&n.filename));
        self.entries.retain(|n, _| !ignore.contains(&n.filename));
    }

    /// Write the entries accepted by `filter`. Returns the number of rows.
    pub fn write_csv<W: Write, F: Fn(&SfccName) -> bool>(
        &self,
        writer: W,
        filter: F,
    ) -> Result<usize, SfccError> {
        let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
        wtr.write_record([
            "bytes",
            "runtime_compress",
            "runtime_decompress",
            "name",
            "curve",
            "compression",
            "bwt",
            "bitshuffle",
        ])?;
        let mut rows = 0;
        for (name, results) in self.iter().filter(|(n, _)| filter(n)) {
            wtr.serialize(ResultRow {
                bytes: results.size,
                runtime_compress: results.runtime_compress,
                runtime_decompress: results.runtime_decompress,
                name: &name.filename,
                curve: name.sfc.to_string(),
                compression: name.compression.to_string(),
                bwt: name.bwt,
                bitshuffle: name.bitshuffle,
            })?;
            rows += 1;
        }
        wtr.flush()?;
        Ok(rows)
    }

    /// Number of entries per configuration, every valid configuration listed.
    pub fn config_counts(&self) -> BTreeMap<BenchConfig, usize> {
        let mut counts: BTreeMap<BenchConfig, usize> =
            BenchConfig::all_valid().into_iter().map(|c| (c, 0)).collect();
        for name in &self.order {
            *counts.entry(name.config()).or_default() += 1;
        }
        counts
    }
}

fn add(a: Option<u64>, b: Option<u64>) -> Option<u64> {
    Some(a? + b?)
}

/// Job logs feeding one aggregation run.
pub struct JobLogs<'a> {
    pub compress: &'a [JobRecord],
    pub compress_external: &'a [JobRecord],
    pub decompress: &'a [JobRecord],
    pub decompress_external: &'a [JobRecord],
}

/// Build the complete result set, failing when any entry lacks a measurement.
pub fn aggregate(sizes: &[SizeLine], logs: JobLogs<'_>) -> Result<ResultSet, SfccError> {
    let mut set = ResultSet::new();
    info!("Loading filesize results");
    set.load_sizes(sizes)?;
    info!("Loading sfccompress compression runtime results");
    set.load_joblog(logs.compress, Direction::Compress, Source::Sfccompress)?;
    info!("Loading external tool compression runtime results");
    set.load_joblog(logs.compress_external, Direction::Compress, Source::External)?;
    info!("Loading sfccompress decompression runtime results");
    set.load_joblog(logs.decompress, Direction::Decompress, Source::Sfccompress)?;
    info!("Loading external tool decompression runtime results");
    set.load_joblog(logs.decompress_external, Direction::Decompress, Source::External)?;

    let incomplete = set.incomplete();
    if !incomplete.is_empty() {
        let listing: Vec<String> = incomplete
            .iter()
            .map(|(n, r)| format!("{n}: {r:?}"))
            .collect();
        return Err(SfccError::Report(format!(
            "{} incomplete entries:\n{}",
            listing.len(),
            listing.join("\n")
        )));
    }
    set.sum_external()?;
    Ok(set)
}
