// 📂 Record Loader
// Headerless CSV of name,sex,count → ordered NameRecords

use crate::error::{PipelineError, Result};
use crate::record::NameRecord;
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const NAME_IDX: usize = 0;
const SEX_IDX: usize = 1;
const COUNT_IDX: usize = 2;
const FIELD_COUNT: usize = 3;

// ============================================================================
// MALFORMED ROW POLICY
// ============================================================================

/// What the loader does with a row it cannot parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedRowPolicy {
    /// Abort the whole load on the first bad row
    #[default]
    Fail,

    /// Log the row, leave it out, keep going
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based row number in the input
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    pub records: Vec<NameRecord>,
    pub skipped: Vec<SkippedRow>,
}

// ============================================================================
// LOADING
// ============================================================================

pub fn load_names(path: &Path, policy: MalformedRowPolicy) -> Result<LoadOutcome> {
    let file = File::open(path).map_err(|e| PipelineError::Load {
        path: path.to_path_buf(),
        source: csv::Error::from(e),
    })?;

    let label = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown.csv")
        .to_string();

    let outcome = read_rows(file, path, &label, policy)?;
    info!(
        file = %path.display(),
        loaded = outcome.records.len(),
        skipped = outcome.skipped.len(),
        "Loaded name records"
    );
    Ok(outcome)
}

/// Load from any reader; `source_label` is used in error messages
pub fn load_names_from_reader<R: Read>(
    reader: R,
    source_label: &str,
    policy: MalformedRowPolicy,
) -> Result<LoadOutcome> {
    read_rows(reader, Path::new(source_label), source_label, policy)
}

fn read_rows<R: Read>(
    mut reader: R,
    path: &Path,
    label: &str,
    policy: MalformedRowPolicy,
) -> Result<LoadOutcome> {
    let to_load_error = |source: csv::Error| PipelineError::Load {
        path: PathBuf::from(path),
        source,
    };

    // Kept in memory so blank lines the csv reader skips can still be counted as rows
    let mut raw = Vec::new();
    reader
        .read_to_end(&mut raw)
        .map_err(|e| to_load_error(csv::Error::from(e)))?;

    // flexible: field-count mismatches are reported by parse_row with the row number
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(raw.as_slice());

    let mut outcome = LoadOutcome::default();
    let mut record = StringRecord::new();
    let blank = StringRecord::new();
    let mut row = 0;

    // Where the final (empty) read began; trailing blank lines sit after it
    let tail = loop {
        let start = rdr.position().byte() as usize;
        if !rdr.read_record(&mut record).map_err(to_load_error)? {
            break start;
        }
        let end = rdr.position().byte() as usize;

        for _ in 0..leading_blank_lines(&raw, start, end) {
            row += 1;
            accept(&mut outcome, parse_row(&blank), row, label, policy)?;
        }

        row += 1;
        accept(&mut outcome, parse_row(&record), row, label, policy)?;
    };

    for _ in 0..leading_blank_lines(&raw, tail, raw.len()) {
        row += 1;
        accept(&mut outcome, parse_row(&blank), row, label, policy)?;
    }

    Ok(outcome)
}

fn accept(
    outcome: &mut LoadOutcome,
    parsed: std::result::Result<NameRecord, String>,
    row: usize,
    label: &str,
    policy: MalformedRowPolicy,
) -> Result<()> {
    match parsed {
        Ok(name) => {
            debug!(row, record = %name, "Parsed row");
            outcome.records.push(name);
        }
        Err(reason) => match policy {
            MalformedRowPolicy::Fail => {
                return Err(PipelineError::MalformedRow {
                    source_label: label.to_string(),
                    row,
                    reason,
                });
            }
            MalformedRowPolicy::Skip => {
                warn!(file = label, row, %reason, "Skipping malformed row");
                outcome.skipped.push(SkippedRow { row, reason });
            }
        },
    }
    Ok(())
}

/// Count empty lines at the start of `raw[start..end]`, the bytes one read consumed.
/// A `\n` completing the previous row's `\r\n` is not a blank line.
fn leading_blank_lines(raw: &[u8], start: usize, end: usize) -> usize {
    let end = end.min(raw.len());
    let mut i = start;
    if i > 0 && i < end && raw[i - 1] == b'\r' && raw[i] == b'\n' {
        i += 1;
    }

    let mut blanks = 0;
    while i < end {
        match raw[i] {
            b'\n' => i += 1,
            b'\r' if i + 1 < end && raw[i + 1] == b'\n' => i += 2,
            b'\r' => i += 1,
            _ => break,
        }
        blanks += 1;
    }
    blanks
}

fn parse_row(record: &StringRecord) -> std::result::Result<NameRecord, String> {
    if record.len() != FIELD_COUNT {
        return Err(format!(
            "expected {} fields, found {}",
            FIELD_COUNT,
            record.len()
        ));
    }

    let name = &record[NAME_IDX];
    let sex = &record[SEX_IDX];
    let count_text = &record[COUNT_IDX];

    let count = count_text
        .parse::<u64>()
        .map_err(|_| format!("count {:?} is not a non-negative integer", count_text))?;

    Ok(NameRecord::new(name, sex, count))
}

// ============================================================================
// TESTS
// ============================================================================
