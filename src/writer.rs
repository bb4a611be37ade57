// 💾 Writer
// Ranked names → headerless CSV, replaced atomically

use crate::error::{PipelineError, Result};
use crate::record::NameRecord;
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::{Builder, NamedTempFile};
use tracing::info;

/// One output row: `Name,rank,count`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedName {
    pub name: String,
    pub rank: usize,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    pub rows: usize,
    /// SHA-256 of the file contents, lower-case hex
    pub sha256: String,
}

/// Rank follows sequence order, starting at 1
pub fn rank_names(records: &[NameRecord]) -> Vec<RankedName> {
    records
        .iter()
        .enumerate()
        .map(|(idx, record)| RankedName {
            name: record.display_name(),
            rank: idx + 1,
            count: record.count,
        })
        .collect()
}

/// Render ranked rows to CSV bytes
pub fn render_csv(rows: &[RankedName]) -> io::Result<Vec<u8>> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    for row in rows {
        wtr.serialize(row).map_err(io::Error::from)?;
    }

    wtr.into_inner().map_err(|e| e.into_error())
}

/// Write the ranked file. The destination is only replaced once every byte
/// is on disk; on failure it is left as it was.
pub fn write_ranked(path: &Path, records: &[NameRecord]) -> Result<WriteSummary> {
    let rows = rank_names(records);
    let to_write_error = |source: io::Error| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    };

    let bytes = render_csv(&rows).map_err(to_write_error)?;
    let sha256 = format!("{:x}", Sha256::digest(&bytes));

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    // Same directory as the target so the final rename stays on one filesystem
    let mut tmp = create_temp(dir).map_err(to_write_error)?;
    if let Ok(existing) = fs::metadata(path) {
        // Replacing a file keeps its mode
        tmp.as_file()
            .set_permissions(existing.permissions())
            .map_err(to_write_error)?;
    }
    tmp.write_all(&bytes).map_err(to_write_error)?;
    tmp.as_file().sync_all().map_err(to_write_error)?;
    tmp.persist(path).map_err(|e| to_write_error(e.error))?;

    info!(file = %path.display(), rows = rows.len(), sha256 = %sha256, "Wrote ranked names");

    Ok(WriteSummary {
        rows: rows.len(),
        sha256,
    })
}

/// Temp file for the next output. A brand-new output ends up 0666 minus the umask,
/// the same as a plain create, rather than tempfile's owner-only default.
fn create_temp(dir: &Path) -> io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    builder.prefix(".names").suffix(".tmp");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }

    builder.tempfile_in(dir)
}
