// 🚰 Pipeline
// Loader → Annotator → Filter → Writer, one pass, all in memory

use crate::annotator::{annotate, annotate_parallel, annotation_stats};
use crate::error::{PipelineError, Result};
use crate::filters::{FilterCriteria, NameFilter};
use crate::lexicon::{Lexicon, PronouncingDictionary};
use crate::loader::{load_names, MalformedRowPolicy};
use crate::writer::write_ranked;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, info_span};
use uuid::Uuid;

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Registry file: name,sex,count rows
    pub input: PathBuf,

    /// Ranked output file
    pub output: PathBuf,

    /// CMU-format pronunciation dictionary
    pub lexicon: PathBuf,

    #[serde(default)]
    pub filter: FilterCriteria,

    #[serde(default)]
    pub malformed_rows: MalformedRowPolicy,

    /// Annotate on the rayon pool
    #[serde(default)]
    pub parallel: bool,
}

impl PipelineConfig {
    pub fn new(input: PathBuf, output: PathBuf, lexicon: PathBuf) -> Self {
        PipelineConfig {
            input,
            output,
            lexicon,
            filter: FilterCriteria::default(),
            malformed_rows: MalformedRowPolicy::default(),
            parallel: false,
        }
    }

    /// Load config from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("failed to read config file {:?}: {}", path, e))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            PipelineError::Config(format!("failed to parse config file {:?}: {}", path, e))
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.filter.validate()
    }
}

// ============================================================================
// RUN REPORT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub input: PathBuf,
    pub output: PathBuf,
    pub rows_loaded: usize,
    pub rows_skipped: usize,
    pub syllables_known: usize,
    pub syllables_unknown: usize,
    pub dropped_by_sex: usize,
    pub dropped_by_suffix: usize,
    pub dropped_by_syllables: usize,
    pub rows_written: usize,
    pub output_sha256: String,
}

impl RunReport {
    pub fn summary(&self) -> String {
        format!(
            "Loaded {} rows ({} skipped), {} unknown to lexicon, wrote {} names to {}",
            self.rows_loaded,
            self.rows_skipped,
            self.syllables_unknown,
            self.rows_written,
            self.output.display()
        )
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let to_report_error = |source: io::Error| PipelineError::Report {
            path: path.to_path_buf(),
            source,
        };

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| to_report_error(io::Error::from(e)))?;
        fs::write(path, json).map_err(to_report_error)
    }
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Run the whole pipeline, reading the lexicon named in the config
pub fn run(config: &PipelineConfig) -> Result<RunReport> {
    config.validate()?;

    let lexicon = {
        let _span = info_span!("lexicon", file = %config.lexicon.display()).entered();
        PronouncingDictionary::from_file(&config.lexicon)?
    };

    run_with_lexicon(config, &lexicon)
}

/// Run the pipeline against an already-loaded lexicon
pub fn run_with_lexicon(config: &PipelineConfig, lexicon: &dyn Lexicon) -> Result<RunReport> {
    config.validate()?;

    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    let _run = info_span!("run", %run_id).entered();

    let loaded = {
        let _span = info_span!("load").entered();
        load_names(&config.input, config.malformed_rows)?
    };
    let rows_loaded = loaded.records.len();
    let rows_skipped = loaded.skipped.len();

    let annotated = {
        let _span = info_span!("annotate", parallel = config.parallel).entered();
        if config.parallel {
            annotate_parallel(loaded.records, lexicon)
        } else {
            annotate(loaded.records, lexicon)
        }
    };
    let stats = annotation_stats(&annotated);
    info!(known = stats.known, unknown = stats.unknown, "Annotated syllables");

    let filtered = {
        let _span = info_span!("filter").entered();
        NameFilter::new(config.filter.clone()).apply(annotated)
    };

    let written = {
        let _span = info_span!("write").entered();
        write_ranked(&config.output, &filtered.kept)?
    };

    Ok(RunReport {
        run_id,
        started_at,
        finished_at: Utc::now(),
        input: config.input.clone(),
        output: config.output.clone(),
        rows_loaded,
        rows_skipped,
        syllables_known: stats.known,
        syllables_unknown: stats.unknown,
        dropped_by_sex: filtered.dropped_by_sex,
        dropped_by_suffix: filtered.dropped_by_suffix,
        dropped_by_syllables: filtered.dropped_by_syllables,
        rows_written: written.rows,
        output_sha256: written.sha256,
    })
}

// ============================================================================
// TESTS
// ============================================================================
