// ⚠️ Pipeline Errors
// Every variant names the stage that failed

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("load stage: cannot read names from {path:?}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("load stage: malformed row {row} in {source_label}: {reason}")]
    MalformedRow {
        source_label: String,
        row: usize,
        reason: String,
    },

    #[error("annotate stage: cannot read lexicon {path:?}: {source}")]
    Lexicon {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("write stage: cannot write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("report: cannot write {path:?}: {source}")]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Short stage name for operator-facing messages
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Load { .. } | PipelineError::MalformedRow { .. } => "load",
            PipelineError::Lexicon { .. } => "annotate",
            PipelineError::Config(_) => "config",
            PipelineError::Write { .. } => "write",
            PipelineError::Report { .. } => "report",
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        let err = PipelineError::MalformedRow {
            source_label: "yob2014.txt".to_string(),
            row: 3,
            reason: "expected 3 fields, found 2".to_string(),
        };
        assert_eq!(err.stage(), "load");
        assert!(err.to_string().contains("row 3"));

        let err = PipelineError::Write {
            path: PathBuf::from("/nope/names.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.stage(), "write");
        assert!(err.to_string().starts_with("write stage"));
    }
}
