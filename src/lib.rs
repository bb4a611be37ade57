// Name Shortlist - Core Library
// Birth-registry names → syllable-annotated, filtered, ranked shortlist

pub mod error;
pub mod record;
pub mod loader;
pub mod lexicon;
pub mod annotator;
pub mod filters;
pub mod writer;
pub mod pipeline;
pub mod logging;

// Re-export commonly used types
pub use error::{PipelineError, Result};
pub use record::{NameRecord, FEMALE};
pub use loader::{
    load_names, load_names_from_reader,
    LoadOutcome, MalformedRowPolicy, SkippedRow,
};
pub use lexicon::{is_stressed, Lexicon, Pronunciation, PronouncingDictionary};
pub use annotator::{annotate, annotate_parallel, annotation_stats, AnnotationStats};
pub use filters::{FilterCriteria, FilterOutcome, NameFilter};
pub use writer::{rank_names, write_ranked, RankedName, WriteSummary};
pub use pipeline::{run, run_with_lexicon, PipelineConfig, RunReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
