// 🔤 Syllable Annotator
// Attaches lexicon syllable counts to each record

use crate::lexicon::Lexicon;
use crate::record::NameRecord;
use rayon::prelude::*;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnnotationStats {
    /// Records found in the lexicon (non-zero syllables)
    pub known: usize,
    /// Records absent from the lexicon (left at 0)
    pub unknown: usize,
}

pub fn annotate(records: Vec<NameRecord>, lexicon: &dyn Lexicon) -> Vec<NameRecord> {
    records
        .into_iter()
        .map(|record| annotate_one(record, lexicon))
        .collect()
}

/// Same result as `annotate`; records are independent so order survives the fan-out
pub fn annotate_parallel(records: Vec<NameRecord>, lexicon: &dyn Lexicon) -> Vec<NameRecord> {
    records
        .into_par_iter()
        .map(|record| annotate_one(record, lexicon))
        .collect()
}

fn annotate_one(record: NameRecord, lexicon: &dyn Lexicon) -> NameRecord {
    let syllables = lexicon.syllable_count(&record.name);
    debug!(name = %record.name, syllables, "Annotated");
    record.with_syllables(syllables)
}

pub fn annotation_stats(records: &[NameRecord]) -> AnnotationStats {
    let known = records.iter().filter(|r| r.syllables > 0).count();
    AnnotationStats {
        known,
        unknown: records.len() - known,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::PronouncingDictionary;

    fn lexicon() -> PronouncingDictionary {
        let mut dict = PronouncingDictionary::new();
        dict.insert("emma", &["EH1", "M", "AH0"]);
        dict.insert("olivia", &["OW0", "L", "IH1", "V", "IY0", "AH0"]);
        dict.insert("ava", &["EY1", "V", "AH0"]);
        dict
    }

    fn records() -> Vec<NameRecord> {
        vec![
            NameRecord::new("Emma", "F", 20000),
            NameRecord::new("Xyla", "F", 12),
            NameRecord::new("Olivia", "F", 17000),
            NameRecord::new("Ava", "F", 16000),
        ]
    }

    #[test]
    fn test_annotate_sets_counts() {
        let annotated = annotate(records(), &lexicon());
        let counts: Vec<u32> = annotated.iter().map(|r| r.syllables).collect();
        assert_eq!(counts, vec![2, 0, 4, 2]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let many: Vec<NameRecord> = (0..500)
            .flat_map(|_| records())
            .collect();
        let lex = lexicon();

        assert_eq!(annotate(many.clone(), &lex), annotate_parallel(many, &lex));
    }

    #[test]
    fn test_stats() {
        let annotated = annotate(records(), &lexicon());
        let stats = annotation_stats(&annotated);
        assert_eq!(stats, AnnotationStats { known: 3, unknown: 1 });
    }
}
