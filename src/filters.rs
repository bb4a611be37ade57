// 🔎 Filter Stage
// Sex, suffix and syllable predicates; stable, order-preserving

use crate::error::{PipelineError, Result};
use crate::record::{NameRecord, FEMALE};
use serde::{Deserialize, Serialize};
use tracing::info;

// ============================================================================
// CRITERIA
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Sex code a record must carry
    #[serde(default = "default_sex")]
    pub sex: String,

    /// Endings, matched case-insensitively; a name must end in at least one
    #[serde(default = "default_suffixes")]
    pub suffixes: Vec<String>,

    /// Inclusive syllable range
    #[serde(default = "default_min_syllables")]
    pub min_syllables: u32,

    #[serde(default = "default_max_syllables")]
    pub max_syllables: u32,
}

fn default_sex() -> String {
    FEMALE.to_string()
}

fn default_suffixes() -> Vec<String> {
    vec!["a".to_string(), "ah".to_string(), "oh".to_string()]
}

fn default_min_syllables() -> u32 {
    1
}

fn default_max_syllables() -> u32 {
    2
}

impl Default for FilterCriteria {
    fn default() -> Self {
        FilterCriteria {
            sex: default_sex(),
            suffixes: default_suffixes(),
            min_syllables: default_min_syllables(),
            max_syllables: default_max_syllables(),
        }
    }
}

impl FilterCriteria {
    pub fn validate(&self) -> Result<()> {
        if self.min_syllables > self.max_syllables {
            return Err(PipelineError::Config(format!(
                "min_syllables ({}) is greater than max_syllables ({})",
                self.min_syllables, self.max_syllables
            )));
        }
        if self.suffixes.is_empty() || self.suffixes.iter().any(|s| s.is_empty()) {
            return Err(PipelineError::Config(
                "suffixes must be a non-empty list of non-empty endings".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// FILTER
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    pub kept: Vec<NameRecord>,
    pub dropped_by_sex: usize,
    pub dropped_by_suffix: usize,
    pub dropped_by_syllables: usize,
}

pub struct NameFilter {
    criteria: FilterCriteria,
}

impl NameFilter {
    /// Suffixes are lower-cased to line up with the stored names
    pub fn new(mut criteria: FilterCriteria) -> Self {
        for suffix in criteria.suffixes.iter_mut() {
            *suffix = suffix.to_lowercase();
        }
        NameFilter { criteria }
    }

    pub fn matches_sex(&self, record: &NameRecord) -> bool {
        record.sex == self.criteria.sex
    }

    pub fn matches_suffix(&self, record: &NameRecord) -> bool {
        self.criteria
            .suffixes
            .iter()
            .any(|suffix| record.name.ends_with(suffix.as_str()))
    }

    /// Unknown names carry 0 syllables and fall outside any range starting at 1
    pub fn matches_syllables(&self, record: &NameRecord) -> bool {
        (self.criteria.min_syllables..=self.criteria.max_syllables).contains(&record.syllables)
    }

    pub fn matches(&self, record: &NameRecord) -> bool {
        self.matches_sex(record) && self.matches_suffix(record) && self.matches_syllables(record)
    }

    /// Keep records passing every predicate, checked sex → suffix → syllables
    pub fn apply(&self, records: Vec<NameRecord>) -> FilterOutcome {
        let mut outcome = FilterOutcome::default();

        for record in records {
            if !self.matches_sex(&record) {
                outcome.dropped_by_sex += 1;
            } else if !self.matches_suffix(&record) {
                outcome.dropped_by_suffix += 1;
            } else if !self.matches_syllables(&record) {
                outcome.dropped_by_syllables += 1;
            } else {
                outcome.kept.push(record);
            }
        }

        info!(
            kept = outcome.kept.len(),
            dropped_by_sex = outcome.dropped_by_sex,
            dropped_by_suffix = outcome.dropped_by_suffix,
            dropped_by_syllables = outcome.dropped_by_syllables,
            "Filtered names"
        );
        outcome
    }
}

impl Default for NameFilter {
    fn default() -> Self {
        Self::new(FilterCriteria::default())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn girl(name: &str, syllables: u32) -> NameRecord {
        NameRecord::new(name, "F", 100).with_syllables(syllables)
    }

    #[test]
    fn test_suffixes() {
        let filter = NameFilter::default();

        assert!(filter.matches_suffix(&girl("Noa", 2)));
        assert!(filter.matches_suffix(&girl("Leah", 2)));
        assert!(filter.matches_suffix(&girl("Zoh", 1)));
        assert!(filter.matches_suffix(&girl("Deboh", 2)));
        assert!(!filter.matches_suffix(&girl("Zoeh", 2)));
        assert!(filter.matches_suffix(&girl("Deborah", 3)));
        assert!(!filter.matches_suffix(&girl("Margo", 2)));
        assert!(!filter.matches_suffix(&girl("Ruth", 1)));
        assert!(!filter.matches_suffix(&girl("Beth", 1)));
    }

    #[test]
    fn test_uppercase_suffixes_from_config() {
        let criteria: FilterCriteria = serde_json::from_str(r#"{"suffixes": ["AH", "Oh"]}"#).unwrap();
        let filter = NameFilter::new(criteria);

        assert!(filter.matches_suffix(&girl("Leah", 2)));
        assert!(filter.matches_suffix(&girl("ZOH", 1)));
        assert!(!filter.matches_suffix(&girl("Noa", 2)));
    }

    #[test]
    fn test_short_names_do_not_panic() {
        let filter = NameFilter::default();
        assert!(filter.matches_suffix(&girl("A", 1)));
        assert!(!filter.matches_suffix(&girl("H", 1)));
        assert!(!filter.matches_suffix(&girl("", 0)));
    }

    #[test]
    fn test_syllable_range() {
        let filter = NameFilter::default();
        assert!(!filter.matches_syllables(&girl("Xyla", 0)));
        assert!(filter.matches_syllables(&girl("Ma", 1)));
        assert!(filter.matches_syllables(&girl("Mia", 2)));
        assert!(!filter.matches_syllables(&girl("Sophia", 3)));
    }

    #[test]
    fn test_apply_keeps_order_and_counts_drops() {
        let filter = NameFilter::default();
        let records = vec![
            girl("Emma", 2),
            NameRecord::new("Noah", "M", 19000),
            girl("Mia", 2),
            girl("Olivia", 4),
            girl("Margo", 2),
            girl("Noa", 2),
            girl("Xyla", 0),
        ];

        let outcome = filter.apply(records);
        let names: Vec<&str> = outcome.kept.iter().map(|r| r.name.as_str()).collect();

        assert_eq!(names, vec!["emma", "mia", "noa"]);
        assert_eq!(outcome.dropped_by_sex, 1);
        assert_eq!(outcome.dropped_by_suffix, 1);
        assert_eq!(outcome.dropped_by_syllables, 2);
        assert!(outcome.kept.iter().all(|r| filter.matches(r)));
    }

    #[test]
    fn test_sex_is_exact() {
        let filter = NameFilter::default();
        assert!(!filter.matches_sex(&NameRecord::new("Emma", "f", 1)));
        assert!(filter.matches_sex(&NameRecord::new("Emma", "F", 1)));
    }

    #[test]
    fn test_validate() {
        assert!(FilterCriteria::default().validate().is_ok());

        let bad_range = FilterCriteria {
            min_syllables: 3,
            max_syllables: 2,
            ..FilterCriteria::default()
        };
        assert!(bad_range.validate().is_err());

        let no_suffixes = FilterCriteria {
            suffixes: vec![],
            ..FilterCriteria::default()
        };
        assert!(no_suffixes.validate().is_err());
    }

    #[test]
    fn test_criteria_defaults_from_json() {
        let criteria: FilterCriteria = serde_json::from_str(r#"{"max_syllables": 3}"#).unwrap();
        assert_eq!(criteria.sex, "F");
        assert_eq!(criteria.suffixes, vec!["a", "ah", "oh"]);
        assert_eq!(criteria.min_syllables, 1);
        assert_eq!(criteria.max_syllables, 3);
    }
}
