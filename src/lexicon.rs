// 📖 Pronunciation Lexicon
// Word → pronunciation variants, CMU Pronouncing Dictionary format

use crate::error::{PipelineError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::info;

/// One pronunciation variant: an ordered list of phonetic symbols
pub type Pronunciation = Vec<String>;

// ============================================================================
// LEXICON TRAIT
// ============================================================================

/// Read-only lookup from lower-case word to its pronunciation variants.
///
/// Shared across annotator threads, hence `Send + Sync`.
pub trait Lexicon: Send + Sync {
    /// All variants for `word`, in dictionary order
    fn pronunciations(&self, word: &str) -> Option<&[Pronunciation]>;

    /// Stress-carrying symbols in the first variant; 0 when the word is unknown
    fn syllable_count(&self, word: &str) -> u32 {
        self.pronunciations(word)
            .and_then(|variants| variants.first())
            .map(|phones| phones.iter().filter(|p| is_stressed(p)).count() as u32)
            .unwrap_or(0)
    }
}

/// A symbol carries stress when its last character is a decimal digit (AH0, EH1, ...)
pub fn is_stressed(symbol: &str) -> bool {
    symbol
        .chars()
        .last()
        .map(|c| c.is_ascii_digit())
        .unwrap_or(false)
}

// ============================================================================
// IN-MEMORY DICTIONARY
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct PronouncingDictionary {
    entries: HashMap<String, Vec<Pronunciation>>,
}

impl PronouncingDictionary {
    pub fn new() -> Self {
        PronouncingDictionary {
            entries: HashMap::new(),
        }
    }

    /// Load a dictionary file. Older releases are Latin-1, so bytes are decoded lossily.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| PipelineError::Lexicon {
            path: path.to_path_buf(),
            source: e,
        })?;

        let dict = Self::parse(&String::from_utf8_lossy(&bytes));
        info!(file = %path.display(), words = dict.len(), "Loaded pronunciation lexicon");
        Ok(dict)
    }

    /// Parse dictionary text.
    ///
    /// Accepted lines:
    /// - `EMMA  EH1 M AH0` (word, then phones)
    /// - `EMMA(2)  ...` alternate variant, appended after earlier ones
    /// - `;;; comment` and blank lines are ignored, `# ...` tails are stripped
    ///
    /// Lines with a word but no phones are ignored.
    pub fn parse(text: &str) -> Self {
        let mut dict = PronouncingDictionary::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(";;;") {
                continue;
            }

            let line = match line.find('#') {
                Some(pos) => &line[..pos],
                None => line,
            };

            let mut tokens = line.split_whitespace();
            let Some(word) = tokens.next() else {
                continue;
            };
            let phones: Vec<&str> = tokens.collect();
            if phones.is_empty() {
                continue;
            }

            dict.insert(strip_variant_marker(word), &phones);
        }

        dict
    }

    /// Append a variant for `word` (stored lower-cased)
    pub fn insert(&mut self, word: &str, phones: &[&str]) {
        self.entries
            .entry(word.to_lowercase())
            .or_default()
            .push(phones.iter().map(|p| p.to_string()).collect());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Lexicon for PronouncingDictionary {
    fn pronunciations(&self, word: &str) -> Option<&[Pronunciation]> {
        self.entries.get(word).map(|v| v.as_slice())
    }
}

/// "EMMA(2)" → "EMMA"; anything else is returned unchanged
fn strip_variant_marker(word: &str) -> &str {
    if let Some(open) = word.rfind('(') {
        let marker = &word[open + 1..];
        if let Some(digits) = marker.strip_suffix(')') {
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) && open > 0 {
                return &word[..open];
            }
        }
    }
    word
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
;;; # CMUdict  --  Major Version: 0.07
EMMA  EH1 M AH0
MIA  M IY1 AH0
OLIVIA  OW0 L IH1 V IY0 AH0
LEAH  L IY1 AH0
LEAH(1)  L EY1 AH0
LEAH(2)  L IY1
abbe AE1 B IY0 # place, french

NOPHONES
";

    #[test]
    fn test_is_stressed() {
        assert!(is_stressed("AH0"));
        assert!(is_stressed("EH1"));
        assert!(!is_stressed("M"));
        assert!(!is_stressed(""));
    }

    #[test]
    fn test_parse_counts_first_variant() {
        let dict = PronouncingDictionary::parse(SAMPLE);

        assert_eq!(dict.syllable_count("emma"), 2);
        assert_eq!(dict.syllable_count("mia"), 2);
        assert_eq!(dict.syllable_count("olivia"), 4);
        assert_eq!(dict.syllable_count("abbe"), 2);
    }

    #[test]
    fn test_variants_kept_in_order() {
        let dict = PronouncingDictionary::parse(SAMPLE);
        let variants = dict.pronunciations("leah").unwrap();

        assert_eq!(variants.len(), 3);
        assert_eq!(variants[1], vec!["L", "EY1", "AH0"]);
        // later variants never change the count
        assert_eq!(dict.syllable_count("leah"), 2);
    }

    #[test]
    fn test_unknown_word_is_zero() {
        let dict = PronouncingDictionary::parse(SAMPLE);
        assert_eq!(dict.syllable_count("zzyzx"), 0);
        assert_eq!(dict.syllable_count("nophones"), 0);
        assert!(dict.pronunciations("nophones").is_none());
    }

    #[test]
    fn test_lookup_is_lowercase() {
        let dict = PronouncingDictionary::parse(SAMPLE);
        assert!(dict.pronunciations("EMMA").is_none());
        assert!(dict.pronunciations("emma").is_some());
        assert_eq!(dict.len(), 5);
    }

    #[test]
    fn test_strip_variant_marker() {
        assert_eq!(strip_variant_marker("LEAH(1)"), "LEAH");
        assert_eq!(strip_variant_marker("leah(12)"), "leah");
        assert_eq!(strip_variant_marker("(1)"), "(1)");
        assert_eq!(strip_variant_marker("A(B)"), "A(B)");
    }

    #[test]
    fn test_from_file_latin1() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cmudict.txt");
        // 0xE9 is not valid UTF-8 on its own
        let mut bytes = b"CAF\xE9  K AE0 F EY1\n".to_vec();
        bytes.extend_from_slice(b"NOA  N OW1 AH0\n");
        fs::write(&path, bytes).unwrap();

        let dict = PronouncingDictionary::from_file(&path).unwrap();
        assert_eq!(dict.syllable_count("noa"), 2);
        assert_eq!(dict.len(), 2);
    }

    #[test]
    fn test_missing_file() {
        let err = PronouncingDictionary::from_file("/definitely/not/here.dict").unwrap_err();
        assert_eq!(err.stage(), "annotate");
    }
}
