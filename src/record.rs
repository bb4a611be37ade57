use serde::{Deserialize, Serialize};
use std::fmt;

/// Sex code used by the birth registry for girls
pub const FEMALE: &str = "F";

/// NameRecord - one row of the birth registry
///
/// `name` is always stored lower-cased; `syllables` stays 0 until the
/// annotator produces a new value with the lexicon count attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    pub name: String,
    pub sex: String,
    pub count: u64,
    #[serde(default)]
    pub syllables: u32,
}

impl NameRecord {
    pub fn new(name: &str, sex: &str, count: u64) -> Self {
        NameRecord {
            name: name.to_lowercase(),
            sex: sex.to_string(),
            count,
            syllables: 0,
        }
    }

    /// Annotated copy of this record
    pub fn with_syllables(self, syllables: u32) -> Self {
        NameRecord { syllables, ..self }
    }

    /// Name as written to the output file ("emma" → "Emma")
    pub fn display_name(&self) -> String {
        title_case(&self.name)
    }
}

impl fmt::Display for NameRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.name, self.sex, self.count)
    }
}

/// Upper-case every letter that starts a word, lower-case the rest.
/// A word starts at the beginning of the string or after any non-letter,
/// so "mary-ann" becomes "Mary-Ann".
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;

    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }

    out
}
