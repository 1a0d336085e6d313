//! Column label resolution
//!
//! The table query dialect only understands positional column identifiers
//! (`A`, `B`, ..., `Z`, `AA`, ...). Callers write queries against the labels
//! in a worksheet's header row; [`ColumnMap`] translates one into the other.

use crate::error::{Result, SheetError};
use regex::{Captures, Regex};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Positional identifier for a zero-based column index
///
/// Bijective base-26: `0 -> A`, `25 -> Z`, `26 -> AA`, `701 -> ZZ`, `702 -> AAA`.
pub fn column_identifier(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Ordered mapping from header label to column identifier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    entries: Vec<(String, String)>,
}

impl ColumnMap {
    /// Derive the mapping from a header row
    ///
    /// Blank labels are skipped. When a label repeats, the last occurrence
    /// decides its identifier.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries: Vec<(String, String)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for (index, label) in labels.into_iter().enumerate() {
            let label = label.as_ref();
            if label.trim().is_empty() {
                continue;
            }
            let identifier = column_identifier(index);
            match positions.get(label) {
                Some(&pos) => {
                    warn!(
                        "Duplicate column label '{}': {} replaces {}",
                        label, identifier, entries[pos].1
                    );
                    entries[pos].1 = identifier;
                }
                None => {
                    positions.insert(label.to_string(), entries.len());
                    entries.push((label.to_string(), identifier));
                }
            }
        }

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Identifier for a label, if the header contains it
    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, id)| id.as_str())
    }

    /// (label, identifier) pairs in header order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(l, id)| (l.as_str(), id.as_str()))
    }

    /// Replace every whole-word occurrence of a label with its identifier
    ///
    /// All labels are matched in one left-to-right pass, so an identifier
    /// written into the output is never itself rewritten.
    pub fn rewrite(&self, query: &str) -> Result<String> {
        if self.entries.is_empty() {
            return Ok(query.to_string());
        }

        let mut labels: Vec<&str> = self.entries.iter().map(|(l, _)| l.as_str()).collect();
        labels.sort_by(|a, b| b.len().cmp(&a.len()));

        let alternation = labels
            .iter()
            .map(|l| regex::escape(l))
            .collect::<Vec<_>>()
            .join("|");
        // Half boundaries only require no word character next to the label,
        // so labels starting or ending with punctuation still match whole.
        let pattern = Regex::new(&format!(
            r"\b{{start-half}}(?:{})\b{{end-half}}",
            alternation
        ))
        .map_err(|e| {
            SheetError::invalid_configuration(format!("Cannot build column pattern: {}", e))
        })?;

        let identifiers: HashMap<&str, &str> = self.iter().collect();
        let rewritten = pattern.replace_all(query, |caps: &Captures| {
            let matched = &caps[0];
            identifiers
                .get(matched)
                .map(|id| id.to_string())
                .unwrap_or_else(|| matched.to_string())
        });

        debug!("Rewrote query '{}' as '{}'", query, rewritten);
        Ok(rewritten.into_owned())
    }
}
