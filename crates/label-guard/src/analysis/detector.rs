use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use super::normalize::normalize_for_detection;
use super::patterns::EntryPatterns;
use crate::catalog::AdditiveRecord;

/// Which signal(s) tied a catalog entry to the label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchSignals {
    pub code: bool,
    pub name: bool,
}

impl MatchSignals {
    pub fn any(&self) -> bool {
        self.code || self.name
    }

    pub fn label(&self) -> &'static str {
        match (self.code, self.name) {
            (true, true) => "code+name",
            (true, false) => "code",
            (false, true) => "name",
            (false, false) => "none",
        }
    }
}

/// A catalog entry found on the label.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionMatch<'a> {
    pub additive: &'a AdditiveRecord,
    pub signals: MatchSignals,
}

/// Matchers for every entry of one catalog snapshot, compiled up front.
///
/// Build one per analysis from the snapshot in hand; it borrows the snapshot and so cannot
/// outlive it.
#[derive(Debug)]
pub struct AdditiveDetector<'a> {
    entries: Vec<(&'a AdditiveRecord, EntryPatterns)>,
}

impl<'a> AdditiveDetector<'a> {
    pub fn new(catalog: &'a [AdditiveRecord]) -> Self {
        let entries = catalog
            .iter()
            .map(|record| (record, EntryPatterns::compile(record)))
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Normalises `text` and scans it, returning at most one match per code in catalog order.
    pub fn detect(&self, text: &str) -> Vec<DetectionMatch<'a>> {
        let normalized = normalize_for_detection(text);
        self.detect_normalized(&normalized)
    }

    pub(crate) fn detect_normalized(&self, normalized: &str) -> Vec<DetectionMatch<'a>> {
        let mut seen = HashSet::new();
        let mut matches = Vec::new();

        for (record, patterns) in &self.entries {
            let signals = MatchSignals {
                code: patterns.matches_code(normalized),
                name: patterns.matches_name(normalized),
            };
            if !signals.any() {
                continue;
            }
            if !seen.insert(dedup_key(record)) {
                continue;
            }

            debug!(
                code = %record.code,
                name = %record.name,
                matched_by = signals.label(),
                "additive detected"
            );
            matches.push(DetectionMatch {
                additive: *record,
                signals,
            });
        }

        matches
    }
}

/// One-shot detection against a catalog slice.
pub fn detect<'a>(text: &str, catalog: &'a [AdditiveRecord]) -> Vec<DetectionMatch<'a>> {
    AdditiveDetector::new(catalog).detect(text)
}

fn dedup_key(record: &AdditiveRecord) -> String {
    let code = record.code_key();
    if code.is_empty() {
        format!("name:{}", record.name.trim().to_lowercase())
    } else {
        code
    }
}
