use regex::Regex;
use tracing::warn;

use super::normalize::normalize_for_detection;
use crate::catalog::AdditiveRecord;

/// Surface forms a catalog code may take on a printed label, as escaped regex fragments.
///
/// `E102` yields `E\s*102` and `E-102`; `INS 102` yields `INS\s*-?\s*102` and `INS102`; anything
/// else is matched literally. A blank code, or a scheme prefix with nothing after it, yields no
/// forms at all.
pub fn code_patterns(record: &AdditiveRecord) -> Vec<String> {
    let code = record.code.trim();
    if code.is_empty() {
        return Vec::new();
    }

    if let Some(num_part) = strip_prefix_ignore_case(code, "E") {
        if num_part.is_empty() {
            return Vec::new();
        }
        let num_part = regex::escape(num_part);
        return vec![format!(r"E\s*{num_part}"), format!("E-{num_part}")];
    }

    if let Some(num_part) = strip_prefix_ignore_case(code, "INS") {
        if num_part.is_empty() {
            return Vec::new();
        }
        let num_part = regex::escape(num_part);
        return vec![format!(r"INS\s*-?\s*{num_part}"), format!("INS{num_part}")];
    }

    vec![regex::escape(code)]
}

/// Escaped name pattern, normalised the same way label text is before matching.
pub fn name_pattern(record: &AdditiveRecord) -> Option<String> {
    let normalized = normalize_for_detection(&record.name);
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(regex::escape(trimmed))
    }
}

fn strip_prefix_ignore_case<'a>(code: &'a str, prefix: &str) -> Option<&'a str> {
    let head = code.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        code.get(prefix.len()..).map(str::trim)
    } else {
        None
    }
}

/// Compiled code and name matchers for one catalog entry.
#[derive(Debug)]
pub(crate) struct EntryPatterns {
    code: Option<Regex>,
    name: Option<Regex>,
}

impl EntryPatterns {
    pub(crate) fn compile(record: &AdditiveRecord) -> Self {
        let code_forms = code_patterns(record);
        let code = if code_forms.is_empty() {
            None
        } else {
            let source = whole_word(record.code.trim(), &format!("(?:{})", code_forms.join("|")));
            compile_or_warn(record, "code", &source)
        };

        let name = name_pattern(record).and_then(|pattern| {
            let normalized = normalize_for_detection(&record.name);
            let source = whole_word(normalized.trim(), &pattern);
            compile_or_warn(record, "name", &source)
        });

        Self { code, name }
    }

    pub(crate) fn matches_code(&self, text: &str) -> bool {
        self.code
            .as_ref()
            .map(|regex| regex.is_match(text))
            .unwrap_or(false)
    }

    pub(crate) fn matches_name(&self, text: &str) -> bool {
        self.name
            .as_ref()
            .map(|regex| regex.is_match(text))
            .unwrap_or(false)
    }
}

/// Wraps `pattern` in case-insensitive word boundaries. A boundary is only added on an edge where
/// the literal starts or ends with a word character, since `\b` next to punctuation would demand
/// a neighbouring letter or digit.
fn whole_word(literal: &str, pattern: &str) -> String {
    let lead = if literal.chars().next().is_some_and(is_word_char) {
        r"\b"
    } else {
        ""
    };
    let trail = if literal.chars().last().is_some_and(is_word_char) {
        r"\b"
    } else {
        ""
    };
    format!("(?i){lead}{pattern}{trail}")
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn compile_or_warn(record: &AdditiveRecord, kind: &str, source: &str) -> Option<Regex> {
    match Regex::new(source) {
        Ok(regex) => Some(regex),
        Err(err) => {
            warn!(code = %record.code, kind, error = %err, "skipping unusable additive pattern");
            None
        }
    }
}
