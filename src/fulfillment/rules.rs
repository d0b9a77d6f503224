//! Title extraction from the raw utterance.
//!
//! A small rule table, tried top to bottom. Each rule captures the task
//! title and, for phrasings that name one, the target status.

use std::sync::LazyLock;

use regex::Regex;

use crate::task_status::TaskStatus;

pub struct TitleRule {
    pub name: &'static str,
    pattern: Regex,
    /// Capture group holding the status word, if the phrasing has one.
    status_group: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleMatch {
    pub rule: &'static str,
    pub title: String,
    pub status: Option<TaskStatus>,
}

const RULE_SOURCES: &[(&str, &str, Option<usize>)] = &[
    // "Tandai tugas Quiz 1 selesai"
    ("mark_done", r"(?i)tandai\s+tugas\s+(.+?)\s+(selesai|done)\b", Some(2)),
    // "Ubah status tugas Laporan Praktikum jadi in progress"
    ("change_status", r"(?i)ubah\s+status\s+tugas\s+(.+?)\s+jadi\s+(.+)", Some(2)),
    // "status tugas Essay done"
    ("status_of", r"(?i)status\s+tugas\s+(.+?)\s+(selesai|done|todo|in progress|in_progress)\b", Some(2)),
    // anything after the word "tugas"
    ("bare_tugas", r"(?i)\btugas\b\s+(.+)", None),
];

static RULES: LazyLock<Vec<TitleRule>> = LazyLock::new(|| {
    RULE_SOURCES
        .iter()
        .filter_map(|&(name, source, status_group)| {
            Regex::new(source).ok().map(|pattern| TitleRule {
                name,
                pattern,
                status_group,
            })
        })
        .collect()
});

impl TitleRule {
    pub fn apply(&self, text: &str) -> Option<TitleMatch> {
        let caps = self.pattern.captures(text)?;
        let title = clean_title(caps.get(1)?.as_str());
        if title.is_empty() {
            return None;
        }
        let status = self
            .status_group
            .and_then(|g| caps.get(g))
            .and_then(|m| TaskStatus::from_word(m.as_str()));
        Some(TitleMatch {
            rule: self.name,
            title,
            status,
        })
    }
}

pub fn rules() -> &'static [TitleRule] {
    &RULES
}

/// First rule that yields a non-empty title.
pub fn extract_title(text: &str) -> Option<TitleMatch> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    rules().iter().find_map(|rule| rule.apply(text))
}

fn clean_title(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '“' | '”'))
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_rule_compiles() {
        assert_eq!(rules().len(), RULE_SOURCES.len());
    }

    #[test]
    fn mark_done() {
        let m = extract_title("Tandai tugas Quiz 1 selesai").unwrap();
        assert_eq!(m.rule, "mark_done");
        assert_eq!(m.title, "Quiz 1");
        assert_eq!(m.status, Some(TaskStatus::Done));
    }

    #[test]
    fn change_status_captures_target() {
        let m = extract_title("ubah status tugas Laporan Praktikum jadi in progress").unwrap();
        assert_eq!(m.rule, "change_status");
        assert_eq!(m.title, "Laporan Praktikum");
        assert_eq!(m.status, Some(TaskStatus::InProgress));
    }

    #[test]
    fn status_of() {
        let m = extract_title("status tugas Essay Sejarah done").unwrap();
        assert_eq!(m.title, "Essay Sejarah");
        assert_eq!(m.status, Some(TaskStatus::Done));
    }

    #[test]
    fn bare_tugas_has_no_status() {
        let m = extract_title("selesaikan tugas \"Makalah Etika\"").unwrap();
        assert_eq!(m.rule, "bare_tugas");
        assert_eq!(m.title, "Makalah Etika");
        assert_eq!(m.status, None);
    }

    #[test]
    fn nothing_to_extract() {
        assert_eq!(extract_title(""), None);
        assert_eq!(extract_title("halo bot"), None);
        assert_eq!(extract_title("tugas"), None);
    }
}
