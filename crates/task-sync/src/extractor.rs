//! Task reference extraction
//!
//! Finds tracker task URLs in free text (PR descriptions, commit messages) and
//! returns the task ids they point at.

use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

/// Opaque id of a task in the tracker
///
/// Ordering is plain string ordering, so `"10"` sorts before `"2"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskRef(String);

impl TaskRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TaskRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Extracts task references for one tracker host
///
/// Each line yields at most one reference. Rules are tried in order and the
/// first one that matches wins:
///
/// 1. task path: `/1/<ws>/project/<p>/task/<id>`, `/home/task/<id>`,
///    `/inbox/<u>/item/<id>`, ...
/// 2. legacy path: numeric or `board`/`search`/`inbox` segments ending in the
///    id, e.g. `/0/<project>/<id>`; ignored on lines containing `/task/`, where
///    it would have picked up a workspace or project id instead
/// 3. inbox item: `/inbox/<u>/item/<id>`
#[derive(Debug, Clone)]
pub struct ReferenceExtractor {
    task_path: Regex,
    legacy_path: Regex,
    inbox_item: Regex,
}

impl ReferenceExtractor {
    /// Build an extractor for URLs on `host` (e.g. `app.asana.com`)
    pub fn new(host: &str) -> Result<Self, regex::Error> {
        let base = format!("https://{}", regex::escape(host));

        Ok(Self {
            task_path: Regex::new(&format!(
                r"{base}(?:/\d+/\d+)?(?:/(?:project|home|inbox)(?:/\d+)?)?/(?:task|item)/(?P<task_id>\d+)"
            ))?,
            legacy_path: Regex::new(&format!(
                r"{base}(?:/(?:[0-9]+|board|search|inbox))+(?:/(?P<task_id>[0-9]+))+"
            ))?,
            inbox_item: Regex::new(&format!(r"{base}/inbox/\d+/item/(?P<task_id>\d+)"))?,
        })
    }

    /// Extract unique task references from `text`, sorted by string order
    pub fn extract(&self, text: &str) -> Vec<TaskRef> {
        let unique: BTreeSet<&str> = text
            .split("\r\n")
            .flat_map(|segment| segment.split('\n'))
            .filter_map(|line| self.extract_from_line(line))
            .collect();

        unique.into_iter().map(TaskRef::new).collect()
    }

    fn extract_from_line<'a>(&self, line: &'a str) -> Option<&'a str> {
        if let Some(id) = capture_task_id(&self.task_path, line) {
            return Some(id);
        }

        if let Some(id) = capture_task_id(&self.legacy_path, line) {
            if !line.contains("/task/") {
                return Some(id);
            }
        }

        capture_task_id(&self.inbox_item, line)
    }
}

impl Default for ReferenceExtractor {
    fn default() -> Self {
        default_extractor().clone()
    }
}

fn capture_task_id<'a>(re: &Regex, line: &'a str) -> Option<&'a str> {
    re.captures(line)?.name("task_id").map(|m| m.as_str())
}

fn default_extractor() -> &'static ReferenceExtractor {
    static EXTRACTOR: OnceLock<ReferenceExtractor> = OnceLock::new();

    EXTRACTOR.get_or_init(|| {
        ReferenceExtractor::new(action_config::DEFAULT_TRACKER_HOST).unwrap()
    })
}

/// Extract task references for the default tracker host (`app.asana.com`)
pub fn extract_references(text: &str) -> Vec<TaskRef> {
    default_extractor().extract(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn example() -> ReferenceExtractor {
        ReferenceExtractor::new("app.example.com").unwrap()
    }

    fn ids(refs: Vec<TaskRef>) -> Vec<String> {
        refs.into_iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn test_empty_text() {
        assert!(example().extract("").is_empty());
    }

    #[test]
    fn test_task_path_beats_workspace_and_project_ids() {
        let refs = example().extract("See https://app.example.com/1/999/project/5/task/123");
        assert_eq!(ids(refs), vec!["123"]);
    }

    #[test]
    fn test_task_path_variants() {
        let text = "https://app.example.com/1/42/task/7\n\
                    https://app.example.com/home/task/8\n\
                    https://app.example.com/project/5/task/9";
        assert_eq!(ids(example().extract(text)), vec!["7", "8", "9"]);
    }

    #[test]
    fn test_legacy_board_url() {
        let refs = example().extract("Task: https://app.example.com/board/123");
        assert_eq!(ids(refs), vec!["123"]);
    }

    #[test]
    fn test_legacy_url_takes_last_numeric_segment() {
        let refs = example().extract("https://app.example.com/0/1111/2222/f");
        assert_eq!(ids(refs), vec!["2222"]);
    }

    #[test]
    fn test_legacy_match_discarded_when_line_has_task_path() {
        let line = "old https://app.example.com/0/111/222 new https://app.example.com/1/999/task/333";
        assert_eq!(ids(example().extract(line)), vec!["333"]);
    }

    #[test]
    fn test_legacy_match_discarded_without_any_task_match() {
        // `/task/` without a numeric id: nothing trustworthy on this line
        let line = "https://app.example.com/0/111/222 and https://elsewhere.test/task/abc";
        assert!(example().extract(line).is_empty());
    }

    #[test]
    fn test_inbox_item_yields_item_id() {
        let refs = example().extract("https://app.example.com/inbox/555/item/777");
        assert_eq!(ids(refs), vec!["777"]);
    }

    #[test]
    fn test_mixed_line_endings_are_separate_lines() {
        let text = "https://app.example.com/0/1/3\r\nhttps://app.example.com/0/1/2\nhttps://app.example.com/0/1/1";
        assert_eq!(ids(example().extract(text)), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_sorted_as_strings_and_deduplicated() {
        let text = "https://app.example.com/0/1/2\n\
                    https://app.example.com/0/1/10\n\
                    https://app.example.com/1/1/task/2";
        assert_eq!(ids(example().extract(text)), vec!["10", "2"]);
    }

    #[test]
    fn test_one_reference_per_line() {
        let line = "https://app.example.com/1/1/task/5 https://app.example.com/1/1/task/6";
        assert_eq!(ids(example().extract(line)), vec!["5"]);
    }

    #[test]
    fn test_other_hosts_are_ignored() {
        let text = "https://app.asana.com/0/1/2\nhttps://app.example.com.evil.test/0/1/3";
        assert!(example().extract(text).is_empty());
    }

    #[test]
    fn test_host_dots_are_literal() {
        assert!(example().extract("https://appXexampleYcom/0/1/2").is_empty());
    }

    #[test]
    fn test_output_without_urls_extracts_nothing() {
        let first =
            example().extract("https://app.example.com/0/1/42\nhttps://app.example.com/1/1/task/7");
        let rejoined = first
            .iter()
            .map(TaskRef::as_str)
            .collect::<Vec<_>>()
            .join("\n");
        assert!(example().extract(&rejoined).is_empty());
    }

    #[test]
    fn test_default_host_is_asana() {
        let body = "Closes https://app.asana.com/0/1203/1204567\r\n\r\nnothing here";
        assert_eq!(ids(extract_references(body)), vec!["1204567"]);
    }
}
