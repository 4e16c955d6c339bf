//! `key=value` bug-info files.
//!
//! ```text
//! python_path="/black"
//! buggy_commit_id="4a953b7241ce5f8bcac985fa33fdf3af4f42c0de"
//! fixed_commit_id="7f7673d941a947a8d392c8c0866d3d588affc174"
//! test_file="tests/test_black.py;tests/test_format.py"
//! ```

use std::path::Path;

use crate::error::{HarvestError, Result};

/// Key whose value lists the bug's test files, `;`-separated.
pub const TEST_FILE_KEY: &str = "test_file";

/// Parsed bug-info record, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BugInfo {
    entries: Vec<(String, String)>,
}

impl BugInfo {
    /// Parses `key=value` lines.
    ///
    /// Keys and values are trimmed and one layer of surrounding double quotes
    /// is removed from values. Blank lines and `#` comments are ignored; a
    /// line without `=` is skipped with a warning. Later duplicates win.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut info = Self::default();
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                tracing::warn!("bug info line {} has no '=', skipping: {line:?}", idx + 1);
                continue;
            };
            info.insert(key.trim(), unquote(value));
        }
        info
    }

    /// Reads and parses an info file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| HarvestError::io(path, e))?;
        Ok(Self::parse(&text))
    }

    fn insert(&mut self, key: &str, value: String) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    /// Value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Value for `key`, or [`HarvestError::MissingInfoKey`] naming `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is absent.
    pub fn require(&self, key: &str, path: &Path) -> Result<&str> {
        self.get(key).ok_or_else(|| HarvestError::MissingInfoKey {
            key: key.to_string(),
            path: path.to_path_buf(),
        })
    }

    /// Test files listed under `test_file`, split on `;`.
    #[must_use]
    pub fn test_files(&self) -> Vec<String> {
        self.get(TEST_FILE_KEY).map(split_paths).unwrap_or_default()
    }

    /// Number of parsed keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no keys were parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collects test files from every line containing `test_file=`.
///
/// Looser than [`BugInfo::parse`]: the key may carry a prefix such as
/// `export `. The value after the first `=` is trimmed, unquoted, and split
/// on `;`.
#[must_use]
pub fn scan_test_files(text: &str) -> Vec<String> {
    let needle = format!("{TEST_FILE_KEY}=");
    text.lines()
        .filter(|line| line.contains(&needle))
        .filter_map(|line| line.split_once('='))
        .flat_map(|(_, value)| split_paths(&unquote(value)))
        .collect()
}

/// Splits a `;`-separated path list, trimming and dropping empty segments.
pub(crate) fn split_paths(value: &str) -> Vec<String> {
    value.split(';').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect()
}

fn unquote(value: &str) -> String {
    let value = value.trim();
    let value = value.strip_prefix('"').unwrap_or(value);
    let value = value.strip_suffix('"').unwrap_or(value);
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"python_path="/black"
buggy_commit_id="4a953b72"
fixed_commit_id="7f7673d9"
test_file="tests/test_black.py;tests/test_format.py"
"#;

    #[test]
    fn parses_quoted_values() {
        let info = BugInfo::parse(SAMPLE);
        assert_eq!(info.len(), 4);
        assert_eq!(info.get("buggy_commit_id"), Some("4a953b72"));
        assert_eq!(info.get("python_path"), Some("/black"));
        assert_eq!(info.test_files(), vec!["tests/test_black.py", "tests/test_format.py"]);
    }

    #[test]
    fn single_quoted_test_file() {
        let info = BugInfo::parse("test_file=\"tests/test_x.py\"\n");
        assert_eq!(info.test_files(), vec!["tests/test_x.py"]);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let info = BugInfo::parse("garbage line\n\n# comment\nfixed_commit_id = abc \n");
        assert_eq!(info.len(), 1);
        assert_eq!(info.get("fixed_commit_id"), Some("abc"));
    }

    #[test]
    fn value_may_contain_equals() {
        let info = BugInfo::parse("test_file=\"tests/t.py\"\nrun=\"pytest -k a=b\"\n");
        assert_eq!(info.get("run"), Some("pytest -k a=b"));
    }

    #[test]
    fn only_one_layer_of_quotes_is_removed() {
        let info = BugInfo::parse("title=\"\"quoted\"\"\n");
        assert_eq!(info.get("title"), Some("\"quoted\""));
    }

    #[test]
    fn later_duplicates_win() {
        let info = BugInfo::parse("k=1\nk=2\n");
        assert_eq!(info.len(), 1);
        assert_eq!(info.get("k"), Some("2"));
    }

    #[test]
    fn require_names_key_and_file() {
        let info = BugInfo::parse("buggy_commit_id=abc\n");
        let err = info.require("fixed_commit_id", Path::new("bugs/1/bug.info")).unwrap_err();
        assert_eq!(err.to_string(), "fixed_commit_id not found in bugs/1/bug.info");
    }

    #[test]
    fn scan_strips_whitespace_and_quotes() {
        assert_eq!(scan_test_files("  test_file= \"tests/test_x.py\" \n"), vec!["tests/test_x.py"]);
    }

    #[test]
    fn scan_splits_multiple_tests() {
        let files = scan_test_files(SAMPLE);
        assert_eq!(files, vec!["tests/test_black.py", "tests/test_format.py"]);
    }

    #[test]
    fn scan_accepts_prefixed_keys_and_ignores_others() {
        let text = "export test_file=a.py\nbuggy_commit_id=abc\n";
        assert_eq!(scan_test_files(text), vec!["a.py"]);
    }

    #[test]
    fn missing_test_key_yields_nothing() {
        assert!(BugInfo::parse("buggy_commit_id=abc").test_files().is_empty());
        assert!(scan_test_files("").is_empty());
    }
}
