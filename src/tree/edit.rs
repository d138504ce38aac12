//! Line-oriented file rewriting.
//!
//! Lines are compared with surrounding whitespace trimmed. Untouched lines,
//! including their terminators, are written back byte for byte, and a file
//! with no matching line is never rewritten.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use regex_lite::Regex;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{ReleaseError, VersionBumpError};

/// How a line is selected for rewriting.
#[derive(Debug, Clone)]
pub enum LinePattern {
    /// The trimmed line contains this text.
    Literal(String),
    /// The trimmed line matches this expression from its first character.
    Anchored(Regex),
}

impl LinePattern {
    pub fn literal(text: impl Into<String>) -> Self {
        LinePattern::Literal(text.into())
    }

    /// Compile a line-anchored pattern; a leading `^` is added when missing.
    pub fn anchored(expr: &str) -> Result<Self, regex_lite::Error> {
        let expr = if expr.starts_with('^') {
            expr.to_string()
        } else {
            format!("^{expr}")
        };
        Ok(LinePattern::Anchored(Regex::new(&expr)?))
    }

    pub fn matches(&self, line: &str) -> bool {
        let line = line.trim();
        match self {
            LinePattern::Literal(text) => line.contains(text.as_str()),
            LinePattern::Anchored(regex) => regex.is_match(line),
        }
    }
}

impl fmt::Display for LinePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinePattern::Literal(text) => write!(f, "{text}"),
            LinePattern::Anchored(regex) => write!(f, "{}", regex.as_str()),
        }
    }
}

/// One required line replacement in one file.
#[derive(Debug, Clone)]
pub struct VersionEdit {
    pub path: PathBuf,
    pub pattern: LinePattern,
    pub replacement: String,
}

impl VersionEdit {
    pub fn new(path: impl Into<PathBuf>, pattern: LinePattern, replacement: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            pattern,
            replacement: replacement.into(),
        }
    }

    /// Apply the edit; a file without a matching line is an error.
    pub fn apply(&self) -> Result<(), ReleaseError> {
        if replace_lines(&self.path, &self.pattern, &self.replacement)? {
            debug!(path = %self.path.display(), pattern = %self.pattern, "Rewrote matching lines");
            Ok(())
        } else {
            Err(VersionBumpError {
                path: self.path.clone(),
                pattern: self.pattern.to_string(),
            }
            .into())
        }
    }
}

/// Replace every line matching `pattern` with `replacement`.
///
/// Returns whether at least one line matched.
pub fn replace_lines(path: &Path, pattern: &LinePattern, replacement: &str) -> Result<bool, ReleaseError> {
    let content = read_file(path)?;

    let mut matched = false;
    let mut output = String::with_capacity(content.len());
    for segment in content.split_inclusive('\n') {
        let (line, terminator) = split_terminator(segment);
        if pattern.matches(line) {
            matched = true;
            output.push_str(replacement);
        } else {
            output.push_str(line);
        }
        output.push_str(terminator);
    }

    if matched {
        write_file(path, &output)?;
    }
    Ok(matched)
}

/// Insert `block` as new lines directly before every line matching `pattern`.
///
/// Returns whether at least one line matched.
pub fn insert_before_lines(path: &Path, pattern: &LinePattern, block: &str) -> Result<bool, ReleaseError> {
    let content = read_file(path)?;

    let mut matched = false;
    let mut output = String::with_capacity(content.len() + block.len());
    for segment in content.split_inclusive('\n') {
        let (line, terminator) = split_terminator(segment);
        if pattern.matches(line) {
            matched = true;
            let eol = if terminator.is_empty() { "\n" } else { terminator };
            for block_line in block.lines() {
                output.push_str(block_line);
                output.push_str(eol);
            }
        }
        output.push_str(segment);
    }

    if matched {
        write_file(path, &output)?;
    }
    Ok(matched)
}

/// Like [`insert_before_lines`], but a missing anchor is an error.
pub fn insert_before_required(path: &Path, pattern: &LinePattern, block: &str) -> Result<(), ReleaseError> {
    if insert_before_lines(path, pattern, block)? {
        Ok(())
    } else {
        Err(VersionBumpError {
            path: path.to_path_buf(),
            pattern: pattern.to_string(),
        }
        .into())
    }
}

fn split_terminator(segment: &str) -> (&str, &str) {
    if let Some(line) = segment.strip_suffix("\r\n") {
        (line, "\r\n")
    } else if let Some(line) = segment.strip_suffix('\n') {
        (line, "\n")
    } else {
        (segment, "")
    }
}

pub(crate) fn read_file(path: &Path) -> Result<String, ReleaseError> {
    std::fs::read_to_string(path).map_err(|e| ReleaseError::io(path, e))
}

/// Write through a temp file in the same directory, then rename over `path`.
pub(crate) fn write_file(path: &Path, content: &str) -> Result<(), ReleaseError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| ReleaseError::io(path, e))?;
    tmp.write_all(content.as_bytes())
        .map_err(|e| ReleaseError::io(path, e))?;
    tmp.persist(path).map_err(|e| ReleaseError::io(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_temp(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.txt");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_replaces_every_matching_line() {
        let (_dir, path) = write_temp("alpha\nversion 1\nbeta\nversion 2\ngamma\n");
        let pattern = LinePattern::anchored(r"version \d").unwrap();

        let matched = replace_lines(&path, &pattern, "version 9").unwrap();

        assert!(matched);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "alpha\nversion 9\nbeta\nversion 9\ngamma\n"
        );
    }

    #[test]
    fn test_no_match_leaves_file_byte_identical() {
        let original = "one\r\ntwo\nno trailing newline";
        let (_dir, path) = write_temp(original);
        let pattern = LinePattern::anchored("missing").unwrap();

        let matched = replace_lines(&path, &pattern, "x").unwrap();

        assert!(!matched);
        assert_eq!(fs::read(&path).unwrap(), original.as_bytes());
    }

    #[test]
    fn test_preserves_terminators_of_other_lines() {
        let (_dir, path) = write_temp("keep\r\nAC_INIT([Citus], [1.0devel])\r\nlast");
        let pattern = LinePattern::anchored(r"AC_INIT\(").unwrap();

        replace_lines(&path, &pattern, "AC_INIT([Citus], [1.0.0])").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "keep\r\nAC_INIT([Citus], [1.0.0])\r\nlast"
        );
    }

    #[test]
    fn test_matches_against_trimmed_line() {
        let (_dir, path) = write_temp(" 10.2devel\n");
        let pattern = LinePattern::anchored(r"\d+\.\d+devel$").unwrap();

        assert!(replace_lines(&path, &pattern, " 10.2.0").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), " 10.2.0\n");
    }

    #[test]
    fn test_anchor_is_added_when_missing() {
        let pattern = LinePattern::anchored("default_version").unwrap();
        assert!(pattern.matches("default_version = '1.0-1'"));
        assert!(!pattern.matches("# default_version = '1.0-1'"));
        assert_eq!(pattern.to_string(), "^default_version");
    }

    #[test]
    fn test_literal_pattern_matches_substring() {
        let pattern = LinePattern::literal("prev_objects");
        assert!(pattern.matches("DROP TABLE prev_objects, extension_diff;"));
        assert!(!pattern.matches("DROP TABLE extension_diff;"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = LinePattern::literal("x");
        let result = replace_lines(&dir.path().join("absent"), &pattern, "y");
        assert!(matches!(result, Err(ReleaseError::Io { .. })));
    }

    #[test]
    fn test_version_edit_reports_file_and_pattern() {
        let (_dir, path) = write_temp("nothing here\n");
        let edit = VersionEdit::new(&path, LinePattern::anchored("MASTER_VERSION").unwrap(), "x");

        match edit.apply() {
            Err(ReleaseError::VersionBump(e)) => {
                assert_eq!(e.path, path);
                assert_eq!(e.pattern, "^MASTER_VERSION");
            }
            other => panic!("Expected VersionBump error, got {:?}", other),
        }
    }

    #[test]
    fn test_insert_before_matching_line() {
        let (_dir, path) = write_temp("a\nDROP TABLE t;\nb\n");
        let pattern = LinePattern::literal("DROP TABLE t;");

        insert_before_required(&path, &pattern, "-- one\n-- two\n").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "a\n-- one\n-- two\nDROP TABLE t;\nb\n"
        );
    }

    #[test]
    fn test_insert_before_missing_anchor_fails() {
        let (_dir, path) = write_temp("a\nb\n");
        let pattern = LinePattern::literal("DROP TABLE t;");
        let result = insert_before_required(&path, &pattern, "-- x\n");
        assert!(matches!(result, Err(ReleaseError::VersionBump(_))));
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\n");
    }
}
