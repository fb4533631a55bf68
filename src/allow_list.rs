//! Verb allow-lists
//!
//! A newline-delimited list of verbs restricting the analysis to one lexical
//! domain (e.g. change-of-state verbs).

use crate::error::AllowListError;
use rustc_hash::FxHashSet;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerbAllowList {
    verbs: FxHashSet<String>,
}

impl VerbAllowList {
    /// Parse one verb per line; lines are trimmed and blank lines skipped
    pub fn parse(text: &str) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        Self::from_verbs(text.lines())
    }

    pub fn from_verbs<I, S>(verbs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let verbs = verbs
            .into_iter()
            .map(|v| v.as_ref().trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();
        Self { verbs }
    }

    /// Load from a UTF-8 file; a missing file or one without verbs is an error
    pub fn from_file(path: &Path) -> Result<Self, AllowListError> {
        let text = std::fs::read_to_string(path).map_err(|source| AllowListError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let list = Self::parse(&text);
        if list.is_empty() {
            return Err(AllowListError::Empty {
                path: path.to_path_buf(),
            });
        }

        log::info!("Loaded {} verbs from {}", list.len(), path.display());
        Ok(list)
    }

    #[inline]
    pub fn contains(&self, verb: &str) -> bool {
        self.verbs.contains(verb)
    }

    pub fn len(&self) -> usize {
        self.verbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.verbs.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_skips_blank_lines() {
        let list = VerbAllowList::parse("break\n\n  melt \r\nopen\n   \n");
        assert_eq!(list.len(), 3);
        assert!(list.contains("break"));
        assert!(list.contains("melt"));
        assert!(list.contains("open"));
        assert!(!list.contains(""));
    }

    #[test]
    fn test_parse_dedups_and_strips_bom() {
        let list = VerbAllowList::parse("\u{feff}break\nbreak\n");
        assert_eq!(list.len(), 1);
        assert!(list.contains("break"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "shatter\ncrack").unwrap();

        let list = VerbAllowList::from_file(file.path()).unwrap();
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = VerbAllowList::from_file(&dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, AllowListError::Io { .. }));
    }

    #[test]
    fn test_empty_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "\n   \n").unwrap();

        let err = VerbAllowList::from_file(file.path()).unwrap_err();
        assert!(matches!(err, AllowListError::Empty { .. }));
    }
}
