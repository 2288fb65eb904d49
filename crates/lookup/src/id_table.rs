//! Line-ordered table of document labels.

use neighbors_core::{AppError, AppResult};
use std::path::Path;

/// Document labels indexed by row id.
///
/// Line `i` of the source file is the label of index row `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdTable {
    labels: Vec<String>,
}

impl IdTable {
    /// Read a UTF-8 file, one label per line, trailing whitespace removed.
    pub fn load(path: &Path) -> AppResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| AppError::file(path, e))?;
        let table = Self::from_lines(text.lines());

        tracing::debug!("Loaded {} labels from {:?}", table.len(), path);
        Ok(table)
    }

    /// Build a table from an iterator of lines.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let labels = lines
            .into_iter()
            .map(|line| line.as_ref().trim_end().to_string())
            .collect();
        Self { labels }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label at `row`.
    pub fn get(&self, row: usize) -> AppResult<&str> {
        self.labels.get(row).map(String::as_str).ok_or_else(|| {
            AppError::OutOfRange(format!(
                "row {} is outside the id table ({} lines)",
                row,
                self.labels.len()
            ))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_strips_line_endings() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("postlist.txt");
        std::fs::write(&path, "doc-0\r\n  doc-1 \t\ndoc-2\n").unwrap();

        let table = IdTable::load(&path).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(0).unwrap(), "doc-0");
        assert_eq!(table.get(1).unwrap(), "  doc-1");
        assert_eq!(table.iter().last(), Some("doc-2"));
    }

    #[test]
    fn test_blank_lines_keep_their_row() {
        let table = IdTable::from_lines(["a", "", "c"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(1).unwrap(), "");
        assert_eq!(table.get(2).unwrap(), "c");
    }

    #[test]
    fn test_get_out_of_range() {
        let table = IdTable::from_lines(["only"]);
        assert!(matches!(table.get(1), Err(AppError::OutOfRange(_))));
    }

    #[test]
    fn test_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = IdTable::load(&temp.path().join("postlist.txt")).unwrap_err();
        assert!(matches!(err, AppError::File { .. }));
        assert_eq!(err.exit_code(), 3);
    }
}
