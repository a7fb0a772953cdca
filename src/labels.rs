//! Class-name lookup for decoded detections.

use crate::trace::trace_warn;
use crate::util::{DetPostError, DetPostResult};
use std::path::Path;

/// Label reported for class ids outside the table.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Ordered class names indexed by class id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelTable {
    names: Vec<String>,
}

impl LabelTable {
    /// Creates a table from class names in class-id order.
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Parses one label per line, trimming whitespace and skipping blank lines.
    pub fn from_lines(text: &str) -> Self {
        let names = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect();
        Self { names }
    }

    /// Builds placeholder names `class_0` .. `class_{n-1}`.
    pub fn synthetic(num_classes: usize) -> Self {
        let names = (0..num_classes).map(|idx| format!("class_{idx}")).collect();
        Self { names }
    }

    /// Reads a label file from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> DetPostResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|err| DetPostError::LabelIo {
            reason: err.to_string(),
        })?;
        Ok(Self::from_lines(&text))
    }

    /// Reads a label file, falling back to a synthetic table on failure.
    ///
    /// An unreadable or empty file yields `synthetic(num_classes)`.
    pub fn load_or_synthetic<P: AsRef<Path>>(path: P, num_classes: usize) -> Self {
        match Self::load(path) {
            Ok(table) if !table.is_empty() => table,
            Ok(_) => {
                trace_warn!("labels_fallback", reason = "empty label file");
                Self::synthetic(num_classes)
            }
            Err(err) => {
                trace_warn!("labels_fallback", reason = err.to_string().as_str());
                Self::synthetic(num_classes)
            }
        }
    }

    /// Returns the number of labels.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true when the table has no labels.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Resolves a class id, returning [`UNKNOWN_LABEL`] when out of range.
    pub fn get(&self, class_id: i32) -> &str {
        usize::try_from(class_id)
            .ok()
            .and_then(|idx| self.names.get(idx))
            .map_or(UNKNOWN_LABEL, String::as_str)
    }

    /// Returns all names in class-id order.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl<S: Into<String>> FromIterator<S> for LabelTable {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LabelTable, UNKNOWN_LABEL};

    #[test]
    fn from_lines_skips_blank_lines() {
        let table = LabelTable::from_lines("person\n\n  bicycle \r\ncar\n");
        assert_eq!(table.names(), &["person", "bicycle", "car"]);
    }

    #[test]
    fn out_of_range_ids_resolve_to_unknown() {
        let table: LabelTable = ["cat", "dog"].into_iter().collect();
        assert_eq!(table.get(1), "dog");
        assert_eq!(table.get(2), UNKNOWN_LABEL);
        assert_eq!(table.get(-1), UNKNOWN_LABEL);
    }

    #[test]
    fn missing_file_falls_back_to_synthetic_names() {
        let table = LabelTable::load_or_synthetic("/nonexistent/detpost/labels.txt", 3);
        assert_eq!(table.names(), &["class_0", "class_1", "class_2"]);
    }

    #[test]
    fn blank_file_falls_back_to_synthetic_names() {
        let path = std::env::temp_dir().join(format!(
            "detpost-blank-labels-{}.txt",
            std::process::id()
        ));
        std::fs::write(&path, "\n  \n").unwrap();
        let table = LabelTable::load_or_synthetic(&path, 2);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(table.names(), &["class_0", "class_1"]);
    }
}
