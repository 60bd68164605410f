/// Rows of a tabular source, independent of the file format they came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Index of the first header matching any of `names`.
    ///
    /// Comparison is case-insensitive after trimming.
    pub fn column_index(&self, names: &[&str]) -> Option<usize> {
        self.headers.iter().position(|h| {
            let h = h.trim();
            names.iter().any(|n| h.eq_ignore_ascii_case(n))
        })
    }

    /// Cell `idx` of `row`; short rows read as empty.
    pub fn cell(row: &[String], idx: usize) -> &str {
        row.get(idx).map(|s| s.as_str()).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
