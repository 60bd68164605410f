use super::{Table, TableSource};
use crate::error::{PlantgraphError, Result};

/// Delimited text reader (`;` by default, as the planting exports use).
pub struct CsvSource {
    pub delimiter: u8,
}

impl Default for CsvSource {
    fn default() -> Self {
        Self { delimiter: b';' }
    }
}

impl TableSource for CsvSource {
    fn can_read(&self, extension: &str) -> bool {
        matches!(extension, "csv" | "txt")
    }

    fn read(&self, content: &str, path: &str) -> Result<Table> {
        // Spreadsheet exports often start with a UTF-8 BOM.
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| PlantgraphError::Parse(format!("CSV header error in {}: {}", path, e)))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut rows = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            let record = record.map_err(|e| {
                PlantgraphError::Parse(format!("CSV error in {} at row {}: {}", path, idx + 1, e))
            })?;
            rows.push(record.iter().map(|c| c.to_string()).collect());
        }

        Ok(Table { headers, rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_semicolon_table_with_bom() {
        let content = "\u{feff}DISTRITO;ESPECIE;TITULAR;SUPERFICIE_PLANTACION\nLima;Palta;Ana;1,5\nIca;Uva;Luis;2\n";
        let table = CsvSource::default().read(content, "p.csv").unwrap();
        assert_eq!(table.headers[0], "DISTRITO");
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0], vec!["Lima", "Palta", "Ana", "1,5"]);
    }

    #[test]
    fn test_short_rows_are_kept() {
        let content = "A;B;C\n1;2\n";
        let table = CsvSource::default().read(content, "short.csv").unwrap();
        assert_eq!(table.rows[0].len(), 2);
        assert_eq!(Table::cell(&table.rows[0], 2), "");
    }

    #[test]
    fn test_custom_delimiter() {
        let source = CsvSource { delimiter: b',' };
        let table = source.read("A,B\n\"x, y\",z\n", "c.csv").unwrap();
        assert_eq!(table.rows[0], vec!["x, y", "z"]);
    }

    #[test]
    fn test_can_read() {
        let source = CsvSource::default();
        assert!(source.can_read("csv"));
        assert!(!source.can_read("json"));
    }
}
