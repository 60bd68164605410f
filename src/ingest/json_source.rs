use indexmap::IndexSet;
use serde_json::Value as JsonValue;

use super::{Table, TableSource};
use crate::error::{PlantgraphError, Result};
use crate::normalize::value_to_text;

/// JSON reader for an array of flat row objects.
///
/// Headers are the union of keys in first-seen order; a row without a key
/// reads that cell as empty. Non-string values are stringified.
pub struct JsonSource;

impl TableSource for JsonSource {
    fn can_read(&self, extension: &str) -> bool {
        extension == "json"
    }

    fn read(&self, content: &str, path: &str) -> Result<Table> {
        let value: JsonValue = serde_json::from_str(content)
            .map_err(|e| PlantgraphError::Parse(format!("JSON parse error in {}: {}", path, e)))?;

        let items = match value {
            JsonValue::Array(items) => items,
            _ => {
                return Err(PlantgraphError::Parse(format!(
                    "{}: expected a JSON array of row objects",
                    path
                )))
            }
        };

        let mut objects = Vec::with_capacity(items.len());
        let mut headers: IndexSet<String> = IndexSet::new();
        for (idx, item) in items.into_iter().enumerate() {
            match item {
                JsonValue::Object(map) => {
                    headers.extend(map.keys().cloned());
                    objects.push(map);
                }
                _ => {
                    return Err(PlantgraphError::Parse(format!(
                        "{}: row {} is not an object",
                        path,
                        idx + 1
                    )))
                }
            }
        }

        let rows = objects
            .iter()
            .map(|map| {
                headers
                    .iter()
                    .map(|h| map.get(h).map(value_to_text).unwrap_or_default())
                    .collect()
            })
            .collect();

        Ok(Table {
            headers: headers.into_iter().collect(),
            rows,
        })
    }
}
