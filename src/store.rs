//! Record index keyed by sequential planting id.

use indexmap::IndexMap;

use crate::model::PlantingRecord;
use crate::normalize::normalize;

/// Owns every [`PlantingRecord`] of one ingestion pass.
///
/// Iteration follows insertion order, so species lookups are deterministic
/// for a given pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    records: IndexMap<u64, PlantingRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert by id. An existing id is replaced in place (last write wins).
    pub fn add(&mut self, record: PlantingRecord) {
        self.records.insert(record.id, record);
    }

    pub fn get(&self, id: u64) -> Option<&PlantingRecord> {
        self.records.get(&id)
    }

    /// All records whose species equals the normalized query, in insertion order.
    ///
    /// Plain equality filter over the records; the graph is not consulted.
    pub fn lookup_by_species(&self, species: &str) -> Vec<PlantingRecord> {
        let wanted = normalize(species);
        self.records
            .values()
            .filter(|r| r.species == wanted)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlantingRecord> {
        self.records.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, species: &str, district: &str) -> PlantingRecord {
        PlantingRecord {
            id,
            species: species.to_string(),
            titleholder: "X".to_string(),
            district: district.to_string(),
            area: 1.0,
        }
    }

    #[test]
    fn test_add_and_get() {
        let mut store = RecordStore::new();
        store.add(record(1, "PALTA", "LIMA"));
        assert_eq!(store.get(1).unwrap().district, "LIMA");
        assert!(store.get(2).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_overwrites_existing_id() {
        let mut store = RecordStore::new();
        store.add(record(1, "PALTA", "LIMA"));
        store.add(record(1, "MANGO", "PIURA"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(1).unwrap().species, "MANGO");
    }

    #[test]
    fn test_lookup_by_species_normalizes_and_keeps_order() {
        let mut store = RecordStore::new();
        store.add(record(1, "PALTA", "LIMA"));
        store.add(record(2, "MANGO", "PIURA"));
        store.add(record(3, "PALTA", "ICA"));

        let found = store.lookup_by_species("  palta ");
        let ids: Vec<u64> = found.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_lookup_by_species_no_match() {
        let mut store = RecordStore::new();
        store.add(record(1, "PALTA", "LIMA"));
        assert!(store.lookup_by_species("mango").is_empty());
    }
}
