//! Builds the relation graph and the record store in one pass over a table.

use super::RelationGraph;
use crate::error::{PlantgraphError, Result};
use crate::ingest::Table;
use crate::model::{NodeKind, PlantingRecord};
use crate::normalize::normalize;
use crate::store::RecordStore;

/// Accepted header names per required field; the first one is reported
/// when the column is missing.
pub const DISTRICT_COLUMNS: &[&str] = &["DISTRITO", "DISTRICT"];
pub const SPECIES_COLUMNS: &[&str] = &["ESPECIE", "SPECIES"];
pub const TITLEHOLDER_COLUMNS: &[&str] = &["TITULAR", "TITLEHOLDER"];
pub const AREA_COLUMNS: &[&str] = &["SUPERFICIE_PLANTACION", "AREA"];

struct Columns {
    district: usize,
    species: usize,
    titleholder: usize,
    area: usize,
}

fn locate_columns(table: &Table) -> Result<Columns> {
    let mut missing = Vec::new();
    let mut find = |names: &[&str]| {
        let idx = table.column_index(names);
        if idx.is_none() {
            missing.push(names[0].to_string());
        }
        idx.unwrap_or_default()
    };
    let columns = Columns {
        district: find(DISTRICT_COLUMNS),
        species: find(SPECIES_COLUMNS),
        titleholder: find(TITLEHOLDER_COLUMNS),
        area: find(AREA_COLUMNS),
    };
    if !missing.is_empty() {
        return Err(PlantgraphError::Validation { missing });
    }
    Ok(columns)
}

/// Parse a planting area; a decimal comma is accepted.
pub(crate) fn parse_area(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().replace(',', ".").parse().ok()?;
    value.is_finite().then_some(value)
}

/// Build the graph and the store from `table`, rows in input order.
///
/// Fails with `Validation` when a required column is absent and with
/// `InvalidRow` when an area is not numeric. Both checks run before any
/// node or record is committed, so a failed build produces nothing.
pub fn build(table: &Table) -> Result<(RelationGraph, RecordStore)> {
    let columns = locate_columns(table)?;

    let mut records = Vec::with_capacity(table.rows.len());
    for (idx, row) in table.rows.iter().enumerate() {
        let raw_area = Table::cell(row, columns.area);
        let area = parse_area(raw_area).ok_or_else(|| PlantgraphError::InvalidRow {
            row: idx + 1,
            field: AREA_COLUMNS[0].to_string(),
            value: raw_area.to_string(),
        })?;
        records.push(PlantingRecord {
            id: idx as u64 + 1,
            species: normalize(Table::cell(row, columns.species)),
            titleholder: normalize(Table::cell(row, columns.titleholder)),
            district: normalize(Table::cell(row, columns.district)),
            area,
        });
    }

    let mut graph = RelationGraph::new();
    let mut store = RecordStore::new();
    for record in records {
        graph.upsert_node(&record.district, NodeKind::District);
        graph.upsert_node(&record.species, NodeKind::Species);
        graph.add_contains_edge(&record.district, &record.species);
        store.add(record);
    }

    log::info!(
        "Built relation graph: {} records, {} nodes, {} edges",
        store.len(),
        graph.node_count(),
        graph.edge_count()
    );
    Ok((graph, store))
}
