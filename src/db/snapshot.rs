//! Persist and restore a [`GraphSnapshot`] in SQLite.
//!
//! A save replaces nodes, edges, records and metadata inside one transaction,
//! so a concurrent reader of the database sees either the previous snapshot
//! or the new one.

use rusqlite::{params, Connection, OptionalExtension};

use super::Db;
use crate::error::{PlantgraphError, Result};
use crate::graph::RelationGraph;
use crate::model::{Edge, Node, NodeKind, PlantingRecord};
use crate::service::{GraphSnapshot, SnapshotMeta};
use crate::store::RecordStore;

/// Write `snapshot`, replacing whatever was stored before.
pub async fn save_snapshot(db: &Db, snapshot: &GraphSnapshot) -> Result<()> {
    let nodes: Vec<Node> = snapshot.graph.nodes().cloned().collect();
    let edges: Vec<Edge> = snapshot.graph.edges().cloned().collect();
    let records: Vec<PlantingRecord> = snapshot.store.iter().cloned().collect();
    let meta = snapshot.meta.clone();
    let (node_count, edge_count, record_count) = (nodes.len(), edges.len(), records.len());

    db.with_connection(move |conn| {
        let tx = conn.transaction()?;
        tx.execute_batch(
            "DELETE FROM graph_edges; \
             DELETE FROM graph_nodes; \
             DELETE FROM planting_records; \
             DELETE FROM snapshot_meta;",
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO graph_nodes (key, kind, display_title, grp, position) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (pos, node) in nodes.iter().enumerate() {
                stmt.execute(params![
                    node.key,
                    node.kind.as_str(),
                    node.display_title,
                    node.group as i64,
                    pos as i64
                ])?;
            }

            let mut stmt = tx.prepare(
                "INSERT INTO graph_edges (district, species, relation, weight, records, position) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for (pos, edge) in edges.iter().enumerate() {
                stmt.execute(params![
                    edge.district,
                    edge.species,
                    edge.relation,
                    edge.weight,
                    edge.records as i64,
                    pos as i64
                ])?;
            }

            let mut stmt = tx.prepare(
                "INSERT INTO planting_records (id, species, titleholder, district, area, position) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for (pos, record) in records.iter().enumerate() {
                stmt.execute(params![
                    record.id as i64,
                    record.species,
                    record.titleholder,
                    record.district,
                    record.area,
                    pos as i64
                ])?;
            }
        }
        tx.execute(
            "INSERT INTO snapshot_meta (id, source_hash, built_at) VALUES (1, ?1, ?2)",
            params![meta.source_hash, meta.built_at],
        )?;
        tx.commit()?;
        Ok(())
    })
    .await?;

    log::info!(
        "Saved graph snapshot: {} nodes, {} edges, {} records",
        node_count,
        edge_count,
        record_count
    );
    Ok(())
}

fn read_graph(conn: &Connection) -> Result<RelationGraph> {
    let mut graph = RelationGraph::new();

    let mut stmt =
        conn.prepare("SELECT key, kind, display_title, grp FROM graph_nodes ORDER BY position")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, i64>(3)?,
        ))
    })?;
    for row in rows {
        let (key, kind, display_title, group) = row?;
        let kind = NodeKind::parse(&kind).ok_or_else(|| {
            PlantgraphError::Parse(format!("node {} has unknown kind {}", key, kind))
        })?;
        graph.insert_node(Node {
            key,
            kind,
            display_title,
            group: group as u32,
        });
    }

    let mut stmt = conn.prepare(
        "SELECT district, species, relation, weight, records FROM graph_edges ORDER BY position",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(Edge {
            district: row.get(0)?,
            species: row.get(1)?,
            relation: row.get(2)?,
            weight: row.get(3)?,
            records: row.get::<_, i64>(4)? as u64,
        })
    })?;
    for row in rows {
        let edge = row?;
        if !graph.contains_node(&edge.district) || !graph.contains_node(&edge.species) {
            return Err(PlantgraphError::Parse(format!(
                "edge {} - {} references a missing node",
                edge.district, edge.species
            )));
        }
        graph.insert_edge(edge);
    }

    Ok(graph)
}

fn read_store(conn: &Connection) -> Result<RecordStore> {
    let mut store = RecordStore::new();
    let mut stmt = conn.prepare(
        "SELECT id, species, titleholder, district, area FROM planting_records ORDER BY position",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(PlantingRecord {
            id: row.get::<_, i64>(0)? as u64,
            species: row.get(1)?,
            titleholder: row.get(2)?,
            district: row.get(3)?,
            area: row.get(4)?,
        })
    })?;
    for row in rows {
        store.add(row?);
    }
    Ok(store)
}

fn read_meta(conn: &Connection) -> Result<SnapshotMeta> {
    let meta = conn
        .query_row(
            "SELECT source_hash, built_at FROM snapshot_meta WHERE id = 1",
            [],
            |row| {
                Ok(SnapshotMeta {
                    source_hash: row.get(0)?,
                    built_at: row.get(1)?,
                })
            },
        )
        .optional()?;
    Ok(meta.unwrap_or_default())
}

/// Read the stored snapshot, failing on any problem.
pub async fn read_snapshot(db: &Db) -> Result<GraphSnapshot> {
    if !db.path().exists() {
        return Err(PlantgraphError::NotFound(format!(
            "no graph database at {}",
            db.path().display()
        )));
    }
    db.with_connection(|conn| {
        Ok(GraphSnapshot {
            graph: read_graph(conn)?,
            store: read_store(conn)?,
            meta: read_meta(conn)?,
        })
    })
    .await
}

/// Load the stored snapshot, falling back to an empty one when the database
/// is absent or unreadable.
pub async fn load_snapshot(db: &Db) -> GraphSnapshot {
    match read_snapshot(db).await {
        Ok(snapshot) => {
            log::info!(
                "Loaded graph snapshot: {} nodes, {} records",
                snapshot.graph.node_count(),
                snapshot.store.len()
            );
            snapshot
        }
        Err(e) => {
            log::warn!("Stored graph unavailable ({}), starting with an empty graph", e);
            GraphSnapshot::empty()
        }
    }
}

/// Source hash recorded by the last save, if any.
pub async fn stored_source_hash(db: &Db) -> Result<Option<String>> {
    if !db.path().exists() {
        return Ok(None);
    }
    db.with_connection(|conn| Ok(read_meta(conn)?.source_hash))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::Table;
    use std::path::PathBuf;
    use tempfile::TempDir;

    async fn setup_test_db() -> (Db, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db = Db::new(temp_dir.path().join("graph.db"));
        let migrations_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations");
        db.migrate(&migrations_dir).await.unwrap();
        (db, temp_dir)
    }

    fn snapshot(rows: &[[&str; 4]], hash: &str) -> GraphSnapshot {
        let table = Table {
            headers: ["DISTRITO", "ESPECIE", "TITULAR", "SUPERFICIE_PLANTACION"]
                .map(String::from)
                .to_vec(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        };
        GraphSnapshot::build(&table, Some(hash.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_save_then_load_restores_snapshot() {
        let (db, _temp) = setup_test_db().await;
        let original = snapshot(
            &[["Lima", "palta", "Ana", "1,5"], ["Ica", "uva", "Luis", "2"], ["Ica", "palta", "Eva", "3"]],
            "abc",
        );
        save_snapshot(&db, &original).await.unwrap();

        let loaded = load_snapshot(&db).await;
        assert_eq!(loaded, original);
        assert_eq!(stored_source_hash(&db).await.unwrap(), Some("abc".to_string()));
    }

    #[tokio::test]
    async fn test_save_replaces_previous_snapshot() {
        let (db, _temp) = setup_test_db().await;
        save_snapshot(&db, &snapshot(&[["Lima", "palta", "Ana", "1"]], "one"))
            .await
            .unwrap();
        let second = snapshot(&[["Piura", "mango", "Eva", "4"]], "two");
        save_snapshot(&db, &second).await.unwrap();

        let loaded = read_snapshot(&db).await.unwrap();
        assert!(!loaded.graph.contains_node("LIMA"));
        assert!(loaded.graph.contains_node("PIURA"));
        assert_eq!(loaded.store.len(), 1);
        assert_eq!(loaded.meta.source_hash.as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn test_weights_survive_round_trip() {
        let (db, _temp) = setup_test_db().await;
        let mut snap = snapshot(&[["Lima", "palta", "Ana", "1"]], "w");
        snap.graph.insert_edge(Edge {
            district: "LIMA".to_string(),
            species: "PALTA".to_string(),
            relation: "contains".to_string(),
            weight: Some(2.5),
            records: 1,
        });
        save_snapshot(&db, &snap).await.unwrap();
        let loaded = read_snapshot(&db).await.unwrap();
        assert_eq!(loaded.graph.edge_between("LIMA", "PALTA").unwrap().weight, Some(2.5));
        assert!(loaded.graph.has_weights());
    }

    #[tokio::test]
    async fn test_missing_database_falls_back_to_empty() {
        let temp_dir = TempDir::new().unwrap();
        let db = Db::new(temp_dir.path().join("absent.db"));
        let loaded = load_snapshot(&db).await;
        assert_eq!(loaded, GraphSnapshot::empty());
        assert!(!db.path().exists());
        assert_eq!(stored_source_hash(&db).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unmigrated_database_falls_back_to_empty() {
        let temp_dir = TempDir::new().unwrap();
        let db = Db::new(temp_dir.path().join("bare.db"));
        db.with_connection(|conn| {
            conn.execute("CREATE TABLE unrelated (id INTEGER)", [])?;
            Ok(())
        })
        .await
        .unwrap();
        assert!(read_snapshot(&db).await.is_err());
        assert_eq!(load_snapshot(&db).await, GraphSnapshot::empty());
    }

    #[tokio::test]
    async fn test_unreadable_file_falls_back_to_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("garbage.db");
        std::fs::write(&path, b"this is not a sqlite database at all, just bytes").unwrap();
        let loaded = load_snapshot(&Db::new(&path)).await;
        assert_eq!(loaded.graph.node_count(), 0);
        assert!(loaded.store.is_empty());
    }
}
