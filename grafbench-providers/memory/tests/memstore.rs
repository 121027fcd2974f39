//! Integration tests for the in-memory staged store.

use grafbench_core::{
    Edge, EdgeId, EdgeRecord, MergeKey, MergePolicy, NodeId, StagedBulkWriter, StagedStore,
    StoreError,
};
use grafbench_providers_memory::MemoryStore;
use rstest::rstest;

fn record(from: u64, to: u64) -> EdgeRecord {
    EdgeRecord::new(NodeId::new(from), NodeId::new(to))
}

fn seeded_store(edges: Vec<EdgeRecord>) -> MemoryStore {
    let mut store = MemoryStore::new();
    let mut stream = edges.into_iter().map(Ok);
    StagedBulkWriter::new(&mut store)
        .insert_edges(&mut stream)
        .expect("seed import must succeed");
    store
}

#[rstest]
fn bulk_insert_populates_primary_and_clears_staging() {
    let store = seeded_store((1..=40u64).map(|i| record(i, i + 1)).collect());

    assert_eq!(store.edge_count().expect("count must succeed"), 40);
    assert_eq!(store.staged_count().expect("count must succeed"), 0);
}

#[rstest]
fn find_edge_matches_endpoints() {
    let store = seeded_store(vec![record(1, 2), record(2, 3)]);

    let edge = store
        .find_edge(NodeId::new(2), NodeId::new(3))
        .expect("edge must be present");
    assert_eq!(edge.id, EdgeId::new(2));
    assert!(store.find_edge(NodeId::new(3), NodeId::new(2)).is_none());
}

#[rstest]
fn edges_related_sees_both_directions() {
    let store = seeded_store(vec![record(1, 2), record(2, 3), record(4, 5)]);

    let related = store.edges_related(NodeId::new(2));
    assert_eq!(related.len(), 2);
}

#[rstest]
fn count_nodes_derives_distinct_endpoints() {
    let store = seeded_store(vec![record(1, 2), record(2, 3), record(3, 1)]);

    assert_eq!(store.count_nodes(), 3);
}

#[rstest]
fn direct_upsert_replaces_in_place_and_keeps_id() {
    let mut store = seeded_store(vec![record(1, 2)]);

    let id = store
        .upsert_edge(record(1, 2).with_weight(4.0))
        .expect("valid record must upsert");

    assert_eq!(id, EdgeId::new(1));
    assert_eq!(store.edge_count().expect("count must succeed"), 1);
    let edge = store
        .find_edge(NodeId::new(1), NodeId::new(2))
        .expect("edge must survive");
    assert_eq!(edge.weight, 4.0);
}

#[rstest]
fn direct_upsert_drops_invalid_records() {
    let mut store = MemoryStore::new();

    assert!(store.upsert_edge(record(0, 2)).is_none());
    let applied = store.upsert_edges(vec![record(1, 2), record(3, 0), record(2, 3)]);
    assert_eq!(applied, 2);
    assert_eq!(store.edge_count().expect("count must succeed"), 2);
}

#[rstest]
fn remove_edge_deletes_matching_row() {
    let mut store = seeded_store(vec![record(1, 2), record(2, 3)]);

    assert!(store.remove_edge(NodeId::new(1), NodeId::new(2)));
    assert!(!store.remove_edge(NodeId::new(1), NodeId::new(2)));
    assert_eq!(store.edge_count().expect("count must succeed"), 1);
}

#[rstest]
fn insert_only_merge_refuses_duplicate_ids_atomically() {
    let mut store = MemoryStore::new();
    store
        .stage_batch(vec![
            Edge::from_record(record(1, 2), EdgeId::new(1)),
            Edge::from_record(record(2, 3), EdgeId::new(1)),
        ])
        .expect("staging must succeed");

    let err = store
        .merge_staged(MergePolicy::Insert)
        .expect_err("duplicate id must refuse the merge");

    assert!(matches!(err, StoreError::Constraint { .. }));
    assert_eq!(store.edge_count().expect("count must succeed"), 0);
    // The staging area stays re-truncatable after a refused merge.
    store
        .truncate_staging()
        .expect("cleanup truncate must succeed");
    assert_eq!(store.staged_count().expect("count must succeed"), 0);
}

#[rstest]
fn endpoint_merge_collision_updates_values_not_count() {
    let mut store = seeded_store(vec![record(1, 2), record(2, 3)]);

    let mut incoming = vec![
        Ok(record(1, 2).with_weight(7.0)),
        Ok(record(5, 6)),
    ]
    .into_iter();
    let added = StagedBulkWriter::new(&mut store)
        .upsert_edges(&mut incoming, MergeKey::Endpoints)
        .expect("upsert must succeed");

    assert_eq!(added, 1);
    assert_eq!(store.edge_count().expect("count must succeed"), 3);
    let updated = store
        .find_edge(NodeId::new(1), NodeId::new(2))
        .expect("colliding edge must survive");
    assert_eq!(updated.weight, 7.0);
    assert_eq!(updated.id, EdgeId::new(1));
}

#[rstest]
fn small_batch_ceiling_still_lands_every_row() {
    let mut store = MemoryStore::with_max_batch_size(7);
    let mut stream = (1..=30u64).map(|i| Ok(record(i, i + 1)));

    let added = StagedBulkWriter::new(&mut store)
        .insert_edges(&mut stream)
        .expect("chunked import must succeed");

    assert_eq!(added, 30);
    assert_eq!(store.max_batch_size(), 7);
}
