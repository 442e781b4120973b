//! Tests for the libsql/Turso fact collection
//!
//! Exercises schema bootstrap, append, filtered query, and reset against
//! both in-memory and on-disk databases, plus the streaming contract:
//! per-document durability reporting on insert and cursor release when a
//! query stream is dropped early.

use crate::db::{
    DocumentStream, FactCollection, FactDocument, FactFilter, StoreError, TursoFactCollection,
};
use anyhow::Result;
use tokio_stream::StreamExt;
use tokio_test::assert_ok;

fn document(node: &str, referrer: &str, revision: u64, state: &str) -> FactDocument {
    FactDocument {
        node_path: node.to_string(),
        referring_node_path: referrer.to_string(),
        revision,
        state: state.to_string(),
    }
}

async fn collect(mut stream: DocumentStream) -> Result<Vec<FactDocument>> {
    let mut documents = Vec::new();
    while let Some(doc) = stream.next().await {
        documents.push(doc?);
    }
    Ok(documents)
}

/// Insert and drain the echo stream, asserting every document was stored
async fn insert_all(
    collection: &TursoFactCollection,
    documents: Vec<FactDocument>,
) -> Result<()> {
    let stored = collect(collection.insert(documents.clone()).await?).await?;
    assert_eq!(stored, documents);
    Ok(())
}

// ============================================================================
// Round trips and filters
// ============================================================================

#[tokio::test]
async fn test_insert_then_query_round_trips_documents() -> Result<()> {
    let collection = TursoFactCollection::new_in_memory().await?;
    let docs = vec![
        document("/target1", "/source1", 1, "NORMAL"),
        document("/target1", "/source2", 2, "NORMAL"),
        document("/target2", "/source1", 2, "NORMAL"),
    ];
    insert_all(&collection, docs.clone()).await?;

    let mut matched = collect(collection.query(FactFilter::for_node("/target1")).await?).await?;
    matched.sort_by_key(|d| d.revision);
    assert_eq!(matched, docs[..2]);
    Ok(())
}

#[tokio::test]
async fn test_query_applies_revision_bound() -> Result<()> {
    let collection = TursoFactCollection::new_in_memory().await?;
    insert_all(
        &collection,
        vec![
            document("/target1", "/source1", 1, "NORMAL"),
            document("/target1", "/source1", 3, "DELETED"),
        ],
    )
    .await?;

    let matched = collect(collection.query(FactFilter::as_of("/target1", 2)).await?).await?;
    assert_eq!(matched, vec![document("/target1", "/source1", 1, "NORMAL")]);
    Ok(())
}

#[tokio::test]
async fn test_query_unknown_path_is_empty() -> Result<()> {
    let collection = TursoFactCollection::new_in_memory().await?;
    let matched = collect(collection.query(FactFilter::for_node("/nowhere")).await?).await?;
    assert!(matched.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_delete_all_clears_table() -> Result<()> {
    let collection = TursoFactCollection::new_in_memory().await?;
    insert_all(
        &collection,
        vec![document("/target1", "/source1", 1, "NORMAL")],
    )
    .await?;

    tokio_test::assert_ok!(collection.delete_all().await);
    let matched = collect(collection.query(FactFilter::default()).await?).await?;
    assert!(matched.is_empty());
    Ok(())
}

// ============================================================================
// Streaming contract
// ============================================================================

#[tokio::test]
async fn test_insert_reports_facts_stored_before_a_failure() -> Result<()> {
    let collection = TursoFactCollection::new_in_memory().await?;
    let mut stored = collection
        .insert(vec![
            document("/target1", "/source1", 1, "NORMAL"),
            document("/target1", "/source2", 2, "GONE"),
            document("/target1", "/source3", 3, "NORMAL"),
        ])
        .await?;

    // The first document is durable and reported before the bad one fails
    let first = stored.next().await;
    assert_eq!(
        first.and_then(|item| item.ok()),
        Some(document("/target1", "/source1", 1, "NORMAL"))
    );
    let second = stored.next().await;
    assert!(matches!(second, Some(Err(_))));
    assert!(stored.next().await.is_none());

    // Only the document reported as stored is in the table
    let matched = collect(collection.query(FactFilter::for_node("/target1")).await?).await?;
    assert_eq!(matched, vec![document("/target1", "/source1", 1, "NORMAL")]);
    Ok(())
}

#[tokio::test]
async fn test_insert_rejects_revision_above_storable_range() -> Result<()> {
    let collection = TursoFactCollection::new_in_memory().await?;
    let mut stored = collection
        .insert(vec![document("/target1", "/source1", u64::MAX, "NORMAL")])
        .await?;

    let first = stored.next().await;
    assert!(matches!(first, Some(Err(StoreError::MalformedDocument(_)))));
    assert!(stored.next().await.is_none());

    let matched = collect(collection.query(FactFilter::default()).await?).await?;
    assert!(matched.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_query_bound_above_storable_range_matches_all() -> Result<()> {
    let collection = TursoFactCollection::new_in_memory().await?;
    insert_all(
        &collection,
        vec![document("/target1", "/source1", 7, "NORMAL")],
    )
    .await?;

    let matched = collect(
        collection
            .query(FactFilter::as_of("/target1", u64::MAX))
            .await?,
    )
    .await?;
    assert_eq!(matched, vec![document("/target1", "/source1", 7, "NORMAL")]);
    Ok(())
}

#[tokio::test]
async fn test_dropping_query_stream_releases_cursor() -> Result<()> {
    let collection = TursoFactCollection::new_in_memory().await?;
    insert_all(
        &collection,
        vec![
            document("/target1", "/source1", 1, "NORMAL"),
            document("/target1", "/source2", 2, "NORMAL"),
            document("/target1", "/source3", 3, "NORMAL"),
        ],
    )
    .await?;

    let mut stream = collection.query(FactFilter::for_node("/target1")).await?;
    assert!(stream.next().await.is_some());
    drop(stream);

    // Writes and full reads still succeed after the early drop
    insert_all(
        &collection,
        vec![document("/target1", "/source4", 4, "NORMAL")],
    )
    .await?;
    let matched = collect(collection.query(FactFilter::for_node("/target1")).await?).await?;
    assert_eq!(matched.len(), 4);
    Ok(())
}

// ============================================================================
// Persistence and schema
// ============================================================================

#[tokio::test]
async fn test_on_disk_store_persists_across_reopen() -> Result<()> {
    let temp_dir = tempfile::TempDir::new()?;
    let db_path = temp_dir.path().join("facts.db");

    {
        let collection = TursoFactCollection::new(db_path.clone()).await?;
        insert_all(
            &collection,
            vec![document("/target1", "/source1", 1, "NORMAL")],
        )
        .await?;
    }

    let reopened = TursoFactCollection::new(db_path).await?;
    let matched = collect(reopened.query(FactFilter::for_node("/target1")).await?).await?;
    assert_eq!(matched, vec![document("/target1", "/source1", 1, "NORMAL")]);
    Ok(())
}

#[tokio::test]
async fn test_schema_initialization_is_idempotent() -> Result<()> {
    let temp_dir = tempfile::TempDir::new()?;
    let db_path = temp_dir.path().join("facts.db");

    let first = TursoFactCollection::new(db_path.clone()).await?;
    drop(first);
    // Opening a second time must not fail or lose data
    let second = TursoFactCollection::new(db_path).await?;
    insert_all(
        &second,
        vec![document("/target1", "/source1", 1, "NORMAL")],
    )
    .await?;
    Ok(())
}
