//! Tests for InverseReferenceIndex
//!
//! Covers the as-of reconstruction algorithm: latest-wins grouping,
//! tombstone visibility, empty-result boundaries, and reset.

use crate::db::MemoryFactCollection;
use crate::index::{FactStream, InverseReferenceIndex};
use crate::models::{InverseReferenceFact, NodePath, ReferenceState};
use anyhow::Result;
use std::collections::HashSet;
use std::sync::Arc;
use tokio_stream::StreamExt;

fn index() -> InverseReferenceIndex {
    InverseReferenceIndex::new(Arc::new(MemoryFactCollection::new()))
}

fn fact(node: &str, referrer: &str, revision: u64, state: ReferenceState) -> InverseReferenceFact {
    InverseReferenceFact::new(node, referrer, revision, state)
}

async fn collect(mut stream: FactStream) -> Result<Vec<InverseReferenceFact>> {
    let mut facts = Vec::new();
    while let Some(fact) = stream.next().await {
        facts.push(fact?);
    }
    Ok(facts)
}

async fn collect_set(stream: FactStream) -> Result<HashSet<InverseReferenceFact>> {
    Ok(collect(stream).await?.into_iter().collect())
}

/// Seed the reference scenario from the fact log example:
/// rev 1: /source1 -> /target1, rev 2: /source2 -> /target1,
/// rev 3: /source1's reference removed.
async fn seeded_index() -> Result<InverseReferenceIndex> {
    let index = index();
    let stored = index
        .append(vec![
            fact("/target1", "/source1", 1, ReferenceState::Normal),
            fact("/target1", "/source2", 2, ReferenceState::Normal),
            fact("/target1", "/source1", 3, ReferenceState::Deleted),
        ])
        .await?;
    assert_eq!(collect(stored).await?.len(), 3);
    Ok(index)
}

#[tokio::test]
async fn test_append_echoes_stored_facts() -> Result<()> {
    let index = index();
    let facts = vec![
        fact("/target1", "/source1", 1, ReferenceState::Normal),
        fact("/target2", "/source1", 1, ReferenceState::Normal),
    ];

    let stored = collect(index.append(facts.clone()).await?).await?;
    assert_eq!(stored, facts);
    Ok(())
}

#[tokio::test]
async fn test_as_of_revision_one_sees_only_first_fact() -> Result<()> {
    let index = seeded_index().await?;
    let target = NodePath::new("/target1");

    let visible = collect_set(index.query_as_of(&target, 1).await?).await?;
    let expected: HashSet<_> = [fact("/target1", "/source1", 1, ReferenceState::Normal)]
        .into_iter()
        .collect();
    assert_eq!(visible, expected);
    Ok(())
}

#[tokio::test]
async fn test_as_of_revision_two_sees_both_referrers() -> Result<()> {
    let index = seeded_index().await?;
    let target = NodePath::new("/target1");

    let visible = collect_set(index.query_as_of(&target, 2).await?).await?;
    let expected: HashSet<_> = [
        fact("/target1", "/source1", 1, ReferenceState::Normal),
        fact("/target1", "/source2", 2, ReferenceState::Normal),
    ]
    .into_iter()
    .collect();
    assert_eq!(visible, expected);
    Ok(())
}

#[tokio::test]
async fn test_as_of_revision_three_returns_tombstone_not_absence() -> Result<()> {
    let index = seeded_index().await?;
    let target = NodePath::new("/target1");

    let visible = collect_set(index.query_as_of(&target, 3).await?).await?;
    let expected: HashSet<_> = [
        fact("/target1", "/source2", 2, ReferenceState::Normal),
        fact("/target1", "/source1", 3, ReferenceState::Deleted),
    ]
    .into_iter()
    .collect();
    assert_eq!(visible, expected);
    Ok(())
}

#[tokio::test]
async fn test_as_of_later_revision_keeps_winners() -> Result<()> {
    let index = seeded_index().await?;
    let target = NodePath::new("/target1");

    // No facts after revision 3: the snapshot is stable from there on
    let at_three = collect_set(index.query_as_of(&target, 3).await?).await?;
    let at_hundred = collect_set(index.query_as_of(&target, 100).await?).await?;
    assert_eq!(at_three, at_hundred);
    Ok(())
}

#[tokio::test]
async fn test_as_of_monotonicity_of_referring_keys() -> Result<()> {
    let index = seeded_index().await?;
    let target = NodePath::new("/target1");

    // Per referring-node key, a key visible at R1 stays visible at R2 > R1
    // (its winning fact may change state, but the key never disappears).
    for (earlier, later) in [(1u64, 2u64), (2, 3), (1, 3)] {
        let earlier_keys: HashSet<_> = collect(index.query_as_of(&target, earlier).await?)
            .await?
            .into_iter()
            .map(|f| f.referring_node_path)
            .collect();
        let later_keys: HashSet<_> = collect(index.query_as_of(&target, later).await?)
            .await?
            .into_iter()
            .map(|f| f.referring_node_path)
            .collect();
        assert!(
            earlier_keys.is_subset(&later_keys),
            "keys at revision {} must survive to revision {}",
            earlier,
            later
        );
    }
    Ok(())
}

#[tokio::test]
async fn test_query_unknown_node_is_empty() -> Result<()> {
    let index = seeded_index().await?;
    let visible = collect(index.query_as_of(&NodePath::new("/nowhere"), 10).await?).await?;
    assert!(visible.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_query_before_first_fact_is_empty() -> Result<()> {
    let index = index();
    collect(
        index
            .append(vec![fact("/target1", "/source1", 5, ReferenceState::Normal)])
            .await?,
    )
    .await?;

    let visible = collect(index.query_as_of(&NodePath::new("/target1"), 4).await?).await?;
    assert!(visible.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_facts_for_other_nodes_do_not_leak() -> Result<()> {
    let index = seeded_index().await?;
    collect(
        index
            .append(vec![fact("/target2", "/source9", 2, ReferenceState::Normal)])
            .await?,
    )
    .await?;

    let visible = collect(index.query_as_of(&NodePath::new("/target2"), 3).await?).await?;
    assert_eq!(
        visible,
        vec![fact("/target2", "/source9", 2, ReferenceState::Normal)]
    );
    Ok(())
}

#[tokio::test]
async fn test_reset_clears_the_log() -> Result<()> {
    let index = seeded_index().await?;
    index.reset().await?;

    let visible = collect(index.query_as_of(&NodePath::new("/target1"), 3).await?).await?;
    assert!(visible.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_append_order_within_call_carries_no_weight() -> Result<()> {
    let index = index();
    // Same facts as the seeded scenario, appended in shuffled order
    collect(
        index
            .append(vec![
                fact("/target1", "/source1", 3, ReferenceState::Deleted),
                fact("/target1", "/source1", 1, ReferenceState::Normal),
                fact("/target1", "/source2", 2, ReferenceState::Normal),
            ])
            .await?,
    )
    .await?;

    let visible = collect_set(index.query_as_of(&NodePath::new("/target1"), 3).await?).await?;
    let expected: HashSet<_> = [
        fact("/target1", "/source2", 2, ReferenceState::Normal),
        fact("/target1", "/source1", 3, ReferenceState::Deleted),
    ]
    .into_iter()
    .collect();
    assert_eq!(visible, expected);
    Ok(())
}
