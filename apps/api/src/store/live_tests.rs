//! Store tests that exercise a real Postgres instance.
//!
//! These are `#[ignore]`d by default; run them with
//! `DATABASE_URL=postgres://... cargo test -- --ignored`.
//! Each test seeds its own account, so tests stay isolated on a shared
//! database.

use std::time::{SystemTime, UNIX_EPOCH};

use sqlx::PgPool;

use crate::models::pagination::Pagination;
use crate::models::records::{ResumePreset, ResumeSection, SectionBody};
use crate::models::tag::{Tag, TagBody};
use crate::store::{RecordStore, StoreError, TaggedRecordStore};

async fn test_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set to run live store tests");
    let pool = PgPool::connect(&url).await.expect("could not connect");
    sqlx::migrate!().run(&pool).await.expect("could not migrate");
    pool
}

fn unique() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos()
}

async fn seed_account(pool: &PgPool) -> i64 {
    sqlx::query_scalar("INSERT INTO accounts (email) VALUES ($1) RETURNING id")
        .bind(format!("store-test-{}@example.com", unique()))
        .fetch_one(pool)
        .await
        .expect("could not seed account")
}

async fn seed_tag(pool: &PgPool, account_id: i64, label: &str) -> Tag {
    RecordStore::<Tag>::new(pool.clone())
        .create_single(
            account_id,
            &TagBody {
                label: label.to_string(),
                color: "#336699".to_string(),
            },
        )
        .await
        .expect("could not seed tag")
}

fn section_body(label: &str, text: &str, tag_ids: Vec<i64>) -> SectionBody {
    SectionBody {
        label: label.to_string(),
        text: text.to_string(),
        tag_ids,
    }
}

async fn join_row_count(pool: &PgPool, record_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM mtm_tags_resume_sections WHERE record_id = $1")
        .bind(record_id)
        .fetch_one(pool)
        .await
        .expect("could not count join rows")
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a postgres instance"]
async fn test_create_then_get_single_round_trips_fields_and_tag_count() {
    let pool = test_pool().await;
    let account = seed_account(&pool).await;
    let store = TaggedRecordStore::<ResumeSection>::new(pool.clone());

    let t1 = seed_tag(&pool, account, "rust").await;
    let t2 = seed_tag(&pool, account, "remote").await;

    let created = store
        .create_single(account, &section_body("Intro", "Hello", vec![t1.id, t2.id]))
        .await
        .expect("create failed");

    let fetched = store
        .get_single(account, created.id)
        .await
        .expect("get failed");
    assert_eq!(fetched.label, "Intro");
    assert_eq!(fetched.text, "Hello");
    assert_eq!(fetched.account_id, account);
    assert_eq!(join_row_count(&pool, created.id).await, 2);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a postgres instance"]
async fn test_delete_cascades_association_rows() {
    let pool = test_pool().await;
    let account = seed_account(&pool).await;
    let store = TaggedRecordStore::<ResumeSection>::new(pool.clone());

    let tag = seed_tag(&pool, account, "cascade").await;
    let created = store
        .create_single(account, &section_body("Doomed", "text", vec![tag.id]))
        .await
        .expect("create failed");
    assert_eq!(join_row_count(&pool, created.id).await, 1);

    store
        .delete_single(account, created.id)
        .await
        .expect("delete failed");
    assert_eq!(
        join_row_count(&pool, created.id).await,
        0,
        "join rows must not outlive the record"
    );
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a postgres instance"]
async fn test_other_account_sees_not_found_never_the_record() {
    let pool = test_pool().await;
    let owner = seed_account(&pool).await;
    let stranger = seed_account(&pool).await;
    let store = TaggedRecordStore::<ResumeSection>::new(pool.clone());

    let created = store
        .create_single(owner, &section_body("Private", "text", vec![]))
        .await
        .expect("create failed");

    assert!(matches!(
        store.get_single(stranger, created.id).await,
        Err(StoreError::NotFound)
    ));
    assert!(matches!(
        store
            .update_single(stranger, created.id, &section_body("Hijack", "text", vec![]))
            .await,
        Err(StoreError::NotFound)
    ));
    assert!(matches!(
        store.delete_single(stranger, created.id).await,
        Err(StoreError::NotFound)
    ));

    // Still there for the owner.
    let fetched = store.get_single(owner, created.id).await.expect("get failed");
    assert_eq!(fetched.label, "Private");
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a postgres instance"]
async fn test_pagination_covers_every_record_exactly_once() {
    let pool = test_pool().await;
    let account = seed_account(&pool).await;
    let store = TaggedRecordStore::<ResumePreset>::new(pool.clone());

    let mut created_ids = Vec::new();
    for i in 0..15 {
        let preset = store
            .create_single(
                account,
                &crate::models::records::PresetBody {
                    label: format!("preset-{i}"),
                    tag_ids: vec![],
                },
            )
            .await
            .expect("create failed");
        created_ids.push(preset.id);
    }

    let page1 = store
        .get_many(account, Pagination::from_params(Some(1), Some(10), None))
        .await
        .expect("page 1 failed");
    let page2 = store
        .get_many(account, Pagination::from_params(Some(2), Some(10), None))
        .await
        .expect("page 2 failed");

    assert_eq!(page1.len(), 10);
    assert_eq!(page2.len(), 5);

    let mut seen: Vec<i64> = page1
        .iter()
        .chain(page2.iter())
        .map(|g| g.record.id)
        .collect();
    seen.sort_unstable();
    created_ids.sort_unstable();
    assert_eq!(seen, created_ids, "pages must have no overlap and no gap");
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a postgres instance"]
async fn test_get_many_groups_tagged_and_untagged_records() {
    let pool = test_pool().await;
    let account = seed_account(&pool).await;
    let store = TaggedRecordStore::<ResumeSection>::new(pool.clone());

    let t1 = seed_tag(&pool, account, "one").await;
    let t2 = seed_tag(&pool, account, "two").await;
    let t3 = seed_tag(&pool, account, "three").await;

    store
        .create_single(account, &section_body("A", "text", vec![t1.id, t2.id, t3.id]))
        .await
        .expect("create A failed");
    store
        .create_single(account, &section_body("B", "text", vec![]))
        .await
        .expect("create B failed");

    let groups = store
        .get_many(account, Pagination::default())
        .await
        .expect("get_many failed");
    assert_eq!(groups.len(), 2);

    let a = groups
        .iter()
        .find(|g| g.record.label == "A")
        .expect("A missing");
    let b = groups
        .iter()
        .find(|g| g.record.label == "B")
        .expect("B missing");
    assert_eq!(a.tags.len(), 3);
    assert!(b.tags.is_empty(), "untagged record must carry an empty list");
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a postgres instance"]
async fn test_update_leaves_id_account_and_created_at_untouched() {
    let pool = test_pool().await;
    let account = seed_account(&pool).await;
    let store = TaggedRecordStore::<ResumeSection>::new(pool.clone());

    let created = store
        .create_single(account, &section_body("Before", "old", vec![]))
        .await
        .expect("create failed");

    let updated = store
        .update_single(account, created.id, &section_body("After", "new", vec![]))
        .await
        .expect("update failed");

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.account_id, created.account_id);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.label, "After");
    assert_eq!(updated.text, "new");
    assert!(
        updated.updated_at >= created.updated_at,
        "updated_at must be re-stamped by the database"
    );
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a postgres instance"]
async fn test_duplicate_tag_association_surfaces_as_conflict() {
    let pool = test_pool().await;
    let account = seed_account(&pool).await;
    let store = TaggedRecordStore::<ResumeSection>::new(pool.clone());

    let tag = seed_tag(&pool, account, "dup").await;
    let result = store
        .create_single(account, &section_body("Dup", "text", vec![tag.id, tag.id]))
        .await;

    assert!(matches!(result, Err(StoreError::Conflict(_))));

    // The failed transaction must not have left a partial record behind.
    let groups = store
        .get_many(account, Pagination::default())
        .await
        .expect("get_many failed");
    assert!(groups.is_empty(), "rolled-back create must leave no record");
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a postgres instance"]
async fn test_intro_section_scenario() {
    // Create a resume section labelled "Intro" with two tags, then list it.
    let pool = test_pool().await;
    let account = seed_account(&pool).await;
    let store = TaggedRecordStore::<ResumeSection>::new(pool.clone());

    let first = seed_tag(&pool, account, "first").await;
    let second = seed_tag(&pool, account, "second").await;

    store
        .create_single(
            account,
            &section_body("Intro", "Hello", vec![first.id, second.id]),
        )
        .await
        .expect("create failed");

    let groups = store
        .get_many(account, Pagination::from_params(Some(1), Some(10), None))
        .await
        .expect("get_many failed");

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].record.label, "Intro");
    let tag_ids: Vec<i64> = groups[0].tags.iter().map(|t| t.id).collect();
    assert_eq!(tag_ids, vec![first.id, second.id]);
}
