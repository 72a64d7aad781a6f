//! Live-database tests for the document store facade.
//!
//! These need a running MongoDB reachable via `MONGODB_URL` (defaults to
//! localhost) and are ignored by default:
//! `cargo test --test store_integration -- --ignored`

use bson::oid::ObjectId;
use bson::{doc, Bson};
use mongodb::options::IndexOptions;
use mongodb::IndexModel;
use serde::{Deserialize, Serialize};

use svc_common::pagination::PageRequest;
use svc_common::{DocumentStore, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Member {
    #[serde(rename = "_id")]
    id: ObjectId,
    email: String,
    score: i32,
}

impl Member {
    fn new(email: &str, score: i32) -> Self {
        Self {
            id: ObjectId::new(),
            email: email.to_string(),
            score,
        }
    }
}

async fn store() -> DocumentStore {
    let uri = std::env::var("MONGODB_URL")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    DocumentStore::connect(&uri, "svc_common_it", "members")
        .await
        .expect("connect to test database")
}

/// Fresh collection name per test so runs never interfere.
fn scratch_collection() -> String {
    format!("it_{}", ObjectId::new().to_hex())
}

fn page(limit: i64, page: i64, sort_by: &str, descending: bool) -> PageRequest {
    PageRequest {
        sort_field: sort_by.to_string(),
        sort_descending: descending,
        limit_per_page: limit,
        page,
    }
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn zero_matches_are_absence_not_errors() {
    let store = store().await;
    let coll = scratch_collection();
    let filter = doc! { "email": "nobody@example.com" };

    let found: Option<Member> = store.find_one_in(&coll, filter.clone()).await.unwrap();
    assert!(found.is_none());

    let all: Vec<Member> = store.find_in(&coll, filter.clone()).await.unwrap();
    assert!(all.is_empty());

    let (items, info) = store
        .find_paged_sorted_in::<Member>(&coll, &page(10, 1, "score", false), filter.clone())
        .await
        .unwrap();
    assert!(items.is_empty());
    assert_eq!(info.total, 0);
    assert_eq!(info.total_pages, 0);
    assert!(!info.has_more);

    assert_eq!(store.count_in(&coll, filter.clone()).await.unwrap(), 0);
    assert!(!store.exists_in(&coll, filter.clone()).await.unwrap());

    let outcome = store
        .find_one_and_update_in(&coll, filter, doc! { "score": 1 })
        .await
        .unwrap();
    assert!(outcome.is_none());
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn inserted_document_round_trips_by_id() {
    let store = store().await;
    let coll = scratch_collection();
    let member = Member::new("alice@example.com", 7);

    let inserted_id = store.insert_one_in(&coll, &member).await.unwrap();
    assert_eq!(inserted_id, Bson::ObjectId(member.id));

    let found: Member = store
        .find_one_in(&coll, doc! { "_id": member.id })
        .await
        .unwrap()
        .expect("document just inserted");
    assert_eq!(found, member);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn duplicate_insert_is_a_distinguished_error() {
    let store = store().await;
    let coll = scratch_collection();

    let index = IndexModel::builder()
        .keys(doc! { "email": 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build();
    store
        .collection_handle::<Member>(&coll)
        .create_index(index, None)
        .await
        .unwrap();

    store
        .insert_one_in(&coll, &Member::new("bob@example.com", 1))
        .await
        .unwrap();
    let err = store
        .insert_one_in(&coll, &Member::new("bob@example.com", 2))
        .await
        .unwrap_err();

    assert!(err.is_duplicate_key());
    assert!(matches!(err, StoreError::DuplicateKey(_)));
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn second_page_of_twenty_five_documents() {
    let store = store().await;
    let coll = scratch_collection();

    let members: Vec<Member> = (1..=25)
        .map(|n| Member::new(&format!("m{n}@example.com"), n))
        .collect();
    let ids = store.insert_many_in(&coll, &members).await.unwrap();
    assert_eq!(ids.len(), 25);

    let (items, info) = store
        .find_paged_sorted_in::<Member>(&coll, &page(10, 2, "score", false), doc! {})
        .await
        .unwrap();

    let scores: Vec<i32> = items.iter().map(|m| m.score).collect();
    assert_eq!(scores, (11..=20).collect::<Vec<_>>());
    assert_eq!(info.total, 25);
    assert_eq!(info.total_pages, 3);
    assert_eq!(info.page, 2);
    assert!(info.has_more);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn descending_sort_orders_by_numeric_field() {
    let store = store().await;
    let coll = scratch_collection();

    for score in [1, 5, 3] {
        store
            .insert_one_in(&coll, &Member::new(&format!("s{score}@example.com"), score))
            .await
            .unwrap();
    }

    let (items, _) = store
        .find_paged_sorted_in::<Member>(&coll, &page(10, 1, "score", true), doc! {})
        .await
        .unwrap();
    let scores: Vec<i32> = items.iter().map(|m| m.score).collect();
    assert_eq!(scores, vec![5, 3, 1]);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn exists_agrees_with_count() {
    let store = store().await;
    let coll = scratch_collection();
    store
        .insert_one_in(&coll, &Member::new("carol@example.com", 3))
        .await
        .unwrap();

    for filter in [doc! {}, doc! { "score": 3 }, doc! { "score": 99 }] {
        let count = store.count_in(&coll, filter.clone()).await.unwrap();
        let exists = store.exists_in(&coll, filter).await.unwrap();
        assert_eq!(exists, count > 0);
    }
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn insert_many_then_count_matches_batch_size() {
    let store = store().await;
    let coll = scratch_collection();

    let members: Vec<Member> = (0..8)
        .map(|n| Member::new(&format!("batch{n}@example.com"), n))
        .collect();
    store.insert_many_in(&coll, &members).await.unwrap();

    assert_eq!(store.count_in(&coll, doc! {}).await.unwrap(), 8);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn conditional_update_sets_fields_and_reports_counts() {
    let store = store().await;
    let coll = scratch_collection();
    let member = Member::new("dave@example.com", 1);
    store.insert_one_in(&coll, &member).await.unwrap();

    let outcome = store
        .find_one_and_update_in(&coll, doc! { "_id": member.id }, doc! { "score": 42 })
        .await
        .unwrap()
        .expect("document matched");
    assert_eq!(outcome.matched, 1);
    assert_eq!(outcome.modified, 1);

    let updated: Member = store
        .find_one_in(&coll, doc! { "_id": member.id })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.score, 42);
    assert_eq!(updated.email, "dave@example.com");
}
