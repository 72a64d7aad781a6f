use std::future::Future;
use std::time::Duration;

use bson::{doc, Bson, Document};
use futures_util::TryStreamExt;
use mongodb::options::FindOptions;
use mongodb::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::time::timeout;

use crate::errors::StoreError;
use crate::pagination::{PageInfo, PageRequest};

pub mod audit;

pub use audit::AuditEnvelope;

/// Upper bound on every store round trip, measured from call entry.
pub const OPERATION_DEADLINE: Duration = Duration::from_secs(30);

/// Collection-agnostic facade over a MongoDB database.
///
/// Holds only immutable configuration, so a single instance can be cloned
/// freely and shared across request handlers. The `*_in` methods addressing
/// an explicit collection are canonical; the unsuffixed variants forward to
/// them with the configured default collection.
///
/// Absence is never an error: a filter matching nothing yields `None`, an
/// empty `Vec`, a zero count or `false`, so callers can always tell "nothing
/// there" apart from "something went wrong".
#[derive(Clone)]
pub struct DocumentStore {
    client: Client,
    database: String,
    default_collection: String,
}

/// Match and modification counts reported by a conditional update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

impl DocumentStore {
    /// Build the facade around an existing client. Connectivity is not
    /// validated here; failures surface on first use.
    pub fn new(
        client: Client,
        database: impl Into<String>,
        default_collection: impl Into<String>,
    ) -> Self {
        Self {
            client,
            database: database.into(),
            default_collection: default_collection.into(),
        }
    }

    pub async fn connect(
        uri: &str,
        database: impl Into<String>,
        default_collection: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(StoreError::from_driver)?;
        Ok(Self::new(client, database, default_collection))
    }

    pub fn default_collection(&self) -> &str {
        &self.default_collection
    }

    fn collection<T>(&self, name: &str) -> mongodb::Collection<T> {
        self.client.database(&self.database).collection::<T>(name)
    }

    /// Typed handle on a collection in the configured database, for needs
    /// outside the facade's surface such as index management.
    pub fn collection_handle<T>(&self, name: &str) -> mongodb::Collection<T> {
        self.collection(name)
    }

    pub async fn insert_one_in<T>(&self, collection: &str, document: &T) -> Result<Bson, StoreError>
    where
        T: Serialize + Send + Sync,
    {
        let coll = self.collection::<T>(collection);
        let inserted = bounded(coll.insert_one(document, None)).await?;
        Ok(inserted.inserted_id)
    }

    pub async fn insert_many_in<T>(
        &self,
        collection: &str,
        documents: &[T],
    ) -> Result<Vec<Bson>, StoreError>
    where
        T: Serialize + Send + Sync,
    {
        let coll = self.collection::<T>(collection);
        let inserted = bounded(coll.insert_many(documents, None)).await?;

        // The driver keys inserted ids by input position.
        let mut ids: Vec<(usize, Bson)> = inserted.inserted_ids.into_iter().collect();
        ids.sort_by_key(|(index, _)| *index);
        Ok(ids.into_iter().map(|(_, id)| id).collect())
    }

    pub async fn find_one_in<T>(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<T>, StoreError>
    where
        T: DeserializeOwned + Unpin + Send + Sync,
    {
        let coll = self.collection::<T>(collection);
        bounded(coll.find_one(filter, None))
            .await
            .map_err(note_decode_failure::<T>)
    }

    /// Apply a partial-field update to the first document matching `filter`.
    /// The update document is wrapped in `$set`; this never replaces whole
    /// documents. Returns `None` when nothing matched.
    pub async fn find_one_and_update_in(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> Result<Option<UpdateOutcome>, StoreError> {
        let coll = self.collection::<Document>(collection);
        let result = bounded(coll.update_one(filter, doc! { "$set": update }, None)).await?;

        if result.matched_count == 0 {
            return Ok(None);
        }
        Ok(Some(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        }))
    }

    pub async fn find_in<T>(&self, collection: &str, filter: Document) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned + Unpin + Send + Sync,
    {
        let coll = self.collection::<T>(collection);
        bounded(async move {
            let cursor = coll.find(filter, None).await?;
            cursor.try_collect::<Vec<T>>().await
        })
        .await
        .map_err(note_decode_failure::<T>)
    }

    /// Fetch one page of matches ordered by the requested sort field, along
    /// with pagination metadata computed from the total match count. Zero
    /// matches yield an empty page whose metadata reports zero totals.
    pub async fn find_paged_sorted_in<T>(
        &self,
        collection: &str,
        request: &PageRequest,
        filter: Document,
    ) -> Result<(Vec<T>, PageInfo), StoreError>
    where
        T: DeserializeOwned,
    {
        let coll = self.collection::<Document>(collection);
        let options = FindOptions::builder()
            .sort(request.sort_doc())
            .skip(request.skip())
            .limit(request.limit_per_page.max(1))
            .build();

        let (raw, total) = bounded(async move {
            let cursor = coll.find(filter.clone(), options).await?;
            let raw = cursor.try_collect::<Vec<Document>>().await?;
            let total = coll.count_documents(filter, None).await?;
            Ok((raw, total))
        })
        .await?;

        let items = decode_page::<T>(raw)?;
        Ok((items, PageInfo::compute(total, request)))
    }

    pub async fn count_in(&self, collection: &str, filter: Document) -> Result<u64, StoreError> {
        let coll = self.collection::<Document>(collection);
        bounded(coll.count_documents(filter, None)).await
    }

    pub async fn exists_in(&self, collection: &str, filter: Document) -> Result<bool, StoreError> {
        let count = self.count_in(collection, filter).await?;
        Ok(count > 0)
    }

    pub async fn insert_one<T>(&self, document: &T) -> Result<Bson, StoreError>
    where
        T: Serialize + Send + Sync,
    {
        self.insert_one_in(&self.default_collection, document).await
    }

    pub async fn insert_many<T>(&self, documents: &[T]) -> Result<Vec<Bson>, StoreError>
    where
        T: Serialize + Send + Sync,
    {
        self.insert_many_in(&self.default_collection, documents)
            .await
    }

    pub async fn find_one<T>(&self, filter: Document) -> Result<Option<T>, StoreError>
    where
        T: DeserializeOwned + Unpin + Send + Sync,
    {
        self.find_one_in(&self.default_collection, filter).await
    }

    pub async fn find_one_and_update(
        &self,
        filter: Document,
        update: Document,
    ) -> Result<Option<UpdateOutcome>, StoreError> {
        self.find_one_and_update_in(&self.default_collection, filter, update)
            .await
    }

    pub async fn find<T>(&self, filter: Document) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned + Unpin + Send + Sync,
    {
        self.find_in(&self.default_collection, filter).await
    }

    pub async fn find_paged_sorted<T>(
        &self,
        request: &PageRequest,
        filter: Document,
    ) -> Result<(Vec<T>, PageInfo), StoreError>
    where
        T: DeserializeOwned,
    {
        self.find_paged_sorted_in(&self.default_collection, request, filter)
            .await
    }

    pub async fn count(&self, filter: Document) -> Result<u64, StoreError> {
        self.count_in(&self.default_collection, filter).await
    }

    pub async fn exists(&self, filter: Document) -> Result<bool, StoreError> {
        self.exists_in(&self.default_collection, filter).await
    }
}

/// Run a driver operation under the fixed deadline.
async fn bounded<T, F>(op: F) -> Result<T, StoreError>
where
    F: Future<Output = mongodb::error::Result<T>>,
{
    match timeout(OPERATION_DEADLINE, op).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(StoreError::from_driver(err)),
        Err(_) => Err(StoreError::Timeout(OPERATION_DEADLINE)),
    }
}

/// Decode raw page documents into the caller's element type, preserving
/// encounter order.
fn decode_page<T: DeserializeOwned>(raw: Vec<Document>) -> Result<Vec<T>, StoreError> {
    let mut items = Vec::with_capacity(raw.len());
    for document in raw {
        let item = bson::from_document::<T>(document).map_err(|err| {
            let decode_err = StoreError::Decode(err.to_string());
            note_decode_failure::<T>(decode_err)
        })?;
        items.push(item);
    }
    Ok(items)
}

fn note_decode_failure<T>(err: StoreError) -> StoreError {
    if let StoreError::Decode(detail) = &err {
        tracing::error!(
            target_type = std::any::type_name::<T>(),
            error = %detail,
            "failed to decode stored document"
        );
    }
    err
}
