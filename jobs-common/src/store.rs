use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use mongodb::error::{ErrorKind, RETRYABLE_WRITE_ERROR};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::posting::NewPosting;

/// Enumeration of errors for operations with a PostingStore.
/// Errors can originate from the MongoDB driver and are wrapped by us to provide additional context.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("connection failed with: {error}")]
    ConnectionError { error: mongodb::error::Error },
    #[error("insert failed with: {error}")]
    InsertError { error: mongodb::error::Error },
    #[error("insert timed out after {0:?}")]
    TimeoutError(Duration),
    #[error("store returned an identifier that is not an ObjectId: {0}")]
    InvalidIdError(String),
}

impl StoreError {
    /// Whether the store could not be reached at all, as opposed to rejecting the write.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            StoreError::ConnectionError { .. } | StoreError::TimeoutError(_)
        )
    }

    /// Short label used when reporting faults in metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::ConnectionError { .. } => "connection",
            StoreError::InsertError { .. } => "insert",
            StoreError::TimeoutError(_) => "timeout",
            StoreError::InvalidIdError(_) => "invalid_id",
        }
    }
}

impl From<mongodb::error::Error> for StoreError {
    fn from(error: mongodb::error::Error) -> Self {
        if is_transient(&error.kind, error.contains_label(RETRYABLE_WRITE_ERROR)) {
            StoreError::ConnectionError { error }
        } else {
            StoreError::InsertError { error }
        }
    }
}

/// Driver errors caused by losing the server rather than by the server refusing the document.
fn is_transient(kind: &ErrorKind, retryable_write: bool) -> bool {
    retryable_write
        || matches!(
            kind,
            ErrorKind::ServerSelection { .. }
                | ErrorKind::Io(_)
                | ErrorKind::ConnectionPoolCleared { .. }
        )
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// The identifier assigned to a stored job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PostingId(pub ObjectId);

impl fmt::Display for PostingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

/// A job posting as persisted in the document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingRecord {
    /// Left unset on insert so that an identifier is generated for the document.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub source_link: String,
    pub description: String,
}

impl From<NewPosting> for PostingRecord {
    fn from(posting: NewPosting) -> Self {
        let (source_link, description) = posting.into_parts();

        Self {
            id: None,
            source_link,
            description,
        }
    }
}

/// Write side of job posting persistence.
#[async_trait]
pub trait PostingStore: Send + Sync {
    /// Insert a new posting and return the identifier it was stored under.
    async fn insert(&self, posting: NewPosting) -> StoreResult<PostingId>;
}

/// A PostingStore shared by every request handler.
pub type SharedStore = Arc<dyn PostingStore>;

/// A PostingStore backed by a MongoDB collection.
///
/// The driver's `Client` owns a connection pool: it is created once and each insert checks a
/// connection out of it, returning it when the operation completes, fails or is dropped on timeout.
#[derive(Clone)]
pub struct MongoStore {
    collection: Collection<PostingRecord>,
    insert_timeout: Duration,
}

impl MongoStore {
    /// Initialize a new MongoStore writing to `collection` in `database`.
    /// No connection is opened until the first insert.
    pub async fn new(
        connection_string: &str,
        database: &str,
        collection: &str,
        max_pool_size: u32,
        insert_timeout: Duration,
    ) -> StoreResult<Self> {
        let mut options = ClientOptions::parse(connection_string)
            .await
            .map_err(|error| StoreError::ConnectionError { error })?;
        options.app_name = Some("jobs-api".to_owned());
        options.max_pool_size = Some(max_pool_size);

        let client =
            Client::with_options(options).map_err(|error| StoreError::ConnectionError { error })?;

        info!(database, collection, "configured MongoDB posting store");

        Ok(Self {
            collection: client.database(database).collection(collection),
            insert_timeout,
        })
    }

    /// Initialize a new MongoStore from an existing collection handle.
    pub fn new_from_collection(
        collection: Collection<PostingRecord>,
        insert_timeout: Duration,
    ) -> Self {
        Self {
            collection,
            insert_timeout,
        }
    }
}

#[async_trait]
impl PostingStore for MongoStore {
    async fn insert(&self, posting: NewPosting) -> StoreResult<PostingId> {
        let record = PostingRecord::from(posting);

        let result = tokio::time::timeout(
            self.insert_timeout,
            self.collection.insert_one(record, None),
        )
        .await
        .map_err(|_| StoreError::TimeoutError(self.insert_timeout))??;

        match result.inserted_id.as_object_id() {
            Some(id) => Ok(PostingId(id)),
            None => Err(StoreError::InvalidIdError(result.inserted_id.to_string())),
        }
    }
}

/// A PostingStore that only logs what it receives, for running the API without a database.
pub struct PrintStore {}

#[async_trait]
impl PostingStore for PrintStore {
    async fn insert(&self, posting: NewPosting) -> StoreResult<PostingId> {
        let id = PostingId(ObjectId::new());
        info!("job posting {}: {:?}", id, posting);

        Ok(id)
    }
}
