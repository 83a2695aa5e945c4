//! MongoDB-backed credential store
//!
//! Unique indexes on username and email make the store the atomic
//! authority for uniqueness; a racing insert surfaces as a duplicate-key
//! write error (code 11000) rather than corrupting the collection.

use bson::doc;
use chrono::{DateTime, Utc};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, IndexModel};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::Role;
use crate::store::{StoreError, User, UserStore};
use crate::types::GatewayError;

/// Collection name for users
pub const USER_COLLECTION: &str = "users";

/// MongoDB duplicate-key error code
const DUPLICATE_KEY_CODE: i32 = 11000;

/// User document stored in MongoDB
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserDoc {
    username: String,
    email: String,
    password_hash: String,
    role: Role,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    created_at: DateTime<Utc>,
}

impl From<UserDoc> for User {
    fn from(doc: UserDoc) -> Self {
        User {
            username: doc.username,
            email: doc.email,
            password_hash: doc.password_hash,
            role: doc.role,
        }
    }
}

/// Credential store backed by a MongoDB collection
#[derive(Clone)]
pub struct MongoStore {
    users: Collection<UserDoc>,
}

impl MongoStore {
    /// Connect, verify with a ping, and ensure the unique indexes exist
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self, GatewayError> {
        info!("Connecting to MongoDB at {}", uri);

        // Bounded server selection so startup fails fast when unreachable
        let timeout_uri = if uri.contains('?') {
            format!("{}&serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        } else {
            format!("{}?serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        };

        let client = Client::with_uri_str(&timeout_uri)
            .await
            .map_err(|e| GatewayError::Database(format!("Failed to connect to MongoDB: {}", e)))?;

        let db = client.database(db_name);
        db.run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| GatewayError::Database(format!("MongoDB ping failed: {}", e)))?;

        let users = db.collection::<UserDoc>(USER_COLLECTION);

        users
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "username": 1 })
                    .options(
                        IndexOptions::builder()
                            .unique(true)
                            .name("username_unique".to_string())
                            .build(),
                    )
                    .build(),
            )
            .await
            .map_err(|e| GatewayError::Database(format!("Failed to create index: {}", e)))?;

        users
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "email": 1 })
                    .options(
                        IndexOptions::builder()
                            .unique(true)
                            .name("email_unique".to_string())
                            .build(),
                    )
                    .build(),
            )
            .await
            .map_err(|e| GatewayError::Database(format!("Failed to create index: {}", e)))?;

        info!("Connected to MongoDB database '{}'", db_name);

        Ok(Self { users })
    }
}

fn map_insert_error(err: mongodb::error::Error) -> StoreError {
    use mongodb::error::{ErrorKind, WriteFailure};

    if let ErrorKind::Write(WriteFailure::WriteError(write_err)) = err.kind.as_ref() {
        if write_err.code == DUPLICATE_KEY_CODE {
            return StoreError::Duplicate(write_err.message.clone());
        }
    }
    StoreError::Backend(err.to_string())
}

#[async_trait::async_trait]
impl UserStore for MongoStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.users
            .find_one(doc! { "username": username })
            .await
            .map(|opt| opt.map(User::from))
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.users
            .find_one(doc! { "email": email })
            .await
            .map(|opt| opt.map(User::from))
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        let doc = UserDoc {
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role,
            created_at: Utc::now(),
        };

        self.users
            .insert_one(doc)
            .await
            .map(|_| ())
            .map_err(map_insert_error)
    }
}
