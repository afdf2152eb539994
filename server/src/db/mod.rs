//! Storage adapters. Handlers only see the two traits below; `PgStore` backs
//! them in production and `MemoryStore` in tests.

use crate::models::project::{Project, ProjectFields};
use crate::models::user::{PublicUser, User};
use crate::utils::pagination::Page;
use anyhow::Result;
use async_trait::async_trait;
use sqlx::{PgPool, postgres::PgPoolOptions};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unique constraint violated")]
    UniqueViolation,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Fails with `UniqueViolation` if the username is taken.
    async fn insert(&self, username: &str, password_hash: &str) -> Result<User, StoreError>;

    async fn list(&self, page: Page) -> Result<Vec<PublicUser>, StoreError>;

    /// Cheap liveness probe for the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// `owner = None` lists every project regardless of owner.
    async fn list(&self, owner: Option<i32>, page: Page) -> Result<Vec<Project>, StoreError>;

    async fn get_by_id(&self, id: i32) -> Result<Option<Project>, StoreError>;

    async fn insert(&self, fields: &ProjectFields, owner: i32) -> Result<Project, StoreError>;

    /// Replaces the mutable fields. Only touches the row if it belongs to
    /// `owner`; returns `None` otherwise.
    async fn update(
        &self,
        id: i32,
        fields: &ProjectFields,
        owner: i32,
    ) -> Result<Option<Project>, StoreError>;

    /// Returns whether a row owned by `owner` was removed.
    async fn delete_by_id(&self, id: i32, owner: i32) -> Result<bool, StoreError>;
}

/// Opens the Postgres pool and brings the schema up to date.
pub async fn connect(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
