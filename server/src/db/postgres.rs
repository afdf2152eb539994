use super::{CredentialStore, ProjectStore, StoreError};
use crate::models::project::{Project, ProjectFields};
use crate::models::user::{PublicUser, User};
use crate::utils::pagination::Page;
use async_trait::async_trait;
use sqlx::PgPool;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn classify(e: sqlx::Error) -> StoreError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return StoreError::UniqueViolation;
        }
    }
    StoreError::Database(e)
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn insert(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        // UNIQUE(username) settles concurrent registrations of the same name.
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, created_at)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(chrono::Utc::now().timestamp())
        .fetch_one(&self.pool)
        .await
        .map_err(classify)
    }

    async fn list(&self, page: Page) -> Result<Vec<PublicUser>, StoreError> {
        let users = sqlx::query_as::<_, PublicUser>(
            "SELECT id, username, created_at FROM users ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl ProjectStore for PgStore {
    async fn list(&self, owner: Option<i32>, page: Page) -> Result<Vec<Project>, StoreError> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT * FROM projects
            WHERE ($1::INT4 IS NULL OR user_id = $1)
            ORDER BY id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(owner)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(projects)
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Project>, StoreError> {
        let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(project)
    }

    async fn insert(&self, fields: &ProjectFields, owner: i32) -> Result<Project, StoreError> {
        let now = chrono::Utc::now().timestamp();

        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, thumbnail_url, description, content, visibility,
                                  source_code_url, deployment_url, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING *
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.thumbnail_url)
        .bind(&fields.description)
        .bind(&fields.content)
        .bind(fields.visibility)
        .bind(&fields.source_code_url)
        .bind(&fields.deployment_url)
        .bind(owner)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)?;
        Ok(project)
    }

    async fn update(
        &self,
        id: i32,
        fields: &ProjectFields,
        owner: i32,
    ) -> Result<Option<Project>, StoreError> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET name = $1, thumbnail_url = $2, description = $3, content = $4, visibility = $5,
                source_code_url = $6, deployment_url = $7, updated_at = $8
            WHERE id = $9 AND user_id = $10
            RETURNING *
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.thumbnail_url)
        .bind(&fields.description)
        .bind(&fields.content)
        .bind(fields.visibility)
        .bind(&fields.source_code_url)
        .bind(&fields.deployment_url)
        .bind(chrono::Utc::now().timestamp())
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(project)
    }

    async fn delete_by_id(&self, id: i32, owner: i32) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
