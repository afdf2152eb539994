use super::{CredentialStore, ProjectStore, StoreError};
use crate::models::project::{Project, ProjectFields};
use crate::models::user::{PublicUser, User};
use crate::utils::pagination::Page;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-process store with the same contract as `PgStore`. Ids start at 1 and
/// are never reused.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    users: BTreeMap<i32, User>,
    projects: BTreeMap<i32, Project>,
    next_user_id: i32,
    next_project_id: i32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a project with no owner, the way rows predating ownership look.
    pub async fn insert_unowned(&self, fields: &ProjectFields) -> Project {
        let mut inner = self.inner.write().await;
        inner.add_project(fields, None)
    }
}

impl Inner {
    fn add_project(&mut self, fields: &ProjectFields, owner: Option<i32>) -> Project {
        self.next_project_id += 1;
        let now = chrono::Utc::now().timestamp();
        let project = Project {
            id: self.next_project_id,
            name: fields.name.clone(),
            thumbnail_url: fields.thumbnail_url.clone(),
            description: fields.description.clone(),
            content: fields.content.clone(),
            visibility: fields.visibility,
            source_code_url: fields.source_code_url.clone(),
            deployment_url: fields.deployment_url.clone(),
            user_id: owner,
            created_at: now,
            updated_at: now,
        };
        self.projects.insert(project.id, project.clone());
        project
    }
}

fn window<T>(items: impl Iterator<Item = T>, page: Page) -> Vec<T> {
    items
        .skip(page.offset as usize)
        .take(page.limit as usize)
        .collect()
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn insert(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.username == username) {
            return Err(StoreError::UniqueViolation);
        }

        inner.next_user_id += 1;
        let user = User {
            id: inner.next_user_id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: chrono::Utc::now().timestamp(),
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn list(&self, page: Page) -> Result<Vec<PublicUser>, StoreError> {
        let inner = self.inner.read().await;
        Ok(window(
            inner.users.values().cloned().map(PublicUser::from),
            page,
        ))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn list(&self, owner: Option<i32>, page: Page) -> Result<Vec<Project>, StoreError> {
        let inner = self.inner.read().await;
        let matching = inner
            .projects
            .values()
            .filter(|p| owner.is_none() || p.user_id == owner)
            .cloned();
        Ok(window(matching, page))
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Project>, StoreError> {
        Ok(self.inner.read().await.projects.get(&id).cloned())
    }

    async fn insert(&self, fields: &ProjectFields, owner: i32) -> Result<Project, StoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner.add_project(fields, Some(owner)))
    }

    async fn update(
        &self,
        id: i32,
        fields: &ProjectFields,
        owner: i32,
    ) -> Result<Option<Project>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(project) = inner
            .projects
            .get_mut(&id)
            .filter(|p| p.user_id == Some(owner))
        else {
            return Ok(None);
        };

        project.name = fields.name.clone();
        project.thumbnail_url = fields.thumbnail_url.clone();
        project.description = fields.description.clone();
        project.content = fields.content.clone();
        project.visibility = fields.visibility;
        project.source_code_url = fields.source_code_url.clone();
        project.deployment_url = fields.deployment_url.clone();
        project.updated_at = chrono::Utc::now().timestamp();

        Ok(Some(project.clone()))
    }

    async fn delete_by_id(&self, id: i32, owner: i32) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let owned = inner
            .projects
            .get(&id)
            .is_some_and(|p| p.user_id == Some(owner));
        if owned {
            inner.projects.remove(&id);
        }
        Ok(owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::project::Visibility;

    fn fields(name: &str) -> ProjectFields {
        ProjectFields {
            name: name.to_string(),
            thumbnail_url: None,
            description: None,
            content: None,
            visibility: Visibility::Public,
            source_code_url: None,
            deployment_url: None,
        }
    }

    const ALL: Page = Page {
        limit: 100,
        offset: 0,
    };

    #[tokio::test]
    async fn test_duplicate_username_is_unique_violation() {
        let store = MemoryStore::new();
        CredentialStore::insert(&store, "alice", "h1").await.unwrap();

        let err = CredentialStore::insert(&store, "alice", "h2")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation));
    }

    #[tokio::test]
    async fn test_owner_filter_and_paging() {
        let store = MemoryStore::new();
        for i in 0..3 {
            ProjectStore::insert(&store, &fields(&format!("a{i}")), 1)
                .await
                .unwrap();
        }
        ProjectStore::insert(&store, &fields("b"), 2).await.unwrap();
        store.insert_unowned(&fields("legacy")).await;

        assert_eq!(ProjectStore::list(&store, None, ALL).await.unwrap().len(), 5);
        assert_eq!(ProjectStore::list(&store, Some(1), ALL).await.unwrap().len(), 3);
        assert_eq!(ProjectStore::list(&store, Some(2), ALL).await.unwrap().len(), 1);

        let second_page = ProjectStore::list(
            &store,
            Some(1),
            Page {
                limit: 2,
                offset: 2,
            },
        )
        .await
        .unwrap();
        assert_eq!(second_page.len(), 1);
        assert_eq!(second_page[0].name, "a2");
    }

    #[tokio::test]
    async fn test_mutations_require_matching_owner() {
        let store = MemoryStore::new();
        let project = ProjectStore::insert(&store, &fields("mine"), 1).await.unwrap();

        assert!(store.update(project.id, &fields("stolen"), 2).await.unwrap().is_none());
        assert!(!store.delete_by_id(project.id, 2).await.unwrap());

        let updated = store.update(project.id, &fields("renamed"), 1).await.unwrap();
        assert_eq!(updated.unwrap().name, "renamed");
        assert!(store.delete_by_id(project.id, 1).await.unwrap());
        assert!(store.get_by_id(project.id).await.unwrap().is_none());
    }
}
