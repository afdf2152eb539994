use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "visibility", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    /// Anything other than an explicit "public" is private.
    pub fn from_input(raw: Option<&str>) -> Self {
        match raw {
            Some("public") => Visibility::Public,
            _ => Visibility::Private,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: i32,
    pub name: String,
    pub thumbnail_url: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub visibility: Visibility,
    pub source_code_url: Option<String>,
    pub deployment_url: Option<String>,
    /// Owner. `None` for legacy rows that were never claimed.
    pub user_id: Option<i32>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Project body as sent by clients. Any owner field in the JSON is simply
/// not part of this type, so it can't reach the store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectRequest {
    #[serde(default)]
    pub name: String,
    pub thumbnail_url: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub visibility: Option<String>,
    pub source_code_url: Option<String>,
    pub deployment_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    pub id: i32,
    #[serde(flatten)]
    pub project: ProjectRequest,
}

#[derive(Debug, Deserialize)]
pub struct DeleteProjectRequest {
    pub id: i32,
}

/// Validated, normalised project fields ready for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFields {
    pub name: String,
    pub thumbnail_url: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub visibility: Visibility,
    pub source_code_url: Option<String>,
    pub deployment_url: Option<String>,
}

impl ProjectRequest {
    /// Checks the name and turns empty optional strings into `None`.
    pub fn into_fields(self) -> Result<ProjectFields, String> {
        let name = self.name.trim().to_string();
        crate::utils::validation::validate_project_name(&name)?;

        Ok(ProjectFields {
            name,
            thumbnail_url: non_empty(self.thumbnail_url),
            description: non_empty(self.description),
            content: non_empty(self.content),
            visibility: Visibility::from_input(self.visibility.as_deref()),
            source_code_url: non_empty(self.source_code_url),
            deployment_url: non_empty(self.deployment_url),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
