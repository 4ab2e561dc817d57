pub mod github;
pub mod graphql;

use anyhow::Result;
use async_trait::async_trait;

use crate::model::content::{ContentId, ItemReference};
use crate::model::project::{ItemsPage, ProjectCoordinate, ProjectId, ProjectItemId};

/// What the issues endpoint reports for a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRecord {
    pub id: ContentId,
    pub is_pull_request: bool,
}

/// Repository issue/pull request lookups. A number the repository does not
/// have resolves to `Ok(None)`.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    async fn issue(&self, reference: &ItemReference) -> Result<Option<IssueRecord>>;
    async fn pull_request(&self, reference: &ItemReference) -> Result<Option<ContentId>>;
}

/// Projects V2 board access. `Ok(None)` means the owner has no such project
/// (or, for deletion, that the item is no longer on it).
#[async_trait]
pub trait ProjectBoard: Send + Sync {
    async fn items_page(
        &self,
        project: &ProjectCoordinate,
        cursor: Option<&str>,
    ) -> Result<Option<ItemsPage>>;
    async fn project_id(&self, project: &ProjectCoordinate) -> Result<Option<ProjectId>>;
    async fn delete_item(
        &self,
        project: &ProjectId,
        item: &ProjectItemId,
    ) -> Result<Option<ProjectItemId>>;
}

#[cfg(test)]
pub mod mock;
