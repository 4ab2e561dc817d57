use anyhow::{bail, Result};
use serde::Deserialize;

use crate::model::content::{ContentId, ContentKind};
use crate::model::project::{ItemsPage, ProjectId, ProjectItem, ProjectItemId};

pub const ITEMS_PAGE_QUERY: &str = r#"
query($owner: String!, $number: Int!, $cursor: String) {
  organization(login: $owner) {
    projectV2(number: $number) {
      items(first: 100, after: $cursor) {
        nodes {
          id
          content {
            __typename
            ... on Issue { fullDatabaseId number }
            ... on PullRequest { fullDatabaseId number }
          }
        }
        pageInfo { endCursor hasNextPage }
      }
    }
  }
}
"#;

pub const PROJECT_ID_QUERY: &str = r#"
query($owner: String!, $number: Int!) {
  organization(login: $owner) {
    projectV2(number: $number) { id }
  }
}
"#;

pub const DELETE_ITEM_MUTATION: &str = r#"
mutation($projectId: ID!, $itemId: ID!) {
  deleteProjectV2Item(input: { projectId: $projectId, itemId: $itemId }) {
    deletedItemId
  }
}
"#;

#[derive(Debug, Deserialize)]
pub struct GqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GqlError>,
}

#[derive(Debug, Deserialize)]
struct GqlError {
    message: String,
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    path: Vec<serde_json::Value>,
}

impl GqlError {
    fn is_not_found(&self) -> bool {
        self.kind.as_deref() == Some("NOT_FOUND")
    }

    /// Scoped to a single entry of a connection's `nodes`, which GitHub then
    /// reports as null (items from repositories the token cannot read).
    fn is_node_scoped(&self) -> bool {
        self.path.iter().any(|segment| segment.as_str() == Some("nodes"))
    }
}

impl<T> GqlResponse<T> {
    /// Unwraps `data`.
    ///
    /// With `data` present, `NOT_FOUND` errors and errors inside a `nodes`
    /// entry are tolerated: the affected fields arrive as null and the caller
    /// decides what a null means. Without `data`, all-`NOT_FOUND` yields
    /// `Ok(None)`. Anything else fails with the joined messages.
    pub fn into_data(self) -> Result<Option<T>> {
        let has_data = self.data.is_some();
        let fatal = |e: &GqlError| {
            if has_data {
                !(e.is_not_found() || e.is_node_scoped())
            } else {
                !e.is_not_found()
            }
        };
        if self.errors.iter().any(fatal) {
            let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
            bail!("GraphQL request failed: {}", messages.join("; "));
        }
        for error in &self.errors {
            tracing::debug!(
                kind = error.kind.as_deref().unwrap_or("<none>"),
                path = ?error.path,
                message = %error.message,
                "tolerated GraphQL error"
            );
        }
        match self.data {
            Some(data) => Ok(Some(data)),
            None if !self.errors.is_empty() => Ok(None),
            None => bail!("No data in GitHub GraphQL response"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OrganizationData<P> {
    organization: Option<Organization<P>>,
}

#[derive(Debug, Deserialize)]
struct Organization<P> {
    #[serde(rename = "projectV2")]
    project: Option<P>,
}

impl<P> OrganizationData<P> {
    pub fn into_project(self) -> Option<P> {
        self.organization.and_then(|o| o.project)
    }
}

#[derive(Debug, Deserialize)]
pub struct ProjectWithItems {
    items: ItemConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemConnection {
    #[serde(default)]
    nodes: Vec<Option<ItemNode>>,
    page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    end_cursor: Option<String>,
    has_next_page: bool,
}

#[derive(Debug, Deserialize)]
struct ItemNode {
    id: ProjectItemId,
    content: Option<ContentNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentNode {
    #[serde(rename = "__typename")]
    typename: String,
    full_database_id: Option<ContentId>,
}

impl ItemNode {
    /// Draft issues and redacted content have nothing to match against.
    fn into_item(self) -> Option<ProjectItem> {
        let content = self.content?;
        let kind = ContentKind::from_typename(&content.typename)?;
        Some(ProjectItem {
            id: self.id,
            kind,
            content_id: content.full_database_id?,
        })
    }
}

impl From<ProjectWithItems> for ItemsPage {
    fn from(project: ProjectWithItems) -> Self {
        let ItemConnection { nodes, page_info } = project.items;
        ItemsPage {
            items: nodes
                .into_iter()
                .map(|node| node.and_then(ItemNode::into_item))
                .collect(),
            end_cursor: page_info.end_cursor,
            has_next_page: page_info.has_next_page,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProjectIdOnly {
    pub id: ProjectId,
}

#[derive(Debug, Deserialize)]
pub struct DeleteItemData {
    #[serde(rename = "deleteProjectV2Item")]
    delete: Option<DeletedItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeletedItem {
    deleted_item_id: ProjectItemId,
}

impl DeleteItemData {
    pub fn into_deleted(self) -> Option<ProjectItemId> {
        self.delete.map(|d| d.deleted_item_id)
    }
}
