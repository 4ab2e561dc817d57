use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use super::graphql::{
    DeleteItemData, GqlResponse, OrganizationData, ProjectIdOnly, ProjectWithItems,
    DELETE_ITEM_MUTATION, ITEMS_PAGE_QUERY, PROJECT_ID_QUERY,
};
use super::{IssueRecord, IssueTracker, ProjectBoard};
use crate::model::content::{ContentId, ItemReference};
use crate::model::project::{ItemsPage, ProjectCoordinate, ProjectId, ProjectItemId};

const DEFAULT_API_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// REST and GraphQL client for github.com or a GitHub Enterprise Server.
pub struct GitHubClient {
    client: reqwest::Client,
    token: String,
    api_url: String,
    graphql_url: String,
}

impl GitHubClient {
    /// Endpoints come from `GITHUB_API_URL` / `GITHUB_GRAPHQL_URL`, which the
    /// Actions runner sets for the host the workflow runs against.
    pub fn from_env(token: String) -> Result<Self> {
        let api_url = std::env::var("GITHUB_API_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let graphql_url = std::env::var("GITHUB_GRAPHQL_URL")
            .ok()
            .filter(|v| !v.is_empty());
        Self::new(token, api_url, graphql_url)
    }

    pub fn new(token: String, api_url: String, graphql_url: Option<String>) -> Result<Self> {
        let api_url = api_url.trim_end_matches('/').to_string();
        let graphql_url = graphql_url.unwrap_or_else(|| format!("{api_url}/graphql"));
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            token,
            api_url,
            graphql_url,
        })
    }

    async fn get_rest<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let url = format!("{}{path}", self.api_url);
        tracing::debug!(%url, "GET");
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .send()
            .await
            .with_context(|| format!("GitHub API request failed: GET {path}"))?;

        let status = resp.status();
        let body = resp.text().await.context("Failed to read GitHub response")?;
        let Some(body) = rest_body(status, body)? else {
            return Ok(None);
        };
        serde_json::from_str(&body)
            .map(Some)
            .with_context(|| format!("Failed to parse GitHub response for GET {path}"))
    }

    async fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<Option<T>> {
        tracing::debug!(url = %self.graphql_url, %variables, "POST graphql");
        let body = json!({ "query": query, "variables": variables });
        let resp = self
            .client
            .post(&self.graphql_url)
            .bearer_auth(&self.token)
            .header("X-GitHub-Api-Version", API_VERSION)
            .json(&body)
            .send()
            .await
            .context("GitHub GraphQL request failed")?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .context("Failed to read GitHub GraphQL response")?;
        ensure_success("GitHub GraphQL error", status, &text)?;
        let gql: GqlResponse<T> =
            serde_json::from_str(&text).context("Failed to parse GitHub GraphQL response")?;
        gql.into_data()
    }
}

#[derive(Deserialize)]
struct RestIssue {
    id: ContentId,
    pull_request: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct RestPullRequest {
    id: ContentId,
}

#[derive(Deserialize)]
struct RestError {
    message: String,
}

/// A REST lookup answered 404 has no such resource: `Ok(None)`. Any other
/// non-2xx status fails with the status code and GitHub's message.
fn rest_body(status: StatusCode, body: String) -> Result<Option<String>> {
    if status == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    ensure_success("GitHub API error", status, &body)?;
    Ok(Some(body))
}

fn ensure_success(label: &str, status: StatusCode, body: &str) -> Result<()> {
    if !status.is_success() {
        bail!("{label} ({}): {}", status.as_u16(), error_message(body));
    }
    Ok(())
}

/// Prefers the `message` of a GitHub error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<RestError>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| body.to_string())
}

#[async_trait]
impl IssueTracker for GitHubClient {
    async fn issue(&self, reference: &ItemReference) -> Result<Option<IssueRecord>> {
        let path = format!(
            "/repos/{}/{}/issues/{}",
            reference.owner, reference.repository, reference.number
        );
        let issue: Option<RestIssue> = self.get_rest(&path).await?;
        Ok(issue.map(|i| IssueRecord {
            id: i.id,
            is_pull_request: i.pull_request.is_some(),
        }))
    }

    async fn pull_request(&self, reference: &ItemReference) -> Result<Option<ContentId>> {
        let path = format!(
            "/repos/{}/{}/pulls/{}",
            reference.owner, reference.repository, reference.number
        );
        let pr: Option<RestPullRequest> = self.get_rest(&path).await?;
        Ok(pr.map(|p| p.id))
    }
}

#[async_trait]
impl ProjectBoard for GitHubClient {
    async fn items_page(
        &self,
        project: &ProjectCoordinate,
        cursor: Option<&str>,
    ) -> Result<Option<ItemsPage>> {
        let data: Option<OrganizationData<ProjectWithItems>> = self
            .graphql(
                ITEMS_PAGE_QUERY,
                json!({ "owner": project.owner, "number": project.number, "cursor": cursor }),
            )
            .await?;
        Ok(data
            .and_then(OrganizationData::into_project)
            .map(ItemsPage::from))
    }

    async fn project_id(&self, project: &ProjectCoordinate) -> Result<Option<ProjectId>> {
        let data: Option<OrganizationData<ProjectIdOnly>> = self
            .graphql(
                PROJECT_ID_QUERY,
                json!({ "owner": project.owner, "number": project.number }),
            )
            .await?;
        Ok(data.and_then(OrganizationData::into_project).map(|p| p.id))
    }

    async fn delete_item(
        &self,
        project: &ProjectId,
        item: &ProjectItemId,
    ) -> Result<Option<ProjectItemId>> {
        let data: Option<DeleteItemData> = self
            .graphql(
                DELETE_ITEM_MUTATION,
                json!({ "projectId": project.as_str(), "itemId": item.as_str() }),
            )
            .await?;
        Ok(data.and_then(DeleteItemData::into_deleted))
    }
}
