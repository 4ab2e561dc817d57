use crate::config::{Inputs, ItemTarget};
use crate::error::{RemoveError, Result};
use crate::model::content::{ContentKind, ItemReference, ResolvedContent};
use crate::model::project::{ProjectCoordinate, ProjectId, ProjectItem, ProjectItemId};
use crate::providers::{IssueTracker, ProjectBoard};
use crate::status::StatusSink;

/// How a run that did not fail ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Removed(ProjectItemId),
    /// The item is not on the board; nothing was changed.
    AbsentFromBoard,
}

/// Removes the configured target from the configured project.
///
/// Every request is awaited before the next one is issued. A target that is
/// not on the board ends the run successfully without a mutation.
pub async fn run(
    inputs: &Inputs,
    tracker: &dyn IssueTracker,
    board: &dyn ProjectBoard,
    status: &dyn StatusSink,
) -> Result<Outcome> {
    let item_id = match &inputs.target {
        ItemTarget::ProjectItem(id) => id.clone(),
        ItemTarget::Reference(reference) => {
            let content = resolve_content(tracker, reference, status).await?;
            match locate_item(board, &inputs.project, &content, status).await? {
                Some(item) => {
                    status.info(&format!("Removing {} from the project", item.content_id));
                    item.id
                }
                None => {
                    status.info("Item not found in project");
                    return Ok(Outcome::AbsentFromBoard);
                }
            }
        }
    };

    let project_id = resolve_project_id(board, &inputs.project).await?;
    remove_item(board, &project_id, &item_id, status).await
}

/// Turns an issue or pull request number into the tracker's durable id.
///
/// The issues endpoint also answers for pull requests, but the id it reports
/// is the issue's, so pull requests are looked up again on the pulls endpoint.
pub async fn resolve_content(
    tracker: &dyn IssueTracker,
    reference: &ItemReference,
    status: &dyn StatusSink,
) -> Result<ResolvedContent> {
    let not_found = || RemoveError::NotFound(format!("Issue {reference} not found"));

    let issue = tracker.issue(reference).await?.ok_or_else(not_found)?;
    let content = if issue.is_pull_request {
        let id = tracker.pull_request(reference).await?.ok_or_else(|| {
            RemoveError::NotFound(format!("Pull request {reference} not found"))
        })?;
        ResolvedContent {
            id,
            kind: ContentKind::PullRequest,
        }
    } else {
        ResolvedContent {
            id: issue.id,
            kind: ContentKind::Issue,
        }
    };

    status.info(&format!("{} database ID: {}", content.kind, content.id));
    Ok(content)
}

/// Pages through the project's items, 100 at a time, until an entry wraps
/// `target`. Stops at the first match. `Ok(None)` when no page has one.
pub async fn locate_item(
    board: &dyn ProjectBoard,
    project: &ProjectCoordinate,
    target: &ResolvedContent,
    status: &dyn StatusSink,
) -> Result<Option<ProjectItem>> {
    let mut cursor: Option<String> = None;
    loop {
        let page = board
            .items_page(project, cursor.as_deref())
            .await?
            .ok_or_else(|| RemoveError::NotFound(format!("Project {project} not found")))?;
        tracing::debug!(
            cursor = cursor.as_deref().unwrap_or("<start>"),
            entries = page.items.len(),
            has_next_page = page.has_next_page,
            "fetched project items page"
        );

        // Entries the token cannot see come back as None.
        let found = page
            .items
            .into_iter()
            .flatten()
            .find(|item| target.matches(item.kind, &item.content_id));
        if let Some(item) = found {
            status.info(&format!("Item found: {}", item.content_id));
            return Ok(Some(item));
        }

        if !page.has_next_page {
            return Ok(None);
        }
        cursor = match page.end_cursor {
            Some(next) => Some(next),
            None => {
                return Err(anyhow::anyhow!(
                    "Project {project} reported another page without an end cursor"
                )
                .into())
            }
        };
    }
}

/// Looks up the opaque node id the removal mutation needs. The project
/// number is only meaningful within its owner and is never a valid id.
pub async fn resolve_project_id(
    board: &dyn ProjectBoard,
    project: &ProjectCoordinate,
) -> Result<ProjectId> {
    let id = board
        .project_id(project)
        .await?
        .ok_or_else(|| RemoveError::NotFound(format!("Project {project} not found")))?;
    tracing::debug!(%project, project_id = %id, "resolved project id");
    Ok(id)
}

pub async fn remove_item(
    board: &dyn ProjectBoard,
    project_id: &ProjectId,
    item_id: &ProjectItemId,
    status: &dyn StatusSink,
) -> Result<Outcome> {
    match board.delete_item(project_id, item_id).await? {
        Some(deleted) => {
            status.info("🚀 Card removed from project 🚀");
            Ok(Outcome::Removed(deleted))
        }
        None => {
            status.info(&format!("Item {item_id} is not on the project"));
            Ok(Outcome::AbsentFromBoard)
        }
    }
}
