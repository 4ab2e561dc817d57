use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;

use super::{IssueRecord, IssueTracker, ProjectBoard};
use crate::model::content::{ContentId, ContentKind, ItemReference};
use crate::model::project::{ItemsPage, ProjectCoordinate, ProjectId, ProjectItem, ProjectItemId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerCall {
    Issue(u64),
    PullRequest(u64),
}

/// Tracker double keyed by item number; records every lookup.
#[derive(Default)]
pub struct MockTracker {
    issues: HashMap<u64, IssueRecord>,
    pulls: HashMap<u64, ContentId>,
    pub calls: Arc<Mutex<Vec<TrackerCall>>>,
    should_fail: bool,
}

impl MockTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_issue(mut self, number: u64, id: impl Into<String>) -> Self {
        self.issues.insert(
            number,
            IssueRecord {
                id: ContentId::new(id),
                is_pull_request: false,
            },
        );
        self
    }

    /// The issues endpoint and the pulls endpoint report different ids.
    pub fn with_pull_request(
        mut self,
        number: u64,
        issue_id: impl Into<String>,
        pr_id: impl Into<String>,
    ) -> Self {
        self.issues.insert(
            number,
            IssueRecord {
                id: ContentId::new(issue_id),
                is_pull_request: true,
            },
        );
        self.pulls.insert(number, ContentId::new(pr_id));
        self
    }

    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    pub fn calls(&self) -> Vec<TrackerCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IssueTracker for MockTracker {
    async fn issue(&self, reference: &ItemReference) -> Result<Option<IssueRecord>> {
        self.calls
            .lock()
            .unwrap()
            .push(TrackerCall::Issue(reference.number));
        if self.should_fail {
            anyhow::bail!("Bad credentials");
        }
        Ok(self.issues.get(&reference.number).cloned())
    }

    async fn pull_request(&self, reference: &ItemReference) -> Result<Option<ContentId>> {
        self.calls
            .lock()
            .unwrap()
            .push(TrackerCall::PullRequest(reference.number));
        Ok(self.pulls.get(&reference.number).cloned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardCall {
    ItemsPage(Option<String>),
    ProjectId(u64),
    Delete(ProjectId, ProjectItemId),
}

/// Board double serving a fixed list of pages. Page `n` is returned for
/// cursor `"c{n}"` (page 0 for no cursor), and deletions mutate the pages.
pub struct MockBoard {
    pages: Mutex<Vec<ItemsPage>>,
    project_id: Option<ProjectId>,
    pub calls: Arc<Mutex<Vec<BoardCall>>>,
    fail_delete: bool,
}

impl MockBoard {
    pub fn new(project_id: &str, mut pages: Vec<Vec<Option<ProjectItem>>>) -> Self {
        if pages.is_empty() {
            pages.push(Vec::new());
        }
        let count = pages.len();
        let pages = pages
            .into_iter()
            .enumerate()
            .map(|(n, items)| ItemsPage {
                items,
                end_cursor: Some(format!("c{}", n + 1)),
                has_next_page: n + 1 < count,
            })
            .collect();
        Self {
            pages: Mutex::new(pages),
            project_id: Some(ProjectId::new(project_id)),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_delete: false,
        }
    }

    /// The owner has no project at the requested number.
    pub fn missing() -> Self {
        Self {
            pages: Mutex::new(Vec::new()),
            project_id: None,
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_delete: false,
        }
    }

    pub fn with_delete_failure(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    pub fn calls(&self) -> Vec<BoardCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn page_requests(&self) -> Vec<Option<String>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                BoardCall::ItemsPage(cursor) => Some(cursor),
                _ => None,
            })
            .collect()
    }

    pub fn deletions(&self) -> Vec<(ProjectId, ProjectItemId)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                BoardCall::Delete(p, i) => Some((p, i)),
                _ => None,
            })
            .collect()
    }
}

pub fn item(id: &str, kind: ContentKind, content_id: &str) -> Option<ProjectItem> {
    Some(ProjectItem {
        id: ProjectItemId::new(id),
        kind,
        content_id: ContentId::new(content_id),
    })
}

#[async_trait]
impl ProjectBoard for MockBoard {
    async fn items_page(
        &self,
        _project: &ProjectCoordinate,
        cursor: Option<&str>,
    ) -> Result<Option<ItemsPage>> {
        self.calls
            .lock()
            .unwrap()
            .push(BoardCall::ItemsPage(cursor.map(String::from)));
        if self.project_id.is_none() {
            return Ok(None);
        }
        let index = match cursor {
            None => 0,
            Some(c) => c.trim_start_matches('c').parse::<usize>()?,
        };
        let pages = self.pages.lock().unwrap();
        match pages.get(index) {
            Some(page) => Ok(Some(page.clone())),
            None => anyhow::bail!("cursor {cursor:?} is past the last page"),
        }
    }

    async fn project_id(&self, project: &ProjectCoordinate) -> Result<Option<ProjectId>> {
        self.calls
            .lock()
            .unwrap()
            .push(BoardCall::ProjectId(project.number));
        Ok(self.project_id.clone())
    }

    async fn delete_item(
        &self,
        project: &ProjectId,
        item: &ProjectItemId,
    ) -> Result<Option<ProjectItemId>> {
        self.calls
            .lock()
            .unwrap()
            .push(BoardCall::Delete(project.clone(), item.clone()));
        if self.fail_delete {
            anyhow::bail!("Resource not accessible by integration");
        }
        let mut pages = self.pages.lock().unwrap();
        let mut removed = false;
        for page in pages.iter_mut() {
            for entry in page.items.iter_mut() {
                if entry.as_ref().is_some_and(|e| &e.id == item) {
                    *entry = None;
                    removed = true;
                }
            }
        }
        Ok(removed.then(|| item.clone()))
    }
}
