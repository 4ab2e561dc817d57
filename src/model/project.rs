use std::fmt;

use serde::Deserialize;

use super::content::{ContentId, ContentKind};

/// A project board as the caller addresses it: owner login plus the
/// per-owner project number shown in the board URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectCoordinate {
    pub owner: String,
    pub number: u64,
}

impl fmt::Display for ProjectCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/projects/{}", self.owner, self.number)
    }
}

/// Opaque global node id of a project (`PVT_...`). Mutations only accept
/// this, never the project number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque node id of an entry in a project's item collection (`PVTI_...`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ProjectItemId(String);

impl ProjectItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectItem {
    pub id: ProjectItemId,
    pub kind: ContentKind,
    pub content_id: ContentId,
}

/// One page of a project's item collection. Entries hidden from the
/// caller's token arrive as `None`.
#[derive(Debug, Clone, Default)]
pub struct ItemsPage {
    pub items: Vec<Option<ProjectItem>>,
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
}
