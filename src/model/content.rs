use std::fmt;

use serde::{Deserialize, Deserializer};

/// Discriminates the two kinds of content a project item can wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Issue,
    PullRequest,
}

impl ContentKind {
    /// Maps a GraphQL `__typename`. Draft issues and anything else that is
    /// not a repository issue or pull request yield `None`.
    pub fn from_typename(typename: &str) -> Option<Self> {
        match typename {
            "Issue" => Some(ContentKind::Issue),
            "PullRequest" => Some(ContentKind::PullRequest),
            _ => None,
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Issue => f.write_str("Issue"),
            ContentKind::PullRequest => f.write_str("Pull request"),
        }
    }
}

/// Durable identifier the tracker assigns to an issue or pull request.
///
/// REST hands these out as JSON numbers while GraphQL's `fullDatabaseId`
/// is a string, so the value is normalised to its textual form on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentId(String);

impl ContentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for ContentId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ContentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => ContentId::from(n),
            Raw::Text(s) => ContentId(s),
        })
    }
}

/// An issue or pull request as the caller addresses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReference {
    pub number: u64,
    pub owner: String,
    pub repository: String,
}

impl fmt::Display for ItemReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repository, self.number)
    }
}

/// The tracker's view of an [`ItemReference`]: what it is and its durable id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContent {
    pub id: ContentId,
    pub kind: ContentKind,
}

impl ResolvedContent {
    pub fn matches(&self, kind: ContentKind, id: &ContentId) -> bool {
        self.kind == kind && &self.id == id
    }
}
