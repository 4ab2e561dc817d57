use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::error::{RemoveError, Result};
use crate::model::content::ItemReference;
use crate::model::project::{ProjectCoordinate, ProjectItemId};

/// Yields named action inputs. Blank values are reported as absent.
pub trait InputSource {
    fn get(&self, name: &str) -> Option<String>;
}

/// Reads inputs the way the Actions runner exports them: `INPUT_<NAME>`,
/// upper-cased with spaces replaced by underscores. Hyphens are kept.
pub struct EnvInputs;

impl InputSource for EnvInputs {
    fn get(&self, name: &str) -> Option<String> {
        let key = format!("INPUT_{}", name.replace(' ', "_").to_uppercase());
        std::env::var(key)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// Repository coordinates taken from the triggering event payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmbientContext {
    pub repository: Option<RepositoryContext>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryContext {
    pub owner: String,
    pub name: String,
}

#[derive(Deserialize)]
struct EventPayload {
    repository: Option<EventRepository>,
}

#[derive(Deserialize)]
struct EventRepository {
    name: String,
    owner: EventOwner,
}

#[derive(Deserialize)]
struct EventOwner {
    login: String,
}

impl AmbientContext {
    /// Loads the payload named by `GITHUB_EVENT_PATH`. No variable or no
    /// file means no ambient context; an unreadable payload is an error.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os("GITHUB_EVENT_PATH") {
            Some(path) => Self::from_event_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_event_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "event payload not found");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event payload {}", path.display()))
            .map_err(|e| RemoveError::Configuration(format!("{e:#}")))?;
        let payload: EventPayload = serde_json::from_str(&contents).map_err(|e| {
            RemoveError::Configuration(format!(
                "Failed to parse event payload {}: {e}",
                path.display()
            ))
        })?;
        Ok(Self {
            repository: payload.repository.map(|r| RepositoryContext {
                owner: r.owner.login,
                name: r.name,
            }),
        })
    }

    fn owner(&self) -> Option<String> {
        self.repository.as_ref().map(|r| r.owner.clone())
    }

    fn name(&self) -> Option<String> {
        self.repository.as_ref().map(|r| r.name.clone())
    }
}

/// What the run should remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemTarget {
    /// An issue or pull request that still has to be located on the board.
    Reference(ItemReference),
    /// A project item id the caller already resolved.
    ProjectItem(ProjectItemId),
}

/// Fully validated run configuration.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub token: String,
    pub project: ProjectCoordinate,
    pub target: ItemTarget,
}

impl Inputs {
    /// Each optional value is taken from the explicit input first, then from
    /// the ambient repository, and is a configuration error if both are absent.
    pub fn resolve(source: &dyn InputSource, ambient: &AmbientContext) -> Result<Self> {
        let token = required(source, "token")?;
        let project_number =
            parse_number("project-number", &required(source, "project-number")?)?;
        let project_owner = source
            .get("project-owner")
            .or_else(|| ambient.owner())
            .ok_or_else(|| {
                RemoveError::Configuration(
                    "project-owner must be specified, unable to determine from context".into(),
                )
            })?;

        let target = match (source.get("issue-number"), source.get("item-id")) {
            (Some(_), Some(_)) => {
                return Err(RemoveError::Configuration(
                    "only one of issue-number and item-id may be set".into(),
                ))
            }
            (None, None) => {
                return Err(RemoveError::Configuration(
                    "one of issue-number or item-id must be set".into(),
                ))
            }
            (None, Some(item_id)) => ItemTarget::ProjectItem(ProjectItemId::new(item_id)),
            (Some(raw), None) => {
                let number = parse_number("issue-number", &raw)?;
                let owner = source.get("issue-owner").or_else(|| ambient.owner());
                let repository = source.get("issue-repository").or_else(|| ambient.name());
                let (Some(owner), Some(repository)) = (owner, repository) else {
                    return Err(RemoveError::Configuration(
                        "issue-owner and issue-repository must be set, \
                         unable to determine from context"
                            .into(),
                    ));
                };
                ItemTarget::Reference(ItemReference {
                    number,
                    owner,
                    repository,
                })
            }
        };

        Ok(Self {
            token,
            project: ProjectCoordinate {
                owner: project_owner,
                number: project_number,
            },
            target,
        })
    }
}

fn required(source: &dyn InputSource, name: &str) -> Result<String> {
    source.get(name).ok_or_else(|| {
        RemoveError::Configuration(format!("Input required and not supplied: {name}"))
    })
}

fn parse_number(name: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse()
        .map_err(|_| RemoveError::Configuration(format!("{name} must be a number")))
}
