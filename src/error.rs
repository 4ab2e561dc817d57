use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoveError {
    /// A required input is missing or malformed. Raised before any request.
    #[error("{0}")]
    Configuration(String),
    /// The tracker or board has nothing at the address the caller gave.
    #[error("{0}")]
    NotFound(String),
    /// Transport or API failure from GitHub, passed through unchanged.
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

pub type Result<T, E = RemoveError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_keeps_underlying_message() {
        let err: RemoveError = anyhow::anyhow!("Bad credentials").into();
        assert_eq!(err.to_string(), "Bad credentials");
    }

    #[test]
    fn configuration_message_is_verbatim() {
        let err = RemoveError::Configuration("issue-number must be a number".into());
        assert_eq!(err.to_string(), "issue-number must be a number");
    }
}
