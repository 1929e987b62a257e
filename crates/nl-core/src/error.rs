use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct NodeLinkError {
    pub code: String,
    pub message: String,
    pub path: Option<String>,
}

impl NodeLinkError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
        }
    }

    pub fn with_path(
        code: impl Into<String>,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn display_joins_code_and_message() {
        let error = NodeLinkError::new("PROJECT_ROOT_NOT_FOUND", "missing");
        assert_eq!(error.to_string(), "PROJECT_ROOT_NOT_FOUND: missing");
        assert!(error.path.is_none());
    }

    #[test]
    fn with_path_keeps_path() {
        let error = NodeLinkError::with_path("SCENE_READ", "denied", "scenes/a.tscn");
        assert_eq!(error.path.as_deref(), Some("scenes/a.tscn"));
    }
}
