use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

/// Every finding the engine can produce. The severity of a kind is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticKind {
    RootMissing,
    RootHasParent,
    ParentUnresolved,
    ParentForwardReference,
    ParentCycle,
    DuplicateSibling,
    UnresolvedReference,
    MalformedDeclaration,
    ImplicitRootChild,
    ScriptResourceUnresolved,
    ScriptMissing,
    ScriptUnreadable,
    ScriptUnchecked,
    SceneUnreadable,
}

impl DiagnosticKind {
    pub fn severity(&self) -> Severity {
        match self {
            Self::RootMissing
            | Self::RootHasParent
            | Self::ParentUnresolved
            | Self::ParentForwardReference
            | Self::ParentCycle
            | Self::DuplicateSibling
            | Self::UnresolvedReference => Severity::Error,
            Self::MalformedDeclaration
            | Self::ImplicitRootChild
            | Self::ScriptResourceUnresolved
            | Self::ScriptMissing
            | Self::ScriptUnreadable
            | Self::ScriptUnchecked
            | Self::SceneUnreadable => Severity::Warning,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::RootMissing => "ROOT_MISSING",
            Self::RootHasParent => "ROOT_HAS_PARENT",
            Self::ParentUnresolved => "PARENT_UNRESOLVED",
            Self::ParentForwardReference => "PARENT_FORWARD_REFERENCE",
            Self::ParentCycle => "PARENT_CYCLE",
            Self::DuplicateSibling => "DUPLICATE_SIBLING",
            Self::UnresolvedReference => "UNRESOLVED_REFERENCE",
            Self::MalformedDeclaration => "MALFORMED_DECLARATION",
            Self::ImplicitRootChild => "IMPLICIT_ROOT_CHILD",
            Self::ScriptResourceUnresolved => "SCRIPT_RESOURCE_UNRESOLVED",
            Self::ScriptMissing => "SCRIPT_MISSING",
            Self::ScriptUnreadable => "SCRIPT_UNREADABLE",
            Self::ScriptUnchecked => "SCRIPT_UNCHECKED",
            Self::SceneUnreadable => "SCENE_UNREADABLE",
        }
    }

    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::RootMissing
                | Self::RootHasParent
                | Self::ParentUnresolved
                | Self::ParentForwardReference
                | Self::ParentCycle
                | Self::DuplicateSibling
        )
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Project-relative file plus an optional 1-based line.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl Location {
    pub fn file(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line: None,
        }
    }

    pub fn line(file: impl Into<String>, line: usize) -> Self {
        Self {
            file: file.into(),
            line: Some(line),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}", self.file, line),
            None => f.write_str(&self.file),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub location: Location,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, location: Location, message: impl Into<String>) -> Self {
        Self {
            severity: kind.severity(),
            kind,
            location,
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: Option<String>) -> Self {
        self.suggestion = suggestion;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
