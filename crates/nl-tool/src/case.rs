use std::cmp::Ordering;
use std::fmt;

use nl_core::Diagnostic;
use serde::{Deserialize, Serialize};

pub const TESTCASE_SCHEMA_V1: &str = "nl-tool-case.v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub schema_version: String,
    #[serde(default = "default_scenes_dir")]
    pub scenes_dir: String,
    #[serde(default)]
    pub exclude_dirs: Vec<String>,
    #[serde(default)]
    pub expected_diagnostics: Vec<ExpectedDiagnostic>,
}

fn default_scenes_dir() -> String {
    nl_api::DEFAULT_SCENES_DIR.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedDiagnostic {
    pub code: String,
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ExpectedDiagnostic {
    pub fn from_diagnostic(diagnostic: &Diagnostic) -> Self {
        Self {
            code: diagnostic.kind.code().to_string(),
            file: diagnostic.location.file.clone(),
            line: diagnostic.location.line,
            suggestion: diagnostic.suggestion.clone(),
        }
    }

    /// File, then line, then code.
    pub fn sort_order(&self, other: &Self) -> Ordering {
        self.file
            .cmp(&other.file)
            .then(self.line.cmp(&other.line))
            .then(self.code.cmp(&other.code))
    }
}

impl fmt::Display for ExpectedDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.file)?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (suggest ${})", suggestion)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod case_tests {
    use super::*;
    use nl_core::{DiagnosticKind, Location};

    #[test]
    fn testcase_deserialize_applies_defaults() {
        let parsed: TestCase = serde_json::from_str(
            r#"{
  "schemaVersion": "nl-tool-case.v1"
}"#,
        )
        .expect("testcase should deserialize");

        assert_eq!(parsed.schema_version, TESTCASE_SCHEMA_V1);
        assert_eq!(parsed.scenes_dir, "scenes");
        assert!(parsed.exclude_dirs.is_empty());
        assert!(parsed.expected_diagnostics.is_empty());
    }

    #[test]
    fn expected_diagnostic_optional_fields() {
        let parsed: Vec<ExpectedDiagnostic> = serde_json::from_str(
            r#"[
  {"code":"SCRIPT_UNCHECKED","file":"scripts/a.gd"},
  {"code":"UNRESOLVED_REFERENCE","file":"scripts/a.gd","line":4,"suggestion":"Top/Score"}
]"#,
        )
        .expect("diagnostics should deserialize");

        assert_eq!(parsed[0].line, None);
        assert_eq!(parsed[1].suggestion.as_deref(), Some("Top/Score"));
        assert_eq!(
            parsed[1].to_string(),
            "UNRESOLVED_REFERENCE scripts/a.gd:4 (suggest $Top/Score)"
        );
        assert_eq!(parsed[0].sort_order(&parsed[1]), Ordering::Less);
    }

    #[test]
    fn from_diagnostic_keeps_code_location_and_suggestion() {
        let diagnostic = Diagnostic::new(
            DiagnosticKind::UnresolvedReference,
            Location::line("scripts/hud.gd", 4),
            "missing",
        )
        .with_suggestion(Some("Top/ScoreLabel".to_string()));
        assert_eq!(
            ExpectedDiagnostic::from_diagnostic(&diagnostic),
            ExpectedDiagnostic {
                code: "UNRESOLVED_REFERENCE".to_string(),
                file: "scripts/hud.gd".to_string(),
                line: Some(4),
                suggestion: Some("Top/ScoreLabel".to_string()),
            }
        );
    }
}
