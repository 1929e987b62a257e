use serde::{Deserialize, Serialize};

use crate::types::{Diagnostic, DiagnosticKind, Severity};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SceneVerdict {
    Valid,
    Invalid { violation: DiagnosticKind },
    Unreadable,
}

impl SceneVerdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Outcome of one scene and its attached script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairReport {
    pub scene: String,
    pub script: Option<String>,
    pub verdict: SceneVerdict,
    pub script_checked: bool,
    pub canonical_paths: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl PairReport {
    pub fn sort_diagnostics(&mut self) {
        self.diagnostics
            .sort_by(|left, right| left.location.cmp(&right.location));
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.severity == severity)
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectReport {
    pub pairs: Vec<PairReport>,
    pub scenes_checked: usize,
    pub scripts_checked: usize,
    pub error_count: usize,
    pub warning_count: usize,
}

impl ProjectReport {
    /// Aggregation boundary: pairs arrive in any order and leave sorted by
    /// scene path, each with diagnostics sorted by file and line.
    pub fn from_pairs(mut pairs: Vec<PairReport>) -> Self {
        pairs.sort_by(|left, right| left.scene.cmp(&right.scene));
        for pair in &mut pairs {
            pair.sort_diagnostics();
        }

        let scenes_checked = pairs.len();
        let scripts_checked = pairs.iter().filter(|pair| pair.script_checked).count();
        let error_count = pairs.iter().map(|pair| pair.count(Severity::Error)).sum();
        let warning_count = pairs.iter().map(|pair| pair.count(Severity::Warning)).sum();

        Self {
            pairs,
            scenes_checked,
            scripts_checked,
            error_count,
            warning_count,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn exit_code(&self) -> i32 {
        if self.has_errors() {
            1
        } else {
            0
        }
    }

    /// All diagnostics across pairs, ordered by file then line.
    pub fn diagnostics(&self) -> Vec<&Diagnostic> {
        let mut all = self
            .pairs
            .iter()
            .flat_map(|pair| pair.diagnostics.iter())
            .collect::<Vec<_>>();
        all.sort_by(|left, right| left.location.cmp(&right.location));
        all
    }
}
