use nl_core::{Diagnostic, DiagnosticKind, Location, PairReport, SceneVerdict};
use nl_parser::{extract_path_references, parse_scene, ParentRef, ParsedScene};
use tracing::debug;

use crate::path_index::PathIndex;
use crate::tree::{build_scene_tree, SceneTree, StructuralError};
use crate::validate::validate_references;

/// Companion script as seen by the caller's file loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptSource {
    Loaded { text: String },
    Missing,
    Unreadable { reason: String },
}

#[derive(Debug, Clone)]
pub struct AnalyzedScene {
    scene: String,
    parsed: ParsedScene,
    outcome: Result<(SceneTree, PathIndex), StructuralError>,
}

/// Parse, build and index one scene file.
pub fn analyze_scene(scene_file: &str, text: &str) -> AnalyzedScene {
    let parsed = parse_scene(text);
    let outcome = build_scene_tree(&parsed.records).map(|tree| {
        let index = PathIndex::build(&tree);
        (tree, index)
    });

    match &outcome {
        Ok((tree, index)) => debug!(
            scene = scene_file,
            nodes = tree.len(),
            paths = index.len(),
            "scene indexed"
        ),
        Err(error) => debug!(scene = scene_file, %error, "scene rejected"),
    }

    AnalyzedScene {
        scene: scene_file.to_string(),
        parsed,
        outcome,
    }
}

impl AnalyzedScene {
    pub fn scene(&self) -> &str {
        &self.scene
    }

    pub fn parsed(&self) -> &ParsedScene {
        &self.parsed
    }

    /// Script asset path attached to the root, as written in the scene.
    pub fn attached_script(&self) -> Option<&str> {
        self.parsed.root_script()
    }

    pub fn tree(&self) -> Option<&SceneTree> {
        self.outcome.as_ref().ok().map(|(tree, _)| tree)
    }

    pub fn index(&self) -> Option<&PathIndex> {
        self.outcome.as_ref().ok().map(|(_, index)| index)
    }

    pub fn structural_error(&self) -> Option<&StructuralError> {
        self.outcome.as_ref().err()
    }

    pub fn verdict(&self) -> SceneVerdict {
        match &self.outcome {
            Ok(_) => SceneVerdict::Valid,
            Err(error) => SceneVerdict::Invalid {
                violation: error.kind(),
            },
        }
    }

    /// Findings about the scene file itself: parse issues, implicit root
    /// children and the structural verdict.
    pub fn scene_diagnostics(&self) -> Vec<Diagnostic> {
        let mut diagnostics = self
            .parsed
            .issues
            .iter()
            .map(|issue| {
                Diagnostic::new(
                    issue.kind,
                    Location::line(&self.scene, issue.line),
                    issue.message.clone(),
                )
            })
            .collect::<Vec<_>>();

        for record in self.parsed.records.iter().skip(1) {
            if record.parent == ParentRef::Absent {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::ImplicitRootChild,
                    Location::line(&self.scene, record.line),
                    format!(
                        "Node \"{}\" has no parent attribute; treating it as a child of the root (write parent=\".\").",
                        record.name
                    ),
                ));
            }
        }

        if let Err(error) = &self.outcome {
            let location = match error.line() {
                Some(line) => Location::line(&self.scene, line),
                None => Location::file(&self.scene),
            };
            diagnostics.push(Diagnostic::new(error.kind(), location, error.to_string()));
        }

        diagnostics
    }

    /// Reconcile the scene with its companion script. `script` carries the
    /// project-relative script path and what the loader found there.
    pub fn link(&self, script: Option<(&str, &ScriptSource)>) -> PairReport {
        let mut diagnostics = self.scene_diagnostics();
        let mut script_checked = false;
        let root_location = match self.parsed.records.first() {
            Some(root) => Location::line(&self.scene, root.line),
            None => Location::file(&self.scene),
        };

        if let Some((script_file, source)) = script {
            match (&self.outcome, source) {
                (Err(_), _) => diagnostics.push(Diagnostic::new(
                    DiagnosticKind::ScriptUnchecked,
                    Location::file(script_file),
                    format!(
                        "Script not checked: scene {} is structurally invalid.",
                        self.scene
                    ),
                )),
                (Ok(_), ScriptSource::Missing) => diagnostics.push(Diagnostic::new(
                    DiagnosticKind::ScriptMissing,
                    root_location,
                    format!("Attached script {} does not exist.", script_file),
                )),
                (Ok(_), ScriptSource::Unreadable { reason }) => {
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::ScriptUnreadable,
                        root_location,
                        format!("Attached script {} could not be read: {}", script_file, reason),
                    ))
                }
                (Ok((_, index)), ScriptSource::Loaded { text }) => {
                    let references = extract_path_references(text);
                    let unresolved =
                        validate_references(index, &references, &self.scene, script_file);
                    debug!(
                        scene = %self.scene,
                        script = script_file,
                        references = references.len(),
                        unresolved = unresolved.len(),
                        "script linked"
                    );
                    diagnostics.extend(unresolved);
                    script_checked = true;
                }
            }
        }

        let mut report = PairReport {
            scene: self.scene.clone(),
            script: script.map(|(script_file, _)| script_file.to_string()),
            verdict: self.verdict(),
            script_checked,
            canonical_paths: self.index().map(PathIndex::paths).unwrap_or_default(),
            diagnostics,
        };
        report.sort_diagnostics();
        report
    }
}

/// Report for a scene file that could not be read at all.
pub fn unreadable_scene(scene_file: &str, reason: &str) -> PairReport {
    PairReport {
        scene: scene_file.to_string(),
        script: None,
        verdict: SceneVerdict::Unreadable,
        script_checked: false,
        canonical_paths: Vec::new(),
        diagnostics: vec![Diagnostic::new(
            DiagnosticKind::SceneUnreadable,
            Location::file(scene_file),
            format!("Scene could not be read: {}", reason),
        )],
    }
}
