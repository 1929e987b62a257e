use nl_core::{Diagnostic, DiagnosticKind, Location};
use nl_parser::{PathReference, CACHE_MARKER, PATH_SIGIL};

use crate::path_index::{final_segment, segment_count, PathIndex};
use crate::tree::NodeId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Exact(NodeId),
    /// Slash-free reference matching the last segment of one or more paths,
    /// in traversal order.
    BareName(Vec<NodeId>),
    Unresolved { suggestion: Option<String> },
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unresolved { .. })
    }
}

pub fn resolve_reference(index: &PathIndex, reference: &str) -> Resolution {
    if let Some(id) = index.get(reference) {
        return Resolution::Exact(id);
    }

    if !reference.contains('/') {
        let matches = index
            .with_final_segment(reference)
            .map(|(_, id)| id)
            .collect::<Vec<_>>();
        if !matches.is_empty() {
            return Resolution::BareName(matches);
        }
    }

    Resolution::Unresolved {
        suggestion: suggest_path(index, reference),
    }
}

/// Shortest canonical path sharing the reference's last segment; failing
/// that, the shortest whose last segment contains or is contained in it.
/// Ties go to the earliest path in traversal order.
pub fn suggest_path(index: &PathIndex, reference: &str) -> Option<String> {
    let target = final_segment(reference);
    if target.is_empty() {
        return None;
    }

    shortest(index.with_final_segment(target).map(|(path, _)| path))
        .or_else(|| {
            let target = target.to_ascii_lowercase();
            shortest(
                index
                    .iter()
                    .map(|(path, _)| path)
                    .filter(|path| {
                        let segment = final_segment(path).to_ascii_lowercase();
                        segment.contains(&target) || target.contains(&segment)
                    }),
            )
        })
        .map(str::to_string)
}

fn shortest<'a>(candidates: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    candidates.min_by_key(|path| segment_count(path))
}

pub fn validate_references(
    index: &PathIndex,
    references: &[PathReference],
    scene_file: &str,
    script_file: &str,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for reference in references {
        let Resolution::Unresolved { suggestion } = resolve_reference(index, &reference.path)
        else {
            continue;
        };

        let declaration = if reference.cached {
            format!("{} var", CACHE_MARKER)
        } else {
            "var".to_string()
        };
        diagnostics.push(
            Diagnostic::new(
                DiagnosticKind::UnresolvedReference,
                Location::line(script_file, reference.line),
                format!(
                    "{} {} references {}{}, which does not exist in {}.",
                    declaration, reference.variable, PATH_SIGIL, reference.path, scene_file
                ),
            )
            .with_suggestion(suggestion),
        );
    }

    diagnostics
}
