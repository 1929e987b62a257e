use crossterm::style::{Color, Stylize};
use nl_api::AnalyzedScene;
use nl_core::{Diagnostic, PairReport, ProjectReport, SceneVerdict, Severity};
use serde::Serialize;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Palette {
    enabled: bool,
}

impl Palette {
    pub(crate) fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.enabled {
            text.with(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn strong(&self, text: &str, color: Color) -> String {
        if self.enabled {
            text.with(color).bold().to_string()
        } else {
            text.to_string()
        }
    }
}

pub(crate) fn render_project_text(report: &ProjectReport, palette: Palette) -> Vec<String> {
    let mut lines = Vec::new();
    for pair in &report.pairs {
        lines.push(pair_header(pair, palette));
        for diagnostic in &pair.diagnostics {
            lines.extend(render_diagnostic(diagnostic, palette));
        }
    }

    if !report.pairs.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Checked {} scene(s), {} with scripts: {} error(s), {} warning(s)",
        report.scenes_checked, report.scripts_checked, report.error_count, report.warning_count
    ));
    lines.push(if report.has_errors() {
        "RESULT:FAIL".to_string()
    } else {
        "RESULT:OK".to_string()
    });
    lines
}

fn pair_header(pair: &PairReport, palette: Palette) -> String {
    let target = match &pair.script {
        Some(script) => format!("{} -> {}", pair.scene, script),
        None => pair.scene.clone(),
    };
    let status = match &pair.verdict {
        SceneVerdict::Valid if pair.script.is_some() && !pair.script_checked => {
            palette.paint("valid, script unchecked", Color::Yellow)
        }
        SceneVerdict::Valid => palette.paint("valid", Color::Green),
        SceneVerdict::Invalid { violation } => {
            palette.paint(&format!("invalid: {}", violation), Color::Red)
        }
        SceneVerdict::Unreadable => palette.paint("unreadable", Color::Yellow),
    };
    format!("{} [{}]", palette.strong(&target, Color::Cyan), status)
}

fn render_diagnostic(diagnostic: &Diagnostic, palette: Palette) -> Vec<String> {
    let label = format!("{}[{}]", diagnostic.severity.as_str(), diagnostic.kind);
    let label = match diagnostic.severity {
        Severity::Error => palette.strong(&label, Color::Red),
        Severity::Warning => palette.strong(&label, Color::Yellow),
    };
    let mut lines = vec![format!(
        "  {} {}: {}",
        label, diagnostic.location, diagnostic.message
    )];
    if let Some(suggestion) = &diagnostic.suggestion {
        lines.push(format!(
            "    {} did you mean ${}?",
            palette.paint("help:", Color::Green),
            suggestion
        ));
    }
    lines
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SceneIndexView<'a> {
    pub(crate) scene: &'a str,
    pub(crate) attached_script: Option<&'a str>,
    pub(crate) verdict: SceneVerdict,
    pub(crate) canonical_paths: Vec<String>,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl<'a> SceneIndexView<'a> {
    pub(crate) fn from_analyzed(analyzed: &'a AnalyzedScene) -> Self {
        Self {
            scene: analyzed.scene(),
            attached_script: analyzed.attached_script(),
            verdict: analyzed.verdict(),
            canonical_paths: analyzed
                .index()
                .map(|index| index.paths())
                .unwrap_or_default(),
            diagnostics: analyzed.scene_diagnostics(),
        }
    }
}

pub(crate) fn render_index_text(view: &SceneIndexView<'_>, palette: Palette) -> Vec<String> {
    let status = match &view.verdict {
        SceneVerdict::Valid => palette.paint("valid", Color::Green),
        SceneVerdict::Invalid { violation } => {
            palette.paint(&format!("invalid: {}", violation), Color::Red)
        }
        SceneVerdict::Unreadable => palette.paint("unreadable", Color::Yellow),
    };
    let mut lines = vec![format!(
        "{} [{}]",
        palette.strong(view.scene, Color::Cyan),
        status
    )];
    if let Some(script) = view.attached_script {
        lines.push(format!("script: {}", script));
    }
    for diagnostic in &view.diagnostics {
        lines.extend(render_diagnostic(diagnostic, palette));
    }
    lines.extend(view.canonical_paths.iter().map(|path| format!("${}", path)));
    lines.push(if view.verdict.is_valid() {
        "RESULT:OK".to_string()
    } else {
        "RESULT:FAIL".to_string()
    });
    lines
}
