mod source;

pub use nl_linker::{analyze_scene, AnalyzedScene, PathIndex, ProjectContext, UnreadableEntry};
pub use source::{discover_project, read_source, SourceRead, SCENE_EXTENSION};

use std::path::PathBuf;

use nl_core::{NodeLinkError, PairReport, ProjectReport};
use nl_linker::{unreadable_scene, ScriptSource};
use rayon::prelude::*;
use tracing::{info, warn};

pub const DEFAULT_SCENES_DIR: &str = "scenes";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckProjectOptions {
    pub project_root: PathBuf,
    pub scenes_dir: String,
    pub exclude_dirs: Vec<String>,
    pub jobs: Option<usize>,
}

impl CheckProjectOptions {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            scenes_dir: DEFAULT_SCENES_DIR.to_string(),
            exclude_dirs: Vec::new(),
            jobs: None,
        }
    }
}

pub fn check_project(options: &CheckProjectOptions) -> Result<ProjectReport, NodeLinkError> {
    let context = discover_project(
        &options.project_root,
        &options.scenes_dir,
        &options.exclude_dirs,
    )?;
    check_context(&context, options.jobs)
}

/// Checks every scene in `context` independently, in parallel, and merges
/// the results at a single aggregation point.
pub fn check_context(
    context: &ProjectContext,
    jobs: Option<usize>,
) -> Result<ProjectReport, NodeLinkError> {
    let run = || {
        context
            .scene_files()
            .par_iter()
            .map(|scene_file| check_scene_file(context, scene_file))
            .collect::<Vec<_>>()
    };

    let mut pairs = match jobs {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|error| NodeLinkError::new("THREAD_POOL", error.to_string()))?
            .install(run),
        None => run(),
    };
    pairs.extend(
        context
            .unreadable()
            .iter()
            .map(|entry| unreadable_scene(&entry.path, &entry.reason)),
    );

    let report = ProjectReport::from_pairs(pairs);
    info!(
        scenes = report.scenes_checked,
        scripts = report.scripts_checked,
        errors = report.error_count,
        warnings = report.warning_count,
        "project checked"
    );
    Ok(report)
}

pub fn check_scene_file(context: &ProjectContext, scene_file: &str) -> PairReport {
    let text = match read_source(&context.absolute(scene_file)) {
        SourceRead::Text(text) => text,
        SourceRead::Missing => return unreadable_scene(scene_file, "file not found"),
        SourceRead::Unreadable(reason) => return unreadable_scene(scene_file, &reason),
    };

    let analyzed = analyze_scene(scene_file, &text);
    let Some(script_file) = analyzed
        .attached_script()
        .map(|script| context.resolve_script_path(scene_file, script))
    else {
        return analyzed.link(None);
    };

    let source = match read_source(&context.absolute(&script_file)) {
        SourceRead::Text(text) => ScriptSource::Loaded { text },
        SourceRead::Missing => {
            warn!(scene = scene_file, script = %script_file, "attached script not found");
            ScriptSource::Missing
        }
        SourceRead::Unreadable(reason) => {
            warn!(scene = scene_file, script = %script_file, %reason, "attached script unreadable");
            ScriptSource::Unreadable { reason }
        }
    };
    analyzed.link(Some((&script_file, &source)))
}

/// Checks one scene/script pair held in memory, e.g. staged file contents.
pub fn check_scene_source(
    scene_file: &str,
    scene_text: &str,
    script: Option<(&str, &str)>,
) -> PairReport {
    let analyzed = analyze_scene(scene_file, scene_text);
    match script {
        Some((script_file, script_text)) => {
            let source = ScriptSource::Loaded {
                text: script_text.to_string(),
            };
            analyzed.link(Some((script_file, &source)))
        }
        None => analyzed.link(None),
    }
}

/// Parses, builds and indexes one project-relative scene file.
pub fn index_scene(
    context: &ProjectContext,
    scene_file: &str,
) -> Result<AnalyzedScene, NodeLinkError> {
    match read_source(&context.absolute(scene_file)) {
        SourceRead::Text(text) => Ok(analyze_scene(scene_file, &text)),
        SourceRead::Missing => Err(NodeLinkError::with_path(
            "SCENE_NOT_FOUND",
            format!("scene file does not exist: {}", scene_file),
            scene_file,
        )),
        SourceRead::Unreadable(reason) => Err(NodeLinkError::with_path(
            "SCENE_READ",
            reason,
            scene_file,
        )),
    }
}

#[cfg(test)]
mod api_test_support {
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::time::{SystemTime, UNIX_EPOCH};

    pub(crate) fn temp_dir(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time should move forward")
            .as_nanos();
        std::env::temp_dir().join(format!("nodelink-api-{}-{}", name, nanos))
    }

    pub(crate) fn write_file(path: &Path, content: &str) {
        let parent = path.parent().expect("path should have parent");
        fs::create_dir_all(parent).expect("parent dir should be created");
        fs::write(path, content).expect("file should be written");
    }
}
