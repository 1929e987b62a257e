use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use nl_core::NodeLinkError;
use nl_linker::{ProjectContext, UnreadableEntry};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

pub const SCENE_EXTENSION: &str = "tscn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRead {
    Text(String),
    Missing,
    Unreadable(String),
}

pub fn read_source(path: &Path) -> SourceRead {
    match fs::read_to_string(path) {
        Ok(text) => SourceRead::Text(text),
        Err(error) if error.kind() == ErrorKind::NotFound => SourceRead::Missing,
        Err(error) => SourceRead::Unreadable(error.to_string()),
    }
}

/// Collects every `*.tscn` under `<project_root>/<scenes_dir>`, skipping
/// directories whose name is listed in `exclude_dirs`. Entries the walk
/// cannot read are kept on the context as unreadable.
pub fn discover_project(
    project_root: &Path,
    scenes_dir: &str,
    exclude_dirs: &[String],
) -> Result<ProjectContext, NodeLinkError> {
    if !project_root.exists() {
        return Err(NodeLinkError::with_path(
            "PROJECT_ROOT_NOT_FOUND",
            format!("project root does not exist: {}", project_root.display()),
            project_root.display().to_string(),
        ));
    }
    if !project_root.is_dir() {
        return Err(NodeLinkError::with_path(
            "PROJECT_ROOT_NOT_DIR",
            format!("project root is not a directory: {}", project_root.display()),
            project_root.display().to_string(),
        ));
    }

    let scenes_root = project_root.join(scenes_dir);
    if !scenes_root.is_dir() {
        warn!(scenes_dir = %scenes_root.display(), "scenes directory not found");
        return Ok(ProjectContext::new(project_root, Vec::new()));
    }

    let mut scene_files = Vec::new();
    let mut unreadable = Vec::new();
    for entry in WalkDir::new(&scenes_root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !is_excluded(entry, exclude_dirs))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                let path = error
                    .path()
                    .and_then(|path| path.strip_prefix(project_root).ok())
                    .map(|path| path.to_string_lossy().replace('\\', "/"))
                    .unwrap_or_else(|| scenes_dir.to_string());
                warn!(path = %path, error = %error, "scene directory entry unreadable");
                unreadable.push(UnreadableEntry {
                    path,
                    reason: error.to_string(),
                });
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(SCENE_EXTENSION) {
            continue;
        }

        let relative = path
            .strip_prefix(project_root)
            .map_err(|error| {
                NodeLinkError::with_path(
                    "SOURCE_SCAN",
                    error.to_string(),
                    path.display().to_string(),
                )
            })?
            .to_string_lossy()
            .replace('\\', "/");
        debug!(scene = %relative, "scene discovered");
        scene_files.push(relative);
    }

    Ok(ProjectContext::new(project_root, scene_files).with_unreadable(unreadable))
}

fn is_excluded(entry: &DirEntry, exclude_dirs: &[String]) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| exclude_dirs.iter().any(|excluded| excluded == name))
}
