use std::path::{Path, PathBuf};

pub const RESOURCE_SCHEME: &str = "res://";

/// Explicit per-run context: the project root and the scene files found
/// under it, project-relative with `/` separators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectContext {
    root: PathBuf,
    scene_files: Vec<String>,
    unreadable: Vec<UnreadableEntry>,
}

/// A path under the scenes directory that discovery could not read.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct UnreadableEntry {
    pub path: String,
    pub reason: String,
}

impl ProjectContext {
    pub fn new(root: impl Into<PathBuf>, scene_files: Vec<String>) -> Self {
        let mut scene_files = scene_files
            .into_iter()
            .map(|file| normalize_project_path(&file))
            .collect::<Vec<_>>();
        scene_files.sort();
        scene_files.dedup();
        Self {
            root: root.into(),
            scene_files,
            unreadable: Vec::new(),
        }
    }

    pub fn with_unreadable(mut self, entries: Vec<UnreadableEntry>) -> Self {
        self.unreadable = entries
            .into_iter()
            .map(|entry| UnreadableEntry {
                path: normalize_project_path(&entry.path),
                reason: entry.reason,
            })
            .collect();
        self.unreadable.sort();
        self
    }

    pub fn unreadable(&self) -> &[UnreadableEntry] {
        &self.unreadable
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn scene_files(&self) -> &[String] {
        &self.scene_files
    }

    pub fn absolute(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Maps a script reference found in `scene_file` to a project-relative
    /// path. `res://` paths are rooted at the project; anything else is
    /// taken relative to the scene's directory.
    pub fn resolve_script_path(&self, scene_file: &str, script: &str) -> String {
        resolve_script_path(scene_file, script)
    }
}

pub fn resolve_script_path(scene_file: &str, script: &str) -> String {
    if let Some(stripped) = script.strip_prefix(RESOURCE_SCHEME) {
        return normalize_project_path(stripped);
    }
    if script.starts_with('/') {
        return normalize_project_path(script);
    }

    let scene_dir = match scene_file.rsplit_once('/') {
        Some((dir, _)) => dir,
        None => "",
    };
    normalize_project_path(&format!("{}/{}", scene_dir, script))
}

pub fn normalize_project_path(path: &str) -> String {
    let mut stack: Vec<&str> = Vec::new();
    let unified = path.replace('\\', "/");
    for part in unified.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            stack.pop();
            continue;
        }
        stack.push(part);
    }
    stack.join("/")
}
