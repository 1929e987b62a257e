pub mod context;
pub mod path_index;
pub mod pipeline;
pub mod tree;
pub mod validate;

pub use context::{
    normalize_project_path, resolve_script_path, ProjectContext, UnreadableEntry, RESOURCE_SCHEME,
};
pub use path_index::{final_segment, segment_count, PathIndex};
pub use pipeline::{analyze_scene, unreadable_scene, AnalyzedScene, ScriptSource};
pub use tree::{build_scene_tree, NodeId, SceneNode, SceneTree, StructuralError};
pub use validate::{resolve_reference, suggest_path, validate_references, Resolution};
