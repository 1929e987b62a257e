mod scene;
mod script;

pub use scene::{
    parse_scene, parse_section_header, NodeRecord, ParentRef, ParseIssue, ParsedScene,
    SectionHeader, ROOT_SENTINEL,
};
pub use script::{extract_path_references, PathReference, CACHE_MARKER, PATH_SIGIL};
