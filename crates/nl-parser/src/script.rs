use std::sync::OnceLock;

use regex::Regex;

pub const PATH_SIGIL: char = '$';
pub const CACHE_MARKER: &str = "@onready";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathReference {
    pub line: usize,
    pub variable: String,
    pub path: String,
    /// Whether the declaration carried the `@onready` marker.
    pub cached: bool,
}

pub fn extract_path_references(source: &str) -> Vec<PathReference> {
    let mut references = Vec::new();
    let mut marker_pending = false;

    for (index, raw_line) in source.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line == CACHE_MARKER {
            marker_pending = true;
            continue;
        }

        if let Some(caps) = binding_regex().captures(line) {
            references.push(PathReference {
                line: index + 1,
                variable: caps["var"].to_string(),
                path: caps["path"].to_string(),
                cached: marker_pending || caps.name("marker").is_some(),
            });
        }
        marker_pending = false;
    }

    references
}

// `[@onready] var name [: Type[Elem]] = $Path/To/Node` and `var name := $Path`.
fn binding_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(
            r"^(?P<marker>@onready\s+)?var\s+(?P<var>[A-Za-z_]\w*)\s*(?::\s*(?:[A-Za-z_][\w.]*(?:\[[\w.]+\])?)?\s*)?=\s*\$(?P<path>\w+(?:/\w+)*)",
        )
        .expect("path binding regex")
    })
}
