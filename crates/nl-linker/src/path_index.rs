use std::collections::HashMap;

use crate::tree::{NodeId, SceneTree};

/// Canonical path <-> node mapping for every non-root node, kept in
/// depth-first declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathIndex {
    entries: Vec<(String, NodeId)>,
    by_path: HashMap<String, usize>,
    by_node: HashMap<NodeId, usize>,
}

impl PathIndex {
    pub fn build(tree: &SceneTree) -> Self {
        fn walk(tree: &SceneTree, id: NodeId, prefix: &str, index: &mut PathIndex) {
            let name = &tree.node(id).name;
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{}/{}", prefix, name)
            };
            index.push(path.clone(), id);
            for child in &tree.node(id).children {
                walk(tree, *child, &path, index);
            }
        }

        let mut index = Self::default();
        for child in &tree.node(tree.root()).children {
            walk(tree, *child, "", &mut index);
        }
        index
    }

    fn push(&mut self, path: String, id: NodeId) {
        let slot = self.entries.len();
        self.by_path.insert(path.clone(), slot);
        self.by_node.insert(id, slot);
        self.entries.push((path, id));
    }

    pub fn get(&self, path: &str) -> Option<NodeId> {
        self.by_path.get(path).map(|slot| self.entries[*slot].1)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.by_path.contains_key(path)
    }

    pub fn path_of(&self, id: NodeId) -> Option<&str> {
        self.by_node
            .get(&id)
            .map(|slot| self.entries[*slot].0.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, NodeId)> + '_ {
        self.entries.iter().map(|(path, id)| (path.as_str(), *id))
    }

    pub fn paths(&self) -> Vec<String> {
        self.entries.iter().map(|(path, _)| path.clone()).collect()
    }

    /// Entries whose last segment is `segment`, in traversal order.
    pub fn with_final_segment<'a>(
        &'a self,
        segment: &'a str,
    ) -> impl Iterator<Item = (&'a str, NodeId)> + 'a {
        self.iter()
            .filter(move |(path, _)| final_segment(path) == segment)
    }
}

pub fn final_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

pub fn segment_count(path: &str) -> usize {
    path.split('/').count()
}

#[cfg(test)]
mod path_index_tests {
    use super::*;
    use crate::tree::build_scene_tree;
    use nl_parser::parse_scene;

    fn index_for(source: &str) -> (SceneTree, PathIndex) {
        let tree = build_scene_tree(&parse_scene(source).records).expect("tree should build");
        let index = PathIndex::build(&tree);
        (tree, index)
    }

    const SCREEN: &str = r#"[node name="Screen" type="Control"]
[node name="Content" type="VBoxContainer"]
[node name="Label" type="Label" parent="Content"]
"#;

    #[test]
    fn canonical_paths_exclude_the_root() {
        let (tree, index) = index_for(SCREEN);
        assert_eq!(index.paths(), vec!["Content", "Content/Label"]);
        assert!(!index.contains("Screen"));
        assert!(!index.contains("Screen/Content"));
        assert_eq!(index.len(), tree.len() - 1);
        assert_eq!(index.path_of(tree.root()), None);
    }

    #[test]
    fn index_is_a_bijection_over_non_root_nodes() {
        let (tree, index) = index_for(
            r#"[node name="Root" type="Node"]
[node name="A" type="Node" parent="."]
[node name="Label" type="Label" parent="A"]
[node name="B" type="Node" parent="."]
[node name="Label" type="Label" parent="B"]
[node name="Deep" type="Node" parent="B/Label"]
"#,
        );

        assert_eq!(index.len(), tree.len() - 1);
        for id in tree.ids().filter(|id| *id != tree.root()) {
            let path = index.path_of(id).expect("non-root node has a path");
            assert_eq!(index.get(path), Some(id));
        }
    }

    #[test]
    fn traversal_is_depth_first_in_declaration_order() {
        let (_, index) = index_for(
            r#"[node name="Root" type="Node"]
[node name="A" type="Node" parent="."]
[node name="B" type="Node" parent="."]
[node name="A1" type="Node" parent="A"]
[node name="B1" type="Node" parent="B"]
[node name="A2" type="Node" parent="A"]
"#,
        );
        assert_eq!(index.paths(), vec!["A", "A/A1", "A/A2", "B", "B/B1"]);
    }

    #[test]
    fn final_segment_lookup_finds_every_depth() {
        let (_, index) = index_for(
            r#"[node name="Root" type="Node"]
[node name="Label" type="Label" parent="."]
[node name="A" type="Node" parent="."]
[node name="Label" type="Label" parent="A"]
"#,
        );
        let matches = index
            .with_final_segment("Label")
            .map(|(path, _)| path)
            .collect::<Vec<_>>();
        assert_eq!(matches, vec!["Label", "A/Label"]);
    }

    #[test]
    fn root_only_scene_has_empty_index() {
        let (_, index) = index_for("[node name=\"Only\" type=\"Node\"]\n");
        assert!(index.is_empty());
    }

    #[test]
    fn segment_helpers() {
        assert_eq!(final_segment("A/B/C"), "C");
        assert_eq!(final_segment("C"), "C");
        assert_eq!(segment_count("A/B/C"), 3);
        assert_eq!(segment_count("C"), 1);
    }
}
