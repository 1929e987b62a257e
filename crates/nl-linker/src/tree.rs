use std::collections::HashMap;

use nl_core::DiagnosticKind;
use nl_parser::{NodeRecord, ParentRef, ROOT_SENTINEL};
use thiserror::Error;

use crate::path_index::final_segment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneNode {
    pub name: String,
    pub kind: Option<String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub line: usize,
}

/// Arena-backed scene tree. Node 0 is the root; children keep declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneTree {
    nodes: Vec<SceneNode>,
    script: Option<String>,
}

impl SceneTree {
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = self.node(id).parent;
        while let Some(parent) = current {
            chain.push(parent);
            current = self.node(parent).parent;
        }
        chain
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("Scene declares no nodes, so it has no root.")]
    RootMissing,
    #[error("Root node \"{name}\" must not carry a parent attribute (found parent=\"{parent}\").")]
    RootHasParent {
        name: String,
        parent: String,
        line: usize,
    },
    #[error("Node \"{name}\" names parent \"{parent}\", which is not declared in this scene.")]
    ParentUnresolved {
        name: String,
        parent: String,
        line: usize,
    },
    #[error("Node \"{name}\" names parent \"{parent}\" before that node is declared.")]
    ParentForwardReference {
        name: String,
        parent: String,
        line: usize,
    },
    #[error("Node \"{name}\" names itself as its parent (\"{parent}\").")]
    ParentCycle {
        name: String,
        parent: String,
        line: usize,
    },
    #[error("Node \"{name}\" is declared twice under \"{parent}\".")]
    DuplicateSibling {
        name: String,
        parent: String,
        line: usize,
    },
}

impl StructuralError {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Self::RootMissing => DiagnosticKind::RootMissing,
            Self::RootHasParent { .. } => DiagnosticKind::RootHasParent,
            Self::ParentUnresolved { .. } => DiagnosticKind::ParentUnresolved,
            Self::ParentForwardReference { .. } => DiagnosticKind::ParentForwardReference,
            Self::ParentCycle { .. } => DiagnosticKind::ParentCycle,
            Self::DuplicateSibling { .. } => DiagnosticKind::DuplicateSibling,
        }
    }

    pub fn line(&self) -> Option<usize> {
        match self {
            Self::RootMissing => None,
            Self::RootHasParent { line, .. }
            | Self::ParentUnresolved { line, .. }
            | Self::ParentForwardReference { line, .. }
            | Self::ParentCycle { line, .. }
            | Self::DuplicateSibling { line, .. } => Some(*line),
        }
    }
}

pub fn build_scene_tree(records: &[NodeRecord]) -> Result<SceneTree, StructuralError> {
    let Some((root_record, rest)) = records.split_first() else {
        return Err(StructuralError::RootMissing);
    };

    match &root_record.parent {
        ParentRef::Absent => {}
        ParentRef::Root => {
            return Err(StructuralError::RootHasParent {
                name: root_record.name.clone(),
                parent: ROOT_SENTINEL.to_string(),
                line: root_record.line,
            })
        }
        ParentRef::Node(parent) => {
            return Err(StructuralError::RootHasParent {
                name: root_record.name.clone(),
                parent: parent.clone(),
                line: root_record.line,
            })
        }
    }

    let root = NodeId(0);
    let mut nodes = vec![SceneNode {
        name: root_record.name.clone(),
        kind: root_record.kind.clone(),
        parent: None,
        children: Vec::new(),
        line: root_record.line,
    }];
    // Canonical path per node id; the root has none.
    let mut paths = vec![String::new()];
    let mut by_path: HashMap<String, NodeId> = HashMap::new();
    let mut by_name: HashMap<String, NodeId> = HashMap::new();
    by_name.insert(root_record.name.clone(), root);

    for (offset, record) in rest.iter().enumerate() {
        let parent = match &record.parent {
            ParentRef::Absent | ParentRef::Root => root,
            ParentRef::Node(parent) => {
                resolve_parent(parent, record, &rest[offset + 1..], &by_path, &by_name)?
            }
        };

        if nodes[parent.0]
            .children
            .iter()
            .any(|child| nodes[child.0].name == record.name)
        {
            return Err(StructuralError::DuplicateSibling {
                name: record.name.clone(),
                parent: parent_label(&paths, parent),
                line: record.line,
            });
        }

        let id = NodeId(nodes.len());
        let path = if parent == root {
            record.name.clone()
        } else {
            format!("{}/{}", paths[parent.0], record.name)
        };

        nodes.push(SceneNode {
            name: record.name.clone(),
            kind: record.kind.clone(),
            parent: Some(parent),
            children: Vec::new(),
            line: record.line,
        });
        nodes[parent.0].children.push(id);
        by_path.insert(path.clone(), id);
        by_name.insert(record.name.clone(), id);
        paths.push(path);
    }

    Ok(SceneTree {
        nodes,
        script: root_record.script.clone(),
    })
}

// Godot writes parents as root-relative paths ("Content/Inner"); bare names
// of earlier nodes are accepted too, the latest declaration winning.
fn resolve_parent(
    parent: &str,
    record: &NodeRecord,
    later: &[NodeRecord],
    by_path: &HashMap<String, NodeId>,
    by_name: &HashMap<String, NodeId>,
) -> Result<NodeId, StructuralError> {
    if let Some(id) = by_path.get(parent).or_else(|| by_name.get(parent)) {
        return Ok(*id);
    }

    let target = final_segment(parent);
    if target == record.name {
        return Err(StructuralError::ParentCycle {
            name: record.name.clone(),
            parent: parent.to_string(),
            line: record.line,
        });
    }
    if later.iter().any(|candidate| candidate.name == target) {
        return Err(StructuralError::ParentForwardReference {
            name: record.name.clone(),
            parent: parent.to_string(),
            line: record.line,
        });
    }
    Err(StructuralError::ParentUnresolved {
        name: record.name.clone(),
        parent: parent.to_string(),
        line: record.line,
    })
}

fn parent_label(paths: &[String], parent: NodeId) -> String {
    if parent.0 == 0 {
        ROOT_SENTINEL.to_string()
    } else {
        paths[parent.0].clone()
    }
}

#[cfg(test)]
mod tree_tests {
    use super::*;
    use nl_parser::parse_scene;

    fn build(source: &str) -> Result<SceneTree, StructuralError> {
        build_scene_tree(&parse_scene(source).records)
    }

    fn names(tree: &SceneTree, ids: &[NodeId]) -> Vec<String> {
        ids.iter().map(|id| tree.node(*id).name.clone()).collect()
    }

    #[test]
    fn builds_single_rooted_tree_in_declaration_order() {
        let tree = build(
            r#"[node name="Screen" type="Control"]
[node name="Content" type="VBoxContainer" parent="."]
[node name="Title" type="Label" parent="Content"]
[node name="Body" type="Label" parent="Content"]
[node name="Footer" type="HBoxContainer" parent="."]
"#,
        )
        .expect("tree should build");

        assert_eq!(tree.len(), 5);
        let root = tree.node(tree.root());
        assert_eq!(root.name, "Screen");
        assert_eq!(root.parent, None);
        assert_eq!(names(&tree, &root.children), vec!["Content", "Footer"]);
        let content = root.children[0];
        assert_eq!(
            names(&tree, &tree.node(content).children),
            vec!["Title", "Body"]
        );
        assert_eq!(
            tree.ids()
                .filter(|id| tree.node(*id).parent.is_none())
                .count(),
            1
        );
    }

    #[test]
    fn every_node_reaches_the_root_without_revisiting() {
        let tree = build(
            r#"[node name="R" type="Node"]
[node name="A" type="Node" parent="."]
[node name="B" type="Node" parent="A"]
[node name="C" type="Node" parent="A/B"]
"#,
        )
        .expect("tree should build");

        for id in tree.ids() {
            let ancestors = tree.ancestors(id);
            assert!(!ancestors.contains(&id));
            assert!(ancestors.len() < tree.len());
            if id != tree.root() {
                assert_eq!(ancestors.last(), Some(&tree.root()));
            }
        }
    }

    #[test]
    fn implicit_and_explicit_root_children_build_identically() {
        let implicit = build(
            r#"[node name="Screen" type="Control"]
[node name="Content" type="VBoxContainer"]
[node name="Label" type="Label" parent="Content"]
"#,
        )
        .expect("implicit tree should build");
        let explicit = build(
            r#"[node name="Screen" type="Control"]
[node name="Content" type="VBoxContainer" parent="."]
[node name="Label" type="Label" parent="Content"]
"#,
        )
        .expect("explicit tree should build");

        assert_eq!(implicit, explicit);
    }

    #[test]
    fn godot_parent_paths_resolve() {
        let tree = build(
            r#"[node name="World" type="Node2D"]
[node name="Level" type="Node2D" parent="."]
[node name="Spawns" type="Node2D" parent="Level"]
[node name="Marker" type="Marker2D" parent="Level/Spawns"]
"#,
        )
        .expect("tree should build");
        let marker = tree
            .ids()
            .find(|id| tree.node(*id).name == "Marker")
            .expect("marker node");
        assert_eq!(
            names(&tree, &tree.ancestors(marker)),
            vec!["Spawns", "Level", "World"]
        );
    }

    #[test]
    fn root_with_parent_is_rejected() {
        let error = build(
            r#"[node name="Screen" type="Control" parent="."]
[node name="Content" type="VBoxContainer" parent="."]
"#,
        )
        .expect_err("root parent should fail");
        assert_eq!(error.kind(), DiagnosticKind::RootHasParent);
        assert_eq!(error.line(), Some(1));
    }

    #[test]
    fn empty_scene_has_no_root() {
        let error = build("[gd_scene format=3]\n").expect_err("empty scene should fail");
        assert_eq!(error, StructuralError::RootMissing);
        assert_eq!(error.line(), None);
    }

    #[test]
    fn forward_reference_is_rejected() {
        let error = build(
            r#"[node name="Root" type="Node"]
[node name="Child" type="Node" parent="Later"]
[node name="Later" type="Node" parent="."]
"#,
        )
        .expect_err("forward reference should fail");
        assert_eq!(error.kind(), DiagnosticKind::ParentForwardReference);
        assert_eq!(error.line(), Some(2));
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let error = build(
            r#"[node name="Root" type="Node"]
[node name="Child" type="Node" parent="Ghost"]
"#,
        )
        .expect_err("unknown parent should fail");
        assert_eq!(error.kind(), DiagnosticKind::ParentUnresolved);
        assert!(error.to_string().contains("Ghost"));
    }

    #[test]
    fn self_parent_is_a_cycle() {
        let error = build(
            r#"[node name="Root" type="Node"]
[node name="Loop" type="Node" parent="Loop"]
"#,
        )
        .expect_err("self parent should fail");
        assert_eq!(error.kind(), DiagnosticKind::ParentCycle);
    }

    #[test]
    fn duplicate_siblings_are_rejected_but_cousins_may_share_names() {
        let error = build(
            r#"[node name="Root" type="Node"]
[node name="A" type="Node" parent="."]
[node name="A" type="Node" parent="."]
"#,
        )
        .expect_err("duplicate sibling should fail");
        assert_eq!(error.kind(), DiagnosticKind::DuplicateSibling);
        assert_eq!(error.line(), Some(3));

        let tree = build(
            r#"[node name="Root" type="Node"]
[node name="A" type="Node" parent="."]
[node name="Label" type="Label" parent="A"]
[node name="B" type="Node" parent="."]
[node name="Label" type="Label" parent="B"]
"#,
        )
        .expect("cousins should build");
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn root_script_is_kept_on_the_tree() {
        let tree = build(
            r#"[ext_resource type="Script" path="res://screen.gd" id="1"]
[node name="Screen" type="Control"]
script = ExtResource("1")
"#,
        )
        .expect("tree should build");
        assert_eq!(tree.script(), Some("res://screen.gd"));
    }
}
