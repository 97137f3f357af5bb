use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::issues::VersionIssue;
use depgraph_constants::{
    DEFAULT_INCLUDE_DEV, DEFAULT_INCLUDE_PEER, DEFAULT_MAX_DEPTH, DEPTH_LIMIT_VERSION,
    UNKNOWN_VERSION,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveOptions {
    pub include_dev: bool,
    pub include_peer: bool,
    pub max_depth: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            include_dev: DEFAULT_INCLUDE_DEV,
            include_peer: DEFAULT_INCLUDE_PEER,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// One occurrence of a dependency in the resolved tree. The same package can
/// appear many times at different positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyNode {
    pub name: String,
    pub node_id: String,
    pub declared_range: String,
    pub resolved_version: Option<String>,
    pub latest_version: Option<String>,
    pub range_description: String,
    pub issues: Vec<VersionIssue>,
    pub children: Vec<DependencyNode>,
    pub edges: Vec<DependencyEdge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyEdge {
    pub from: String,
    pub to: String,
    pub from_label: String,
    pub to_label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyGraphResult {
    pub tree: Vec<DependencyNode>,
    pub edges: Vec<DependencyEdge>,
    pub duplicates: IndexMap<String, Vec<VersionIssue>>,
}

#[must_use]
pub fn node_id(name: &str, resolved: Option<&str>) -> String {
    format!("{name}@{}", resolved.unwrap_or(UNKNOWN_VERSION))
}

#[must_use]
pub fn depth_limit_node_id(name: &str) -> String {
    format!("{name}@{DEPTH_LIMIT_VERSION}")
}

impl DependencyNode {
    /// Human-readable `name@version`, or just `name` while unresolved.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.resolved_version {
            Some(version) => format!("{}@{version}", self.name),
            None => self.name.clone(),
        }
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

impl DependencyEdge {
    #[must_use]
    pub fn between(parent: &DependencyNode, child: &DependencyNode) -> Self {
        Self {
            from: parent.node_id.clone(),
            to: child.node_id.clone(),
            from_label: parent.label(),
            to_label: child.label(),
        }
    }
}

impl DependencyGraphResult {
    #[must_use]
    pub fn issue_count(&self) -> usize {
        let mut count = 0;
        walk_tree(&self.tree, &mut |node, _| count += node.issues.len());
        count
    }
}

/// Depth-first, pre-order walk. The visitor receives each node together with
/// the names on the path from its root down to the node itself, so
/// `path.len() - 1` is the node's depth.
pub fn walk_tree<'a, F>(nodes: &'a [DependencyNode], visit: &mut F)
where
    F: FnMut(&'a DependencyNode, &[&'a str]),
{
    fn walk<'a, F>(nodes: &'a [DependencyNode], path: &mut Vec<&'a str>, visit: &mut F)
    where
        F: FnMut(&'a DependencyNode, &[&'a str]),
    {
        for node in nodes {
            path.push(&node.name);
            visit(node, path.as_slice());
            walk(&node.children, path, visit);
            path.pop();
        }
    }

    let mut path = Vec::new();
    walk(nodes, &mut path, visit);
}

/// Mutable counterpart of [`walk_tree`].
pub fn walk_tree_mut<F>(nodes: &mut [DependencyNode], visit: &mut F)
where
    F: FnMut(&mut DependencyNode),
{
    for node in nodes {
        visit(node);
        walk_tree_mut(&mut node.children, visit);
    }
}

/// Copy of the tree restricted to nodes that match `keep` and the ancestors
/// needed to reach them.
pub fn prune_tree<F>(nodes: &[DependencyNode], keep: &F) -> Vec<DependencyNode>
where
    F: Fn(&DependencyNode) -> bool,
{
    nodes
        .iter()
        .filter_map(|node| {
            let children = prune_tree(&node.children, keep);
            if children.is_empty() && !keep(node) {
                return None;
            }
            Some(DependencyNode {
                children,
                ..node.clone()
            })
        })
        .collect()
}
