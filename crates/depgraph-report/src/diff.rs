use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::markdown::escape_cell;
use depgraph_project::PackageJson;
use depgraph_resolver::{DependencyGraphResult, DependencyNode, VersionIssue, walk_tree};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyChange {
    pub name: String,
    pub from: String,
    pub to: String,
}

/// Declared-dependency differences between two manifests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyDiff {
    pub added: IndexMap<String, String>,
    pub removed: IndexMap<String, String>,
    pub changed: Vec<DependencyChange>,
}

impl DependencyDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueDiff {
    pub introduced: Vec<String>,
    pub resolved: Vec<String>,
    pub baseline_total: usize,
    pub target_total: usize,
}

#[must_use]
pub fn diff_package_dependencies(
    baseline: &PackageJson,
    target: &PackageJson,
    include_dev: bool,
) -> DependencyDiff {
    let before = baseline.direct_dependencies(include_dev);
    let after = target.direct_dependencies(include_dev);
    let mut diff = DependencyDiff::default();

    for (name, range) in &after {
        match before.get(name) {
            None => {
                diff.added.insert(name.clone(), range.clone());
            }
            Some(previous) if previous != range => diff.changed.push(DependencyChange {
                name: name.clone(),
                from: previous.clone(),
                to: range.clone(),
            }),
            Some(_) => {}
        }
    }
    for (name, range) in &before {
        if !after.contains_key(name) {
            diff.removed.insert(name.clone(), range.clone());
        }
    }

    diff
}

/// Canonical identity of one issue on one node.
#[must_use]
pub fn issue_key(node: &DependencyNode, issue: &VersionIssue) -> String {
    format!("{}::{}::{}", node.node_id, issue.issue_type, issue.message)
}

fn issue_keys(graph: Option<&DependencyGraphResult>) -> IndexSet<String> {
    let mut keys = IndexSet::new();
    if let Some(graph) = graph {
        walk_tree(&graph.tree, &mut |node, _| {
            keys.extend(node.issues.iter().map(|issue| issue_key(node, issue)));
        });
    }
    keys
}

/// Issues present only in the target (`introduced`) or only in the baseline
/// (`resolved`). A missing side counts as a graph without issues.
#[must_use]
pub fn diff_issue_summary(
    baseline: Option<&DependencyGraphResult>,
    target: Option<&DependencyGraphResult>,
) -> Option<IssueDiff> {
    if baseline.is_none() && target.is_none() {
        return None;
    }

    let before = issue_keys(baseline);
    let after = issue_keys(target);

    Some(IssueDiff {
        introduced: after.difference(&before).cloned().collect(),
        resolved: before.difference(&after).cloned().collect(),
        baseline_total: baseline.map_or(0, DependencyGraphResult::issue_count),
        target_total: target.map_or(0, DependencyGraphResult::issue_count),
    })
}

#[must_use]
pub fn format_diff_as_markdown(
    dependencies: &DependencyDiff,
    issues: Option<&IssueDiff>,
) -> String {
    let mut output = String::from("# Dependency Diff\n\n## Declared Dependencies\n\n");

    if dependencies.is_empty() {
        output.push_str("No declared dependency changes.\n\n");
    } else {
        output.push_str("| Change | Package | Baseline | Target |\n");
        output.push_str("|--------|---------|----------|--------|\n");
        for (name, range) in &dependencies.added {
            output.push_str(&format!("| added | {name} | | {} |\n", escape_cell(range)));
        }
        for (name, range) in &dependencies.removed {
            output.push_str(&format!("| removed | {name} | {} | |\n", escape_cell(range)));
        }
        for change in &dependencies.changed {
            output.push_str(&format!(
                "| changed | {} | {} | {} |\n",
                change.name,
                escape_cell(&change.from),
                escape_cell(&change.to)
            ));
        }
        output.push('\n');
    }

    let Some(issues) = issues else {
        return output;
    };

    output.push_str("## Issues\n\n");
    output.push_str(&format!(
        "- Baseline issues: {}\n- Target issues: {}\n\n",
        issues.baseline_total, issues.target_total
    ));
    for (title, keys) in [("Introduced", &issues.introduced), ("Resolved", &issues.resolved)] {
        output.push_str(&format!("### {title} ({})\n\n", keys.len()));
        for key in keys {
            output.push_str(&format!("- `{key}`\n"));
        }
        output.push('\n');
    }

    output
}
