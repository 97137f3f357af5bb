use indexmap::{IndexMap, IndexSet};
use semver::Version;

use crate::graph::{DependencyNode, walk_tree_mut};
use crate::issues::{IssueType, VersionIssue, merge_issues};

/// Duplicate and unification advice for every package that resolved to more
/// than one version during a run. Versions are listed in first-seen order.
#[must_use]
pub fn compute_duplicate_issues(
    visited: &IndexMap<String, IndexSet<String>>,
) -> IndexMap<String, Vec<VersionIssue>> {
    visited
        .iter()
        .filter(|(_, versions)| versions.len() > 1)
        .map(|(name, versions)| {
            let listed: Vec<String> = versions.iter().cloned().collect();
            let mut issues = vec![
                VersionIssue::new(
                    IssueType::Duplicate,
                    format!(
                        "{name} is installed in {} versions: {}",
                        listed.len(),
                        listed.join(", ")
                    ),
                )
                .with_affected_versions(listed.clone()),
            ];

            let highest = listed
                .iter()
                .filter_map(|version| Version::parse(version).ok())
                .max();
            if let Some(highest) = highest {
                issues.push(
                    VersionIssue::advice(format!(
                        "Unify {name} on ^{highest} so a single copy is installed"
                    ))
                    .with_affected_versions(listed),
                );
            }

            (name.clone(), issues)
        })
        .collect()
}

/// Attaches each package's duplicate diagnostics to every node of that
/// package, wherever it sits in the tree. Safe to run repeatedly.
pub fn apply_duplicate_issues(
    tree: &mut [DependencyNode],
    duplicates: &IndexMap<String, Vec<VersionIssue>>,
) {
    if duplicates.is_empty() {
        return;
    }

    walk_tree_mut(tree, &mut |node| {
        if let Some(issues) = duplicates.get(&node.name) {
            merge_issues(&mut node.issues, issues.iter().cloned());
        }
    });
}
