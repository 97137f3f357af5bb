use owo_colors::OwoColorize;

use depgraph_resolver::{DependencyNode, IssueType, format_version_label, prune_tree};

/// Renders the resolved tree with box-drawing guides. With `issues_only`
/// the tree is first pruned to the branches that lead to an issue.
#[must_use]
pub fn render_tree(tree: &[DependencyNode], issues_only: bool, color: bool) -> String {
    let pruned;
    let nodes = if issues_only {
        pruned = prune_tree(tree, &|node: &DependencyNode| !node.issues.is_empty());
        pruned.as_slice()
    } else {
        tree
    };

    if nodes.is_empty() {
        return if issues_only {
            "No issues found.\n".to_string()
        } else {
            "No dependencies.\n".to_string()
        };
    }

    let mut output = String::new();
    render_level(&mut output, nodes, "", color);
    output
}

fn render_level(output: &mut String, nodes: &[DependencyNode], prefix: &str, color: bool) {
    for (idx, node) in nodes.iter().enumerate() {
        let is_last = idx + 1 == nodes.len();
        let (branch, continuation) = if is_last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };

        output.push_str(&format!("{prefix}{branch}{}\n", node_line(node, color)));

        let child_prefix = format!("{prefix}{continuation}");
        for issue in &node.issues {
            let marker = format!("[{}]", issue.issue_type);
            let marker = if color {
                paint_marker(&marker, issue.issue_type)
            } else {
                marker
            };
            output.push_str(&format!("{child_prefix}  {marker} {}\n", issue.message));
        }

        render_level(output, &node.children, &child_prefix, color);
    }
}

fn node_line(node: &DependencyNode, color: bool) -> String {
    let version = format_version_label(
        node.resolved_version.as_deref(),
        node.latest_version.as_deref(),
    );
    if color {
        format!(
            "{}@{} {}",
            node.name.bright_white().bold(),
            version.bright_cyan(),
            format!("({})", node.declared_range).bright_black()
        )
    } else {
        format!("{}@{version} ({})", node.name, node.declared_range)
    }
}

fn paint_marker(marker: &str, issue_type: IssueType) -> String {
    match issue_type {
        IssueType::Vulnerable | IssueType::Error => marker.bright_red().bold().to_string(),
        IssueType::Conflict | IssueType::Outdated => marker.bright_yellow().to_string(),
        IssueType::Duplicate => marker.bright_magenta().to_string(),
        IssueType::Advice => marker.bright_black().to_string(),
    }
}
