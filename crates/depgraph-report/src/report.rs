use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use depgraph_constants::{BREADCRUMB_SEPARATOR, REPORT_FORMAT_VERSION, TOP_ISSUE_LIMIT};
use depgraph_error::{DepgraphError, Result};
use depgraph_resolver::{DependencyGraphResult, IssueType, ResolveOptions, VersionIssue, walk_tree};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    /// Where the manifest came from: a path, or a label given by the caller.
    pub source: String,
    pub generated_at: String,
    pub options: ResolveOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub direct_dependencies: usize,
    pub total_nodes: usize,
    pub unique_packages: usize,
    pub leaf_nodes: usize,
    pub max_depth: usize,
    pub edge_count: usize,
    pub total_issues: usize,
    pub duplicate_packages: usize,
}

/// An issue lifted out of the tree together with where it was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlattenedIssue {
    pub package: String,
    pub node_id: String,
    pub path: String,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_versions: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub format_version: String,
    pub metadata: ReportMetadata,
    pub summary: ReportSummary,
    pub issue_counts: IndexMap<IssueType, usize>,
    pub top_issues: Vec<FlattenedIssue>,
    pub duplicates: IndexMap<String, Vec<VersionIssue>>,
}

impl AnalysisReport {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| DepgraphError::ReportError(e.to_string()))
    }
}

/// Summarizes a finished graph in a single depth-first pass.
#[must_use]
pub fn create_analysis_report(
    result: &DependencyGraphResult,
    metadata: ReportMetadata,
) -> AnalysisReport {
    let mut summary = ReportSummary {
        direct_dependencies: result.tree.len(),
        edge_count: result.edges.len(),
        duplicate_packages: result.duplicates.len(),
        ..ReportSummary::default()
    };
    let mut issue_counts: IndexMap<IssueType, usize> =
        IssueType::ALL.iter().map(|issue_type| (*issue_type, 0)).collect();
    let mut unique = IndexSet::new();
    let mut flattened = Vec::new();

    walk_tree(&result.tree, &mut |node, path| {
        summary.total_nodes += 1;
        unique.insert(node.name.as_str());
        if node.is_leaf() {
            summary.leaf_nodes += 1;
        }
        summary.max_depth = summary.max_depth.max(path.len());

        for issue in &node.issues {
            summary.total_issues += 1;
            *issue_counts.entry(issue.issue_type).or_insert(0) += 1;
            flattened.push(FlattenedIssue {
                package: node.name.clone(),
                node_id: node.node_id.clone(),
                path: path.join(BREADCRUMB_SEPARATOR),
                issue_type: issue.issue_type,
                message: issue.message.clone(),
                affected_versions: issue.affected_versions.clone(),
            });
        }
    });
    summary.unique_packages = unique.len();

    flattened.sort_by(|a, b| {
        a.issue_type
            .severity_rank()
            .cmp(&b.issue_type.severity_rank())
            .then_with(|| a.package.cmp(&b.package))
            .then_with(|| a.message.cmp(&b.message))
    });
    flattened.truncate(TOP_ISSUE_LIMIT);

    AnalysisReport {
        format_version: REPORT_FORMAT_VERSION.to_string(),
        metadata,
        summary,
        issue_counts,
        top_issues: flattened,
        duplicates: result.duplicates.clone(),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use depgraph_resolver::{DependencyNode, VersionIssue};

    pub fn node(
        name: &str,
        version: &str,
        issues: Vec<VersionIssue>,
        children: Vec<DependencyNode>,
    ) -> DependencyNode {
        DependencyNode {
            name: name.to_string(),
            node_id: format!("{name}@{version}"),
            declared_range: format!("^{version}"),
            resolved_version: Some(version.to_string()),
            latest_version: Some(version.to_string()),
            range_description: "caret (compatible minor and patch updates)".to_string(),
            issues,
            children,
            edges: Vec::new(),
        }
    }
}
