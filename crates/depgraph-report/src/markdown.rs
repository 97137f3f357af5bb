use crate::report::AnalysisReport;
use depgraph_resolver::IssueType;

const SUMMARY_HEADER: &str = "| Metric | Value |\n|--------|-------|\n";
const TYPE_HEADER: &str = "| Issue type | Count |\n|------------|-------|\n";

/// Escapes pipe characters and newlines for safe Markdown table rendering
pub(crate) fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

/// Renders a report as Markdown. Sections always appear in the same order:
/// metadata, summary, issue counts, top issues, duplicates.
#[must_use]
pub fn format_analysis_report_as_markdown(report: &AnalysisReport) -> String {
    let mut output = String::new();
    render_metadata(&mut output, report);
    render_summary(&mut output, report);
    render_issue_counts(&mut output, report);
    render_top_issues(&mut output, report);
    render_duplicates(&mut output, report);
    output
}

fn render_metadata(output: &mut String, report: &AnalysisReport) {
    let metadata = &report.metadata;
    output.push_str("# Dependency Analysis Report\n\n");
    output.push_str(&format!("- **Source:** {}\n", metadata.source));
    output.push_str(&format!("- **Generated at:** {}\n", metadata.generated_at));
    output.push_str(&format!("- **Format version:** {}\n", report.format_version));
    output.push_str(&format!(
        "- **Options:** dev dependencies {}, peer dependencies {}, max depth {}\n\n",
        yes_no(metadata.options.include_dev),
        yes_no(metadata.options.include_peer),
        metadata.options.max_depth
    ));
}

fn render_summary(output: &mut String, report: &AnalysisReport) {
    let summary = &report.summary;
    output.push_str("## Summary\n\n");
    output.push_str(SUMMARY_HEADER);
    for (label, value) in [
        ("Direct dependencies", summary.direct_dependencies),
        ("Total nodes", summary.total_nodes),
        ("Unique packages", summary.unique_packages),
        ("Leaf nodes", summary.leaf_nodes),
        ("Max depth", summary.max_depth),
        ("Edges", summary.edge_count),
        ("Total issues", summary.total_issues),
        ("Duplicate packages", summary.duplicate_packages),
    ] {
        output.push_str(&format!("| {label} | {value} |\n"));
    }
    output.push('\n');
}

fn render_issue_counts(output: &mut String, report: &AnalysisReport) {
    output.push_str("## Issues by Type\n\n");
    output.push_str(TYPE_HEADER);
    for issue_type in IssueType::SEVERITY_ORDER {
        let count = report.issue_counts.get(&issue_type).copied().unwrap_or(0);
        output.push_str(&format!("| {issue_type} | {count} |\n"));
    }
    output.push('\n');
}

fn render_top_issues(output: &mut String, report: &AnalysisReport) {
    output.push_str("## Top Issues\n\n");
    if report.top_issues.is_empty() {
        output.push_str("No issues found.\n\n");
        return;
    }
    for (index, issue) in report.top_issues.iter().enumerate() {
        output.push_str(&format!(
            "{}. **{}** `{}`: {}\n",
            index + 1,
            issue.issue_type,
            issue.path,
            escape_cell(&issue.message)
        ));
    }
    output.push('\n');
}

fn render_duplicates(output: &mut String, report: &AnalysisReport) {
    output.push_str("## Duplicates\n\n");
    if report.duplicates.is_empty() {
        output.push_str("No duplicate packages.\n");
        return;
    }
    for (name, issues) in &report.duplicates {
        output.push_str(&format!("- **{name}**\n"));
        for issue in issues {
            output.push_str(&format!("  - {}: {}\n", issue.issue_type, issue.message));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::test_support::node;
    use crate::report::{ReportMetadata, create_analysis_report};
    use depgraph_resolver::{DependencyGraphResult, ResolveOptions, VersionIssue};

    fn report(graph: &DependencyGraphResult) -> AnalysisReport {
        create_analysis_report(
            graph,
            ReportMetadata {
                source: "app/package.json".to_string(),
                generated_at: "2026-01-01T00:00:00Z".to_string(),
                options: ResolveOptions::default(),
            },
        )
    }

    #[test]
    fn test_sections_appear_in_order() {
        let graph = DependencyGraphResult {
            tree: vec![node(
                "left-pad",
                "1.0.0",
                vec![VersionIssue::error("a | b")],
                vec![],
            )],
            duplicates: [(
                "left-pad".to_string(),
                vec![VersionIssue::new(IssueType::Duplicate, "left-pad twice")],
            )]
            .into_iter()
            .collect(),
            ..DependencyGraphResult::default()
        };
        let markdown = format_analysis_report_as_markdown(&report(&graph));

        let positions: Vec<usize> = [
            "# Dependency Analysis Report",
            "## Summary",
            "## Issues by Type",
            "## Top Issues",
            "## Duplicates",
        ]
        .iter()
        .map(|heading| markdown.find(heading).unwrap())
        .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));

        assert!(markdown.contains("- **Source:** app/package.json"));
        assert!(markdown.contains("| Total nodes | 1 |"));
        assert!(markdown.contains("| error | 1 |"));
        assert!(markdown.contains("1. **error** `left-pad`: a \\| b"));
        assert!(markdown.contains("  - duplicate: left-pad twice"));
    }

    #[test]
    fn test_empty_sections() {
        let markdown =
            format_analysis_report_as_markdown(&report(&DependencyGraphResult::default()));
        assert!(markdown.contains("No issues found."));
        assert!(markdown.contains("No duplicate packages."));
        assert!(markdown.contains("max depth 6"));
    }
}
