pub mod diff;
pub mod markdown;
pub mod report;

pub use diff::{
    DependencyChange, DependencyDiff, IssueDiff, diff_issue_summary, diff_package_dependencies,
    format_diff_as_markdown, issue_key,
};
pub use markdown::format_analysis_report_as_markdown;
pub use report::{
    AnalysisReport, FlattenedIssue, ReportMetadata, ReportSummary, create_analysis_report,
};
