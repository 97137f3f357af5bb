use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::commands::{OutputFormat, ResolveArgs};
use crate::output::write_output;
use crate::session::Session;
use crate::tree::render_tree;
use depgraph_project::{read_package_json, resolve_manifest_path};
use depgraph_report::{ReportMetadata, create_analysis_report, format_analysis_report_as_markdown};

pub struct AnalyzeHandler;

pub struct AnalyzeRequest {
    pub path: PathBuf,
    pub resolve: ResolveArgs,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub source: Option<String>,
    pub issues_only: bool,
}

impl AnalyzeHandler {
    pub fn handle_analyze(request: &AnalyzeRequest) -> Result<()> {
        let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
        rt.block_on(Self::analyze_async(request))
    }

    async fn analyze_async(request: &AnalyzeRequest) -> Result<()> {
        let manifest_path = resolve_manifest_path(&request.path);
        let manifest = read_package_json(&manifest_path)?;
        let options = request.resolve.options();
        let session = Session::from_args(&request.resolve)?;

        depgraph_logger::status(&format!("Resolving {}", manifest.display_name()));
        let result = session
            .resolver(options)
            .resolve_package_graph(&manifest)
            .await
            .with_context(|| format!("Failed to resolve {}", manifest_path.display()))?;

        let report = create_analysis_report(
            &result,
            ReportMetadata {
                source: request
                    .source
                    .clone()
                    .unwrap_or_else(|| manifest_path.display().to_string()),
                generated_at: chrono::Utc::now().to_rfc3339(),
                options,
            },
        );

        depgraph_logger::finish(&format!(
            "Resolved {} nodes with {} issues",
            report.summary.total_nodes, report.summary.total_issues
        ));

        let rendered = match request.format {
            OutputFormat::Json => report.to_json()?,
            OutputFormat::Markdown => format_analysis_report_as_markdown(&report),
            OutputFormat::Tree => render_tree(
                &result.tree,
                request.issues_only,
                request.output.is_none(),
            ),
        };

        write_output(request.output.as_deref(), &rendered)
    }
}
