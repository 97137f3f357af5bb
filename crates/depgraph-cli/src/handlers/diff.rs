use anyhow::{Context, Result};
use serde_json::json;
use std::path::{Path, PathBuf};

use crate::commands::{DiffFormat, ResolveArgs};
use crate::output::write_output;
use crate::session::Session;
use depgraph_project::{PackageJson, read_package_json, resolve_manifest_path};
use depgraph_report::{diff_issue_summary, diff_package_dependencies, format_diff_as_markdown};

pub struct DiffHandler;

pub struct DiffRequest {
    pub baseline: PathBuf,
    pub target: PathBuf,
    pub resolve: ResolveArgs,
    pub format: DiffFormat,
    pub output: Option<PathBuf>,
    pub manifest_only: bool,
}

impl DiffHandler {
    pub fn handle_diff(request: &DiffRequest) -> Result<()> {
        let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
        rt.block_on(Self::diff_async(request))
    }

    async fn diff_async(request: &DiffRequest) -> Result<()> {
        let baseline = Self::load(&request.baseline)?;
        let target = Self::load(&request.target)?;
        let options = request.resolve.options();

        let dependencies = diff_package_dependencies(&baseline, &target, options.include_dev);

        let issues = if request.manifest_only {
            None
        } else {
            let session = Session::from_args(&request.resolve)?;
            let baseline_resolver = session.resolver(options);
            let target_resolver = session.resolver(options);

            depgraph_logger::status("Resolving baseline and target graphs");
            let (baseline_graph, target_graph) = tokio::join!(
                baseline_resolver.resolve_package_graph(&baseline),
                target_resolver.resolve_package_graph(&target)
            );
            let baseline_graph = baseline_graph.context("Failed to resolve the baseline graph")?;
            let target_graph = target_graph.context("Failed to resolve the target graph")?;

            diff_issue_summary(Some(&baseline_graph), Some(&target_graph))
        };

        if let Some(summary) = &issues {
            depgraph_logger::finish(&format!(
                "{} issues introduced, {} resolved",
                summary.introduced.len(),
                summary.resolved.len()
            ));
        }

        let rendered = match request.format {
            DiffFormat::Json => serde_json::to_string_pretty(&json!({
                "dependencies": dependencies,
                "issues": issues,
            }))?,
            DiffFormat::Markdown => format_diff_as_markdown(&dependencies, issues.as_ref()),
        };

        write_output(request.output.as_deref(), &rendered)
    }

    fn load(path: &Path) -> Result<PackageJson> {
        let manifest_path = resolve_manifest_path(path);
        read_package_json(&manifest_path)
            .with_context(|| format!("Failed to load {}", manifest_path.display()))
    }
}
