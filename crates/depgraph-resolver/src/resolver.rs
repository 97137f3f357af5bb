use futures::future::{BoxFuture, FutureExt};
use indexmap::{IndexMap, IndexSet};
use std::sync::Arc;

use crate::duplicates::{apply_duplicate_issues, compute_duplicate_issues};
use crate::graph::{
    DependencyEdge, DependencyGraphResult, DependencyNode, ResolveOptions, depth_limit_node_id,
    node_id,
};
use crate::issues::{
    VersionIssue, build_range_advice, conflict_issue, deprecation_issue, merge_issues,
    outdated_issue,
};
use crate::range::{describe_range, find_max_satisfying};
use crate::vulnerability::{NoVulnerabilities, VulnerabilitySource};
use depgraph_error::Result;
use depgraph_project::PackageJson;
use depgraph_registry::{PackageMetadata, RegistryClient};

/// State shared by every recursive call of one resolution run.
#[derive(Debug, Default)]
pub struct ResolutionContext {
    /// Every version each package resolved to, in first-seen order.
    pub visited: IndexMap<String, IndexSet<String>>,
    /// Parent → child edges in the order children finished resolving.
    pub edges: Vec<DependencyEdge>,
    resolved_nodes: usize,
}

impl ResolutionContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn record_version(&mut self, name: &str, version: &str) {
        self.visited
            .entry(name.to_string())
            .or_default()
            .insert(version.to_string());
    }

    fn outgoing_edges(&self, from: &str) -> Vec<DependencyEdge> {
        self.edges
            .iter()
            .filter(|edge| edge.from == from)
            .cloned()
            .collect()
    }
}

pub struct GraphResolver {
    registry: RegistryClient,
    vulnerabilities: Arc<dyn VulnerabilitySource>,
    options: ResolveOptions,
}

impl GraphResolver {
    #[must_use]
    pub fn new(registry: RegistryClient, options: ResolveOptions) -> Self {
        Self {
            registry,
            vulnerabilities: Arc::new(NoVulnerabilities),
            options,
        }
    }

    #[must_use]
    pub fn with_vulnerability_source(mut self, source: Arc<dyn VulnerabilitySource>) -> Self {
        self.vulnerabilities = source;
        self
    }

    #[must_use]
    pub const fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Resolves every direct dependency of `manifest`, one after another, and
    /// annotates the finished tree with duplicate diagnostics.
    pub async fn resolve_package_graph(
        &self,
        manifest: &PackageJson,
    ) -> Result<DependencyGraphResult> {
        let direct = manifest.direct_dependencies(self.options.include_dev);
        let mut context = ResolutionContext::new();
        let mut tree = Vec::with_capacity(direct.len());

        for (name, range) in &direct {
            let node = self.resolve_dependency(name, range, 0, &mut context).await?;
            tree.push(node);
        }

        let duplicates = compute_duplicate_issues(&context.visited);
        apply_duplicate_issues(&mut tree, &duplicates);

        depgraph_logger::debug(&format!(
            "Resolved {} nodes, {} edges, {} duplicated packages",
            context.resolved_nodes,
            context.edges.len(),
            duplicates.len()
        ));

        Ok(DependencyGraphResult {
            tree,
            edges: context.edges,
            duplicates,
        })
    }

    /// Resolves one dependency occurrence and, recursively, everything below
    /// it. Children are expanded strictly one at a time so that `context`
    /// observes visits and edges in traversal order.
    pub fn resolve_dependency<'a>(
        &'a self,
        name: &'a str,
        declared_range: &'a str,
        depth: usize,
        context: &'a mut ResolutionContext,
    ) -> BoxFuture<'a, Result<DependencyNode>> {
        async move {
            if depth > self.options.max_depth {
                return Ok(self.depth_limit_node(name, declared_range));
            }

            context.resolved_nodes += 1;
            depgraph_logger::progress(
                &format!("Resolving {name}@{declared_range}"),
                context.resolved_nodes,
            );

            let metadata = match self.registry.get_metadata(name).await {
                Ok(metadata) => metadata,
                Err(e) if e.is_contract_violation() => return Err(e),
                Err(e) => {
                    depgraph_logger::debug(&format!("Failed to fetch {name}: {e}"));
                    return Ok(self.failed_node(name, declared_range, &e.to_string()));
                }
            };

            let resolved_version = select_version(&metadata, declared_range);
            let latest_version = metadata.dist_tags.latest.clone();
            let mut node = DependencyNode {
                name: name.to_string(),
                node_id: node_id(name, resolved_version.as_deref()),
                declared_range: declared_range.to_string(),
                resolved_version: resolved_version.clone(),
                latest_version: latest_version.clone(),
                range_description: describe_range(declared_range),
                issues: Vec::new(),
                children: Vec::new(),
                edges: Vec::new(),
            };

            let Some(version) = resolved_version.as_deref() else {
                merge_issues(
                    &mut node.issues,
                    [conflict_issue(declared_range, latest_version.as_deref())],
                );
                merge_issues(
                    &mut node.issues,
                    build_range_advice(declared_range, None, latest_version.as_deref()),
                );
                return Ok(node);
            };

            context.record_version(name, version);

            let manifest = metadata.manifest(version);
            let dependencies = manifest
                .map(|m| m.expandable_dependencies(self.options.include_peer))
                .unwrap_or_default();

            for (dep_name, dep_range) in &dependencies {
                let child = self
                    .resolve_dependency(dep_name, dep_range, depth + 1, &mut *context)
                    .await?;
                context.edges.push(DependencyEdge::between(&node, &child));
                node.children.push(child);
            }

            match self.vulnerabilities.check(name, version).await {
                Ok(found) => merge_issues(&mut node.issues, found),
                Err(e) => depgraph_logger::debug(&format!(
                    "Vulnerability lookup for {name}@{version} failed: {e}"
                )),
            }

            merge_issues(
                &mut node.issues,
                build_range_advice(declared_range, Some(version), latest_version.as_deref()),
            );
            merge_issues(
                &mut node.issues,
                outdated_issue(Some(version), latest_version.as_deref()),
            );
            if let Some(notice) = manifest.and_then(|m| m.deprecation_notice()) {
                merge_issues(
                    &mut node.issues,
                    [deprecation_issue(name, version, &notice)],
                );
            }

            // Every descendant edge is already in the accumulator at this point.
            node.edges = context.outgoing_edges(&node.node_id);

            Ok(node)
        }
        .boxed()
    }

    fn depth_limit_node(&self, name: &str, declared_range: &str) -> DependencyNode {
        DependencyNode {
            name: name.to_string(),
            node_id: depth_limit_node_id(name),
            declared_range: declared_range.to_string(),
            resolved_version: None,
            latest_version: None,
            range_description: describe_range(declared_range),
            issues: vec![VersionIssue::error(format!(
                "Depth limit reached (max depth {}); {name} was not expanded",
                self.options.max_depth
            ))],
            children: Vec::new(),
            edges: Vec::new(),
        }
    }

    fn failed_node(&self, name: &str, declared_range: &str, message: &str) -> DependencyNode {
        DependencyNode {
            name: name.to_string(),
            node_id: node_id(name, None),
            declared_range: declared_range.to_string(),
            resolved_version: None,
            latest_version: None,
            range_description: describe_range(declared_range),
            issues: vec![VersionIssue::error(message)],
            children: Vec::new(),
            edges: Vec::new(),
        }
    }
}

/// A range naming a dist-tag (`latest`, `next`, ...) resolves through the
/// tag; anything else picks the highest satisfying published version.
fn select_version(metadata: &PackageMetadata, declared_range: &str) -> Option<String> {
    let trimmed = declared_range.trim();
    if let Some(tagged) = metadata.dist_tags.get(trimmed) {
        if metadata.versions.contains_key(tagged) {
            return Some(tagged.to_string());
        }
    }
    find_max_satisfying(declared_range, metadata.version_names())
}

/// Convenience wrapper for one-off runs.
pub async fn resolve_package_graph(
    manifest: &PackageJson,
    options: ResolveOptions,
    registry: &RegistryClient,
) -> Result<DependencyGraphResult> {
    GraphResolver::new(registry.clone(), options)
        .resolve_package_graph(manifest)
        .await
}
