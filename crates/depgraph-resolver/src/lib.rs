pub mod comparators;
pub mod duplicates;
pub mod graph;
pub mod issues;
pub mod range;
pub mod resolver;
pub mod semver;
pub mod version_utils;
pub mod vulnerability;

pub use duplicates::{apply_duplicate_issues, compute_duplicate_issues};
pub use graph::{
    DependencyEdge, DependencyGraphResult, DependencyNode, ResolveOptions, prune_tree, walk_tree,
    walk_tree_mut,
};
pub use issues::{IssueType, VersionIssue, build_range_advice, merge_issues};
pub use range::{
    RangeStyle, compare_versions, describe_range, find_max_satisfying, format_version_label,
    is_outdated, normalize_range,
};
pub use resolver::{GraphResolver, ResolutionContext, resolve_package_graph};
pub use vulnerability::{NoVulnerabilities, OsvClient, VulnerabilitySource};
