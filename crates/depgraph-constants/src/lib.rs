pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = "Resolves npm dependency graphs and reports on their health";
pub const BIN_NAME: &str = "depgraph";
pub const COMMANDS: &[(&str, &str, &[&str])] = &[
    (
        "analyze",
        "Resolves the dependency graph of a package.json and reports issues",
        &["a", "check"],
    ),
    (
        "diff",
        "Compares two package.json files and their resolved graphs",
        &["compare"],
    ),
];
pub const EXAMPLES: &[(&str, &str)] = &[
    ("depgraph analyze", "Analyze ./package.json"),
    (
        "depgraph analyze app --format markdown --output report.md",
        "Write a Markdown report",
    ),
    ("depgraph analyze --include-dev --no-peer", "Include devDependencies, skip peers"),
    ("depgraph analyze --format tree --issues-only", "Show only problem branches"),
    ("depgraph diff old/package.json new/package.json", "Compare two manifests"),
];

pub const USER_AGENT: &str = concat!("depgraph/", env!("CARGO_PKG_VERSION"));
pub const MAX_ATTEMPTS: u32 = 4;
pub const REQUEST_TIMEOUT_SECS: u64 = 45;
pub const CONNECT_TIMEOUT_SECS: u64 = 20;

pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";
pub const REGISTRY_ENV_VAR: &str = "DEPGRAPH_REGISTRY";
pub const OSV_QUERY_URL: &str = "https://api.osv.dev/v1/query";
pub const OSV_ECOSYSTEM: &str = "npm";

pub const DEFAULT_INCLUDE_DEV: bool = false;
pub const DEFAULT_INCLUDE_PEER: bool = true;
pub const DEFAULT_MAX_DEPTH: usize = 6;

pub const REPORT_FORMAT_VERSION: &str = "1.0";
pub const TOP_ISSUE_LIMIT: usize = 12;
pub const BREADCRUMB_SEPARATOR: &str = " > ";

pub const NO_DATA_LABEL: &str = "no data";
pub const UNKNOWN_VERSION: &str = "unknown";
pub const DEPTH_LIMIT_VERSION: &str = "depth-limit";
