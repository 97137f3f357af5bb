use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use depgraph_constants::{DEFAULT_MAX_DEPTH, DESCRIPTION, VERSION};
use depgraph_resolver::ResolveOptions;

#[derive(Parser)]
#[command(name = "depgraph")]
#[command(version = VERSION)]
#[command(propagate_version = true)]
#[command(about = DESCRIPTION, long_about = None)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
    Tree,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DiffFormat {
    Json,
    Markdown,
}

/// Flags shared by every command that resolves a graph.
#[derive(Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Also resolve devDependencies of the manifest
    #[arg(long = "include-dev")]
    pub include_dev: bool,
    /// Do not expand peerDependencies of resolved packages
    #[arg(long = "no-peer")]
    pub no_peer: bool,
    /// Deepest level that is still expanded (direct dependencies are depth 0)
    #[arg(long = "max-depth", default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,
    /// Registry base URL (falls back to $DEPGRAPH_REGISTRY, then the public npm registry)
    #[arg(long)]
    pub registry: Option<String>,
    /// Resolve offline against a JSON snapshot of registry metadata
    #[arg(long = "registry-snapshot", conflicts_with = "registry")]
    pub registry_snapshot: Option<PathBuf>,
    /// Look up known vulnerabilities on OSV.dev
    #[arg(long)]
    pub osv: bool,
    /// Only print errors
    #[arg(short = 'q', long)]
    pub quiet: bool,
    /// Enable debug mode for verbose output
    #[arg(long)]
    pub debug: bool,
}

impl ResolveArgs {
    #[must_use]
    pub const fn options(&self) -> ResolveOptions {
        ResolveOptions {
            include_dev: self.include_dev,
            include_peer: !self.no_peer,
            max_depth: self.max_depth,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolves the dependency graph of a package.json and reports issues
    #[command(aliases = ["a", "check"])]
    Analyze {
        /// Project directory or path to a package.json
        #[arg(default_value = ".")]
        path: PathBuf,
        #[command(flatten)]
        resolve: ResolveArgs,
        /// Output format
        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Write the report to a file instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
        /// Label recorded as the report source (defaults to the manifest path)
        #[arg(long)]
        source: Option<String>,
        /// Tree format only: keep just the branches that lead to issues
        #[arg(long = "issues-only")]
        issues_only: bool,
    },
    /// Compares two package.json files and their resolved graphs
    #[command(alias = "compare")]
    Diff {
        /// Baseline project directory or package.json
        baseline: PathBuf,
        /// Target project directory or package.json
        target: PathBuf,
        #[command(flatten)]
        resolve: ResolveArgs,
        /// Output format
        #[arg(short = 'f', long, value_enum, default_value_t = DiffFormat::Markdown)]
        format: DiffFormat,
        /// Write the diff to a file instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
        /// Only compare declared dependencies; skip resolving either graph
        #[arg(long = "manifest-only")]
        manifest_only: bool,
    },
    /// Shows help information for depgraph or a specific command
    Help {
        /// The command to show help for (optional)
        #[arg()]
        command: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_defaults() {
        let cli = Cli::try_parse_from(["depgraph", "analyze"]).unwrap();
        let Commands::Analyze {
            path,
            resolve,
            format,
            output,
            issues_only,
            ..
        } = cli.command
        else {
            panic!("expected analyze");
        };

        assert_eq!(path, PathBuf::from("."));
        assert_eq!(format, OutputFormat::Json);
        assert_eq!(output, None);
        assert!(!issues_only);
        assert_eq!(resolve.options(), ResolveOptions::default());
    }

    #[test]
    fn test_resolution_flags() {
        let cli = Cli::try_parse_from([
            "depgraph",
            "check",
            "app",
            "--include-dev",
            "--no-peer",
            "--max-depth",
            "2",
            "--format",
            "tree",
        ])
        .unwrap();
        let Commands::Analyze {
            path,
            resolve,
            format,
            ..
        } = cli.command
        else {
            panic!("expected analyze");
        };

        assert_eq!(path, PathBuf::from("app"));
        assert_eq!(format, OutputFormat::Tree);
        assert_eq!(
            resolve.options(),
            ResolveOptions {
                include_dev: true,
                include_peer: false,
                max_depth: 2,
            }
        );
    }

    #[test]
    fn test_registry_and_snapshot_conflict() {
        let parsed = Cli::try_parse_from([
            "depgraph",
            "analyze",
            "--registry",
            "http://localhost:4873",
            "--registry-snapshot",
            "snapshot.json",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_diff_arguments() {
        let cli = Cli::try_parse_from(["depgraph", "compare", "old", "new", "--format", "json"])
            .unwrap();
        let Commands::Diff {
            baseline,
            target,
            format,
            manifest_only,
            ..
        } = cli.command
        else {
            panic!("expected diff");
        };

        assert_eq!(baseline, PathBuf::from("old"));
        assert_eq!(target, PathBuf::from("new"));
        assert_eq!(format, DiffFormat::Json);
        assert!(!manifest_only);
    }
}
