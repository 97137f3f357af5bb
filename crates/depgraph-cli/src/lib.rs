use clap::Parser;

pub mod commands;
pub mod handlers;
pub mod output;
pub mod session;
pub mod tree;

use commands::{Cli, Commands};
use handlers::{AnalyzeHandler, AnalyzeRequest, DiffHandler, DiffRequest, HelpHandler};

pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            path,
            resolve,
            format,
            output,
            source,
            issues_only,
        } => {
            depgraph_logger::init_logger(resolve.quiet, resolve.debug);
            AnalyzeHandler::handle_analyze(&AnalyzeRequest {
                path,
                resolve,
                format,
                output,
                source,
                issues_only,
            })
        }
        Commands::Diff {
            baseline,
            target,
            resolve,
            format,
            output,
            manifest_only,
        } => {
            depgraph_logger::init_logger(resolve.quiet, resolve.debug);
            DiffHandler::handle_diff(&DiffRequest {
                baseline,
                target,
                resolve,
                format,
                output,
                manifest_only,
            })
        }
        Commands::Help { command } => HelpHandler::handle_help(command.as_deref()),
    }
}
