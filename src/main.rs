use std::process::ExitCode;

fn main() -> ExitCode {
    match depgraph_cli::run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            depgraph_logger::error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
