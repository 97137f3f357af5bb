pub mod analyze;
pub mod diff;
pub mod help;

pub use analyze::{AnalyzeHandler, AnalyzeRequest};
pub use diff::{DiffHandler, DiffRequest};
pub use help::HelpHandler;
