use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Writes rendered output to `destination`, or to stdout when none is given.
pub fn write_output(destination: Option<&Path>, content: &str) -> Result<()> {
    match destination {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            depgraph_logger::success(&format!("Wrote {}", path.display()));
        }
        None => {
            print!("{content}");
            if !content.ends_with('\n') {
                println!();
            }
        }
    }
    Ok(())
}
