//! JSON output.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// Write `value` as pretty JSON to `path`, or to stdout when `None`.
pub fn emit<T: Serialize + ?Sized>(value: &T, path: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(path, format!("{json}\n"))
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "output written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
