//! JSON output to a file or stdout

use anyhow::Context;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Pretty-print `value` to `path`, or to `stdout` when no path is given
pub fn write_json<T: Serialize>(
    value: &T,
    path: Option<&Path>,
    mut stdout: impl Write,
) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    match path {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => writeln!(stdout, "{json}").context("Failed to write to stdout"),
    }
}
