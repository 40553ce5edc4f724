//! Fact file output

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use super::Fact;
use crate::error::Result;

/// One fact per line, each line newline-terminated
pub fn render_facts(facts: &[Fact]) -> String {
    let mut out = String::new();
    for fact in facts {
        out.push_str(&fact.to_string());
        out.push('\n');
    }
    out
}

/// Replace `path` with the rendered facts.
///
/// The content goes to a temporary file next to `path` first and is then
/// renamed into place, so readers never see a half-written file.
pub fn write_facts(path: &Path, facts: &[Fact]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(render_facts(facts).as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
