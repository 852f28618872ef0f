use std::path::Path;

use anyhow::Result;
use libnoted::{CreatedEntry, Noted};
use noted_term::Output;

use crate::ui::{commit_failure, emit, render_outcome};

/// Run the `noted folder add` command logic.
pub fn add_folder(noted: &Noted, output: &dyn Output, dir: &Path, name: &str) -> Result<()> {
    let created = noted.add_folder(dir, name)?;
    report(noted, output, "folder", name, &created)
}

/// Run the `noted note add` command logic.
pub fn add_note(noted: &Noted, output: &dyn Output, dir: &Path, name: &str) -> Result<()> {
    let created = noted.add_note(dir, name)?;
    report(noted, output, "note", name.strip_suffix(".md").unwrap_or(name), &created)
}

/// Print what was created and how the commit went.
fn report(
    noted: &Noted,
    output: &dyn Output,
    kind: &str,
    requested: &str,
    created: &CreatedEntry,
) -> Result<()> {
    if created.name != requested {
        emit(output.warn(&format!(
            "'{requested}' is taken, using '{}' instead",
            created.name
        )))?;
    }
    emit(output.success(&format!(
        "Created {kind} {}",
        created.path.display()
    )))?;
    render_outcome(output, noted.root(), &created.outcome)?;
    commit_failure(noted.root(), &created.outcome)
}
