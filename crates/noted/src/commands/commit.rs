use std::path::Path;

use anyhow::Result;
use libnoted::Noted;
use noted_term::Output;

use crate::ui::{commit_failure, render_outcome};

/// Run the `noted commit` command logic.
///
/// With `target` unset every workspace and then the parent are committed.
pub fn commit(
    noted: &Noted,
    output: &dyn Output,
    target: Option<&Path>,
    message: &str,
) -> Result<()> {
    let outcome = match target {
        Some(path) => noted.commit(path, message)?,
        None => noted.commit_all(message)?,
    };

    render_outcome(output, noted.root(), &outcome)?;
    commit_failure(noted.root(), &outcome)
}
