use std::path::Path;

use anyhow::Result;
use libnoted::{Noted, NotedError, RepoStatus};
use noted_term::Output;

use crate::ui::{commit_failure, render_outcome, repo_label};

/// Run the `noted upload` command logic.
///
/// Commits like `noted commit`, then pushes every repository that was touched.
pub fn upload(
    noted: &Noted,
    output: &dyn Output,
    target: Option<&Path>,
    message: &str,
) -> Result<()> {
    let spinner = output.spinner("Uploading...");
    let result = match target {
        Some(path) => noted.upload(path, message),
        None => noted.upload_all(message),
    };
    let outcome = match result {
        Ok(outcome) => {
            spinner.finish_clear();
            outcome
        }
        Err(err) => {
            spinner.finish_fail("Upload failed");
            return Err(err.into());
        }
    };

    render_outcome(output, noted.root(), &outcome.committed)?;
    commit_failure(noted.root(), &outcome.committed)?;
    render_outcome(output, noted.root(), &outcome.pushed)?;

    if let Some(failure) = outcome.pushed.first_failure()
        && let RepoStatus::Failed(reason) = &failure.status
    {
        return Err(NotedError::PushFailed(format!(
            "{}: {reason}",
            repo_label(noted.root(), &failure.repo)
        ))
        .into());
    }
    Ok(())
}
