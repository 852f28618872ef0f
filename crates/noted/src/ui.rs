use std::{path::Path, result::Result as StdResult};

use anyhow::Result;
use libnoted::{CommitOutcome, NotedError, RepoChangeStatus, RepoStatus};
use noted_term::{Output, OutputError};

/// Convert output-layer failures into domain errors.
pub fn map_output_error(err: OutputError) -> NotedError {
    match err {
        OutputError::Cancelled => NotedError::UserAborted,
        other => NotedError::OperationError(format!("Output operation failed: {other}")),
    }
}

/// Emit an output result, mapping errors into `NotedError`.
pub fn emit(result: StdResult<(), OutputError>) -> Result<()> {
    result.map_err(map_output_error)?;
    Ok(())
}

/// Prompt for confirmation, mapping cancellation to `UserAborted`.
pub fn prompt_confirm(output: &dyn Output, prompt: &str) -> Result<bool> {
    output
        .confirm(prompt)
        .map_err(|err| map_output_error(err).into())
}

/// Prompt for selection, returning `None` on cancellation.
pub fn prompt_select_optional(
    output: &dyn Output,
    prompt: &str,
    options: Vec<String>,
) -> Result<Option<usize>> {
    match output.select(prompt, options) {
        Ok(selection) => Ok(Some(selection)),
        Err(OutputError::Cancelled) => Ok(None),
        Err(err) => Err(map_output_error(err).into()),
    }
}

/// Prompt for selection, mapping cancellation to `UserAborted`.
pub fn prompt_select(output: &dyn Output, prompt: &str, options: Vec<String>) -> Result<usize> {
    prompt_select_optional(output, prompt, options)?.ok_or_else(|| NotedError::UserAborted.into())
}

/// Short label for `repo`: its path relative to `root`, or the root's own name.
pub fn repo_label(root: &Path, repo: &Path) -> String {
    if repo == root {
        return root
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| root.display().to_string());
    }
    match repo.strip_prefix(root) {
        Ok(relative) => relative.display().to_string(),
        Err(_) => repo.display().to_string(),
    }
}

/// Print one line per repository in `outcome`.
pub fn render_outcome(output: &dyn Output, root: &Path, outcome: &CommitOutcome) -> Result<()> {
    for repo in &outcome.repos {
        let line = format!("{}: {}", repo_label(root, &repo.repo), repo.status);
        let result = match &repo.status {
            RepoStatus::Committed | RepoStatus::Pushed => output.success(&line),
            RepoStatus::NothingToCommit | RepoStatus::UpToDate => output.message(&line),
            RepoStatus::PushSkippedNoRemote => output.warn(&line),
            RepoStatus::Failed(_) => output.fail(&line),
        };
        emit(result)?;
    }
    Ok(())
}

/// Turn the first failed commit in `outcome` into an error.
pub fn commit_failure(root: &Path, outcome: &CommitOutcome) -> Result<()> {
    if let Some(failure) = outcome.first_failure()
        && let RepoStatus::Failed(reason) = &failure.status
    {
        return Err(NotedError::CommitFailed(format!(
            "{}: {reason}",
            repo_label(root, &failure.repo)
        ))
        .into());
    }
    Ok(())
}

/// Render the change status of one repository as a section.
pub fn render_change_status(
    output: &dyn Output,
    root: &Path,
    repo: &RepoChangeStatus,
) -> Result<()> {
    let section = output.section(&repo.name);
    if repo.path != root {
        emit(section.item("path", &repo_label(root, &repo.path)))?;
    }
    emit(section.item(
        "branch",
        repo.branch.as_deref().unwrap_or("(detached HEAD)"),
    ))?;

    let status = &repo.status;
    if status.clean {
        emit(section.item("changes", "none"))?;
    } else {
        emit(section.warn("uncommitted changes"))?;
    }

    let upstream = match (status.has_origin, status.ahead) {
        (false, _) => "no origin remote".to_string(),
        (true, None) => "not pushed yet".to_string(),
        (true, Some(0)) => "up to date".to_string(),
        (true, Some(1)) => "1 commit to push".to_string(),
        (true, Some(n)) => format!("{n} commits to push"),
    };
    emit(section.item("remote", &upstream))?;
    Ok(())
}
