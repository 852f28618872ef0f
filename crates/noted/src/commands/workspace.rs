use anyhow::Result;
use libnoted::{GhCli, Noted, NotedError};
use noted_term::Output;

use crate::ui::{commit_failure, emit, prompt_confirm, render_outcome};

/// Run the `noted workspace add` command logic.
pub fn add_workspace(noted: &Noted, output: &dyn Output, name: &str) -> Result<()> {
    let spinner = output.spinner("Creating workspace...");
    let created = match noted.add_workspace(name, &GhCli::default()) {
        Ok(created) => {
            spinner.finish_clear();
            created
        }
        Err(err) => {
            spinner.finish_fail("Failed to create workspace");
            return Err(err.into());
        }
    };

    if created.name != name {
        emit(output.warn(&format!(
            "'{name}' is taken, using '{}' instead",
            created.name
        )))?;
    }
    emit(output.success(&format!("Created workspace {}", created.name)))?;
    render_outcome(output, noted.root(), &created.outcome)?;
    commit_failure(noted.root(), &created.outcome)
}

/// Run the `noted workspace remove` command logic.
pub fn remove_workspace(
    noted: &Noted,
    output: &dyn Output,
    name: &str,
    force: bool,
    no_prompt: bool,
) -> Result<()> {
    if !force && !no_prompt {
        let prompt = format!("Remove workspace '{name}' and all of its history?");
        if !prompt_confirm(output, &prompt)? {
            return Err(NotedError::UserAborted.into());
        }
    }

    let outcome = noted.remove_workspace(name)?;
    emit(output.success(&format!("Removed workspace {name}")))?;
    render_outcome(output, noted.root(), &outcome)?;
    commit_failure(noted.root(), &outcome)
}

/// Run the `noted workspace list` command logic.
pub fn list_workspaces(noted: &Noted, output: &dyn Output) -> Result<()> {
    let workspaces = noted.workspaces()?;
    if workspaces.is_empty() {
        emit(output.message("No workspaces found."))?;
        return Ok(());
    }

    for ws in workspaces {
        let section = output.section(&ws.name);
        emit(section.item("path", &ws.path.display().to_string()))?;
        if let Some(url) = &ws.url {
            emit(section.item("url", url))?;
        }
        if !ws.present {
            emit(section.warn("not checked out"))?;
        }
    }
    Ok(())
}
