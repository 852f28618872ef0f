use std::path::Path;

use anyhow::{Result, bail};
use libnoted::{GhCli, InitReport, Noted, RemoteChoice, RepoStatus};
use noted_term::Output;

use crate::{
    args::RemoteKind,
    ui::{emit, prompt_select},
};

/// Run the `noted init` command logic.
pub fn init(
    output: &dyn Output,
    dir: &Path,
    remote: Option<RemoteKind>,
    url: Option<String>,
    branch: &str,
    no_prompt: bool,
) -> Result<()> {
    let choice = remote_choice(output, remote, url, no_prompt)?;

    let spinner = output.spinner("Creating notes repository...");
    let report = match Noted::init(dir, &choice, branch, &GhCli::default()) {
        Ok(report) => {
            spinner.finish_success("Notes repository created");
            report
        }
        Err(err) => {
            spinner.finish_fail("Failed to create notes repository");
            return Err(err.into());
        }
    };

    render_init_report(output, &report)
}

/// Work out where the repository should be published.
fn remote_choice(
    output: &dyn Output,
    remote: Option<RemoteKind>,
    url: Option<String>,
    no_prompt: bool,
) -> Result<RemoteChoice> {
    match (remote, url) {
        (None | Some(RemoteKind::Url), Some(url)) => Ok(RemoteChoice::Url(url)),
        (Some(RemoteKind::Url), None) => bail!("--remote url needs the remote given with --url"),
        (Some(_), Some(_)) => bail!("--url can only be combined with --remote url"),
        (Some(RemoteKind::Local), None) => Ok(RemoteChoice::Local),
        (Some(RemoteKind::Github), None) => Ok(RemoteChoice::GitHub),
        (None, None) if no_prompt => Ok(RemoteChoice::Local),
        (None, None) => {
            let options = vec!["Local only".to_string(), "GitHub".to_string()];
            let selection = prompt_select(
                output,
                "Where should the notes live? (use --url for any other remote)",
                options,
            )?;
            Ok(if selection == 0 {
                RemoteChoice::Local
            } else {
                RemoteChoice::GitHub
            })
        }
    }
}

/// Print the result of `noted init`.
fn render_init_report(output: &dyn Output, report: &InitReport) -> Result<()> {
    emit(output.success(&format!(
        "Initialized noted repository in {}",
        report.root.display()
    )))?;
    if let Some(url) = &report.remote_url {
        emit(output.item("origin", url))?;
    }
    match &report.push {
        Some(RepoStatus::Failed(reason)) => emit(output.warn(&format!(
            "Initial push failed, run `noted upload` to retry: {reason}"
        )))?,
        Some(status) => emit(output.message(&format!("push: {status}")))?,
        None => {}
    }
    emit(output.message("Next: noted workspace add <name>"))
}

#[cfg(test)]
mod tests {
    use noted_term::Quiet;

    use super::*;

    #[test]
    fn remote_flags_map_to_choices() {
        let url = "git@example.com:me/notes.git".to_string();
        assert_eq!(
            remote_choice(&Quiet, None, Some(url.clone()), false).unwrap(),
            RemoteChoice::Url(url.clone())
        );
        assert_eq!(
            remote_choice(&Quiet, Some(RemoteKind::Url), Some(url.clone()), false).unwrap(),
            RemoteChoice::Url(url.clone())
        );
        assert_eq!(
            remote_choice(&Quiet, Some(RemoteKind::Github), None, false).unwrap(),
            RemoteChoice::GitHub
        );
        assert_eq!(
            remote_choice(&Quiet, None, None, true).unwrap(),
            RemoteChoice::Local
        );
        assert!(remote_choice(&Quiet, Some(RemoteKind::Url), None, false).is_err());
        assert!(remote_choice(&Quiet, Some(RemoteKind::Local), Some(url), false).is_err());
        // Quiet output cannot prompt
        assert!(remote_choice(&Quiet, None, None, false).is_err());
    }
}
