#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
//! Command-line interface for managing noted repositories via the libnoted crate.

use std::{
    io::{self, IsTerminal, Write},
    process,
    sync::Arc,
};

use anyhow::Result;
use clap::Parser;
use libnoted::{Noted, NotedError};
use noted_term::{Output, Quiet, Terminal};

/// Clap definitions for the command line.
mod args;
/// Command implementations.
mod commands;
/// Diagnostic logging setup.
mod logging;
/// Rendering and prompt helpers.
mod ui;
/// Path and configuration resolution.
mod utils;

use args::{Cli, Commands, FolderCommand, NoteCommand, WorkspaceCommand};
use utils::{resolve_base_dir, resolve_branch, resolve_target};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // Determine color output preference early for error handling
    let color = if cli.color {
        true
    } else if cli.no_color {
        false
    } else {
        io::stdout().is_terminal()
    };

    let output: Arc<dyn Output> = if cli.quiet {
        Arc::new(Quiet)
    } else {
        Arc::new(Terminal::new(color))
    };

    if let Err(e) = run(cli, &output) {
        // Reset any existing colors only if color was enabled and stdout is a TTY
        if color && io::stdout().is_terminal() {
            print!("\x1b[0m");
            if let Err(flush_err) = io::stdout().flush() {
                eprintln!("Failed to flush stdout while resetting colors: {flush_err}");
            }
        }

        let exit_code = match e.downcast_ref::<NotedError>() {
            Some(err @ NotedError::UserAborted) => {
                if let Err(finish_err) = output.finish() {
                    eprintln!("Failed to flush output handler: {finish_err:#}");
                }
                err.exit_code()
            }
            Some(err) => {
                report_error(output.as_ref(), &e);
                err.exit_code()
            }
            None => {
                report_error(output.as_ref(), &e);
                1
            }
        };

        process::exit(exit_code);
    }
    Ok(())
}

/// Print `e` through the output handler, falling back to stderr.
fn report_error(output: &dyn Output, e: &anyhow::Error) {
    if let Err(display_err) = output.fail(&format!("{e:#}")) {
        eprintln!("Failed to report error via output handler: {display_err:#}");
    }
    if let Err(finish_err) = output.finish() {
        eprintln!("Failed to flush output handler: {finish_err:#}");
    }
}

/// Execute the selected CLI command using the provided output implementation.
fn run(cli: Cli, output: &Arc<dyn Output>) -> Result<()> {
    let base = resolve_base_dir(cli.path.as_deref())?;
    let branch = resolve_branch(cli.branch.as_deref());
    let output = output.as_ref();
    tracing::debug!(base = %base.display(), branch, "resolved configuration");

    let open = || Noted::open(&base, &branch);

    match cli.command {
        Commands::Init { dir, remote, url } => {
            let dir = resolve_target(&base, dir.as_deref());
            commands::init(output, &dir, remote, url, &branch, cli.no_prompt)
        }
        Commands::Workspace(WorkspaceCommand::Add { name }) => {
            commands::add_workspace(&open()?, output, &name)
        }
        Commands::Workspace(WorkspaceCommand::Remove { name, force }) => {
            commands::remove_workspace(&open()?, output, &name, force, cli.no_prompt)
        }
        Commands::Workspace(WorkspaceCommand::List) => commands::list_workspaces(&open()?, output),
        Commands::Folder(FolderCommand::Add { name }) => {
            commands::add_folder(&open()?, output, &base, &name)
        }
        Commands::Note(NoteCommand::Add { name }) => {
            commands::add_note(&open()?, output, &base, &name)
        }
        Commands::Commit {
            target,
            message,
            all,
        } => {
            let target = (!all).then(|| resolve_target(&base, target.as_deref()));
            commands::commit(&open()?, output, target.as_deref(), &message)
        }
        Commands::Upload {
            target,
            message,
            all,
        } => {
            let target = (!all).then(|| resolve_target(&base, target.as_deref()));
            commands::upload(&open()?, output, target.as_deref(), &message)
        }
        Commands::Status => commands::status(&open()?, output),
    }
}
