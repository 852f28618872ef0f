use clap::{ArgGroup, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(group(
    ArgGroup::new("color_mode")
        .args(["color", "no_color"])
))]
/// Top-level CLI options for noted.
pub struct Cli {
    /// Operate on this directory instead of the current one
    #[arg(long, global = true, value_name = "DIR")]
    pub path: Option<String>,

    /// Branch to commit on when a repository is in detached HEAD state
    #[arg(long, global = true, value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Enable colored output
    #[arg(long, global = true)]
    pub color: bool,

    /// Disable colored output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Suppress all output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, global = true)]
    pub no_prompt: bool,

    /// Log git invocations and other diagnostics to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    /// The primary command to execute.
    pub command: Commands,
}

#[derive(Subcommand)]
/// CLI subcommands supported by noted.
pub enum Commands {
    /// Create a parent notes repository
    Init {
        /// Directory to initialise (defaults to the working directory)
        dir: Option<String>,

        /// Where to publish the repository (prompts when omitted)
        #[arg(long, value_enum)]
        remote: Option<RemoteKind>,

        /// Remote URL, implies `--remote url`
        #[arg(long, value_name = "URL")]
        url: Option<String>,
    },

    /// Manage workspaces
    #[command(subcommand, alias = "ws")]
    Workspace(WorkspaceCommand),

    /// Manage folders inside a workspace
    #[command(subcommand)]
    Folder(FolderCommand),

    /// Manage notes inside a workspace
    #[command(subcommand)]
    Note(NoteCommand),

    /// Commit changes and record them in every parent repository
    Commit {
        /// File or directory to commit (defaults to the working directory)
        target: Option<String>,

        /// Commit message
        #[arg(long, short, default_value = DEFAULT_MESSAGE)]
        message: String,

        /// Commit every workspace and the parent repository
        #[arg(long, conflicts_with = "target")]
        all: bool,
    },

    /// Commit, then push every repository with unpushed commits
    #[command(alias = "update")]
    Upload {
        /// File or directory to commit (defaults to the working directory)
        target: Option<String>,

        /// Commit message
        #[arg(long, short, default_value = DEFAULT_MESSAGE)]
        message: String,

        /// Upload every workspace and the parent repository
        #[arg(long, conflicts_with = "target")]
        all: bool,
    },

    /// Show pending changes in the parent and every workspace
    Status,
}

/// Workspace subcommands.
#[derive(Subcommand)]
pub enum WorkspaceCommand {
    /// Create a workspace and register it as a submodule
    Add {
        /// Name of the workspace
        name: String,
    },

    /// Delete a workspace and its history
    #[command(alias = "rm")]
    Remove {
        /// Name of the workspace
        name: String,

        /// Remove without asking for confirmation
        #[arg(long)]
        force: bool,
    },

    /// Show registered workspaces
    #[command(alias = "ls")]
    List,
}

/// Folder subcommands.
#[derive(Subcommand)]
pub enum FolderCommand {
    /// Create a folder with a README
    Add {
        /// Name of the folder
        name: String,
    },
}

/// Note subcommands.
#[derive(Subcommand)]
pub enum NoteCommand {
    /// Create a note from the template
    Add {
        /// Name of the note (`.md` is appended)
        name: String,
    },
}

/// Publishing choices accepted by `noted init --remote`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RemoteKind {
    /// Keep the repository on this machine
    Local,
    /// Create a GitHub repository with the `gh` CLI
    Github,
    /// Push to a URL given with `--url`
    Url,
}

/// Commit message used when none is given.
pub const DEFAULT_MESSAGE: &str = "Update notes";

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "noted", "commit", "--all", "-m", "Daily", "--branch", "notes", "--no-color",
        ])
        .unwrap();
        assert_eq!(cli.branch.as_deref(), Some("notes"));
        assert!(cli.no_color);
        match cli.command {
            Commands::Commit {
                target,
                message,
                all,
            } => {
                assert!(target.is_none());
                assert_eq!(message, "Daily");
                assert!(all);
            }
            _ => panic!("expected commit"),
        }
    }

    #[test]
    fn commit_target_conflicts_with_all() {
        assert!(Cli::try_parse_from(["noted", "commit", "ws", "--all"]).is_err());
    }

    #[test]
    fn color_flags_conflict() {
        assert!(Cli::try_parse_from(["noted", "--color", "--no-color", "status"]).is_err());
    }

    #[test]
    fn upload_defaults_message() {
        let cli = Cli::try_parse_from(["noted", "upload"]).unwrap();
        match cli.command {
            Commands::Upload { message, .. } => assert_eq!(message, DEFAULT_MESSAGE),
            _ => panic!("expected upload"),
        }
    }
}
