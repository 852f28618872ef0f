use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Utc;
use tracing::{debug, info};

use crate::{
    error::{NotedError, Result, git_error},
    git::{self, GITMODULES_FILE},
    locate::{find_repository_root, find_workspace_tool_root},
    marker::{MARKER_FILE, NotedConfig, RemoteType},
    names::{existing_names, next_available_name, validate_name},
    propagate::{CommitRequest, propagate_commit},
    push::{ORIGIN, change_status, push_all, push_repository},
    remote::RemoteProvider,
    templates::{self, NOTE_EXTENSION, README_FILE},
    types::{
        CommitOutcome, CreatedEntry, InitReport, RemoteChoice, RepoChangeStatus, RepoStatus,
        UploadOutcome, WorkspaceInfo,
    },
};

/// Manager for a noted parent repository and its workspaces.
///
/// The parent repository is identified by a `.notedconfig` marker at its
/// root. Workspaces are Git submodules of the parent; folders and notes live
/// inside workspaces. Every change is committed and cascaded up through the
/// submodule chain.
pub struct Noted {
    /// Root of the parent repository.
    root: PathBuf,
    /// Contents of the marker file.
    config: NotedConfig,
    /// Branch commits land on when a repository is detached.
    branch: String,
}

impl Noted {
    /// Create a parent repository in `dir`, creating the directory if needed.
    ///
    /// For remote choices `origin` is configured and the initial commit is
    /// pushed. A failed push is reported in the returned [`InitReport`], not as
    /// an error, since the local repository is complete.
    pub fn init(
        dir: &Path,
        choice: &RemoteChoice,
        branch: &str,
        provider: &dyn RemoteProvider,
    ) -> Result<InitReport> {
        if NotedConfig::path(dir).exists() {
            return Err(NotedError::AlreadyInitialized {
                path: dir.to_path_buf(),
            });
        }
        fs::create_dir_all(dir)?;
        let root = fs::canonicalize(dir)?;
        let name = dir_name(&root);

        if root.join(".git").exists() {
            debug!(root = %root.display(), "reusing existing git repository");
        } else {
            git::init(&root, branch).map_err(|e| git_error(&e))?;
        }

        let (config, remote_url) = match choice {
            RemoteChoice::Local => (NotedConfig::local(), None),
            RemoteChoice::GitHub => {
                let url = provider
                    .create_repository(&name)
                    .map_err(|e| NotedError::RemoteError(format!("{e:#}")))?;
                (NotedConfig::remote(RemoteType::Github, &url), Some(url))
            }
            RemoteChoice::Url(url) => {
                (NotedConfig::remote(RemoteType::Url, url), Some(url.clone()))
            }
        };

        let readme = root.join(README_FILE);
        if !readme.exists() {
            fs::write(&readme, templates::parent_readme(&name))?;
        }
        config
            .write(&root)
            .map_err(|e| NotedError::ConfigError(format!("{e:#}")))?;
        commit_initial(&root, "Initialize noted repository", &[README_FILE, MARKER_FILE])?;
        info!(root = %root.display(), "initialized noted repository");

        let push = match &remote_url {
            Some(url) => {
                git::add_remote(&root, ORIGIN, url).map_err(|e| git_error(&e))?;
                Some(push_repository(&root))
            }
            None => None,
        };

        Ok(InitReport {
            root,
            remote_url,
            push,
        })
    }

    /// Open the parent repository containing `start`.
    pub fn open(start: &Path, branch: &str) -> Result<Self> {
        let root = find_workspace_tool_root(start).ok_or_else(|| NotedError::NotInitialized {
            path: start.to_path_buf(),
        })?;
        let root = fs::canonicalize(&root).unwrap_or(root);
        let config =
            NotedConfig::read(&root).map_err(|e| NotedError::ConfigError(format!("{e:#}")))?;
        Ok(Self {
            root,
            config,
            branch: branch.to_string(),
        })
    }

    /// Root of the parent repository.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The parsed marker file.
    pub fn config(&self) -> &NotedConfig {
        &self.config
    }

    /// Branch used when repositories are found detached.
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Build a commit request on the configured branch.
    fn request(&self, path: impl Into<PathBuf>, message: impl Into<String>) -> CommitRequest {
        CommitRequest::new(path, message).with_branch(self.branch.clone())
    }

    /// Workspaces registered in `.gitmodules`.
    pub fn workspaces(&self) -> Result<Vec<WorkspaceInfo>> {
        let entries = git::submodule_entries(&self.root).map_err(|e| git_error(&e))?;
        Ok(entries
            .into_iter()
            .map(|entry| {
                let path = entry
                    .path
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(&entry.name));
                let present = self.root.join(&path).join(".git").exists();
                WorkspaceInfo {
                    name: entry.name,
                    path,
                    url: entry.url,
                    present,
                }
            })
            .collect())
    }

    /// Look up a workspace by name.
    fn require_workspace(&self, name: &str) -> Result<WorkspaceInfo> {
        self.workspaces()?
            .into_iter()
            .find(|ws| ws.name == name)
            .ok_or_else(|| NotedError::WorkspaceError {
                name: name.to_string(),
                message: "does not exist".to_string(),
            })
    }

    /// The workspace whose directory contains `path`, if any.
    pub fn workspace_containing(&self, path: &Path) -> Result<Option<WorkspaceInfo>> {
        let path = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        Ok(self
            .workspaces()?
            .into_iter()
            .find(|ws| ws.present && path.starts_with(self.root.join(&ws.path))))
    }

    /// Create a workspace called `name` (or the next free variant) and
    /// register it as a submodule of the parent.
    ///
    /// Parents published to GitHub get a matching `<parent>-<name>` remote
    /// repository for the workspace, which becomes its `origin` and its
    /// submodule URL.
    pub fn add_workspace(&self, name: &str, provider: &dyn RemoteProvider) -> Result<CreatedEntry> {
        validate_name(name).map_err(|message| NotedError::WorkspaceError {
            name: name.to_string(),
            message: message.to_string(),
        })?;

        let mut taken = existing_names(&self.root, None)?;
        for ws in self.workspaces()? {
            taken.insert(ws.path.to_string_lossy().to_string());
            taken.insert(ws.name);
        }
        let name = next_available_name(name, &taken);
        let path = self.root.join(&name);

        fs::create_dir_all(&path)?;
        git::init(&path, &self.branch).map_err(|e| git_error(&e))?;
        fs::write(path.join(README_FILE), templates::workspace_readme(&name))?;
        commit_initial(&path, &format!("Initialize workspace {name}"), &[README_FILE])?;

        let url = if self.config.remote_type == Some(RemoteType::Github) {
            let remote_name = format!("{}-{name}", dir_name(&self.root));
            let url = provider
                .create_repository(&remote_name)
                .map_err(|e| NotedError::RemoteError(format!("{e:#}")))?;
            git::add_remote(&path, ORIGIN, &url).map_err(|e| git_error(&e))?;
            if let RepoStatus::Failed(reason) = push_repository(&path) {
                return Err(NotedError::PushFailed(reason));
            }
            url
        } else {
            format!("./{name}")
        };

        let relative = Path::new(&name);
        git::submodule_add(&self.root, &url, relative).map_err(|e| git_error(&e))?;
        git::absorb_git_dirs(&self.root, relative).map_err(|e| git_error(&e))?;
        info!(workspace = %name, url = %url, "registered workspace");

        let request = self
            .request(self.root.join(GITMODULES_FILE), format!("Add workspace {name}"))
            .with_path(&path);
        let outcome = propagate_commit(&request)?;

        Ok(CreatedEntry {
            name,
            path,
            outcome,
        })
    }

    /// Unregister the workspace `name` and delete its files and history.
    pub fn remove_workspace(&self, name: &str) -> Result<CommitOutcome> {
        let ws = self.require_workspace(name)?;
        let path = self.root.join(&ws.path);

        git::submodule_deinit(&self.root, &ws.path).map_err(|e| git_error(&e))?;
        if path.exists() {
            fs::remove_dir_all(&path)?;
        }
        git::remove_submodule_section(&self.root, &ws.name).map_err(|e| git_error(&e))?;

        let modules = git::git_dir(&self.root)
            .map_err(|e| git_error(&e))?
            .join("modules")
            .join(&ws.name);
        if modules.exists() {
            fs::remove_dir_all(&modules)?;
        }
        info!(workspace = %ws.name, "removed workspace");

        let request = self
            .request(
                self.root.join(GITMODULES_FILE),
                format!("Remove workspace {}", ws.name),
            )
            .with_path(&path);
        propagate_commit(&request)
    }

    /// Resolve `dir` to a directory inside a workspace.
    fn workspace_dir(&self, dir: &Path, what: &str) -> Result<PathBuf> {
        if !dir.is_dir() {
            return Err(NotedError::ContextError(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        if self.workspace_containing(dir)?.is_none() {
            return Err(NotedError::ContextError(format!(
                "{what} can only be created inside a workspace"
            )));
        }
        Ok(fs::canonicalize(dir)?)
    }

    /// Create a folder `name` (or the next free variant) in `dir` with a README.
    pub fn add_folder(&self, dir: &Path, name: &str) -> Result<CreatedEntry> {
        validate_name(name).map_err(|message| NotedError::ContextError(message.to_string()))?;
        let dir = self.workspace_dir(dir, "folders")?;

        let name = next_available_name(name, &existing_names(&dir, None)?);
        let path = dir.join(&name);
        fs::create_dir(&path)?;
        fs::write(path.join(README_FILE), templates::folder_readme(&name))?;

        let outcome = propagate_commit(&self.request(&path, format!("Add folder {name}")))?;
        Ok(CreatedEntry {
            name,
            path,
            outcome,
        })
    }

    /// Create a note `name.md` (or the next free variant) in `dir`.
    pub fn add_note(&self, dir: &Path, name: &str) -> Result<CreatedEntry> {
        let base = name
            .strip_suffix(&format!(".{NOTE_EXTENSION}"))
            .unwrap_or(name);
        validate_name(base).map_err(|message| NotedError::ContextError(message.to_string()))?;
        let dir = self.workspace_dir(dir, "notes")?;

        let mut taken = existing_names(&dir, Some(NOTE_EXTENSION))?;
        // A folder with the same name would make the note path ambiguous
        taken.extend(existing_names(&dir, None)?);
        let name = next_available_name(base, &taken);
        let path = dir.join(format!("{name}.{NOTE_EXTENSION}"));
        fs::write(&path, templates::note(&name, Utc::now()))?;

        let outcome = propagate_commit(&self.request(&path, format!("Add note {name}")))?;
        Ok(CreatedEntry {
            name,
            path,
            outcome,
        })
    }

    /// Commit everything below `path` and cascade to the superprojects.
    pub fn commit(&self, path: &Path, message: &str) -> Result<CommitOutcome> {
        if find_repository_root(path).is_none() {
            return Err(NotedError::NoRepository {
                path: path.to_path_buf(),
            });
        }
        propagate_commit(&self.request(path, message))
    }

    /// Commit every checked-out workspace, then the parent itself.
    pub fn commit_all(&self, message: &str) -> Result<CommitOutcome> {
        let mut outcome = CommitOutcome::default();
        for ws in self.workspaces()?.into_iter().filter(|ws| ws.present) {
            debug!(workspace = %ws.name, "committing workspace");
            outcome.extend(propagate_commit(
                &self.request(self.root.join(&ws.path), message),
            )?);
        }
        outcome.extend(propagate_commit(&self.request(&self.root, message))?);
        Ok(outcome)
    }

    /// Commit `path` as [`Noted::commit`] does, then push every repository touched.
    pub fn upload(&self, path: &Path, message: &str) -> Result<UploadOutcome> {
        let committed = self.commit(path, message)?;
        let pushed = push_all(&committed);
        Ok(UploadOutcome { committed, pushed })
    }

    /// Commit everything as [`Noted::commit_all`] does, then push every repository touched.
    pub fn upload_all(&self, message: &str) -> Result<UploadOutcome> {
        let committed = self.commit_all(message)?;
        let pushed = push_all(&committed);
        Ok(UploadOutcome { committed, pushed })
    }

    /// Change status of the parent and every checked-out workspace.
    pub fn status(&self) -> Result<Vec<RepoChangeStatus>> {
        let mut repos = vec![(dir_name(&self.root), self.root.clone())];
        for ws in self.workspaces()?.into_iter().filter(|ws| ws.present) {
            repos.push((ws.name, self.root.join(ws.path)));
        }

        repos
            .into_iter()
            .map(|(name, path)| {
                let status = change_status(&path).map_err(|e| git_error(&e))?;
                let branch = git::current_branch(&path).map_err(|e| git_error(&e))?;
                Ok(RepoChangeStatus {
                    name,
                    path,
                    branch,
                    status,
                })
            })
            .collect()
    }
}

/// Stage and commit `paths` in a repository that is not yet part of a submodule chain.
fn commit_initial(root: &Path, message: &str, paths: &[&str]) -> Result<()> {
    git::add_paths(root, paths).map_err(|e| git_error(&e))?;
    if git::has_staged_changes(root, paths).map_err(|e| git_error(&e))? {
        git::commit_paths(root, message, paths)
            .map_err(|e| NotedError::CommitFailed(format!("{e:#}")))?;
    }
    Ok(())
}

/// Final path component of `path` as a string.
fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "notes".to_string())
}
