use std::{
    fs,
    path::{self, Path, PathBuf},
};

use crate::marker::MARKER_FILE;

/// Canonicalize `path`, falling back to canonicalizing its parent when the
/// path itself no longer exists (e.g. a deleted note).
///
/// Relative paths are made absolute first so the walk never reaches `""`.
fn normalize(path: &Path) -> PathBuf {
    let path = path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    if let Ok(canonical) = fs::canonicalize(&path) {
        return canonical;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => fs::canonicalize(parent)
            .map(|parent| parent.join(name))
            .unwrap_or_else(|_| path.to_path_buf()),
        _ => path.to_path_buf(),
    }
}

/// Walk up from `start` and return the first directory satisfying `is_root`.
///
/// `start` is canonicalized when possible so callers get stable absolute
/// paths back. A file path starts the walk at the file itself, which never
/// matches a directory predicate, so its parent is effectively the first
/// candidate.
pub fn find_ancestor<F>(start: &Path, is_root: F) -> Option<PathBuf>
where
    F: Fn(&Path) -> bool,
{
    normalize(start)
        .ancestors()
        .find(|candidate| is_root(candidate))
        .map(Path::to_path_buf)
}

/// Walk up from `start_dir` to find the nearest repository root containing `.git`.
///
/// `.git` may be a directory or, for absorbed submodules, a file.
pub fn find_repository_root(start_dir: &Path) -> Option<PathBuf> {
    find_ancestor(start_dir, |dir| dir.join(".git").exists())
}

/// Walk up from `start_dir` to find the nearest directory holding a `.notedconfig` marker.
pub fn find_workspace_tool_root(start_dir: &Path) -> Option<PathBuf> {
    find_ancestor(start_dir, |dir| dir.join(MARKER_FILE).is_file())
}

/// Express `path` relative to `root`, using "." when they are the same directory.
///
/// Returns `None` when `path` lies outside `root`.
pub fn relative_pathspec(root: &Path, path: &Path) -> Option<String> {
    let path = normalize(path);
    let relative = path.strip_prefix(root).ok()?;
    if relative.as_os_str().is_empty() {
        return Some(".".to_string());
    }
    Some(relative.to_string_lossy().replace('\\', "/"))
}

#[cfg(test)]
mod tests {
    use std::process::Command;

    use tempfile::TempDir;

    use super::*;

    fn git_init(dir: &Path) {
        let status = Command::new("git")
            .current_dir(dir)
            .args(["init", "--quiet"])
            .status()
            .unwrap();
        assert!(status.success());
    }

    #[test]
    fn test_find_repository_root() {
        let temp_dir = TempDir::new().unwrap();
        let root_path = fs::canonicalize(temp_dir.path()).unwrap();
        git_init(&root_path);

        assert_eq!(find_repository_root(&root_path), Some(root_path.clone()));

        let nested_dir = root_path.join("src").join("nested");
        fs::create_dir_all(&nested_dir).unwrap();
        assert_eq!(find_repository_root(&nested_dir), Some(root_path.clone()));

        // Files resolve to their containing repository too
        let file = nested_dir.join("note.md");
        fs::write(&file, "# note").unwrap();
        assert_eq!(find_repository_root(&file), Some(root_path));
    }

    #[test]
    fn test_find_repository_root_outside_any_repository() {
        let temp_dir = TempDir::new().unwrap();
        let plain = temp_dir.path().join("plain").join("tree");
        fs::create_dir_all(&plain).unwrap();

        // Only meaningful when the temp dir itself is not inside a repository
        if find_repository_root(temp_dir.path()).is_none() {
            assert_eq!(find_repository_root(&plain), None);
        }
    }

    #[test]
    fn test_missing_relative_path_resolves_absolutely() {
        let missing = Path::new("noted-missing-dir").join("child");
        assert!(normalize(&missing).is_absolute());
        if let Some(root) = find_repository_root(&missing) {
            assert!(root.is_absolute());
            assert_ne!(root, PathBuf::new());
        }
    }

    #[test]
    fn test_find_repository_root_accepts_gitfile() {
        let temp_dir = TempDir::new().unwrap();
        let root_path = fs::canonicalize(temp_dir.path()).unwrap();
        let submodule = root_path.join("workspace");
        fs::create_dir_all(submodule.join("notes")).unwrap();
        fs::write(submodule.join(".git"), "gitdir: ../.git/modules/workspace").unwrap();

        assert_eq!(
            find_repository_root(&submodule.join("notes")),
            Some(submodule)
        );
    }

    #[test]
    fn test_find_workspace_tool_root() {
        let temp_dir = TempDir::new().unwrap();
        let root_path = fs::canonicalize(temp_dir.path()).unwrap();
        let parent = root_path.join("parent");
        let deep = parent.join("workspace").join("folder");
        fs::create_dir_all(&deep).unwrap();

        assert_eq!(find_workspace_tool_root(&deep), None);

        fs::write(parent.join(MARKER_FILE), "{}").unwrap();
        assert_eq!(find_workspace_tool_root(&deep), Some(parent.clone()));
        assert_eq!(find_workspace_tool_root(&parent), Some(parent));
    }

    #[test]
    fn test_find_ancestor_custom_predicate() {
        let temp_dir = TempDir::new().unwrap();
        let root_path = fs::canonicalize(temp_dir.path()).unwrap();
        let deep = root_path.join("a").join("b").join("c");
        fs::create_dir_all(&deep).unwrap();

        let found = find_ancestor(&deep, |dir| dir.file_name().is_some_and(|n| n == "a"));
        assert_eq!(found, Some(root_path.join("a")));
    }

    #[test]
    fn test_relative_pathspec() {
        let temp_dir = TempDir::new().unwrap();
        let root_path = fs::canonicalize(temp_dir.path()).unwrap();
        let nested = root_path.join("work").join("notes");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(relative_pathspec(&root_path, &root_path), Some(".".to_string()));
        assert_eq!(
            relative_pathspec(&root_path, &nested),
            Some("work/notes".to_string())
        );
        assert_eq!(relative_pathspec(&nested, &root_path), None);
    }
}
