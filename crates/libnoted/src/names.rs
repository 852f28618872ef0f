use std::{collections::HashSet, fs, io, path::Path};

/// Validate a user-supplied name for a workspace, folder, or note.
///
/// Names become single path components, so separators and the special
/// entries `.` and `..` are rejected, as are names starting with `.`.
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("names cannot be empty");
    }
    if name.contains(['/', '\\']) {
        return Err("names cannot contain path separators");
    }
    if name.starts_with('.') {
        return Err("names cannot start with '.'");
    }
    Ok(())
}

/// Return `base` if unused, otherwise the first of `base-1`, `base-2`, ... not in `existing`.
pub fn next_available_name(base: &str, existing: &HashSet<String>) -> String {
    if !existing.contains(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !existing.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}

/// Names of the entries in `dir`, with `extension` stripped from files that carry it.
///
/// With `extension` set, only files with that extension are collected;
/// without it, every entry is.
pub fn existing_names(dir: &Path, extension: Option<&str>) -> io::Result<HashSet<String>> {
    let mut names = HashSet::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        match extension {
            Some(ext) => {
                if path.is_file()
                    && path.extension().is_some_and(|e| e == ext)
                    && let Some(stem) = path.file_stem()
                {
                    names.insert(stem.to_string_lossy().to_string());
                }
            }
            None => {
                names.insert(entry.file_name().to_string_lossy().to_string());
            }
        }
    }
    Ok(names)
}
