use chrono::{DateTime, Utc};

/// File name used for the README of every repository and folder.
pub const README_FILE: &str = "README.md";

/// Extension given to notes.
pub const NOTE_EXTENSION: &str = "md";

/// README of a freshly initialised parent repository.
pub fn parent_readme(name: &str) -> String {
    format!(
        "# {name}\n\n\
         Notes managed with noted.\n\n\
         Each workspace is a Git submodule of this repository. Use\n\
         `noted workspace add <name>` to create one.\n"
    )
}

/// README of a new workspace.
pub fn workspace_readme(name: &str) -> String {
    format!(
        "# {name}\n\n\
         Workspace managed with noted. Add folders with `noted folder add`\n\
         and notes with `noted note add`.\n"
    )
}

/// README placed in a new folder.
pub fn folder_readme(name: &str) -> String {
    format!("# {name}\n")
}

/// Body of a new note.
pub fn note(title: &str, created: DateTime<Utc>) -> String {
    format!("# {title}\n\nCreated: {}\n\n", created.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn note_has_title_and_date() {
        let created = Utc.with_ymd_and_hms(2024, 3, 9, 12, 30, 0).unwrap();
        let body = note("Standup", created);
        assert!(body.starts_with("# Standup\n"));
        assert!(body.contains("Created: 2024-03-09"));
    }

    #[test]
    fn readmes_start_with_heading() {
        assert!(parent_readme("notes").starts_with("# notes\n"));
        assert!(workspace_readme("work").starts_with("# work\n"));
        assert_eq!(folder_readme("ideas"), "# ideas\n");
    }
}
