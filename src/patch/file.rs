use super::hunk::{Hunk, Selection};
use std::fmt;

/// How a file entry changed between the two sides of the diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
    Renamed,
    Copied,
}

/// One file entry in a multi-file diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    /// Path on the old side (`a/` header); equals `new_path` unless renamed/copied
    pub old_path: String,
    /// Path on the new side (`b/` header)
    pub new_path: String,
    pub change_kind: ChangeKind,
    /// Old file mode (type + permission bits, octal), when the diff carries one
    pub old_mode: Option<u32>,
    pub new_mode: Option<u32>,
    pub is_binary: bool,
    pub hunks: Vec<Hunk>,
    /// File-level decision; meaningful for all-or-nothing entries and for the
    /// rename/copy metadata of entries that also carry hunks
    pub selection: Selection,
}

impl FileChange {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        FileChange {
            old_path: path.clone(),
            new_path: path,
            change_kind: ChangeKind::Modified,
            old_mode: None,
            new_mode: None,
            is_binary: false,
            hunks: Vec::new(),
            selection: Selection::Undecided,
        }
    }

    /// Path shown to the user: the surviving side of the change
    #[must_use]
    pub fn path(&self) -> &str {
        match self.change_kind {
            ChangeKind::Removed => &self.old_path,
            _ => &self.new_path,
        }
    }

    /// Binary and hunk-less (mode-only, pure rename/copy) entries cannot be
    /// partially selected
    #[must_use]
    pub fn is_all_or_nothing(&self) -> bool {
        self.is_binary || self.hunks.is_empty()
    }

    #[must_use]
    pub fn is_mode_only(&self) -> bool {
        !self.is_binary
            && self.hunks.is_empty()
            && self.change_kind == ChangeKind::Modified
            && self.old_mode != self.new_mode
    }

    /// Render the file header lines (everything up to the first hunk)
    #[must_use]
    pub fn header_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "diff --git a/{} b/{}\n",
            self.old_path, self.new_path
        ));

        match self.change_kind {
            ChangeKind::Added => {
                if let Some(mode) = self.new_mode {
                    out.push_str(&format!("new file mode {:06o}\n", mode));
                }
            }
            ChangeKind::Removed => {
                if let Some(mode) = self.old_mode {
                    out.push_str(&format!("deleted file mode {:06o}\n", mode));
                }
            }
            ChangeKind::Renamed => {
                out.push_str(&format!("rename from {}\n", self.old_path));
                out.push_str(&format!("rename to {}\n", self.new_path));
            }
            ChangeKind::Copied => {
                out.push_str(&format!("copy from {}\n", self.old_path));
                out.push_str(&format!("copy to {}\n", self.new_path));
            }
            ChangeKind::Modified => {}
        }

        // Mode transition for entries that keep their identity
        if !matches!(self.change_kind, ChangeKind::Added | ChangeKind::Removed)
            && let (Some(old_mode), Some(new_mode)) = (self.old_mode, self.new_mode)
            && old_mode != new_mode
        {
            out.push_str(&format!("old mode {:06o}\n", old_mode));
            out.push_str(&format!("new mode {:06o}\n", new_mode));
        }

        if self.is_binary {
            out.push_str(&format!(
                "Binary files a/{} and b/{} differ\n",
                self.old_path, self.new_path
            ));
        } else if !self.hunks.is_empty() {
            match self.change_kind {
                ChangeKind::Added => out.push_str("--- /dev/null\n"),
                _ => out.push_str(&format!("--- a/{}\n", self.old_path)),
            }
            match self.change_kind {
                ChangeKind::Removed => out.push_str("+++ /dev/null\n"),
                _ => out.push_str(&format!("+++ b/{}\n", self.new_path)),
            }
        }

        out
    }
}

impl fmt::Display for FileChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header_text())?;
        for hunk in &self.hunks {
            write!(f, "{}", hunk)?;
        }
        Ok(())
    }
}
