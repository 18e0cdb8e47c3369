use super::file::{ChangeKind, FileChange};
use super::hunk::Selection;
use std::fmt;

/// A complete multi-file diff in diff-engine emission order.
///
/// The file order is an observable contract: prompts are issued and derived
/// patches are emitted in exactly this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchSet {
    pub files: Vec<FileChange>,
}

impl PatchSet {
    pub fn new() -> Self {
        PatchSet { files: Vec::new() }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of selected decision units: selected hunks plus file-level
    /// selections that stand on their own (all-or-nothing entries and
    /// rename/copy metadata).
    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.files
            .iter()
            .map(|fc| {
                let hunks = fc
                    .hunks
                    .iter()
                    .filter(|h| h.selection == Selection::Selected)
                    .count();
                let file_level = fc.selection == Selection::Selected
                    && (fc.is_all_or_nothing()
                        || matches!(fc.change_kind, ChangeKind::Renamed | ChangeKind::Copied));
                hunks + usize::from(file_level)
            })
            .sum()
    }
}

impl Default for PatchSet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PatchSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for file in &self.files {
            write!(f, "{}", file)?;
        }
        Ok(())
    }
}
