//! Manual hunk editing through an external editor.
//!
//! The hunk is written to a temporary file together with a commented guide,
//! the user's editor is launched on it, and the result is re-parsed in
//! single-hunk mode. A non-zero editor exit discards the edit. Range counts
//! are recomputed from the edited body, so the user never has to fix the
//! `@@` header by hand.

use crate::parse::{self, ParseError};
use crate::patch::{FileChange, Hunk};
use error_set::error_set;
use std::env;
use std::io::{self, Read, Write};
use std::process::Command;

error_set! {
    /// Errors from a manual hunk edit
    EditError := {
        #[display("editor i/o failed: {message}")]
        EditorIo { message: String },
        ParseError(ParseError),
    }
}

/// Result of one editor invocation
pub enum EditorExit {
    /// Editor exited zero; carries the saved file content
    Accepted(String),
    /// Editor exited non-zero; the edit is abandoned
    Refused,
}

/// Seam for launching an editor on a piece of text.
///
/// Sessions under test substitute a scripted implementation; production code
/// uses [`ExternalEditor`].
pub trait EditorLauncher {
    fn launch(&mut self, text: &str) -> io::Result<EditorExit>;
}

/// Launches `$VISUAL`, `$EDITOR`, or `vi` on a temporary `.diff` file
pub struct ExternalEditor;

impl EditorLauncher for ExternalEditor {
    fn launch(&mut self, text: &str) -> io::Result<EditorExit> {
        let mut file = tempfile::Builder::new()
            .prefix("hunk-record-")
            .suffix(".diff")
            .tempfile()?;
        file.write_all(text.as_bytes())?;
        file.flush()?;

        let editor = env::var("VISUAL")
            .or_else(|_| env::var("EDITOR"))
            .unwrap_or_else(|_| "vi".to_string());
        let status = Command::new("sh")
            .arg("-c")
            .arg(format!("{} '{}'", editor, file.path().display()))
            .status()?;
        if !status.success() {
            return Ok(EditorExit::Refused);
        }

        let mut edited = String::new();
        std::fs::File::open(file.path())?.read_to_string(&mut edited)?;
        Ok(EditorExit::Accepted(edited))
    }
}

/// What became of an edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The edited hunk, with its pre-edit version stashed in
    /// [`Hunk::original`]
    Replaced(Hunk),
    /// The editor exited non-zero; nothing changed
    Discarded,
}

/// Text presented to the editor: the hunk framed by its file paths plus a
/// commented quick guide
#[must_use]
pub fn hunk_edit_text(change: &FileChange, hunk: &Hunk) -> String {
    format!(
        "# Manual hunk edit mode -- see bottom for a quick guide.\n\
         --- a/{}\n\
         +++ b/{}\n\
         {}\
         # ---\n\
         # To remove '-' lines, make them ' ' lines (context).\n\
         # To remove '+' lines, delete them.\n\
         # Lines starting with # will be removed.\n\
         # If the edit leaves the hunk with no changes, it is dropped.\n\
         # Exiting the editor with a non-zero status abandons the edit.\n",
        change.old_path, change.new_path, hunk
    )
}

/// Run one manual edit of `hunk` and return its replacement.
///
/// The replacement keeps the *first* pre-edit hunk across repeated edits so
/// the unselected remainder can always be restored from it.
pub fn edit_hunk(
    change: &FileChange,
    hunk: &Hunk,
    launcher: &mut dyn EditorLauncher,
) -> Result<EditOutcome, EditError> {
    let text = hunk_edit_text(change, hunk);
    let exit = launcher.launch(&text).map_err(|e| EditError::EditorIo {
        message: e.to_string(),
    })?;
    let edited_text = match exit {
        EditorExit::Accepted(content) => content,
        EditorExit::Refused => return Ok(EditOutcome::Discarded),
    };

    // Lengths come from the edited body; the start coordinates are trusted
    // from the header, which the user is told to leave alone
    let mut edited = parse::parse_edited_hunk(&edited_text)?;
    edited.old_len = edited.counted_old();
    edited.new_len = edited.counted_new();
    edited.section = hunk.section.clone();
    edited.original = match &hunk.original {
        Some(first) => Some(first.clone()),
        None => Some(Box::new(hunk.stripped())),
    };
    Ok(EditOutcome::Replaced(edited))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::Line;
    use similar_asserts::assert_eq;

    struct Scripted {
        exit: Option<EditorExit>,
    }

    impl Scripted {
        fn accepting(content: &str) -> Self {
            Scripted {
                exit: Some(EditorExit::Accepted(content.to_string())),
            }
        }

        fn refusing() -> Self {
            Scripted {
                exit: Some(EditorExit::Refused),
            }
        }
    }

    impl EditorLauncher for Scripted {
        fn launch(&mut self, _text: &str) -> io::Result<EditorExit> {
            match self.exit.take() {
                Some(exit) => Ok(exit),
                None => Err(io::Error::other("editor script exhausted")),
            }
        }
    }

    fn sample() -> (FileChange, Hunk) {
        let change = FileChange::new("f.txt");
        let mut hunk = Hunk::new(5, 1, 5, 2);
        hunk.lines = vec![
            Line::removed("five"),
            Line::added("FIVE"),
            Line::added("FIVE AND A HALF"),
        ];
        (change, hunk)
    }

    #[test]
    fn edit_text_frames_hunk_with_guide() {
        let (change, hunk) = sample();
        let text = hunk_edit_text(&change, &hunk);
        assert!(text.starts_with("# Manual hunk edit mode"));
        assert!(text.contains("--- a/f.txt\n+++ b/f.txt\n@@ -5 +5,2 @@\n"));
        assert!(text.ends_with("abandons the edit.\n"));
    }

    #[test]
    fn accepted_edit_replaces_hunk_and_keeps_original() {
        let (change, hunk) = sample();
        let mut launcher = Scripted::accepting(
            "--- a/f.txt\n+++ b/f.txt\n@@ -5 +5,2 @@\n-five\n+FIVE\n",
        );

        let outcome = edit_hunk(&change, &hunk, &mut launcher).unwrap();
        let EditOutcome::Replaced(edited) = outcome else {
            panic!("expected replacement");
        };
        // Counts come from the edited body, not the stale header
        assert_eq!(edited.new_len, 1);
        assert_eq!(edited.old_start, 5);
        assert_eq!(edited.original.as_deref(), Some(&hunk.stripped()));
    }

    #[test]
    fn refused_edit_is_discarded() {
        let (change, hunk) = sample();
        let mut launcher = Scripted::refusing();
        assert_eq!(
            edit_hunk(&change, &hunk, &mut launcher).unwrap(),
            EditOutcome::Discarded
        );
    }

    #[test]
    fn repeated_edits_keep_the_first_original() {
        let (change, hunk) = sample();
        let mut launcher =
            Scripted::accepting("@@ -5 +5,2 @@\n-five\n+FIVE\n");
        let EditOutcome::Replaced(once) = edit_hunk(&change, &hunk, &mut launcher).unwrap() else {
            panic!("expected replacement");
        };

        let mut launcher = Scripted::accepting("@@ -5 +5,2 @@\n-five\n+V\n");
        let EditOutcome::Replaced(twice) = edit_hunk(&change, &once, &mut launcher).unwrap() else {
            panic!("expected replacement");
        };
        assert_eq!(twice.original.as_deref(), Some(&hunk.stripped()));
    }

    #[test]
    fn guide_comments_do_not_leak_into_the_hunk() {
        let (change, hunk) = sample();
        let mut launcher = Scripted::accepting(&hunk_edit_text(&change, &hunk));

        let EditOutcome::Replaced(edited) = edit_hunk(&change, &hunk, &mut launcher).unwrap()
        else {
            panic!("expected replacement");
        };
        assert_eq!(edited.stripped(), hunk.stripped());
    }

    #[test]
    fn malformed_edit_surfaces_parse_error() {
        let (change, hunk) = sample();
        let mut launcher = Scripted::accepting("@@ -5 +5,2 @@\n-five\n+FIVE\nloose text\n");
        assert!(matches!(
            edit_hunk(&change, &hunk, &mut launcher).unwrap_err(),
            EditError::ParseError(ParseError::UnhandledTransition { .. })
        ));
    }

    #[test]
    fn editor_failure_surfaces_io_error() {
        let (change, hunk) = sample();
        let mut launcher = Scripted { exit: None };
        assert!(matches!(
            edit_hunk(&change, &hunk, &mut launcher).unwrap_err(),
            EditError::EditorIo { .. }
        ));
    }
}
