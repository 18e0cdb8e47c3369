//! The interactive selection session.
//!
//! Files are visited in diff order. Every entry gets an examine prompt;
//! answering `y` on a hunked file descends into per-hunk prompts, while
//! all-or-nothing entries (binary, mode-only, pure rename/copy) are decided
//! entirely at the file prompt. The `a` and `d` responses flip the session
//! into a sticky mode that resolves everything that follows without further
//! prompting.
//!
//! I/O goes through the [`Prompter`] and
//! [`EditorLauncher`](crate::editor::EditorLauncher) seams so sessions can
//! be driven by scripted tests.

use crate::editor::{EditError, EditOutcome, EditorLauncher, edit_hunk};
use crate::parse::ParseError;
use crate::patch::{FileChange, PatchSet, Selection};
use error_set::error_set;
use std::io::{self, BufRead, Write};

error_set! {
    /// Ways an interactive session can end without a usable selection
    SessionError := {
        #[display("user quit; nothing recorded")]
        UserQuit,
        #[display("no changes selected")]
        NoChangesSelected,
        /// Input ended or was unrecognized where a response was required
        #[display("response expected")]
        ResponseExpected,
        #[display("prompt i/o failed: {message}")]
        PromptIo { message: String },
        #[display("editor i/o failed: {message}")]
        EditorIo { message: String },
        ParseError(ParseError),
    }
}

impl From<EditError> for SessionError {
    fn from(err: EditError) -> Self {
        match err {
            EditError::EditorIo { message } => SessionError::EditorIo { message },
            EditError::ParseError(e) => SessionError::ParseError(e),
        }
    }
}

/// One-letter response to a session prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Yes,
    No,
    Edit,
    SkipFile,
    FileRest,
    Done,
    All,
    Quit,
    Help,
}

impl Response {
    /// Parse a raw input line; whitespace is trimmed and case ignored
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "y" => Some(Response::Yes),
            "n" => Some(Response::No),
            "e" => Some(Response::Edit),
            "s" => Some(Response::SkipFile),
            "f" => Some(Response::FileRest),
            "d" => Some(Response::Done),
            "a" => Some(Response::All),
            "q" => Some(Response::Quit),
            "?" => Some(Response::Help),
            _ => None,
        }
    }
}

/// Help text printed for `?`
pub const HELP: &str = "\
y - record this change
n - skip this change
e - edit this change manually
s - skip remaining changes to this file
f - record remaining changes to this file
d - done, skip remaining changes and files
a - record all changes to all remaining files
q - quit, recording no changes
? - display help
";

/// Interaction seam for sessions.
pub trait Prompter {
    /// Display text (diff content, help) without expecting a reply
    fn show(&mut self, text: &str) -> io::Result<()>;
    /// Display a prompt and read one reply line; `None` means end of input
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

/// [`Prompter`] over stdin/stdout
pub struct StdPrompter;

impl Prompter for StdPrompter {
    fn show(&mut self, text: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(text.as_bytes())?;
        out.flush()
    }

    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.show(prompt)?;
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

/// Sticky session mode set by `a` and `d`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Ask,
    AcceptAll,
    Done,
}

/// Run the interactive session, recording a decision on every hunk and file
/// entry of `patch`.
///
/// Fails with [`SessionError::NoChangesSelected`] when the session finishes
/// without selecting anything, and with [`SessionError::UserQuit`] on `q`.
pub fn run_session(
    patch: &mut PatchSet,
    prompter: &mut dyn Prompter,
    editor: &mut dyn EditorLauncher,
) -> Result<(), SessionError> {
    let mut mode = Mode::Ask;
    for file in &mut patch.files {
        match mode {
            Mode::Ask => mode = visit_file(file, prompter, editor)?,
            Mode::AcceptAll => select_whole_file(file),
            Mode::Done => reject_whole_file(file),
        }
    }
    if patch.selected_count() == 0 {
        return Err(SessionError::NoChangesSelected);
    }
    Ok(())
}

fn select_whole_file(file: &mut FileChange) {
    file.selection = Selection::Selected;
    for hunk in &mut file.hunks {
        hunk.selection = Selection::Selected;
    }
}

fn reject_whole_file(file: &mut FileChange) {
    file.selection = Selection::Rejected;
    for hunk in &mut file.hunks {
        hunk.selection = Selection::Rejected;
    }
}

fn show(prompter: &mut dyn Prompter, text: &str) -> Result<(), SessionError> {
    prompter.show(text).map_err(|e| SessionError::PromptIo {
        message: e.to_string(),
    })
}

/// Prompt until a non-help response arrives. `?` redisplays the help text
/// and the identical prompt.
fn read_response(
    prompter: &mut dyn Prompter,
    prompt: &str,
) -> Result<Response, SessionError> {
    loop {
        let line = prompter.ask(prompt).map_err(|e| SessionError::PromptIo {
            message: e.to_string(),
        })?;
        let Some(line) = line else {
            return Err(SessionError::ResponseExpected);
        };
        match Response::parse(&line) {
            Some(Response::Help) => show(prompter, HELP)?,
            Some(response) => return Ok(response),
            None => return Err(SessionError::ResponseExpected),
        }
    }
}

fn visit_file(
    file: &mut FileChange,
    prompter: &mut dyn Prompter,
    editor: &mut dyn EditorLauncher,
) -> Result<Mode, SessionError> {
    show(prompter, &file.header_text())?;
    let prompt = format!("examine changes to '{}'? [Ynesfdaq?] ", file.path());

    match read_response(prompter, &prompt)? {
        Response::Yes => {
            file.selection = Selection::Selected;
            if file.is_all_or_nothing() {
                Ok(Mode::Ask)
            } else {
                visit_hunks(file, prompter, editor)
            }
        }
        Response::No | Response::SkipFile => {
            reject_whole_file(file);
            Ok(Mode::Ask)
        }
        Response::FileRest => {
            select_whole_file(file);
            Ok(Mode::Ask)
        }
        Response::Edit => Err(SessionError::ParseError(
            ParseError::WholeFileEditNotSupported,
        )),
        Response::Done => {
            reject_whole_file(file);
            Ok(Mode::Done)
        }
        Response::All => {
            select_whole_file(file);
            Ok(Mode::AcceptAll)
        }
        Response::Quit => Err(SessionError::UserQuit),
        // read_response never yields Help
        Response::Help => Ok(Mode::Ask),
    }
}

fn visit_hunks(
    file: &mut FileChange,
    prompter: &mut dyn Prompter,
    editor: &mut dyn EditorLauncher,
) -> Result<Mode, SessionError> {
    let total = file.hunks.len();
    let mut idx = 0;

    while idx < file.hunks.len() {
        show(prompter, &file.hunks[idx].to_string())?;
        let prompt = if total == 1 {
            format!("record this change to '{}'? [Ynesfdaq?] ", file.path())
        } else {
            format!(
                "record change {}/{} to '{}'? [Ynesfdaq?] ",
                idx + 1,
                total,
                file.path()
            )
        };

        match read_response(prompter, &prompt)? {
            Response::Yes => {
                file.hunks[idx].selection = Selection::Selected;
                idx += 1;
            }
            Response::No => {
                file.hunks[idx].selection = Selection::Rejected;
                idx += 1;
            }
            Response::Edit => match edit_hunk(file, &file.hunks[idx], editor)? {
                EditOutcome::Replaced(mut edited) => {
                    // An edit that leaves no changes drops the hunk; the
                    // retained patch restores its pre-edit content
                    edited.selection = if edited.is_noop() {
                        Selection::Rejected
                    } else {
                        Selection::Selected
                    };
                    file.hunks[idx] = edited;
                    idx += 1;
                }
                // Abandoned edit re-prompts the same hunk
                EditOutcome::Discarded => {}
            },
            Response::SkipFile => {
                for hunk in &mut file.hunks[idx..] {
                    hunk.selection = Selection::Rejected;
                }
                return Ok(Mode::Ask);
            }
            Response::FileRest => {
                for hunk in &mut file.hunks[idx..] {
                    hunk.selection = Selection::Selected;
                }
                return Ok(Mode::Ask);
            }
            Response::Done => {
                for hunk in &mut file.hunks[idx..] {
                    hunk.selection = Selection::Rejected;
                }
                return Ok(Mode::Done);
            }
            Response::All => {
                for hunk in &mut file.hunks[idx..] {
                    hunk.selection = Selection::Selected;
                }
                return Ok(Mode::AcceptAll);
            }
            Response::Quit => return Err(SessionError::UserQuit),
            Response::Help => {}
        }
    }

    Ok(Mode::Ask)
}
