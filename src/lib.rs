use error_set::error_set;
use std::path::Path;
use std::process::Command;

pub mod apply;
pub mod editor;
pub mod parse;
pub mod patch;
pub mod reconstruct;
pub mod select;

pub use apply::{ApplyError, apply_file_change};
pub use editor::{EditError, EditOutcome, EditorLauncher, ExternalEditor};
pub use parse::{ParseError, parse};
pub use patch::{ChangeKind, FileChange, Hunk, Line, LineKind, PatchSet, Selection};
pub use reconstruct::{SplitPatches, reconstruct};
pub use select::{HELP, Prompter, Response, SessionError, StdPrompter, run_session};

error_set! {
    /// Top-level error for a recording run
    RecordError := {
        #[display("empty commit message")]
        EmptyCommitMessage,
        #[display("no git username configured; set user.name first")]
        NoUsername,
        #[display("cannot record into a merge in progress")]
        MergeInProgress,
        #[display("'{path}' is not tracked")]
        UntrackedPath { path: String },
        #[display("no changes to record")]
        NoChanges,
        #[display("stdin is not a terminal; recording is interactive")]
        NotInteractive,
        #[display("recorded content for '{path}' does not round-trip; nothing committed")]
        RoundTripMismatch { path: String },
        #[display("failed to write reject file: {message}")]
        WriteRejectsFailed { message: String },
        ParseError(ParseError),
        SessionError(SessionError),
        ApplyError(ApplyError),
    } || GitCommandError

    /// Errors from git command execution
    GitCommandError := {
        #[display("Failed to run git diff: {message}")]
        DiffFailed { message: String },
        #[display("git diff failed: {stderr}")]
        DiffExitError { stderr: String },
        #[display("Invalid UTF-8 in git output: {message}")]
        InvalidUtf8 { message: String },
        #[display("Failed to run git config: {message}")]
        ConfigFailed { message: String },
        #[display("Failed to run git ls-files: {message}")]
        LsFilesFailed { message: String },
        #[display("Failed to run git show: {message}")]
        ShowFailed { message: String },
        #[display("git show failed: {stderr}")]
        ShowExitError { stderr: String },
        #[display("Failed to spawn git apply: {message}")]
        ApplySpawnFailed { message: String },
        #[display("Failed to get stdin handle for git apply")]
        ApplyStdinFailed,
        #[display("Failed to write patch to git apply: {message}")]
        ApplyWriteFailed { message: String },
        #[display("Failed to wait for git apply: {message}")]
        ApplyWaitFailed { message: String },
        #[display("git apply failed: {stderr}")]
        ApplyExitError { stderr: String },
        #[display("Failed to run git commit: {message}")]
        CommitFailed { message: String },
        #[display("git commit failed: {stderr}")]
        CommitExitError { stderr: String },
    }
}

/// Guard for the CLI entry point: a session reads responses from stdin
pub fn ensure_interactive() -> Result<(), RecordError> {
    use std::io::IsTerminal;
    if std::io::stdin().is_terminal() {
        Ok(())
    } else {
        Err(RecordError::NotInteractive)
    }
}

/// A file entry with any manual edits undone, reproducing the full
/// working-tree change
fn restore_edits(change: &FileChange) -> FileChange {
    let mut full = change.clone();
    full.selection = Selection::Undecided;
    for hunk in &mut full.hunks {
        if let Some(original) = hunk.original.take() {
            *hunk = original.stripped();
        } else {
            *hunk = hunk.stripped();
        }
    }
    full
}

/// Main interface for recording a subset of working-tree changes as a commit
pub struct Recorder<'a> {
    repo_path: &'a str,
}

impl<'a> Recorder<'a> {
    /// Create a new Recorder for the given repository path
    pub fn new(repo_path: &'a str) -> Self {
        Self { repo_path }
    }

    /// Run one interactive recording session.
    ///
    /// Prompts for every change in the working diff (restricted to `paths`
    /// when non-empty), stages the selected subset, and commits it with
    /// `message`. The unselected remainder stays in the working tree. The
    /// derived patches are returned for inspection.
    ///
    /// # Examples
    /// ```no_run
    /// # use hunk_record::{ExternalEditor, Recorder, StdPrompter};
    /// let recorder = Recorder::new(".");
    /// recorder
    ///     .record("parser: tighten range checks", &[], &mut StdPrompter, &mut ExternalEditor)
    ///     .unwrap();
    /// ```
    pub fn record(
        &self,
        message: &str,
        paths: &[String],
        prompter: &mut dyn Prompter,
        editor: &mut dyn EditorLauncher,
    ) -> Result<SplitPatches, RecordError> {
        if message.trim().is_empty() {
            return Err(RecordError::EmptyCommitMessage);
        }
        self.ensure_username()?;
        self.ensure_no_merge()?;
        for path in paths {
            self.ensure_tracked(path)?;
        }

        let diff_text = self.working_diff(paths)?;
        let mut patch = parse::parse(&diff_text)?;
        if patch.is_empty() {
            return Err(RecordError::NoChanges);
        }

        run_session(&mut patch, prompter, editor)?;

        let split = reconstruct(&patch);
        self.verify_split(&patch, &split)?;

        self.stage_patch(&split.committed.to_string())?;
        self.commit_index(message)?;
        Ok(split)
    }

    fn ensure_username(&self) -> Result<(), RecordError> {
        let output = Command::new("git")
            .args(["-C", self.repo_path, "config", "user.name"])
            .output()
            .map_err(|e| GitCommandError::ConfigFailed {
                message: e.to_string(),
            })?;
        if !output.status.success() || output.stdout.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(RecordError::NoUsername);
        }
        Ok(())
    }

    fn ensure_no_merge(&self) -> Result<(), RecordError> {
        if Path::new(self.repo_path)
            .join(".git")
            .join("MERGE_HEAD")
            .exists()
        {
            return Err(RecordError::MergeInProgress);
        }
        Ok(())
    }

    fn ensure_tracked(&self, path: &str) -> Result<(), RecordError> {
        let output = Command::new("git")
            .args([
                "-C",
                self.repo_path,
                "ls-files",
                "--error-unmatch",
                "--",
                path,
            ])
            .output()
            .map_err(|e| GitCommandError::LsFilesFailed {
                message: e.to_string(),
            })?;
        if !output.status.success() {
            return Err(RecordError::UntrackedPath {
                path: path.to_string(),
            });
        }
        Ok(())
    }

    /// Working-tree diff against the index
    fn working_diff(&self, paths: &[String]) -> Result<String, GitCommandError> {
        let mut args = vec!["-C", self.repo_path, "diff", "--no-ext-diff", "--no-color"];
        if !paths.is_empty() {
            args.push("--");
            args.extend(paths.iter().map(String::as_str));
        }

        let output =
            Command::new("git")
                .args(&args)
                .output()
                .map_err(|e| GitCommandError::DiffFailed {
                    message: e.to_string(),
                })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitCommandError::DiffExitError {
                stderr: stderr.into_owned(),
            });
        }

        String::from_utf8(output.stdout).map_err(|e| GitCommandError::InvalidUtf8 {
            message: e.to_string(),
        })
    }

    /// Index-side content of `path` (the pre-image of the working diff)
    fn base_content(&self, path: &str) -> Result<String, GitCommandError> {
        let rev = format!(":{path}");
        let output = Command::new("git")
            .args(["-C", self.repo_path, "show", &rev])
            .output()
            .map_err(|e| GitCommandError::ShowFailed {
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitCommandError::ShowExitError {
                stderr: stderr.into_owned(),
            });
        }

        String::from_utf8(output.stdout).map_err(|e| GitCommandError::InvalidUtf8 {
            message: e.to_string(),
        })
    }

    /// Check in memory that the committed patch applies to the base and that
    /// committed plus retained reproduces the full working content, before
    /// anything touches the index. Failed hunks land in a `.rej` file.
    fn verify_split(&self, full: &PatchSet, split: &SplitPatches) -> Result<(), RecordError> {
        for committed in &split.committed.files {
            if committed.is_binary || committed.hunks.is_empty() {
                continue;
            }
            let base = if committed.change_kind == ChangeKind::Added {
                String::new()
            } else {
                self.base_content(&committed.old_path)?
            };

            let mid = match apply_file_change(&base, committed) {
                Ok(content) => content,
                Err(err) => {
                    if let ApplyError::HunksFailed { path, reject_text, .. } = &err {
                        let reject_path = Path::new(self.repo_path).join(format!("{path}.rej"));
                        std::fs::write(reject_path, reject_text).map_err(|e| {
                            RecordError::WriteRejectsFailed {
                                message: e.to_string(),
                            }
                        })?;
                    }
                    return Err(err.into());
                }
            };

            let Some(original) = full
                .files
                .iter()
                .find(|f| f.new_path == committed.new_path)
            else {
                continue;
            };
            let expected = apply_file_change(&base, &restore_edits(original))?;

            let end = match split
                .retained
                .files
                .iter()
                .find(|f| f.new_path == committed.new_path)
            {
                Some(retained) => apply_file_change(&mid, retained)?,
                None => mid,
            };
            if end != expected {
                return Err(RecordError::RoundTripMismatch {
                    path: committed.new_path.clone(),
                });
            }
        }
        Ok(())
    }

    /// Apply the committed patch to the git index
    fn stage_patch(&self, patch: &str) -> Result<(), GitCommandError> {
        use std::io::Write;

        let mut child = Command::new("git")
            .args(["-C", self.repo_path, "apply", "--cached", "--unidiff-zero", "-"])
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .spawn()
            .map_err(|e| GitCommandError::ApplySpawnFailed {
                message: e.to_string(),
            })?;

        child
            .stdin
            .take()
            .ok_or(GitCommandError::ApplyStdinFailed)?
            .write_all(patch.as_bytes())
            .map_err(|e| GitCommandError::ApplyWriteFailed {
                message: e.to_string(),
            })?;

        let output = child
            .wait_with_output()
            .map_err(|e| GitCommandError::ApplyWaitFailed {
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitCommandError::ApplyExitError {
                stderr: stderr.into_owned(),
            });
        }

        Ok(())
    }

    fn commit_index(&self, message: &str) -> Result<(), GitCommandError> {
        let output = Command::new("git")
            .args(["-C", self.repo_path, "commit", "-m", message])
            .output()
            .map_err(|e| GitCommandError::CommitFailed {
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitCommandError::CommitExitError {
                stderr: stderr.into_owned(),
            });
        }

        Ok(())
    }
}
