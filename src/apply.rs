//! In-memory application of a file's hunks to its base content.
//!
//! This is the verification half of the pipeline: after a session splits the
//! working diff, each derived patch is re-applied to the pre-image here and
//! the result compared against the expected content before anything touches
//! the repository. Hunks that do not match the base are collected into
//! reject text in the same format `git apply --reject` uses.

use crate::patch::{FileChange, Hunk};
use error_set::error_set;

error_set! {
    /// Errors from applying a file entry to its base content
    ApplyError := {
        /// Binary entries carry no hunks and cannot be applied in memory
        #[display("cannot apply binary change to '{path}' in memory")]
        Binary { path: String },
        /// One or more hunks did not match the base content
        #[display("{failed} of {total} hunks failed to apply to '{path}'")]
        HunksFailed {
            path: String,
            failed: usize,
            total: usize,
            /// The failed hunks rendered as a standalone patch, suitable for
            /// writing to a `.rej` file
            reject_text: String,
        },
    }
}

/// True when every old-side line of the hunk matches the base at `anchor`
fn old_side_matches(base: &[&str], anchor: usize, hunk: &Hunk) -> bool {
    let mut pos = anchor;
    for line in hunk.lines.iter().filter(|l| l.on_old_side()) {
        match base.get(pos) {
            Some(text) if *text == line.text => pos += 1,
            _ => return false,
        }
    }
    true
}

/// Apply every hunk of `change` to `base`, returning the patched content.
///
/// Hunks are taken in file order with their recorded coordinates; a hunk
/// whose old side does not match the base at its anchor is skipped and
/// reported through [`ApplyError::HunksFailed`] together with any hunks that
/// did apply (the partial result is discarded by callers on error).
pub fn apply_file_change(base: &str, change: &FileChange) -> Result<String, ApplyError> {
    if change.is_binary {
        return Err(ApplyError::Binary {
            path: change.path().to_string(),
        });
    }

    let base_lines: Vec<&str> = base.lines().collect();
    let base_ends_with_newline = base.is_empty() || base.ends_with('\n');

    // (text, has trailing newline)
    let mut out: Vec<(String, bool)> = Vec::new();
    let mut cursor = 0usize;
    let mut failed: Vec<Hunk> = Vec::new();

    let copy_base = |out: &mut Vec<(String, bool)>, range: std::ops::Range<usize>| {
        for (i, text) in base_lines[range.clone()].iter().enumerate() {
            let is_last_base_line = range.start + i + 1 == base_lines.len();
            out.push((
                (*text).to_string(),
                base_ends_with_newline || !is_last_base_line,
            ));
        }
    };

    for hunk in &change.hunks {
        // old_start is 1-based; a zero-length old side anchors *after* the
        // named line
        let anchor = if hunk.old_len == 0 {
            hunk.old_start as usize
        } else {
            (hunk.old_start as usize).saturating_sub(1)
        };
        let end = anchor + hunk.old_len as usize;

        if anchor < cursor || end > base_lines.len() || !old_side_matches(&base_lines, anchor, hunk)
        {
            failed.push(hunk.stripped());
            continue;
        }

        copy_base(&mut out, cursor..anchor);
        for line in hunk.new_side_lines() {
            out.push((line.text.clone(), !line.no_trailing_newline));
        }
        cursor = end;
    }

    copy_base(&mut out, cursor..base_lines.len());

    if !failed.is_empty() {
        let mut reject_text = change.header_text();
        for hunk in &failed {
            reject_text.push_str(&hunk.to_string());
        }
        return Err(ApplyError::HunksFailed {
            path: change.path().to_string(),
            failed: failed.len(),
            total: change.hunks.len(),
            reject_text,
        });
    }

    let mut result = String::new();
    for (text, newline) in out {
        result.push_str(&text);
        if newline {
            result.push('\n');
        }
    }
    Ok(result)
}
