//! Splitting a decided diff into two derived patches.
//!
//! After a session every hunk and file entry carries a decision. This module
//! turns that into the `committed` patch (selected changes, coordinates
//! rebased against the unmodified base) and the `retained` patch (everything
//! else, coordinates rebased against the content the committed patch
//! produces). Applying `committed` and then `retained` always reproduces the
//! full working-tree content; the property tests below pin that law down.
//!
//! An undecided hunk counts as rejected. Hunks the user edited carry their
//! pre-edit text in [`Hunk::original`]; a rejected edit restores that text
//! to the retained patch, and a selected edit leaves its uncommitted
//! remainder behind as a synthesized follow-up hunk.

use crate::patch::{ChangeKind, FileChange, Hunk, Line, PatchSet, Selection};

/// The two derived patches of one session.
#[derive(Debug, Clone)]
pub struct SplitPatches {
    /// Selected changes, applies to the unmodified base content
    pub committed: PatchSet,
    /// Unselected changes, applies on top of `committed`
    pub retained: PatchSet,
}

/// Split a decided patch into its committed and retained halves.
#[must_use]
pub fn reconstruct(patch: &PatchSet) -> SplitPatches {
    let mut committed = PatchSet::new();
    let mut retained = PatchSet::new();

    for change in &patch.files {
        let (c, r) = split_file(change);
        if let Some(c) = c {
            committed.files.push(c);
        }
        if let Some(r) = r {
            retained.files.push(r);
        }
    }

    SplitPatches {
        committed,
        retained,
    }
}

fn is_selected(selection: Selection) -> bool {
    selection == Selection::Selected
}

/// Clone an entry with all session state cleared
fn whole_entry(change: &FileChange) -> FileChange {
    let mut clean = change.clone();
    clean.selection = Selection::Undecided;
    for hunk in &mut clean.hunks {
        *hunk = hunk.stripped();
    }
    clean
}

/// Shift a 1-based start by the accumulated delta of earlier committed hunks
fn shift_start(start: u32, delta: i64) -> u32 {
    u32::try_from(i64::from(start) + delta).unwrap_or(0)
}

/// New-side start of a committed hunk, honoring the zero-length anchor
/// conventions (`old_len == 0` anchors after the named line, `new_len == 0`
/// before it)
fn shifted_new_start(hunk: &Hunk, delta: i64) -> u32 {
    let base = i64::from(hunk.old_start) + delta;
    let shifted = if hunk.old_len == 0 {
        base + 1
    } else if hunk.new_len == 0 {
        base - 1
    } else {
        base
    };
    u32::try_from(shifted).unwrap_or(0)
}

fn new_sides_equal(a: &Hunk, b: &Hunk) -> bool {
    let left: Vec<_> = a
        .new_side_lines()
        .map(|l| (&l.text, l.no_trailing_newline))
        .collect();
    let right: Vec<_> = b
        .new_side_lines()
        .map(|l| (&l.text, l.no_trailing_newline))
        .collect();
    left == right
}

/// 0-based index of the first base line a hunk's region covers
fn anchor0(hunk: &Hunk) -> u32 {
    if hunk.old_len == 0 {
        hunk.old_start
    } else {
        hunk.old_start.saturating_sub(1)
    }
}

/// Follow-up hunk that rewrites a committed edited hunk's content into the
/// original working-tree content.
///
/// The edited hunk may cover less of the base than the original did (dropped
/// context, trimmed lines), so its replacement is spliced into the
/// original's old side to reproduce the committed state of the whole region.
fn bridge_hunk(edited: &Hunk, original: &Hunk, delta_before: i64) -> Hunk {
    let base_lines: Vec<&Line> = original.lines.iter().filter(|l| l.on_old_side()).collect();
    let offset = (anchor0(edited).saturating_sub(anchor0(original)) as usize).min(base_lines.len());
    let splice_end = (offset + edited.old_len as usize).min(base_lines.len());

    let mut committed_region: Vec<(String, bool)> = Vec::new();
    for line in &base_lines[..offset] {
        committed_region.push((line.text.clone(), line.no_trailing_newline));
    }
    for line in edited.new_side_lines() {
        committed_region.push((line.text.clone(), line.no_trailing_newline));
    }
    for line in &base_lines[splice_end..] {
        committed_region.push((line.text.clone(), line.no_trailing_newline));
    }

    let old_len = committed_region.len() as u32;
    let committed_start0 = u32::try_from(i64::from(anchor0(original)) + delta_before).unwrap_or(0);
    let old_start = if old_len == 0 {
        committed_start0
    } else {
        committed_start0 + 1
    };

    let mut bridge = Hunk::new(old_start, old_len, original.new_start, original.new_len);
    bridge.section = original.section.clone();
    for (text, no_newline) in committed_region {
        let mut removed = Line::removed(text);
        removed.no_trailing_newline = no_newline;
        bridge.lines.push(removed);
    }
    for line in original.new_side_lines() {
        let mut added = Line::added(line.text.clone());
        added.no_trailing_newline = line.no_trailing_newline;
        bridge.lines.push(added);
    }
    bridge
}

/// Change kind of the committed entry. A partially committed deletion is no
/// longer a deletion.
fn committed_kind(change: &FileChange, taken_all_unedited: bool) -> ChangeKind {
    match change.change_kind {
        ChangeKind::Removed if !taken_all_unedited => ChangeKind::Modified,
        kind => kind,
    }
}

fn split_file(change: &FileChange) -> (Option<FileChange>, Option<FileChange>) {
    if change.is_all_or_nothing() {
        let clean = whole_entry(change);
        return if is_selected(change.selection) {
            (Some(clean), None)
        } else {
            (None, Some(clean))
        };
    }

    let mut committed_hunks: Vec<Hunk> = Vec::new();
    let mut retained_hunks: Vec<Hunk> = Vec::new();
    let mut delta_selected = 0i64;
    let mut taken_all_unedited = true;

    for hunk in &change.hunks {
        let selected = is_selected(hunk.selection) && !hunk.is_noop();
        if selected {
            if hunk.original.is_some() {
                taken_all_unedited = false;
            }
            let mut taken = hunk.stripped();
            taken.new_start = shifted_new_start(hunk, delta_selected);
            committed_hunks.push(taken);
            if let Some(original) = hunk.original.as_deref()
                && !new_sides_equal(hunk, original)
            {
                retained_hunks.push(bridge_hunk(hunk, original, delta_selected));
            }
            delta_selected += hunk.delta();
        } else {
            taken_all_unedited = false;
            // A rejected edit restores the pre-edit hunk
            let source = hunk.original.as_deref().unwrap_or(hunk);
            let mut kept = source.stripped();
            kept.old_start = shift_start(source.old_start, delta_selected);
            retained_hunks.push(kept);
        }
    }

    // Rename/copy metadata stands on its own: it can be committed even when
    // every hunk was rejected
    let metadata_selected = is_selected(change.selection)
        && matches!(change.change_kind, ChangeKind::Renamed | ChangeKind::Copied);
    let committed = if committed_hunks.is_empty() && !metadata_selected {
        None
    } else {
        let mut entry = FileChange::new(change.new_path.clone());
        entry.old_path.clone_from(&change.old_path);
        entry.change_kind = committed_kind(change, taken_all_unedited);
        entry.old_mode = change.old_mode;
        entry.new_mode = change.new_mode;
        entry.hunks = committed_hunks;
        Some(entry)
    };

    let retained = if retained_hunks.is_empty() {
        None
    } else if committed.is_some() {
        // The commit already created/renamed the file and applied any mode
        // change; what remains is a plain modification of the new path
        let mut entry = FileChange::new(change.new_path.clone());
        entry.hunks = retained_hunks;
        Some(entry)
    } else {
        let mut entry = whole_entry(change);
        entry.hunks = retained_hunks;
        Some(entry)
    };

    (committed, retained)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apply::apply_file_change;
    use crate::parse::parse;
    use similar_asserts::assert_eq;

    const BASE: &str = "one\ntwo\nthree\nfour\nfive\nsix\n";

    // Insertion of two lines after line 2, then a replacement further down
    const TWO_HUNKS: &str = "\
diff --git a/f b/f
--- a/f
+++ b/f
@@ -2,0 +3,2 @@
+inserted a
+inserted b
@@ -5 +7 @@
-five
+FIVE
";

    fn decided(text: &str, picks: &[Selection]) -> PatchSet {
        let mut patch = parse(text).unwrap();
        for (hunk, pick) in patch.files[0].hunks.iter_mut().zip(picks) {
            hunk.selection = *pick;
        }
        patch
    }

    #[test]
    fn select_first_of_two_hunks() {
        let patch = decided(TWO_HUNKS, &[Selection::Selected, Selection::Rejected]);
        let split = reconstruct(&patch);

        let committed = &split.committed.files[0];
        assert_eq!(committed.hunks.len(), 1);
        assert_eq!(committed.hunks[0].header(), "@@ -2,0 +3,2 @@");

        // The rejected hunk's old side shifts down past the committed insertion
        let retained = &split.retained.files[0];
        assert_eq!(retained.hunks.len(), 1);
        assert_eq!(retained.hunks[0].header(), "@@ -7 +7 @@");
    }

    #[test]
    fn select_second_of_two_hunks() {
        let patch = decided(TWO_HUNKS, &[Selection::Rejected, Selection::Selected]);
        let split = reconstruct(&patch);

        // Without the insertion, the replacement lands at its base position
        assert_eq!(split.committed.files[0].hunks[0].header(), "@@ -5 +5 @@");
        assert_eq!(split.retained.files[0].hunks[0].header(), "@@ -2,0 +3,2 @@");
    }

    #[test]
    fn committed_then_retained_equals_full() {
        for picks in [
            [Selection::Selected, Selection::Rejected],
            [Selection::Rejected, Selection::Selected],
            [Selection::Selected, Selection::Selected],
            [Selection::Rejected, Selection::Rejected],
        ] {
            let patch = decided(TWO_HUNKS, &picks);
            let full = apply_file_change(BASE, &patch.files[0]).unwrap();

            let split = reconstruct(&patch);
            let mid = match split.committed.files.first() {
                Some(change) => apply_file_change(BASE, change).unwrap(),
                None => BASE.to_string(),
            };
            let end = match split.retained.files.first() {
                Some(change) => apply_file_change(&mid, change).unwrap(),
                None => mid,
            };
            assert_eq!(end, full, "picks: {picks:?}");
        }
    }

    #[test]
    fn complement_selection_swaps_the_patches() {
        let picked = decided(TWO_HUNKS, &[Selection::Selected, Selection::Rejected]);
        let inverse = decided(TWO_HUNKS, &[Selection::Rejected, Selection::Selected]);

        // Same content up to coordinate renumbering
        let committed = reconstruct(&picked).committed;
        let retained = reconstruct(&inverse).retained;
        let left: Vec<_> = committed.files[0].hunks.iter().map(|h| &h.lines).collect();
        let right: Vec<_> = retained.files[0].hunks.iter().map(|h| &h.lines).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn undecided_counts_as_rejected() {
        let patch = decided(TWO_HUNKS, &[Selection::Undecided, Selection::Undecided]);
        let split = reconstruct(&patch);
        assert!(split.committed.is_empty());
        assert_eq!(split.retained.files[0].hunks.len(), 2);
    }

    #[test]
    fn fully_selected_file_leaves_nothing_behind() {
        let patch = decided(TWO_HUNKS, &[Selection::Selected, Selection::Selected]);
        let split = reconstruct(&patch);
        assert!(split.retained.is_empty());
        assert_eq!(split.committed.files[0].hunks.len(), 2);
    }

    #[test]
    fn rejected_edit_restores_the_original() {
        let mut patch = decided(TWO_HUNKS, &[Selection::Rejected, Selection::Rejected]);
        let original = patch.files[0].hunks[1].clone();
        let mut edited = Hunk::new(5, 1, 7, 1);
        edited.lines = vec![Line::removed("five"), Line::added("edited five")];
        edited.original = Some(Box::new(original.stripped()));
        patch.files[0].hunks[1] = edited;

        let split = reconstruct(&patch);
        let retained = &split.retained.files[0];
        assert_eq!(retained.hunks[1].lines[1].text, "FIVE");
        assert!(retained.hunks[1].original.is_none());
    }

    #[test]
    fn selected_edit_leaves_a_bridge_behind() {
        // The working tree replaced "five" with two lines; the user edits the
        // hunk down to a single different line and commits that
        let text = "\
diff --git a/f b/f
--- a/f
+++ b/f
@@ -5 +5,2 @@
-five
+FIVE
+FIVE AND A HALF
";
        let mut patch = parse(text).unwrap();
        let original = patch.files[0].hunks[0].clone();
        let mut edited = Hunk::new(5, 1, 5, 1);
        edited.lines = vec![Line::removed("five"), Line::added("cinq")];
        edited.selection = Selection::Selected;
        edited.original = Some(Box::new(original));
        patch.files[0].hunks[0] = edited;

        let split = reconstruct(&patch);
        assert_eq!(split.committed.files[0].hunks[0].lines[1].text, "cinq");

        let bridge = &split.retained.files[0].hunks[0];
        assert_eq!(bridge.header(), "@@ -5 +5,2 @@");
        assert_eq!(bridge.lines[0].text, "cinq");
        assert_eq!(bridge.lines[1].text, "FIVE");
        assert_eq!(bridge.lines[2].text, "FIVE AND A HALF");

        // Law still holds through the edit
        let base = "one\ntwo\nthree\nfour\nfive\nsix\n";
        let mid = apply_file_change(base, &split.committed.files[0]).unwrap();
        let end = apply_file_change(&mid, &split.retained.files[0]).unwrap();
        assert_eq!(end, "one\ntwo\nthree\nfour\nFIVE\nFIVE AND A HALF\nsix\n");
    }

    #[test]
    fn edit_back_to_working_content_needs_no_bridge() {
        let mut patch = decided(TWO_HUNKS, &[Selection::Selected, Selection::Rejected]);
        let hunk = &mut patch.files[0].hunks[0];
        hunk.original = Some(Box::new(hunk.stripped()));

        let split = reconstruct(&patch);
        // Only the rejected second hunk remains
        assert_eq!(split.retained.files[0].hunks.len(), 1);
    }

    #[test]
    fn selected_binary_entry_commits_whole() {
        let mut change = FileChange::new("logo.png");
        change.is_binary = true;
        change.selection = Selection::Selected;
        let patch = PatchSet {
            files: vec![change],
        };

        let split = reconstruct(&patch);
        assert!(split.committed.files[0].is_binary);
        assert!(split.retained.is_empty());
    }

    #[test]
    fn rejected_mode_only_entry_is_retained_whole() {
        let mut change = FileChange::new("run.sh");
        change.old_mode = Some(0o100644);
        change.new_mode = Some(0o100755);
        let patch = PatchSet {
            files: vec![change],
        };

        let split = reconstruct(&patch);
        assert!(split.committed.is_empty());
        assert!(split.retained.files[0].is_mode_only());
    }

    #[test]
    fn rename_metadata_commits_without_hunks() {
        let text = "\
diff --git a/old.rs b/new.rs
rename from old.rs
rename to new.rs
--- a/old.rs
+++ b/new.rs
@@ -3 +3 @@
-old line
+new line
";
        let mut patch = parse(text).unwrap();
        patch.files[0].selection = Selection::Selected;
        patch.files[0].hunks[0].selection = Selection::Rejected;

        let split = reconstruct(&patch);
        let committed = &split.committed.files[0];
        assert_eq!(committed.change_kind, ChangeKind::Renamed);
        assert!(committed.hunks.is_empty());

        // Content change stays behind as a plain modification of the new path
        let retained = &split.retained.files[0];
        assert_eq!(retained.change_kind, ChangeKind::Modified);
        assert_eq!(retained.old_path, "new.rs");
        assert_eq!(retained.hunks.len(), 1);
    }

    #[test]
    fn fully_rejected_rename_is_retained_intact() {
        let text = "\
diff --git a/old.rs b/new.rs
rename from old.rs
rename to new.rs
--- a/old.rs
+++ b/new.rs
@@ -3 +3 @@
-old line
+new line
";
        let mut patch = parse(text).unwrap();
        patch.files[0].selection = Selection::Rejected;
        patch.files[0].hunks[0].selection = Selection::Rejected;

        let split = reconstruct(&patch);
        assert!(split.committed.is_empty());
        assert_eq!(split.retained.files[0].change_kind, ChangeKind::Renamed);
    }

    #[test]
    fn selected_deletion_stays_a_deletion() {
        let text = "\
diff --git a/gone b/gone
deleted file mode 100644
--- a/gone
+++ /dev/null
@@ -1,2 +0,0 @@
-alpha
-beta
";
        let mut patch = parse(text).unwrap();
        patch.files[0].hunks[0].selection = Selection::Selected;

        let split = reconstruct(&patch);
        assert_eq!(split.committed.files[0].change_kind, ChangeKind::Removed);
    }

    #[test]
    fn noop_selected_hunk_is_treated_as_rejected() {
        let mut patch = decided(TWO_HUNKS, &[Selection::Selected, Selection::Rejected]);
        let hunk = &mut patch.files[0].hunks[0];
        hunk.lines = vec![Line::context("two")];
        hunk.old_len = 1;
        hunk.new_len = 1;
        hunk.old_start = 2;
        hunk.new_start = 2;

        let split = reconstruct(&patch);
        assert!(split.committed.is_empty());
    }
}
