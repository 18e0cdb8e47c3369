use std::fmt;

/// Classification of one row of hunk content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Unchanged line present on both sides (` ` prefix)
    Context,
    /// Line present only in the new content (`+` prefix)
    Added,
    /// Line present only in the old content (`-` prefix)
    Removed,
}

/// One row of diff content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub kind: LineKind,
    /// Line text without the prefix character or trailing newline
    pub text: String,
    /// True only for the last line of a side whose source content lacks a
    /// terminating newline (`\ No newline at end of file` marker)
    pub no_trailing_newline: bool,
}

impl Line {
    pub fn context(text: impl Into<String>) -> Self {
        Self::new(LineKind::Context, text)
    }

    pub fn added(text: impl Into<String>) -> Self {
        Self::new(LineKind::Added, text)
    }

    pub fn removed(text: impl Into<String>) -> Self {
        Self::new(LineKind::Removed, text)
    }

    fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Line {
            kind,
            text: text.into(),
            no_trailing_newline: false,
        }
    }

    fn prefix(&self) -> char {
        match self.kind {
            LineKind::Context => ' ',
            LineKind::Added => '+',
            LineKind::Removed => '-',
        }
    }

    /// Whether this line contributes to the old side of the hunk
    pub fn on_old_side(&self) -> bool {
        matches!(self.kind, LineKind::Context | LineKind::Removed)
    }

    /// Whether this line contributes to the new side of the hunk
    pub fn on_new_side(&self) -> bool {
        matches!(self.kind, LineKind::Context | LineKind::Added)
    }
}

/// Interactive decision recorded against a hunk or a whole file entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Undecided,
    Selected,
    Rejected,
}

/// A contiguous change region within one file.
///
/// Coordinates are 1-based source line numbers. A zero `old_len` means the
/// hunk is a pure insertion and `old_start` names the line *before* the
/// insertion point; a zero `new_len` is the mirror case for pure deletions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub old_start: u32,
    pub old_len: u32,
    pub new_start: u32,
    pub new_len: u32,
    /// Nearest preceding function/context label from the range header, cosmetic only
    pub section: Option<String>,
    pub lines: Vec<Line>,
    pub selection: Selection,
    /// Pre-edit version of this hunk, kept when the user substituted edited
    /// text so the retained patch can restore the un-committed remainder
    pub original: Option<Box<Hunk>>,
}

impl Hunk {
    pub fn new(old_start: u32, old_len: u32, new_start: u32, new_len: u32) -> Self {
        Hunk {
            old_start,
            old_len,
            new_start,
            new_len,
            section: None,
            lines: Vec::new(),
            selection: Selection::Undecided,
            original: None,
        }
    }

    /// Count of lines on the old side (context + removed)
    #[must_use]
    pub fn counted_old(&self) -> u32 {
        self.lines.iter().filter(|l| l.on_old_side()).count() as u32
    }

    /// Count of lines on the new side (context + added)
    #[must_use]
    pub fn counted_new(&self) -> u32 {
        self.lines.iter().filter(|l| l.on_new_side()).count() as u32
    }

    /// Whether the line sequence reproduces the declared range lengths
    #[must_use]
    pub fn verify_counts(&self) -> bool {
        self.counted_old() == self.old_len && self.counted_new() == self.new_len
    }

    /// A hunk with no added or removed lines changes nothing
    #[must_use]
    pub fn is_noop(&self) -> bool {
        !self
            .lines
            .iter()
            .any(|l| matches!(l.kind, LineKind::Added | LineKind::Removed))
    }

    /// Net line-count change this hunk applies to the file
    #[must_use]
    pub fn delta(&self) -> i64 {
        i64::from(self.new_len) - i64::from(self.old_len)
    }

    /// Lines forming the new-side content of this hunk, in order
    pub fn new_side_lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter().filter(|l| l.on_new_side())
    }

    /// Clone without the transient selection state or pre-edit backup
    #[must_use]
    pub fn stripped(&self) -> Hunk {
        Hunk {
            selection: Selection::Undecided,
            original: None,
            ..self.clone()
        }
    }

    /// Render the `@@ -a,b +c,d @@` range header (with optional section label)
    #[must_use]
    pub fn header(&self) -> String {
        let old_part = render_range(self.old_start, self.old_len);
        let new_part = render_range(self.new_start, self.new_len);
        match &self.section {
            Some(section) => format!("@@ -{} +{} @@ {}", old_part, new_part, section),
            None => format!("@@ -{} +{} @@", old_part, new_part),
        }
    }
}

/// Render one side of a range header, omitting the length when it is 1
fn render_range(start: u32, len: u32) -> String {
    if len == 1 {
        format!("{}", start)
    } else {
        format!("{},{}", start, len)
    }
}

impl fmt::Display for Hunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header())?;
        for line in &self.lines {
            writeln!(f, "{}{}", line.prefix(), line.text)?;
            if line.no_trailing_newline {
                writeln!(f, "\\ No newline at end of file")?;
            }
        }
        Ok(())
    }
}
