//! Unified-diff parsing.
//!
//! The parser is an explicit state machine over line-prefix tokens: each
//! input line is classified into a token, and a fixed transition table
//! decides which section of the diff the parser moves to. A token with no
//! table entry for the current section is a hard
//! [`ParseError::UnhandledTransition`] rather than a guess, so broken or
//! hand-mangled patch text fails loudly. The one tolerated shortcut is an
//! email signature trailer (`-- `), which ends parsing silently.
//!
//! The same machine re-parses user-edited hunk text in a restricted
//! single-file, single-hunk mode (see [`parse_edited_hunk`]).

use crate::patch::{ChangeKind, FileChange, Hunk, Line, PatchSet};
use error_set::error_set;
use nom::IResult;
use nom::Parser;
use nom::bytes::complete::{tag, take_until};
use nom::character::complete::u32 as dec_u32;
use nom::combinator::opt;
use nom::sequence::preceded;

error_set! {
    /// Errors from parsing unified-diff text
    ParseError := {
        /// A line token arrived in a section of the diff grammar with no
        /// transition for it
        #[display("unhandled {token} token in {section} section")]
        UnhandledTransition {
            section: &'static str,
            token: &'static str,
        },
        #[display("malformed range header: {text}")]
        BadRangeHeader { text: String },
        /// Hunk body line counts disagree with the declared ranges
        #[display(
            "bad hunk #{hunk}: declared -{expected_old} +{expected_new}, found -{seen_old} +{seen_new}"
        )]
        LengthMismatch {
            hunk: usize,
            expected_old: u32,
            expected_new: u32,
            seen_old: u32,
            seen_new: u32,
        },
        /// The edited text has no range header: the change being edited is a
        /// whole-file or binary entry
        #[display("cannot edit a whole-file or binary change")]
        WholeFileEditNotSupported,
    }
}

/// Parsed `@@ -a,b +c,d @@ label` range header
#[derive(Debug, Clone, PartialEq, Eq)]
struct RawRange {
    old_start: u32,
    old_len: u32,
    new_start: u32,
    new_len: u32,
    section: Option<String>,
}

fn range_header(input: &str) -> IResult<&str, RawRange> {
    let (input, _) = tag("@@ -").parse(input)?;
    let (input, old_start) = dec_u32.parse(input)?;
    let (input, old_len) = opt(preceded(tag(","), dec_u32)).parse(input)?;
    let (input, _) = tag(" +").parse(input)?;
    let (input, new_start) = dec_u32.parse(input)?;
    let (input, new_len) = opt(preceded(tag(","), dec_u32)).parse(input)?;
    let (rest, _) = tag(" @@").parse(input)?;
    let section = rest
        .strip_prefix(' ')
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    Ok((
        "",
        RawRange {
            old_start,
            old_len: old_len.unwrap_or(1),
            new_start,
            new_len: new_len.unwrap_or(1),
            section,
        },
    ))
}

/// Extract the path pair from a `diff --git a/old b/new` line
fn git_header(input: &str) -> IResult<&str, (&str, &str)> {
    let (input, _) = tag("diff --git a/").parse(input)?;
    let (input, old) = take_until(" b/").parse(input)?;
    let (new, _) = tag(" b/").parse(input)?;
    Ok(("", (old, new)))
}

/// One classified input line
#[derive(Debug)]
enum Token<'a> {
    FileHeader { old_path: &'a str, new_path: &'a str },
    OldPath(&'a str),
    NewPath(&'a str),
    Index,
    OldMode(u32),
    NewMode(u32),
    NewFileMode(u32),
    DeletedFileMode(u32),
    RenameFrom(&'a str),
    RenameTo(&'a str),
    CopyFrom(&'a str),
    CopyTo(&'a str),
    Similarity,
    RangeHeader(RawRange),
    Context(&'a str),
    Add(&'a str),
    Remove(&'a str),
    NoNewline,
    Binary,
    Trailer,
    Blank,
    Junk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    FileHeader,
    OldPath,
    NewPath,
    Index,
    OldMode,
    NewMode,
    NewFileMode,
    DeletedFileMode,
    RenameFrom,
    RenameTo,
    CopyFrom,
    CopyTo,
    Similarity,
    RangeHeader,
    Context,
    Add,
    Remove,
    NoNewline,
    Binary,
    Trailer,
    Blank,
    Junk,
}

impl TokenKind {
    fn name(self) -> &'static str {
        match self {
            TokenKind::FileHeader => "file-header",
            TokenKind::OldPath => "old-path",
            TokenKind::NewPath => "new-path",
            TokenKind::Index => "index",
            TokenKind::OldMode => "old-mode",
            TokenKind::NewMode => "new-mode",
            TokenKind::NewFileMode => "new-file-mode",
            TokenKind::DeletedFileMode => "deleted-file-mode",
            TokenKind::RenameFrom => "rename-from",
            TokenKind::RenameTo => "rename-to",
            TokenKind::CopyFrom => "copy-from",
            TokenKind::CopyTo => "copy-to",
            TokenKind::Similarity => "similarity",
            TokenKind::RangeHeader => "range-header",
            TokenKind::Context => "context-line",
            TokenKind::Add => "add-line",
            TokenKind::Remove => "remove-line",
            TokenKind::NoNewline => "no-newline-marker",
            TokenKind::Binary => "binary-marker",
            TokenKind::Trailer => "trailer",
            TokenKind::Blank => "blank-line",
            TokenKind::Junk => "junk",
        }
    }
}

impl Token<'_> {
    fn kind(&self) -> TokenKind {
        match self {
            Token::FileHeader { .. } => TokenKind::FileHeader,
            Token::OldPath(_) => TokenKind::OldPath,
            Token::NewPath(_) => TokenKind::NewPath,
            Token::Index => TokenKind::Index,
            Token::OldMode(_) => TokenKind::OldMode,
            Token::NewMode(_) => TokenKind::NewMode,
            Token::NewFileMode(_) => TokenKind::NewFileMode,
            Token::DeletedFileMode(_) => TokenKind::DeletedFileMode,
            Token::RenameFrom(_) => TokenKind::RenameFrom,
            Token::RenameTo(_) => TokenKind::RenameTo,
            Token::CopyFrom(_) => TokenKind::CopyFrom,
            Token::CopyTo(_) => TokenKind::CopyTo,
            Token::Similarity => TokenKind::Similarity,
            Token::RangeHeader(_) => TokenKind::RangeHeader,
            Token::Context(_) => TokenKind::Context,
            Token::Add(_) => TokenKind::Add,
            Token::Remove(_) => TokenKind::Remove,
            Token::NoNewline => TokenKind::NoNewline,
            Token::Binary => TokenKind::Binary,
            Token::Trailer => TokenKind::Trailer,
            Token::Blank => TokenKind::Blank,
            Token::Junk => TokenKind::Junk,
        }
    }
}

/// Grammar section the parser is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Start,
    FileMeta,
    OldPath,
    FilePaths,
    Hunk,
    BinarySkip,
    Done,
}

impl Section {
    fn name(self) -> &'static str {
        match self {
            Section::Start => "start",
            Section::FileMeta => "file-meta",
            Section::OldPath => "old-path",
            Section::FilePaths => "file-paths",
            Section::Hunk => "hunk",
            Section::BinarySkip => "binary-skip",
            Section::Done => "done",
        }
    }
}

/// The diff grammar as a (section, token) -> section table.
///
/// Anything not listed here is an unhandled transition. `BinarySkip` absorbs
/// every token until the next file header so binary entries never grow hunks.
#[rustfmt::skip]
const TRANSITIONS: &[(Section, TokenKind, Section)] = &[
    (Section::Start, TokenKind::Junk, Section::Start),
    (Section::Start, TokenKind::Blank, Section::Start),
    (Section::Start, TokenKind::Index, Section::Start),
    (Section::Start, TokenKind::FileHeader, Section::FileMeta),
    (Section::Start, TokenKind::OldPath, Section::OldPath),
    (Section::Start, TokenKind::Trailer, Section::Done),
    (Section::FileMeta, TokenKind::Index, Section::FileMeta),
    (Section::FileMeta, TokenKind::OldMode, Section::FileMeta),
    (Section::FileMeta, TokenKind::NewMode, Section::FileMeta),
    (Section::FileMeta, TokenKind::NewFileMode, Section::FileMeta),
    (Section::FileMeta, TokenKind::DeletedFileMode, Section::FileMeta),
    (Section::FileMeta, TokenKind::RenameFrom, Section::FileMeta),
    (Section::FileMeta, TokenKind::RenameTo, Section::FileMeta),
    (Section::FileMeta, TokenKind::CopyFrom, Section::FileMeta),
    (Section::FileMeta, TokenKind::CopyTo, Section::FileMeta),
    (Section::FileMeta, TokenKind::Similarity, Section::FileMeta),
    (Section::FileMeta, TokenKind::OldPath, Section::OldPath),
    (Section::FileMeta, TokenKind::Binary, Section::BinarySkip),
    (Section::FileMeta, TokenKind::FileHeader, Section::FileMeta),
    (Section::FileMeta, TokenKind::Trailer, Section::Done),
    (Section::OldPath, TokenKind::NewPath, Section::FilePaths),
    (Section::FilePaths, TokenKind::RangeHeader, Section::Hunk),
    (Section::FilePaths, TokenKind::Binary, Section::BinarySkip),
    (Section::FilePaths, TokenKind::FileHeader, Section::FileMeta),
    (Section::FilePaths, TokenKind::Trailer, Section::Done),
    (Section::Hunk, TokenKind::Context, Section::Hunk),
    (Section::Hunk, TokenKind::Add, Section::Hunk),
    (Section::Hunk, TokenKind::Remove, Section::Hunk),
    (Section::Hunk, TokenKind::NoNewline, Section::Hunk),
    (Section::Hunk, TokenKind::Blank, Section::Hunk),
    (Section::Hunk, TokenKind::RangeHeader, Section::Hunk),
    (Section::Hunk, TokenKind::FileHeader, Section::FileMeta),
    (Section::Hunk, TokenKind::OldPath, Section::OldPath),
    (Section::Hunk, TokenKind::Trailer, Section::Done),
    (Section::BinarySkip, TokenKind::FileHeader, Section::FileMeta),
    (Section::BinarySkip, TokenKind::OldPath, Section::OldPath),
    (Section::BinarySkip, TokenKind::Trailer, Section::Done),
    (Section::BinarySkip, TokenKind::NewPath, Section::BinarySkip),
    (Section::BinarySkip, TokenKind::Index, Section::BinarySkip),
    (Section::BinarySkip, TokenKind::OldMode, Section::BinarySkip),
    (Section::BinarySkip, TokenKind::NewMode, Section::BinarySkip),
    (Section::BinarySkip, TokenKind::NewFileMode, Section::BinarySkip),
    (Section::BinarySkip, TokenKind::DeletedFileMode, Section::BinarySkip),
    (Section::BinarySkip, TokenKind::RenameFrom, Section::BinarySkip),
    (Section::BinarySkip, TokenKind::RenameTo, Section::BinarySkip),
    (Section::BinarySkip, TokenKind::CopyFrom, Section::BinarySkip),
    (Section::BinarySkip, TokenKind::CopyTo, Section::BinarySkip),
    (Section::BinarySkip, TokenKind::Similarity, Section::BinarySkip),
    (Section::BinarySkip, TokenKind::RangeHeader, Section::BinarySkip),
    (Section::BinarySkip, TokenKind::Context, Section::BinarySkip),
    (Section::BinarySkip, TokenKind::Add, Section::BinarySkip),
    (Section::BinarySkip, TokenKind::Remove, Section::BinarySkip),
    (Section::BinarySkip, TokenKind::NoNewline, Section::BinarySkip),
    (Section::BinarySkip, TokenKind::Binary, Section::BinarySkip),
    (Section::BinarySkip, TokenKind::Blank, Section::BinarySkip),
    (Section::BinarySkip, TokenKind::Junk, Section::BinarySkip),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseMode {
    Full,
    EditedHunk,
}

fn lookup(mode: ParseMode, section: Section, kind: TokenKind) -> Option<Section> {
    if mode == ParseMode::EditedHunk {
        // Restricted to one file and one hunk. A second range header or a
        // new file header inside the body is malformed, and the hunk may
        // appear without any file header at all.
        if section == Section::Hunk
            && matches!(
                kind,
                TokenKind::RangeHeader | TokenKind::FileHeader | TokenKind::OldPath
            )
        {
            return None;
        }
        if section == Section::Start && kind == TokenKind::RangeHeader {
            return Some(Section::Hunk);
        }
    }
    TRANSITIONS
        .iter()
        .find(|(from, token, _)| *from == section && *token == kind)
        .map(|(_, _, to)| *to)
}

/// Drop trailing tab-separated metadata from a `---`/`+++` path
fn clean_path(raw: &str) -> &str {
    raw.split('\t').next().unwrap_or(raw)
}

fn parse_octal_mode(raw: &str) -> Option<u32> {
    u32::from_str_radix(raw.trim(), 8).ok()
}

fn classify(line: &str, hunk_body: bool) -> Result<Token<'_>, ParseError> {
    if line.is_empty() {
        return Ok(Token::Blank);
    }
    // While the open hunk still owes body lines, a single-character prefix
    // wins: a removed line reading `-- sig` renders as `--- sig`, which must
    // not be mistaken for a path header
    if hunk_body {
        if line.starts_with("\\ No newline") {
            return Ok(Token::NoNewline);
        }
        if let Some(rest) = line.strip_prefix('+') {
            return Ok(Token::Add(rest));
        }
        if let Some(rest) = line.strip_prefix('-') {
            return Ok(Token::Remove(rest));
        }
        if let Some(rest) = line.strip_prefix(' ') {
            return Ok(Token::Context(rest));
        }
    }
    if line.starts_with("diff --git ") {
        return Ok(match git_header(line) {
            Ok((_, (old_path, new_path))) => Token::FileHeader { old_path, new_path },
            Err(_) => Token::Junk,
        });
    }
    if line.starts_with("@@") {
        return match range_header(line) {
            // Starts are 1-based; 0 is only valid alongside a zero length
            Ok((_, range))
                if (range.old_len > 0 && range.old_start == 0)
                    || (range.new_len > 0 && range.new_start == 0) =>
            {
                Err(ParseError::BadRangeHeader {
                    text: line.to_string(),
                })
            }
            Ok((_, range)) => Ok(Token::RangeHeader(range)),
            Err(_) => Err(ParseError::BadRangeHeader {
                text: line.to_string(),
            }),
        };
    }
    if let Some(rest) = line.strip_prefix("--- ") {
        return Ok(Token::OldPath(clean_path(rest)));
    }
    if let Some(rest) = line.strip_prefix("+++ ") {
        return Ok(Token::NewPath(clean_path(rest)));
    }
    if line.starts_with("index ") {
        return Ok(Token::Index);
    }
    if let Some(rest) = line.strip_prefix("old mode ") {
        return Ok(parse_octal_mode(rest).map_or(Token::Junk, Token::OldMode));
    }
    if let Some(rest) = line.strip_prefix("new mode ") {
        return Ok(parse_octal_mode(rest).map_or(Token::Junk, Token::NewMode));
    }
    if let Some(rest) = line.strip_prefix("new file mode ") {
        return Ok(parse_octal_mode(rest).map_or(Token::Junk, Token::NewFileMode));
    }
    if let Some(rest) = line.strip_prefix("deleted file mode ") {
        return Ok(parse_octal_mode(rest).map_or(Token::Junk, Token::DeletedFileMode));
    }
    if let Some(rest) = line.strip_prefix("rename from ") {
        return Ok(Token::RenameFrom(rest));
    }
    if let Some(rest) = line.strip_prefix("rename to ") {
        return Ok(Token::RenameTo(rest));
    }
    if let Some(rest) = line.strip_prefix("copy from ") {
        return Ok(Token::CopyFrom(rest));
    }
    if let Some(rest) = line.strip_prefix("copy to ") {
        return Ok(Token::CopyTo(rest));
    }
    if line.starts_with("similarity index") || line.starts_with("dissimilarity index") {
        return Ok(Token::Similarity);
    }
    if line.starts_with("Binary files ") || line.starts_with("GIT binary patch") {
        return Ok(Token::Binary);
    }
    if line.starts_with("\\ No newline") {
        return Ok(Token::NoNewline);
    }
    if line == "--" || line == "-- " {
        return Ok(Token::Trailer);
    }
    if let Some(rest) = line.strip_prefix('+') {
        return Ok(Token::Add(rest));
    }
    if let Some(rest) = line.strip_prefix('-') {
        return Ok(Token::Remove(rest));
    }
    if let Some(rest) = line.strip_prefix(' ') {
        return Ok(Token::Context(rest));
    }
    Ok(Token::Junk)
}

/// Accumulates file entries and hunks as tokens stream through the machine
struct Builder {
    files: Vec<FileChange>,
    current: Option<FileChange>,
    /// Edited-hunk text keeps its stale range header; counts are recomputed
    /// by the caller instead of being enforced here
    strict_counts: bool,
    hunk_open: bool,
    expect_old: u32,
    expect_new: u32,
    seen_old: u32,
    seen_new: u32,
    hunk_no: usize,
}

impl Builder {
    fn new(strict_counts: bool) -> Self {
        Builder {
            files: Vec::new(),
            current: None,
            strict_counts,
            hunk_open: false,
            expect_old: 0,
            expect_new: 0,
            seen_old: 0,
            seen_new: 0,
            hunk_no: 0,
        }
    }

    /// True while the open hunk's declared ranges still owe body lines
    fn body_pending(&self) -> bool {
        self.hunk_open && (self.seen_old < self.expect_old || self.seen_new < self.expect_new)
    }

    fn close_hunk(&mut self) -> Result<(), ParseError> {
        if !self.hunk_open {
            return Ok(());
        }
        self.hunk_open = false;
        if self.strict_counts && (self.seen_old != self.expect_old || self.seen_new != self.expect_new)
        {
            return Err(ParseError::LengthMismatch {
                hunk: self.hunk_no,
                expected_old: self.expect_old,
                expected_new: self.expect_new,
                seen_old: self.seen_old,
                seen_new: self.seen_new,
            });
        }
        Ok(())
    }

    fn close_file(&mut self) -> Result<(), ParseError> {
        self.close_hunk()?;
        if let Some(file) = self.current.take() {
            self.files.push(file);
        }
        Ok(())
    }

    fn start_file(&mut self, old_path: &str, new_path: &str) -> Result<(), ParseError> {
        self.close_file()?;
        let mut file = FileChange::new(new_path);
        file.old_path = old_path.to_string();
        self.current = Some(file);
        Ok(())
    }

    fn current_mut(&mut self) -> &mut FileChange {
        // Edited-hunk text may omit the file header entirely
        self.current
            .get_or_insert_with(|| FileChange::new(String::new()))
    }

    fn push_body_line(&mut self, line: Line) {
        if line.on_old_side() {
            self.seen_old += 1;
        }
        if line.on_new_side() {
            self.seen_new += 1;
        }
        if let Some(hunk) = self.current_mut().hunks.last_mut() {
            hunk.lines.push(line);
        }
    }

    fn apply(&mut self, before: Section, token: Token<'_>) -> Result<(), ParseError> {
        // Everything inside a binary entry is discarded wholesale
        if before == Section::BinarySkip
            && !matches!(token, Token::FileHeader { .. } | Token::OldPath(_))
        {
            return Ok(());
        }

        match token {
            Token::FileHeader { old_path, new_path } => {
                self.start_file(old_path, new_path)?;
            }
            Token::OldPath(path) => {
                if before == Section::FileMeta {
                    // Path line of the current git-style entry; the header
                    // already named both sides
                    if path == "/dev/null" {
                        self.current_mut().change_kind = ChangeKind::Added;
                    }
                } else {
                    // Plain unified diff without a `diff --git` line
                    if path == "/dev/null" {
                        self.start_file("", "")?;
                        self.current_mut().change_kind = ChangeKind::Added;
                    } else {
                        let stripped = path.strip_prefix("a/").unwrap_or(path);
                        self.start_file(stripped, stripped)?;
                    }
                }
            }
            Token::NewPath(path) => {
                if path == "/dev/null" {
                    self.current_mut().change_kind = ChangeKind::Removed;
                } else if self.current_mut().new_path.is_empty() {
                    let stripped = path.strip_prefix("b/").unwrap_or(path).to_string();
                    let file = self.current_mut();
                    file.new_path.clone_from(&stripped);
                    if file.old_path.is_empty() && file.change_kind != ChangeKind::Added {
                        file.old_path = stripped;
                    }
                }
            }
            Token::OldMode(mode) => self.current_mut().old_mode = Some(mode),
            Token::NewMode(mode) => self.current_mut().new_mode = Some(mode),
            Token::NewFileMode(mode) => {
                let file = self.current_mut();
                file.change_kind = ChangeKind::Added;
                file.new_mode = Some(mode);
            }
            Token::DeletedFileMode(mode) => {
                let file = self.current_mut();
                file.change_kind = ChangeKind::Removed;
                file.old_mode = Some(mode);
            }
            Token::RenameFrom(path) => {
                let file = self.current_mut();
                file.change_kind = ChangeKind::Renamed;
                file.old_path = path.to_string();
            }
            Token::RenameTo(path) => {
                let file = self.current_mut();
                file.change_kind = ChangeKind::Renamed;
                file.new_path = path.to_string();
            }
            Token::CopyFrom(path) => {
                let file = self.current_mut();
                file.change_kind = ChangeKind::Copied;
                file.old_path = path.to_string();
            }
            Token::CopyTo(path) => {
                let file = self.current_mut();
                file.change_kind = ChangeKind::Copied;
                file.new_path = path.to_string();
            }
            Token::Index | Token::Similarity | Token::Junk => {}
            Token::Binary => {
                let file = self.current_mut();
                file.is_binary = true;
                file.hunks.clear();
                self.hunk_open = false;
            }
            Token::RangeHeader(range) => {
                self.close_hunk()?;
                self.hunk_no += 1;
                self.expect_old = range.old_len;
                self.expect_new = range.new_len;
                self.seen_old = 0;
                self.seen_new = 0;
                self.hunk_open = true;
                let mut hunk = Hunk::new(
                    range.old_start,
                    range.old_len,
                    range.new_start,
                    range.new_len,
                );
                hunk.section = range.section;
                self.current_mut().hunks.push(hunk);
            }
            Token::Context(text) => self.push_body_line(Line::context(text)),
            Token::Add(text) => self.push_body_line(Line::added(text)),
            Token::Remove(text) => self.push_body_line(Line::removed(text)),
            Token::Blank => {
                // A context line whose trailing whitespace was trimmed
                if self.hunk_open
                    && (self.seen_old < self.expect_old || self.seen_new < self.expect_new)
                {
                    self.push_body_line(Line::context(""));
                }
            }
            Token::NoNewline => {
                if let Some(line) = self
                    .current_mut()
                    .hunks
                    .last_mut()
                    .and_then(|h| h.lines.last_mut())
                {
                    line.no_trailing_newline = true;
                }
            }
            Token::Trailer => {}
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<FileChange>, ParseError> {
        self.close_file()?;
        Ok(self.files)
    }
}

fn parse_with_mode(text: &str, mode: ParseMode) -> Result<Vec<FileChange>, ParseError> {
    let mut section = Section::Start;
    let mut builder = Builder::new(mode == ParseMode::Full);

    for raw in text.lines() {
        // Editor guide comments are stripped before classification
        if mode == ParseMode::EditedHunk && raw.starts_with('#') {
            continue;
        }
        let token = classify(raw, builder.body_pending())?;
        let kind = token.kind();
        let Some(next) = lookup(mode, section, kind) else {
            return Err(ParseError::UnhandledTransition {
                section: section.name(),
                token: kind.name(),
            });
        };
        if next == Section::Done {
            break;
        }
        builder.apply(section, token)?;
        section = next;
    }

    builder.finish()
}

/// Parse a complete multi-file unified diff.
pub fn parse(text: &str) -> Result<PatchSet, ParseError> {
    Ok(PatchSet {
        files: parse_with_mode(text, ParseMode::Full)?,
    })
}

/// Re-parse user-edited hunk text: one optional file header, one hunk.
///
/// Lines starting with `#` are discarded first. Text with no range header at
/// all means the user tried to edit a whole-file or binary entry, which is
/// not supported.
pub fn parse_edited_hunk(text: &str) -> Result<Hunk, ParseError> {
    if !text
        .lines()
        .any(|l| !l.starts_with('#') && l.starts_with("@@ "))
    {
        return Err(ParseError::WholeFileEditNotSupported);
    }
    let files = parse_with_mode(text, ParseMode::EditedHunk)?;
    files
        .into_iter()
        .flat_map(|f| f.hunks)
        .next()
        .ok_or(ParseError::WholeFileEditNotSupported)
}
