//! Per-row syntax classification
//!
//! # Design
//! - **One pass per row**: a row is classified left to right in a single scan of its
//!   render buffer, producing one [`Highlight`] per byte.
//! - **Carried comment state**: the only state crossing row boundaries is whether the
//!   previous row ended inside a block comment. The caller feeds it in and gets this
//!   row's exit state back, and keeps re-highlighting following rows only while that
//!   exit state keeps changing.
//! - **Dialect hooks**: definition names, call sites and preprocessor lines depend on
//!   the rule's [`Dialect`](crate::primitives::syntax::Dialect); everything else is driven by the rule's data.

use crate::primitives::syntax::SyntaxRule;
use crossterm::style::Color;

/// Classification of one rendered byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Highlight {
    Normal,
    Comment,
    BlockComment,
    Keyword,
    TypeKeyword,
    String,
    Number,
    Punctuation,
    DefinitionName,
    SearchMatch,
}

impl Highlight {
    /// Terminal foreground colour for this class
    pub fn color(&self) -> Color {
        match self {
            Self::Comment | Self::BlockComment => Color::DarkGrey,
            Self::Keyword => Color::DarkBlue,
            Self::TypeKeyword => Color::DarkGreen,
            Self::String => Color::DarkMagenta,
            Self::Number => Color::DarkRed,
            Self::Punctuation => Color::DarkYellow,
            Self::DefinitionName => Color::DarkCyan,
            Self::SearchMatch => Color::Blue,
            Self::Normal => Color::Reset,
        }
    }
}

/// Result of highlighting one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowHighlight {
    pub classes: Vec<Highlight>,
    /// The row ends inside an unterminated block comment
    pub open_comment: bool,
}

/// Characters that end a token
pub fn is_separator(c: Option<u8>) -> bool {
    match c {
        None | Some(0) => true,
        Some(c) => c.is_ascii_whitespace() || b",.()+-/*=~%<>[];\\{}:\"'".contains(&c),
    }
}

fn is_punctuation(c: u8) -> bool {
    b",.():;{}[]<>=%+-*/&|^~!".contains(&c)
}

fn is_identifier_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_identifier_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

const PREPROCESSOR_DIRECTIVES: &[&[u8]] = &[
    b"define", b"ifndef", b"ifdef", b"include", b"endif", b"undef", b"pragma",
];

/// Classify one row of rendered text.
///
/// `carry_in` is the previous row's open-comment state; with no rule every byte is
/// `Normal` and the row never ends inside a comment.
pub fn highlight_row(render: &[u8], rule: Option<&SyntaxRule>, carry_in: bool) -> RowHighlight {
    let n = render.len();
    let mut classes = vec![Highlight::Normal; n];
    let Some(rule) = rule else {
        return RowHighlight {
            classes,
            open_comment: false,
        };
    };

    let mut scanner = Scanner {
        render,
        classes: &mut classes,
        rule,
        prev_sep: true,
        in_string: None,
        in_comment: carry_in,
        expect_definition: false,
        after_include: false,
    };

    let mut i = 0;
    if rule.dialect.has_preprocessor() && !carry_in && render.first() == Some(&b'#') {
        i = scanner.preprocessor_line();
    }
    scanner.run(i);

    let open_comment = scanner.in_comment;
    RowHighlight {
        classes,
        open_comment,
    }
}

struct Scanner<'a> {
    render: &'a [u8],
    classes: &'a mut [Highlight],
    rule: &'a SyntaxRule,
    prev_sep: bool,
    in_string: Option<u8>,
    in_comment: bool,
    /// Last token was a definition keyword such as `def` or `function`
    expect_definition: bool,
    /// Last token was `#include`, so `<` opens a string
    after_include: bool,
}

impl<'a> Scanner<'a> {
    fn at(&self, i: usize) -> Option<u8> {
        self.render.get(i).copied()
    }

    fn paint(&mut self, start: usize, end: usize, class: Highlight) {
        let end = end.min(self.classes.len());
        for hl in &mut self.classes[start.min(end)..end] {
            *hl = class;
        }
    }

    fn starts_with(&self, i: usize, marker: &str) -> bool {
        !marker.is_empty() && self.render[i..].starts_with(marker.as_bytes())
    }

    /// Tag `#directive [argument]` and return where normal scanning resumes
    fn preprocessor_line(&mut self) -> usize {
        let n = self.render.len();
        self.classes[0] = Highlight::Keyword;

        let mut j = 1;
        while j < n && self.render[j].is_ascii_whitespace() {
            j += 1;
        }
        let directive_start = j;
        while j < n && self.render[j].is_ascii_alphabetic() {
            j += 1;
        }
        self.paint(directive_start, j, Highlight::Keyword);

        let directive = &self.render[directive_start..j];
        if !PREPROCESSOR_DIRECTIVES.contains(&directive) {
            return j;
        }

        while j < n && self.render[j].is_ascii_whitespace() {
            j += 1;
        }
        let arg_start = j;
        match self.at(j) {
            Some(open @ (b'<' | b'"')) if directive == b"include" => {
                let close = if open == b'<' { b'>' } else { b'"' };
                j += 1;
                while j < n && self.render[j] != close {
                    j += 1;
                }
                if j < n {
                    j += 1;
                }
            }
            _ => {
                while j < n && (is_identifier_char(self.render[j]) || self.render[j] == b'.') {
                    j += 1;
                }
            }
        }
        self.paint(arg_start, j, Highlight::TypeKeyword);
        j
    }

    fn run(&mut self, mut i: usize) {
        let n = self.render.len();
        let (block_start, block_end) = self.rule.block_comment.unwrap_or(("", ""));
        let line_comment = self.rule.single_line_comment.unwrap_or("");

        while i < n {
            let c = self.render[i];
            let prev_hl = if i > 0 {
                self.classes[i - 1]
            } else {
                Highlight::Normal
            };

            if let Some(delimiter) = self.in_string {
                self.classes[i] = Highlight::String;
                if c == b'\\' && i + 1 < n {
                    self.classes[i + 1] = Highlight::String;
                    i += 2;
                    continue;
                }
                if c == delimiter {
                    self.in_string = None;
                }
                i += 1;
                self.prev_sep = true;
                continue;
            }

            if self.in_comment {
                if self.starts_with(i, block_end) {
                    self.paint(i, i + block_end.len(), Highlight::BlockComment);
                    i += block_end.len();
                    self.in_comment = false;
                    self.prev_sep = true;
                } else {
                    self.classes[i] = Highlight::BlockComment;
                    i += 1;
                }
                continue;
            }

            if self.starts_with(i, block_start) {
                self.paint(i, i + block_start.len(), Highlight::BlockComment);
                i += block_start.len();
                self.in_comment = true;
                continue;
            }

            if self.starts_with(i, line_comment) {
                self.paint(i, n, Highlight::Comment);
                break;
            }

            if c == b'"' || c == b'\'' || (c == b'<' && self.after_include) {
                self.in_string = Some(if c == b'<' { b'>' } else { c });
                self.after_include = false;
                self.classes[i] = Highlight::String;
                i += 1;
                continue;
            }

            if c.is_ascii_digit() {
                if self.prev_sep {
                    if let Some(end) = self.based_number(i) {
                        i = end;
                        self.prev_sep = false;
                        continue;
                    }
                }
                if self.prev_sep || prev_hl == Highlight::Number {
                    self.classes[i] = Highlight::Number;
                    i += 1;
                    self.prev_sep = false;
                    continue;
                }
            } else if c == b'.' && prev_hl == Highlight::Number {
                self.classes[i] = Highlight::Number;
                i += 1;
                self.prev_sep = false;
                continue;
            }

            if self.prev_sep {
                if let Some(end) = self.keyword(i) {
                    i = end;
                    self.prev_sep = false;
                    continue;
                }
            }

            if is_punctuation(c) {
                self.classes[i] = Highlight::Punctuation;
            }

            if is_identifier_start(c) && self.prev_sep {
                i = self.identifier(i);
                self.prev_sep = false;
                self.expect_definition = false;
                self.after_include = false;
                continue;
            }

            if !c.is_ascii_whitespace() {
                self.expect_definition = false;
                self.after_include = false;
            }
            self.prev_sep = is_separator(Some(c));
            i += 1;
        }
    }

    /// `0x`/`0o`/`0b` literals; returns the end of the literal
    fn based_number(&mut self, i: usize) -> Option<usize> {
        if self.render[i] != b'0' {
            return None;
        }
        let base = self.at(i + 1)?.to_ascii_lowercase();
        let valid: fn(u8) -> bool = match base {
            b'x' => |c| c.is_ascii_hexdigit(),
            b'o' => |c| (b'0'..=b'7').contains(&c),
            b'b' => |c| c == b'0' || c == b'1',
            _ => return None,
        };

        let mut end = i + 2;
        while self.at(end).is_some_and(valid) {
            end += 1;
        }
        self.paint(i, end, Highlight::Number);
        Some(end)
    }

    /// Whole-token keyword match at `i`; returns the end of the keyword
    fn keyword(&mut self, i: usize) -> Option<usize> {
        let rule = self.rule;
        let keyword = rule.classified_keywords().find(|kw| {
            self.starts_with(i, kw.text) && is_separator(self.at(i + kw.text.len()))
        })?;

        let end = i + keyword.text.len();
        let class = if keyword.is_type {
            Highlight::TypeKeyword
        } else {
            Highlight::Keyword
        };
        self.paint(i, end, class);

        self.expect_definition = rule.dialect.definition_keywords().contains(&keyword.text);
        self.after_include = keyword.text == "#include";
        Some(end)
    }

    /// Scan an identifier, tagging it when it names a definition or call
    fn identifier(&mut self, i: usize) -> usize {
        let n = self.render.len();
        let mut end = i;
        while end < n && is_identifier_char(self.render[end]) {
            end += 1;
        }

        let is_definition = self.expect_definition
            || (self.rule.dialect.highlights_calls() && self.followed_by_paren(end));
        if is_definition {
            self.paint(i, end, Highlight::DefinitionName);
        }
        end
    }

    fn followed_by_paren(&self, mut j: usize) -> bool {
        while self.at(j).is_some_and(|c| c.is_ascii_whitespace()) {
            j += 1;
        }
        self.at(j) == Some(b'(')
    }
}
