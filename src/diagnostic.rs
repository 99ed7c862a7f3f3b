//! Records of the parts of a rule string that the parser skipped
//!
//! Parsing never fails; a clause or value that can't be understood is left
//! out of the resulting [`Rule`](crate::Rule). Callers that want to know what
//! was left out, and where, can ask for a [`Diagnostics`] alongside the rule.

use std::fmt::{self, Display, Formatter, Write};

use itertools::{Itertools, Position::*};
use pretty_lint::{Position, PrettyLint, Span};

/// Why a piece of the input was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Skipped {
    /// The clause has no `key: value` shape
    MalformedClause,
    /// The clause key is not one of the recognized keywords
    UnknownKey(String),
    /// A `minlength` or `maxlength` value that isn't a non-negative integer
    InvalidLength { key: String, value: String },
    /// A literal character class with no characters in it, such as `[]`
    EmptyCharacterSet,
}

impl Display for Skipped {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Skipped::MalformedClause => write!(f, "malformed clause"),
            Skipped::UnknownKey(key) => write!(f, "unknown key {key:?}"),
            Skipped::InvalidLength { key, value } => {
                write!(f, "{key} value {value:?} is not a number")
            }
            Skipped::EmptyCharacterSet => write!(f, "empty character set"),
        }
    }
}

/// A single skipped fragment and its location in the original input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedAt {
    /// The byte index of the fragment
    pub index: usize,

    /// The byte length of the fragment
    pub len: usize,

    /// The line number (starting with 1) of the fragment
    pub line: u32,

    /// The column number (starting with 1) of the fragment
    pub column: u32,

    pub reason: Skipped,
}

impl SkippedAt {
    /// Locate a fragment starting at byte `index` of `input`
    pub(crate) fn locate(input: &str, index: usize, len: usize, reason: Skipped) -> Self {
        let prefix = &input[..index];

        let line_number = prefix.chars().filter(|&c| c == '\n').count() + 1;
        let last_line_start = prefix
            .char_indices()
            .rev()
            .find(|&(_, c)| c == '\n')
            .map(|(index, _)| index + 1)
            .unwrap_or(0);
        let column_number = prefix[last_line_start..].chars().count() + 1;

        SkippedAt {
            index,
            len,
            line: line_number.try_into().unwrap_or(u32::MAX),
            column: column_number.try_into().unwrap_or(u32::MAX),
            reason,
        }
    }

    fn span(&self, input: &str) -> Span {
        let end = input
            .get(self.index..self.index + self.len)
            .map(|fragment| fragment.chars().count())
            .unwrap_or(0);

        Span {
            start: Position {
                line: self.line as usize,
                col: self.column as usize,
            },
            end: Position {
                line: self.line as usize,
                col: self.column as usize + end.saturating_sub(1),
            },
        }
    }
}

/// Everything that was skipped while parsing one rule string, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub skipped: Vec<SkippedAt>,
}

impl Diagnostics {
    pub(crate) fn push(&mut self, entry: SkippedAt) {
        self.skipped.push(entry);
    }

    pub fn is_empty(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn len(&self) -> usize {
        self.skipped.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkippedAt> {
        self.skipped.iter()
    }

    /// Build a pretty version of the diagnostics given the original input string.
    ///
    /// The default `Display` implementation lists every entry on its own line:
    ///
    /// ```text
    /// skipped unknown key "max-consecutive" at 1:15
    /// ```
    ///
    /// This method points into the source instead, with colors if the
    /// terminal supports them:
    ///
    /// ```text
    /// error: skipped clause
    ///  --> 1:15
    ///   |
    /// 1 | minlength: 8; max-consecutive: 2; required: digit
    ///   |               ^^^^^^^^^^^^^^^^^^ unknown key "max-consecutive"
    /// ```
    ///
    /// Entries that share a location are reported together.
    pub fn to_string_pretty(&self, s: &str) -> Result<String, fmt::Error> {
        let mut lint_string = String::new();

        // Several values of one clause can be skipped at the same spot
        let groups = self.skipped.iter().chunk_by(|entry| (entry.index, entry.len));

        groups.into_iter().try_for_each(|(_, group)| {
            let group: Vec<&SkippedAt> = group.collect();
            let Some(first) = group.first() else {
                return Ok(());
            };
            let mut inline_message = String::new();

            group
                .iter()
                .with_position()
                .try_for_each(|positioned| match positioned {
                    (Only, entry) | (Last, entry) => write!(inline_message, "{}", entry.reason),
                    (First, entry) | (Middle, entry) => {
                        write!(inline_message, "{}, ", entry.reason)
                    }
                })?;

            let lint = PrettyLint::error(s)
                .with_message("skipped clause")
                .with_inline_message(&inline_message)
                .at(first.span(s));

            write!(lint_string, "{lint}")
        })?;

        Ok(lint_string)
    }
}

impl Display for Diagnostics {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.skipped.is_empty() {
            return write!(f, "nothing skipped");
        }

        self.skipped.iter().with_position().try_for_each(|positioned| {
            let entry = positioned.1;
            write!(
                f,
                "skipped {} at {}:{}",
                entry.reason, entry.line, entry.column
            )?;

            match positioned.0 {
                Only | Last => Ok(()),
                First | Middle => writeln!(f),
            }
        })
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a SkippedAt;
    type IntoIter = std::slice::Iter<'a, SkippedAt>;

    fn into_iter(self) -> Self::IntoIter {
        self.skipped.iter()
    }
}
