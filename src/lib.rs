//! Best-effort parser for the password rule strings published in the
//! [password-manager-resources][resources] `quirks/password-rules.json` file.
//!
//! Each entry of that file maps a domain to a rule string written in the
//! [`passwordrules` grammar][apple_docs], for example:
//!
//! `minlength: 6; maxlength: 20; required: digit; allowed: lower, upper, [@$!#()&^*%];`
//!
//! # Password Rules
//!
//! A rule string is a list of `key: value` clauses separated by a semicolon
//! and a space. The clauses this crate understands are:
//!
//! * `minlength` - The minimum length of the password
//! * `maxlength` - The maximum length of the password
//! * `required` - Character classes that must appear in the password
//! * `allowed` - Character classes that may appear in the password
//!
//! Classes in `required` and `allowed` are separated by a comma and a space.
//! Repeating a `required` or `allowed` clause adds to the set; repeating a
//! length clause replaces the earlier value.
//!
//! Anything else (unknown keys such as `max-consecutive`, lengths that are not
//! numbers, clauses without a colon) is skipped rather than rejected. The feed
//! is maintained by hand, and one odd clause shouldn't hide the rest of a
//! domain's rules. Use [`parse_rule_with_diagnostics`] to find out what was
//! skipped.
//!
//! # Character Classes
//!
//! * `upper`, `lower`, `digit`, `special`, `unicode` - the named classes
//! * `[...]` - a literal list of characters, such as `[-().&@?'#,/"+]`
//!
//! A class listed as required is never also listed as allowed; see
//! [`PasswordCharacter`] for how classes are ordered.
//!
//! # Example
//!
//! This example can be run via `cargo run --example parse`.
//!
//! ```
//! use password_rules_inspector::{parse_rule, PasswordCharacter};
//!
//! let rule = parse_rule(
//!     "hotels.com",
//!     "minlength: 6; maxlength: 20; required: digit; allowed: lower, upper, [@$!#()&^*%];",
//! );
//!
//! assert_eq!(rule.min_length(), Some(6));
//! assert_eq!(rule.max_length(), Some(20));
//! assert_eq!(
//!     rule.required().iter().collect::<Vec<_>>(),
//!     vec![&PasswordCharacter::Digit]
//! );
//! assert_eq!(
//!     rule.allowed().iter().cloned().collect::<Vec<_>>(),
//!     vec![
//!         PasswordCharacter::Upper,
//!         PasswordCharacter::Lower,
//!         PasswordCharacter::other("@$!#()&^*%".chars()),
//!     ]
//! );
//! ```
//!
//! You can try parsing arbitrary rules with this tool via `cargo run --example cli`.
//!
//! [resources]: https://github.com/apple/password-manager-resources
//! [apple_docs]: https://developer.apple.com/password-rules/

#![forbid(unsafe_code)]

pub mod character;
pub mod diagnostic;

pub use crate::character::PasswordCharacter;
pub use crate::diagnostic::{Diagnostics, Skipped, SkippedAt};

use nom::{
    self,
    branch::alt,
    character::complete::{char, digit1},
    combinator::{all_consuming, map_res, opt, value},
    error::{FromExternalError, ParseError},
    sequence::pair,
    IResult,
};
use std::collections::BTreeSet;
use tracing::debug;

/// The parsed password policy of a single domain
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    id: String,
    original_rule: String,
    min_length: Option<u32>,
    max_length: Option<u32>,
    required: BTreeSet<PasswordCharacter>,
    allowed: BTreeSet<PasswordCharacter>,
}

impl Rule {
    /// Parse `rule` as the password rule for `domain`. Same as [`parse_rule`].
    pub fn parse(domain: &str, rule: &str) -> Self {
        parse_rule(domain, rule)
    }

    fn empty(domain: &str, rule: &str) -> Self {
        Rule {
            id: domain.to_owned(),
            original_rule: rule.to_owned(),
            min_length: None,
            max_length: None,
            required: BTreeSet::new(),
            allowed: BTreeSet::new(),
        }
    }

    /// The domain this rule applies to
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The rule string exactly as it was given to the parser
    pub fn original_rule(&self) -> &str {
        &self.original_rule
    }

    /// The minimum length of the password, if the rule states one
    pub fn min_length(&self) -> Option<u32> {
        self.min_length
    }

    /// The maximum length of the password, if the rule states one
    pub fn max_length(&self) -> Option<u32> {
        self.max_length
    }

    /// Classes that must appear in the password, in canonical order
    pub fn required(&self) -> &BTreeSet<PasswordCharacter> {
        &self.required
    }

    /// Classes that may appear in the password but aren't required, in
    /// canonical order. Never overlaps with [`Rule::required`].
    pub fn allowed(&self) -> &BTreeSet<PasswordCharacter> {
        &self.allowed
    }

    pub fn has_length_constraint(&self) -> bool {
        self.min_length.is_some() || self.max_length.is_some()
    }

    /// Short form of the length bounds, such as `8 – 64` or `6 – ?`
    pub fn length_label(&self) -> String {
        let bound = |length: Option<u32>| {
            length.map_or_else(|| "?".to_owned(), |n| n.to_string())
        };

        format!("{} – {}", bound(self.min_length), bound(self.max_length))
    }
}

/// A single recognized clause of a rule string
#[derive(Debug, Clone)]
enum Clause {
    MinLength(Option<u32>),
    MaxLength(Option<u32>),
    Required(Vec<PasswordCharacter>),
    Allowed(Vec<PasswordCharacter>),
}

/// A slice of the rule string, along with its byte offset in the whole string
#[derive(Debug, Clone, Copy)]
struct Fragment<'a> {
    offset: usize,
    text: &'a str,
}

impl<'a> Fragment<'a> {
    fn slice(self, start: usize, end: usize) -> Self {
        Fragment {
            offset: self.offset + start,
            text: &self.text[start..end],
        }
    }
}

// HELPER PARSER COMBINATORS

/// Parse only an EOF
fn eof<'a, E>(input: &'a str) -> IResult<&'a str, (), E>
where
    E: ParseError<&'a str>,
{
    if input.is_empty() {
        Ok((input, ()))
    } else {
        Err(nom::Err::Error(E::from_error_kind(
            input,
            nom::error::ErrorKind::Eof,
        )))
    }
}

/// `;` followed by a space or the end of the input
fn clause_separator(input: &str) -> IResult<&str, (), ()> {
    value((), pair(char(';'), alt((value((), char(' ')), eof))))(input)
}

/// `:` followed by an optional space
fn key_separator(input: &str) -> IResult<&str, (), ()> {
    value((), pair(char(':'), opt(char(' '))))(input)
}

/// `,` followed by a space or the end of the input
fn class_separator(input: &str) -> IResult<&str, (), ()> {
    value((), pair(char(','), alt((value((), char(' ')), eof))))(input)
}

/// Parse a number, which is 1 or more consecutive digits
fn parse_number<'a, E>(input: &'a str) -> IResult<&'a str, u32, E>
where
    E: ParseError<&'a str> + FromExternalError<&'a str, std::num::ParseIntError>,
{
    map_res(digit1, str::parse)(input)
}

/// Split `input` everywhere `separator` matches, scanning left to right and
/// resuming after each match. At most `limit` splits are made; the remainder
/// is kept whole. Empty pieces are dropped.
fn split_on<'a, S, O>(
    input: Fragment<'a>,
    mut separator: S,
    limit: Option<usize>,
) -> Vec<Fragment<'a>>
where
    S: FnMut(&'a str) -> IResult<&'a str, O, ()>,
{
    let text = input.text;
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut cursor = 0;
    let mut splits = 0;

    while cursor < text.len() && limit.map_or(true, |limit| splits < limit) {
        match separator(&text[cursor..]) {
            Ok((tail, _)) => {
                if start < cursor {
                    pieces.push(input.slice(start, cursor));
                }
                start = text.len() - tail.len();
                cursor = start;
                splits += 1;
            }
            Err(_) => {
                cursor += text[cursor..].chars().next().map_or(1, |c| c.len_utf8());
            }
        }
    }

    if start < text.len() {
        pieces.push(input.slice(start, text.len()));
    }

    pieces
}

// RULE PARSERS

/// Parse a `minlength` or `maxlength` value. Surrounding punctuation is
/// ignored; anything else that isn't a plain number leaves the length unset.
fn parse_length<'a>(
    key: &str,
    value: Fragment<'a>,
    skip: &mut impl FnMut(Fragment<'a>, Skipped),
) -> Option<u32> {
    let digits = value.text.trim_matches(|c: char| c.is_ascii_punctuation());
    let parsed: IResult<&str, u32, ()> = all_consuming(parse_number)(digits);

    match parsed {
        Ok((_, length)) => Some(length),
        Err(_) => {
            skip(
                value,
                Skipped::InvalidLength {
                    key: key.to_owned(),
                    value: value.text.to_owned(),
                },
            );
            None
        }
    }
}

/// Parse the comma separated list of a `required` or `allowed` clause
fn parse_classes<'a>(
    value: Fragment<'a>,
    skip: &mut impl FnMut(Fragment<'a>, Skipped),
) -> Vec<PasswordCharacter> {
    split_on(value, class_separator, None)
        .into_iter()
        .filter_map(|token| match PasswordCharacter::from(token.text) {
            PasswordCharacter::Other(chars) if chars.is_empty() => {
                skip(token, Skipped::EmptyCharacterSet);
                None
            }
            class => Some(class),
        })
        .collect()
}

/// Parse a single `key: value` clause. Returns `None` if the clause isn't
/// one this parser understands.
fn parse_clause<'a>(
    clause: Fragment<'a>,
    skip: &mut impl FnMut(Fragment<'a>, Skipped),
) -> Option<Clause> {
    let parts = split_on(clause, key_separator, Some(1));

    let [key, value] = parts.as_slice() else {
        skip(clause, Skipped::MalformedClause);
        return None;
    };

    match key.text.trim() {
        "minlength" => Some(Clause::MinLength(parse_length("minlength", *value, skip))),
        "maxlength" => Some(Clause::MaxLength(parse_length("maxlength", *value, skip))),
        "required" => Some(Clause::Required(parse_classes(*value, skip))),
        "allowed" => Some(Clause::Allowed(parse_classes(*value, skip))),
        unknown => {
            skip(clause, Skipped::UnknownKey(unknown.to_owned()));
            None
        }
    }
}

/// Parse the password rule string of a single domain.
///
/// This never fails: clauses and values that can't be understood are
/// skipped, so a rule with no recognizable clauses comes back with no
/// lengths and empty class sets. Any class that is required is removed from
/// the allowed set.
pub fn parse_rule(domain: &str, rule: &str) -> Rule {
    parse_rule_with_diagnostics(domain, rule).0
}

/// Like [`parse_rule`], but also report everything that was skipped, with
/// its location in `rule`.
pub fn parse_rule_with_diagnostics(domain: &str, rule: &str) -> (Rule, Diagnostics) {
    let mut diagnostics = Diagnostics::default();

    let mut skip = |fragment: Fragment, reason: Skipped| {
        debug!(domain, offset = fragment.offset, %reason, "skipping part of password rule");
        diagnostics.push(SkippedAt::locate(
            rule,
            fragment.offset,
            fragment.text.len(),
            reason,
        ));
    };

    let whole = Fragment {
        offset: 0,
        text: rule,
    };

    let mut parsed = split_on(whole, clause_separator, None)
        .into_iter()
        .filter_map(|clause| parse_clause(clause, &mut skip))
        .fold(Rule::empty(domain, rule), |mut parsed, clause| {
            match clause {
                Clause::MinLength(length) => parsed.min_length = length,
                Clause::MaxLength(length) => parsed.max_length = length,
                Clause::Required(classes) => parsed.required.extend(classes),
                Clause::Allowed(classes) => parsed.allowed.extend(classes),
            };
            parsed
        });

    // A required class is always allowed; don't list it twice
    let required = &parsed.required;
    parsed.allowed.retain(|class| !required.contains(class));

    (parsed, diagnostics)
}

/// Parse a whole collection of `(domain, rule)` pairs, such as the entries
/// of `password-rules.json`. Each entry is parsed independently and the
/// output keeps the input order.
pub fn parse_rules<I, D, R>(entries: I) -> Vec<Rule>
where
    I: IntoIterator<Item = (D, R)>,
    D: AsRef<str>,
    R: AsRef<str>,
{
    entries
        .into_iter()
        .map(|(domain, rule)| parse_rule(domain.as_ref(), rule.as_ref()))
        .collect()
}
