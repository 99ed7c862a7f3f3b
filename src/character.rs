//! Character classes referenced by `required` and `allowed` clauses

use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// A character class that a password rule can require or allow.
///
/// The five named classes come from the rules grammar; anything else is kept
/// as an explicit set of literal characters. The derived ordering is the
/// canonical display order: `Upper`, `Lower`, `Digit`, `Special`, `Unicode`,
/// then every `Other` set, with two `Other` sets compared by their sorted
/// characters.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PasswordCharacter {
    /// A-Z
    Upper,
    /// a-z
    Lower,
    /// 0-9
    Digit,
    /// ASCII punctuation and space
    Special,
    /// Any unicode character
    Unicode,
    /// A literal list of characters, such as `[-().&@?'#,/"+]`
    Other(BTreeSet<char>),
}

impl PasswordCharacter {
    /// The named classes, in canonical order
    pub const PREDEFINED: [PasswordCharacter; 5] = [
        PasswordCharacter::Upper,
        PasswordCharacter::Lower,
        PasswordCharacter::Digit,
        PasswordCharacter::Special,
        PasswordCharacter::Unicode,
    ];

    /// Build a literal class from any sequence of characters. Order and
    /// duplicates are irrelevant.
    pub fn other(chars: impl IntoIterator<Item = char>) -> Self {
        PasswordCharacter::Other(chars.into_iter().collect())
    }

    /// Look up a named class by its exact, case-sensitive keyword
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        use PasswordCharacter::*;

        match keyword {
            "upper" => Some(Upper),
            "lower" => Some(Lower),
            "digit" => Some(Digit),
            "special" => Some(Special),
            "unicode" => Some(Unicode),
            _ => None,
        }
    }

    /// The grammar keyword of a named class; `None` for `Other`
    pub fn keyword(&self) -> Option<&'static str> {
        use PasswordCharacter::*;

        match self {
            Upper => Some("upper"),
            Lower => Some("lower"),
            Digit => Some("digit"),
            Special => Some("special"),
            Unicode => Some("unicode"),
            Other(_) => None,
        }
    }

    pub fn is_predefined(&self) -> bool {
        !matches!(self, PasswordCharacter::Other(_))
    }
}

/// Interpret a single token from a `required` or `allowed` list.
///
/// Keywords map to their named class. Any other token is a literal set: a
/// single enclosing `[` and `]` pair is treated as delimiters, and every
/// character between them is a member. A token lacking that pair keeps all
/// of its characters, brackets included.
impl From<&str> for PasswordCharacter {
    fn from(token: &str) -> Self {
        if let Some(class) = PasswordCharacter::from_keyword(token) {
            return class;
        }

        let body = token
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(token);

        PasswordCharacter::other(body.chars())
    }
}

impl FromStr for PasswordCharacter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(PasswordCharacter::from(s))
    }
}

impl Display for PasswordCharacter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PasswordCharacter::Other(chars) => chars.iter().try_for_each(|c| write!(f, "{c}")),
            named => f.write_str(named.keyword().unwrap_or_default()),
        }
    }
}
