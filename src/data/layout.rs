use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Leading token that marks a header line under [`HeaderRule::FirstnamePrefix`].
pub const HEADER_PREFIX: &str = "firstname";

// ---------------------------------------------------------------------------
// HeaderRule – which line is the header
// ---------------------------------------------------------------------------

/// How the header line of a roster file is recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeaderRule {
    /// Any line whose first column starts with `firstname`.
    #[default]
    FirstnamePrefix,
    /// The first non-blank line, whatever it contains.
    FirstLine,
}

impl HeaderRule {
    /// `ordinal` is the position of the line among non-blank lines.
    pub fn is_header(&self, ordinal: usize, first_column: &str) -> bool {
        match self {
            HeaderRule::FirstnamePrefix => first_column.starts_with(HEADER_PREFIX),
            HeaderRule::FirstLine => ordinal == 0,
        }
    }
}

impl FromStr for HeaderRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "firstname-prefix" => Ok(HeaderRule::FirstnamePrefix),
            "first-line" => Ok(HeaderRule::FirstLine),
            other => Err(format!(
                "unknown header rule '{other}' (expected firstname-prefix or first-line)"
            )),
        }
    }
}

impl fmt::Display for HeaderRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderRule::FirstnamePrefix => write!(f, "firstname-prefix"),
            HeaderRule::FirstLine => write!(f, "first-line"),
        }
    }
}

// ---------------------------------------------------------------------------
// FieldColumn – where the field of study lives
// ---------------------------------------------------------------------------

/// Column holding the field of study. Serialized as `"last"` or an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "FieldColumnRepr", into = "FieldColumnRepr")]
pub enum FieldColumn {
    #[default]
    Last,
    Index(usize),
}

impl FieldColumn {
    /// Resolve to a concrete index for a line with `len` columns.
    ///
    /// Column 0 is the first name, so `Last` needs at least two columns.
    pub fn position(&self, len: usize) -> Option<usize> {
        match *self {
            FieldColumn::Last => (len >= 2).then(|| len - 1),
            FieldColumn::Index(idx) => (idx < len).then_some(idx),
        }
    }
}

impl FromStr for FieldColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("last") {
            return Ok(FieldColumn::Last);
        }
        s.parse::<usize>()
            .map(FieldColumn::Index)
            .map_err(|_| format!("invalid field column '{s}' (expected 'last' or an index)"))
    }
}

impl fmt::Display for FieldColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldColumn::Last => write!(f, "last"),
            FieldColumn::Index(idx) => write!(f, "{idx}"),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum FieldColumnRepr {
    Index(usize),
    Name(String),
}

impl TryFrom<FieldColumnRepr> for FieldColumn {
    type Error = String;

    fn try_from(repr: FieldColumnRepr) -> Result<Self, Self::Error> {
        match repr {
            FieldColumnRepr::Index(idx) => Ok(FieldColumn::Index(idx)),
            FieldColumnRepr::Name(name) => name.parse(),
        }
    }
}

impl From<FieldColumn> for FieldColumnRepr {
    fn from(column: FieldColumn) -> Self {
        match column {
            FieldColumn::Last => FieldColumnRepr::Name("last".to_string()),
            FieldColumn::Index(idx) => FieldColumnRepr::Index(idx),
        }
    }
}

// ---------------------------------------------------------------------------
// RosterLayout
// ---------------------------------------------------------------------------

/// Shape of a roster file. Missing keys in a JSON layout fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterLayout {
    pub header: HeaderRule,
    pub field_column: FieldColumn,
}
