use super::error::FilterError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Comparison operators understood by the filter query syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "=~")]
    RegexMatch,
    #[serde(rename = "!~")]
    RegexNoMatch,
}

impl Operator {
    /// Operators in the order the parser tries them. Two-character tokens come
    /// first so `!=` is never read as `!` followed by `=`.
    pub const BY_PRECEDENCE: [Operator; 6] = [
        Operator::RegexMatch,
        Operator::RegexNoMatch,
        Operator::NotEqual,
        Operator::Equal,
        Operator::LessThan,
        Operator::GreaterThan,
    ];

    /// Get the textual token of this operator
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::LessThan => "<",
            Operator::GreaterThan => ">",
            Operator::RegexMatch => "=~",
            Operator::RegexNoMatch => "!~",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = FilterError;

    // Word aliases exist because `<`, `>` and `!` need quoting in most shells.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "=" | "eq" => Ok(Operator::Equal),
            "!=" | "ne" | "neq" => Ok(Operator::NotEqual),
            "<" | "lt" => Ok(Operator::LessThan),
            ">" | "gt" => Ok(Operator::GreaterThan),
            "=~" | "re" | "match" => Ok(Operator::RegexMatch),
            "!~" | "nre" | "not-match" => Ok(Operator::RegexNoMatch),
            _ => Err(FilterError::UnknownOperator(s.to_string())),
        }
    }
}

/// A single `key<op>"value"` filter condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    pub key: String,
    pub operator: Operator,
    pub value: String,
    /// Logical connector placeholder; never populated by the codec
    #[serde(default)]
    pub condition: String,
}

impl Clause {
    pub fn new(key: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            operator,
            value: value.into(),
            condition: String::new(),
        }
    }

    /// Whether encoding this clause and decoding it again yields the same
    /// key, operator and value.
    ///
    /// Values are written without escaping, so a `"` inside a value ends the
    /// clause early on the way back in.
    pub fn round_trips(&self) -> bool {
        !self.key.is_empty() && self.key.chars().all(is_key_char) && !self.value.contains('"')
    }

    /// Compare key, operator and value, ignoring `condition`
    pub fn same_filter(&self, other: &Clause) -> bool {
        self.key == other.key && self.operator == other.operator && self.value == other.value
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}\"{}\"", self.key, self.operator, self.value)
    }
}

/// Characters allowed in a clause key: ASCII word characters plus `.` for
/// dotted attribute names like `http.status_code`.
pub fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}
