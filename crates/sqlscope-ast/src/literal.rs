//! Literal values in predicates

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A literal value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    /// NULL
    Null,
    /// TRUE / FALSE
    Boolean(bool),
    /// 64-bit signed integer
    Integer(i64),
    /// Exact decimal
    Decimal(Decimal),
    /// Quoted string
    String(String),
}

impl Literal {
    /// Check if this is the NULL literal
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Boolean(true) => write!(f, "TRUE"),
            Self::Boolean(false) => write!(f, "FALSE"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Decimal(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
        }
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<Decimal> for Literal {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case(Literal::Null, "NULL")]
    #[case(Literal::Boolean(false), "FALSE")]
    #[case(Literal::Integer(-5), "-5")]
    #[case(Literal::Decimal(Decimal::from_str("1.50").unwrap()), "1.50")]
    #[case(Literal::from("it's"), "'it''s'")]
    fn test_literal_display(#[case] literal: Literal, #[case] expected: &str) {
        assert_eq!(literal.to_string(), expected);
    }
}
