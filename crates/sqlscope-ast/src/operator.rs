//! Predicate operators

use serde::{Deserialize, Serialize};

/// Binary comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    /// Equality
    Eq,
    /// Inequality
    NotEq,
    /// Less than
    Lt,
    /// Less than or equal
    LtEq,
    /// Greater than
    Gt,
    /// Greater than or equal
    GtEq,
    /// Null-safe equality (`<=>`)
    EqForNull,
}

impl BinaryOp {
    /// Get the operator symbol
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::EqForNull => "<=>",
        }
    }

    /// Operator with swapped operands (`a < b` is `b > a`)
    pub const fn commute(&self) -> Self {
        match self {
            Self::Lt => Self::Gt,
            Self::LtEq => Self::GtEq,
            Self::Gt => Self::Lt,
            Self::GtEq => Self::LtEq,
            other => *other,
        }
    }

    /// Check if this is an equality operator
    pub const fn is_equality(&self) -> bool {
        matches!(self, Self::Eq | Self::EqForNull)
    }
}

/// Logical connectives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompoundOp {
    /// Conjunction
    And,
    /// Disjunction
    Or,
    /// Negation (single child)
    Not,
}

impl CompoundOp {
    /// Get the operator keyword
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
        }
    }
}
