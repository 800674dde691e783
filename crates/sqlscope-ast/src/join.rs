//! Join operators and the nullability/visibility rules they imply

use serde::{Deserialize, Serialize};
use std::fmt;

/// The operator joining a table reference to the tuples before it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinOperator {
    Inner,
    Cross,
    LeftOuter,
    RightOuter,
    FullOuter,
    LeftSemi,
    LeftAnti,
    RightSemi,
    RightAnti,
    /// `NOT IN` rewritten to an anti join that treats NULL keys specially
    NullAwareLeftAnti,
}

impl JoinOperator {
    /// Check if this is any kind of outer join
    pub const fn is_outer_join(&self) -> bool {
        matches!(self, Self::LeftOuter | Self::RightOuter | Self::FullOuter)
    }

    /// Check if this is any kind of semi or anti join
    pub const fn is_semi_join(&self) -> bool {
        self.semi_joins_rhs() || self.semi_joins_lhs()
    }

    /// The right-hand tuple becomes nullable
    pub const fn outer_joins_rhs(&self) -> bool {
        matches!(self, Self::LeftOuter | Self::FullOuter)
    }

    /// Every left-hand tuple becomes nullable
    pub const fn outer_joins_lhs(&self) -> bool {
        matches!(self, Self::RightOuter | Self::FullOuter)
    }

    /// The right-hand tuple is only visible inside the clause
    pub const fn semi_joins_rhs(&self) -> bool {
        matches!(
            self,
            Self::LeftSemi | Self::LeftAnti | Self::NullAwareLeftAnti
        )
    }

    /// The left-hand tuples are only visible inside the clause
    pub const fn semi_joins_lhs(&self) -> bool {
        matches!(self, Self::RightSemi | Self::RightAnti)
    }

    /// Get the SQL keyword
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Cross => "CROSS JOIN",
            Self::LeftOuter => "LEFT OUTER JOIN",
            Self::RightOuter => "RIGHT OUTER JOIN",
            Self::FullOuter => "FULL OUTER JOIN",
            Self::LeftSemi => "LEFT SEMI JOIN",
            Self::LeftAnti => "LEFT ANTI JOIN",
            Self::RightSemi => "RIGHT SEMI JOIN",
            Self::RightAnti => "RIGHT ANTI JOIN",
            Self::NullAwareLeftAnti => "NULL AWARE LEFT ANTI JOIN",
        }
    }
}

impl fmt::Display for JoinOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
