//! Join clauses and the nullability/visibility they impose on tuples

use indexmap::IndexMap;
use smallvec::SmallVec;
use sqlscope_ast::{JoinOperator, TupleId};
use std::collections::HashMap;

/// One join clause, identified by its right-hand tuple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinClause {
    pub rhs: TupleId,
    pub op: JoinOperator,
    /// Tuples materialized on the left input of the join
    pub left_tuple_ids: SmallVec<[TupleId; 4]>,
}

impl JoinClause {
    pub fn new(
        rhs: TupleId,
        op: JoinOperator,
        left_tuple_ids: impl IntoIterator<Item = TupleId>,
    ) -> Self {
        Self {
            rhs,
            op,
            left_tuple_ids: left_tuple_ids.into_iter().collect(),
        }
    }

    /// Left tuples followed by the right-hand tuple
    pub fn all_tuple_ids(&self) -> SmallVec<[TupleId; 4]> {
        let mut ids = self.left_tuple_ids.clone();
        ids.push(self.rhs);
        ids
    }
}

/// Records which clause last made each tuple nullable or invisible
///
/// A tuple is absent from the outer-join map unless some clause outer-joins
/// it, and likewise for the semi-join map.
#[derive(Debug, Clone, Default)]
pub struct JoinNullability {
    clauses: IndexMap<TupleId, JoinClause>,
    outer_joined: HashMap<TupleId, TupleId>,
    semi_joined: HashMap<TupleId, TupleId>,
}

impl JoinNullability {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a clause and update the tuples it affects
    pub fn register_join(&mut self, clause: JoinClause) {
        let rhs = clause.rhs;
        let op = clause.op;

        if op.outer_joins_rhs() {
            self.outer_joined.insert(rhs, rhs);
        }
        if op.outer_joins_lhs() {
            for id in &clause.left_tuple_ids {
                self.outer_joined.insert(*id, rhs);
            }
        }
        if op.semi_joins_rhs() {
            self.semi_joined.insert(rhs, rhs);
        }
        if op.semi_joins_lhs() {
            for id in &clause.left_tuple_ids {
                self.semi_joined.insert(*id, rhs);
            }
        }

        log::debug!(
            "Registered {} clause {} over {:?}",
            op,
            rhs,
            clause.left_tuple_ids.as_slice()
        );
        self.clauses.insert(rhs, clause);
    }

    /// Clause identified by its right-hand tuple
    pub fn clause(&self, rhs: TupleId) -> Option<&JoinClause> {
        self.clauses.get(&rhs)
    }

    /// Last outer join clause that made `tuple` nullable
    pub fn last_outer_join_clause(&self, tuple: TupleId) -> Option<&JoinClause> {
        self.outer_joined
            .get(&tuple)
            .and_then(|rhs| self.clauses.get(rhs))
    }

    /// Semi or anti join clause that hides `tuple`
    pub fn semi_join_clause(&self, tuple: TupleId) -> Option<&JoinClause> {
        self.semi_joined
            .get(&tuple)
            .and_then(|rhs| self.clauses.get(rhs))
    }

    pub fn is_outer_joined(&self, tuple: TupleId) -> bool {
        self.outer_joined.contains_key(&tuple)
    }

    pub fn is_semi_joined(&self, tuple: TupleId) -> bool {
        self.semi_joined.contains_key(&tuple)
    }

    /// Clauses in registration order
    pub fn clauses(&self) -> impl Iterator<Item = &JoinClause> {
        self.clauses.values()
    }

    /// (tuple, clause rhs) pairs of outer-joined tuples
    pub fn outer_joined(&self) -> impl Iterator<Item = (TupleId, TupleId)> + '_ {
        self.outer_joined.iter().map(|(t, rhs)| (*t, *rhs))
    }

    /// (tuple, clause rhs) pairs of semi-joined tuples
    pub fn semi_joined(&self) -> impl Iterator<Item = (TupleId, TupleId)> + '_ {
        self.semi_joined.iter().map(|(t, rhs)| (*t, *rhs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(id: u32) -> TupleId {
        TupleId::new(id)
    }

    #[test]
    fn test_left_outer_join_nulls_rhs_only() {
        let mut joins = JoinNullability::new();
        joins.register_join(JoinClause::new(t(1), JoinOperator::LeftOuter, [t(0)]));

        assert!(joins.is_outer_joined(t(1)));
        assert!(!joins.is_outer_joined(t(0)));
        assert_eq!(
            joins.last_outer_join_clause(t(1)).unwrap().all_tuple_ids().as_slice(),
            &[t(0), t(1)]
        );
    }

    #[test]
    fn test_full_outer_join_nulls_both_sides() {
        let mut joins = JoinNullability::new();
        joins.register_join(JoinClause::new(t(2), JoinOperator::FullOuter, [t(0), t(1)]));

        for id in [t(0), t(1), t(2)] {
            assert_eq!(joins.last_outer_join_clause(id).map(|c| c.rhs), Some(t(2)));
        }
    }

    #[test]
    fn test_later_clause_wins() {
        let mut joins = JoinNullability::new();
        joins.register_join(JoinClause::new(t(1), JoinOperator::LeftOuter, [t(0)]));
        joins.register_join(JoinClause::new(t(2), JoinOperator::RightOuter, [t(0), t(1)]));

        assert_eq!(joins.last_outer_join_clause(t(1)).map(|c| c.rhs), Some(t(2)));
        assert!(!joins.is_outer_joined(t(2)));
    }

    #[test]
    fn test_semi_joins() {
        let mut joins = JoinNullability::new();
        joins.register_join(JoinClause::new(t(1), JoinOperator::LeftAnti, [t(0)]));
        joins.register_join(JoinClause::new(t(3), JoinOperator::RightSemi, [t(2)]));

        assert!(joins.is_semi_joined(t(1)));
        assert!(joins.is_semi_joined(t(2)));
        assert!(!joins.is_semi_joined(t(3)));
        assert!(!joins.is_outer_joined(t(1)));
        assert_eq!(joins.semi_join_clause(t(2)).map(|c| c.rhs), Some(t(3)));
    }

    #[test]
    fn test_inner_join_records_clause_only() {
        let mut joins = JoinNullability::new();
        joins.register_join(JoinClause::new(t(1), JoinOperator::Inner, [t(0)]));

        assert!(joins.clause(t(1)).is_some());
        assert_eq!(joins.outer_joined().count(), 0);
        assert_eq!(joins.semi_joined().count(), 0);
    }
}
