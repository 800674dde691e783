//! Predicate placement
//!
//! Answers "which registered conjuncts may be evaluated once exactly this set
//! of tuples is materialized". The answers are conservative: a conjunct left
//! out is only "not yet", and the planner may always delay further.

use crate::{Conjunct, ConjunctRegistry, JoinNullability};
use sqlscope_ast::{Expr, TupleId};
use std::collections::BTreeSet;

/// Read-only view over the conjunct registry and join nullability
#[derive(Debug, Clone, Copy)]
pub struct PlacementEngine<'a> {
    conjuncts: &'a ConjunctRegistry,
    joins: &'a JoinNullability,
}

impl<'a> PlacementEngine<'a> {
    pub fn new(conjuncts: &'a ConjunctRegistry, joins: &'a JoinNullability) -> Self {
        Self { conjuncts, joins }
    }

    /// Unassigned conjuncts fully bound by `tuple_ids`
    ///
    /// Constant conjuncts are returned only when one of their owners is in
    /// `tuple_ids`. Auxiliary conjuncts are never returned. Conjuncts tied to
    /// an outer join clause are returned only with `include_oj_conjuncts`,
    /// and never when constant.
    pub fn unassigned_conjuncts(
        &self,
        tuple_ids: &BTreeSet<TupleId>,
        include_oj_conjuncts: bool,
    ) -> Vec<&'a Conjunct> {
        let conjuncts = self.conjuncts;
        conjuncts
            .iter()
            .filter(|c| {
                if conjuncts.is_assigned(c.id) {
                    return false;
                }
                if c.constant && !conjuncts.is_constant_owned_by(c.id, tuple_ids) {
                    log::trace!("{}: constant without materialized owner", c.id);
                    return false;
                }
                if !c.is_bound_by(tuple_ids) || c.auxiliary {
                    return false;
                }
                let is_oj = conjuncts.oj_clause(c.id).is_some();
                (include_oj_conjuncts && !c.constant) || !is_oj
            })
            .collect()
    }

    /// Unassigned conjuncts that can be correctly evaluated over `tuple_ids`
    pub fn evaluable_conjuncts(&self, tuple_ids: &BTreeSet<TupleId>) -> Vec<&'a Conjunct> {
        self.unassigned_conjuncts(tuple_ids, true)
            .into_iter()
            .filter(|c| self.can_eval_tuples(tuple_ids, &c.tuple_ids))
            .collect()
    }

    /// Check whether a conjunct can be evaluated once `tuple_ids` exist
    pub fn can_eval_predicate(&self, tuple_ids: &BTreeSet<TupleId>, conjunct: &Conjunct) -> bool {
        conjunct.is_bound_by(tuple_ids) && self.can_eval_tuples(tuple_ids, &conjunct.tuple_ids)
    }

    /// Same as [`can_eval_predicate`](Self::can_eval_predicate) for an
    /// unregistered expression
    pub fn can_eval_expr(&self, tuple_ids: &BTreeSet<TupleId>, expr: &Expr) -> bool {
        expr.is_bound_by(tuple_ids) && self.can_eval_tuples(tuple_ids, &expr.tuple_ids())
    }

    /// The last outer join that nulls each referenced tuple must be fully
    /// materialized. Semi-joined tuples impose no constraint here; their
    /// clause is available from [`JoinNullability::semi_join_clause`].
    fn can_eval_tuples(
        &self,
        tuple_ids: &BTreeSet<TupleId>,
        referenced: &BTreeSet<TupleId>,
    ) -> bool {
        referenced.iter().all(|tid| {
            let Some(clause) = self.joins.last_outer_join_clause(*tid) else {
                return true;
            };
            let ready = clause.all_tuple_ids().iter().all(|id| tuple_ids.contains(id));
            if !ready {
                log::trace!("{} waits for outer join {}", tid, clause.rhs);
            }
            ready
        })
    }
}
