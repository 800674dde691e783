//! Registry of every predicate extracted during analysis

use crate::JoinClause;
use indexmap::IndexMap;
use sqlscope_ast::{ConjunctId, Expr, IdGenerator, TupleId};
use std::collections::{BTreeSet, HashMap, HashSet};

/// One registered predicate
#[derive(Debug, Clone, PartialEq)]
pub struct Conjunct {
    pub id: ConjunctId,
    pub expr: Expr,
    /// Tuples the predicate references
    pub tuple_ids: BTreeSet<TupleId>,
    pub constant: bool,
    /// Synthesized by analysis, never placed on its own
    pub auxiliary: bool,
    /// Right-hand tuple of the join clause whose On-clause produced it
    pub join_clause: Option<TupleId>,
}

impl Conjunct {
    /// Check if every referenced tuple is in `tuple_ids`
    pub fn is_bound_by(&self, tuple_ids: &BTreeSet<TupleId>) -> bool {
        self.tuple_ids.is_subset(tuple_ids)
    }
}

/// Owner of all conjuncts of an analysis tree
///
/// Assignment is tracked as a set of ids beside the entries, so marking is
/// idempotent and entries are never touched after registration.
#[derive(Debug, Clone, Default)]
pub struct ConjunctRegistry {
    conjuncts: IndexMap<ConjunctId, Conjunct>,
    assigned: HashSet<ConjunctId>,
    oj_clause_by_conjunct: HashMap<ConjunctId, TupleId>,
    constant_owners: HashMap<TupleId, HashSet<ConjunctId>>,
    ids: IdGenerator<ConjunctId>,
}

impl ConjunctRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a predicate under a fresh id
    ///
    /// `owners` schedules constant predicates: one is only placed once some
    /// owner is materialized. `origin` is the join clause whose On-clause the
    /// predicate came from.
    pub fn register(
        &mut self,
        expr: Expr,
        owners: &[TupleId],
        auxiliary: bool,
        origin: Option<&JoinClause>,
    ) -> ConjunctId {
        debug_assert!(
            !expr.has_unresolved_columns(),
            "conjunct registered before binding: {expr}"
        );
        let id = self.ids.next_id();
        let constant = expr.is_constant();

        if constant {
            if owners.is_empty() {
                log::warn!(
                    "Constant conjunct {} ({}) has no owning tuple and will never be placed",
                    id,
                    expr
                );
            }
            for owner in owners {
                self.constant_owners.entry(*owner).or_default().insert(id);
            }
        }
        if let Some(clause) = origin.filter(|c| c.op.is_outer_join()) {
            self.oj_clause_by_conjunct.insert(id, clause.rhs);
        }

        log::debug!("Registered conjunct {}: {}", id, expr);
        let conjunct = Conjunct {
            id,
            tuple_ids: expr.tuple_ids(),
            expr,
            constant,
            auxiliary,
            join_clause: origin.map(|c| c.rhs),
        };
        self.conjuncts.insert(id, conjunct);
        id
    }

    /// Mark conjuncts as placed; already assigned ids are ignored
    pub fn mark_assigned(&mut self, ids: impl IntoIterator<Item = ConjunctId>) {
        for id in ids {
            if self.assigned.insert(id) {
                log::trace!("Conjunct {} assigned", id);
            }
        }
    }

    pub fn is_assigned(&self, id: ConjunctId) -> bool {
        self.assigned.contains(&id)
    }

    pub fn get(&self, id: ConjunctId) -> Option<&Conjunct> {
        self.conjuncts.get(&id)
    }

    /// Conjuncts in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Conjunct> {
        self.conjuncts.values()
    }

    pub fn len(&self) -> usize {
        self.conjuncts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conjuncts.is_empty()
    }

    /// Outer join clause the conjunct is tied to
    pub fn oj_clause(&self, id: ConjunctId) -> Option<TupleId> {
        self.oj_clause_by_conjunct.get(&id).copied()
    }

    /// Check if some tuple in `tuple_ids` owns the constant conjunct `id`
    pub fn is_constant_owned_by(&self, id: ConjunctId, tuple_ids: &BTreeSet<TupleId>) -> bool {
        tuple_ids.iter().any(|tuple| {
            self.constant_owners
                .get(tuple)
                .is_some_and(|owned| owned.contains(&id))
        })
    }
}
