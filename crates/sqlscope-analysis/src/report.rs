//! Serializable snapshot of an analysis tree for EXPLAIN output

use crate::GlobalState;
use serde::Serialize;
use sqlscope_ast::{ConjunctId, JoinOperator, ScopeId, SlotId, TupleId};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotEntry {
    pub id: SlotId,
    pub column: Option<String>,
    pub column_type: Option<String>,
    pub nullable: bool,
    pub multi_ref: bool,
    pub scope: Option<ScopeId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TupleEntry {
    pub id: TupleId,
    pub table: Option<String>,
    pub aliases: Vec<String>,
    pub explicit_alias: bool,
    pub slots: Vec<SlotEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConjunctEntry {
    pub id: ConjunctId,
    pub expr: String,
    pub tuple_ids: Vec<TupleId>,
    pub constant: bool,
    pub auxiliary: bool,
    pub assigned: bool,
    pub join_clause: Option<TupleId>,
    pub outer_join_clause: Option<TupleId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinEntry {
    pub rhs: TupleId,
    pub op: JoinOperator,
    pub left_tuple_ids: Vec<TupleId>,
}

/// Tuples, conjuncts and join nullability of one analysis tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplainReport {
    pub tuples: Vec<TupleEntry>,
    pub conjuncts: Vec<ConjunctEntry>,
    pub joins: Vec<JoinEntry>,
    /// Outer-joined tuple to the rhs of the clause that nulls it
    pub outer_joined: BTreeMap<TupleId, TupleId>,
    /// Semi-joined tuple to the rhs of the clause that hides it
    pub semi_joined: BTreeMap<TupleId, TupleId>,
}

impl ExplainReport {
    pub fn from_state(state: &GlobalState) -> Self {
        let descriptors = &state.descriptors;
        let tuples = descriptors
            .tuples()
            .map(|tuple| TupleEntry {
                id: tuple.id(),
                table: tuple.table().map(|t| t.name.clone()),
                aliases: tuple.aliases().to_vec(),
                explicit_alias: tuple.has_explicit_alias(),
                slots: tuple
                    .slots()
                    .iter()
                    .filter_map(|id| descriptors.slot(*id))
                    .map(|slot| SlotEntry {
                        id: slot.id(),
                        column: slot.column().map(|c| c.name.clone()),
                        column_type: slot.column().map(|c| c.ty.to_string()),
                        nullable: slot.is_nullable(),
                        multi_ref: slot.is_multi_ref(),
                        scope: state.block_by_slot.get(&slot.id()).copied(),
                    })
                    .collect(),
            })
            .collect();

        let conjuncts = state
            .conjuncts
            .iter()
            .map(|c| ConjunctEntry {
                id: c.id,
                expr: c.expr.to_string(),
                tuple_ids: c.tuple_ids.iter().copied().collect(),
                constant: c.constant,
                auxiliary: c.auxiliary,
                assigned: state.conjuncts.is_assigned(c.id),
                join_clause: c.join_clause,
                outer_join_clause: state.conjuncts.oj_clause(c.id),
            })
            .collect();

        let joins = state
            .joins
            .clauses()
            .map(|clause| JoinEntry {
                rhs: clause.rhs,
                op: clause.op,
                left_tuple_ids: clause.left_tuple_ids.to_vec(),
            })
            .collect();

        Self {
            tuples,
            conjuncts,
            joins,
            outer_joined: state.joins.outer_joined().collect(),
            semi_joined: state.joins.semi_joined().collect(),
        }
    }

    /// Render as pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
