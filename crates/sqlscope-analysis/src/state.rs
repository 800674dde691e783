//! State shared by every block of one analysis tree

use crate::{ConjunctRegistry, DescriptorTable, JoinNullability};
use sqlscope_ast::{IdGenerator, ScopeId, SlotId};
use std::collections::HashMap;

/// Descriptors, conjuncts and join nullability for one query
///
/// Owned by the [`AnalysisTree`](crate::AnalysisTree); scope nodes reach it
/// through the tree.
#[derive(Debug, Default)]
pub struct GlobalState {
    pub descriptors: DescriptorTable,
    pub conjuncts: ConjunctRegistry,
    pub joins: JoinNullability,
    /// Block that registered each slot
    pub block_by_slot: HashMap<SlotId, ScopeId>,
    scope_ids: IdGenerator<ScopeId>,
}

impl GlobalState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the identity of a new block
    pub fn next_scope_id(&mut self) -> ScopeId {
        self.scope_ids.next_id()
    }
}
