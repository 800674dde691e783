//! Root of one query's analysis

use crate::{
    Analyzer, AnalyzerConfig, Conjunct, ConjunctRegistry, DescriptorTable, ExplainReport,
    GlobalState, JoinClause, JoinNullability, PlacementEngine, SlotDescriptor, TupleDescriptor,
};
use sqlscope_ast::{ConjunctId, Expr, ScopeId, SlotId, TupleId};
use sqlscope_catalog::{CatalogProvider, SessionContext};
use sqlscope_diagnostics::Result;
use std::cell::{Ref, RefCell, RefMut};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Owns the shared state of one query compilation
///
/// Single-threaded: a tree and its scope nodes stay on one thread. Concurrent
/// compilations each create their own tree.
pub struct AnalysisTree {
    state: RefCell<GlobalState>,
    catalog: Arc<dyn CatalogProvider>,
    session: Arc<dyn SessionContext>,
    config: AnalyzerConfig,
}

impl AnalysisTree {
    /// Create a tree for one compilation; fails on an unusable `config`
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        session: Arc<dyn SessionContext>,
        config: AnalyzerConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            state: RefCell::new(GlobalState::new()),
            catalog,
            session,
            config,
        })
    }

    /// Scope node of the outermost query block
    pub fn root(&self) -> Analyzer<'_> {
        Analyzer::new(self, None)
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn catalog(&self) -> &dyn CatalogProvider {
        self.catalog.as_ref()
    }

    pub fn session(&self) -> &dyn SessionContext {
        self.session.as_ref()
    }

    pub(crate) fn state_mut(&self) -> RefMut<'_, GlobalState> {
        self.state.borrow_mut()
    }

    pub(crate) fn state(&self) -> Ref<'_, GlobalState> {
        self.state.borrow()
    }

    // Snapshots are detached from the tree, so analysis may continue while
    // a caller holds one.

    /// Snapshot of the tuple and slot descriptors
    pub fn descriptors(&self) -> DescriptorTable {
        self.state().descriptors.clone()
    }

    /// Snapshot of the conjunct registry
    pub fn conjuncts(&self) -> ConjunctRegistry {
        self.state().conjuncts.clone()
    }

    /// Snapshot of the join nullability tracker
    pub fn joins(&self) -> JoinNullability {
        self.state().joins.clone()
    }

    pub fn tuple(&self, id: TupleId) -> Option<TupleDescriptor> {
        self.state().descriptors.tuple(id).cloned()
    }

    pub fn slot(&self, id: SlotId) -> Option<SlotDescriptor> {
        self.state().descriptors.slot(id).cloned()
    }

    pub fn conjunct(&self, id: ConjunctId) -> Option<Conjunct> {
        self.state().conjuncts.get(id).cloned()
    }

    pub fn tuple_count(&self) -> usize {
        self.state().descriptors.tuple_count()
    }

    pub fn is_outer_joined(&self, tuple: TupleId) -> bool {
        self.state().joins.is_outer_joined(tuple)
    }

    /// Block that registered `slot`
    pub fn block_of_slot(&self, slot: SlotId) -> Option<ScopeId> {
        self.state().block_by_slot.get(&slot).copied()
    }

    /// Last outer join clause that made `tuple` nullable
    pub fn last_oj_clause(&self, tuple: TupleId) -> Option<JoinClause> {
        self.state().joins.last_outer_join_clause(tuple).cloned()
    }

    /// See [`PlacementEngine::unassigned_conjuncts`]
    pub fn unassigned_conjuncts(
        &self,
        tuple_ids: &BTreeSet<TupleId>,
        include_oj_conjuncts: bool,
    ) -> Vec<Conjunct> {
        let state = self.state();
        PlacementEngine::new(&state.conjuncts, &state.joins)
            .unassigned_conjuncts(tuple_ids, include_oj_conjuncts)
            .into_iter()
            .cloned()
            .collect()
    }

    /// See [`PlacementEngine::evaluable_conjuncts`]
    pub fn evaluable_conjuncts(&self, tuple_ids: &BTreeSet<TupleId>) -> Vec<Conjunct> {
        let state = self.state();
        PlacementEngine::new(&state.conjuncts, &state.joins)
            .evaluable_conjuncts(tuple_ids)
            .into_iter()
            .cloned()
            .collect()
    }

    /// See [`PlacementEngine::can_eval_predicate`]; false for unknown ids
    pub fn can_eval_predicate(&self, tuple_ids: &BTreeSet<TupleId>, id: ConjunctId) -> bool {
        let state = self.state();
        let engine = PlacementEngine::new(&state.conjuncts, &state.joins);
        state
            .conjuncts
            .get(id)
            .is_some_and(|c| engine.can_eval_predicate(tuple_ids, c))
    }

    /// See [`PlacementEngine::can_eval_expr`]
    pub fn can_eval_expr(&self, tuple_ids: &BTreeSet<TupleId>, expr: &Expr) -> bool {
        let state = self.state();
        PlacementEngine::new(&state.conjuncts, &state.joins).can_eval_expr(tuple_ids, expr)
    }

    /// Mark conjuncts as placed; idempotent
    pub fn mark_conjuncts_assigned(&self, ids: impl IntoIterator<Item = ConjunctId>) {
        self.state_mut().conjuncts.mark_assigned(ids);
    }

    /// Snapshot of the registries for EXPLAIN output
    pub fn report(&self) -> ExplainReport {
        ExplainReport::from_state(&self.state())
    }
}

impl std::fmt::Debug for AnalysisTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisTree")
            .field("state", &self.state)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
