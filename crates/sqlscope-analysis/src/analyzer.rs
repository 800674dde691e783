//! Scope node for one query block
//!
//! An [`Analyzer`] owns what is private to its block: the table alias
//! registry, local views, the table refs registered here and the slots bound
//! by column references written here. Everything else lives in the
//! [`AnalysisTree`] and is shared with the parent and child blocks.

use crate::{
    AliasBinding, AliasRegistry, AnalysisTree, CallDepth, Conjunct, JoinClause, SlotDescriptor,
    TableRef, TableResolver, TupleDescriptor,
};
use indexmap::IndexMap;
use smallvec::SmallVec;
use sqlscope_ast::{
    BinaryExpr, ColumnRef, CompoundExpr, ConjunctId, Expr, FunctionCall, InListExpr, IsNullExpr,
    ScopeId, SlotId, TableName, TupleId,
};
use sqlscope_catalog::{Column, ColumnType, Table};
use sqlscope_diagnostics::{AnalysisError, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Analysis scope of one query block
pub struct Analyzer<'t> {
    tree: &'t AnalysisTree,
    parent: Option<&'t Analyzer<'t>>,
    scope_id: ScopeId,
    aliases: AliasRegistry,
    local_views: IndexMap<String, Arc<Table>>,
    table_refs: IndexMap<TupleId, TableRef>,
    /// `tuple.column` (lowercase) to slot
    slot_refs: BTreeMap<String, SlotId>,
    /// Virtual column name (lowercase) to slot
    virtual_slots: BTreeMap<String, SlotId>,
    conjuncts: Vec<ConjunctId>,
}

impl<'t> Analyzer<'t> {
    pub(crate) fn new(tree: &'t AnalysisTree, parent: Option<&'t Analyzer<'t>>) -> Self {
        let scope_id = tree.state_mut().next_scope_id();
        Self {
            tree,
            parent,
            scope_id,
            aliases: AliasRegistry::new(),
            local_views: IndexMap::new(),
            table_refs: IndexMap::new(),
            slot_refs: BTreeMap::new(),
            virtual_slots: BTreeMap::new(),
            conjuncts: Vec::new(),
        }
    }

    /// Scope node for a block nested in this one
    pub fn child(&self) -> Analyzer<'_> {
        Analyzer::new(self.tree, Some(self))
    }

    pub fn tree(&self) -> &'t AnalysisTree {
        self.tree
    }

    pub fn parent(&self) -> Option<&'t Analyzer<'t>> {
        self.parent
    }

    /// Enclosing blocks, immediate parent first
    pub fn ancestors(&self) -> impl Iterator<Item = &'t Analyzer<'t>> {
        std::iter::successors(self.parent, |a| a.parent)
    }

    pub fn scope_id(&self) -> ScopeId {
        self.scope_id
    }

    /// Enter one nested analysis call
    pub fn enter(&self, depth: CallDepth) -> Result<CallDepth> {
        depth.enter(self.tree.config().max_call_depth).inspect_err(|_| {
            log::debug!("Block {} exceeded the analysis depth limit", self.scope_id);
        })
    }

    // === Table references ===

    /// Register a `WITH` view visible to table refs of this block
    pub fn register_local_view(
        &mut self,
        name: impl Into<String>,
        columns: Vec<Column>,
    ) -> Result<()> {
        let name = name.into();
        if self.local_views.contains_key(&name) {
            return Err(AnalysisError::duplicate_alias(name));
        }
        log::debug!("Block {} registered local view {}", self.scope_id, name);
        let view = Table::view(0, name.clone(), columns);
        self.local_views.insert(name, Arc::new(view));
        Ok(())
    }

    /// Resolve a table ref; see [`TableResolver::resolve`]
    pub fn resolve_table_ref(&self, table_ref: TableRef) -> Result<TableRef> {
        self.resolver().resolve(table_ref)
    }

    fn resolver(&self) -> TableResolver<'_> {
        TableResolver::new(self.tree.catalog(), self.tree.session(), &self.local_views)
    }

    /// Fully-qualified form of `name` using the session database
    pub fn fq_table_name(&self, name: &TableName) -> TableName {
        self.resolver().fq_table_name(name)
    }

    /// Create the tuple for a table ref and bind its aliases
    ///
    /// Fails with a duplicate alias error, leaving the block unchanged, if
    /// the unique alias is taken or the unqualified implicit alias belongs to
    /// an explicitly aliased ref.
    pub fn register_table_ref(&mut self, table_ref: TableRef) -> Result<TupleDescriptor> {
        let unique = table_ref.unique_alias();
        let aliases = table_ref.aliases();
        let explicit = table_ref.has_explicit_alias();
        let unqualified = if explicit { None } else { aliases.get(1).map(String::as_str) };
        self.aliases.check(&unique, unqualified)?;

        let desc = self
            .tree
            .state_mut()
            .descriptors
            .create_tuple(table_ref.table().cloned(), aliases.clone(), explicit)
            .clone();
        self.aliases.bind(&unique, &aliases, desc.id(), explicit);
        log::debug!("Block {} registered {} as {}", self.scope_id, unique, desc.id());
        self.table_refs.insert(desc.id(), table_ref);
        Ok(desc)
    }

    /// Resolve and register a table ref, then analyze its join clause
    pub fn analyze_table_ref(&mut self, table_ref: TableRef, depth: CallDepth) -> Result<TupleId> {
        let depth = self.enter(depth)?;
        let table_ref = self.resolve_table_ref(table_ref)?;
        let join = table_ref.join.clone();
        let tuple = self.register_table_ref(table_ref)?.id();
        if let Some(join) = join {
            let clause = JoinClause::new(tuple, join.op, self.tuple_ids_before(tuple));
            self.analyze_join(clause, join.on_clause, depth)?;
        }
        Ok(tuple)
    }

    fn tuple_ids_before(&self, tuple: TupleId) -> SmallVec<[TupleId; 4]> {
        self.table_refs.keys().copied().filter(|id| *id < tuple).collect()
    }

    /// Register a join clause and its On-clause conjuncts
    ///
    /// On-clause conjuncts are owned by every tuple of the clause and tied to
    /// it; outer join clauses additionally keep them out of placement
    /// requests that exclude outer-join conjuncts.
    pub fn analyze_join(
        &mut self,
        clause: JoinClause,
        on_clause: Option<Expr>,
        depth: CallDepth,
    ) -> Result<Vec<ConjunctId>> {
        self.tree.state_mut().joins.register_join(clause.clone());

        let Some(on_clause) = on_clause else {
            return Ok(Vec::new());
        };
        let bound = self.bind_expr(on_clause, depth)?;
        let owners = clause.all_tuple_ids();
        Ok(bound
            .split_conjuncts()
            .into_iter()
            .map(|conjunct| self.register_conjunct(conjunct, &owners, false, Some(&clause)))
            .collect())
    }

    /// Resolve a table alias in this block or, failing that, its ancestors
    pub fn lookup_alias(&self, alias: &str) -> Result<TupleId> {
        match self.aliases.binding(alias) {
            AliasBinding::Bound(tuple) => Ok(tuple),
            AliasBinding::Ambiguous => Err(AnalysisError::ambiguous_alias(alias)),
            AliasBinding::Unregistered => match self.parent {
                Some(parent) => parent.lookup_alias(alias),
                None => Err(AnalysisError::unknown_alias(alias)),
            },
        }
    }

    // === Column references ===

    /// Resolve `[alias.]column` to a slot, creating it on first reference
    pub fn register_column_ref(&mut self, column: &ColumnRef) -> Result<SlotDescriptor> {
        let tuple = match &column.qualifier {
            Some(alias) => self.lookup_alias(alias)?,
            None => self
                .find_column_owner(&column.name)?
                .ok_or_else(|| AnalysisError::unknown_column("field list", &column.name))?,
        };

        let table = self
            .tree
            .tuple(tuple)
            .and_then(|desc| desc.table().cloned())
            .ok_or_else(|| AnalysisError::unknown_column(column.to_string(), &column.name))?;
        let col = table
            .column(&column.name)
            .cloned()
            .ok_or_else(|| AnalysisError::unknown_column(&table.name, &column.name))?;

        let key = format!("{}.{}", tuple, col.name.to_lowercase());
        if let Some(slot) = self.slot_refs.get(&key).and_then(|id| self.tree.slot(*id)) {
            return Ok(slot);
        }

        let nullable = col.nullable || self.tree.is_outer_joined(tuple);
        let slot = self.create_slot(tuple, col, nullable);
        self.slot_refs.insert(key, slot.id());
        Ok(slot)
    }

    /// The tuple of this block, or else of the nearest ancestor, whose table
    /// has a column `name`
    fn find_column_owner(&self, name: &str) -> Result<Option<TupleId>> {
        let state = self.tree.state();
        let descriptors = &state.descriptors;
        let candidates: Vec<&TupleDescriptor> = self
            .table_refs
            .keys()
            .filter_map(|id| descriptors.tuple(*id))
            .filter(|desc| desc.table().is_some_and(|t| t.column(name).is_some()))
            .collect();

        match candidates.as_slice() {
            [] => match self.parent {
                Some(parent) => parent.find_column_owner(name),
                None => Ok(None),
            },
            [only] => Ok(Some(only.id())),
            many => Err(AnalysisError::AmbiguousColumn {
                column: name.to_string(),
                candidates: many
                    .iter()
                    .filter_map(|d| d.aliases().first().cloned())
                    .collect(),
            }),
        }
    }

    /// Register a computed column on `tuple`
    ///
    /// Created once per name, ignoring case; later requests return the same
    /// slot flagged as multiply referenced. Virtual slots are always nullable.
    pub fn register_virtual_column_ref(
        &mut self,
        name: &str,
        ty: ColumnType,
        tuple: TupleId,
    ) -> SlotDescriptor {
        let key = name.to_lowercase();
        if let Some(&slot_id) = self.virtual_slots.get(&key) {
            let mut state = self.tree.state_mut();
            if let Some(slot) = state.descriptors.slot_mut(slot_id) {
                slot.set_multi_ref(true);
                return slot.clone();
            }
        }

        let slot = self.create_slot(tuple, Column::new(name, ty), true);
        self.virtual_slots.insert(key, slot.id());
        slot
    }

    /// Create a slot on `tuple` owned by this block
    ///
    /// # Panics
    ///
    /// Panics if `tuple` was never issued.
    pub fn add_slot_descriptor(&self, tuple: TupleId) -> SlotId {
        let mut state = self.tree.state_mut();
        let state = &mut *state;
        let slot_id = state.descriptors.add_slot(tuple).id();
        state.block_by_slot.insert(slot_id, self.scope_id);
        log::debug!("Block {} added slot {} to {}", self.scope_id, slot_id, tuple);
        slot_id
    }

    fn create_slot(&self, tuple: TupleId, column: Column, nullable: bool) -> SlotDescriptor {
        let mut state = self.tree.state_mut();
        let state = &mut *state;
        let slot = state.descriptors.add_slot(tuple);
        log::debug!(
            "Block {} added slot {} ({}) to {}",
            self.scope_id,
            slot.id(),
            column.name,
            tuple
        );
        slot.set_column(column);
        slot.set_nullable(nullable);
        state.block_by_slot.insert(slot.id(), self.scope_id);
        slot.clone()
    }

    // === Expressions and conjuncts ===

    /// Replace every column reference in `expr` by its slot
    pub fn bind_expr(&mut self, expr: Expr, depth: CallDepth) -> Result<Expr> {
        let depth = self.enter(depth)?;
        Ok(match expr {
            Expr::Literal(_) | Expr::Slot(_) => expr,
            Expr::Column(column) => {
                let slot = self.register_column_ref(&column)?;
                Expr::slot(slot.id(), slot.parent(), column.to_string())
            }
            Expr::Binary(b) => Expr::Binary(BinaryExpr {
                op: b.op,
                left: Box::new(self.bind_expr(*b.left, depth)?),
                right: Box::new(self.bind_expr(*b.right, depth)?),
            }),
            Expr::Compound(c) => Expr::Compound(CompoundExpr {
                op: c.op,
                children: self.bind_all(c.children, depth)?,
            }),
            Expr::IsNull(n) => Expr::IsNull(IsNullExpr {
                operand: Box::new(self.bind_expr(*n.operand, depth)?),
                negated: n.negated,
            }),
            Expr::InList(i) => Expr::InList(InListExpr {
                operand: Box::new(self.bind_expr(*i.operand, depth)?),
                list: self.bind_all(i.list, depth)?,
                negated: i.negated,
            }),
            Expr::Function(f) => Expr::Function(FunctionCall {
                name: f.name,
                args: self.bind_all(f.args, depth)?,
            }),
        })
    }

    fn bind_all(&mut self, exprs: Vec<Expr>, depth: CallDepth) -> Result<Vec<Expr>> {
        exprs
            .into_iter()
            .map(|e| self.bind_expr(e, depth))
            .collect()
    }

    /// Register a bound predicate with the shared conjunct registry
    pub fn register_conjunct(
        &mut self,
        expr: Expr,
        owners: &[TupleId],
        auxiliary: bool,
        origin: Option<&JoinClause>,
    ) -> ConjunctId {
        let id = self
            .tree
            .state_mut()
            .conjuncts
            .register(expr, owners, auxiliary, origin);
        self.conjuncts.push(id);
        id
    }

    /// Bind a WHERE clause and register each of its conjuncts
    ///
    /// Constant conjuncts are owned by every tuple of this block.
    pub fn register_where_clause(
        &mut self,
        expr: Expr,
        depth: CallDepth,
    ) -> Result<Vec<ConjunctId>> {
        let bound = self.bind_expr(expr, depth)?;
        let owners = self.tuple_ids();
        Ok(bound
            .split_conjuncts()
            .into_iter()
            .map(|conjunct| self.register_conjunct(conjunct, &owners, false, None))
            .collect())
    }

    // === Placement ===

    pub fn unassigned_conjuncts(
        &self,
        tuple_ids: &BTreeSet<TupleId>,
        include_oj_conjuncts: bool,
    ) -> Vec<Conjunct> {
        self.tree.unassigned_conjuncts(tuple_ids, include_oj_conjuncts)
    }

    pub fn evaluable_conjuncts(&self, tuple_ids: &BTreeSet<TupleId>) -> Vec<Conjunct> {
        self.tree.evaluable_conjuncts(tuple_ids)
    }

    pub fn can_eval_predicate(&self, tuple_ids: &BTreeSet<TupleId>, id: ConjunctId) -> bool {
        self.tree.can_eval_predicate(tuple_ids, id)
    }

    pub fn mark_conjuncts_assigned(&self, ids: impl IntoIterator<Item = ConjunctId>) {
        self.tree.mark_conjuncts_assigned(ids);
    }

    pub fn last_oj_clause(&self, tuple: TupleId) -> Option<JoinClause> {
        self.tree.last_oj_clause(tuple)
    }

    // === Block and session accessors ===

    /// Tuples registered in this block, in registration order
    pub fn tuple_ids(&self) -> Vec<TupleId> {
        self.table_refs.keys().copied().collect()
    }

    pub fn table_ref(&self, tuple: TupleId) -> Option<&TableRef> {
        self.table_refs.get(&tuple)
    }

    /// Unique aliases of this block
    pub fn aliases(&self) -> Vec<String> {
        self.aliases.unique_aliases().map(str::to_string).collect()
    }

    /// Conjuncts registered from this block
    pub fn local_conjuncts(&self) -> &[ConjunctId] {
        &self.conjuncts
    }

    pub fn default_database(&self) -> Option<String> {
        self.tree.session().current_database()
    }

    pub fn default_catalog(&self) -> String {
        self.tree.session().current_catalog()
    }

    pub fn qualified_user(&self) -> String {
        self.tree.session().current_user()
    }

    pub fn timezone(&self) -> &str {
        &self.tree.config().timezone
    }

    pub fn is_explain(&self) -> bool {
        self.tree.config().explain
    }
}

impl std::fmt::Debug for Analyzer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("scope_id", &self.scope_id)
            .field("parent", &self.parent.map(|p| p.scope_id))
            .field("aliases", &self.aliases)
            .field("tuples", &self.tuple_ids())
            .finish_non_exhaustive()
    }
}
