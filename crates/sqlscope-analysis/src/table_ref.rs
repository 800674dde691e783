//! Table references as they appear in a FROM clause

use sqlscope_ast::{Expr, JoinOperator, TableName};
use sqlscope_catalog::Table;
use std::sync::Arc;

/// How a table ref is joined to the refs before it
#[derive(Debug, Clone, PartialEq)]
pub struct JoinSpec {
    pub op: JoinOperator,
    pub on_clause: Option<Expr>,
}

/// The concrete table a ref resolved to
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTable {
    /// Fully-qualified name; unqualified for block-local views
    pub name: TableName,
    pub table: Arc<Table>,
}

/// One FROM-clause entry
#[derive(Debug, Clone, PartialEq)]
pub struct TableRef {
    pub name: TableName,
    pub alias: Option<String>,
    pub join: Option<JoinSpec>,
    resolved: Option<ResolvedTable>,
}

impl TableRef {
    pub fn new(name: impl Into<TableName>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            join: None,
            resolved: None,
        }
    }

    /// A ref that is already bound to `table`
    pub fn resolved(name: TableName, table: Arc<Table>) -> Self {
        Self {
            name: name.clone(),
            alias: None,
            join: None,
            resolved: Some(ResolvedTable { name, table }),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_join(mut self, op: JoinOperator, on_clause: Option<Expr>) -> Self {
        self.join = Some(JoinSpec { op, on_clause });
        self
    }

    /// Bind to a concrete table, keeping alias and join
    pub fn resolve_to(mut self, name: TableName, table: Arc<Table>) -> Self {
        self.resolved = Some(ResolvedTable { name, table });
        self
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    pub fn resolution(&self) -> Option<&ResolvedTable> {
        self.resolved.as_ref()
    }

    pub fn table(&self) -> Option<&Arc<Table>> {
        self.resolved.as_ref().map(|r| &r.table)
    }

    pub fn has_explicit_alias(&self) -> bool {
        self.alias.is_some()
    }

    /// Name after resolution, or as written
    fn effective_name(&self) -> &TableName {
        self.resolved.as_ref().map_or(&self.name, |r| &r.name)
    }

    /// The alias that must be unique within a block
    pub fn unique_alias(&self) -> String {
        match &self.alias {
            Some(alias) => alias.clone(),
            None => self.effective_name().to_string(),
        }
    }

    /// Every legal alias, unique alias first
    ///
    /// Without an explicit alias these are the fully-qualified and the
    /// unqualified table name.
    pub fn aliases(&self) -> Vec<String> {
        if let Some(alias) = &self.alias {
            return vec![alias.clone()];
        }
        let name = self.effective_name();
        if name.is_fully_qualified() {
            vec![name.to_string(), name.table.clone()]
        } else {
            vec![name.table.clone()]
        }
    }
}
