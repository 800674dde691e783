//! Tables and columns

use std::fmt;

/// Column value types known to the analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Boolean,
    Int,
    BigInt,
    Decimal,
    Double,
    Varchar,
    Date,
    DateTime,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Boolean => "BOOLEAN",
            Self::Int => "INT",
            Self::BigInt => "BIGINT",
            Self::Decimal => "DECIMAL",
            Self::Double => "DOUBLE",
            Self::Varchar => "VARCHAR",
            Self::Date => "DATE",
            Self::DateTime => "DATETIME",
        };
        f.write_str(name)
    }
}

/// Column metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
    pub nullable: bool,
}

impl Column {
    /// Create a nullable column
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: true,
        }
    }

    /// Mark the column NOT NULL
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}

/// What kind of object a table is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    /// Managed table with data
    Base,
    /// Stored view definition, or a block-local `WITH` view
    View,
}

/// Lifecycle state of a base table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableState {
    Normal,
    /// Restore from backup in progress
    Restoring,
    /// Restore in progress, data still being loaded
    RestoringWithLoad,
}

impl TableState {
    /// Whether data can be read safely in this state
    pub const fn is_queryable(&self) -> bool {
        matches!(self, Self::Normal)
    }
}

impl fmt::Display for TableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Normal => "NORMAL",
            Self::Restoring => "RESTORE",
            Self::RestoringWithLoad => "RESTORE_WITH_LOAD",
        };
        f.write_str(name)
    }
}

/// A table (or view) known to the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub id: u64,
    pub name: String,
    pub kind: TableKind,
    pub state: TableState,
    pub columns: Vec<Column>,
}

impl Table {
    /// Create a base table in the normal state
    pub fn new(id: u64, name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: TableKind::Base,
            state: TableState::Normal,
            columns,
        }
    }

    /// Create a view
    pub fn view(id: u64, name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            kind: TableKind::View,
            ..Self::new(id, name, columns)
        }
    }

    pub fn with_state(mut self, state: TableState) -> Self {
        self.state = state;
        self
    }

    /// Look up a column, ignoring case
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Whether the table can be read in its current state
    pub fn is_queryable(&self) -> bool {
        self.kind != TableKind::Base || self.state.is_queryable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_column_lookup_ignores_case() {
        let table = Table::new(
            1,
            "orders",
            vec![
                Column::new("Id", ColumnType::BigInt).not_null(),
                Column::new("amount", ColumnType::Decimal),
            ],
        );

        let id = table.column("ID").unwrap();
        assert_eq!(id.name, "Id");
        assert!(!id.nullable);
        assert!(table.column("missing").is_none());
    }

    #[rstest]
    #[case(TableState::Normal, true)]
    #[case(TableState::Restoring, false)]
    #[case(TableState::RestoringWithLoad, false)]
    fn test_queryable(#[case] state: TableState, #[case] expected: bool) {
        let table = Table::new(1, "t", Vec::new()).with_state(state);
        assert_eq!(table.is_queryable(), expected);
    }

    #[test]
    fn test_views_ignore_state() {
        let view = Table::view(2, "v", Vec::new()).with_state(TableState::Restoring);
        assert!(view.is_queryable());
    }
}
