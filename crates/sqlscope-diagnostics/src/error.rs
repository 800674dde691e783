//! Analysis error types

use crate::{
    ErrorCode, SQL0100, SQL0101, SQL0102, SQL0103, SQL0104, SQL0200, SQL0201, SQL0202, SQL0203,
    SQL0300, SQL0401, SQL0402,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A user-facing diagnostic message
///
/// Every analysis failure aborts the current query, so diagnostics are
/// always errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional context or help
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            help: None,
        }
    }

    /// Set help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error: {} - {}", self.code, self.message)?;
        if let Some(help) = &self.help {
            write!(f, " ({})", help)?;
        }
        Ok(())
    }
}

/// Errors surfaced by table registration, name resolution and configuration.
///
/// Every variant carries the offending identifier and maps to a stable
/// [`ErrorCode`]. None of them is recovered from inside the analysis: the
/// analysis of the current query is abandoned and the error is reported to
/// the compiler's caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// An alias is registered twice in one query block
    #[error("{code}: Not unique table/alias: '{alias}'", code = SQL0100)]
    DuplicateAlias { alias: String },

    /// An implicit alias shared by several table references was used
    #[error("{code}: Table alias '{alias}' is ambiguous", code = SQL0101)]
    AmbiguousAlias { alias: String },

    /// A qualifier that names no table reference in scope
    #[error("{code}: Unknown table alias '{alias}'", code = SQL0102)]
    UnknownAlias { alias: String },

    /// A column the referenced table does not have
    #[error("{code}: Unknown column '{column}' in '{table}'", code = SQL0103)]
    UnknownColumn { table: String, column: String },

    /// An unqualified column found in more than one table reference
    #[error("{code}: Column '{column}' is ambiguous", code = SQL0104)]
    AmbiguousColumn {
        column: String,
        candidates: Vec<String>,
    },

    /// Unqualified table name without a current database
    #[error("{code}: No database selected", code = SQL0200)]
    NoDefaultDatabase,

    /// The catalog has no such database
    #[error("{code}: Unknown database '{database}'", code = SQL0201)]
    UnknownDatabase { database: String },

    /// The database has no such table
    #[error("{code}: Unknown table '{table}'", code = SQL0202)]
    UnknownTable { table: String },

    /// The table exists but cannot be read safely right now
    #[error("{code}: Table '{table}' is not queryable, state: {state}", code = SQL0203)]
    TableState { table: String, state: String },

    /// Nested analysis went deeper than the configured ceiling
    #[error("{code}: Exceeded the maximum analysis call depth of {limit}", code = SQL0300)]
    MaxRecursion { limit: usize },

    /// Invalid analyzer configuration
    #[error("{code}: Invalid configuration: {message}", code = SQL0401)]
    Config { message: String },

    /// Configuration could not be read
    #[error("{code}: Cannot read '{path}': {message}", code = SQL0402)]
    Io { path: String, message: String },
}

impl AnalysisError {
    /// Create a duplicate alias error
    pub fn duplicate_alias(alias: impl Into<String>) -> Self {
        Self::DuplicateAlias {
            alias: alias.into(),
        }
    }

    /// Create an ambiguous alias error
    pub fn ambiguous_alias(alias: impl Into<String>) -> Self {
        Self::AmbiguousAlias {
            alias: alias.into(),
        }
    }

    /// Create an unknown alias error
    pub fn unknown_alias(alias: impl Into<String>) -> Self {
        Self::UnknownAlias {
            alias: alias.into(),
        }
    }

    /// Create an unknown column error
    pub fn unknown_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Create an unknown database error
    pub fn unknown_database(database: impl Into<String>) -> Self {
        Self::UnknownDatabase {
            database: database.into(),
        }
    }

    /// Create an unknown table error
    pub fn unknown_table(table: impl Into<String>) -> Self {
        Self::UnknownTable {
            table: table.into(),
        }
    }

    /// Create a table state error
    pub fn table_state(table: impl Into<String>, state: impl Into<String>) -> Self {
        Self::TableState {
            table: table.into(),
            state: state.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::DuplicateAlias { .. } => SQL0100,
            Self::AmbiguousAlias { .. } => SQL0101,
            Self::UnknownAlias { .. } => SQL0102,
            Self::UnknownColumn { .. } => SQL0103,
            Self::AmbiguousColumn { .. } => SQL0104,
            Self::NoDefaultDatabase => SQL0200,
            Self::UnknownDatabase { .. } => SQL0201,
            Self::UnknownTable { .. } => SQL0202,
            Self::TableState { .. } => SQL0203,
            Self::MaxRecursion { .. } => SQL0300,
            Self::Config { .. } => SQL0401,
            Self::Io { .. } => SQL0402,
        }
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        let code = self.code();
        let message = self.to_string();
        let message = message
            .strip_prefix(&format!("{code}: "))
            .map(str::to_string)
            .unwrap_or(message);
        let diag = Diagnostic::error(code, message);

        match self {
            Self::AmbiguousColumn { candidates, .. } if !candidates.is_empty() => {
                diag.with_help(format!("candidates: {}", candidates.join(", ")))
            }
            _ => match code.info().help {
                Some(help) => diag.with_help(help),
                None => diag,
            },
        }
    }
}
