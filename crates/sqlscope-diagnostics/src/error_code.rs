//! Stable error codes reported to the compiler's caller
//!
//! Error code ranges:
//! - SQL0100-SQL0199: Name resolution errors (aliases, columns)
//! - SQL0200-SQL0299: Catalog errors (databases, tables, table state)
//! - SQL0300-SQL0399: Analysis limits
//! - SQL0400-SQL0499: System errors (configuration, I/O)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    /// Check if this is a name resolution error (0100-0199)
    pub const fn is_resolution_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    /// Check if this is a catalog error (0200-0299)
    pub const fn is_catalog_error(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Check if this is a limit error (0300-0399)
    pub const fn is_limit_error(&self) -> bool {
        self.0 >= 300 && self.0 < 400
    }

    /// Check if this is a system error (0400-0499)
    pub const fn is_system_error(&self) -> bool {
        self.0 >= 400 && self.0 < 500
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SQL{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Name resolution errors (0100-0199)
    map.insert(100, ErrorInfo::new("Not unique table/alias")
        .with_help("Give each table reference in a query block its own alias"));
    map.insert(101, ErrorInfo::new("Ambiguous table alias")
        .with_help("Qualify the table name or add an explicit alias"));
    map.insert(102, ErrorInfo::new("Unknown table alias"));
    map.insert(103, ErrorInfo::new("Unknown column"));
    map.insert(104, ErrorInfo::new("Ambiguous column reference")
        .with_help("Qualify the column with a table alias"));

    // Catalog errors (0200-0299)
    map.insert(200, ErrorInfo::new("No database selected")
        .with_help("Use a fully qualified table name or select a current database"));
    map.insert(201, ErrorInfo::new("Unknown database"));
    map.insert(202, ErrorInfo::new("Unknown table"));
    map.insert(203, ErrorInfo::new("Table is not queryable in its current state")
        .with_help("Retry once the restore of the table has completed"));

    // Limit errors (0300-0399)
    map.insert(300, ErrorInfo::new("Maximum analysis depth exceeded")
        .with_help("Reduce the nesting of subqueries or expressions"));

    // System errors (0400-0499)
    map.insert(401, ErrorInfo::new("Configuration error"));
    map.insert(402, ErrorInfo::new("I/O error"));

    map
});

// Name resolution errors
pub const SQL0100: ErrorCode = ErrorCode::new(100);
pub const SQL0101: ErrorCode = ErrorCode::new(101);
pub const SQL0102: ErrorCode = ErrorCode::new(102);
pub const SQL0103: ErrorCode = ErrorCode::new(103);
pub const SQL0104: ErrorCode = ErrorCode::new(104);

// Catalog errors
pub const SQL0200: ErrorCode = ErrorCode::new(200);
pub const SQL0201: ErrorCode = ErrorCode::new(201);
pub const SQL0202: ErrorCode = ErrorCode::new(202);
pub const SQL0203: ErrorCode = ErrorCode::new(203);

// Limit errors
pub const SQL0300: ErrorCode = ErrorCode::new(300);

// System errors
pub const SQL0401: ErrorCode = ErrorCode::new(401);
pub const SQL0402: ErrorCode = ErrorCode::new(402);
