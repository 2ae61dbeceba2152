//! Fixed completion vocabularies
//!
//! Shared by every schema cache; never loaded from the server.

/// SQL keywords offered by completion, in suggestion order.
///
/// `END` appears twice (transaction block and `CASE` block). Both entries
/// are kept so suggestion output stays stable.
pub const KEYWORDS: &[&str] = &[
    "SELECT", "FROM", "WHERE", "INSERT", "INTO", "VALUES", "UPDATE", "SET",
    "DELETE", "CREATE", "TABLE", "ALTER", "DROP", "INDEX", "VIEW", "DATABASE",
    "GRANT", "REVOKE", "COMMIT", "ROLLBACK", "BEGIN", "END", "TRANSACTION",
    "ORDER", "BY", "GROUP", "HAVING", "JOIN", "INNER", "LEFT", "RIGHT", "OUTER",
    "ON", "AS", "DISTINCT", "COUNT", "SUM", "AVG", "MIN", "MAX", "LIMIT", "OFFSET",
    "AND", "OR", "NOT", "IN", "EXISTS", "BETWEEN", "LIKE", "IS", "NULL",
    "ASC", "DESC", "UNION", "ALL", "CASE", "WHEN", "THEN", "ELSE", "END",
];

/// Column data type names.
pub const DATA_TYPES: &[&str] = &[
    "INTEGER", "BIGINT", "SMALLINT", "DECIMAL", "NUMERIC", "REAL", "DOUBLE",
    "PRECISION", "MONEY", "CHAR", "VARCHAR", "TEXT", "BYTEA", "TIMESTAMP",
    "DATE", "TIME", "INTERVAL", "BOOLEAN", "UUID", "JSON", "JSONB", "ARRAY",
];
