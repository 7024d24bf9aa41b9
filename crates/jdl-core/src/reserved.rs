//! Reserved words that entities, fields and tables must avoid.
//!
//! All lookups are case-insensitive: names are compared in upper case.

const JAVA_KEYWORDS: &[&str] = &[
    "ABSTRACT", "ASSERT", "BOOLEAN", "BREAK", "BYTE", "CASE", "CATCH", "CHAR", "CLASS", "CONST",
    "CONTINUE", "DEFAULT", "DO", "DOUBLE", "ELSE", "ENUM", "EXTENDS", "FINAL", "FINALLY", "FLOAT",
    "FOR", "GOTO", "IF", "IMPLEMENTS", "IMPORT", "INSTANCEOF", "INT", "INTERFACE", "LONG",
    "NATIVE", "NEW", "PACKAGE", "PRIVATE", "PROTECTED", "PUBLIC", "RETURN", "SHORT", "STATIC",
    "STRICTFP", "SUPER", "SWITCH", "SYNCHRONIZED", "THIS", "THROW", "THROWS", "TRANSIENT", "TRY",
    "VOID", "VOLATILE", "WHILE", "TRUE", "FALSE", "NULL",
];

const GENERATED_CLASS_NAMES: &[&str] = &[
    "ACCOUNT", "APPLICATION", "AUDIT", "CACHE", "CONFIGURATION", "CONSTANTS", "INSTANT",
    "INTEGER", "LIST", "LOCALDATE", "MAP", "OBJECT", "OPTIONAL", "SET", "STRING", "SYSTEM",
    "UUID",
];

const SCRIPT_KEYWORDS: &[&str] = &[
    "ARGUMENTS", "AWAIT", "DEBUGGER", "DELETE", "EVAL", "EXPORT", "FUNCTION", "IN", "LET", "OF",
    "TYPEOF", "VAR", "WITH", "YIELD",
];

const SQL_KEYWORDS: &[&str] = &[
    "ALL", "ALTER", "AND", "AS", "ASC", "BETWEEN", "BY", "CHECK", "COLUMN", "CREATE", "DATE",
    "DESC", "DISTINCT", "DROP", "END", "FROM", "GRANT", "GROUP", "HAVING", "IN", "INDEX",
    "INSERT", "INTERVAL", "IS", "JOIN", "KEY", "LIKE", "LIMIT", "NOT", "OFFSET", "ON", "OR",
    "ORDER", "POSITION", "PRIMARY", "RANGE", "RANK", "REFERENCES", "REVOKE", "ROW", "ROWS",
    "SELECT", "SESSION", "TABLE", "THEN", "TIME", "TIMESTAMP", "UNION", "UPDATE", "USER",
    "VALUES", "VIEW", "WHEN", "WHERE", "WINDOW", "ZONE",
];

const PAGINATION_WORDS: &[&str] = &["SIZE", "PAGE", "SORT"];

fn contains(table: &[&str], name: &str) -> bool {
    let upper = name.to_uppercase();
    table.contains(&upper.as_str())
}

/// Names that cannot be used as entity or enum class names.
pub fn is_reserved_class_name(name: &str) -> bool {
    contains(JAVA_KEYWORDS, name) || contains(GENERATED_CLASS_NAMES, name)
}

/// Field names that generated code renames with the application prefix.
pub fn is_reserved_field_name(name: &str) -> bool {
    contains(JAVA_KEYWORDS, name) || contains(SCRIPT_KEYWORDS, name)
}

pub fn is_reserved_table_name(name: &str) -> bool {
    contains(SQL_KEYWORDS, name)
}

/// Query parameters used for pagination in generated REST endpoints.
pub fn is_reserved_pagination_word(name: &str) -> bool {
    contains(PAGINATION_WORDS, name)
}
