//! Name derivations and literal quoting shared by the converter, the JDL
//! writer and the projector.

use convert_case::{Case, Casing};

/// Lowercase the first character, leaving the rest untouched (`JobHistory` → `jobHistory`).
pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Uppercase the first character, leaving the rest untouched (`jobHistory` → `JobHistory`).
pub fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Default table name of an entity: its name in snake case.
pub fn table_name(entity_name: &str) -> String {
    entity_name.to_case(Case::Snake)
}

/// Whether `name` can be written in JDL without quotes.
///
/// Mirrors the lexer's identifier rule: a letter or underscore followed by
/// letters, digits, `_` or `-`, optionally continued by dotted segments.
pub fn is_bare_word(name: &str) -> bool {
    let mut segments = name.split('.');
    let Some(head) = segments.next() else {
        return false;
    };
    let head_ok = head
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && head.chars().all(is_word_char);
    head_ok && segments.all(|segment| !segment.is_empty() && segment.chars().all(is_word_char))
}

/// Render `value` as a JDL string literal, escaping quotes, backslashes and newlines.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lower_first() {
        assert_eq!(lower_first("JobHistory"), "jobHistory");
        assert_eq!(lower_first("ABC"), "aBC");
        assert_eq!(lower_first(""), "");
    }

    #[test]
    fn test_upper_first() {
        assert_eq!(upper_first("size"), "Size");
        assert_eq!(upper_first(""), "");
    }

    #[test]
    fn test_table_name() {
        assert_eq!(table_name("JobHistory"), "job_history");
        assert_eq!(table_name("Employee"), "employee");
    }

    #[test]
    fn test_is_bare_word() {
        assert!(is_bare_word("com.mycompany.myapp"));
        assert!(is_bare_word("spring-websocket"));
        assert!(is_bare_word("h2Disk"));
        assert!(!is_bare_word("8080"));
        assert!(!is_bare_word("two words"));
        assert!(!is_bare_word("trailing."));
        assert!(!is_bare_word(""));
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote("plain"), "\"plain\"");
        assert_eq!(quote("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(quote("a\\b"), "\"a\\\\b\"");
    }
}
