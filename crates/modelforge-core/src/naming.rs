//! Identifier, type-name and package-coordinate rules.
//!
//! Every function here is total: invalid input yields `false` or `None`.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

/// Reserved words and literals of the generated object language.
const LANGUAGE_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "null", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "true", "try", "void", "volatile", "while", "var", "record", "yield",
];

/// SQL words that break generated DDL and queries when used as names.
///
/// `order` and `user` are left out: generated table names for such entities
/// are quoted, and both are common domain names.
const SQL_RESERVED_WORDS: &[&str] = &[
    "add", "all", "alter", "and", "any", "as", "asc", "between", "by", "case", "check", "column",
    "constraint", "create", "cross", "database", "delete", "desc", "distinct", "drop", "exists",
    "foreign", "from", "full", "group", "having", "in", "index", "inner", "insert", "into", "is",
    "join", "key", "left", "like", "limit", "not", "or", "outer", "primary", "references",
    "right", "rownum", "select", "set", "table", "top", "truncate", "union", "unique", "update",
    "values", "view", "where",
];

fn language_keywords() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| LANGUAGE_KEYWORDS.iter().copied().collect())
}

fn sql_reserved_words() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| SQL_RESERVED_WORDS.iter().copied().collect())
}

fn identifier_pattern() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").ok())
        .as_ref()
}

fn enum_constant_pattern() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z0-9_]+$").ok()).as_ref()
}

fn group_id_pattern() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z][a-z0-9_]*(\.[a-z][a-z0-9_]*)*$").ok())
        .as_ref()
}

fn artifact_id_pattern() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z][a-z0-9]*(-[a-z0-9]+)*$").ok())
        .as_ref()
}

fn matches(pattern: Option<&Regex>, value: &str) -> bool {
    pattern.is_some_and(|re| re.is_match(value))
}

/// Syntactically valid identifier that is not a language keyword.
pub fn is_valid_identifier(value: &str) -> bool {
    matches(identifier_pattern(), value) && !language_keywords().contains(value)
}

/// Valid identifier starting with an uppercase letter.
pub fn is_valid_type_name(value: &str) -> bool {
    is_valid_identifier(value) && value.chars().next().is_some_and(|ch| ch.is_ascii_uppercase())
}

pub fn is_valid_enum_constant(value: &str) -> bool {
    matches(enum_constant_pattern(), value)
}

/// Returns the lower-cased name when it collides with a language keyword or
/// a SQL reserved word.
///
/// Stricter than [`is_valid_identifier`]: `select` is a valid identifier but
/// unsafe in generated SQL.
pub fn find_reserved_keyword(value: &str) -> Option<String> {
    let lower = value.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }
    if language_keywords().contains(lower.as_str()) || sql_reserved_words().contains(lower.as_str())
    {
        Some(lower)
    } else {
        None
    }
}

/// Returns the lower-cased name when it is a SQL reserved word.
pub fn find_sql_reserved_word(value: &str) -> Option<String> {
    let lower = value.trim().to_lowercase();
    sql_reserved_words()
        .contains(lower.as_str())
        .then_some(lower)
}

/// Dot-separated lowercase package id, e.g. `com.example.shop`.
pub fn is_valid_group_id(value: &str) -> bool {
    matches(group_id_pattern(), value)
}

/// Hyphen-separated lowercase module id, e.g. `order-service`.
pub fn is_valid_artifact_id(value: &str) -> bool {
    matches(artifact_id_pattern(), value)
}

/// `user_accounts` -> `UserAccounts`.
pub fn to_type_name_case(value: &str) -> String {
    recapitalize(value, true)
}

/// `FIRST_NAME` -> `firstName`.
pub fn to_identifier_case(value: &str) -> String {
    recapitalize(value, false)
}

fn recapitalize(value: &str, capitalize_first: bool) -> String {
    let mut out = String::with_capacity(value.len());
    let mut upper_next = capitalize_first;

    for ch in value.trim().to_lowercase().chars() {
        if ch == '_' || ch == ' ' {
            upper_next = !out.is_empty() || capitalize_first;
            continue;
        }
        if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }

    out
}
