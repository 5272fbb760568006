//! Parser for `CREATE TABLE` scripts.
//!
//! Only `CREATE TABLE` statements are accepted. Any other statement rejects
//! the whole input, while a table whose body cannot be read is dropped on its
//! own.
//!
//! Comments are stripped before statements are split and string literals are
//! not tracked, so a `--` or `;` inside a quoted default value truncates the
//! statement.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use modelforge_core::model::DEFAULT_ID_FIELD;
use modelforge_core::{Entity, Field, to_identifier_case, to_type_name_case};

use crate::error::{ImportError, Result};

struct Patterns {
    block_comment: Regex,
    line_comment: Regex,
    statement_prefix: Regex,
    create_table: Regex,
    table_clause: Regex,
    key_columns: Regex,
    column: Regex,
    inline_primary_key: Regex,
    not_null: Regex,
    unique: Regex,
}

impl Patterns {
    fn compile() -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            block_comment: Regex::new(r"(?s)/\*.*?\*/")?,
            line_comment: Regex::new(r"--[^\r\n]*")?,
            statement_prefix: Regex::new(r"(?i)^create\s+table\b")?,
            create_table: Regex::new(
                r"(?is)^create\s+table\s+(?:if\s+not\s+exists\s+)?([^\s(]+)\s*\((.*)\)[^)]*$",
            )?,
            table_clause: Regex::new(
                r"(?i)^(?:constraint\b|primary\s+key\b|unique\b|foreign\s+key\b|check\s*\(|(?:key|index)(?:\s+\w+)?\s*\(\s*[A-Za-z_`\x22])",
            )?,
            key_columns: Regex::new(r"(?i)\bprimary\s+key\s*\(([^)]*)\)")?,
            column: Regex::new(r"^[`\x22\[]?(\w+)[`\x22\]]?\s+(\w+)(?:\s*\(\s*(\d+)\s*\))?")?,
            inline_primary_key: Regex::new(r"(?i)\bprimary\s+key\b")?,
            not_null: Regex::new(r"(?i)\bnot\s+null\b")?,
            unique: Regex::new(r"(?i)\bunique\b")?,
        })
    }
}

fn patterns() -> Result<&'static Patterns> {
    static PATTERNS: OnceLock<std::result::Result<Patterns, regex::Error>> = OnceLock::new();
    PATTERNS
        .get_or_init(Patterns::compile)
        .as_ref()
        .map_err(|err| ImportError::Pattern(err.to_string()))
}

/// Parse a `CREATE TABLE` script into canonical entities.
pub fn parse_ddl(input: &str) -> Result<Vec<Entity>> {
    let patterns = patterns()?;
    let statements = split_statements(patterns, input);

    if let Some(rejected) = statements
        .iter()
        .find(|statement| !patterns.statement_prefix.is_match(statement))
    {
        let snippet = statement_snippet(rejected);
        tracing::warn!(event = "ddl_rejected", statement = %snippet);
        return Err(ImportError::UnsupportedStatement(snippet));
    }

    let entities: Vec<Entity> = statements
        .iter()
        .filter_map(|statement| parse_create_table(patterns, statement))
        .collect();

    tracing::debug!(
        event = "ddl_parsed",
        statements = statements.len(),
        entities = entities.len()
    );

    Ok(entities)
}

fn split_statements(patterns: &Patterns, input: &str) -> Vec<String> {
    let without_blocks = patterns.block_comment.replace_all(input, " ");
    let without_comments = patterns.line_comment.replace_all(&without_blocks, "");

    without_comments
        .split(';')
        .map(str::trim)
        .filter(|statement| !statement.is_empty())
        .map(str::to_string)
        .collect()
}

fn statement_snippet(statement: &str) -> String {
    let first_line = statement.lines().next().unwrap_or(statement).trim();
    if first_line.chars().count() > 60 {
        let truncated: String = first_line.chars().take(60).collect();
        format!("{truncated}...")
    } else {
        first_line.to_string()
    }
}

fn parse_create_table(patterns: &Patterns, statement: &str) -> Option<Entity> {
    let Some(captures) = patterns.create_table.captures(statement) else {
        tracing::debug!(event = "table_dropped", reason = "unmatched_syntax");
        return None;
    };

    let raw_name = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    let body = captures.get(2).map(|m| m.as_str()).unwrap_or_default();
    let table_name = to_type_name_case(&unquote(last_segment(raw_name)));

    let definitions = split_top_level(body);
    let key_columns = collect_key_columns(patterns, &definitions);

    let mut fields: Vec<Field> = Vec::new();
    let mut seen = HashSet::new();
    for definition in &definitions {
        if patterns.table_clause.is_match(definition) {
            continue;
        }
        let Some(field) = parse_column(patterns, definition, &key_columns) else {
            continue;
        };
        if !seen.insert(field.name.to_lowercase()) {
            tracing::warn!(
                event = "column_duplicate",
                table = %table_name,
                column = %field.name
            );
            continue;
        }
        fields.push(field);
    }

    if fields.is_empty() {
        tracing::debug!(event = "table_dropped", table = %table_name, reason = "no_columns");
        return None;
    }

    enforce_single_primary_key(&table_name, &mut fields);
    ensure_primary_key(&mut fields);

    Some(Entity::new(table_name, fields))
}

/// Split a column block on commas that are not nested inside parentheses.
fn split_top_level(body: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();

    for ch in body.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if depth == 0 => {
                parts.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    parts.push(current);

    parts
        .into_iter()
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}

fn collect_key_columns(patterns: &Patterns, definitions: &[String]) -> HashSet<String> {
    definitions
        .iter()
        .filter(|definition| patterns.table_clause.is_match(definition))
        .filter_map(|definition| patterns.key_columns.captures(definition))
        .filter_map(|captures| captures.get(1))
        .flat_map(|list| {
            list.as_str()
                .split(',')
                .map(|column| unquote(column.trim()).to_lowercase())
                .filter(|column| !column.is_empty())
                .collect::<Vec<_>>()
        })
        .collect()
}

fn parse_column(
    patterns: &Patterns,
    definition: &str,
    key_columns: &HashSet<String>,
) -> Option<Field> {
    let captures = patterns.column.captures(definition)?;
    let raw_name = captures.get(1)?.as_str();
    let raw_type = captures.get(2)?.as_str();
    let field_type = map_sql_type(raw_type);

    let mut field = Field::new(to_identifier_case(raw_name), field_type);
    if field_type == "String" {
        field.max_length = captures
            .get(3)
            .and_then(|length| length.as_str().parse::<u32>().ok());
    }
    field.primary_key = key_columns.contains(&raw_name.to_lowercase())
        || patterns.inline_primary_key.is_match(definition);
    field.required = patterns.not_null.is_match(definition);
    field.unique = patterns.unique.is_match(definition);

    Some(field)
}

/// Map a raw SQL type to a canonical type name by substring lookup.
pub fn map_sql_type(raw: &str) -> &'static str {
    let lower = raw.to_lowercase();
    if lower.contains("bigint") {
        "Long"
    } else if lower.contains("int") {
        "Integer"
    } else if lower.contains("decimal") || lower.contains("numeric") {
        "BigDecimal"
    } else if lower.contains("date") {
        "LocalDate"
    } else if lower.contains("time") {
        "Instant"
    } else if lower.contains("bool") {
        "Boolean"
    } else {
        "String"
    }
}

fn enforce_single_primary_key(table: &str, fields: &mut [Field]) {
    let mut found = false;
    for field in fields.iter_mut().filter(|field| field.primary_key) {
        if found {
            tracing::warn!(
                event = "composite_key_truncated",
                table = %table,
                column = %field.name
            );
            field.primary_key = false;
        }
        found = true;
    }
}

fn ensure_primary_key(fields: &mut Vec<Field>) {
    if fields.iter().any(|field| field.primary_key) {
        return;
    }

    match fields.iter_mut().find(|field| field.name == DEFAULT_ID_FIELD) {
        Some(id) => {
            id.primary_key = true;
            id.required = true;
        }
        None => fields.insert(0, Field::synthetic_id()),
    }
}

fn last_segment(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

fn unquote(name: &str) -> String {
    name.trim_matches(|ch| matches!(ch, '`' | '"' | '[' | ']'))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_only_top_level_commas() {
        let parts = split_top_level("id BIGINT, price DECIMAL(10, 2) NOT NULL, tag VARCHAR(5)");
        assert_eq!(
            parts,
            vec![
                "id BIGINT".to_string(),
                "price DECIMAL(10, 2) NOT NULL".to_string(),
                "tag VARCHAR(5)".to_string(),
            ]
        );
    }

    #[test]
    fn maps_types_by_substring_in_order() {
        assert_eq!(map_sql_type("BIGINT"), "Long");
        assert_eq!(map_sql_type("smallint"), "Integer");
        assert_eq!(map_sql_type("NUMERIC"), "BigDecimal");
        assert_eq!(map_sql_type("datetime"), "LocalDate");
        assert_eq!(map_sql_type("TIMESTAMP"), "Instant");
        assert_eq!(map_sql_type("boolean"), "Boolean");
        assert_eq!(map_sql_type("TEXT"), "String");
    }

    #[test]
    fn strips_quotes_and_schema_prefix() {
        assert_eq!(unquote(last_segment("public.\"user_accounts\"")), "user_accounts");
        assert_eq!(unquote("`orders`"), "orders");
    }

    #[test]
    fn index_clauses_are_not_columns() {
        let patterns = patterns().unwrap();
        assert!(patterns.table_clause.is_match("KEY idx_email (email)"));
        assert!(patterns.table_clause.is_match("FOREIGN KEY (user_id) REFERENCES users(id)"));
        assert!(patterns.table_clause.is_match("CHECK (price > 0)"));
        assert!(!patterns.table_clause.is_match("key VARCHAR(10)"));
        assert!(!patterns.table_clause.is_match("index_no INT"));
    }

    #[test]
    fn comments_are_stripped_before_splitting() {
        let patterns = patterns().unwrap();
        let statements = split_statements(
            patterns,
            "/* header; with semicolon */ CREATE TABLE a (id INT); -- trailing; note\n",
        );
        assert_eq!(statements, vec!["CREATE TABLE a (id INT)".to_string()]);
    }
}
