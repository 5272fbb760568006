use modelforge_core::{
    Field, definition, find_sql_reserved_word, is_applicable, is_valid_identifier,
    validate_constraint_list,
};

use crate::errors::{ValidationIssue, ValidationReport};

/// Kind of model that owns a field list.
///
/// Primary key rules only apply to entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOwner {
    Entity,
    DataObject,
}

/// Validate one field against the other fields of its owner.
///
/// `editing` is the index of `field` inside `siblings` when an existing field
/// is being updated; that slot is ignored for duplicate and primary key
/// checks.
pub fn validate_field(
    field: &Field,
    siblings: &[Field],
    editing: Option<usize>,
    owner: FieldOwner,
) -> ValidationReport {
    let mut report = ValidationReport::default();
    let others = move || {
        siblings
            .iter()
            .enumerate()
            .filter(move |(idx, _)| Some(*idx) != editing)
            .map(|(_, sibling)| sibling)
    };

    let name = field.name.trim();
    if name.is_empty() {
        report.push(ValidationIssue::error(
            "name_required",
            "/name",
            "field name is required",
        ));
    } else if !is_valid_identifier(name) {
        report.push(
            ValidationIssue::error(
                "invalid_identifier",
                "/name",
                format!("'{name}' is not a valid field name"),
            )
            .with_hint("use letters, digits, '_' or '$' and avoid language keywords"),
        );
    } else if others().any(|sibling| sibling.name.trim().eq_ignore_ascii_case(name)) {
        report.push(ValidationIssue::error(
            "duplicate_field",
            "/name",
            format!("a field named '{name}' already exists"),
        ));
    } else if let Some(word) = find_sql_reserved_word(name) {
        report.push(ValidationIssue::warning(
            "sql_reserved_word",
            "/name",
            format!("'{word}' is a SQL reserved word and will need quoting in generated queries"),
        ));
    }

    if owner == FieldOwner::Entity
        && field.primary_key
        && others().any(|sibling| sibling.primary_key)
    {
        report.push(ValidationIssue::error(
            "multiple_primary_keys",
            "/primaryKey",
            "only one primary key is allowed",
        ));
    }

    let field_type = field.field_type.trim();
    if field_type.is_empty() {
        report.push(ValidationIssue::error(
            "type_required",
            "/type",
            "field type is required",
        ));
    }

    if field.max_length == Some(0) {
        report.push(ValidationIssue::error(
            "invalid_max_length",
            "/maxLength",
            "max length must be greater than zero",
        ));
    }

    if let Err(err) = validate_constraint_list(&field.constraints) {
        report.push(ValidationIssue::error(
            "invalid_constraint",
            "/constraints",
            err.to_string(),
        ));
    }

    for (idx, constraint) in field.constraints.iter().enumerate() {
        let constraint_name = constraint.name.trim();
        if constraint_name.is_empty() {
            continue;
        }
        let path = format!("/constraints/{idx}");
        if definition(constraint_name).is_none() {
            report.push(ValidationIssue::error(
                "unknown_constraint",
                path,
                format!("unknown constraint '{constraint_name}'"),
            ));
        } else if !field_type.is_empty() && !is_applicable(constraint_name, field_type) {
            report.push(ValidationIssue::error(
                "constraint_not_applicable",
                path,
                format!("constraint '{constraint_name}' does not apply to type '{field_type}'"),
            ));
        }
    }

    report
}

/// Validate the field list of an entity or data object as a whole.
pub fn validate_field_list(fields: &[Field], owner: FieldOwner) -> ValidationReport {
    let mut report = ValidationReport::default();

    if fields.is_empty() {
        report.push(ValidationIssue::error(
            "fields_empty",
            "/fields",
            "at least one field is required",
        ));
        return report;
    }

    if owner == FieldOwner::Entity && !fields.iter().any(|field| field.primary_key) {
        report.push(
            ValidationIssue::error(
                "primary_key_missing",
                "/fields",
                "at least one field must be marked as primary key",
            )
            .with_hint("mark the identifier column as primary key"),
        );
    }

    report
}
