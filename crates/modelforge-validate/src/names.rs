use modelforge_core::{find_reserved_keyword, is_valid_identifier};

use crate::errors::{ValidationIssue, ValidationReport};

/// Independent name namespaces: an entity and a data object may share a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Entity,
    DataObject,
    Mapper,
}

impl Namespace {
    pub fn label(self) -> &'static str {
        match self {
            Namespace::Entity => "entity",
            Namespace::DataObject => "data object",
            Namespace::Mapper => "mapper",
        }
    }
}

/// Validate the name of an entity, data object or mapper.
///
/// `existing` holds the names already in the namespace; `original` is the
/// name the element had before this edit and is skipped once, so saving an
/// element without renaming it is not a duplicate of itself.
pub fn validate_model_name<'a>(
    name: &str,
    namespace: Namespace,
    existing: impl IntoIterator<Item = &'a str>,
    original: Option<&str>,
) -> ValidationReport {
    let mut report = ValidationReport::default();
    let label = namespace.label();
    let name = name.trim();

    if name.is_empty() {
        report.push(ValidationIssue::error(
            "name_required",
            "/name",
            format!("{label} name is required"),
        ));
        return report;
    }

    if let Some(keyword) = find_reserved_keyword(name) {
        report.push(
            ValidationIssue::error(
                "reserved_keyword",
                "/name",
                format!("'{keyword}' is a reserved keyword and cannot be used as a {label} name"),
            )
            .with_hint("choose a name that is not a Java or SQL keyword"),
        );
        return report;
    }

    if !is_valid_identifier(name) {
        report.push(
            ValidationIssue::error(
                "invalid_identifier",
                "/name",
                format!("'{name}' is not a valid {label} name"),
            )
            .with_hint("use letters, digits, '_' or '$', not starting with a digit"),
        );
        return report;
    }

    let mut skipped_original = false;
    let duplicate = existing.into_iter().any(|candidate| {
        if !skipped_original && original == Some(candidate) {
            skipped_original = true;
            return false;
        }
        candidate.trim().eq_ignore_ascii_case(name)
    });

    if duplicate {
        report.push(ValidationIssue::error(
            "duplicate_name",
            "/name",
            format!("a {label} named '{name}' already exists"),
        ));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_keyword_message_names_the_keyword() {
        let report = validate_model_name("class", Namespace::Entity, [], None);
        assert!(report.has_code("reserved_keyword"));
        assert!(report.errors[0].message.contains("'class'"));

        let report = validate_model_name("Select", Namespace::Entity, [], None);
        assert!(report.errors[0].message.contains("'select'"));
    }

    #[test]
    fn duplicates_are_case_insensitive() {
        let report = validate_model_name("customer", Namespace::Entity, ["Customer"], None);
        assert!(report.has_code("duplicate_name"));
    }

    #[test]
    fn editing_without_rename_is_not_a_duplicate() {
        let existing = ["Customer", "Order"];
        let report = validate_model_name("Customer", Namespace::Entity, existing, Some("Customer"));
        assert!(report.is_ok());

        let report = validate_model_name("Order", Namespace::Entity, existing, Some("Customer"));
        assert!(report.has_code("duplicate_name"));
    }

    #[test]
    fn order_and_user_are_valid_entity_names() {
        for name in ["Order", "User"] {
            let report = validate_model_name(name, Namespace::Entity, ["Customer"], None);
            assert!(report.is_ok(), "{name}: {:?}", report.errors);
        }
    }

    #[test]
    fn blank_and_malformed_names() {
        assert!(validate_model_name("  ", Namespace::Mapper, [], None).has_code("name_required"));
        let report = validate_model_name("2Fast", Namespace::DataObject, [], None);
        assert!(report.has_code("invalid_identifier"));
        assert!(report.errors[0].message.contains("data object"));
    }
}
