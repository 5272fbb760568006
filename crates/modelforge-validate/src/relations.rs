use modelforge_core::{ProjectModel, Relation, RelationType};

use crate::errors::{ValidationIssue, ValidationReport};
use crate::mappers::types_compatible;

/// Policy knobs for relation validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationPolicy {
    /// Accept relations whose source and target are the same entity, such as
    /// `Employee.manager -> Employee`.
    pub allow_self_reference: bool,
}

impl Default for RelationPolicy {
    fn default() -> Self {
        Self {
            allow_self_reference: true,
        }
    }
}

/// Validate a relation before it is added to or updated in `model`.
///
/// `editing` is the index of the relation inside `model.relations` when an
/// existing relation is updated.
pub fn validate_relation(
    relation: &Relation,
    model: &ProjectModel,
    policy: RelationPolicy,
    editing: Option<usize>,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    let source = model.entity(relation.source_entity.trim());
    let target = model.entity(relation.target_entity.trim());

    if source.is_none() {
        report.push(ValidationIssue::error(
            "unknown_source_entity",
            "/sourceEntity",
            format!("source entity '{}' does not exist", relation.source_entity),
        ));
    }
    if target.is_none() {
        report.push(ValidationIssue::error(
            "unknown_target_entity",
            "/targetEntity",
            format!("target entity '{}' does not exist", relation.target_entity),
        ));
    }

    if !policy.allow_self_reference
        && relation
            .source_entity
            .trim()
            .eq_ignore_ascii_case(relation.target_entity.trim())
    {
        report.push(ValidationIssue::error(
            "self_reference",
            "/targetEntity",
            "source and target entity must be different",
        ));
    }

    let field_name = relation.source_field_name.trim();
    if field_name.is_empty() {
        report.push(ValidationIssue::error(
            "source_field_required",
            "/sourceFieldName",
            "source field name is required",
        ));
    } else if !field_name.chars().all(|ch| ch.is_ascii_alphanumeric()) {
        report.push(
            ValidationIssue::error(
                "invalid_source_field",
                "/sourceFieldName",
                format!("'{field_name}' must contain only letters and digits"),
            )
            .with_hint("remove spaces and punctuation from the field name"),
        );
    }

    if !relation.relation_type.is_known() {
        report.push(ValidationIssue::warning(
            "unknown_relation_type",
            "/relationType",
            format!(
                "relation type '{}' is not one of OneToOne, OneToMany, ManyToOne, ManyToMany",
                relation.relation_type
            ),
        ));
    }

    if let (Some(target), Some(target_field)) = (
        target,
        relation
            .target_field_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty()),
    ) && target.field(target_field).is_none()
    {
        report.push(ValidationIssue::error(
            "unknown_target_field",
            "/targetFieldName",
            format!("entity '{}' has no field '{target_field}'", target.name),
        ));
    }

    let single_valued = matches!(
        relation.relation_type,
        RelationType::ManyToOne | RelationType::OneToOne
    );
    if single_valued
        && !field_name.is_empty()
        && let (Some(source), Some(target)) = (source, target)
        && let (Some(existing), Some(key)) = (source.field(field_name), target.primary_key())
        && !types_compatible(&existing.field_type, &key.field_type)
    {
        report.push(ValidationIssue::error(
            "incompatible_relation_type",
            "/sourceFieldName",
            format!(
                "field '{}' of type '{}' cannot reference {}.{} of type '{}'",
                existing.name, existing.field_type, target.name, key.name, key.field_type
            ),
        ));
    }

    let clash = !field_name.is_empty()
        && model
            .relations
            .iter()
            .enumerate()
            .filter(|(idx, _)| Some(*idx) != editing)
            .any(|(_, other)| {
                other
                    .source_entity
                    .trim()
                    .eq_ignore_ascii_case(relation.source_entity.trim())
                    && other.source_field_name.trim().eq_ignore_ascii_case(field_name)
            });
    if clash {
        report.push(ValidationIssue::error(
            "duplicate_relation_field",
            "/sourceFieldName",
            format!(
                "entity '{}' already has a relation field named '{field_name}'",
                relation.source_entity
            ),
        ));
    }

    report
}
