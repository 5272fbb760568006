use modelforge_core::{DataObject, Entity, Field, ProjectModel, is_valid_type_name};

use crate::errors::{ValidationIssue, ValidationReport};
use crate::fields::{FieldOwner, validate_field, validate_field_list};
use crate::names::{Namespace, validate_model_name};

/// `mappedSuperclass`, `addRestEndpoints` and `addCrudOperations` exclude
/// each other.
pub fn validate_entity_flags(entity: &Entity) -> ValidationReport {
    let mut report = ValidationReport::default();
    let set: Vec<&str> = [
        (entity.mapped_superclass, "mappedSuperclass"),
        (entity.add_rest_endpoints, "addRestEndpoints"),
        (entity.add_crud_operations, "addCrudOperations"),
    ]
    .into_iter()
    .filter_map(|(enabled, flag)| enabled.then_some(flag))
    .collect();

    if set.len() > 1 {
        report.push(ValidationIssue::error(
            "conflicting_flags",
            format!("/{}", set[1]),
            format!("{} cannot be combined", set.join(" and ")),
        ));
    }

    report
}

/// Validate an entity before it is added to or updated in `model`.
///
/// `original` is the entity's name before the edit, `None` when adding.
pub fn validate_entity(
    entity: &Entity,
    model: &ProjectModel,
    original: Option<&str>,
) -> ValidationReport {
    let mut report = validate_model_name(
        &entity.name,
        Namespace::Entity,
        model.entities.iter().map(|existing| existing.name.as_str()),
        original,
    );
    report.merge(validate_entity_flags(entity));
    report.merge(validate_fields(&entity.fields, FieldOwner::Entity));
    report
}

/// Validate a data object before it is added to or updated in `model`.
pub fn validate_data_object(
    dto: &DataObject,
    model: &ProjectModel,
    original: Option<&str>,
) -> ValidationReport {
    let mut report = validate_model_name(
        &dto.name,
        Namespace::DataObject,
        model.data_objects.iter().map(|existing| existing.name.as_str()),
        original,
    );

    if let Some(wrapper) = dto.response_wrapper.as_deref().map(str::trim)
        && !wrapper.is_empty()
        && !is_valid_type_name(wrapper)
    {
        report.push(ValidationIssue::error(
            "invalid_response_wrapper",
            "/responseWrapper",
            format!("'{wrapper}' is not a valid type name"),
        ));
    }

    report.merge(validate_fields(&dto.fields, FieldOwner::DataObject));
    report
}

/// Each field is checked against the fields declared before it, so a clash
/// is reported once, on the later field.
fn validate_fields(fields: &[Field], owner: FieldOwner) -> ValidationReport {
    let mut report = validate_field_list(fields, owner);
    for (idx, field) in fields.iter().enumerate() {
        let field_report = validate_field(field, &fields[..idx], None, owner);
        report.merge_at(&format!("/fields/{idx}"), field_report);
    }
    report
}

#[cfg(test)]
mod tests {
    use modelforge_core::DtoType;

    use super::*;

    fn customer() -> Entity {
        Entity::new("Customer", vec![Field::synthetic_id(), Field::new("email", "String")])
    }

    fn model_with(entities: Vec<Entity>) -> ProjectModel {
        ProjectModel {
            entities,
            ..ProjectModel::default()
        }
    }

    #[test]
    fn conflicting_flags_are_rejected() {
        let mut entity = customer();
        entity.mapped_superclass = true;
        assert!(validate_entity_flags(&entity).is_ok());

        entity.add_crud_operations = true;
        let report = validate_entity_flags(&entity);
        assert!(report.has_code("conflicting_flags"));
        assert_eq!(report.errors[0].path, "/addCrudOperations");
    }

    #[test]
    fn field_issues_are_nested_under_their_index() {
        let mut entity = customer();
        entity.fields.push(Field::new("Email", "String"));

        let report = validate_entity(&entity, &ProjectModel::default(), None);
        assert_eq!(report.error_messages(), vec![(
            "/fields/2/name",
            "a field named 'Email' already exists"
        )]);
    }

    #[test]
    fn entity_name_is_checked_against_the_model() {
        let model = model_with(vec![customer()]);

        let mut renamed = customer();
        renamed.name = "customer".to_string();
        assert!(validate_entity(&renamed, &model, None).has_code("duplicate_name"));
        assert!(validate_entity(&customer(), &model, Some("Customer")).is_ok());
    }

    #[test]
    fn data_objects_have_their_own_namespace() {
        let model = model_with(vec![customer()]);
        let fields = vec![Field::new("email", "String")];
        let dto = DataObject::new("Customer", DtoType::Response, fields);
        assert!(validate_data_object(&dto, &model, None).is_ok());

        let mut wrapped = dto.clone();
        wrapped.response_wrapper = Some("page".to_string());
        assert!(validate_data_object(&wrapped, &model, None).has_code("invalid_response_wrapper"));
    }
}
