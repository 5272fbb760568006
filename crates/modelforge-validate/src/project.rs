use jsonschema::JSONSchema;
use modelforge_core::{ProjectModel, is_valid_artifact_id, is_valid_group_id, project_json_schema};
use serde_json::Value;

use crate::entities::{validate_data_object, validate_entity};
use crate::errors::{IssueSeverity, Result, ValidateError, ValidationIssue, ValidationReport};
use crate::mappers::validate_mapper;
use crate::relations::{RelationPolicy, validate_relation};

/// Validate a project JSON document against the project JSON Schema.
pub fn validate_project_json(project_json: &Value) -> Result<ValidationReport> {
    let schema = serde_json::to_value(project_json_schema())?;
    let compiled =
        JSONSchema::compile(&schema).map_err(|err| ValidateError::Schema(err.to_string()))?;

    let mut report = ValidationReport::default();

    if let Err(errors) = compiled.validate(project_json) {
        for error in errors {
            let path = normalized_json_pointer(&error.instance_path.to_string());
            report.push(ValidationIssue::new(
                IssueSeverity::Error,
                "schema_violation",
                path,
                error.to_string(),
                None,
            ));
        }
    }

    Ok(report)
}

/// Run every integrity rule across a whole project.
///
/// Each element is validated as if it were being saved unchanged, so it is
/// never reported as a duplicate of itself.
pub fn validate_project(model: &ProjectModel, policy: RelationPolicy) -> ValidationReport {
    let mut report = ValidationReport::default();

    if let Some(settings) = &model.settings {
        if !is_valid_group_id(settings.group_id.trim()) {
            report.push(
                ValidationIssue::error(
                    "invalid_group_id",
                    "/settings/groupId",
                    format!("'{}' is not a valid group id", settings.group_id),
                )
                .with_hint("use lowercase dot-separated segments, e.g. com.example.shop"),
            );
        }
        if !is_valid_artifact_id(settings.artifact_id.trim()) {
            report.push(
                ValidationIssue::error(
                    "invalid_artifact_id",
                    "/settings/artifactId",
                    format!("'{}' is not a valid artifact id", settings.artifact_id),
                )
                .with_hint("use lowercase hyphen-separated segments, e.g. order-service"),
            );
        }
    }

    for (idx, entity) in model.entities.iter().enumerate() {
        report.merge_at(
            &format!("/entities/{idx}"),
            validate_entity(entity, model, Some(entity.name.as_str())),
        );
    }

    for (idx, dto) in model.data_objects.iter().enumerate() {
        report.merge_at(
            &format!("/dataObjects/{idx}"),
            validate_data_object(dto, model, Some(dto.name.as_str())),
        );
    }

    for (idx, relation) in model.relations.iter().enumerate() {
        report.merge_at(
            &format!("/relations/{idx}"),
            validate_relation(relation, model, policy, Some(idx)),
        );
    }

    for (idx, mapper) in model.mappers.iter().enumerate() {
        report.merge_at(
            &format!("/mappers/{idx}"),
            validate_mapper(mapper, model, Some(mapper.name.as_str())),
        );
    }

    report
}

fn normalized_json_pointer(pointer: &str) -> String {
    if pointer.is_empty() {
        "/".to_string()
    } else {
        pointer.to_string()
    }
}
