//! Mapper type compatibility, auto-mapping and the mapper rule.

use modelforge_core::{Field, FieldMapping, MapperDefinition, ProjectModel};

use crate::errors::{ValidationIssue, ValidationReport};
use crate::names::{Namespace, validate_model_name};

/// Type spellings that share a bucket. Lookup keys are lower-case.
const TYPE_BUCKETS: &[(&str, &str)] = &[
    ("int", "INTEGER"),
    ("integer", "INTEGER"),
    ("long", "LONG"),
    ("bigint", "LONG"),
    ("short", "SHORT"),
    ("smallint", "SHORT"),
    ("byte", "BYTE"),
    ("double", "DOUBLE"),
    ("float", "FLOAT"),
    ("decimal", "BIGDECIMAL"),
    ("bigdecimal", "BIGDECIMAL"),
    ("numeric", "BIGDECIMAL"),
    ("biginteger", "BIGINTEGER"),
    ("string", "STRING"),
    ("text", "STRING"),
    ("varchar", "STRING"),
    ("char", "CHARACTER"),
    ("character", "CHARACTER"),
    ("bool", "BOOLEAN"),
    ("boolean", "BOOLEAN"),
    ("date", "LOCALDATE"),
    ("localdate", "LOCALDATE"),
    ("datetime", "LOCALDATETIME"),
    ("localdatetime", "LOCALDATETIME"),
    ("instant", "INSTANT"),
    ("timestamp", "INSTANT"),
    ("uuid", "UUID"),
];

const CONTAINER_BUCKETS: &[(&str, &str)] = &[
    ("list", "LIST"),
    ("arraylist", "LIST"),
    ("collection", "LIST"),
    ("set", "SET"),
    ("hashset", "SET"),
    ("map", "MAP"),
    ("hashmap", "MAP"),
];

/// Canonical bucket of a type name: `Int` and `Integer` both give
/// `INTEGER`, `List<Int>` gives `LIST<INTEGER>`, `long[]` gives
/// `ARRAY<LONG>`.
pub fn normalize_type(field_type: &str) -> String {
    let trimmed = field_type.trim();

    if let Some(element) = trimmed.strip_suffix("[]") {
        return format!("ARRAY<{}>", normalize_type(element));
    }

    if let Some(open) = trimmed.find('<')
        && trimmed.ends_with('>')
    {
        let base = trimmed[..open].trim().to_ascii_lowercase();
        let container = lookup(CONTAINER_BUCKETS, &base)
            .map(str::to_string)
            .unwrap_or_else(|| base.to_ascii_uppercase());
        let arguments: Vec<String> = split_type_arguments(&trimmed[open + 1..trimmed.len() - 1])
            .into_iter()
            .map(normalize_type)
            .collect();
        return format!("{container}<{}>", arguments.join(","));
    }

    let key = trimmed.to_ascii_lowercase();
    lookup(TYPE_BUCKETS, &key)
        .map(str::to_string)
        .unwrap_or_else(|| key.to_ascii_uppercase())
}

pub fn types_compatible(left: &str, right: &str) -> bool {
    normalize_type(left) == normalize_type(right)
}

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, bucket)| *bucket)
}

fn split_type_arguments(arguments: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, ch) in arguments.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&arguments[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&arguments[start..]);
    parts
}

fn find_field<'a>(fields: &'a [Field], name: &str) -> Option<&'a Field> {
    fields
        .iter()
        .find(|field| field.name.eq_ignore_ascii_case(name.trim()))
}

fn mapping_for<'a>(mappings: &'a [FieldMapping], source: &str) -> Option<&'a FieldMapping> {
    mappings
        .iter()
        .find(|mapping| mapping.source_field.trim().eq_ignore_ascii_case(source))
}

/// Propose one mapping row per source field.
///
/// Explicit targets in `existing` are kept. Other rows get the target field
/// with the same lower-cased name when the types are compatible, or stay
/// empty.
pub fn auto_map(
    source: &[Field],
    target: &[Field],
    existing: &[FieldMapping],
) -> Vec<FieldMapping> {
    source
        .iter()
        .map(|field| {
            if let Some(explicit) = mapping_for(existing, &field.name)
                && !explicit.target_field.trim().is_empty()
            {
                return FieldMapping {
                    source_field: field.name.clone(),
                    target_field: explicit.target_field.clone(),
                };
            }

            let proposed = target
                .iter()
                .find(|candidate| {
                    candidate.name.to_lowercase() == field.name.to_lowercase()
                        && types_compatible(&candidate.field_type, &field.field_type)
                })
                .map(|candidate| candidate.name.clone())
                .unwrap_or_default();

            FieldMapping {
                source_field: field.name.clone(),
                target_field: proposed,
            }
        })
        .collect()
}

/// Validate a mapper before it is added to or updated in `model`.
///
/// Every field of the source model is a visible row and must be mapped.
pub fn validate_mapper(
    mapper: &MapperDefinition,
    model: &ProjectModel,
    original: Option<&str>,
) -> ValidationReport {
    let mut report = validate_model_name(
        &mapper.name,
        Namespace::Mapper,
        model.mappers.iter().map(|existing| existing.name.as_str()),
        original,
    );

    let from = resolve_endpoint(&mapper.from_model, "/fromModel", "source", model, &mut report);
    let to = resolve_endpoint(&mapper.to_model, "/toModel", "target", model, &mut report);

    let (from_name, to_name) = (mapper.from_model.trim(), mapper.to_model.trim());
    if !from_name.is_empty() && from_name.eq_ignore_ascii_case(to_name) {
        report.push(ValidationIssue::error(
            "same_model",
            "/toModel",
            "source and target model must be different",
        ));
    }

    let (Some(from_fields), Some(to_fields)) = (from, to) else {
        return report;
    };

    for (idx, mapping) in mapper.mappings.iter().enumerate() {
        let path = format!("/mappings/{idx}");
        let source_name = mapping.source_field.trim();
        let target_name = mapping.target_field.trim();

        let source_field = find_field(from_fields, source_name);
        if !source_name.is_empty() && source_field.is_none() {
            report.push(ValidationIssue::error(
                "unknown_source_field",
                format!("{path}/sourceField"),
                format!("'{from_name}' has no field '{source_name}'"),
            ));
        }

        let target_field = find_field(to_fields, target_name);
        if !target_name.is_empty() && target_field.is_none() {
            report.push(ValidationIssue::error(
                "unknown_target_field",
                format!("{path}/targetField"),
                format!("'{to_name}' has no field '{target_name}'"),
            ));
        }

        if let (Some(source_field), Some(target_field)) = (source_field, target_field)
            && !types_compatible(&source_field.field_type, &target_field.field_type)
        {
            report.push(ValidationIssue::error(
                "incompatible_types",
                format!("{path}/targetField"),
                format!(
                    "cannot map '{}' ({}) to '{}' ({})",
                    source_field.name,
                    source_field.field_type,
                    target_field.name,
                    target_field.field_type
                ),
            ));
        }
    }

    let unmapped: Vec<&str> = from_fields
        .iter()
        .filter(|field| {
            mapping_for(&mapper.mappings, &field.name)
                .is_none_or(|mapping| mapping.target_field.trim().is_empty())
        })
        .map(|field| field.name.as_str())
        .collect();
    if !unmapped.is_empty() {
        report.push(
            ValidationIssue::error(
                "all_rows_mapped",
                "/mappings",
                format!("every source field must be mapped, missing: {}", unmapped.join(", ")),
            )
            .with_hint("pick a target field for each row or run auto-mapping"),
        );
    }

    report
}

fn resolve_endpoint<'a>(
    name: &str,
    path: &str,
    role: &str,
    model: &'a ProjectModel,
    report: &mut ValidationReport,
) -> Option<&'a [Field]> {
    let name = name.trim();
    if name.is_empty() {
        report.push(ValidationIssue::error(
            format!("{role}_model_required"),
            path,
            format!("{role} model is required"),
        ));
        return None;
    }

    let fields = model.model_fields(name);
    if fields.is_none() {
        report.push(ValidationIssue::error(
            "unknown_model",
            path,
            format!("no entity or data object named '{name}'"),
        ));
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_merge_spellings() {
        assert_eq!(normalize_type("Int"), "INTEGER");
        assert_eq!(normalize_type("Integer"), "INTEGER");
        assert_eq!(normalize_type("Decimal"), "BIGDECIMAL");
        assert_eq!(normalize_type("BigDecimal"), "BIGDECIMAL");
        assert_eq!(normalize_type("List<Int>"), "LIST<INTEGER>");
        assert_eq!(normalize_type("List<List<decimal>>"), "LIST<LIST<BIGDECIMAL>>");
        assert_eq!(normalize_type("Map<String, Long>"), "MAP<STRING,LONG>");
        assert_eq!(normalize_type("long[]"), "ARRAY<LONG>");
        assert_eq!(normalize_type("Money"), "MONEY");
    }

    #[test]
    fn compatibility_is_bucket_equality() {
        assert!(types_compatible("int", "Integer"));
        assert!(types_compatible("List<Integer>", "List<int>"));
        assert!(!types_compatible("Integer", "Long"));
        assert!(!types_compatible("List<Long>", "Set<Long>"));
    }

    #[test]
    fn auto_map_keeps_explicit_targets() {
        let source = vec![Field::new("id", "Long"), Field::new("total", "BigDecimal")];
        let target = vec![
            Field::new("ID", "long"),
            Field::new("total", "Decimal"),
            Field::new("legacyId", "Long"),
        ];
        let existing = vec![FieldMapping {
            source_field: "id".to_string(),
            target_field: "legacyId".to_string(),
        }];

        let rows = auto_map(&source, &target, &existing);
        assert_eq!(rows[0].target_field, "legacyId");
        assert_eq!(rows[1].target_field, "total");
    }

    #[test]
    fn auto_map_skips_incompatible_types() {
        let source = vec![Field::new("code", "String")];
        let target = vec![Field::new("code", "Integer")];
        let rows = auto_map(&source, &target, &[]);
        assert_eq!(rows[0].target_field, "");
    }
}
