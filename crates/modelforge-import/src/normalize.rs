//! Normalizer for heterogeneous JSON schema exports.
//!
//! Every tolerated key spelling lives in one of the alias lists below; the
//! first alias that yields a usable value wins.

use serde_json::{Map, Value};

use modelforge_core::{Constraint, Entity, Field, ImportedSchema, Relation, RelationType};

use crate::error::{ImportError, Result};
use crate::options::ImportOptions;

const ENTITY_PATHS: &[&[&str]] = &[&["entities"], &["schema", "entities"], &["model", "entities"]];
const RELATION_PATHS: &[&[&str]] = &[
    &["relations"],
    &["schema", "relations"],
    &["model", "relations"],
    &["relationships"],
];

const ENTITY_NAME_KEYS: &[&str] = &["name", "entityName", "table", "tableName", "entity"];
const ENTITY_FIELD_KEYS: &[&str] = &["fields", "columns", "attributes"];
const MAPPED_SUPERCLASS_KEYS: &[&str] =
    &["mappedSuperclass", "mapped_superclass", "isMappedSuperclass"];
const REST_ENDPOINT_KEYS: &[&str] = &["addRestEndpoints", "add_rest_endpoints", "restEndpoints"];
const CRUD_OPERATION_KEYS: &[&str] =
    &["addCrudOperations", "add_crud_operations", "crudOperations"];
const AUDITABLE_KEYS: &[&str] = &["auditable", "isAuditable"];
const SOFT_DELETE_KEYS: &[&str] = &["softDelete", "soft_delete", "isSoftDelete"];
const IMMUTABLE_KEYS: &[&str] = &["immutable", "isImmutable"];
const NATURAL_ID_CACHE_KEYS: &[&str] = &["naturalIdCache", "natural_id_cache"];

const FIELD_NAME_KEYS: &[&str] = &["name", "fieldName", "column", "columnName", "attribute"];
const FIELD_TYPE_KEYS: &[&str] = &["type", "fieldType", "dataType"];
const FIELD_LENGTH_KEYS: &[&str] = &["maxLength", "length", "size"];
const PRIMARY_KEY_KEYS: &[&str] = &["primaryKey", "pk", "isPrimaryKey", "primary_key", "primary"];
const REQUIRED_KEYS: &[&str] = &["required", "notNull", "isRequired", "not_null", "mandatory"];
const NULLABLE_KEYS: &[&str] = &["nullable", "isNullable"];
const UNIQUE_KEYS: &[&str] = &["unique", "isUnique"];
const JSON_PROPERTY_KEYS: &[&str] = &["jsonProperty", "json_property", "jsonName"];
const CONSTRAINT_LIST_KEYS: &[&str] = &["constraints", "validations"];
const CONSTRAINT_NAME_KEYS: &[&str] = &["name", "constraint", "type"];
const CONSTRAINT_VALUE_KEYS: &[&str] = &["value", "value1", "min"];
const CONSTRAINT_VALUE2_KEYS: &[&str] = &["value2", "secondValue", "max"];

const SOURCE_ENTITY_KEYS: &[&str] =
    &["sourceEntity", "source", "from", "fromEntity", "source_entity"];
const TARGET_ENTITY_KEYS: &[&str] = &["targetEntity", "target", "to", "toEntity", "target_entity"];
const SOURCE_FIELD_KEYS: &[&str] =
    &["sourceFieldName", "sourceField", "fieldName", "source_field_name"];
const TARGET_FIELD_KEYS: &[&str] =
    &["targetFieldName", "targetField", "mappedBy", "target_field_name"];
const RELATION_TYPE_KEYS: &[&str] = &[
    "relationType",
    "type",
    "relation",
    "kind",
    "cardinality",
    "relation_type",
];

const DEFAULT_FIELD_TYPE: &str = "String";
const DEFAULT_RELATION_TYPE: RelationType = RelationType::ManyToOne;

/// Parse JSON text and normalize it. Invalid JSON rejects the import.
pub fn normalize_schema_str(input: &str, options: &ImportOptions) -> Result<ImportedSchema> {
    let value: Value = serde_json::from_str(input)?;
    normalize_schema(&value, options)
}

/// Normalize any tolerated JSON shape into canonical entities and relations.
///
/// Entities without a name and relations whose endpoints are unknown are
/// dropped; only a missing entity list rejects the input.
pub fn normalize_schema(root: &Value, options: &ImportOptions) -> Result<ImportedSchema> {
    let raw_entities = locate_array(root, ENTITY_PATHS, true).ok_or_else(|| {
        ImportError::UnsupportedShape(
            "expected an array, `entities`, `schema.entities` or `model.entities`".to_string(),
        )
    })?;

    let entities: Vec<Entity> = raw_entities.iter().filter_map(normalize_entity).collect();

    let relations: Vec<Relation> = locate_array(root, RELATION_PATHS, false)
        .map(|raw| {
            raw.iter()
                .filter_map(|value| normalize_relation(value, &entities, options))
                .collect()
        })
        .unwrap_or_default();

    tracing::debug!(
        event = "json_normalized",
        entities = entities.len(),
        relations = relations.len()
    );

    Ok(ImportedSchema {
        entities,
        relations,
    })
}

fn locate_array<'a>(
    root: &'a Value,
    paths: &[&[&str]],
    accept_root_array: bool,
) -> Option<&'a Vec<Value>> {
    if let Value::Array(items) = root {
        return accept_root_array.then_some(items);
    }

    paths.iter().find_map(|path| {
        path.iter()
            .try_fold(root, |node, key| node.get(*key))
            .and_then(Value::as_array)
    })
}

fn first_value<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|key| object.get(*key).filter(|value| !value.is_null()))
}

fn first_str(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        object
            .get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    })
}

fn first_bool(object: &Map<String, Value>, keys: &[&str]) -> Option<bool> {
    keys.iter()
        .find_map(|key| object.get(*key).and_then(coerce_bool))
}

fn first_u32(object: &Map<String, Value>, keys: &[&str]) -> Option<u32> {
    keys.iter().find_map(|key| match object.get(*key)? {
        Value::Number(number) => number.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    })
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => match number.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Some(true),
            "false" | "no" | "n" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn normalize_entity(value: &Value) -> Option<Entity> {
    let object = value.as_object()?;
    let Some(name) = first_str(object, ENTITY_NAME_KEYS) else {
        tracing::debug!(event = "entity_dropped", reason = "missing_name");
        return None;
    };

    let mut fields = first_value(object, ENTITY_FIELD_KEYS)
        .map(normalize_fields)
        .unwrap_or_default();
    if fields.is_empty() {
        fields.push(Field::synthetic_id());
    }

    let flag = |keys: &[&str]| first_bool(object, keys).unwrap_or(false);
    Some(Entity {
        mapped_superclass: flag(MAPPED_SUPERCLASS_KEYS),
        add_rest_endpoints: flag(REST_ENDPOINT_KEYS),
        add_crud_operations: flag(CRUD_OPERATION_KEYS),
        auditable: flag(AUDITABLE_KEYS),
        soft_delete: flag(SOFT_DELETE_KEYS),
        immutable: flag(IMMUTABLE_KEYS),
        natural_id_cache: flag(NATURAL_ID_CACHE_KEYS),
        ..Entity::new(name, fields)
    })
}

/// Fields come as an array of objects or as a `name -> type|object` map.
fn normalize_fields(value: &Value) -> Vec<Field> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_object().and_then(|object| normalize_field(object, None)))
            .collect(),
        Value::Object(entries) => entries
            .iter()
            .filter_map(|(key, item)| match item {
                Value::String(field_type) => Some(Field::new(key.trim(), field_type.trim())),
                Value::Object(object) => normalize_field(object, Some(key.as_str())),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn normalize_field(object: &Map<String, Value>, fallback_name: Option<&str>) -> Option<Field> {
    let name = first_str(object, FIELD_NAME_KEYS)
        .or_else(|| fallback_name.map(|name| name.trim().to_string()))
        .filter(|name| !name.is_empty())?;
    let field_type =
        first_str(object, FIELD_TYPE_KEYS).unwrap_or_else(|| DEFAULT_FIELD_TYPE.to_string());

    let required = first_bool(object, REQUIRED_KEYS)
        .or_else(|| first_bool(object, NULLABLE_KEYS).map(|nullable| !nullable))
        .unwrap_or(false);

    Some(Field {
        max_length: first_u32(object, FIELD_LENGTH_KEYS),
        primary_key: first_bool(object, PRIMARY_KEY_KEYS).unwrap_or(false),
        required,
        unique: first_bool(object, UNIQUE_KEYS).unwrap_or(false),
        json_property: first_str(object, JSON_PROPERTY_KEYS),
        constraints: first_value(object, CONSTRAINT_LIST_KEYS)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(normalize_constraint).collect())
            .unwrap_or_default(),
        ..Field::new(name, field_type)
    })
}

fn normalize_constraint(value: &Value) -> Option<Constraint> {
    match value {
        Value::String(name) => Some(Constraint::new(name.trim())),
        Value::Object(object) => Some(Constraint {
            name: first_str(object, CONSTRAINT_NAME_KEYS).unwrap_or_default(),
            value: first_scalar(object, CONSTRAINT_VALUE_KEYS),
            value2: first_scalar(object, CONSTRAINT_VALUE2_KEYS),
        }),
        _ => None,
    }
}

/// Constraint values may be exported as numbers or booleans.
fn first_scalar(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match object.get(*key)? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    })
}

fn normalize_relation(
    value: &Value,
    entities: &[Entity],
    options: &ImportOptions,
) -> Option<Relation> {
    let object = value.as_object()?;

    let source =
        first_str(object, SOURCE_ENTITY_KEYS).and_then(|name| resolve_entity(&name, entities));
    let target =
        first_str(object, TARGET_ENTITY_KEYS).and_then(|name| resolve_entity(&name, entities));
    let (Some(source_entity), Some(target_entity)) = (source, target) else {
        tracing::debug!(event = "relation_discarded", reason = "unknown_entity");
        return None;
    };

    if !options.allow_self_reference && source_entity == target_entity {
        tracing::debug!(
            event = "relation_discarded",
            reason = "self_reference",
            entity = %source_entity
        );
        return None;
    }

    let relation_type = first_str(object, RELATION_TYPE_KEYS)
        .map(|raw| RelationType::parse(&raw))
        .unwrap_or(DEFAULT_RELATION_TYPE);
    let source_field_name =
        first_str(object, SOURCE_FIELD_KEYS).unwrap_or_else(|| decapitalize(&target_entity));

    Some(Relation {
        source_entity,
        target_entity,
        source_field_name,
        relation_type,
        target_field_name: first_str(object, TARGET_FIELD_KEYS),
        required: first_bool(object, REQUIRED_KEYS).unwrap_or(false),
    })
}

/// Exact match first, then case-insensitive, returning the entity's spelling.
fn resolve_entity(name: &str, entities: &[Entity]) -> Option<String> {
    entities
        .iter()
        .find(|entity| entity.name == name)
        .or_else(|| {
            entities
                .iter()
                .find(|entity| entity.name.eq_ignore_ascii_case(name))
        })
        .map(|entity| entity.name.clone())
}

fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
