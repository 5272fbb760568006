//! Core contracts and helpers for modelforge.
//!
//! This crate defines the canonical entity/relation/field model, the naming
//! rules shared by every model element, and the static constraint registry.

pub mod constraints;
pub mod error;
pub mod model;
pub mod naming;
pub mod schema;

pub use constraints::{
    ConstraintDefinition, ConstraintError, RequiredValues, TypeGroup, ValueArity, definition,
    definitions, is_applicable, options_for_field_type, type_group, validate_constraint_list,
};
pub use error::{Error, Result};
pub use model::{
    Constraint, DataObject, DtoType, Entity, Field, FieldMapping, ImportedSchema,
    MapperDefinition, ProjectModel, ProjectSettings, Relation, RelationType,
};
pub use naming::{
    find_reserved_keyword, find_sql_reserved_word, is_valid_artifact_id, is_valid_enum_constant,
    is_valid_group_id, is_valid_identifier, is_valid_type_name, to_identifier_case,
    to_type_name_case,
};
pub use schema::project_json_schema;

/// Current contract version for exported `project.json` artifacts.
pub const MODEL_VERSION: &str = "0.1";
