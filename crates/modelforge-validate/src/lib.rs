//! Model integrity rules for entities, fields, data objects, relations and
//! mappers.
//!
//! Every rule returns a [`ValidationReport`]; callers decide how to show it.

pub mod entities;
pub mod errors;
pub mod fields;
pub mod mappers;
pub mod names;
pub mod project;
pub mod relations;

pub use entities::{validate_data_object, validate_entity, validate_entity_flags};
pub use errors::{IssueSeverity, Result, ValidateError, ValidationIssue, ValidationReport};
pub use fields::{FieldOwner, validate_field, validate_field_list};
pub use mappers::{auto_map, normalize_type, types_compatible, validate_mapper};
pub use names::{Namespace, validate_model_name};
pub use project::{validate_project, validate_project_json};
pub use relations::{RelationPolicy, validate_relation};
