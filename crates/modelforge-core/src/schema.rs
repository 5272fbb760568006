use schemars::schema::RootSchema;
use schemars::schema_for;

use crate::model::ProjectModel;

/// Emit the JSON Schema for `project.json`.
pub fn project_json_schema() -> RootSchema {
    schema_for!(ProjectModel)
}
