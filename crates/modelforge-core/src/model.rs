use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Name of the synthetic primary key added to tables and entities without one.
pub const DEFAULT_ID_FIELD: &str = "id";
/// Type of the synthetic primary key.
pub const DEFAULT_ID_TYPE: &str = "Long";

/// A named validation rule attached to a field (e.g. `Size`, `Pattern`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Constraint {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value2: Option<String>,
}

impl Constraint {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            value2: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_value2(mut self, value: impl Into<String>) -> Self {
        self.value2 = Some(value.into());
        self
    }
}

/// A single field of an entity or data object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    /// Canonical type name (e.g. `String`, `Long`, `List<String>`).
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub unique: bool,
    /// Explicit JSON property name used by generated serializers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_property: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            max_length: None,
            primary_key: false,
            required: false,
            unique: false,
            json_property: None,
            constraints: Vec::new(),
        }
    }

    /// The `id: Long` primary key used when a table declares no key.
    pub fn synthetic_id() -> Self {
        Self {
            primary_key: true,
            required: true,
            ..Self::new(DEFAULT_ID_FIELD, DEFAULT_ID_TYPE)
        }
    }
}

/// A persistent domain object definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub mapped_superclass: bool,
    #[serde(default)]
    pub add_rest_endpoints: bool,
    #[serde(default)]
    pub add_crud_operations: bool,
    #[serde(default)]
    pub auditable: bool,
    #[serde(default)]
    pub soft_delete: bool,
    #[serde(default)]
    pub immutable: bool,
    #[serde(default)]
    pub natural_id_cache: bool,
}

impl Entity {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
            mapped_superclass: false,
            add_rest_endpoints: false,
            add_crud_operations: false,
            auditable: false,
            soft_delete: false,
            immutable: false,
            natural_id_cache: false,
        }
    }

    pub fn primary_key(&self) -> Option<&Field> {
        self.fields.iter().find(|field| field.primary_key)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|field| field.name.eq_ignore_ascii_case(name))
    }
}

/// Association kind between two entities.
///
/// Unrecognized tags are preserved as [`RelationType::Other`] so custom
/// generator tags survive a round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RelationType {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
    Other(String),
}

impl RelationType {
    /// Canonicalize a relation tag, ignoring case and non-alphanumerics.
    pub fn parse(raw: &str) -> Self {
        let key: String = raw
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "onetoone" => RelationType::OneToOne,
            "onetomany" => RelationType::OneToMany,
            "manytoone" => RelationType::ManyToOne,
            "manytomany" => RelationType::ManyToMany,
            _ => RelationType::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RelationType::OneToOne => "OneToOne",
            RelationType::OneToMany => "OneToMany",
            RelationType::ManyToOne => "ManyToOne",
            RelationType::ManyToMany => "ManyToMany",
            RelationType::Other(raw) => raw.as_str(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, RelationType::Other(_))
    }
}

impl From<String> for RelationType {
    fn from(value: String) -> Self {
        RelationType::parse(&value)
    }
}

impl From<RelationType> for String {
    fn from(value: RelationType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed association between two entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    pub source_entity: String,
    pub target_entity: String,
    pub source_field_name: String,
    #[schemars(with = "String")]
    pub relation_type: RelationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_field_name: Option<String>,
    #[serde(default)]
    pub required: bool,
}

/// Direction of a data-transfer object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DtoType {
    Request,
    Response,
}

/// A request or response transfer object definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DataObject {
    pub name: String,
    pub dto_type: DtoType,
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Generate `equals`/`hashCode`/`toString` for the class.
    #[serde(default)]
    pub class_methods: bool,
    /// Wrapper type used around response payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_wrapper: Option<String>,
    #[serde(default)]
    pub enable_field_projection: bool,
    #[serde(default)]
    pub include_hateoas_links: bool,
}

impl DataObject {
    pub fn new(name: impl Into<String>, dto_type: DtoType, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            dto_type,
            fields,
            class_methods: false,
            response_wrapper: None,
            enable_field_projection: false,
            include_hateoas_links: false,
        }
    }
}

/// One source-to-target row of a mapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldMapping {
    pub source_field: String,
    pub target_field: String,
}

/// A named field-to-field mapping between two models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MapperDefinition {
    pub name: String,
    pub from_model: String,
    pub to_model: String,
    #[serde(default)]
    pub mappings: Vec<FieldMapping>,
}

/// Package coordinates of the generated project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Entities and relations produced by an import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ImportedSchema {
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

/// The working project model an editing session operates on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<ProjectSettings>,
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub relations: Vec<Relation>,
    #[serde(default)]
    pub data_objects: Vec<DataObject>,
    #[serde(default)]
    pub mappers: Vec<MapperDefinition>,
}

impl ProjectModel {
    pub fn from_json_str(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Replace entities and relations wholesale with an import result.
    pub fn replace_imported(&mut self, imported: ImportedSchema) {
        self.entities = imported.entities;
        self.relations = imported.relations;
    }

    /// Merge an import result: same-named entities are replaced in place,
    /// new entities and relations are appended.
    pub fn merge_imported(&mut self, imported: ImportedSchema) {
        for entity in imported.entities {
            match self
                .entities
                .iter_mut()
                .find(|existing| existing.name.eq_ignore_ascii_case(&entity.name))
            {
                Some(existing) => *existing = entity,
                None => self.entities.push(entity),
            }
        }

        for relation in imported.relations {
            if !self.relations.contains(&relation) {
                self.relations.push(relation);
            }
        }
    }

    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|entity| entity.name.eq_ignore_ascii_case(name))
    }

    pub fn data_object(&self, name: &str) -> Option<&DataObject> {
        self.data_objects
            .iter()
            .find(|dto| dto.name.eq_ignore_ascii_case(name))
    }

    /// Fields of a mapper endpoint, resolving data objects before entities.
    pub fn model_fields(&self, name: &str) -> Option<&[Field]> {
        self.data_object(name)
            .map(|dto| dto.fields.as_slice())
            .or_else(|| self.entity(name).map(|entity| entity.fields.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn imported(names: &[&str]) -> ImportedSchema {
        ImportedSchema {
            entities: names
                .iter()
                .map(|name| Entity::new(*name, vec![Field::synthetic_id()]))
                .collect(),
            relations: Vec::new(),
        }
    }

    #[test]
    fn relation_type_canonicalizes_known_tags() {
        assert_eq!(RelationType::parse("one-to-many"), RelationType::OneToMany);
        assert_eq!(RelationType::parse("MANY_TO_ONE"), RelationType::ManyToOne);
        assert_eq!(
            RelationType::parse("EmbeddedRef"),
            RelationType::Other("EmbeddedRef".to_string())
        );
    }

    #[test]
    fn relation_type_serializes_as_plain_string() {
        let json = serde_json::to_string(&RelationType::ManyToMany).unwrap();
        assert_eq!(json, "\"ManyToMany\"");
        let custom: RelationType = serde_json::from_str("\"EmbeddedRef\"").unwrap();
        assert_eq!(custom.as_str(), "EmbeddedRef");
    }

    #[test]
    fn field_deserializes_canonical_shape() {
        let field: Field =
            serde_json::from_str(r#"{"name":"id","type":"Long","primaryKey":true}"#).unwrap();
        assert_eq!(field.field_type, "Long");
        assert!(field.primary_key);
        assert!(!field.required);
        assert!(field.constraints.is_empty());
    }

    #[test]
    fn replace_drops_previous_entities() {
        let mut model = ProjectModel::default();
        model.replace_imported(imported(&["Customer"]));
        model.replace_imported(imported(&["Order"]));
        assert_eq!(model.entities.len(), 1);
        assert_eq!(model.entities[0].name, "Order");
    }

    #[test]
    fn merge_replaces_same_named_entities_and_keeps_others() {
        let mut model = ProjectModel::default();
        model.replace_imported(imported(&["Customer", "Order"]));

        let mut update = imported(&["customer", "Invoice"]);
        update.entities[0].auditable = true;
        model.merge_imported(update);

        let names: Vec<&str> = model.entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["customer", "Order", "Invoice"]);
        assert!(model.entities[0].auditable);
    }

    #[test]
    fn model_fields_prefers_data_objects() {
        let mut model = ProjectModel::default();
        model.entities.push(Entity::new("User", vec![Field::synthetic_id()]));
        model.data_objects.push(DataObject::new(
            "user",
            DtoType::Response,
            vec![Field::new("email", "String")],
        ));

        let fields = model.model_fields("User").unwrap();
        assert_eq!(fields[0].name, "email");
    }

    #[test]
    fn project_json_defaults_missing_collections() {
        let model = ProjectModel::from_json_str(r#"{ "entities": [] }"#).unwrap();
        assert!(model.settings.is_none());
        assert!(model.mappers.is_empty());

        assert!(ProjectModel::from_json_str("{ not json").is_err());
    }
}
