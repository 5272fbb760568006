use modelforge_core::project_json_schema;

#[test]
fn project_schema_describes_model_collections() {
    let schema = serde_json::to_value(project_json_schema()).expect("serialize json schema");
    let properties = schema
        .get("properties")
        .and_then(|value| value.as_object())
        .expect("root properties");

    for key in ["entities", "relations", "dataObjects", "mappers", "settings"] {
        assert!(properties.contains_key(key), "missing property {key}");
    }

    let definitions = schema
        .get("definitions")
        .and_then(|value| value.as_object())
        .expect("definitions");
    assert!(definitions.contains_key("Entity"));
    assert!(definitions.contains_key("Field"));
}
