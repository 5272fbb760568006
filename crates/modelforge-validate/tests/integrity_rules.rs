use modelforge_core::{
    Entity, Field, FieldMapping, MapperDefinition, ProjectModel, options_for_field_type,
};
use modelforge_validate::{
    FieldOwner, Namespace, auto_map, validate_entity, validate_field, validate_mapper,
    validate_model_name,
};

fn long(name: &str) -> Field {
    Field::new(name, "Long")
}

fn key(name: &str) -> Field {
    let mut field = long(name);
    field.primary_key = true;
    field.required = true;
    field
}

fn order_invoice_model(invoice_fields: Vec<Field>) -> ProjectModel {
    ProjectModel {
        entities: vec![
            Entity::new("Order", vec![key("id")]),
            Entity::new("Invoice", invoice_fields),
        ],
        ..ProjectModel::default()
    }
}

fn mapper(mappings: Vec<FieldMapping>) -> MapperDefinition {
    MapperDefinition {
        name: "OrderToInvoice".to_string(),
        from_model: "Order".to_string(),
        to_model: "Invoice".to_string(),
        mappings,
    }
}

#[test]
fn differently_named_fields_are_not_auto_mapped() {
    let model = order_invoice_model(vec![key("invoiceId"), long("orderId")]);
    let source = model.model_fields("Order").expect("order fields");
    let target = model.model_fields("Invoice").expect("invoice fields");

    let rows = auto_map(source, target, &[]);
    assert_eq!(rows, vec![FieldMapping {
        source_field: "id".to_string(),
        target_field: String::new(),
    }]);

    let report = validate_mapper(&mapper(rows), &model, None);
    assert!(report.has_code("all_rows_mapped"));
    assert!(report.errors[0].message.contains("id"));
}

#[test]
fn same_named_compatible_fields_are_auto_mapped() {
    let model = order_invoice_model(vec![key("id"), long("orderId")]);
    let source = model.model_fields("Order").expect("order fields");
    let target = model.model_fields("Invoice").expect("invoice fields");

    let rows = auto_map(source, target, &[]);
    assert_eq!(rows[0].target_field, "id");
    assert!(validate_mapper(&mapper(rows), &model, None).is_ok());
}

#[test]
fn mapper_endpoints_and_types_are_checked() {
    let mut model = order_invoice_model(vec![key("id"), Field::new("total", "String")]);
    model.entities[0].fields.push(Field::new("total", "BigDecimal"));

    let mut definition = mapper(vec![
        FieldMapping {
            source_field: "id".to_string(),
            target_field: "id".to_string(),
        },
        FieldMapping {
            source_field: "total".to_string(),
            target_field: "total".to_string(),
        },
    ]);
    let report = validate_mapper(&definition, &model, None);
    assert!(report.has_code("incompatible_types"));
    assert_eq!(report.errors[0].path, "/mappings/1/targetField");

    definition.to_model = "order".to_string();
    assert!(validate_mapper(&definition, &model, None).has_code("same_model"));

    definition.to_model = "Shipment".to_string();
    assert!(validate_mapper(&definition, &model, None).has_code("unknown_model"));
}

#[test]
fn entity_names_reject_keywords_and_duplicates() {
    let report = validate_model_name("class", Namespace::Entity, [], None);
    assert!(report.has_code("reserved_keyword"));
    assert!(report.errors[0].message.contains("class"));

    let model = ProjectModel {
        entities: vec![Entity::new("Customer", vec![key("id")])],
        ..ProjectModel::default()
    };
    let second = Entity::new("customer", vec![key("id")]);
    assert!(validate_entity(&second, &model, None).has_code("duplicate_name"));

    let unchanged = Entity::new("Customer", vec![key("id"), Field::new("email", "String")]);
    assert!(validate_entity(&unchanged, &model, Some("Customer")).is_ok());
}

#[test]
fn entities_allow_a_single_primary_key() {
    let fields = vec![key("id")];
    let report = validate_field(&key("altId"), &fields, None, FieldOwner::Entity);
    assert_eq!(report.error_messages(), vec![(
        "/primaryKey",
        "only one primary key is allowed"
    )]);

    let entity = Entity::new("Ledger", vec![key("id"), key("altId")]);
    let report = validate_entity(&entity, &ProjectModel::default(), None);
    assert_eq!(report.errors[0].path, "/fields/1/primaryKey");
}

#[test]
fn constraint_options_depend_on_type() {
    let string_options = options_for_field_type("String");
    assert!(string_options.contains(&"Size"));

    let long_options = options_for_field_type("Long");
    assert!(!long_options.contains(&"Size"));
    assert!(long_options.contains(&"Min"));
    assert!(long_options.contains(&"Max"));
}
