use modelforge_import::{ImportError, parse_ddl};

#[test]
fn parses_basic_table() {
    let entities =
        parse_ddl("CREATE TABLE t (id BIGINT PRIMARY KEY, name VARCHAR(255) NOT NULL);")
            .expect("valid ddl");

    assert_eq!(entities.len(), 1);
    let entity = &entities[0];
    assert_eq!(entity.name, "T");
    assert_eq!(entity.fields.len(), 2);

    let id = &entity.fields[0];
    assert_eq!(id.name, "id");
    assert_eq!(id.field_type, "Long");
    assert!(id.primary_key);

    let name = &entity.fields[1];
    assert_eq!(name.field_type, "String");
    assert_eq!(name.max_length, Some(255));
    assert!(name.required);
    assert!(!name.primary_key);
}

#[test]
fn converts_table_and_column_case() {
    let ddl = "create table user_accounts (
  ACCOUNT_ID int,
  display_name text,
  primary key (account_id)
);";
    let entities = parse_ddl(ddl).expect("valid ddl");

    let entity = &entities[0];
    assert_eq!(entity.name, "UserAccounts");
    let names: Vec<&str> = entity.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["accountId", "displayName"]);
    assert!(entity.fields[0].primary_key);
    assert_eq!(entity.fields[0].field_type, "Integer");
}

#[test]
fn rejects_any_non_create_table_statement() {
    let ddl = "CREATE TABLE a (id INT);\nDROP TABLE b;\nCREATE TABLE c (id INT);";
    let err = parse_ddl(ddl).expect_err("drop must be rejected");
    match err {
        ImportError::UnsupportedStatement(statement) => assert!(statement.starts_with("DROP")),
        other => panic!("unexpected error: {other}"),
    }

    assert!(parse_ddl("ALTER TABLE a ADD COLUMN x INT").is_err());
    assert!(parse_ddl("CREATE VIEW v AS SELECT 1").is_err());
}

#[test]
fn drops_tables_without_columns() {
    let ddl = "CREATE TABLE empty ();
CREATE TABLE only_keys (PRIMARY KEY (x));
CREATE TABLE kept (code CHAR(3));";
    let entities = parse_ddl(ddl).expect("valid ddl");

    assert_eq!(entities.len(), 1);
    assert_eq!(entities[0].name, "Kept");
}

#[test]
fn malformed_table_is_dropped_not_rejected() {
    let entities = parse_ddl("CREATE TABLE broken;\nCREATE TABLE ok (id INT)").expect("valid ddl");
    assert_eq!(entities.len(), 1);
    assert_eq!(entities[0].name, "Ok");
}

#[test]
fn promotes_existing_id_column() {
    let entities = parse_ddl("CREATE TABLE item (label TEXT, id INT)").expect("valid ddl");
    let fields = &entities[0].fields;
    assert_eq!(fields.len(), 2);
    let id = fields.iter().find(|f| f.name == "id").unwrap();
    assert!(id.primary_key);
    assert!(id.required);
    assert_eq!(id.field_type, "Integer");
}

#[test]
fn synthesizes_leading_id_when_no_key() {
    let entities = parse_ddl("CREATE TABLE note (body TEXT NOT NULL)").expect("valid ddl");
    let fields = &entities[0].fields;
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].name, "id");
    assert_eq!(fields[0].field_type, "Long");
    assert!(fields[0].primary_key && fields[0].required);
    assert_eq!(fields[1].name, "body");
}

#[test]
fn nested_commas_and_table_clauses() {
    let ddl = r#"
        -- catalog
        CREATE TABLE IF NOT EXISTS shop.products (
            sku VARCHAR(32) NOT NULL UNIQUE,
            price DECIMAL(10,2),
            released DATE,
            updated_at TIMESTAMP,
            active BOOLEAN,
            CONSTRAINT pk_products PRIMARY KEY (sku),
            UNIQUE (price, released),
            FOREIGN KEY (sku) REFERENCES stock(sku)
        ) ENGINE=InnoDB;
    "#;
    let entities = parse_ddl(ddl).expect("valid ddl");
    let product = &entities[0];
    assert_eq!(product.name, "Products");

    let types: Vec<(&str, &str)> = product
        .fields
        .iter()
        .map(|f| (f.name.as_str(), f.field_type.as_str()))
        .collect();
    assert_eq!(
        types,
        vec![
            ("sku", "String"),
            ("price", "BigDecimal"),
            ("released", "LocalDate"),
            ("updatedAt", "Instant"),
            ("active", "Boolean"),
        ]
    );

    let sku = &product.fields[0];
    assert!(sku.primary_key && sku.required && sku.unique);
    assert_eq!(sku.max_length, Some(32));
    assert_eq!(product.fields[1].max_length, None);
}

#[test]
fn composite_key_keeps_single_primary_key() {
    let ddl = "CREATE TABLE line (order_id BIGINT, line_no INT, PRIMARY KEY (order_id, line_no))";
    let entities = parse_ddl(ddl).expect("valid ddl");
    let keys: Vec<&str> = entities[0]
        .fields
        .iter()
        .filter(|f| f.primary_key)
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(keys, vec!["orderId"]);
}

#[test]
fn comments_only_input_yields_nothing() {
    let entities = parse_ddl("/* nothing here; */\n-- DROP TABLE x;\n").expect("valid ddl");
    assert!(entities.is_empty());
}

#[test]
fn line_comment_marker_in_default_truncates_statement() {
    let entities = parse_ddl("CREATE TABLE tag (code VARCHAR(5) DEFAULT '--', name TEXT NOT NULL)")
        .expect("valid ddl");
    let names: Vec<&str> = entities[0].fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["id", "code"]);
}
