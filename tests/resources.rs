mod common;

use common::{attrs, client};
use serde_json::json;
use snowflake_provider::resources::{DatabaseResource, ExternalTableResource, SchemaResource};
use snowflake_provider::{ProviderError, Resource, ResourceData};

fn database_row(name: &str, comment: &str, retention: i64) -> serde_json::Value {
    json!({
        "created_on": "2024-01-02T03:04:05Z",
        "name": name,
        "owner": "SYSADMIN",
        "comment": comment,
        "options": "",
        "retention_time": retention
    })
}

fn schema_row(name: &str, retention: i64) -> serde_json::Value {
    json!({
        "name": name,
        "database_name": "DB",
        "owner": "SYSADMIN",
        "comment": "",
        "options": "",
        "retention_time": retention
    })
}

fn external_table_row() -> serde_json::Value {
    json!({
        "name": "ET",
        "database_name": "DB",
        "schema_name": "SC",
        "owner": "SYSADMIN"
    })
}

#[tokio::test]
async fn database_create_sets_id_and_computed_attributes() {
    let (exec, client) = client();
    exec.respond("SHOW DATABASES", vec![database_row("DB", "c", 1)]);

    let mut data = ResourceData::new(attrs(json!({ "name": "DB", "comment": "c" })));
    DatabaseResource.create(&client, &mut data).await.unwrap();

    assert_eq!(data.id(), "DB");
    assert_eq!(data.get_str("owner"), Some("SYSADMIN"));
    assert_eq!(data.get_str("comment"), Some("c"));
    assert_eq!(data.get("is_transient"), Some(&json!(false)));
    assert_eq!(exec.writes(), vec!["CREATE DATABASE \"DB\" COMMENT = 'c'".to_string()]);
}

#[tokio::test]
async fn database_read_of_missing_object_clears_id() {
    let (_exec, client) = client();
    let mut data = ResourceData::existing("GONE", attrs(json!({ "name": "GONE" })));
    DatabaseResource.read(&client, &mut data).await.unwrap();
    assert!(data.is_gone());
}

#[tokio::test]
async fn database_update_renames_then_sets_and_unsets() {
    let (exec, client) = client();
    exec.respond("SHOW DATABASES", vec![database_row("DB2", "", 3)]);

    let mut data = ResourceData::planned(
        "DB",
        attrs(json!({ "name": "DB", "comment": "a", "data_retention_time_in_days": -1 })),
        attrs(json!({ "name": "DB2", "comment": "", "data_retention_time_in_days": 3 })),
    );
    DatabaseResource.update(&client, &mut data).await.unwrap();

    assert_eq!(data.id(), "DB2");
    assert_eq!(data.get_i64("data_retention_time_in_days"), Some(3));
    assert_eq!(
        exec.writes(),
        vec![
            "ALTER DATABASE \"DB\" RENAME TO \"DB2\"".to_string(),
            "ALTER DATABASE \"DB2\" SET DATA_RETENTION_TIME_IN_DAYS = 3".to_string(),
            "ALTER DATABASE \"DB2\" UNSET COMMENT".to_string(),
        ]
    );
}

#[tokio::test]
async fn database_update_from_created_state() {
    let (exec, client) = client();
    exec.respond("SHOW DATABASES", vec![database_row("DB", "c", 1)]);
    let mut data = ResourceData::new(attrs(json!({ "name": "DB", "comment": "c" })));
    DatabaseResource.create(&client, &mut data).await.unwrap();
    let state = data.into_state();

    let mut unchanged = ResourceData::planned(&state.id, state.attributes.clone(), attrs(json!({ "name": "DB", "comment": "c" })));
    DatabaseResource.update(&client, &mut unchanged).await.unwrap();
    assert_eq!(exec.writes().len(), 1);

    exec.respond("SHOW DATABASES", vec![database_row("DB", "d", 1)]);
    let mut data = ResourceData::planned(&state.id, state.attributes, attrs(json!({ "name": "DB", "comment": "d" })));
    DatabaseResource.update(&client, &mut data).await.unwrap();
    assert_eq!(data.get_str("comment"), Some("d"));
    assert_eq!(
        exec.writes(),
        vec![
            "CREATE DATABASE \"DB\" COMMENT = 'c'".to_string(),
            "ALTER DATABASE \"DB\" SET COMMENT = 'd'".to_string(),
        ]
    );
}

#[tokio::test]
async fn force_new_changes_are_rejected_without_statements() {
    let (exec, client) = client();
    let mut data = ResourceData::planned(
        "DB",
        attrs(json!({ "name": "DB", "is_transient": false })),
        attrs(json!({ "name": "DB", "is_transient": true })),
    );
    let err = DatabaseResource.update(&client, &mut data).await.unwrap_err();
    assert!(matches!(err, ProviderError::Resource(_)));
    assert!(exec.statements().is_empty());
}

#[tokio::test]
async fn schema_create_renders_tags_and_managed_access() {
    let (exec, client) = client();
    exec.respond("SHOW SCHEMAS", vec![schema_row("SC", 1)]);
    exec.respond("SHOW DATABASES", vec![database_row("DB", "", 1)]);

    let mut data = ResourceData::new(attrs(json!({
        "name": "SC",
        "database": "DB",
        "is_managed": true,
        "tag": [{ "name": "COST", "value": "eng", "database": "GOV", "schema": "TAGS" }]
    })));
    SchemaResource.create(&client, &mut data).await.unwrap();

    assert_eq!(data.id(), "DB|SC");
    assert_eq!(data.get_i64("data_retention_days"), Some(-1));
    assert_eq!(
        exec.writes(),
        vec!["CREATE SCHEMA \"DB\".\"SC\" WITH MANAGED ACCESS WITH TAG (\"GOV\".\"TAGS\".\"COST\" = 'eng')".to_string()]
    );
}

#[tokio::test]
async fn schema_update_from_created_state() {
    let (exec, client) = client();
    exec.respond("SHOW SCHEMAS", vec![schema_row("SC", 1)]);
    exec.respond("SHOW DATABASES", vec![database_row("DB", "", 1)]);
    let mut data = ResourceData::new(attrs(json!({ "name": "SC", "database": "DB" })));
    SchemaResource.create(&client, &mut data).await.unwrap();
    let state = data.into_state();
    assert_eq!(state.attributes["is_managed"], json!(false));

    exec.respond("SHOW SCHEMAS", vec![schema_row("SC", 3)]);
    let mut data = ResourceData::planned(
        &state.id,
        state.attributes,
        attrs(json!({ "name": "SC", "database": "DB", "data_retention_days": 3 })),
    );
    SchemaResource.update(&client, &mut data).await.unwrap();
    assert_eq!(data.get_i64("data_retention_days"), Some(3));
    assert_eq!(
        exec.writes(),
        vec![
            "CREATE SCHEMA \"DB\".\"SC\"".to_string(),
            "ALTER SCHEMA \"DB\".\"SC\" SET DATA_RETENTION_TIME_IN_DAYS = 3".to_string(),
        ]
    );
}

#[tokio::test]
async fn schema_inherited_retention_reports_drift() {
    let (exec, client) = client();
    exec.respond("SHOW DATABASES", vec![database_row("DB", "", 1)]);

    exec.respond("SHOW SCHEMAS", vec![schema_row("SC", 1)]);
    let mut data = ResourceData::existing("DB|SC", attrs(json!({ "data_retention_days": -1 })));
    SchemaResource.read(&client, &mut data).await.unwrap();
    assert_eq!(data.get_i64("data_retention_days"), Some(-1));

    exec.respond("SHOW SCHEMAS", vec![schema_row("SC", 5)]);
    let mut data = ResourceData::existing("DB|SC", attrs(json!({ "data_retention_days": -1 })));
    SchemaResource.read(&client, &mut data).await.unwrap();
    assert_eq!(data.get_i64("data_retention_days"), Some(5));
}

#[tokio::test]
async fn schema_tag_update_unsets_removed_then_sets_changed() {
    let (exec, client) = client();
    exec.respond("SHOW SCHEMAS", vec![schema_row("SC", 1)]);
    exec.respond("SHOW DATABASES", vec![database_row("DB", "", 1)]);

    let mut data = ResourceData::planned(
        "DB|SC",
        attrs(json!({
            "name": "SC",
            "database": "DB",
            "tag": [{ "name": "A", "value": "1", "schema": "TAGS" }, { "name": "B", "value": "2", "schema": "TAGS" }]
        })),
        attrs(json!({
            "name": "SC",
            "database": "DB",
            "tag": [{ "name": "B", "value": "3", "schema": "TAGS" }]
        })),
    );
    SchemaResource.update(&client, &mut data).await.unwrap();

    assert_eq!(
        exec.writes(),
        vec![
            "ALTER SCHEMA \"DB\".\"SC\" UNSET TAG \"DB\".\"TAGS\".\"A\"".to_string(),
            "ALTER SCHEMA \"DB\".\"SC\" SET TAG \"DB\".\"TAGS\".\"B\" = '3'".to_string(),
        ]
    );
}

#[tokio::test]
async fn schema_tags_must_name_their_schema() {
    let (exec, client) = client();
    let mut data = ResourceData::new(attrs(json!({
        "name": "SC",
        "database": "DB",
        "tag": [{ "name": "COST", "value": "eng" }]
    })));
    let err = SchemaResource.create(&client, &mut data).await.unwrap_err();
    assert!(matches!(err, ProviderError::Resource(_)));
    assert!(exec.statements().is_empty());

    exec.respond("SHOW SCHEMAS", vec![schema_row("SC", 1)]);
    exec.respond("SHOW DATABASES", vec![database_row("DB", "", 1)]);
    let mut data = ResourceData::new(attrs(json!({
        "name": "SC",
        "database": "DB",
        "tag": [{ "name": "COST", "value": "eng", "schema": "TAGS" }]
    })));
    SchemaResource.create(&client, &mut data).await.unwrap();
    assert_eq!(
        exec.writes(),
        vec!["CREATE SCHEMA \"DB\".\"SC\" WITH TAG (\"DB\".\"TAGS\".\"COST\" = 'eng')".to_string()]
    );
}

#[tokio::test]
async fn external_table_create_applies_defaults() {
    let (exec, client) = client();
    exec.respond("SHOW EXTERNAL TABLES", vec![external_table_row()]);

    let mut data = ResourceData::new(attrs(json!({
        "name": "ET",
        "database": "DB",
        "schema": "SC",
        "column": [{ "name": "ID", "type": "varchar", "as": "value:id::varchar" }],
        "location": "@st",
        "file_format": "TYPE = CSV"
    })));
    ExternalTableResource.create(&client, &mut data).await.unwrap();

    assert_eq!(data.id(), "DB|SC|ET");
    assert_eq!(data.get_str("owner"), Some("SYSADMIN"));
    assert_eq!(
        exec.writes(),
        vec![
            "CREATE EXTERNAL TABLE \"DB\".\"SC\".\"ET\" (\"ID\" VARCHAR AS (value:id::varchar)) \
             WITH LOCATION = @st REFRESH_ON_CREATE = TRUE AUTO_REFRESH = TRUE FILE_FORMAT = (TYPE = CSV)"
                .to_string()
        ]
    );
}

#[tokio::test]
async fn external_table_create_validates_columns_and_format() {
    let (exec, client) = client();
    let base = json!({
        "name": "ET",
        "database": "DB",
        "schema": "SC",
        "location": "@st",
        "file_format": "TYPE = CSV"
    });

    let mut data = ResourceData::new(attrs(base.clone()));
    let err = ExternalTableResource.create(&client, &mut data).await.unwrap_err();
    assert!(matches!(err, ProviderError::Resource(_)));

    let mut bad_type = attrs(base.clone());
    bad_type.insert(
        "column".into(),
        json!([{ "name": "ID", "type": "text2", "as": "value:id" }]),
    );
    let err = ExternalTableResource
        .create(&client, &mut ResourceData::new(bad_type))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Validation(_)));

    let mut bad_format = attrs(base);
    bad_format.insert("column".into(), json!([{ "name": "ID", "type": "varchar", "as": "value:id" }]));
    bad_format.insert("table_format".into(), json!("iceberg"));
    let err = ExternalTableResource
        .create(&client, &mut ResourceData::new(bad_format))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Validation(_)));

    assert!(exec.statements().is_empty());
}

#[tokio::test]
async fn external_table_update_only_reconciles_tags() {
    let (exec, client) = client();
    exec.respond("SHOW EXTERNAL TABLES", vec![external_table_row()]);

    let prior = json!({
        "name": "ET", "database": "DB", "schema": "SC", "location": "@st", "file_format": "TYPE = CSV",
        "column": [{ "name": "ID", "type": "varchar", "as": "value:id" }],
        "tag": [{ "name": "OLD", "value": "x" }]
    });
    let mut desired = attrs(prior.clone());
    desired.insert("tag".into(), json!([{ "name": "NEW", "value": "y" }]));

    let mut data = ResourceData::planned("DB|SC|ET", attrs(prior.clone()), desired);
    ExternalTableResource.update(&client, &mut data).await.unwrap();
    assert_eq!(
        exec.writes(),
        vec![
            "ALTER EXTERNAL TABLE \"DB\".\"SC\".\"ET\" UNSET TAG \"DB\".\"SC\".\"OLD\"".to_string(),
            "ALTER EXTERNAL TABLE \"DB\".\"SC\".\"ET\" SET TAG \"DB\".\"SC\".\"NEW\" = 'y'".to_string(),
        ]
    );

    let mut moved = attrs(prior.clone());
    moved.insert("location".into(), json!("@other"));
    let mut data = ResourceData::planned("DB|SC|ET", attrs(prior), moved);
    let err = ExternalTableResource.update(&client, &mut data).await.unwrap_err();
    assert!(matches!(err, ProviderError::Resource(_)));
}

#[tokio::test]
async fn external_table_update_from_created_state() {
    let (exec, client) = client();
    exec.respond("SHOW EXTERNAL TABLES", vec![external_table_row()]);
    let base = json!({
        "name": "ET", "database": "DB", "schema": "SC", "location": "@st", "file_format": "TYPE = CSV",
        "column": [{ "name": "ID", "type": "varchar", "as": "value:id" }]
    });
    let mut data = ResourceData::new(attrs(base.clone()));
    ExternalTableResource.create(&client, &mut data).await.unwrap();
    let state = data.into_state();

    let mut unchanged = ResourceData::planned(&state.id, state.attributes.clone(), attrs(base.clone()));
    ExternalTableResource.update(&client, &mut unchanged).await.unwrap();
    assert_eq!(exec.writes().len(), 1);

    let mut tagged = attrs(base);
    tagged.insert("tag".into(), json!([{ "name": "T", "value": "v" }]));
    let mut data = ResourceData::planned(&state.id, state.attributes, tagged);
    ExternalTableResource.update(&client, &mut data).await.unwrap();
    assert_eq!(
        exec.writes()[1],
        "ALTER EXTERNAL TABLE \"DB\".\"SC\".\"ET\" SET TAG \"DB\".\"SC\".\"T\" = 'v'"
    );
    assert_eq!(exec.writes().len(), 2);
}

#[tokio::test]
async fn external_table_failed_read_clears_id_and_returns_error() {
    let (exec, client) = client();
    exec.fail("SHOW EXTERNAL TABLES", "object does not exist or not authorized");
    let mut data = ResourceData::existing("DB|SC|ET", attrs(json!({})));
    let err = ExternalTableResource.read(&client, &mut data).await.unwrap_err();
    assert!(matches!(err, ProviderError::Query(_)));
    assert!(data.is_gone());
}

#[tokio::test]
async fn delete_drops_and_clears_id() {
    let (exec, client) = client();
    let mut data = ResourceData::existing("DB|SC|ET", attrs(json!({})));
    ExternalTableResource.delete(&client, &mut data).await.unwrap();
    assert!(data.is_gone());
    assert_eq!(exec.writes(), vec!["DROP EXTERNAL TABLE \"DB\".\"SC\".\"ET\"".to_string()]);

    let mut data = ResourceData::existing("not|a|valid|id", attrs(json!({})));
    let err = SchemaResource.delete(&client, &mut data).await.unwrap_err();
    assert!(matches!(err, ProviderError::InvalidId(_)));
}
