//! Runs against a live MySQL server named by `DATABASE_URL`.
//! `cargo test -- --ignored` to include them.

use eloquent_forge::db::mysql::MySqlClient;
use eloquent_forge::db::{resolve_table, DbClient};
use eloquent_forge::models::connections::ConnectionConfig;
use eloquent_forge::models::schema::KeyKind;
use sqlx::Executor;
use std::env;

async fn setup_test_db() -> MySqlClient {
    dotenv::dotenv().ok();
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let client = MySqlClient::connect(&ConnectionConfig::new(database_url))
        .await
        .expect("Failed to connect to the database");

    client
        .pool
        .execute("DROP TABLE IF EXISTS forge_users")
        .await
        .unwrap();
    client
        .pool
        .execute(
            r#"
            CREATE TABLE forge_users (
                id INT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
                name VARCHAR(100) NOT NULL COMMENT 'Full name',
                email VARCHAR(191) NOT NULL UNIQUE,
                status ENUM('active','banned') NOT NULL DEFAULT 'active',
                deleted_at TIMESTAMP NULL
            )
            "#,
        )
        .await
        .unwrap();

    client
}

#[tokio::test]
#[ignore]
async fn test_list_tables() {
    let client = setup_test_db().await;

    let tables = client.list_tables().await.unwrap();
    assert!(tables.contains(&"forge_users".to_string()));
}

#[tokio::test]
#[ignore]
async fn test_describe_columns() {
    let client = setup_test_db().await;

    let rows = client.describe_columns("forge_users").await.unwrap();
    let names: Vec<&str> = rows.iter().map(|row| row.column_name.as_str()).collect();
    assert_eq!(names, vec!["id", "name", "email", "status", "deleted_at"]);
    assert_eq!(rows[1].character_maximum_length, Some(100));
    assert_eq!(rows[1].column_comment, "Full name");
    assert_eq!(rows[3].column_default.as_deref(), Some("active"));
}

#[tokio::test]
#[ignore]
async fn test_resolve_table_with_prefix() {
    let client = setup_test_db().await;

    let table = resolve_table(&client, "User", "forge_").await.unwrap();
    assert_eq!(table.table_name, "forge_users");
    assert_eq!(table.bare_name(), "users");
    assert_eq!(table.column("email").map(|c| c.key), Some(KeyKind::Unique));
    assert!(table.column("id").unwrap().is_generated_key());
    assert!(table.uses_soft_deletes());
}

#[tokio::test]
#[ignore]
async fn test_unknown_table_has_no_columns() {
    let client = setup_test_db().await;

    let rows = client.describe_columns("forge_missing").await.unwrap();
    assert!(rows.is_empty());
}
