use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{mysql::MySqlPoolOptions, mysql::MySqlRow, Column, MySqlPool, Row};

use crate::{
    errors::GenError,
    models::{connections::ConnectionConfig, schema::ColumnRow},
};

use super::DbClient;

const DESCRIBE_COLUMNS: &str = r#"
    SELECT TABLE_NAME AS TABLE_NAME,
           COLUMN_NAME AS COLUMN_NAME,
           ORDINAL_POSITION AS ORDINAL_POSITION,
           COLUMN_DEFAULT AS COLUMN_DEFAULT,
           IS_NULLABLE AS IS_NULLABLE,
           DATA_TYPE AS DATA_TYPE,
           CHARACTER_MAXIMUM_LENGTH AS CHARACTER_MAXIMUM_LENGTH,
           NUMERIC_PRECISION AS NUMERIC_PRECISION,
           NUMERIC_SCALE AS NUMERIC_SCALE,
           COLUMN_TYPE AS COLUMN_TYPE,
           COLUMN_KEY AS COLUMN_KEY,
           EXTRA AS EXTRA,
           COLUMN_COMMENT AS COLUMN_COMMENT
    FROM information_schema.COLUMNS
    WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
    ORDER BY ORDINAL_POSITION
"#;

const LIST_TABLES: &str = r#"
    SELECT TABLE_NAME AS TABLE_NAME
    FROM information_schema.TABLES
    WHERE TABLE_SCHEMA = ?
    ORDER BY TABLE_NAME
"#;

pub struct MySqlClient {
    pub pool: MySqlPool,
    pub database_name: String,
}

impl MySqlClient {
    pub async fn connect(config: &ConnectionConfig) -> Result<Self, GenError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await
            .map_err(|e| GenError::Connection(e.to_string()))?;

        let database_name: Option<String> = sqlx::query_scalar("SELECT DATABASE()")
            .fetch_one(&pool)
            .await
            .map_err(GenError::Sqlx)?;

        let database_name = database_name.ok_or_else(|| {
            GenError::Config("the database url does not select a database".to_string())
        })?;

        Ok(Self {
            pool,
            database_name,
        })
    }
}

#[async_trait]
impl DbClient for MySqlClient {
    async fn list_tables(&self) -> Result<Vec<String>, GenError> {
        let rows = sqlx::query(LIST_TABLES)
            .bind(&self.database_name)
            .fetch_all(&self.pool)
            .await
            .map_err(GenError::Sqlx)?;

        let tables = rows
            .iter()
            .filter_map(|row| text_value(row, 0))
            .collect();

        Ok(tables)
    }

    async fn describe_columns(&self, table_name: &str) -> Result<Vec<ColumnRow>, GenError> {
        let rows = sqlx::query(DESCRIBE_COLUMNS)
            .bind(&self.database_name)
            .bind(table_name)
            .fetch_all(&self.pool)
            .await
            .map_err(GenError::Sqlx)?;

        rows.iter()
            .map(|row| ColumnRow::from_json(row_to_json(row)))
            .collect()
    }
}

fn row_to_json(row: &MySqlRow) -> Value {
    let json_map: Map<String, Value> = row
        .columns()
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let value = if let Some(text) = text_value(row, i) {
                Value::String(text)
            } else if let Ok(Some(n)) = row.try_get::<Option<u64>, _>(i) {
                Value::from(n)
            } else if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(i) {
                Value::from(n)
            } else {
                Value::Null
            };

            (column.name().to_uppercase(), value)
        })
        .collect();

    Value::Object(json_map)
}

// MySQL 8 reports several information_schema columns as binary strings.
fn text_value(row: &MySqlRow, index: usize) -> Option<String> {
    if let Ok(Some(text)) = row.try_get::<Option<String>, _>(index) {
        return Some(text);
    }
    match row.try_get::<Option<Vec<u8>>, _>(index) {
        Ok(Some(bytes)) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        _ => None,
    }
}
