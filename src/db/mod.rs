use crate::{
    errors::GenError,
    models::schema::{ColumnRow, TableDescriptor},
    naming,
};
use async_trait::async_trait;

pub mod mysql;

#[async_trait]
pub trait DbClient: Send + Sync {
    async fn list_tables(&self) -> Result<Vec<String>, GenError>;
    async fn describe_columns(&self, table_name: &str) -> Result<Vec<ColumnRow>, GenError>;
}

/// Physical table names tried for a nominal table or class name, in order.
pub fn candidate_names(name: &str, prefix: &str) -> Vec<String> {
    let snake = naming::snake(name);
    let plural = naming::plural(&snake);

    let mut candidates: Vec<String> = Vec::new();
    for form in [name.to_string(), snake, plural] {
        let mut forms = vec![form.clone()];
        if !prefix.is_empty() {
            forms.push(format!("{}{}", prefix, form));
        }
        for candidate in forms {
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
    }

    candidates
}

/// Resolves `name` to the first candidate table that has at least one column.
///
/// When nothing matches, the returned descriptor has no columns and carries
/// the snake-cased name.
pub async fn resolve_table(
    client: &dyn DbClient,
    name: &str,
    prefix: &str,
) -> Result<TableDescriptor, GenError> {
    for candidate in candidate_names(name, prefix) {
        log::debug!("Looking up columns of `{}`", candidate);
        let rows = client.describe_columns(&candidate).await?;
        if !rows.is_empty() {
            return Ok(TableDescriptor::from_rows(candidate, prefix, rows));
        }
    }

    Ok(TableDescriptor::new(naming::snake(name), prefix))
}

/// Tables whose name looks close to `name`, for "maybe you meant" hints.
pub async fn suggest_tables(
    client: &dyn DbClient,
    name: &str,
) -> Result<Vec<String>, GenError> {
    let needle = naming::snake(name);
    let tables = client.list_tables().await?;

    Ok(tables
        .into_iter()
        .filter(|table| table.contains(&needle) || needle.contains(table.as_str()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::{mock, predicate, Sequence};
    use serde_json::json;

    mock! {
        pub DbClientMock {}

        #[async_trait]
        impl DbClient for DbClientMock {
            async fn list_tables(&self) -> Result<Vec<String>, GenError>;
            async fn describe_columns(&self, table_name: &str) -> Result<Vec<ColumnRow>, GenError>;
        }
    }

    fn id_row(table: &str) -> ColumnRow {
        ColumnRow::from_json(json!({
            "TABLE_NAME": table,
            "COLUMN_NAME": "id",
            "IS_NULLABLE": "NO",
            "DATA_TYPE": "int",
            "COLUMN_TYPE": "int(10) unsigned",
            "COLUMN_KEY": "PRI",
            "EXTRA": "auto_increment"
        }))
        .unwrap()
    }

    #[test]
    fn test_candidate_names_with_prefix() {
        assert_eq!(
            candidate_names("UserProfile", "wp_"),
            vec![
                "UserProfile",
                "wp_UserProfile",
                "user_profile",
                "wp_user_profile",
                "user_profiles",
                "wp_user_profiles",
            ]
        );
    }

    #[test]
    fn test_candidate_names_skip_duplicates() {
        assert_eq!(candidate_names("users", ""), vec!["users"]);
        assert_eq!(candidate_names("user", ""), vec!["user", "users"]);
    }

    #[tokio::test]
    async fn test_resolve_table_tries_candidates_in_order() {
        let mut mock_db = MockDbClientMock::new();
        let mut seq = Sequence::new();

        for empty in ["User", "user"] {
            mock_db
                .expect_describe_columns()
                .with(predicate::eq(empty))
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(Vec::new()));
        }
        mock_db
            .expect_describe_columns()
            .with(predicate::eq("users"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|table| Ok(vec![id_row(table)]));

        let table = resolve_table(&mock_db, "User", "").await.unwrap();
        assert_eq!(table.table_name, "users");
        assert_eq!(table.columns.len(), 1);
    }

    #[tokio::test]
    async fn test_resolve_table_prefers_prefixed_before_snake() {
        let mut mock_db = MockDbClientMock::new();

        mock_db
            .expect_describe_columns()
            .with(predicate::eq("posts"))
            .returning(|_| Ok(Vec::new()));
        mock_db
            .expect_describe_columns()
            .with(predicate::eq("wp_posts"))
            .returning(|table| Ok(vec![id_row(table)]));

        let table = resolve_table(&mock_db, "posts", "wp_").await.unwrap();
        assert_eq!(table.table_name, "wp_posts");
        assert_eq!(table.bare_name(), "posts");
    }

    #[tokio::test]
    async fn test_resolve_table_not_found_is_empty() {
        let mut mock_db = MockDbClientMock::new();

        mock_db
            .expect_describe_columns()
            .returning(|_| Ok(Vec::new()));

        let table = resolve_table(&mock_db, "Ghost", "").await.unwrap();
        assert!(table.is_empty());
        assert_eq!(table.table_name, "ghost");
    }

    #[tokio::test]
    async fn test_suggest_tables() {
        let mut mock_db = MockDbClientMock::new();

        mock_db.expect_list_tables().returning(|| {
            Ok(vec![
                "users".to_string(),
                "user_roles".to_string(),
                "orders".to_string(),
            ])
        });

        let tables = suggest_tables(&mock_db, "User").await.unwrap();
        assert_eq!(tables, vec!["users".to_string(), "user_roles".to_string()]);
    }
}
