use anyhow::{Context, Result, bail};
use sqlx::MySqlPool;

use crate::config::is_valid_ident;

pub(crate) fn validate_ident(name: &str) -> Result<()> {
    if !is_valid_ident(name) {
        bail!("Invalid identifier: {}", name);
    }
    Ok(())
}

fn select_names_sql(table: &str, column: &str, distinct: bool) -> Result<String> {
    validate_ident(table)?;
    validate_ident(column)?;
    let distinct_sql = if distinct { "DISTINCT " } else { "" };
    Ok(format!(
        "SELECT {distinct}`{col}` FROM `{table}`",
        distinct = distinct_sql,
        col = column,
        table = table
    ))
}

/// Read one name column fully into memory, in the order the server
/// returns it. NULLs are dropped.
pub async fn load_names(
    pool: &MySqlPool,
    table: &str,
    column: &str,
    distinct: bool,
) -> Result<Vec<String>> {
    let sql = select_names_sql(table, column, distinct)?;
    let rows: Vec<Option<String>> = sqlx::query_scalar::<_, Option<String>>(&sql)
        .fetch_all(pool)
        .await
        .with_context(|| format!("Failed to read {}.{}", table, column))?;
    let total = rows.len();
    let names: Vec<String> = rows.into_iter().flatten().collect();
    if names.len() < total {
        log::warn!(
            "{}.{}: skipped {} NULL values",
            table,
            column,
            total - names.len()
        );
    }
    Ok(names)
}

/// DDL for the exact-match table. Binary collation keeps key comparison
/// exact (no case or accent folding by the server).
pub(crate) fn create_exact_table_sql(table: &str) -> Result<String> {
    validate_ident(table)?;
    Ok(format!(
        r#"CREATE TABLE IF NOT EXISTS `{}` (
               name_source VARCHAR(255) NOT NULL,
               name_canonical VARCHAR(255) NOT NULL,
               PRIMARY KEY (name_source, name_canonical)
           ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_bin"#,
        table
    ))
}

pub(crate) fn create_approximate_table_sql(table: &str) -> Result<String> {
    validate_ident(table)?;
    Ok(format!(
        r#"CREATE TABLE IF NOT EXISTS `{}` (
               name_source VARCHAR(255) NOT NULL,
               name_candidate VARCHAR(255) NOT NULL,
               score TINYINT UNSIGNED NOT NULL,
               PRIMARY KEY (name_source, name_candidate)
           ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_bin"#,
        table
    ))
}
