//! Schema setup for the analytics database

use sqlx::sqlite::SqlitePool;

use storepulse_core::Result;

use crate::db_err;

pub(crate) async fn initialize(pool: &SqlitePool) -> Result<()> {
    // Schema version table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(db_err)?;

    sqlx::query("INSERT OR IGNORE INTO schema_version (version) VALUES (1)")
        .execute(pool)
        .await
        .map_err(db_err)?;

    // Event collections. Append-only; rows are never updated or deleted here.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS page_views (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            path TEXT NOT NULL,
            occurred_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(db_err)?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS product_views (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            product_id TEXT NOT NULL,
            occurred_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(db_err)?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS search_queries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            raw_query TEXT NOT NULL,
            normalized_query TEXT NOT NULL,
            total_results INTEGER NOT NULL DEFAULT 0,
            source TEXT NOT NULL DEFAULT '',
            user_id TEXT,
            meta TEXT NOT NULL DEFAULT '{}',
            occurred_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(db_err)?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS interaction_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            event TEXT NOT NULL,
            meta TEXT NOT NULL DEFAULT '{}',
            occurred_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(db_err)?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            login_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(db_err)?;

    // Catalog tables, owned by the storefront CRUD and read by search
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            slug TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            brand TEXT NOT NULL DEFAULT '',
            model_number TEXT NOT NULL DEFAULT '',
            category_slug TEXT NOT NULL DEFAULT '',
            is_featured BOOLEAN NOT NULL DEFAULT 0,
            price REAL NOT NULL DEFAULT 0,
            specifications TEXT NOT NULL DEFAULT '{}',
            created_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(db_err)?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id TEXT PRIMARY KEY,
            slug TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(db_err)?;

    // Indexes for the grouping keys and time windows the engine queries on
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_page_views_path ON page_views(path)")
        .execute(pool)
        .await
        .map_err(db_err)?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_product_views_product ON product_views(product_id)")
        .execute(pool)
        .await
        .map_err(db_err)?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_search_queries_normalized ON search_queries(normalized_query)",
    )
    .execute(pool)
    .await
    .map_err(db_err)?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_interaction_logs_event ON interaction_logs(event)")
        .execute(pool)
        .await
        .map_err(db_err)?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_user_sessions_login ON user_sessions(login_at)")
        .execute(pool)
        .await
        .map_err(db_err)?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_products_created ON products(created_at DESC)")
        .execute(pool)
        .await
        .map_err(db_err)?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_products_category ON products(category_slug, created_at DESC)",
    )
    .execute(pool)
    .await
    .map_err(db_err)?;

    Ok(())
}
