//! CatalogStore trait implementation over SQLite
//!
//! Search matching mirrors the in-memory store: a term is a literal
//! substring hit (case-insensitive) on any text column or specification
//! entry, or an exact id hit. LIKE wildcards in the term are escaped so
//! user input never acts as a pattern.

use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqliteRow};

use storepulse_core::{
    Result,
    catalog::{
        CatalogFilter, CatalogQuery, Category, Product, ProductPage, SortDirection, SortKey,
        SortSpec,
    },
    store::CatalogStore,
};

use crate::db_err;

const PRODUCT_COLUMNS: &str = "id, name, slug, description, brand, model_number, \
     category_slug, is_featured, price, specifications, created_at";

/// Read side of the product catalog backed by the shared analytics pool
#[derive(Clone)]
pub struct SqliteCatalogStore {
    pool: SqlitePool,
}

impl SqliteCatalogStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert or replace one product row.
    ///
    /// The catalog is owned by the storefront CRUD; this is the seam it
    /// syncs through.
    pub async fn upsert_product(&self, product: &Product) -> Result<()> {
        let specifications = serde_json::to_string(&product.specifications)?;

        sqlx::query(
            r#"
            INSERT INTO products
                (id, name, slug, description, brand, model_number,
                 category_slug, is_featured, price, specifications, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                slug = excluded.slug,
                description = excluded.description,
                brand = excluded.brand,
                model_number = excluded.model_number,
                category_slug = excluded.category_slug,
                is_featured = excluded.is_featured,
                price = excluded.price,
                specifications = excluded.specifications,
                created_at = excluded.created_at
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.slug)
        .bind(&product.description)
        .bind(&product.brand)
        .bind(&product.model_number)
        .bind(&product.category_slug)
        .bind(product.is_featured)
        .bind(product.price)
        .bind(specifications)
        .bind(product.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    /// Insert or replace one category row
    pub async fn upsert_category(&self, category: &Category) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO categories (id, slug) VALUES (?, ?)
            ON CONFLICT(id) DO UPDATE SET slug = excluded.slug
            "#,
        )
        .bind(&category.id)
        .bind(&category.slug)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }
}

/// Escape LIKE wildcards so the term only matches itself
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Build the WHERE clause and its bind values for a catalog filter.
///
/// Returns an empty clause for the empty filter, so an unconstrained
/// query scans the whole table.
fn build_where(filter: &CatalogFilter) -> (String, Vec<String>) {
    let mut conditions: Vec<String> = Vec::new();
    let mut binds: Vec<String> = Vec::new();

    if let Some(term) = &filter.search {
        let pattern = format!("%{}%", escape_like(&term.literal));

        let mut alternatives = vec![
            r"name LIKE ? ESCAPE '\'".to_string(),
            r"slug LIKE ? ESCAPE '\'".to_string(),
            r"description LIKE ? ESCAPE '\'".to_string(),
            r"brand LIKE ? ESCAPE '\'".to_string(),
            r"model_number LIKE ? ESCAPE '\'".to_string(),
            r"category_slug LIKE ? ESCAPE '\'".to_string(),
            r"EXISTS (SELECT 1 FROM json_each(products.specifications)
                WHERE json_each.key LIKE ? ESCAPE '\' OR json_each.value LIKE ? ESCAPE '\')"
                .to_string(),
        ];
        for _ in 0..8 {
            binds.push(pattern.clone());
        }

        if let Some(id) = &term.id_match {
            alternatives.push("id = ?".to_string());
            binds.push(id.clone());
        }

        conditions.push(format!("({})", alternatives.join(" OR ")));
    }

    if let Some(slug) = &filter.category_slug {
        conditions.push("category_slug = ?".to_string());
        binds.push(slug.clone());
    }

    if let Some(model) = &filter.model_number {
        conditions.push("model_number = ?".to_string());
        binds.push(model.clone());
    }

    if filter.featured_only {
        conditions.push("is_featured = 1".to_string());
    }

    if conditions.is_empty() {
        (String::new(), binds)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), binds)
    }
}

fn order_clause(sort: &SortSpec) -> String {
    let mut terms: Vec<String> = Vec::new();

    for (key, direction) in &sort.fields {
        let column = match key {
            SortKey::CreatedAt => "created_at",
            SortKey::Name => "name",
            SortKey::Price => "price",
            SortKey::Brand => "brand",
            SortKey::ModelNumber => "model_number",
        };
        let order = match direction {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        };
        terms.push(format!("{} {}", column, order));
    }

    if terms.is_empty() {
        return "ORDER BY created_at DESC".to_string();
    }

    format!("ORDER BY {}", terms.join(", "))
}

fn read_product(row: &SqliteRow) -> Result<Product> {
    let specifications: BTreeMap<String, String> = row
        .try_get::<String, _>("specifications")
        .ok()
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default();

    Ok(Product {
        id: row.try_get("id").map_err(db_err)?,
        name: row.try_get("name").unwrap_or_default(),
        slug: row.try_get("slug").unwrap_or_default(),
        description: row.try_get("description").unwrap_or_default(),
        brand: row.try_get("brand").unwrap_or_default(),
        model_number: row.try_get("model_number").unwrap_or_default(),
        category_slug: row.try_get("category_slug").unwrap_or_default(),
        is_featured: row.try_get("is_featured").unwrap_or(false),
        price: row.try_get("price").unwrap_or(0.0),
        specifications,
        created_at: row.try_get("created_at").map_err(db_err)?,
    })
}

#[async_trait]
impl CatalogStore for SqliteCatalogStore {
    async fn search_products(&self, query: &CatalogQuery) -> Result<ProductPage> {
        let (where_clause, binds) = build_where(&query.filter);

        let count_query = format!("SELECT COUNT(*) FROM products{}", where_clause);
        let mut count_sqlx = sqlx::query_scalar::<_, i64>(&count_query);
        for bind in &binds {
            count_sqlx = count_sqlx.bind(bind);
        }
        let total = count_sqlx.fetch_one(&self.pool).await.map_err(db_err)?;

        let page_query = format!(
            "SELECT {} FROM products{} {} LIMIT ? OFFSET ?",
            PRODUCT_COLUMNS,
            where_clause,
            order_clause(&query.sort)
        );
        let mut page_sqlx = sqlx::query(&page_query);
        for bind in &binds {
            page_sqlx = page_sqlx.bind(bind);
        }
        let rows = page_sqlx
            .bind(i64::from(query.limit))
            .bind(query.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        let items = rows
            .iter()
            .map(read_product)
            .collect::<Result<Vec<_>>>()?;

        Ok(ProductPage::new(
            items,
            total.max(0) as u64,
            query.page,
            query.limit,
        ))
    }

    async fn products_by_ids(&self, ids: &[String]) -> Result<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let query = format!(
            "SELECT {} FROM products WHERE id IN ({})",
            PRODUCT_COLUMNS, placeholders
        );

        let mut sqlx_query = sqlx::query(&query);
        for id in ids {
            sqlx_query = sqlx_query.bind(id);
        }

        let rows = sqlx_query
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.iter().map(read_product).collect()
    }

    async fn resolve_category_slug(&self, id: &str) -> Result<Option<String>> {
        sqlx::query_scalar("SELECT slug FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)
    }
}
