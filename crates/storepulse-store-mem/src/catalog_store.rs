//! CatalogStore trait implementation over in-process vectors

use std::cmp::Ordering;
use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use storepulse_core::{
    Result,
    catalog::{CatalogQuery, Category, Product, ProductPage, SortDirection, SortKey, SortSpec},
    store::CatalogStore,
};

/// Volatile product catalog for development and tests
#[derive(Default)]
pub struct MemCatalogStore {
    products: RwLock<Vec<Product>>,
    categories: RwLock<Vec<Category>>,
}

impl MemCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace one product by id
    pub async fn upsert_product(&self, product: &Product) -> Result<()> {
        let mut products = self.products.write().await;
        match products.iter_mut().find(|existing| existing.id == product.id) {
            Some(existing) => *existing = product.clone(),
            None => products.push(product.clone()),
        }
        Ok(())
    }

    /// Insert or replace one category by id
    pub async fn upsert_category(&self, category: &Category) -> Result<()> {
        let mut categories = self.categories.write().await;
        match categories.iter_mut().find(|existing| existing.id == category.id) {
            Some(existing) => *existing = category.clone(),
            None => categories.push(category.clone()),
        }
        Ok(())
    }
}

fn compare(sort: &SortSpec, a: &Product, b: &Product) -> Ordering {
    for (key, direction) in &sort.fields {
        let ordering = match key {
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            SortKey::Name => a.name.cmp(&b.name),
            SortKey::Price => a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal),
            SortKey::Brand => a.brand.cmp(&b.brand),
            SortKey::ModelNumber => a.model_number.cmp(&b.model_number),
        };
        let ordering = match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

#[async_trait]
impl CatalogStore for MemCatalogStore {
    async fn search_products(&self, query: &CatalogQuery) -> Result<ProductPage> {
        let products = self.products.read().await;

        let mut matched: Vec<&Product> = products
            .iter()
            .filter(|product| query.filter.matches(product))
            .collect();
        matched.sort_by(|a, b| compare(&query.sort, a, b));

        let total = matched.len() as u64;
        let items: Vec<Product> = matched
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit as usize)
            .cloned()
            .collect();

        Ok(ProductPage::new(items, total, query.page, query.limit))
    }

    async fn products_by_ids(&self, ids: &[String]) -> Result<Vec<Product>> {
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let products = self.products.read().await;

        Ok(products
            .iter()
            .filter(|product| wanted.contains(product.id.as_str()))
            .cloned()
            .collect())
    }

    async fn resolve_category_slug(&self, id: &str) -> Result<Option<String>> {
        let categories = self.categories.read().await;
        Ok(categories
            .iter()
            .find(|category| category.id == id)
            .map(|category| category.slug.clone()))
    }
}
