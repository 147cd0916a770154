//! Catalog read model: products, query parameters, filters, sorting

use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Catalog product as served to the storefront
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub slug: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub brand: String,

    #[serde(default)]
    pub model_number: String,

    #[serde(default)]
    pub category_slug: String,

    #[serde(default)]
    pub is_featured: bool,

    #[serde(default)]
    pub price: f64,

    /// Free-form technical attributes; both keys and values are searchable
    #[serde(default)]
    pub specifications: BTreeMap<String, String>,

    pub created_at: DateTime<Utc>,
}

/// Category record, used only to resolve 24-hex ids to slugs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub slug: String,
}

/// Free-text search constraint.
///
/// Carries the normalized term (the popularity-ranking key), the escaped
/// pattern for case-insensitive substring matching, and an exact-id
/// alternative when the raw input has object-id shape.
#[derive(Debug)]
pub struct SearchTerm {
    /// The trimmed search text itself; substring matching is against this
    pub literal: String,

    /// Normalized form: trimmed, whitespace-collapsed, lowercased
    pub normalized: String,

    /// Regex-escaped form of `literal`; safe to embed in a case-insensitive
    /// matcher
    pub pattern: String,

    /// Exact id alternative for 24-hex-character inputs
    pub id_match: Option<String>,

    /// Compiled matcher (lazily initialized, one compile per query)
    compiled: OnceCell<Option<Regex>>,
}

impl SearchTerm {
    pub fn new(
        literal: String,
        normalized: String,
        pattern: String,
        id_match: Option<String>,
    ) -> Self {
        Self {
            literal,
            normalized,
            pattern,
            id_match,
            compiled: OnceCell::new(),
        }
    }

    /// True when the escaped pattern occurs in `text`, ignoring case
    pub fn matches_text(&self, text: &str) -> bool {
        let regex_opt = self.compiled.get_or_init(|| {
            match Regex::new(&format!("(?i){}", self.pattern)) {
                Ok(regex) => Some(regex),
                Err(e) => {
                    tracing::warn!("Invalid search pattern '{}': {}", self.pattern, e);
                    None
                }
            }
        });

        regex_opt.as_ref().is_some_and(|regex| regex.is_match(text))
    }
}

// A clone starts with an empty cell and recompiles on first use
impl Clone for SearchTerm {
    fn clone(&self) -> Self {
        Self {
            literal: self.literal.clone(),
            normalized: self.normalized.clone(),
            pattern: self.pattern.clone(),
            id_match: self.id_match.clone(),
            compiled: OnceCell::new(),
        }
    }
}

impl PartialEq for SearchTerm {
    fn eq(&self, other: &Self) -> bool {
        self.literal == other.literal
            && self.normalized == other.normalized
            && self.pattern == other.pattern
            && self.id_match == other.id_match
    }
}

/// Filter over the product catalog.
///
/// The search term, when present, is satisfied by a substring hit on any of
/// name, slug, description, brand, model number, category slug, or a
/// specification key or value, or by an exact id match. Category slug, model
/// number, and the featured flag are conjunctive constraints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogFilter {
    pub search: Option<SearchTerm>,
    pub category_slug: Option<String>,
    pub model_number: Option<String>,
    pub featured_only: bool,
}

impl CatalogFilter {
    /// Evaluate the filter against one product
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(term) = &self.search {
            let id_hit = term.id_match.as_deref() == Some(product.id.as_str());
            let text_hit = term.matches_text(&product.name)
                || term.matches_text(&product.slug)
                || term.matches_text(&product.description)
                || term.matches_text(&product.brand)
                || term.matches_text(&product.model_number)
                || term.matches_text(&product.category_slug)
                || product
                    .specifications
                    .iter()
                    .any(|(key, value)| term.matches_text(key) || term.matches_text(value));

            if !id_hit && !text_hit {
                return false;
            }
        }

        if let Some(slug) = &self.category_slug
            && product.category_slug != *slug
        {
            return false;
        }

        if let Some(model) = &self.model_number
            && product.model_number != *model
        {
            return false;
        }

        if self.featured_only && !product.is_featured {
            return false;
        }

        true
    }
}

/// Recognized catalog sort keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    CreatedAt,
    Name,
    Price,
    Brand,
    ModelNumber,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Parsed sort expression: ordered (key, direction) pairs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub fields: Vec<(SortKey, SortDirection)>,
}

impl SortSpec {
    /// Newest-first default, the `-createdAt` fallback order
    pub fn newest_first() -> Self {
        Self {
            fields: vec![(SortKey::CreatedAt, SortDirection::Descending)],
        }
    }

    /// Parse an already-validated sort expression.
    ///
    /// Terms are whitespace-separated field names, descending when prefixed
    /// with `-`. Unrecognized terms are dropped; an expression with no
    /// recognized term falls back to newest-first.
    pub fn parse(expr: &str) -> Self {
        let mut fields = Vec::new();

        for term in expr.split_whitespace() {
            let (name, direction) = match term.strip_prefix('-') {
                Some(rest) => (rest, SortDirection::Descending),
                None => (term, SortDirection::Ascending),
            };

            let key = match name {
                "createdAt" => SortKey::CreatedAt,
                "name" => SortKey::Name,
                "price" => SortKey::Price,
                "brand" => SortKey::Brand,
                "modelNumber" => SortKey::ModelNumber,
                _ => continue,
            };

            fields.push((key, direction));
        }

        if fields.is_empty() {
            return Self::newest_first();
        }

        Self { fields }
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::newest_first()
    }
}

/// Bounded, sanitized catalog query as consumed by store implementations
#[derive(Debug, Clone)]
pub struct CatalogQuery {
    pub filter: CatalogFilter,
    pub sort: SortSpec,

    /// 1-indexed page
    pub page: u32,

    /// Results per page
    pub limit: u32,
}

impl CatalogQuery {
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            filter: CatalogFilter::default(),
            sort: SortSpec::default(),
            page: 1,
            limit: 10,
        }
    }
}

/// One page of catalog results with pagination totals
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub total: u64,
    pub page: u32,
    pub pages: u64,
}

impl ProductPage {
    pub fn new(items: Vec<Product>, total: u64, page: u32, limit: u32) -> Self {
        let pages = if limit > 0 {
            total.div_ceil(u64::from(limit))
        } else {
            0
        };

        Self {
            items,
            total,
            page,
            pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, name: &str) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            slug: name.to_lowercase().replace(' ', "-"),
            description: String::new(),
            brand: String::new(),
            model_number: String::new(),
            category_slug: String::new(),
            is_featured: false,
            price: 0.0,
            specifications: BTreeMap::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_search_term_case_insensitive() {
        let term = SearchTerm::new(
            "plc".to_string(),
            "plc".to_string(),
            "plc".to_string(),
            None,
        );
        assert!(term.matches_text("Siemens PLC controller"));
        assert!(term.matches_text("plc"));
        assert!(!term.matches_text("inverter"));
    }

    #[test]
    fn test_filter_matches_specifications() {
        let mut item = product("p1", "Compact Controller");
        item.specifications
            .insert("Voltage".to_string(), "24 VDC".to_string());

        let by_key = CatalogFilter {
            search: Some(SearchTerm::new(
                "Voltage".to_string(),
                "voltage".to_string(),
                "Voltage".to_string(),
                None,
            )),
            ..Default::default()
        };
        assert!(by_key.matches(&item));

        let by_value = CatalogFilter {
            search: Some(SearchTerm::new(
                "24 VDC".to_string(),
                "24 vdc".to_string(),
                "24 VDC".to_string(),
                None,
            )),
            ..Default::default()
        };
        assert!(by_value.matches(&item));
    }

    #[test]
    fn test_filter_matches_exact_id() {
        let item = product("665f1f77bcf86cd799439011", "Drive Unit");

        let filter = CatalogFilter {
            search: Some(SearchTerm::new(
                "665f1f77bcf86cd799439011".to_string(),
                "665f1f77bcf86cd799439011".to_string(),
                "665f1f77bcf86cd799439011".to_string(),
                Some("665f1f77bcf86cd799439011".to_string()),
            )),
            ..Default::default()
        };

        assert!(filter.matches(&item));
    }

    #[test]
    fn test_filter_conjunctive_constraints() {
        let mut item = product("p1", "Panel HMI");
        item.category_slug = "hmi".to_string();
        item.is_featured = false;

        let wrong_category = CatalogFilter {
            category_slug: Some("drives".to_string()),
            ..Default::default()
        };
        assert!(!wrong_category.matches(&item));

        let featured_only = CatalogFilter {
            featured_only: true,
            ..Default::default()
        };
        assert!(!featured_only.matches(&item));

        item.is_featured = true;
        assert!(featured_only.matches(&item));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = CatalogFilter::default();
        assert!(filter.matches(&product("p1", "Anything")));
    }

    #[test]
    fn test_sort_spec_parse() {
        let spec = SortSpec::parse("-name");
        assert_eq!(
            spec.fields,
            vec![(SortKey::Name, SortDirection::Descending)]
        );

        let spec = SortSpec::parse("price -createdAt");
        assert_eq!(
            spec.fields,
            vec![
                (SortKey::Price, SortDirection::Ascending),
                (SortKey::CreatedAt, SortDirection::Descending),
            ]
        );

        // No recognized key falls back to newest-first
        let spec = SortSpec::parse("unknownField");
        assert_eq!(spec, SortSpec::newest_first());
    }

    #[test]
    fn test_product_page_pagination() {
        let page = ProductPage::new(Vec::new(), 25, 1, 10);
        assert_eq!(page.pages, 3);

        let page = ProductPage::new(Vec::new(), 30, 2, 10);
        assert_eq!(page.pages, 3);

        // Empty results report zero pages
        let page = ProductPage::new(Vec::new(), 0, 1, 10);
        assert_eq!(page.pages, 0);
    }

    #[test]
    fn test_catalog_query_offset() {
        let query = CatalogQuery {
            page: 3,
            limit: 10,
            ..Default::default()
        };
        assert_eq!(query.offset(), 20);

        let query = CatalogQuery::default();
        assert_eq!(query.offset(), 0);
    }
}
