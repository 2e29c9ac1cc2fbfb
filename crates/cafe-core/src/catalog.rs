//! # Catalog
//!
//! Menu search, category filtering and grouping.
//!
//! Menus are a few dozen products per cafe, so everything here is a
//! linear scan over the product list.
//!
//! ## Menu Screen Data Flow
//! ```text
//! products ──► filter_products(query, category, available_only)
//!                     │
//!                     ├──► group_by_category(cafe.categories) ──► sections
//!                     ├──► featured(limit)                     ──► carousel
//!                     └──► category_counts                     ──► tab badges
//! ```

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{Product, ProductCategory};

/// Menu search criteria. The default matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    /// Substring of name or description, any case. Empty matches all.
    #[serde(default)]
    pub query: String,
    pub category: Option<ProductCategory>,
    #[serde(default)]
    pub available_only: bool,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        if self.available_only && !product.is_available {
            return false;
        }
        if let Some(category) = self.category {
            if product.category != category {
                return false;
            }
        }

        let query = self.query.trim();
        if query.is_empty() {
            return true;
        }
        let query = query.to_lowercase();
        product.name.to_lowercase().contains(&query)
            || product.description.to_lowercase().contains(&query)
    }
}

fn menu_order(a: &Product, b: &Product) -> Ordering {
    a.sort_order
        .cmp(&b.sort_order)
        .then_with(|| a.name.cmp(&b.name))
}

/// Returns matching products sorted by `(sort_order, name)`.
pub fn filter_products(products: &[Product], filter: &ProductFilter) -> Vec<Product> {
    let mut matched: Vec<Product> = products
        .iter()
        .filter(|p| filter.matches(p))
        .cloned()
        .collect();
    matched.sort_by(menu_order);
    matched
}

/// A titled block of the menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MenuSection {
    pub category: ProductCategory,
    pub label: String,
    pub products: Vec<Product>,
}

/// Splits products into menu sections.
///
/// Sections follow `category_order` (the cafe's list). Categories that have
/// products but are missing from the list are appended in default order.
/// Empty sections are left out.
pub fn group_by_category(products: &[Product], category_order: &[ProductCategory]) -> Vec<MenuSection> {
    let mut order: Vec<ProductCategory> = Vec::with_capacity(ProductCategory::ALL.len());
    for category in category_order.iter().copied().chain(ProductCategory::ALL) {
        if !order.contains(&category) {
            order.push(category);
        }
    }

    order
        .into_iter()
        .filter_map(|category| {
            let mut section: Vec<Product> = products
                .iter()
                .filter(|p| p.category == category)
                .cloned()
                .collect();
            if section.is_empty() {
                return None;
            }
            section.sort_by(menu_order);
            Some(MenuSection {
                category,
                label: category.label().to_string(),
                products: section,
            })
        })
        .collect()
}

/// Available products carrying a highlight badge (new, popular, chef's pick).
pub fn featured(products: &[Product], limit: usize) -> Vec<Product> {
    let mut picked: Vec<Product> = products
        .iter()
        .filter(|p| p.is_available && p.badges.iter().any(|b| b.is_highlight()))
        .cloned()
        .collect();
    picked.sort_by(menu_order);
    picked.truncate(limit);
    picked
}

/// Product count of one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category: ProductCategory,
    pub count: usize,
}

/// Number of products per category, non-empty categories only.
pub fn category_counts(products: &[Product]) -> Vec<CategoryCount> {
    ProductCategory::ALL
        .into_iter()
        .map(|category| CategoryCount {
            category,
            count: products.iter().filter(|p| p.category == category).count(),
        })
        .filter(|c| c.count > 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Badge;
    use chrono::Utc;

    fn product(
        name: &str,
        description: &str,
        category: ProductCategory,
        sort_order: i32,
    ) -> Product {
        Product {
            id: name.to_lowercase().replace(' ', "-"),
            cafe_id: "cafe-1".to_string(),
            name: name.to_string(),
            description: description.to_string(),
            price_kurus: 5_000,
            category,
            badges: vec![],
            image_url: None,
            nutrition: None,
            customization: None,
            is_available: true,
            sort_order,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn fixtures() -> Vec<Product> {
        let mut cheesecake = product("Cheesecake", "Frambuaz soslu", ProductCategory::Desserts, 1);
        cheesecake.badges = vec![Badge::Popular];
        let mut cold_brew = product("Cold Brew", "18 saat demlenmiş", ProductCategory::ColdDrinks, 1);
        cold_brew.is_available = false;
        cold_brew.badges = vec![Badge::New];

        vec![
            product("Latte", "Espresso ve sıcak süt", ProductCategory::Coffee, 2),
            product("Americano", "Espresso ve sıcak su", ProductCategory::Coffee, 2),
            product("Espresso", "Tek shot", ProductCategory::Coffee, 1),
            product("Demleme Çay", "İnce belli bardakta", ProductCategory::Tea, 1),
            cheesecake,
            cold_brew,
        ]
    }

    fn names(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_returns_all_sorted() {
        let result = filter_products(&fixtures(), &ProductFilter::default());
        assert_eq!(
            names(&result),
            vec!["Cheesecake", "Cold Brew", "Demleme Çay", "Espresso", "Americano", "Latte"]
        );
    }

    #[test]
    fn test_query_matches_name_or_description_any_case() {
        let filter = ProductFilter {
            query: "ESPRESSO".to_string(),
            ..Default::default()
        };
        let result = filter_products(&fixtures(), &filter);
        assert_eq!(names(&result), vec!["Espresso", "Americano", "Latte"]);

        let filter = ProductFilter {
            query: "süt".to_string(),
            ..Default::default()
        };
        assert_eq!(names(&filter_products(&fixtures(), &filter)), vec!["Latte"]);
    }

    #[test]
    fn test_category_and_availability_filters() {
        let filter = ProductFilter {
            category: Some(ProductCategory::ColdDrinks),
            ..Default::default()
        };
        assert_eq!(names(&filter_products(&fixtures(), &filter)), vec!["Cold Brew"]);

        let filter = ProductFilter {
            category: Some(ProductCategory::ColdDrinks),
            available_only: true,
            ..Default::default()
        };
        assert!(filter_products(&fixtures(), &filter).is_empty());
    }

    #[test]
    fn test_group_by_category_follows_cafe_order() {
        let sections = group_by_category(
            &fixtures(),
            &[ProductCategory::Tea, ProductCategory::Coffee],
        );
        let order: Vec<ProductCategory> = sections.iter().map(|s| s.category).collect();
        assert_eq!(
            order,
            vec![
                ProductCategory::Tea,
                ProductCategory::Coffee,
                ProductCategory::ColdDrinks,
                ProductCategory::Desserts,
            ]
        );
        assert_eq!(names(&sections[1].products), vec!["Espresso", "Americano", "Latte"]);
        assert_eq!(sections[0].label, "Çaylar");
    }

    #[test]
    fn test_featured_skips_unavailable() {
        let picked = featured(&fixtures(), 5);
        assert_eq!(names(&picked), vec!["Cheesecake"]);
        assert!(featured(&fixtures(), 0).is_empty());
    }

    #[test]
    fn test_category_counts() {
        let counts = category_counts(&fixtures());
        assert_eq!(
            counts[0],
            CategoryCount {
                category: ProductCategory::Coffee,
                count: 3
            }
        );
        assert_eq!(counts.iter().map(|c| c.count).sum::<usize>(), 6);
    }
}
