//! # Menu Commands
//!
//! Menu browsing for the selected cafe.
//!
//! ## User Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  [ Ara...                    ]   ◄── query (name or description)        │
//! │  (Kahve) (Sıcak) (Soğuk) (Tatlı) ◄── category chip                      │
//! │                                                                         │
//! │  Öne Çıkanlar   Caffè Latte · San Sebastian · ...                       │
//! │  Kahve          Caffè Latte  ₺85,00                                     │
//! │                 Flat White   ₺90,00                                     │
//! │  Tatlı          ...                                                     │
//! │                                                                         │
//! │  list_menu({ query, category }) → { sections, featured, source }       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::debug;

use cafe_client::DataSource;
use cafe_core::catalog::{featured, filter_products, group_by_category};
use cafe_core::validation::validate_search_query;
use cafe_core::{MenuSection, Product, ProductFilter, PromotionalCard};

use crate::error::{ApiError, ApiResult};
use crate::state::{CatalogState, SessionState};

const FEATURED_LIMIT: usize = 4;

/// The menu screen.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuResponse {
    pub cafe_id: String,
    pub sections: Vec<MenuSection>,
    /// Highlighted products, ignoring the filter.
    pub featured: Vec<Product>,
    /// Products matching the filter, over all sections.
    pub match_count: usize,
    pub source: DataSource,
}

/// Lists the selected cafe's menu, filtered and grouped by category.
pub async fn list_menu(
    catalog: &CatalogState,
    session: &SessionState,
    mut filter: ProductFilter,
) -> ApiResult<MenuResponse> {
    let cafe = session.cafe().ok_or_else(ApiError::no_cafe)?;
    filter.query = validate_search_query(&filter.query)?;

    let products = catalog.inner().products(&cafe.id, None).await?;
    let matched = filter_products(&products.data, &filter);
    debug!(cafe_id = %cafe.id, query = %filter.query, matched = matched.len(), "Menu filtered");

    Ok(MenuResponse {
        sections: group_by_category(&matched, &cafe.category_order()),
        featured: featured(&products.data, FEATURED_LIMIT),
        match_count: matched.len(),
        cafe_id: cafe.id,
        source: products.source,
    })
}

pub async fn get_product(catalog: &CatalogState, id: &str) -> ApiResult<Product> {
    Ok(catalog.inner().product(id).await?.data)
}

/// Active promotional cards of the selected cafe.
pub async fn list_promotional_cards(
    catalog: &CatalogState,
    session: &SessionState,
) -> ApiResult<Vec<PromotionalCard>> {
    let cafe_id = session.cafe_id().ok_or_else(ApiError::no_cafe)?;
    let mut cards = catalog.inner().promotional_cards(&cafe_id, false).await?.data;
    cards.sort_by_key(|c| c.sort_order);
    Ok(cards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::cafe::scan_code;
    use crate::error::ErrorCode;
    use crate::test_context;
    use cafe_core::ProductCategory;

    #[tokio::test]
    async fn test_menu_filters_and_groups() {
        let ctx = test_context().await;
        scan_code(&ctx.db, &ctx.catalog, &ctx.session, &ctx.cart, "MODA01")
            .await
            .unwrap();

        let all = list_menu(&ctx.catalog, &ctx.session, ProductFilter::default())
            .await
            .unwrap();
        assert_eq!(all.source, DataSource::Demo);
        assert_eq!(all.sections[0].category, ProductCategory::Coffee);
        assert!(all.featured.len() <= FEATURED_LIMIT);
        let total: usize = all.sections.iter().map(|s| s.products.len()).sum();
        assert_eq!(total, all.match_count);

        let coffee = list_menu(
            &ctx.catalog,
            &ctx.session,
            ProductFilter {
                category: Some(ProductCategory::Coffee),
                ..ProductFilter::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(coffee.sections.len(), 1);

        let search = list_menu(
            &ctx.catalog,
            &ctx.session,
            ProductFilter {
                query: "  LATTE ".to_string(),
                ..ProductFilter::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(search.match_count, 1);
        assert_eq!(search.sections[0].products[0].id, "moda-latte");
    }

    #[tokio::test]
    async fn test_menu_needs_cafe() {
        let ctx = test_context().await;
        let err = list_menu(&ctx.catalog, &ctx.session, ProductFilter::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NoCafeSelected);

        let product = get_product(&ctx.catalog, "moda-latte").await.unwrap();
        assert_eq!(product.price_kurus, 8_500);
    }
}
