//! # Cafe Commands
//!
//! Picking the cafe everything else runs against.
//!
//! ## User Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Camera / code field                                                    │
//! │        │  "https://cafeorder.app/c/moda-kahve", "MODA01", "DEMO-2"     │
//! │        ▼                                                                │
//! │  scan_code()                                                            │
//! │    1. qr::parse_scan      → ScanTarget (or INVALID_SCAN)               │
//! │    2. catalog.cafes()     → API list, demo list on failure             │
//! │    3. qr::resolve         → Cafe (or NOT_FOUND / CAFE_CLOSED)          │
//! │    4. other cafe than before? → cart reset                             │
//! │    5. selected_cafe saved                                              │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  preload screen                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::info;

use cafe_client::{DataSource, Sourced};
use cafe_core::qr::{parse_scan, resolve};
use cafe_core::Cafe;

use crate::error::ApiResult;
use crate::state::{CartState, CatalogState, DbState, SessionState};

/// Result of a successful scan.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CafeSelection {
    pub cafe: Cafe,
    pub source: DataSource,
    /// True when a non-empty cart of another cafe was thrown away.
    pub cart_cleared: bool,
}

/// Lists the cafes a customer can scan into.
pub async fn list_cafes(catalog: &CatalogState) -> ApiResult<Sourced<Vec<Cafe>>> {
    let cafes = catalog.inner().cafes().await?;
    Ok(cafes.map(|list| list.into_iter().filter(|c| c.is_active).collect()))
}

/// Resolves a scanned or typed code and makes it the current cafe.
///
/// Selecting a different cafe resets the cart; rescanning the same cafe
/// keeps it.
pub async fn scan_code(
    db: &DbState,
    catalog: &CatalogState,
    session: &SessionState,
    cart: &CartState,
    input: &str,
) -> ApiResult<CafeSelection> {
    let target = parse_scan(input)?;
    let cafes = catalog.inner().cafes().await?;
    let cafe = resolve(&target, &cafes.data)?.clone();

    let kv = db.kv();
    let cart_cleared = if cart.cafe_id() != cafe.id {
        let had_items = cart.with_cart(|c| !c.is_empty());
        cart.reset(&cafe.id);
        cart.persist(&kv).await?;
        had_items
    } else {
        false
    };

    session.select_cafe(&kv, cafe.clone()).await?;
    info!(
        cafe_id = %cafe.id,
        scan = %target,
        source = ?cafes.source,
        cart_cleared,
        "Cafe selected"
    );

    Ok(CafeSelection {
        cafe,
        source: cafes.source,
        cart_cleared,
    })
}

pub fn current_cafe(session: &SessionState) -> Option<Cafe> {
    session.cafe()
}

/// Forgets the current cafe and its cart.
pub async fn leave_cafe(db: &DbState, session: &SessionState, cart: &CartState) -> ApiResult<()> {
    let kv = db.kv();
    session.clear_cafe(&kv).await?;
    cart.reset("");
    kv.remove(crate::storage::CART).await?;
    info!("Left cafe");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::test_context;
    use cafe_core::OptionSelection;

    #[tokio::test]
    async fn test_scan_variants_resolve() {
        let ctx = test_context().await;
        let scan = |input: &'static str| {
            scan_code(&ctx.db, &ctx.catalog, &ctx.session, &ctx.cart, input)
        };

        assert_eq!(scan("DEMO-2").await.unwrap().cafe.id, "carsi-lab");
        assert_eq!(scan("moda01").await.unwrap().cafe.id, "moda-kahve");
        assert_eq!(
            scan("https://cafeorder.app/c/kordon-cay").await.unwrap().cafe.id,
            "kordon-cay"
        );
        assert_eq!(current_cafe(&ctx.session).unwrap().id, "kordon-cay");

        let err = scan("DEMO-9").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        let err = scan("  ").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidScan);
    }

    #[tokio::test]
    async fn test_switching_cafe_clears_cart() {
        let ctx = test_context().await;
        scan_code(&ctx.db, &ctx.catalog, &ctx.session, &ctx.cart, "MODA01")
            .await
            .unwrap();
        let latte = ctx.catalog.inner().product("moda-latte").await.unwrap().data;
        ctx.cart
            .with_cart_mut(|c| c.add_item(&latte, 1, &OptionSelection::default()))
            .unwrap();

        // Same cafe again keeps the cart
        let again = scan_code(&ctx.db, &ctx.catalog, &ctx.session, &ctx.cart, "DEMO-1")
            .await
            .unwrap();
        assert!(!again.cart_cleared);
        assert_eq!(ctx.cart.totals().item_count, 1);

        let other = scan_code(&ctx.db, &ctx.catalog, &ctx.session, &ctx.cart, "CARSI02")
            .await
            .unwrap();
        assert!(other.cart_cleared);
        assert_eq!(ctx.cart.cafe_id(), "carsi-lab");
        assert_eq!(ctx.cart.totals().item_count, 0);

        leave_cafe(&ctx.db, &ctx.session, &ctx.cart).await.unwrap();
        assert!(current_cafe(&ctx.session).is_none());
    }
}
