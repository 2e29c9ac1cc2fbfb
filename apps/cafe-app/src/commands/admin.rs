//! # Admin Commands
//!
//! Catalog management for staff and admin accounts: products, promotional
//! cards, per-cafe app configuration and splash video presets.
//!
//! ## Access
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  not signed in          ──► UNAUTHORIZED                                │
//! │  customer               ──► FORBIDDEN                                   │
//! │  staff / admin          ──► CatalogService write                        │
//! │                               ├── API reachable  → saved on the server  │
//! │                               └── otherwise      → demo catalog only    │
//! │                                                   (source: "demo")     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Writes that land in the demo catalog are lost when the app exits. The
//! `source` field of every response says which one it was.

use tracing::info;

use cafe_client::{DataSource, Sourced};
use cafe_core::{
    AppConfig, CardDraft, Product, ProductDraft, PromotionalCard, VideoPreset, VideoPresetDraft,
};

use crate::error::{ApiError, ApiResult, ErrorCode};
use crate::state::{CatalogState, SessionState};

/// Checks the signed-in role and returns the bearer token to send.
///
/// A device-only account has no token; an empty one is sent, which the
/// server rejects and the demo catalog ignores.
fn require_staff(session: &SessionState) -> ApiResult<String> {
    let auth = session
        .auth()
        .ok_or_else(|| ApiError::unauthorized("Sign in to manage the catalog"))?;
    if !auth.can_manage() {
        return Err(ApiError::new(
            ErrorCode::Forbidden,
            "Only staff accounts can manage the catalog",
        ));
    }
    Ok(auth.token.unwrap_or_default())
}

// =============================================================================
// Products
// =============================================================================

pub async fn create_product(
    catalog: &CatalogState,
    session: &SessionState,
    draft: ProductDraft,
) -> ApiResult<Sourced<Product>> {
    let token = require_staff(session)?;
    let product = catalog.inner().create_product(&token, draft).await?;
    info!(id = %product.data.id, source = ?product.source, "Product created");
    Ok(product)
}

pub async fn update_product(
    catalog: &CatalogState,
    session: &SessionState,
    id: &str,
    draft: ProductDraft,
) -> ApiResult<Sourced<Product>> {
    let token = require_staff(session)?;
    Ok(catalog.inner().update_product(&token, id, draft).await?)
}

pub async fn delete_product(
    catalog: &CatalogState,
    session: &SessionState,
    id: &str,
) -> ApiResult<DataSource> {
    let token = require_staff(session)?;
    let source = catalog.inner().delete_product(&token, id).await?;
    info!(id, ?source, "Product deleted");
    Ok(source)
}

// =============================================================================
// Promotional Cards
// =============================================================================

/// All cards of a cafe, inactive ones included when asked.
pub async fn list_cards(
    catalog: &CatalogState,
    session: &SessionState,
    cafe_id: &str,
    include_inactive: bool,
) -> ApiResult<Sourced<Vec<PromotionalCard>>> {
    require_staff(session)?;
    let mut cards = catalog.inner().promotional_cards(cafe_id, include_inactive).await?;
    cards.data.sort_by_key(|c| c.sort_order);
    Ok(cards)
}

pub async fn create_card(
    catalog: &CatalogState,
    session: &SessionState,
    draft: CardDraft,
) -> ApiResult<Sourced<PromotionalCard>> {
    let token = require_staff(session)?;
    Ok(catalog.inner().create_card(&token, draft).await?)
}

pub async fn update_card(
    catalog: &CatalogState,
    session: &SessionState,
    id: &str,
    draft: CardDraft,
) -> ApiResult<Sourced<PromotionalCard>> {
    let token = require_staff(session)?;
    Ok(catalog.inner().update_card(&token, id, draft).await?)
}

pub async fn delete_card(
    catalog: &CatalogState,
    session: &SessionState,
    id: &str,
) -> ApiResult<DataSource> {
    let token = require_staff(session)?;
    Ok(catalog.inner().delete_card(&token, id).await?)
}

// =============================================================================
// App Config
// =============================================================================

/// A cafe's config; a cafe that never saved one gets the defaults.
pub async fn get_app_config(catalog: &CatalogState, cafe_id: &str) -> ApiResult<Sourced<AppConfig>> {
    Ok(catalog.inner().app_config(cafe_id).await?)
}

pub async fn save_app_config(
    catalog: &CatalogState,
    session: &SessionState,
    config: AppConfig,
) -> ApiResult<Sourced<AppConfig>> {
    let token = require_staff(session)?;
    let saved = catalog.inner().save_app_config(&token, config).await?;
    info!(cafe_id = %saved.data.cafe_id, source = ?saved.source, "App config saved");
    Ok(saved)
}

// =============================================================================
// Video Presets
// =============================================================================

pub async fn list_video_presets(catalog: &CatalogState) -> ApiResult<Sourced<Vec<VideoPreset>>> {
    Ok(catalog.inner().video_presets().await?)
}

pub async fn create_video_preset(
    catalog: &CatalogState,
    session: &SessionState,
    draft: VideoPresetDraft,
) -> ApiResult<Sourced<VideoPreset>> {
    let token = require_staff(session)?;
    Ok(catalog.inner().create_video_preset(&token, draft).await?)
}

pub async fn update_video_preset(
    catalog: &CatalogState,
    session: &SessionState,
    id: &str,
    draft: VideoPresetDraft,
) -> ApiResult<Sourced<VideoPreset>> {
    let token = require_staff(session)?;
    Ok(catalog.inner().update_video_preset(&token, id, draft).await?)
}

pub async fn delete_video_preset(
    catalog: &CatalogState,
    session: &SessionState,
    id: &str,
) -> ApiResult<DataSource> {
    let token = require_staff(session)?;
    Ok(catalog.inner().delete_video_preset(&token, id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::auth::login;
    use crate::test_context;
    use crate::AppContext;
    use cafe_core::{CardTarget, ProductCategory, User, UserRole};
    use chrono::Utc;

    async fn sign_in_as(ctx: &AppContext, role: UserRole, phone: &str) {
        let user = User {
            id: format!("user-{phone}"),
            phone: phone.to_string(),
            name: "Selin".to_string(),
            password_hash: cafe_db::hash_password("barista99").unwrap(),
            role,
            created_at: Utc::now(),
        };
        ctx.db.inner().users().insert(&user).await.unwrap();
        login(&ctx.db, &ctx.catalog, &ctx.session, phone, "barista99")
            .await
            .unwrap();
    }

    fn draft() -> ProductDraft {
        ProductDraft {
            cafe_id: "moda-kahve".to_string(),
            name: "Cortado".to_string(),
            description: "Yarı yarıya süt".to_string(),
            price_kurus: 8_000,
            category: ProductCategory::Coffee,
            badges: Vec::new(),
            image_url: None,
            nutrition: None,
            customization: None,
            is_available: true,
            sort_order: 9,
        }
    }

    #[tokio::test]
    async fn test_roles_gate_writes() {
        let ctx = test_context().await;
        let err = create_product(&ctx.catalog, &ctx.session, draft()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);

        sign_in_as(&ctx, UserRole::Customer, "5320000001").await;
        let err = create_product(&ctx.catalog, &ctx.session, draft()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        // Reads need no account
        let config = get_app_config(&ctx.catalog, "moda-kahve").await.unwrap();
        assert_eq!(config.source, DataSource::Demo);
    }

    #[tokio::test]
    async fn test_staff_manages_demo_catalog() {
        let ctx = test_context().await;
        sign_in_as(&ctx, UserRole::Staff, "5320000002").await;

        let created = create_product(&ctx.catalog, &ctx.session, draft()).await.unwrap();
        assert_eq!(created.source, DataSource::Demo);
        let id = created.data.id.clone();

        let mut changed = draft();
        changed.price_kurus = 8_250;
        let updated = update_product(&ctx.catalog, &ctx.session, &id, changed)
            .await
            .unwrap();
        assert_eq!(updated.data.price_kurus, 8_250);

        let mut invalid = draft();
        invalid.price_kurus = 0;
        let err = create_product(&ctx.catalog, &ctx.session, invalid).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        delete_product(&ctx.catalog, &ctx.session, &id).await.unwrap();
        let err = ctx.catalog.inner().product(&id).await.unwrap_err();
        assert!(matches!(err, cafe_client::ClientError::NotFound(_)));

        let card = create_card(
            &ctx.catalog,
            &ctx.session,
            CardDraft {
                cafe_id: "moda-kahve".to_string(),
                title: "Gizli kart".to_string(),
                subtitle: None,
                image_url: None,
                background_color: "#112233".to_string(),
                cta_label: None,
                target: CardTarget::None,
                sort_order: 0,
                is_active: false,
            },
        )
        .await
        .unwrap()
        .data;
        let visible = list_cards(&ctx.catalog, &ctx.session, "moda-kahve", false)
            .await
            .unwrap()
            .data;
        assert!(visible.iter().all(|c| c.id != card.id));
        let all = list_cards(&ctx.catalog, &ctx.session, "moda-kahve", true)
            .await
            .unwrap()
            .data;
        assert!(all.iter().any(|c| c.id == card.id));

        let mut config = get_app_config(&ctx.catalog, "moda-kahve").await.unwrap().data;
        config.ordering_enabled = false;
        let saved = save_app_config(&ctx.catalog, &ctx.session, config).await.unwrap();
        assert!(!saved.data.ordering_enabled);
        assert!(!get_app_config(&ctx.catalog, "moda-kahve").await.unwrap().data.ordering_enabled);

        let preset = create_video_preset(
            &ctx.catalog,
            &ctx.session,
            VideoPresetDraft {
                name: "Latte art".to_string(),
                url: "https://cdn.cafeorder.app/video/latte-art.mp4".to_string(),
                thumbnail_url: None,
                duration_secs: 12,
                is_default: false,
            },
        )
        .await
        .unwrap()
        .data;
        let presets = list_video_presets(&ctx.catalog).await.unwrap().data;
        assert!(presets.iter().any(|p| p.id == preset.id));
        delete_video_preset(&ctx.catalog, &ctx.session, &preset.id)
            .await
            .unwrap();
    }
}
