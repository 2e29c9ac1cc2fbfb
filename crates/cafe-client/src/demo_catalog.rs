//! # Demo Catalog
//!
//! The demo network held in memory, with the same read and write surface
//! as the API. Reads answer failed API calls; admin writes made while the
//! API is unreachable land here and last until the process exits.
//!
//! ## Sharing
//! ```text
//! DemoCatalog::shared() ──► one Arc<RwLock<DemoData>> per process
//!        │
//!        ├── CatalogService (customer reads)
//!        └── CatalogService (admin writes)   both see the same edits
//! ```

use std::sync::{Arc, OnceLock};

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use cafe_core::demo::DemoData;
use cafe_core::promo::find_code;
use cafe_core::{
    AppConfig, Cafe, CardDraft, Product, ProductCategory, ProductDraft, PromoCode,
    PromotionalCard, VideoPreset, VideoPresetDraft,
};

use crate::error::{ClientError, ClientResult};

static SHARED: OnceLock<DemoCatalog> = OnceLock::new();

/// In-memory demo data behind a lock.
#[derive(Debug, Clone)]
pub struct DemoCatalog {
    data: Arc<RwLock<DemoData>>,
}

impl DemoCatalog {
    /// A fresh, private copy of the demo network.
    pub fn new() -> Self {
        DemoCatalog {
            data: Arc::new(RwLock::new(DemoData::generate(Utc::now()))),
        }
    }

    /// The process-wide catalog.
    pub fn shared() -> DemoCatalog {
        SHARED.get_or_init(DemoCatalog::new).clone()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub async fn cafes(&self) -> Vec<Cafe> {
        self.data.read().await.cafes.clone()
    }

    pub async fn cafe(&self, id: &str) -> ClientResult<Cafe> {
        self.data
            .read()
            .await
            .cafes
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| ClientError::not_found(format!("cafe {id}")))
    }

    /// Products of a cafe, optionally one category, by `(sort_order, name)`.
    pub async fn products(&self, cafe_id: &str, category: Option<ProductCategory>) -> Vec<Product> {
        let data = self.data.read().await;
        let mut products: Vec<Product> = data
            .products
            .iter()
            .filter(|p| p.cafe_id == cafe_id)
            .filter(|p| category.map_or(true, |c| p.category == c))
            .cloned()
            .collect();
        products.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.name.cmp(&b.name)));
        products
    }

    pub async fn product(&self, id: &str) -> ClientResult<Product> {
        self.data
            .read()
            .await
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| ClientError::not_found(format!("product {id}")))
    }

    pub async fn cards(&self, cafe_id: &str, include_inactive: bool) -> Vec<PromotionalCard> {
        let data = self.data.read().await;
        let mut cards: Vec<PromotionalCard> = data
            .cards
            .iter()
            .filter(|c| c.cafe_id == cafe_id && (include_inactive || c.is_active))
            .cloned()
            .collect();
        cards.sort_by_key(|c| c.sort_order);
        cards
    }

    /// Stored config, or the default one when the cafe has none.
    pub async fn app_config(&self, cafe_id: &str) -> AppConfig {
        self.data
            .read()
            .await
            .app_configs
            .iter()
            .find(|c| c.cafe_id == cafe_id)
            .cloned()
            .unwrap_or_else(|| AppConfig::default_for(cafe_id, Utc::now()))
    }

    /// Presets, default first.
    pub async fn video_presets(&self) -> Vec<VideoPreset> {
        let mut presets = self.data.read().await.video_presets.clone();
        presets.sort_by_key(|p| !p.is_default);
        presets
    }

    pub async fn promo_code(&self, code: &str) -> Option<PromoCode> {
        find_code(&self.data.read().await.promo_codes, code).cloned()
    }

    // =========================================================================
    // Writes
    // =========================================================================

    pub async fn create_product(&self, draft: ProductDraft) -> ClientResult<Product> {
        let mut data = self.data.write().await;
        if !data.cafes.iter().any(|c| c.id == draft.cafe_id) {
            return Err(ClientError::not_found(format!("cafe {}", draft.cafe_id)));
        }

        let product = draft.into_product(Uuid::new_v4().to_string(), Utc::now());
        debug!(id = %product.id, cafe_id = %product.cafe_id, "Demo product created");
        data.products.push(product.clone());
        Ok(product)
    }

    pub async fn update_product(&self, id: &str, draft: ProductDraft) -> ClientResult<Product> {
        let mut data = self.data.write().await;
        let slot = data
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ClientError::not_found(format!("product {id}")))?;

        let updated = draft.apply_to(slot, Utc::now());
        *slot = updated.clone();
        Ok(updated)
    }

    pub async fn delete_product(&self, id: &str) -> ClientResult<()> {
        let mut data = self.data.write().await;
        let before = data.products.len();
        data.products.retain(|p| p.id != id);
        if data.products.len() == before {
            return Err(ClientError::not_found(format!("product {id}")));
        }
        Ok(())
    }

    pub async fn create_card(&self, draft: CardDraft) -> ClientResult<PromotionalCard> {
        let mut data = self.data.write().await;
        if !data.cafes.iter().any(|c| c.id == draft.cafe_id) {
            return Err(ClientError::not_found(format!("cafe {}", draft.cafe_id)));
        }

        let card = draft.into_card(Uuid::new_v4().to_string());
        data.cards.push(card.clone());
        Ok(card)
    }

    pub async fn update_card(&self, id: &str, draft: CardDraft) -> ClientResult<PromotionalCard> {
        let mut data = self.data.write().await;
        let slot = data
            .cards
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ClientError::not_found(format!("card {id}")))?;

        let mut updated = draft.into_card(id.to_string());
        updated.cafe_id = slot.cafe_id.clone();
        *slot = updated.clone();
        Ok(updated)
    }

    pub async fn delete_card(&self, id: &str) -> ClientResult<()> {
        let mut data = self.data.write().await;
        let before = data.cards.len();
        data.cards.retain(|c| c.id != id);
        if data.cards.len() == before {
            return Err(ClientError::not_found(format!("card {id}")));
        }
        Ok(())
    }

    pub async fn save_app_config(&self, mut config: AppConfig) -> AppConfig {
        config.updated_at = Utc::now();
        let mut data = self.data.write().await;
        match data.app_configs.iter_mut().find(|c| c.cafe_id == config.cafe_id) {
            Some(slot) => *slot = config.clone(),
            None => data.app_configs.push(config.clone()),
        }
        config
    }

    pub async fn create_video_preset(&self, draft: VideoPresetDraft) -> VideoPreset {
        let preset = draft.into_preset(Uuid::new_v4().to_string());
        let mut data = self.data.write().await;
        if preset.is_default {
            data.video_presets.iter_mut().for_each(|p| p.is_default = false);
        }
        data.video_presets.push(preset.clone());
        preset
    }

    pub async fn update_video_preset(
        &self,
        id: &str,
        draft: VideoPresetDraft,
    ) -> ClientResult<VideoPreset> {
        let mut data = self.data.write().await;
        if !data.video_presets.iter().any(|p| p.id == id) {
            return Err(ClientError::not_found(format!("video preset {id}")));
        }

        let updated = draft.into_preset(id.to_string());
        for preset in data.video_presets.iter_mut() {
            if preset.id == id {
                *preset = updated.clone();
            } else if updated.is_default {
                preset.is_default = false;
            }
        }
        Ok(updated)
    }

    pub async fn delete_video_preset(&self, id: &str) -> ClientResult<()> {
        let mut data = self.data.write().await;
        let before = data.video_presets.len();
        data.video_presets.retain(|p| p.id != id);
        if data.video_presets.len() == before {
            return Err(ClientError::not_found(format!("video preset {id}")));
        }
        Ok(())
    }

    /// Counts one use of a demo promo code.
    pub async fn record_promo_use(&self, code: &str) {
        let mut data = self.data.write().await;
        let wanted = cafe_core::promo::normalize_code(code);
        if let Some(promo) = data
            .promo_codes
            .iter_mut()
            .find(|p| cafe_core::promo::normalize_code(&p.code) == wanted)
        {
            promo.record_use();
        }
    }
}

impl Default for DemoCatalog {
    fn default() -> Self {
        DemoCatalog::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(cafe_id: &str) -> ProductDraft {
        ProductDraft {
            cafe_id: cafe_id.to_string(),
            name: "  Limonata ".to_string(),
            description: "Taze sıkılmış".to_string(),
            price_kurus: 6_000,
            category: ProductCategory::ColdDrinks,
            badges: vec![],
            image_url: Some(String::new()),
            nutrition: None,
            customization: None,
            is_available: true,
            sort_order: 9,
        }
    }

    #[tokio::test]
    async fn test_reads_are_scoped_to_cafe() {
        let demo = DemoCatalog::new();
        let cafes = demo.cafes().await;
        assert_eq!(cafes.len(), 3);

        for cafe in &cafes {
            let products = demo.products(&cafe.id, None).await;
            assert!(!products.is_empty());
            assert!(products.iter().all(|p| p.cafe_id == cafe.id));
        }
        assert!(demo.cafe("nowhere").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_product_crud() {
        let demo = DemoCatalog::new();
        let created = demo.create_product(draft("moda-kahve")).await.unwrap();
        assert_eq!(created.name, "Limonata");
        assert!(created.image_url.is_none());

        let mut edit = ProductDraft::from(&created);
        edit.price_kurus = 6_500;
        let updated = demo.update_product(&created.id, edit).await.unwrap();
        assert_eq!(updated.price_kurus, 6_500);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(demo.product(&created.id).await.unwrap().price_kurus, 6_500);

        demo.delete_product(&created.id).await.unwrap();
        assert!(demo.product(&created.id).await.is_err());
        assert!(demo.create_product(draft("ghost")).await.is_err());
    }

    #[tokio::test]
    async fn test_single_default_preset() {
        let demo = DemoCatalog::new();
        let preset = demo
            .create_video_preset(VideoPresetDraft {
                name: "Yağmur".to_string(),
                url: "https://cdn.example.com/rain.mp4".to_string(),
                thumbnail_url: None,
                duration_secs: 20,
                is_default: true,
            })
            .await;

        let presets = demo.video_presets().await;
        assert_eq!(presets[0].id, preset.id);
        assert_eq!(presets.iter().filter(|p| p.is_default).count(), 1);
    }

    #[tokio::test]
    async fn test_missing_config_defaults() {
        let demo = DemoCatalog::new();
        let config = demo.app_config("unknown-cafe").await;
        assert_eq!(config.cafe_id, "unknown-cafe");
        assert!(config.ordering_enabled);
    }

    #[tokio::test]
    async fn test_promo_lookup_and_use() {
        let demo = DemoCatalog::new();
        let before = demo.promo_code("kahve20").await.unwrap().usage_count;
        demo.record_promo_use("KAHVE20").await;
        assert_eq!(demo.promo_code("KAHVE20").await.unwrap().usage_count, before + 1);
        assert!(demo.promo_code("NOPE").await.is_none());
    }
}
