//! # Catalog Service
//!
//! The API-or-demo pattern the app is built on.
//!
//! ## Fallback
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  service.products("moda-kahve")                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiClient::list_products ──ok──► Sourced { data, source: Api }         │
//! │       │                                                                 │
//! │      err (any: refused, timeout, 500, bad JSON)                         │
//! │       │                                                                 │
//! │       ▼  warn!, no retry                                                │
//! │  DemoCatalog::products    ──────► Sourced { data, source: Demo }        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A 404 from a reachable API also falls back: the demo network may hold
//! the record (demo cafes are not on every server). With fallback turned
//! off the API error is returned as is.
//!
//! In offline mode the API is skipped and every read comes from the demo
//! catalog; auth and order submission fail with `ClientError::Offline`.
//!
//! Admin writes validate first, then try the API, then apply to the demo
//! catalog. Auth and order submission never fall back here; the app owns
//! their offline behavior.

use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use cafe_core::validation::{
    validate_app_config, validate_card_draft, validate_product_draft, validate_promo_code_format,
    validate_video_preset,
};
use cafe_core::wire::{AuthResponse, LoginRequest, PromoValidation, RegisterRequest};
use cafe_core::{
    AppConfig, Cafe, CardDraft, Money, Order, Product, ProductCategory, ProductDraft,
    PromotionalCard, VideoPreset, VideoPresetDraft,
};
use chrono::Utc;

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::demo_catalog::DemoCatalog;
use crate::error::{ClientError, ClientResult};

/// Where a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Api,
    Demo,
}

/// A value tagged with its source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sourced<T> {
    pub data: T,
    pub source: DataSource,
}

impl<T> Sourced<T> {
    fn api(data: T) -> Self {
        Sourced {
            data,
            source: DataSource::Api,
        }
    }

    fn demo(data: T) -> Self {
        Sourced {
            data,
            source: DataSource::Demo,
        }
    }

    pub fn is_demo(&self) -> bool {
        self.source == DataSource::Demo
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        Sourced {
            data: f(self.data),
            source: self.source,
        }
    }
}

/// Catalog access with demo fallback.
#[derive(Debug, Clone)]
pub struct CatalogService {
    api: ApiClient,
    demo: DemoCatalog,
    fallback_enabled: bool,
    offline: bool,
}

impl CatalogService {
    /// Service over the process-wide demo catalog.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        Self::with_demo(config, DemoCatalog::shared())
    }

    /// Service over a given demo catalog (tests, isolated sessions).
    pub fn with_demo(config: ClientConfig, demo: DemoCatalog) -> ClientResult<Self> {
        let fallback_enabled = config.fallback_enabled || config.offline;
        let offline = config.offline;
        Ok(CatalogService {
            api: ApiClient::new(config)?,
            demo,
            fallback_enabled,
            offline,
        })
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn demo(&self) -> &DemoCatalog {
        &self.demo
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    /// Logs the failure and decides whether the demo catalog may answer.
    fn fall_back(&self, what: &str, err: ClientError) -> ClientResult<()> {
        if !self.fallback_enabled {
            return Err(err);
        }
        warn!(what, error = %err, "API unavailable, using demo data");
        Ok(())
    }

    /// Runs an API call. `None` means the demo catalog should answer.
    ///
    /// In offline mode the call is never polled, so no request goes out.
    async fn attempt<T>(
        &self,
        what: &str,
        call: impl Future<Output = ClientResult<T>>,
    ) -> ClientResult<Option<T>> {
        if self.offline {
            debug!(what, "Offline mode, using demo data");
            return Ok(None);
        }
        match call.await {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                self.fall_back(what, e)?;
                Ok(None)
            }
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub async fn cafes(&self) -> ClientResult<Sourced<Vec<Cafe>>> {
        match self.attempt("cafes", self.api.list_cafes()).await? {
            Some(cafes) => Ok(Sourced::api(cafes)),
            None => Ok(Sourced::demo(self.demo.cafes().await)),
        }
    }

    pub async fn cafe(&self, id: &str) -> ClientResult<Sourced<Cafe>> {
        match self.attempt("cafe", self.api.get_cafe(id)).await? {
            Some(cafe) => Ok(Sourced::api(cafe)),
            None => Ok(Sourced::demo(self.demo.cafe(id).await?)),
        }
    }

    pub async fn products(
        &self,
        cafe_id: &str,
        category: Option<ProductCategory>,
    ) -> ClientResult<Sourced<Vec<Product>>> {
        match self.attempt("products", self.api.list_products(cafe_id, category)).await? {
            Some(products) => Ok(Sourced::api(products)),
            None => Ok(Sourced::demo(self.demo.products(cafe_id, category).await)),
        }
    }

    pub async fn product(&self, id: &str) -> ClientResult<Sourced<Product>> {
        match self.attempt("product", self.api.get_product(id)).await? {
            Some(product) => Ok(Sourced::api(product)),
            None => Ok(Sourced::demo(self.demo.product(id).await?)),
        }
    }

    pub async fn promotional_cards(
        &self,
        cafe_id: &str,
        include_inactive: bool,
    ) -> ClientResult<Sourced<Vec<PromotionalCard>>> {
        let result = self
            .attempt("promotional cards", self.api.list_promotional_cards(cafe_id, include_inactive))
            .await?;
        match result {
            Some(cards) => Ok(Sourced::api(cards)),
            None => Ok(Sourced::demo(self.demo.cards(cafe_id, include_inactive).await)),
        }
    }

    pub async fn app_config(&self, cafe_id: &str) -> ClientResult<Sourced<AppConfig>> {
        match self.attempt("app config", self.api.get_app_config(cafe_id)).await? {
            Some(config) => Ok(Sourced::api(config)),
            None => Ok(Sourced::demo(self.demo.app_config(cafe_id).await)),
        }
    }

    pub async fn video_presets(&self) -> ClientResult<Sourced<Vec<VideoPreset>>> {
        match self.attempt("video presets", self.api.list_video_presets()).await? {
            Some(presets) => Ok(Sourced::api(presets)),
            None => Ok(Sourced::demo(self.demo.video_presets().await)),
        }
    }

    /// Checks a promo code against a subtotal.
    ///
    /// Unknown codes are `NotFound` on both paths.
    pub async fn validate_promo(
        &self,
        code: &str,
        subtotal: Money,
    ) -> ClientResult<Sourced<PromoValidation>> {
        let code = validate_promo_code_format(code)?;

        let checked = self
            .attempt("promo validation", self.api.validate_promo(&code, subtotal.kurus()))
            .await?;
        if let Some(result) = checked {
            return Ok(Sourced::api(result));
        }

        let promo = self
            .demo
            .promo_code(&code)
            .await
            .ok_or_else(|| ClientError::not_found(format!("promo code {code}")))?;
        let result = match promo.check(Utc::now(), subtotal) {
            Ok(discount) => PromoValidation::accepted(promo, discount.kurus()),
            Err(reason) => PromoValidation::rejected(&code, reason),
        };
        Ok(Sourced::demo(result))
    }

    // =========================================================================
    // Admin writes
    // =========================================================================

    pub async fn create_product(
        &self,
        token: &str,
        draft: ProductDraft,
    ) -> ClientResult<Sourced<Product>> {
        validate_product_draft(&draft)?;
        match self.attempt("create product", self.api.create_product(token, &draft)).await? {
            Some(product) => Ok(Sourced::api(product)),
            None => {
                let product = self.demo.create_product(draft).await?;
                info!(id = %product.id, "Product created in demo catalog");
                Ok(Sourced::demo(product))
            }
        }
    }

    pub async fn update_product(
        &self,
        token: &str,
        id: &str,
        draft: ProductDraft,
    ) -> ClientResult<Sourced<Product>> {
        validate_product_draft(&draft)?;
        match self.attempt("update product", self.api.update_product(token, id, &draft)).await? {
            Some(product) => Ok(Sourced::api(product)),
            None => Ok(Sourced::demo(self.demo.update_product(id, draft).await?)),
        }
    }

    pub async fn delete_product(&self, token: &str, id: &str) -> ClientResult<DataSource> {
        match self.attempt("delete product", self.api.delete_product(token, id)).await? {
            Some(()) => Ok(DataSource::Api),
            None => {
                self.demo.delete_product(id).await?;
                Ok(DataSource::Demo)
            }
        }
    }

    pub async fn create_card(
        &self,
        token: &str,
        draft: CardDraft,
    ) -> ClientResult<Sourced<PromotionalCard>> {
        validate_card_draft(&draft)?;
        match self.attempt("create card", self.api.create_card(token, &draft)).await? {
            Some(card) => Ok(Sourced::api(card)),
            None => Ok(Sourced::demo(self.demo.create_card(draft).await?)),
        }
    }

    pub async fn update_card(
        &self,
        token: &str,
        id: &str,
        draft: CardDraft,
    ) -> ClientResult<Sourced<PromotionalCard>> {
        validate_card_draft(&draft)?;
        match self.attempt("update card", self.api.update_card(token, id, &draft)).await? {
            Some(card) => Ok(Sourced::api(card)),
            None => Ok(Sourced::demo(self.demo.update_card(id, draft).await?)),
        }
    }

    pub async fn delete_card(&self, token: &str, id: &str) -> ClientResult<DataSource> {
        match self.attempt("delete card", self.api.delete_card(token, id)).await? {
            Some(()) => Ok(DataSource::Api),
            None => {
                self.demo.delete_card(id).await?;
                Ok(DataSource::Demo)
            }
        }
    }

    pub async fn save_app_config(
        &self,
        token: &str,
        config: AppConfig,
    ) -> ClientResult<Sourced<AppConfig>> {
        validate_app_config(&config)?;
        match self.attempt("save app config", self.api.save_app_config(token, &config)).await? {
            Some(saved) => Ok(Sourced::api(saved)),
            None => Ok(Sourced::demo(self.demo.save_app_config(config).await)),
        }
    }

    pub async fn create_video_preset(
        &self,
        token: &str,
        draft: VideoPresetDraft,
    ) -> ClientResult<Sourced<VideoPreset>> {
        validate_video_preset(&draft)?;
        let result = self
            .attempt("create video preset", self.api.create_video_preset(token, &draft))
            .await?;
        match result {
            Some(preset) => Ok(Sourced::api(preset)),
            None => Ok(Sourced::demo(self.demo.create_video_preset(draft).await)),
        }
    }

    pub async fn update_video_preset(
        &self,
        token: &str,
        id: &str,
        draft: VideoPresetDraft,
    ) -> ClientResult<Sourced<VideoPreset>> {
        validate_video_preset(&draft)?;
        let result = self
            .attempt("update video preset", self.api.update_video_preset(token, id, &draft))
            .await?;
        match result {
            Some(preset) => Ok(Sourced::api(preset)),
            None => Ok(Sourced::demo(self.demo.update_video_preset(id, draft).await?)),
        }
    }

    pub async fn delete_video_preset(&self, token: &str, id: &str) -> ClientResult<DataSource> {
        match self.attempt("delete video preset", self.api.delete_video_preset(token, id)).await? {
            Some(()) => Ok(DataSource::Api),
            None => {
                self.demo.delete_video_preset(id).await?;
                Ok(DataSource::Demo)
            }
        }
    }

    // =========================================================================
    // Pass-through (no fallback)
    // =========================================================================

    fn online(&self) -> ClientResult<()> {
        if self.offline {
            return Err(ClientError::Offline);
        }
        Ok(())
    }

    pub async fn login(&self, phone: &str, password: &str) -> ClientResult<AuthResponse> {
        self.online()?;
        let request = LoginRequest {
            phone: phone.to_string(),
            password: password.to_string(),
        };
        self.api.login(&request).await
    }

    pub async fn register(
        &self,
        name: &str,
        phone: &str,
        password: &str,
    ) -> ClientResult<AuthResponse> {
        self.online()?;
        let request = RegisterRequest {
            name: name.to_string(),
            phone: phone.to_string(),
            password: password.to_string(),
        };
        self.api.register(&request).await
    }

    /// Submits an order. On success against the demo path nothing is sent,
    /// but a used demo promo code is counted.
    pub async fn submit_order(&self, token: Option<&str>, order: &Order) -> ClientResult<Order> {
        let result = match self.online() {
            Ok(()) => self.api.submit_order(token, order).await,
            Err(e) => Err(e),
        };
        if result.is_err() && self.fallback_enabled {
            if let Some(code) = &order.promo_code {
                self.demo.record_promo_use(code).await;
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn unreachable(fallback: bool) -> CatalogService {
        let config = ClientConfig::new("http://127.0.0.1:9")
            .timeout(Duration::from_secs(2))
            .fallback_enabled(fallback);
        CatalogService::with_demo(config, DemoCatalog::new()).unwrap()
    }

    #[tokio::test]
    async fn test_reads_fall_back_to_demo() {
        let service = unreachable(true);

        let cafes = service.cafes().await.unwrap();
        assert!(cafes.is_demo());
        assert_eq!(cafes.data.len(), 3);

        let menu = service.products("moda-kahve", None).await.unwrap();
        assert!(menu.is_demo());
        assert!(!menu.data.is_empty());

        let config = service.app_config("carsi-lab").await.unwrap();
        assert_eq!(config.data.min_order_kurus, 5_000);
    }

    #[tokio::test]
    async fn test_fallback_disabled_returns_error() {
        let service = unreachable(false);
        let err = service.cafes().await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_offline_mode_skips_api() {
        let config = ClientConfig::new("http://127.0.0.1:9")
            .fallback_enabled(false)
            .offline(true);
        let service = CatalogService::with_demo(config, DemoCatalog::new()).unwrap();

        let cafe = service.cafe("moda-kahve").await.unwrap();
        assert!(cafe.is_demo());

        let err = service.login("5321234567", "secret1").await.unwrap_err();
        assert!(matches!(err, ClientError::Offline));
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_demo_promo_validation() {
        let service = unreachable(true);

        let ok = service
            .validate_promo("hosgeldin", Money::from_kurus(20_000))
            .await
            .unwrap();
        assert!(ok.data.valid);
        assert_eq!(ok.data.discount_kurus, 2_000);

        let expired = service
            .validate_promo("YAZ2023", Money::from_kurus(20_000))
            .await
            .unwrap();
        assert!(!expired.data.valid);

        let unknown = service.validate_promo("YOKBOYLE", Money::from_kurus(100)).await;
        assert!(unknown.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_admin_write_lands_in_demo() {
        let service = unreachable(true);
        let draft = ProductDraft {
            cafe_id: "kordon-cay".to_string(),
            name: "Kumru".to_string(),
            description: String::new(),
            price_kurus: 14_000,
            category: ProductCategory::Sandwiches,
            badges: vec![],
            image_url: None,
            nutrition: None,
            customization: None,
            is_available: true,
            sort_order: 1,
        };

        let created = service.create_product("token", draft).await.unwrap();
        assert!(created.is_demo());

        let fetched = service.product(&created.data.id).await.unwrap();
        assert_eq!(fetched.data.name, "Kumru");
    }

    #[tokio::test]
    async fn test_invalid_draft_rejected_before_request() {
        let service = unreachable(true);
        let mut config = service.app_config("moda-kahve").await.unwrap().data;
        config.primary_color = "brown".to_string();

        let err = service.save_app_config("token", config).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }
}
