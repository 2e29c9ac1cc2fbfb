//! # REST API Client
//!
//! Thin typed wrapper over the cafe-api routes. One method per route; no
//! fallback here (see [`crate::service`]).
//!
//! ## Routes
//! ```text
//! GET    /health
//! GET    /cafes                         GET /cafes/{id}
//! GET    /products?cafeId=&category=    GET /products/{id}
//! POST   /products                      PUT/DELETE /products/{id}         (staff)
//! GET    /promotional-cards?cafeId=&all=
//! POST   /promotional-cards             PUT/DELETE /promotional-cards/{id} (staff)
//! GET    /app-config?cafeId=            PUT /app-config                    (staff)
//! GET    /video-presets
//! POST   /video-presets                 PUT/DELETE /video-presets/{id}     (staff)
//! POST   /auth/register                 POST /auth/login
//! POST   /promo-codes/validate
//! POST   /orders   GET /orders/{id}   GET /orders?userId=   PUT /orders/{id}/status
//! ```

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use cafe_core::wire::{
    AuthResponse, ErrorBody, HealthResponse, LoginRequest, PromoValidation, RegisterRequest,
    UpdateOrderStatusRequest, ValidatePromoRequest,
};
use cafe_core::ValidationError;
use cafe_core::{
    AppConfig, Cafe, CardDraft, Order, OrderStatus, Product, ProductCategory, ProductDraft,
    PromotionalCard, VideoPreset, VideoPresetDraft,
};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Cafe Order REST client.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

#[derive(Debug)]
struct ApiClientInner {
    client: reqwest::Client,
    config: ClientConfig,
    base: Url,
}

impl ApiClient {
    /// Builds the HTTP client.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL cannot carry a path or the TLS backend
    /// fails to initialize.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let invalid = |reason: String| ValidationError::InvalidFormat {
            field: "api url".to_string(),
            reason,
        };
        let base = Url::parse(&config.base_url).map_err(|e| invalid(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(invalid("not a hierarchical URL".to_string()).into());
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("cafe-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(ApiClient {
            inner: Arc::new(ApiClientInner {
                client,
                config,
                base,
            }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    // =========================================================================
    // Request plumbing
    // =========================================================================

    /// `{base_url}/seg/seg/...`; each segment is percent-encoded, so an id
    /// containing `/`, `?` or `#` stays one segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.inner.base.clone();
        // Checked in `new`: the base can carry a path
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, path: &[&str], token: Option<&str>) -> RequestBuilder {
        let url = self.url(path);
        debug!(method = %method, url = %url, authed = token.is_some(), "API request");

        let builder = self.inner.client.request(method, url);
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| ClientError::Parse(format!("Failed to parse response: {e}")));
        }

        Err(parse_error(response).await)
    }

    async fn send_empty(&self, builder: RequestBuilder) -> ClientResult<()> {
        let response = builder.send().await?;
        if response.status().is_success() {
            return Ok(());
        }
        Err(parse_error(response).await)
    }

    async fn get<T: DeserializeOwned>(&self, path: &[&str]) -> ClientResult<T> {
        self.send(self.request(Method::GET, path, None)).await
    }

    async fn write<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &[&str],
        token: Option<&str>,
        body: &B,
    ) -> ClientResult<T> {
        self.send(self.request(method, path, token).json(body)).await
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    pub async fn health(&self) -> ClientResult<HealthResponse> {
        self.get(&["health"]).await
    }

    pub async fn list_cafes(&self) -> ClientResult<Vec<Cafe>> {
        self.get(&["cafes"]).await
    }

    pub async fn get_cafe(&self, id: &str) -> ClientResult<Cafe> {
        self.get(&["cafes", id]).await
    }

    pub async fn list_products(
        &self,
        cafe_id: &str,
        category: Option<ProductCategory>,
    ) -> ClientResult<Vec<Product>> {
        let mut query = vec![("cafeId", cafe_id)];
        if let Some(category) = category {
            query.push(("category", category.as_str()));
        }
        self.send(self.request(Method::GET, &["products"], None).query(&query))
            .await
    }

    pub async fn get_product(&self, id: &str) -> ClientResult<Product> {
        self.get(&["products", id]).await
    }

    /// Active cards unless `include_inactive` (admin listing).
    pub async fn list_promotional_cards(
        &self,
        cafe_id: &str,
        include_inactive: bool,
    ) -> ClientResult<Vec<PromotionalCard>> {
        let all = if include_inactive { "true" } else { "false" };
        self.send(
            self.request(Method::GET, &["promotional-cards"], None)
                .query(&[("cafeId", cafe_id), ("all", all)]),
        )
        .await
    }

    pub async fn get_app_config(&self, cafe_id: &str) -> ClientResult<AppConfig> {
        self.send(
            self.request(Method::GET, &["app-config"], None)
                .query(&[("cafeId", cafe_id)]),
        )
        .await
    }

    pub async fn list_video_presets(&self) -> ClientResult<Vec<VideoPreset>> {
        self.get(&["video-presets"]).await
    }

    // =========================================================================
    // Admin writes (bearer token of a staff or admin account)
    // =========================================================================

    pub async fn create_product(&self, token: &str, draft: &ProductDraft) -> ClientResult<Product> {
        self.write(Method::POST, &["products"], Some(token), draft).await
    }

    pub async fn update_product(
        &self,
        token: &str,
        id: &str,
        draft: &ProductDraft,
    ) -> ClientResult<Product> {
        self.write(Method::PUT, &["products", id], Some(token), draft)
            .await
    }

    pub async fn delete_product(&self, token: &str, id: &str) -> ClientResult<()> {
        self.send_empty(self.request(Method::DELETE, &["products", id], Some(token)))
            .await
    }

    pub async fn create_card(&self, token: &str, draft: &CardDraft) -> ClientResult<PromotionalCard> {
        self.write(Method::POST, &["promotional-cards"], Some(token), draft)
            .await
    }

    pub async fn update_card(
        &self,
        token: &str,
        id: &str,
        draft: &CardDraft,
    ) -> ClientResult<PromotionalCard> {
        self.write(Method::PUT, &["promotional-cards", id], Some(token), draft)
            .await
    }

    pub async fn delete_card(&self, token: &str, id: &str) -> ClientResult<()> {
        self.send_empty(self.request(
            Method::DELETE,
            &["promotional-cards", id],
            Some(token),
        ))
        .await
    }

    pub async fn save_app_config(&self, token: &str, config: &AppConfig) -> ClientResult<AppConfig> {
        self.write(Method::PUT, &["app-config"], Some(token), config).await
    }

    pub async fn create_video_preset(
        &self,
        token: &str,
        draft: &VideoPresetDraft,
    ) -> ClientResult<VideoPreset> {
        self.write(Method::POST, &["video-presets"], Some(token), draft)
            .await
    }

    pub async fn update_video_preset(
        &self,
        token: &str,
        id: &str,
        draft: &VideoPresetDraft,
    ) -> ClientResult<VideoPreset> {
        self.write(Method::PUT, &["video-presets", id], Some(token), draft)
            .await
    }

    pub async fn delete_video_preset(&self, token: &str, id: &str) -> ClientResult<()> {
        self.send_empty(self.request(
            Method::DELETE,
            &["video-presets", id],
            Some(token),
        ))
        .await
    }

    // =========================================================================
    // Accounts, promo codes, orders
    // =========================================================================

    pub async fn login(&self, request: &LoginRequest) -> ClientResult<AuthResponse> {
        self.write(Method::POST, &["auth", "login"], None, request).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<AuthResponse> {
        self.write(Method::POST, &["auth", "register"], None, request).await
    }

    pub async fn validate_promo(
        &self,
        code: &str,
        subtotal_kurus: i64,
    ) -> ClientResult<PromoValidation> {
        let body = ValidatePromoRequest {
            code: code.to_string(),
            subtotal_kurus,
        };
        self.write(Method::POST, &["promo-codes", "validate"], None, &body)
            .await
    }

    /// Submits a checked-out cart. Guests pass no token.
    pub async fn submit_order(&self, token: Option<&str>, order: &Order) -> ClientResult<Order> {
        self.write(Method::POST, &["orders"], token, order).await
    }

    pub async fn get_order(&self, id: &str) -> ClientResult<Order> {
        self.get(&["orders", id]).await
    }

    pub async fn list_orders(&self, token: &str, user_id: &str) -> ClientResult<Vec<Order>> {
        self.send(
            self.request(Method::GET, &["orders"], Some(token))
                .query(&[("userId", user_id)]),
        )
        .await
    }

    pub async fn update_order_status(
        &self,
        token: &str,
        id: &str,
        status: OrderStatus,
    ) -> ClientResult<Order> {
        let body = UpdateOrderStatusRequest { status };
        self.write(Method::PUT, &["orders", id, "status"], Some(token), &body)
            .await
    }
}

/// Turns a non-2xx response into a [`ClientError`].
async fn parse_error(response: reqwest::Response) -> ClientError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let (code, message) = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => (body.code, body.message),
        Err(_) => (status.as_str().to_string(), text),
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::Unauthorized(message),
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        _ => ClientError::Api {
            status: status.as_u16(),
            code,
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        // Port 9 (discard) is closed on any sane test host
        let config = ClientConfig::new("http://127.0.0.1:9").timeout(Duration::from_secs(2));
        let client = ApiClient::new(config).unwrap();

        let err = client.list_cafes().await.unwrap_err();
        assert!(err.is_transport(), "{err:?}");
    }

    #[test]
    fn test_ids_stay_one_path_segment() {
        let client = ApiClient::new(ClientConfig::new("https://api.cafeorder.app/v1/")).unwrap();

        let url = client.url(&["products", "moda-latte"]);
        assert_eq!(url.as_str(), "https://api.cafeorder.app/v1/products/moda-latte");

        let url = client.url(&["orders", "a/b?c#d", "status"]);
        assert_eq!(
            url.as_str(),
            "https://api.cafeorder.app/v1/orders/a%2Fb%3Fc%23d/status"
        );
        assert_eq!(url.path_segments().unwrap().count(), 4);
        assert!(url.query().is_none());
    }

    #[test]
    fn test_base_url_must_be_hierarchical() {
        let err = ApiClient::new(ClientConfig::new("mailto:kahve@cafeorder.app")).unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)), "{err:?}");
        assert!(ApiClient::new(ClientConfig::new("kahve")).is_err());
    }
}
