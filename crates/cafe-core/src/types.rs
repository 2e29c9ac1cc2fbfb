//! # Domain Types
//!
//! Core domain types shared by the server, the client and the app.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Cafe       │   │    Product      │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  cafe_id        │   │  order_number   │       │
//! │  │  qr_code        │   │  price_kurus    │   │  items (frozen) │       │
//! │  │  categories     │   │  category       │   │  total_kurus    │       │
//! │  │  video          │   │  customization  │   │  status         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   PromoCode     │   │ PromotionalCard │   │   AppConfig     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  discount       │   │  target         │   │  colors, logo   │       │
//! │  │  valid window   │   │  sort_order     │   │  min order      │       │
//! │  │  usage limit    │   │                 │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Every struct serializes camelCase, enums serialize as their slug.
//! All amounts are integer kuruş.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::SelectedOption;
use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Cafe
// =============================================================================

/// Background video shown on the cafe's splash and menu header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VideoConfig {
    /// Preset the video was picked from, if any.
    pub preset_id: Option<String>,
    pub url: String,
    pub autoplay: bool,
    #[serde(rename = "loop")]
    pub loop_video: bool,
    pub muted: bool,
    /// Dark overlay on top of the video, 0-100 percent.
    pub overlay_opacity: u8,
}

impl Default for VideoConfig {
    fn default() -> Self {
        VideoConfig {
            preset_id: None,
            url: String::new(),
            autoplay: true,
            loop_video: true,
            muted: true,
            overlay_opacity: 40,
        }
    }
}

/// One storefront of the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cafe {
    pub id: String,
    pub name: String,
    pub location: String,
    /// Category slugs in menu display order.
    pub categories: Vec<String>,
    pub video: VideoConfig,
    /// Short code printed on the table QR stickers.
    pub qr_code: String,
    pub is_active: bool,
}

impl Cafe {
    /// Menu categories this cafe shows, in display order.
    ///
    /// Unknown slugs are skipped.
    pub fn category_order(&self) -> Vec<ProductCategory> {
        self.categories
            .iter()
            .filter_map(|slug| slug.parse().ok())
            .collect()
    }
}

// =============================================================================
// Product Category
// =============================================================================

/// Menu section a product is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum ProductCategory {
    HotDrinks,
    ColdDrinks,
    Coffee,
    Tea,
    Desserts,
    Bakery,
    Breakfast,
    Sandwiches,
    Snacks,
}

impl ProductCategory {
    /// Every category, in the default menu order.
    pub const ALL: [ProductCategory; 9] = [
        ProductCategory::Coffee,
        ProductCategory::HotDrinks,
        ProductCategory::ColdDrinks,
        ProductCategory::Tea,
        ProductCategory::Breakfast,
        ProductCategory::Sandwiches,
        ProductCategory::Bakery,
        ProductCategory::Desserts,
        ProductCategory::Snacks,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::HotDrinks => "hot-drinks",
            ProductCategory::ColdDrinks => "cold-drinks",
            ProductCategory::Coffee => "coffee",
            ProductCategory::Tea => "tea",
            ProductCategory::Desserts => "desserts",
            ProductCategory::Bakery => "bakery",
            ProductCategory::Breakfast => "breakfast",
            ProductCategory::Sandwiches => "sandwiches",
            ProductCategory::Snacks => "snacks",
        }
    }

    /// Section title shown on the menu.
    pub const fn label(&self) -> &'static str {
        match self {
            ProductCategory::HotDrinks => "Sıcak İçecekler",
            ProductCategory::ColdDrinks => "Soğuk İçecekler",
            ProductCategory::Coffee => "Kahveler",
            ProductCategory::Tea => "Çaylar",
            ProductCategory::Desserts => "Tatlılar",
            ProductCategory::Bakery => "Fırından",
            ProductCategory::Breakfast => "Kahvaltı",
            ProductCategory::Sandwiches => "Sandviçler",
            ProductCategory::Snacks => "Atıştırmalıklar",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ValidationError::format("category", &format!("unknown category '{s}'")))
    }
}

// =============================================================================
// Badge
// =============================================================================

/// Marketing badge shown on a product tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum Badge {
    New,
    Popular,
    Vegan,
    GlutenFree,
    Spicy,
    Seasonal,
    ChefPick,
}

impl Badge {
    pub const ALL: [Badge; 7] = [
        Badge::New,
        Badge::Popular,
        Badge::Vegan,
        Badge::GlutenFree,
        Badge::Spicy,
        Badge::Seasonal,
        Badge::ChefPick,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Badge::New => "new",
            Badge::Popular => "popular",
            Badge::Vegan => "vegan",
            Badge::GlutenFree => "gluten-free",
            Badge::Spicy => "spicy",
            Badge::Seasonal => "seasonal",
            Badge::ChefPick => "chef-pick",
        }
    }

    /// Badges that put a product into the "featured" strip.
    pub const fn is_highlight(&self) -> bool {
        matches!(self, Badge::New | Badge::Popular | Badge::ChefPick)
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Badge {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Badge::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| ValidationError::format("badge", &format!("unknown badge '{s}'")))
    }
}

// =============================================================================
// Product
// =============================================================================

/// Nutrition facts for the product detail sheet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Nutrition {
    pub calories: u32,
    pub protein_g: u32,
    pub carbs_g: u32,
    pub fat_g: u32,
    pub caffeine_mg: Option<u32>,
    #[serde(default)]
    pub allergens: Vec<String>,
}

/// One selectable option (a size, a milk, an extra shot).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OptionChoice {
    pub id: String,
    pub name: String,
    /// Added to the base price when chosen. May be zero.
    pub price_delta_kurus: i64,
}

impl OptionChoice {
    pub fn new(id: &str, name: &str, price_delta_kurus: i64) -> Self {
        OptionChoice {
            id: id.to_string(),
            name: name.to_string(),
            price_delta_kurus,
        }
    }
}

/// Customization groups of a product.
///
/// At most one size and one milk may be chosen, extras are free-form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customization {
    #[serde(default)]
    pub sizes: Vec<OptionChoice>,
    #[serde(default)]
    pub milks: Vec<OptionChoice>,
    #[serde(default)]
    pub extras: Vec<OptionChoice>,
}

impl Customization {
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty() && self.milks.is_empty() && self.extras.is_empty()
    }

    pub fn find_size(&self, id: &str) -> Option<&OptionChoice> {
        self.sizes.iter().find(|o| o.id == id)
    }

    pub fn find_milk(&self, id: &str) -> Option<&OptionChoice> {
        self.milks.iter().find(|o| o.id == id)
    }

    pub fn find_extra(&self, id: &str) -> Option<&OptionChoice> {
        self.extras.iter().find(|o| o.id == id)
    }
}

/// A menu item of one cafe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier.
    pub id: String,

    /// Cafe this product is sold at.
    pub cafe_id: String,

    /// Display name on the menu tile.
    pub name: String,

    pub description: String,

    /// Base price in kuruş, before customization deltas.
    pub price_kurus: i64,

    pub category: ProductCategory,

    #[serde(default)]
    pub badges: Vec<Badge>,

    pub image_url: Option<String>,

    pub nutrition: Option<Nutrition>,

    pub customization: Option<Customization>,

    /// False while the product is sold out.
    pub is_available: bool,

    /// Position within its category; lower comes first.
    pub sort_order: i32,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the base price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_kurus(self.price_kurus)
    }

    pub fn has_badge(&self, badge: Badge) -> bool {
        self.badges.contains(&badge)
    }
}

// =============================================================================
// User
// =============================================================================

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Customer,
    Staff,
    Admin,
}

impl UserRole {
    pub const fn as_str(&self) -> &'static str {
        match self {
            UserRole::Customer => "customer",
            UserRole::Staff => "staff",
            UserRole::Admin => "admin",
        }
    }

    /// Staff and admins may use the management surface.
    pub const fn can_manage(&self) -> bool {
        matches!(self, UserRole::Staff | UserRole::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(UserRole::Customer),
            "staff" => Ok(UserRole::Staff),
            "admin" => Ok(UserRole::Admin),
            other => Err(ValidationError::format("role", &format!("unknown role '{other}'"))),
        }
    }
}

/// A registered account. Phone is the login key.
///
/// The password hash never leaves the process: it is skipped on
/// serialization, use [`UserProfile`] on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    /// Canonical 10-digit phone (see `validation::normalize_phone`).
    pub phone: String,
    pub name: String,
    #[serde(default, skip_serializing)]
    #[ts(skip)]
    pub password_hash: String,
    pub role: UserRole,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            phone: self.phone.clone(),
            name: self.name.clone(),
            role: self.role,
            created_at: self.created_at,
        }
    }
}

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub phone: String,
    pub name: String,
    pub role: UserRole,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Order
// =============================================================================

/// Lifecycle of an order. Any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "preparing" => Ok(OrderStatus::Preparing),
            "ready" => Ok(OrderStatus::Ready),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(ValidationError::format("status", &format!("unknown status '{other}'"))),
        }
    }
}

/// A line of a placed order.
/// Snapshot of the cart line: later menu edits do not change it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    /// Product name at time of order (frozen).
    pub name: String,
    /// Base price plus option deltas at time of order (frozen).
    pub unit_price_kurus: i64,
    pub quantity: i64,
    #[serde(default)]
    pub options: Vec<SelectedOption>,
    /// unit_price × quantity.
    pub line_total_kurus: i64,
}

/// A checked-out cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    /// Short human-readable number called out at the counter.
    pub order_number: String,
    pub cafe_id: String,
    pub user_id: Option<String>,
    pub items: Vec<OrderItem>,
    pub subtotal_kurus: i64,
    pub discount_kurus: i64,
    pub total_kurus: i64,
    pub promo_code: Option<String>,
    pub status: OrderStatus,
    pub note: Option<String>,
    pub table_number: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_kurus(self.total_kurus)
    }

    /// Builds an order number like `C-250114-7F3A`: day stamp plus four
    /// characters of the order id.
    pub fn number_for(id: &str, now: DateTime<Utc>) -> String {
        let suffix: String = id
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .take(4)
            .collect::<String>()
            .to_ascii_uppercase();
        format!("C-{}-{}", now.format("%y%m%d"), suffix)
    }
}

// =============================================================================
// Promo Code
// =============================================================================

/// What a promo code takes off the subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Discount {
    /// Basis points of the subtotal (1000 = 10%).
    Percentage { bps: u32 },
    /// Fixed amount in kuruş.
    Fixed { kurus: i64 },
}

/// A redeemable discount code. Validity rules live in [`crate::promo`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PromoCode {
    pub id: String,
    /// Upper-case code the customer types in.
    pub code: String,
    pub discount: Discount,
    /// Cap for percentage discounts.
    pub max_discount_kurus: Option<i64>,
    /// Subtotal needed before the code applies. Zero for none.
    pub min_order_kurus: i64,
    #[ts(as = "String")]
    pub valid_from: DateTime<Utc>,
    #[ts(as = "String")]
    pub valid_until: DateTime<Utc>,
    pub usage_limit: Option<i64>,
    pub usage_count: i64,
    pub is_active: bool,
}

// =============================================================================
// Promotional Card
// =============================================================================

/// Where tapping a promotional card leads.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CardTarget {
    #[default]
    None,
    Product { id: String },
    Category { slug: String },
    Url { href: String },
}

/// Banner card in the menu carousel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PromotionalCard {
    pub id: String,
    pub cafe_id: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub image_url: Option<String>,
    /// `#RRGGBB` or `#RGB`.
    pub background_color: String,
    pub cta_label: Option<String>,
    #[serde(default)]
    pub target: CardTarget,
    pub sort_order: i32,
    pub is_active: bool,
}

// =============================================================================
// App Config / Video Presets
// =============================================================================

/// Per-cafe branding and ordering switches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub cafe_id: String,
    pub primary_color: String,
    pub accent_color: String,
    pub logo_url: Option<String>,
    pub welcome_message: String,
    /// When false the menu is browse-only.
    pub ordering_enabled: bool,
    pub min_order_kurus: i64,
    pub featured_category: Option<ProductCategory>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl AppConfig {
    /// Config used when a cafe has none stored.
    pub fn default_for(cafe_id: &str, now: DateTime<Utc>) -> Self {
        AppConfig {
            cafe_id: cafe_id.to_string(),
            primary_color: "#6F4E37".to_string(),
            accent_color: "#F5E6D3".to_string(),
            logo_url: None,
            welcome_message: "Hoş geldiniz!".to_string(),
            ordering_enabled: true,
            min_order_kurus: 0,
            featured_category: None,
            updated_at: now,
        }
    }

    #[inline]
    pub fn min_order(&self) -> Money {
        Money::from_kurus(self.min_order_kurus)
    }
}

/// A reusable background video admins can pick for a cafe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VideoPreset {
    pub id: String,
    pub name: String,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub duration_secs: u32,
    /// Exactly one preset is the default at a time.
    pub is_default: bool,
}

impl VideoPreset {
    /// Video settings for a cafe using this preset.
    pub fn to_video_config(&self) -> VideoConfig {
        VideoConfig {
            preset_id: Some(self.id.clone()),
            url: self.url.clone(),
            ..VideoConfig::default()
        }
    }
}

// =============================================================================
// Admin Drafts
// =============================================================================
// Create/update payloads. The server assigns ids and timestamps.

/// Product fields an admin can edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub cafe_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_kurus: i64,
    pub category: ProductCategory,
    #[serde(default)]
    pub badges: Vec<Badge>,
    pub image_url: Option<String>,
    pub nutrition: Option<Nutrition>,
    pub customization: Option<Customization>,
    pub is_available: bool,
    #[serde(default)]
    pub sort_order: i32,
}

impl ProductDraft {
    pub fn into_product(self, id: String, now: DateTime<Utc>) -> Product {
        Product {
            id,
            cafe_id: self.cafe_id,
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            price_kurus: self.price_kurus,
            category: self.category,
            badges: self.badges,
            image_url: self.image_url.filter(|u| !u.trim().is_empty()),
            nutrition: self.nutrition,
            customization: self.customization.filter(|c| !c.is_empty()),
            is_available: self.is_available,
            sort_order: self.sort_order,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites `product` with this draft, keeping id and creation time.
    pub fn apply_to(self, product: &Product, now: DateTime<Utc>) -> Product {
        let mut updated = self.into_product(product.id.clone(), now);
        updated.created_at = product.created_at;
        updated
    }
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        ProductDraft {
            cafe_id: product.cafe_id.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            price_kurus: product.price_kurus,
            category: product.category,
            badges: product.badges.clone(),
            image_url: product.image_url.clone(),
            nutrition: product.nutrition.clone(),
            customization: product.customization.clone(),
            is_available: product.is_available,
            sort_order: product.sort_order,
        }
    }
}

/// Promotional card fields an admin can edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CardDraft {
    pub cafe_id: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub image_url: Option<String>,
    pub background_color: String,
    pub cta_label: Option<String>,
    #[serde(default)]
    pub target: CardTarget,
    #[serde(default)]
    pub sort_order: i32,
    pub is_active: bool,
}

impl CardDraft {
    pub fn into_card(self, id: String) -> PromotionalCard {
        PromotionalCard {
            id,
            cafe_id: self.cafe_id,
            title: self.title.trim().to_string(),
            subtitle: self.subtitle.filter(|s| !s.trim().is_empty()),
            image_url: self.image_url.filter(|u| !u.trim().is_empty()),
            background_color: self.background_color,
            cta_label: self.cta_label.filter(|l| !l.trim().is_empty()),
            target: self.target,
            sort_order: self.sort_order,
            is_active: self.is_active,
        }
    }
}

/// Video preset fields an admin can edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VideoPresetDraft {
    pub name: String,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub duration_secs: u32,
    #[serde(default)]
    pub is_default: bool,
}

impl VideoPresetDraft {
    pub fn into_preset(self, id: String) -> VideoPreset {
        VideoPreset {
            id,
            name: self.name.trim().to_string(),
            url: self.url.trim().to_string(),
            thumbnail_url: self.thumbnail_url.filter(|u| !u.trim().is_empty()),
            duration_secs: self.duration_secs,
            is_default: self.is_default,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
