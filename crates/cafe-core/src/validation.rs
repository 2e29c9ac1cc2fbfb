//! # Validation Module
//!
//! Form validation for the customer and admin surfaces.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Mobile form                                                   │
//! │  └── Immediate feedback while typing                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: cafe-app command / cafe-api handler                           │
//! │  ├── Type validation (deserialization)                                  │
//! │  └── THIS MODULE: field rules, drafts                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                        │
//! │  └── NOT NULL / UNIQUE / foreign keys                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lengths count characters, not bytes: "Çikolatalı Kek" is 14 long.
//!
//! ## Usage
//! ```rust
//! use cafe_core::validation::{normalize_phone, validate_quantity};
//!
//! assert_eq!(normalize_phone("+90 532 123 45 67").unwrap(), "5321234567");
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::types::{
    AppConfig, CardDraft, CardTarget, Customization, OptionChoice, ProductCategory, ProductDraft,
    VideoPresetDraft,
};
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Highest price a product or option may carry: 100.000 TL.
pub const MAX_PRICE_KURUS: i64 = 100_000 * 100;

/// Longest video preset accepted, in seconds.
pub const MAX_VIDEO_SECS: u32 = 600;

// =============================================================================
// Helpers
// =============================================================================

fn check_length(field: &str, value: &str, min: usize, max: usize) -> ValidationResult<()> {
    let len = value.chars().count();
    if len == 0 {
        return Err(ValidationError::required(field));
    }
    if len < min {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min,
        });
    }
    if len > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

fn check_max_length(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

fn check_optional_url(field: &str, value: Option<&str>) -> ValidationResult<()> {
    match value {
        Some(url) if !url.trim().is_empty() => validate_url(field, url),
        _ => Ok(()),
    }
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - 2 to 80 characters after trimming
///
/// ## Example
/// ```rust
/// use cafe_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Türk Kahvesi").is_ok());
/// assert!(validate_product_name("").is_err());
/// assert!(validate_product_name("A").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    check_length("name", name.trim(), 2, 80)
}

/// Validates a customer's display name.
///
/// ## Rules
/// - 2 to 60 characters
/// - Letters, spaces, `.`, `'` and `-` only
pub fn validate_person_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();
    check_length("name", name, 2, 60)?;

    if !name
        .chars()
        .all(|c| c.is_alphabetic() || c.is_whitespace() || matches!(c, '.' | '\'' | '-'))
    {
        return Err(ValidationError::format("name", "must contain only letters"));
    }

    Ok(())
}

/// Validates a password.
///
/// ## Rules
/// - At least 6 characters, at most 128
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::required("password"));
    }
    check_length("password", password, 6, 128)
}

/// Normalizes a Turkish mobile number to its 10-digit form.
///
/// ## Accepted Input
/// ```text
/// +90 532 123 45 67   →  5321234567
/// 90 532 123 4567     →  5321234567
/// 0532-123-45-67      →  5321234567
/// (532) 123 45 67     →  5321234567
/// ```
///
/// The canonical number is 10 digits starting with `5`.
pub fn normalize_phone(phone: &str) -> ValidationResult<String> {
    let compact: String = phone
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.'))
        .collect();

    if compact.is_empty() {
        return Err(ValidationError::required("phone"));
    }

    let digits = if let Some(rest) = compact.strip_prefix("+90") {
        rest
    } else if compact.len() == 12 && compact.starts_with("90") {
        &compact[2..]
    } else if compact.len() == 11 && compact.starts_with('0') {
        &compact[1..]
    } else {
        compact.as_str()
    };

    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::format("phone", "must contain only digits"));
    }
    if digits.len() != 10 || !digits.starts_with('5') {
        return Err(ValidationError::format(
            "phone",
            "must be a mobile number like 05XX XXX XX XX",
        ));
    }

    Ok(digits.to_string())
}

/// Validates a `#RGB` or `#RRGGBB` color.
pub fn validate_hex_color(field: &str, color: &str) -> ValidationResult<()> {
    let color = color.trim();
    if color.is_empty() {
        return Err(ValidationError::required(field));
    }

    let valid = color
        .strip_prefix('#')
        .map(|hex| (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()))
        .unwrap_or(false);

    if !valid {
        return Err(ValidationError::format(field, "must be a color like #6F4E37"));
    }
    Ok(())
}

/// Validates an http(s) URL.
///
/// ## Example
/// ```rust
/// use cafe_core::validation::validate_url;
///
/// assert!(validate_url("imageUrl", "https://cdn.example.com/latte.jpg").is_ok());
/// assert!(validate_url("imageUrl", "ftp://example.com/x").is_err());
/// ```
pub fn validate_url(field: &str, url: &str) -> ValidationResult<()> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ValidationError::required(field));
    }
    check_max_length(field, url, 2048)?;

    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| ValidationError::format(field, "must start with http:// or https://"))?;

    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() || url.chars().any(char::is_whitespace) {
        return Err(ValidationError::format(field, "is not a valid address"));
    }
    Ok(())
}

/// Validates and normalizes a promo code.
///
/// ## Rules
/// - 3 to 20 characters
/// - `A-Z` and `0-9` after upper-casing
pub fn validate_promo_code_format(code: &str) -> ValidationResult<String> {
    let code = crate::promo::normalize_code(code);
    check_length("code", &code, 3, 20)?;

    if !code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
        return Err(ValidationError::format(
            "code",
            "must contain only letters A-Z and digits",
        ));
    }
    Ok(code)
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (returns the whole menu)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();
    check_max_length("query", query, 100)?;
    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (99)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product sheet: Add to cart                                             │
/// │                                                                         │
/// │  Customer taps + until quantity is 3                                    │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(3) ← THIS FUNCTION                                   │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"                │
/// │       ├── qty > 99? → Error: "quantity must be between 1 and 99"        │
/// │       └── OK → Cart::add_item                                           │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a product price in kuruş.
///
/// ## Example
/// ```rust
/// use cafe_core::validation::validate_price;
///
/// assert!(validate_price(8_500).is_ok());       // 85,00 TL
/// assert!(validate_price(0).is_err());          // free items are not sold
/// assert!(validate_price(10_000_001).is_err()); // over 100.000 TL
/// ```
pub fn validate_price(kurus: i64) -> ValidationResult<()> {
    if kurus <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }
    if kurus > MAX_PRICE_KURUS {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 1,
            max: MAX_PRICE_KURUS,
        });
    }
    Ok(())
}

// =============================================================================
// Draft Validators
// =============================================================================

fn validate_option_group(field: &str, options: &[OptionChoice]) -> ValidationResult<()> {
    let mut seen: Vec<&str> = Vec::with_capacity(options.len());
    for option in options {
        if option.id.trim().is_empty() {
            return Err(ValidationError::required(&format!("{field}.id")));
        }
        check_length(&format!("{field}.name"), option.name.trim(), 1, 40)?;
        if option.price_delta_kurus < 0 || option.price_delta_kurus > MAX_PRICE_KURUS {
            return Err(ValidationError::OutOfRange {
                field: format!("{field}.priceDelta"),
                min: 0,
                max: MAX_PRICE_KURUS,
            });
        }
        if seen.contains(&option.id.as_str()) {
            return Err(ValidationError::Duplicate {
                field: field.to_string(),
                value: option.id.clone(),
            });
        }
        seen.push(&option.id);
    }
    Ok(())
}

fn validate_customization(custom: &Customization) -> ValidationResult<()> {
    validate_option_group("sizes", &custom.sizes)?;
    validate_option_group("milks", &custom.milks)?;
    validate_option_group("extras", &custom.extras)
}

/// Validates a product create/update payload.
pub fn validate_product_draft(draft: &ProductDraft) -> ValidationResult<()> {
    if draft.cafe_id.trim().is_empty() {
        return Err(ValidationError::required("cafeId"));
    }
    validate_product_name(&draft.name)?;
    check_max_length("description", &draft.description, 500)?;
    validate_price(draft.price_kurus)?;
    check_optional_url("imageUrl", draft.image_url.as_deref())?;
    if let Some(custom) = &draft.customization {
        validate_customization(custom)?;
    }
    Ok(())
}

/// Validates a promotional card create/update payload.
pub fn validate_card_draft(draft: &CardDraft) -> ValidationResult<()> {
    if draft.cafe_id.trim().is_empty() {
        return Err(ValidationError::required("cafeId"));
    }
    check_length("title", draft.title.trim(), 2, 60)?;
    if let Some(subtitle) = &draft.subtitle {
        check_max_length("subtitle", subtitle, 120)?;
    }
    if let Some(label) = &draft.cta_label {
        check_max_length("ctaLabel", label, 24)?;
    }
    validate_hex_color("backgroundColor", &draft.background_color)?;
    check_optional_url("imageUrl", draft.image_url.as_deref())?;

    match &draft.target {
        CardTarget::None => {}
        CardTarget::Product { id } => {
            if id.trim().is_empty() {
                return Err(ValidationError::required("target.id"));
            }
        }
        CardTarget::Category { slug } => {
            slug.parse::<ProductCategory>()?;
        }
        CardTarget::Url { href } => validate_url("target.href", href)?,
    }
    Ok(())
}

/// Validates a cafe's app configuration.
pub fn validate_app_config(config: &AppConfig) -> ValidationResult<()> {
    if config.cafe_id.trim().is_empty() {
        return Err(ValidationError::required("cafeId"));
    }
    validate_hex_color("primaryColor", &config.primary_color)?;
    validate_hex_color("accentColor", &config.accent_color)?;
    check_optional_url("logoUrl", config.logo_url.as_deref())?;
    check_max_length("welcomeMessage", &config.welcome_message, 200)?;
    if config.min_order_kurus < 0 || config.min_order_kurus > MAX_PRICE_KURUS {
        return Err(ValidationError::OutOfRange {
            field: "minOrder".to_string(),
            min: 0,
            max: MAX_PRICE_KURUS,
        });
    }
    Ok(())
}

/// Validates a video preset create/update payload.
pub fn validate_video_preset(draft: &VideoPresetDraft) -> ValidationResult<()> {
    check_length("name", draft.name.trim(), 2, 60)?;
    validate_url("url", &draft.url)?;
    check_optional_url("thumbnailUrl", draft.thumbnail_url.as_deref())?;
    if draft.duration_secs == 0 || draft.duration_secs > MAX_VIDEO_SECS {
        return Err(ValidationError::OutOfRange {
            field: "durationSecs".to_string(),
            min: 1,
            max: MAX_VIDEO_SECS as i64,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product_draft() -> ProductDraft {
        ProductDraft {
            cafe_id: "cafe-1".to_string(),
            name: "Flat White".to_string(),
            description: "Çift shot, ipeksi süt".to_string(),
            price_kurus: 9_000,
            category: ProductCategory::Coffee,
            badges: vec![],
            image_url: Some("https://cdn.example.com/flat-white.jpg".to_string()),
            nutrition: None,
            customization: None,
            is_available: true,
            sort_order: 1,
        }
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Çay").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(" A ").is_err());
        assert!(validate_product_name(&"A".repeat(81)).is_err());
        // 80 multi-byte characters still pass
        assert!(validate_product_name(&"Ç".repeat(80)).is_ok());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(1).is_ok());
        assert!(validate_price(MAX_PRICE_KURUS).is_ok());
        assert!(validate_price(0).is_err());
        assert!(validate_price(-100).is_err());
        assert!(validate_price(MAX_PRICE_KURUS + 1).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(99).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(100).is_err());
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("+90 532 123 45 67").unwrap(), "5321234567");
        assert_eq!(normalize_phone("905321234567").unwrap(), "5321234567");
        assert_eq!(normalize_phone("0532-123-45-67").unwrap(), "5321234567");
        assert_eq!(normalize_phone("(532) 123 45 67").unwrap(), "5321234567");
        assert_eq!(normalize_phone("5321234567").unwrap(), "5321234567");

        assert!(normalize_phone("").is_err());
        assert!(normalize_phone("0212 123 45 67").is_err()); // landline
        assert!(normalize_phone("532123456").is_err());
        assert!(normalize_phone("53212345ab").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("gizli1").is_ok());
        assert!(matches!(
            validate_password("12345"),
            Err(ValidationError::TooShort { min: 6, .. })
        ));
        assert!(matches!(validate_password(""), Err(ValidationError::Required { .. })));
    }

    #[test]
    fn test_validate_person_name() {
        assert!(validate_person_name("Ayşe Yılmaz").is_ok());
        assert!(validate_person_name("O'Neil-Smith").is_ok());
        assert!(validate_person_name("A").is_err());
        assert!(validate_person_name("R2D2").is_err());
    }

    #[test]
    fn test_validate_hex_color() {
        assert!(validate_hex_color("color", "#fff").is_ok());
        assert!(validate_hex_color("color", "#6F4E37").is_ok());
        assert!(validate_hex_color("color", "6F4E37").is_err());
        assert!(validate_hex_color("color", "#6F4E3").is_err());
        assert!(validate_hex_color("color", "#GGGGGG").is_err());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("url", "http://localhost:8080/v.mp4").is_ok());
        assert!(validate_url("url", "https://").is_err());
        assert!(validate_url("url", "javascript:alert(1)").is_err());
        assert!(validate_url("url", "https://a b.com").is_err());
    }

    #[test]
    fn test_validate_promo_code_format() {
        assert_eq!(validate_promo_code_format(" kahve20 ").unwrap(), "KAHVE20");
        assert!(validate_promo_code_format("AB").is_err());
        assert!(validate_promo_code_format("HOŞGELDİN").is_err());
        assert!(validate_promo_code_format("WITH-DASH").is_err());
        assert!(validate_promo_code_format(&"A".repeat(21)).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  latte ").unwrap(), "latte");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"a".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_product_draft() {
        assert!(validate_product_draft(&product_draft()).is_ok());

        let mut draft = product_draft();
        draft.customization = Some(Customization {
            sizes: vec![
                OptionChoice::new("small", "Küçük", 0),
                OptionChoice::new("small", "Orta", 500),
            ],
            ..Default::default()
        });
        assert!(matches!(
            validate_product_draft(&draft),
            Err(ValidationError::Duplicate { .. })
        ));

        let mut draft = product_draft();
        draft.image_url = Some("not a url".to_string());
        assert!(validate_product_draft(&draft).is_err());

        let mut draft = product_draft();
        draft.image_url = Some(String::new());
        assert!(validate_product_draft(&draft).is_ok());
    }

    #[test]
    fn test_validate_card_draft() {
        let mut draft = CardDraft {
            cafe_id: "cafe-1".to_string(),
            title: "Kış menüsü".to_string(),
            subtitle: None,
            image_url: None,
            background_color: "#3E2723".to_string(),
            cta_label: Some("Keşfet".to_string()),
            target: CardTarget::Category {
                slug: "hot-drinks".to_string(),
            },
            sort_order: 0,
            is_active: true,
        };
        assert!(validate_card_draft(&draft).is_ok());

        draft.target = CardTarget::Category {
            slug: "pizza".to_string(),
        };
        assert!(validate_card_draft(&draft).is_err());

        draft.target = CardTarget::Url {
            href: "https://example.com/kampanya".to_string(),
        };
        assert!(validate_card_draft(&draft).is_ok());
    }

    #[test]
    fn test_validate_app_config() {
        let mut config = AppConfig::default_for("cafe-1", Utc::now());
        assert!(validate_app_config(&config).is_ok());

        config.primary_color = "brown".to_string();
        assert!(validate_app_config(&config).is_err());

        let mut config = AppConfig::default_for("cafe-1", Utc::now());
        config.min_order_kurus = -1;
        assert!(validate_app_config(&config).is_err());
    }

    #[test]
    fn test_validate_video_preset() {
        let mut draft = VideoPresetDraft {
            name: "Espresso akışı".to_string(),
            url: "https://videos.example.com/espresso.mp4".to_string(),
            thumbnail_url: None,
            duration_secs: 15,
            is_default: false,
        };
        assert!(validate_video_preset(&draft).is_ok());

        draft.duration_secs = 0;
        assert!(validate_video_preset(&draft).is_err());
    }
}
