//! # Demo Data
//!
//! Hardcoded cafes, menus and campaigns.
//!
//! ## Who Uses This
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cafe-client  DemoCatalog  ──► served when the API is unreachable      │
//! │  cafe-db      seed binary  ──► loaded into a fresh database            │
//! │  cafe-api     CAFE_SEED_DEMO=true ──► loaded on first start            │
//! │  tests        fixtures                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `DEMO` / `DEMO-1` opens the first cafe, `DEMO-2` the second, and so on.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::types::{
    AppConfig, Badge, Cafe, CardTarget, Customization, Discount, Nutrition, OptionChoice, Product,
    ProductCategory, PromoCode, PromotionalCard, VideoConfig, VideoPreset,
};

/// Every demo payload, built for a given "now".
#[derive(Debug, Clone)]
pub struct DemoData {
    pub cafes: Vec<Cafe>,
    pub products: Vec<Product>,
    pub cards: Vec<PromotionalCard>,
    pub app_configs: Vec<AppConfig>,
    pub video_presets: Vec<VideoPreset>,
    pub promo_codes: Vec<PromoCode>,
}

impl DemoData {
    /// Builds the demo network. Promo windows are relative to `now`.
    pub fn generate(now: DateTime<Utc>) -> Self {
        let video_presets = video_presets();
        DemoData {
            cafes: cafes(&video_presets),
            products: products(now),
            cards: promotional_cards(),
            app_configs: app_configs(now),
            video_presets,
            promo_codes: promo_codes(now),
        }
    }
}

const VIDEO_BASE: &str = "https://cdn.cafeorder.app/videos";
const IMAGE_BASE: &str = "https://cdn.cafeorder.app/images";

fn day(days_since_epoch: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(days_since_epoch * 86_400, 0)
        .single()
        .unwrap_or_default()
}

// =============================================================================
// Cafes & Videos
// =============================================================================

pub fn video_presets() -> Vec<VideoPreset> {
    vec![
        VideoPreset {
            id: "preset-espresso".to_string(),
            name: "Espresso akışı".to_string(),
            url: format!("{VIDEO_BASE}/espresso-pour.mp4"),
            thumbnail_url: Some(format!("{VIDEO_BASE}/espresso-pour.jpg")),
            duration_secs: 12,
            is_default: true,
        },
        VideoPreset {
            id: "preset-latte-art".to_string(),
            name: "Latte art".to_string(),
            url: format!("{VIDEO_BASE}/latte-art.mp4"),
            thumbnail_url: Some(format!("{VIDEO_BASE}/latte-art.jpg")),
            duration_secs: 18,
            is_default: false,
        },
        VideoPreset {
            id: "preset-tea-garden".to_string(),
            name: "Çay bahçesi".to_string(),
            url: format!("{VIDEO_BASE}/tea-garden.mp4"),
            thumbnail_url: None,
            duration_secs: 20,
            is_default: false,
        },
    ]
}

fn cafes(presets: &[VideoPreset]) -> Vec<Cafe> {
    let video = |index: usize, opacity: u8| {
        presets
            .get(index)
            .map(|p| VideoConfig {
                overlay_opacity: opacity,
                ..p.to_video_config()
            })
            .unwrap_or_default()
    };
    let slugs = |list: &[ProductCategory]| -> Vec<String> {
        list.iter().map(|c| c.as_str().to_string()).collect()
    };

    vec![
        Cafe {
            id: "moda-kahve".to_string(),
            name: "Moda Kahve Evi".to_string(),
            location: "Kadıköy, İstanbul".to_string(),
            categories: slugs(&[
                ProductCategory::Coffee,
                ProductCategory::HotDrinks,
                ProductCategory::ColdDrinks,
                ProductCategory::Desserts,
                ProductCategory::Bakery,
            ]),
            video: video(0, 40),
            qr_code: "MODA01".to_string(),
            is_active: true,
        },
        Cafe {
            id: "carsi-lab".to_string(),
            name: "Çarşı Coffee Lab".to_string(),
            location: "Beşiktaş, İstanbul".to_string(),
            categories: slugs(&[
                ProductCategory::Coffee,
                ProductCategory::ColdDrinks,
                ProductCategory::Breakfast,
                ProductCategory::Sandwiches,
                ProductCategory::Snacks,
            ]),
            video: video(1, 30),
            qr_code: "CARSI02".to_string(),
            is_active: true,
        },
        Cafe {
            id: "kordon-cay".to_string(),
            name: "Kordon Çay Bahçesi".to_string(),
            location: "Alsancak, İzmir".to_string(),
            categories: slugs(&[
                ProductCategory::Tea,
                ProductCategory::HotDrinks,
                ProductCategory::Breakfast,
                ProductCategory::Desserts,
                ProductCategory::Snacks,
            ]),
            video: video(2, 50),
            qr_code: "KORDON03".to_string(),
            is_active: true,
        },
    ]
}

// =============================================================================
// Products
// =============================================================================

fn coffee_options() -> Customization {
    Customization {
        sizes: vec![
            OptionChoice::new("small", "Küçük", 0),
            OptionChoice::new("medium", "Orta", 1_000),
            OptionChoice::new("large", "Büyük", 2_000),
        ],
        milks: vec![
            OptionChoice::new("whole", "Tam yağlı süt", 0),
            OptionChoice::new("lactose-free", "Laktozsuz süt", 800),
            OptionChoice::new("oat", "Yulaf sütü", 1_200),
            OptionChoice::new("almond", "Badem sütü", 1_200),
        ],
        extras: vec![
            OptionChoice::new("extra-shot", "Ekstra shot", 1_500),
            OptionChoice::new("vanilla", "Vanilya şurubu", 1_000),
            OptionChoice::new("caramel", "Karamel şurubu", 1_000),
        ],
    }
}

fn tea_options() -> Customization {
    Customization {
        sizes: vec![
            OptionChoice::new("glass", "İnce belli", 0),
            OptionChoice::new("mug", "Kupa", 1_000),
        ],
        milks: vec![],
        extras: vec![OptionChoice::new("lemon", "Limon", 0)],
    }
}

struct Item {
    id: &'static str,
    cafe: &'static str,
    name: &'static str,
    description: &'static str,
    price_kurus: i64,
    category: ProductCategory,
    badges: &'static [Badge],
    calories: u32,
    caffeine_mg: Option<u32>,
    allergens: &'static [&'static str],
}

const ITEMS: &[Item] = &[
    Item {
        id: "moda-latte",
        cafe: "moda-kahve",
        name: "Caffè Latte",
        description: "Çift shot espresso, buharla ısıtılmış süt",
        price_kurus: 8_500,
        category: ProductCategory::Coffee,
        badges: &[Badge::Popular],
        calories: 190,
        caffeine_mg: Some(130),
        allergens: &["süt"],
    },
    Item {
        id: "moda-flat-white",
        cafe: "moda-kahve",
        name: "Flat White",
        description: "Ristretto ve ipeksi mikro köpük",
        price_kurus: 9_000,
        category: ProductCategory::Coffee,
        badges: &[Badge::ChefPick],
        calories: 140,
        caffeine_mg: Some(150),
        allergens: &["süt"],
    },
    Item {
        id: "moda-turk-kahvesi",
        cafe: "moda-kahve",
        name: "Türk Kahvesi",
        description: "Közde pişirilmiş, lokum ile",
        price_kurus: 6_000,
        category: ProductCategory::HotDrinks,
        badges: &[],
        calories: 10,
        caffeine_mg: Some(60),
        allergens: &[],
    },
    Item {
        id: "moda-iced-americano",
        cafe: "moda-kahve",
        name: "Iced Americano",
        description: "Espresso, soğuk su ve buz",
        price_kurus: 7_500,
        category: ProductCategory::ColdDrinks,
        badges: &[Badge::Vegan],
        calories: 15,
        caffeine_mg: Some(150),
        allergens: &[],
    },
    Item {
        id: "moda-san-sebastian",
        cafe: "moda-kahve",
        name: "San Sebastian Cheesecake",
        description: "Yanık yüzeyli, akışkan kıvamlı",
        price_kurus: 14_500,
        category: ProductCategory::Desserts,
        badges: &[Badge::Popular, Badge::New],
        calories: 420,
        caffeine_mg: None,
        allergens: &["süt", "yumurta", "gluten"],
    },
    Item {
        id: "moda-kruvasan",
        cafe: "moda-kahve",
        name: "Tereyağlı Kruvasan",
        description: "Her sabah taze pişirilir",
        price_kurus: 6_500,
        category: ProductCategory::Bakery,
        badges: &[],
        calories: 270,
        caffeine_mg: None,
        allergens: &["gluten", "süt"],
    },
    Item {
        id: "carsi-cortado",
        cafe: "carsi-lab",
        name: "Cortado",
        description: "Eşit oranda espresso ve süt",
        price_kurus: 7_500,
        category: ProductCategory::Coffee,
        badges: &[],
        calories: 80,
        caffeine_mg: Some(130),
        allergens: &["süt"],
    },
    Item {
        id: "carsi-v60",
        cafe: "carsi-lab",
        name: "V60 Filtre",
        description: "Günün tek kökeni, elde demleme",
        price_kurus: 9_500,
        category: ProductCategory::Coffee,
        badges: &[Badge::ChefPick, Badge::Vegan],
        calories: 5,
        caffeine_mg: Some(180),
        allergens: &[],
    },
    Item {
        id: "carsi-cold-brew",
        cafe: "carsi-lab",
        name: "Cold Brew",
        description: "18 saat soğuk demleme",
        price_kurus: 9_000,
        category: ProductCategory::ColdDrinks,
        badges: &[Badge::Seasonal],
        calories: 5,
        caffeine_mg: Some(200),
        allergens: &[],
    },
    Item {
        id: "carsi-menemen",
        cafe: "carsi-lab",
        name: "Menemen",
        description: "Domates, biber, yumurta; köy ekmeği ile",
        price_kurus: 16_000,
        category: ProductCategory::Breakfast,
        badges: &[Badge::Spicy],
        calories: 380,
        caffeine_mg: None,
        allergens: &["yumurta", "gluten"],
    },
    Item {
        id: "carsi-tost",
        cafe: "carsi-lab",
        name: "Kaşarlı Tost",
        description: "Ekşi maya ekmeği, eski kaşar",
        price_kurus: 12_000,
        category: ProductCategory::Sandwiches,
        badges: &[],
        calories: 450,
        caffeine_mg: None,
        allergens: &["gluten", "süt"],
    },
    Item {
        id: "carsi-granola",
        cafe: "carsi-lab",
        name: "Granola Bar",
        description: "Hurma ve fındıkla",
        price_kurus: 5_500,
        category: ProductCategory::Snacks,
        badges: &[Badge::Vegan, Badge::GlutenFree],
        calories: 210,
        caffeine_mg: None,
        allergens: &["fındık"],
    },
    Item {
        id: "kordon-demleme-cay",
        cafe: "kordon-cay",
        name: "Demleme Çay",
        description: "Rize çayı, ince belli bardakta",
        price_kurus: 2_500,
        category: ProductCategory::Tea,
        badges: &[Badge::Popular],
        calories: 2,
        caffeine_mg: Some(40),
        allergens: &[],
    },
    Item {
        id: "kordon-sahlep",
        cafe: "kordon-cay",
        name: "Sahlep",
        description: "Tarçın ile",
        price_kurus: 7_000,
        category: ProductCategory::HotDrinks,
        badges: &[Badge::Seasonal],
        calories: 230,
        caffeine_mg: None,
        allergens: &["süt"],
    },
    Item {
        id: "kordon-serpme",
        cafe: "kordon-cay",
        name: "Serpme Kahvaltı",
        description: "İki kişilik, sınırsız çay ile",
        price_kurus: 45_000,
        category: ProductCategory::Breakfast,
        badges: &[Badge::ChefPick],
        calories: 1_400,
        caffeine_mg: None,
        allergens: &["süt", "yumurta", "gluten"],
    },
    Item {
        id: "kordon-boyoz",
        cafe: "kordon-cay",
        name: "Boyoz",
        description: "Haşlanmış yumurta ile",
        price_kurus: 4_000,
        category: ProductCategory::Snacks,
        badges: &[],
        calories: 310,
        caffeine_mg: None,
        allergens: &["gluten", "yumurta"],
    },
    Item {
        id: "kordon-sambali",
        cafe: "kordon-cay",
        name: "Şambali",
        description: "İzmir usulü irmik tatlısı",
        price_kurus: 8_000,
        category: ProductCategory::Desserts,
        badges: &[Badge::New],
        calories: 380,
        caffeine_mg: None,
        allergens: &["gluten", "süt", "fındık"],
    },
];

pub fn products(now: DateTime<Utc>) -> Vec<Product> {
    let mut sort_by_category: Vec<(String, ProductCategory, i32)> = Vec::new();

    ITEMS
        .iter()
        .map(|item| {
            let sort_order = match sort_by_category
                .iter_mut()
                .find(|(cafe, category, _)| cafe == item.cafe && *category == item.category)
            {
                Some((_, _, n)) => {
                    *n += 1;
                    *n
                }
                None => {
                    sort_by_category.push((item.cafe.to_string(), item.category, 1));
                    1
                }
            };

            let customization = match item.category {
                ProductCategory::Coffee => Some(coffee_options()),
                ProductCategory::Tea => Some(tea_options()),
                _ => None,
            };

            Product {
                id: item.id.to_string(),
                cafe_id: item.cafe.to_string(),
                name: item.name.to_string(),
                description: item.description.to_string(),
                price_kurus: item.price_kurus,
                category: item.category,
                badges: item.badges.to_vec(),
                image_url: Some(format!("{IMAGE_BASE}/{}.jpg", item.id)),
                nutrition: Some(Nutrition {
                    calories: item.calories,
                    caffeine_mg: item.caffeine_mg,
                    allergens: item.allergens.iter().map(|a| a.to_string()).collect(),
                    ..Nutrition::default()
                }),
                customization,
                is_available: true,
                sort_order,
                created_at: now,
                updated_at: now,
            }
        })
        .collect()
}

// =============================================================================
// Campaigns & Config
// =============================================================================

pub fn promotional_cards() -> Vec<PromotionalCard> {
    let card = |id: &str, cafe: &str, title: &str, color: &str, target: CardTarget, sort: i32| {
        PromotionalCard {
            id: id.to_string(),
            cafe_id: cafe.to_string(),
            title: title.to_string(),
            subtitle: None,
            image_url: None,
            background_color: color.to_string(),
            cta_label: None,
            target,
            sort_order: sort,
            is_active: true,
        }
    };

    vec![
        PromotionalCard {
            subtitle: Some("İlk siparişe %10 indirim: HOSGELDIN".to_string()),
            cta_label: Some("Menüye git".to_string()),
            ..card("card-moda-welcome", "moda-kahve", "Hoş geldin!", "#6F4E37", CardTarget::None, 1)
        },
        PromotionalCard {
            cta_label: Some("Dene".to_string()),
            ..card(
                "card-moda-cheesecake",
                "moda-kahve",
                "Yeni: San Sebastian",
                "#C08552",
                CardTarget::Product {
                    id: "moda-san-sebastian".to_string(),
                },
                2,
            )
        },
        PromotionalCard {
            subtitle: Some("100 TL üzeri 20 TL indirim: KAHVE20".to_string()),
            ..card(
                "card-carsi-kahve20",
                "carsi-lab",
                "Filtre kahve haftası",
                "#2E4057",
                CardTarget::Category {
                    slug: ProductCategory::Coffee.as_str().to_string(),
                },
                1,
            )
        },
        card(
            "card-kordon-breakfast",
            "kordon-cay",
            "Hafta sonu serpme kahvaltı",
            "#E07A5F",
            CardTarget::Category {
                slug: ProductCategory::Breakfast.as_str().to_string(),
            },
            1,
        ),
        PromotionalCard {
            cta_label: Some("Yol tarifi".to_string()),
            ..card(
                "card-kordon-map",
                "kordon-cay",
                "Kordon'da gün batımı",
                "#3D5A80",
                CardTarget::Url {
                    href: "https://maps.example.com/kordon-cay".to_string(),
                },
                2,
            )
        },
    ]
}

pub fn app_configs(now: DateTime<Utc>) -> Vec<AppConfig> {
    vec![
        AppConfig {
            welcome_message: "Moda'ya hoş geldiniz, kahveniz hazırlanıyor.".to_string(),
            featured_category: Some(ProductCategory::Coffee),
            ..AppConfig::default_for("moda-kahve", now)
        },
        AppConfig {
            primary_color: "#2E4057".to_string(),
            accent_color: "#F2A541".to_string(),
            welcome_message: "Çarşı Coffee Lab'e hoş geldiniz.".to_string(),
            min_order_kurus: 5_000,
            featured_category: Some(ProductCategory::ColdDrinks),
            ..AppConfig::default_for("carsi-lab", now)
        },
        AppConfig {
            primary_color: "#3D5A80".to_string(),
            accent_color: "#E07A5F".to_string(),
            welcome_message: "Çayınız demde!".to_string(),
            featured_category: Some(ProductCategory::Breakfast),
            ..AppConfig::default_for("kordon-cay", now)
        },
    ]
}

pub fn promo_codes(now: DateTime<Utc>) -> Vec<PromoCode> {
    vec![
        PromoCode {
            id: "promo-hosgeldin".to_string(),
            code: "HOSGELDIN".to_string(),
            discount: Discount::Percentage { bps: 1_000 },
            max_discount_kurus: Some(5_000),
            min_order_kurus: 0,
            valid_from: now - Duration::days(30),
            valid_until: now + Duration::days(365),
            usage_limit: None,
            usage_count: 0,
            is_active: true,
        },
        PromoCode {
            id: "promo-kahve20".to_string(),
            code: "KAHVE20".to_string(),
            discount: Discount::Fixed { kurus: 2_000 },
            max_discount_kurus: None,
            min_order_kurus: 10_000,
            valid_from: now - Duration::days(7),
            valid_until: now + Duration::days(90),
            usage_limit: Some(500),
            usage_count: 0,
            is_active: true,
        },
        PromoCode {
            id: "promo-yaz2023".to_string(),
            code: "YAZ2023".to_string(),
            discount: Discount::Percentage { bps: 1_500 },
            max_discount_kurus: None,
            min_order_kurus: 0,
            // 2023-06-01 .. 2023-09-01
            valid_from: day(19_509),
            valid_until: day(19_601),
            usage_limit: None,
            usage_count: 0,
            is_active: true,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::promo::{find_code, PromoRejection};
    use crate::qr::{parse_scan, resolve};
    use crate::validation::{
        validate_app_config, validate_card_draft, validate_product_name, validate_price,
    };
    use crate::Money;

    #[test]
    fn test_demo_shape() {
        let data = DemoData::generate(Utc::now());
        assert_eq!(data.cafes.len(), 3);
        assert!(data.products.len() >= 15);
        assert_eq!(data.app_configs.len(), data.cafes.len());
        assert_eq!(data.video_presets.iter().filter(|p| p.is_default).count(), 1);
    }

    #[test]
    fn test_every_product_belongs_to_a_cafe_category() {
        let data = DemoData::generate(Utc::now());
        for product in &data.products {
            let cafe = data
                .cafes
                .iter()
                .find(|c| c.id == product.cafe_id)
                .expect("product cafe exists");
            assert!(cafe.category_order().contains(&product.category), "{}", product.id);
            validate_product_name(&product.name).unwrap();
            validate_price(product.price_kurus).unwrap();
        }
    }

    #[test]
    fn test_demo_cards_and_configs_validate() {
        let data = DemoData::generate(Utc::now());
        for card in &data.cards {
            let draft = crate::types::CardDraft {
                cafe_id: card.cafe_id.clone(),
                title: card.title.clone(),
                subtitle: card.subtitle.clone(),
                image_url: card.image_url.clone(),
                background_color: card.background_color.clone(),
                cta_label: card.cta_label.clone(),
                target: card.target.clone(),
                sort_order: card.sort_order,
                is_active: card.is_active,
            };
            validate_card_draft(&draft).unwrap();
        }
        for config in &data.app_configs {
            validate_app_config(config).unwrap();
        }
    }

    #[test]
    fn test_demo_codes_resolve() {
        let data = DemoData::generate(Utc::now());
        let cafe = resolve(&parse_scan("DEMO-2").unwrap(), &data.cafes).unwrap();
        assert_eq!(cafe.id, "carsi-lab");
        let cafe = resolve(&parse_scan("kordon03").unwrap(), &data.cafes).unwrap();
        assert_eq!(cafe.id, "kordon-cay");
    }

    #[test]
    fn test_demo_promo_codes() {
        let now = Utc::now();
        let data = DemoData::generate(now);

        let welcome = find_code(&data.promo_codes, "hosgeldin").unwrap();
        assert_eq!(welcome.check(now, Money::from_kurus(10_000)).unwrap().kurus(), 1_000);

        let kahve = find_code(&data.promo_codes, "KAHVE20").unwrap();
        assert!(kahve.check(now, Money::from_kurus(9_000)).is_err());
        assert_eq!(kahve.check(now, Money::from_kurus(12_000)).unwrap().kurus(), 2_000);

        let expired = find_code(&data.promo_codes, "YAZ2023").unwrap();
        assert_eq!(
            expired.check(now, Money::from_kurus(10_000)),
            Err(PromoRejection::Expired)
        );
    }
}
