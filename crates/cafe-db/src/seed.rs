//! # Demo Seeding
//!
//! Loads [`DemoData`] into a database: three cafes with menus, cards,
//! configs, video presets and promo codes.
//!
//! Rows that already exist (same primary key or unique code) are left
//! alone, so seeding an already seeded database is a no-op.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use cafe_core::demo::DemoData;

use crate::error::{DbError, DbResult};
use crate::pool::Database;

/// Row counts written by one seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub cafes: usize,
    pub products: usize,
    pub cards: usize,
    pub app_configs: usize,
    pub video_presets: usize,
    pub promo_codes: usize,
}

impl SeedReport {
    pub fn total(&self) -> usize {
        self.cafes
            + self.products
            + self.cards
            + self.app_configs
            + self.video_presets
            + self.promo_codes
    }
}

/// `Ok(true)` if inserted, `Ok(false)` if the row already existed.
fn inserted(result: DbResult<()>) -> DbResult<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(DbError::UniqueViolation { field, .. }) => {
            debug!(field = %field, "Seed row already present");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Seeds the demo network generated for `now`.
pub async fn seed_demo(db: &Database, now: DateTime<Utc>) -> DbResult<SeedReport> {
    let data = DemoData::generate(now);
    let mut report = SeedReport::default();

    for preset in &data.video_presets {
        if inserted(db.video_presets().insert(preset).await)? {
            report.video_presets += 1;
        }
    }

    for cafe in &data.cafes {
        if inserted(db.cafes().insert(cafe).await)? {
            report.cafes += 1;
        }
    }

    for product in &data.products {
        if inserted(db.products().insert(product).await)? {
            report.products += 1;
        }
    }

    for card in &data.cards {
        if inserted(db.promo_cards().insert(card).await)? {
            report.cards += 1;
        }
    }

    for config in &data.app_configs {
        if db.app_configs().get(&config.cafe_id).await?.is_none() {
            db.app_configs().upsert(config).await?;
            report.app_configs += 1;
        }
    }

    for promo in &data.promo_codes {
        if inserted(db.promo_codes().insert(promo).await)? {
            report.promo_codes += 1;
        }
    }

    info!(
        cafes = report.cafes,
        products = report.products,
        cards = report.cards,
        promo_codes = report.promo_codes,
        "Demo data seeded"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();

        let first = seed_demo(&db, now).await.unwrap();
        let data = DemoData::generate(now);
        assert_eq!(first.cafes, data.cafes.len());
        assert_eq!(first.products, data.products.len());
        assert_eq!(first.promo_codes, data.promo_codes.len());

        let second = seed_demo(&db, now).await.unwrap();
        assert_eq!(second.total(), 0);
    }

    #[tokio::test]
    async fn test_seeded_menu_readable() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_demo(&db, Utc::now()).await.unwrap();

        let cafe = db.cafes().get_by_qr_code("MODA01").await.unwrap().unwrap();
        let menu = db.products().list_by_cafe(&cafe.id, None).await.unwrap();
        assert!(!menu.is_empty());
        assert!(menu.iter().all(|p| p.cafe_id == cafe.id));

        assert!(db.promo_codes().get_by_code("hosgeldin").await.unwrap().is_some());
        assert_eq!(
            db.video_presets().get_default().await.unwrap().unwrap().id,
            "preset-espresso"
        );
    }
}
