//! # Demo Seeder
//!
//! Loads the demo cafe network into a database file, creating it and
//! applying migrations if needed.
//!
//! ## Usage
//! ```bash
//! # Seed ./cafe_dev.db
//! cargo run -p cafe-db --bin seed
//!
//! # Seed another file, with an admin account
//! cargo run -p cafe-db --bin seed -- --db ./data/cafe.db \
//!     --admin-phone 5321234567 --admin-password gizli123
//! ```

use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use cafe_core::validation::{normalize_phone, validate_password};
use cafe_core::{User, UserRole};
use cafe_db::{hash_password, seed_demo, Database, DbConfig};

#[derive(Debug, Parser)]
#[command(name = "seed", about = "Load the demo cafe network into a database")]
struct Args {
    /// Database file path
    #[arg(short, long, default_value = "./cafe_dev.db")]
    db: PathBuf,

    /// Also create an admin account with this phone
    #[arg(long, requires = "admin_password")]
    admin_phone: Option<String>,

    #[arg(long)]
    admin_password: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let args = Args::parse();

    println!("Cafe Order Demo Seeder");
    println!("======================");
    println!("Database: {}", args.db.display());
    println!();

    let db = Database::new(DbConfig::new(&args.db)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let report = seed_demo(&db, Utc::now()).await?;
    println!();
    println!("  Cafes:          {}", report.cafes);
    println!("  Products:       {}", report.products);
    println!("  Cards:          {}", report.cards);
    println!("  App configs:    {}", report.app_configs);
    println!("  Video presets:  {}", report.video_presets);
    println!("  Promo codes:    {}", report.promo_codes);
    if report.total() == 0 {
        println!("⚠ Nothing new: database was already seeded");
    }

    if let (Some(phone), Some(password)) = (args.admin_phone, args.admin_password) {
        let phone = normalize_phone(&phone)?;
        validate_password(&password)?;

        if db.users().get_by_phone(&phone).await?.is_some() {
            println!("⚠ Account {phone} already exists, left unchanged");
        } else {
            let admin = User {
                id: Uuid::new_v4().to_string(),
                phone: phone.clone(),
                name: "Yönetici".to_string(),
                password_hash: hash_password(&password)?,
                role: UserRole::Admin,
                created_at: Utc::now(),
            };
            db.users().insert(&admin).await?;
            info!(phone = %phone, "Admin account created");
            println!("✓ Admin account {phone} created");
        }
    }

    db.close().await;
    println!();
    println!("✓ Seed complete!");
    Ok(())
}
