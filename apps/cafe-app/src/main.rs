//! # Cafe Command Line
//!
//! Drives the ordering flow from a terminal. Every command prints JSON on
//! stdout; logs go to stderr.
//!
//! ## Usage
//! ```bash
//! cafe scan MODA01                 # or a link: https://cafeorder.app/c/moda-kahve
//! cafe preload
//! cafe menu --category coffee
//! cafe cart add moda-latte -q 2 --size large --milk oat
//! cafe cart promo HOSGELDIN
//! cafe checkout --table 7 --note "Az şekerli"
//! cafe history
//!
//! # No network at all: demo catalog and device accounts only
//! cafe --offline menu --search latte
//!
//! # Catalog management (staff or admin account)
//! cafe login --phone 5321234567 --password gizli123
//! cafe admin create-product '{"cafeId":"moda-kahve","name":"Cortado",...}'
//! ```
//!
//! ## Exit Codes
//! - `0` - success, result JSON on stdout
//! - `1` - command failed, `{"error": {"code", "message"}}` on stdout,
//!   or settings/database could not be opened (message on stderr)

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use cafe_app_lib::commands::{admin, auth, cafe, cart, checkout, menu, onboarding, preload};
use cafe_app_lib::{init_tracing, ApiError, ApiResult, AppContext, AppSettings};
use cafe_core::{OptionSelection, ProductCategory, ProductFilter};

#[derive(Debug, Parser)]
#[command(name = "cafe", version, about = "Order from a cafe by scanning its QR code")]
struct Cli {
    /// Never contact the API
    #[arg(long, global = true)]
    offline: bool,

    /// Base URL of the cafe API
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Onboarding, selected cafe, account and cart at a glance
    Status,
    /// Mark the welcome screens as seen
    Onboard,
    /// List the cafes that can be scanned
    Cafes,
    /// Select a cafe from a QR link, short code or demo code
    Scan { code: String },
    /// Forget the selected cafe and its cart
    Leave,
    /// Load the selected cafe's menu, cards and splash video
    Preload,
    /// Browse the menu of the selected cafe
    Menu {
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long, default_value = "")]
        search: String,
        /// Hide sold-out items
        #[arg(long)]
        available: bool,
    },
    /// Show one product
    Product { id: String },
    /// Promotional cards of the selected cafe
    Cards,
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: Option<CartAction>,
    },
    /// Place the order
    Checkout {
        #[arg(long)]
        note: Option<String>,
        #[arg(long)]
        table: Option<String>,
    },
    /// Orders placed on this device
    History,
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        password: String,
    },
    Login {
        #[arg(long)]
        phone: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    /// The signed-in account
    Whoami,
    /// Catalog management (staff and admin accounts)
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Debug, Subcommand)]
enum CartAction {
    Show,
    Add {
        product_id: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: i64,
        #[arg(long)]
        size: Option<String>,
        #[arg(long)]
        milk: Option<String>,
        /// Repeat for several extras
        #[arg(long = "extra")]
        extras: Vec<String>,
    },
    /// Set a line's quantity (0 removes it)
    Update { line_id: String, quantity: i64 },
    Remove { line_id: String },
    Clear,
    /// Apply a promo code
    Promo { code: String },
    /// Remove the promo code
    Unpromo,
}

/// Drafts and configs are passed as JSON, the same shape the API takes.
#[derive(Debug, Subcommand)]
enum AdminAction {
    CreateProduct { json: String },
    UpdateProduct { id: String, json: String },
    DeleteProduct { id: String },
    Cards {
        cafe_id: String,
        /// Include inactive cards
        #[arg(long)]
        all: bool,
    },
    CreateCard { json: String },
    UpdateCard { id: String, json: String },
    DeleteCard { id: String },
    Config { cafe_id: String },
    SaveConfig { json: String },
    Presets,
    CreatePreset { json: String },
    UpdatePreset { id: String, json: String },
    DeletePreset { id: String },
}

fn to_json<T: Serialize>(value: T) -> ApiResult<Value> {
    serde_json::to_value(value)
        .map_err(|e| ApiError::internal(format!("Cannot serialize result: {e}")))
}

fn parse_arg<T: DeserializeOwned>(raw: &str) -> ApiResult<T> {
    serde_json::from_str(raw).map_err(|e| ApiError::validation(format!("Invalid JSON: {e}")))
}

async fn run(ctx: &AppContext, command: Command) -> ApiResult<Value> {
    let AppContext {
        db,
        cart,
        session,
        catalog,
        ..
    } = ctx;

    match command {
        Command::Status => Ok(json!({
            "onboarding": onboarding::onboarding_status(db, session).await?,
            "cafe": cafe::current_cafe(session),
            "user": auth::current_user(session),
            "cart": cart.totals(),
            "offline": catalog.inner().is_offline(),
        })),
        Command::Onboard => to_json(onboarding::complete_onboarding(db, session).await?),
        Command::Cafes => to_json(cafe::list_cafes(catalog).await?),
        Command::Scan { code } => to_json(cafe::scan_code(db, catalog, session, cart, &code).await?),
        Command::Leave => to_json(cafe::leave_cafe(db, session, cart).await?),
        Command::Preload => {
            let loaded = preload::preload_cafe(catalog, session, |p| {
                let mark = if p.succeeded { "✓" } else { "~" };
                eprintln!("{mark} {:>3}% {}", p.percent, p.stage.label());
            })
            .await?;
            to_json(loaded)
        }
        Command::Menu {
            category,
            search,
            available,
        } => {
            let category = category
                .map(|c| c.parse::<ProductCategory>())
                .transpose()?;
            let filter = ProductFilter {
                query: search,
                category,
                available_only: available,
            };
            to_json(menu::list_menu(catalog, session, filter).await?)
        }
        Command::Product { id } => to_json(menu::get_product(catalog, &id).await?),
        Command::Cards => to_json(menu::list_promotional_cards(catalog, session).await?),
        Command::Cart { action } => run_cart(ctx, action.unwrap_or(CartAction::Show)).await,
        Command::Checkout { note, table } => {
            let request = checkout::CheckoutRequest {
                note,
                table_number: table,
            };
            to_json(checkout::checkout(db, catalog, session, cart, request).await?)
        }
        Command::History => to_json(checkout::order_history(db).await?),
        Command::Register {
            name,
            phone,
            password,
        } => {
            let request = auth::RegisterRequest {
                name,
                phone,
                password,
            };
            to_json(auth::register(db, catalog, session, request).await?)
        }
        Command::Login { phone, password } => {
            to_json(auth::login(db, catalog, session, &phone, &password).await?)
        }
        Command::Logout => to_json(auth::logout(db, session).await?),
        Command::Whoami => to_json(auth::current_user(session)),
        Command::Admin { action } => run_admin(ctx, action).await,
    }
}

async fn run_cart(ctx: &AppContext, action: CartAction) -> ApiResult<Value> {
    let AppContext {
        db,
        cart,
        session,
        catalog,
        ..
    } = ctx;

    let response = match action {
        CartAction::Show => cart::get_cart(cart),
        CartAction::Add {
            product_id,
            quantity,
            size,
            milk,
            extras,
        } => {
            let selection = OptionSelection { size, milk, extras };
            cart::add_to_cart(db, catalog, session, cart, &product_id, quantity, &selection).await?
        }
        CartAction::Update { line_id, quantity } => {
            cart::update_cart_item(db, cart, &line_id, quantity).await?
        }
        CartAction::Remove { line_id } => cart::remove_from_cart(db, cart, &line_id).await?,
        CartAction::Clear => cart::clear_cart(db, cart).await?,
        CartAction::Promo { code } => cart::apply_promo_code(db, catalog, cart, &code).await?,
        CartAction::Unpromo => cart::remove_promo_code(db, cart).await?,
    };
    to_json(response)
}

async fn run_admin(ctx: &AppContext, action: AdminAction) -> ApiResult<Value> {
    let AppContext {
        session, catalog, ..
    } = ctx;

    match action {
        AdminAction::CreateProduct { json } => {
            to_json(admin::create_product(catalog, session, parse_arg(&json)?).await?)
        }
        AdminAction::UpdateProduct { id, json } => {
            to_json(admin::update_product(catalog, session, &id, parse_arg(&json)?).await?)
        }
        AdminAction::DeleteProduct { id } => {
            to_json(admin::delete_product(catalog, session, &id).await?)
        }
        AdminAction::Cards { cafe_id, all } => {
            to_json(admin::list_cards(catalog, session, &cafe_id, all).await?)
        }
        AdminAction::CreateCard { json } => {
            to_json(admin::create_card(catalog, session, parse_arg(&json)?).await?)
        }
        AdminAction::UpdateCard { id, json } => {
            to_json(admin::update_card(catalog, session, &id, parse_arg(&json)?).await?)
        }
        AdminAction::DeleteCard { id } => to_json(admin::delete_card(catalog, session, &id).await?),
        AdminAction::Config { cafe_id } => to_json(admin::get_app_config(catalog, &cafe_id).await?),
        AdminAction::SaveConfig { json } => {
            to_json(admin::save_app_config(catalog, session, parse_arg(&json)?).await?)
        }
        AdminAction::Presets => to_json(admin::list_video_presets(catalog).await?),
        AdminAction::CreatePreset { json } => {
            to_json(admin::create_video_preset(catalog, session, parse_arg(&json)?).await?)
        }
        AdminAction::UpdatePreset { id, json } => {
            to_json(admin::update_video_preset(catalog, session, &id, parse_arg(&json)?).await?)
        }
        AdminAction::DeletePreset { id } => {
            to_json(admin::delete_video_preset(catalog, session, &id).await?)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut settings = AppSettings::load().context("failed to load settings")?;
    if cli.offline {
        settings.offline = true;
    }
    if let Some(url) = cli.api_url {
        settings.api_url = url;
        settings.validate().context("invalid --api-url")?;
    }

    let ctx = AppContext::open(settings)
        .await
        .context("failed to open the device database")?;
    let result = run(&ctx, cli.command).await;
    ctx.close().await;

    match result {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(err) => {
            println!("{}", serde_json::to_string_pretty(&json!({ "error": err }))?);
            std::process::exit(1);
        }
    }
}
