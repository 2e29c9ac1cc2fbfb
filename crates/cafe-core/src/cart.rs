//! # Cart
//!
//! The customer's cart for one cafe: lines, option pricing, promo code and
//! totals.
//!
//! ## Line Identity
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_item(Latte, 1, {size: large, milk: oat})  ──► line A  qty 1        │
//! │  add_item(Latte, 2, {size: large, milk: oat})  ──► line A  qty 3        │
//! │  add_item(Latte, 1, {size: small})             ──► line B  qty 1        │
//! │                                                                         │
//! │  Same product + same options = same line. Lines are addressed by        │
//! │  line_id, not product_id, because one product may sit on many lines.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Totals
//! The applied promo code is stored, not its discount. The discount is
//! recomputed from the current subtotal on every read, so removing items
//! can drop a code below its minimum and the discount falls to zero.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Order, OrderItem, OrderStatus, Product, PromoCode};
use crate::validation::validate_quantity;
use crate::{MAX_CART_LINES, MAX_ITEM_QUANTITY};

// =============================================================================
// Option Selection
// =============================================================================

/// Customization group an option belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OptionGroup {
    Size,
    Milk,
    Extra,
}

/// A resolved option on a cart line, with its price frozen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SelectedOption {
    pub group: OptionGroup,
    pub id: String,
    pub name: String,
    pub price_delta_kurus: i64,
}

/// Option ids picked on the product sheet, not yet checked.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OptionSelection {
    pub size: Option<String>,
    pub milk: Option<String>,
    #[serde(default)]
    pub extras: Vec<String>,
}

impl OptionSelection {
    pub fn is_empty(&self) -> bool {
        self.size.is_none() && self.milk.is_none() && self.extras.is_empty()
    }
}

/// Checks the chosen option ids against the product's customization.
///
/// Returns the options in canonical order (size, milk, extras by id) so two
/// equal selections always compare equal.
pub fn resolve_selection(
    product: &Product,
    selection: &OptionSelection,
) -> CoreResult<Vec<SelectedOption>> {
    if selection.is_empty() {
        return Ok(Vec::new());
    }

    let invalid = |option_id: &str| CoreError::InvalidOption {
        product: product.name.clone(),
        option_id: option_id.to_string(),
    };

    let Some(custom) = product.customization.as_ref() else {
        let first = selection
            .size
            .as_deref()
            .or(selection.milk.as_deref())
            .or(selection.extras.first().map(String::as_str))
            .unwrap_or_default();
        return Err(invalid(first));
    };

    let mut options = Vec::new();

    if let Some(id) = selection.size.as_deref() {
        let choice = custom.find_size(id).ok_or_else(|| invalid(id))?;
        options.push(selected(OptionGroup::Size, choice));
    }

    if let Some(id) = selection.milk.as_deref() {
        let choice = custom.find_milk(id).ok_or_else(|| invalid(id))?;
        options.push(selected(OptionGroup::Milk, choice));
    }

    let mut extras: Vec<&str> = selection.extras.iter().map(String::as_str).collect();
    extras.sort_unstable();
    for pair in extras.windows(2) {
        if pair[0] == pair[1] {
            return Err(ValidationError::Duplicate {
                field: "extra".to_string(),
                value: pair[0].to_string(),
            }
            .into());
        }
    }
    for id in extras {
        let choice = custom.find_extra(id).ok_or_else(|| invalid(id))?;
        options.push(selected(OptionGroup::Extra, choice));
    }

    Ok(options)
}

fn selected(group: OptionGroup, choice: &crate::types::OptionChoice) -> SelectedOption {
    SelectedOption {
        group,
        id: choice.id.clone(),
        name: choice.name.clone(),
        price_delta_kurus: choice.price_delta_kurus,
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// A line in the cart.
///
/// Name and price are frozen when the line is created. If the menu changes
/// afterwards the cart keeps what the customer saw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub line_id: String,
    pub product_id: String,
    /// Product name at time of adding (frozen)
    pub name: String,
    /// Base price plus option deltas at time of adding (frozen)
    pub unit_price_kurus: i64,
    pub quantity: i64,
    #[serde(default)]
    pub options: Vec<SelectedOption>,
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    fn new(product: &Product, quantity: i64, options: Vec<SelectedOption>) -> Self {
        let deltas: i64 = options.iter().map(|o| o.price_delta_kurus).sum();
        CartItem {
            line_id: Uuid::new_v4().to_string(),
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price_kurus: product.price_kurus + deltas,
            quantity,
            options,
            added_at: Utc::now(),
        }
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_kurus(self.unit_price_kurus)
    }

    /// unit price × quantity
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }

    fn to_order_item(&self) -> OrderItem {
        OrderItem {
            product_id: self.product_id.clone(),
            name: self.name.clone(),
            unit_price_kurus: self.unit_price_kurus,
            quantity: self.quantity,
            options: self.options.clone(),
            line_total_kurus: self.line_total().kurus(),
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// A promo code attached to the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AppliedPromo {
    pub promo: PromoCode,
    #[ts(as = "String")]
    pub applied_at: DateTime<Utc>,
}

/// Extra checkout details typed by the customer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutDetails {
    pub user_id: Option<String>,
    pub note: Option<String>,
    pub table_number: Option<String>,
}

/// The shopping cart of one cafe.
///
/// ## Invariants
/// - Every line belongs to `cafe_id`
/// - `subtotal == Σ unit_price × quantity`
/// - `total == subtotal - discount`, never negative
/// - At most [`MAX_CART_LINES`] lines, each at most [`MAX_ITEM_QUANTITY`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub cafe_id: String,
    pub items: Vec<CartItem>,
    pub promo: Option<AppliedPromo>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates an empty cart for a cafe.
    pub fn new(cafe_id: &str) -> Self {
        Cart {
            cafe_id: cafe_id.to_string(),
            items: Vec::new(),
            promo: None,
            created_at: Utc::now(),
        }
    }

    /// Adds a product, merging into an existing line with the same options.
    ///
    /// Returns the id of the line that now holds the product.
    pub fn add_item(
        &mut self,
        product: &Product,
        quantity: i64,
        selection: &OptionSelection,
    ) -> CoreResult<String> {
        validate_quantity(quantity)?;

        if product.cafe_id != self.cafe_id {
            return Err(CoreError::WrongCafe {
                product_id: product.id.clone(),
                cafe_id: self.cafe_id.clone(),
            });
        }
        if !product.is_available {
            return Err(CoreError::ProductUnavailable {
                name: product.name.clone(),
            });
        }

        let options = resolve_selection(product, selection)?;

        if let Some(item) = self
            .items
            .iter_mut()
            .find(|i| i.product_id == product.id && i.options == options)
        {
            let new_qty = item.quantity + quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            item.quantity = new_qty;
            return Ok(item.line_id.clone());
        }

        if self.items.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        let item = CartItem::new(product, quantity, options);
        let line_id = item.line_id.clone();
        self.items.push(item);
        Ok(line_id)
    }

    /// Sets the quantity of a line. Zero removes it.
    pub fn update_quantity(&mut self, line_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove_item(line_id);
        }
        validate_quantity(quantity)?;

        let item = self
            .items
            .iter_mut()
            .find(|i| i.line_id == line_id)
            .ok_or_else(|| CoreError::LineNotFound(line_id.to_string()))?;
        item.quantity = quantity;
        Ok(())
    }

    pub fn remove_item(&mut self, line_id: &str) -> CoreResult<()> {
        let initial_len = self.items.len();
        self.items.retain(|i| i.line_id != line_id);

        if self.items.len() == initial_len {
            Err(CoreError::LineNotFound(line_id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Empties the cart and drops the promo code.
    pub fn clear(&mut self) {
        self.items.clear();
        self.promo = None;
        self.created_at = Utc::now();
    }

    /// Number of lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of quantities across lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Discount of the applied promo against the current subtotal.
    pub fn discount(&self) -> Money {
        match &self.promo {
            Some(applied) => applied.promo.discount_for(self.subtotal()),
            None => Money::zero(),
        }
    }

    pub fn total(&self) -> Money {
        let total = self.subtotal() - self.discount();
        if total.is_negative() {
            Money::zero()
        } else {
            total
        }
    }

    /// Checks a promo code against the cart and attaches it.
    ///
    /// Replaces any code applied before. Returns the discount it gives now.
    pub fn apply_promo(&mut self, promo: PromoCode, now: DateTime<Utc>) -> CoreResult<Money> {
        let discount = promo
            .check(now, self.subtotal())
            .map_err(|reason| CoreError::PromoRejected {
                code: promo.code.clone(),
                reason,
            })?;

        self.promo = Some(AppliedPromo {
            promo,
            applied_at: now,
        });
        Ok(discount)
    }

    pub fn clear_promo(&mut self) {
        self.promo = None;
    }

    /// Code of the applied promo, if any.
    pub fn promo_code(&self) -> Option<&str> {
        self.promo.as_ref().map(|p| p.promo.code.as_str())
    }

    /// Turns the cart into a pending order.
    ///
    /// `min_order` is the cafe's minimum, compared against the subtotal.
    pub fn to_order(
        &self,
        details: CheckoutDetails,
        min_order: Money,
        now: DateTime<Utc>,
    ) -> CoreResult<Order> {
        if self.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let subtotal = self.subtotal();
        if subtotal < min_order {
            return Err(CoreError::BelowMinimumOrder {
                minimum: min_order.format_try(),
                total: subtotal.format_try(),
            });
        }

        let discount = self.discount();
        let id = Uuid::new_v4().to_string();
        Ok(Order {
            order_number: Order::number_for(&id, now),
            id,
            cafe_id: self.cafe_id.clone(),
            user_id: details.user_id,
            items: self.items.iter().map(CartItem::to_order_item).collect(),
            subtotal_kurus: subtotal.kurus(),
            discount_kurus: discount.kurus(),
            total_kurus: self.total().kurus(),
            promo_code: if discount.is_zero() {
                None
            } else {
                self.promo_code().map(str::to_string)
            },
            status: OrderStatus::Pending,
            note: details.note.filter(|n| !n.trim().is_empty()),
            table_number: details.table_number.filter(|t| !t.trim().is_empty()),
            created_at: now,
            updated_at: now,
        })
    }
}

/// Cart totals summary for API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal_kurus: i64,
    pub discount_kurus: i64,
    pub total_kurus: i64,
    pub promo_code: Option<String>,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            subtotal_kurus: cart.subtotal().kurus(),
            discount_kurus: cart.discount().kurus(),
            total_kurus: cart.total().kurus(),
            promo_code: cart.promo_code().map(str::to_string),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
