//! # Promo Codes
//!
//! Validity rules and discount math for [`PromoCode`].
//!
//! ## Check Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  check(now, subtotal)                                                   │
//! │                                                                         │
//! │  is_active? ──no──► Inactive                                            │
//! │      │                                                                  │
//! │  now ≥ valid_from? ──no──► NotYetValid                                  │
//! │      │                                                                  │
//! │  now ≤ valid_until? ──no──► Expired                                     │
//! │      │                                                                  │
//! │  usage_count < usage_limit? ──no──► UsageLimitReached                   │
//! │      │                                                                  │
//! │  subtotal ≥ min_order? ──no──► MinimumNotMet                            │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  Ok(discount)   percentage: half-up bps of subtotal, capped             │
//! │                 fixed:      min(kurus, subtotal)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Checking a code and counting its use are separate steps. Two customers
//! may redeem the last use of a limited code at the same time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Discount, PromoCode};

/// Why a promo code cannot be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, Error)]
#[ts(export)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum PromoRejection {
    #[error("promo code is not active")]
    Inactive,

    #[error("promo code is not valid yet")]
    NotYetValid,

    #[error("promo code has expired")]
    Expired,

    #[error("promo code usage limit reached")]
    UsageLimitReached,

    #[error("order must be at least {} for this code", Money::from_kurus(*.minimum_kurus))]
    MinimumNotMet {
        #[serde(rename = "minimumKurus")]
        minimum_kurus: i64,
    },
}

/// Canonical form of a typed code: trimmed, upper-case.
///
/// ```rust
/// use cafe_core::promo::normalize_code;
///
/// assert_eq!(normalize_code("  hosgeldin "), "HOSGELDIN");
/// ```
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Finds a code in a list, ignoring case and surrounding whitespace.
pub fn find_code<'a>(codes: &'a [PromoCode], code: &str) -> Option<&'a PromoCode> {
    let wanted = normalize_code(code);
    codes.iter().find(|p| normalize_code(&p.code) == wanted)
}

impl PromoCode {
    /// Date window and usage limit only. Ignores the subtotal.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.window_check(now).is_ok()
    }

    fn window_check(&self, now: DateTime<Utc>) -> Result<(), PromoRejection> {
        if !self.is_active {
            return Err(PromoRejection::Inactive);
        }
        if now < self.valid_from {
            return Err(PromoRejection::NotYetValid);
        }
        if now > self.valid_until {
            return Err(PromoRejection::Expired);
        }
        if let Some(limit) = self.usage_limit {
            if self.usage_count >= limit {
                return Err(PromoRejection::UsageLimitReached);
            }
        }
        Ok(())
    }

    /// Full check, returning the discount the code gives on `subtotal`.
    pub fn check(&self, now: DateTime<Utc>, subtotal: Money) -> Result<Money, PromoRejection> {
        self.window_check(now)?;

        if subtotal.kurus() < self.min_order_kurus {
            return Err(PromoRejection::MinimumNotMet {
                minimum_kurus: self.min_order_kurus,
            });
        }

        Ok(self.raw_discount(subtotal))
    }

    /// Discount on `subtotal` ignoring the date window.
    ///
    /// Zero when the minimum order is not met. Used by the cart to
    /// recompute an already applied code after its contents change.
    pub fn discount_for(&self, subtotal: Money) -> Money {
        if subtotal.kurus() < self.min_order_kurus {
            return Money::zero();
        }
        self.raw_discount(subtotal)
    }

    fn raw_discount(&self, subtotal: Money) -> Money {
        if !subtotal.is_positive() {
            return Money::zero();
        }

        let discount = match self.discount {
            Discount::Percentage { bps } => {
                let amount = subtotal.percentage_of(bps);
                match self.max_discount_kurus {
                    Some(cap) => amount.min(Money::from_kurus(cap)),
                    None => amount,
                }
            }
            Discount::Fixed { kurus } => Money::from_kurus(kurus),
        };

        discount.min(subtotal)
    }

    /// Counts one redemption.
    pub fn record_use(&mut self) {
        self.usage_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn promo(discount: Discount) -> PromoCode {
        let now = Utc::now();
        PromoCode {
            id: "p1".to_string(),
            code: "TEST10".to_string(),
            discount,
            max_discount_kurus: None,
            min_order_kurus: 0,
            valid_from: now - Duration::days(1),
            valid_until: now + Duration::days(1),
            usage_limit: None,
            usage_count: 0,
            is_active: true,
        }
    }

    #[test]
    fn test_percentage_discount() {
        let code = promo(Discount::Percentage { bps: 1_000 });
        let discount = code.check(Utc::now(), Money::from_kurus(17_000)).unwrap();
        assert_eq!(discount.kurus(), 1_700);
    }

    #[test]
    fn test_percentage_discount_capped() {
        let mut code = promo(Discount::Percentage { bps: 5_000 });
        code.max_discount_kurus = Some(2_500);
        let discount = code.check(Utc::now(), Money::from_kurus(10_000)).unwrap();
        assert_eq!(discount.kurus(), 2_500);
    }

    #[test]
    fn test_fixed_discount_never_exceeds_subtotal() {
        let code = promo(Discount::Fixed { kurus: 2_000 });
        assert_eq!(code.check(Utc::now(), Money::from_kurus(5_000)).unwrap().kurus(), 2_000);
        assert_eq!(code.check(Utc::now(), Money::from_kurus(1_500)).unwrap().kurus(), 1_500);
    }

    #[test]
    fn test_invalid_outside_window() {
        let code = promo(Discount::Fixed { kurus: 100 });
        assert_eq!(
            code.check(Utc::now() + Duration::days(2), Money::from_kurus(1_000)),
            Err(PromoRejection::Expired)
        );
        assert_eq!(
            code.check(Utc::now() - Duration::days(2), Money::from_kurus(1_000)),
            Err(PromoRejection::NotYetValid)
        );
        assert!(!code.is_valid_at(Utc::now() + Duration::days(2)));
    }

    #[test]
    fn test_invalid_after_usage_limit() {
        let mut code = promo(Discount::Fixed { kurus: 100 });
        code.usage_limit = Some(2);
        assert!(code.is_valid_at(Utc::now()));

        code.record_use();
        code.record_use();
        assert_eq!(
            code.check(Utc::now(), Money::from_kurus(1_000)),
            Err(PromoRejection::UsageLimitReached)
        );
    }

    #[test]
    fn test_rejection_order() {
        let mut code = promo(Discount::Fixed { kurus: 100 });
        code.is_active = false;
        code.valid_until = Utc::now() - Duration::days(1);
        // inactive wins over expired
        assert_eq!(
            code.check(Utc::now(), Money::from_kurus(1_000)),
            Err(PromoRejection::Inactive)
        );
    }

    #[test]
    fn test_minimum_not_met() {
        let mut code = promo(Discount::Percentage { bps: 1_000 });
        code.min_order_kurus = 10_000;

        let err = code.check(Utc::now(), Money::from_kurus(9_999)).unwrap_err();
        assert_eq!(err, PromoRejection::MinimumNotMet { minimum_kurus: 10_000 });
        assert_eq!(err.to_string(), "order must be at least ₺100,00 for this code");
        assert!(code.discount_for(Money::from_kurus(9_999)).is_zero());
    }

    #[test]
    fn test_find_code_is_case_insensitive() {
        let codes = vec![promo(Discount::Fixed { kurus: 100 })];
        assert!(find_code(&codes, " test10").is_some());
        assert!(find_code(&codes, "OTHER").is_none());
    }
}
