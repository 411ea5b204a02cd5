//! Price, discount and totals arithmetic.
//!
//! Carts, order groups and orders all carry the same three amounts. They are
//! never edited directly; they are always recomputed from their lines with
//! [`Totals::from_lines`] and, when a coupon applies, [`Totals::with_discount`].

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::shipping::round_money;

/// Price after a percentage discount (`0..=100`), rounded to cents.
pub fn discounted_price(price: Decimal, discount_percent: Decimal) -> Decimal {
    if discount_percent <= Decimal::ZERO {
        return price;
    }

    let discount = discount_percent.min(Decimal::ONE_HUNDRED);
    round_money(price - price * discount / Decimal::ONE_HUNDRED)
}

/// Amount a percentage coupon takes off `amount`, rounded to cents.
pub fn coupon_discount(amount: Decimal, percent: i32) -> Decimal {
    if percent <= 0 || amount <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let percent = Decimal::from(percent.min(100));
    round_money(amount * percent / Decimal::ONE_HUNDRED)
}

/// One priced line: unit price, quantity and the line's shipping fee.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricedLine {
    pub price: Decimal,
    pub quantity: i32,
    pub shipping_fee: Decimal,
}

impl PricedLine {
    pub fn merchandise(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// Merchandise plus shipping for this line.
    pub fn total(&self) -> Decimal {
        self.merchandise() + self.shipping_fee
    }
}

/// Derived money amounts of a cart, order group or order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub sub_total: Decimal,
    pub shipping_fees: Decimal,
    pub total: Decimal,
}

impl Totals {
    pub fn zero() -> Self {
        Self {
            sub_total: Decimal::ZERO,
            shipping_fees: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }

    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a PricedLine>) -> Self {
        let (sub_total, shipping_fees) = lines
            .into_iter()
            .fold((Decimal::ZERO, Decimal::ZERO), |(sub, ship), line| {
                (sub + line.merchandise(), ship + line.shipping_fee)
            });

        Self {
            sub_total,
            shipping_fees,
            total: sub_total + shipping_fees,
        }
    }

    /// Subtracts a discount from the total, never going below zero.
    pub fn with_discount(self, discount: Decimal) -> Self {
        Self {
            total: (self.total - discount).max(Decimal::ZERO),
            ..self
        }
    }

    /// Sums several totals, e.g. order groups into the order.
    pub fn sum<'a>(parts: impl IntoIterator<Item = &'a Totals>) -> Self {
        parts.into_iter().fold(Self::zero(), |acc, t| Self {
            sub_total: acc.sub_total + t.sub_total,
            shipping_fees: acc.shipping_fees + t.shipping_fees,
            total: acc.total + t.total,
        })
    }
}
