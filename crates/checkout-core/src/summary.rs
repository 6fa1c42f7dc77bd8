//! # Order Summary
//!
//! Derives subtotal, shipping cost and total from the quantity input and the
//! shipping selection. The calculator never fails: bad quantity input clamps
//! to one unit.

use crate::product::{Price, PricingTable, ShippingType};
use serde::{Deserialize, Serialize};

/// Parse a quantity the way the browser's `parseInt` does, clamped to >= 1.
///
/// Leading whitespace and an optional sign are accepted, then the leading
/// decimal digits are used and anything after them is ignored. No digits,
/// zero and negative values all give 1. There is no upper bound beyond
/// saturating at `u32::MAX`.
pub fn parse_quantity(input: &str) -> u32 {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: &str = {
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        &rest[..end]
    };

    if digits.is_empty() || negative {
        return 1;
    }

    let value = digits.bytes().fold(0u64, |acc, b| {
        acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
    });

    value.clamp(1, u64::from(u32::MAX)) as u32
}

/// Pricing numbers for the current form state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub quantity: u32,
    pub unit_price: Price,
    pub shipping_type: ShippingType,
    pub subtotal: Price,
    pub shipping_cost: Price,
    pub total: Price,
}

impl OrderSummary {
    /// Compute a fresh summary from raw quantity input and a shipping type
    pub fn compute(pricing: &PricingTable, quantity_input: &str, shipping_type: ShippingType) -> Self {
        Self::for_quantity(pricing, parse_quantity(quantity_input), shipping_type)
    }

    /// Compute a summary for an already-clamped quantity
    pub fn for_quantity(pricing: &PricingTable, quantity: u32, shipping_type: ShippingType) -> Self {
        let quantity = quantity.max(1);
        let unit_price = pricing.unit_price();
        let subtotal = unit_price * quantity;
        let shipping_cost = pricing.shipping_cost(shipping_type);

        Self {
            quantity,
            unit_price,
            shipping_type,
            subtotal,
            shipping_cost,
            total: subtotal + shipping_cost,
        }
    }

    /// Currency-formatted strings for the three display fields
    pub fn display(&self) -> SummaryDisplay {
        SummaryDisplay {
            subtotal: self.subtotal.display(),
            shipping: self.shipping_cost.display(),
            total: self.total.display(),
        }
    }
}

/// What the product-price, shipping-cost and total-price fields show
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryDisplay {
    pub subtotal: String,
    pub shipping: String,
    pub total: String,
}

impl Default for SummaryDisplay {
    fn default() -> Self {
        OrderSummary::for_quantity(&PricingTable::default(), 1, ShippingType::Standard).display()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("3"), 3);
        assert_eq!(parse_quantity("  12"), 12);
        assert_eq!(parse_quantity("+4"), 4);
        assert_eq!(parse_quantity("3.7"), 3);
        assert_eq!(parse_quantity("2abc"), 2);
        assert_eq!(parse_quantity("007"), 7);
    }

    #[test]
    fn test_parse_quantity_clamps_to_one() {
        for input in ["", "0", "-5", "abc", "  ", "-", "e3", ".5"] {
            assert_eq!(parse_quantity(input), 1, "input {:?}", input);
        }
    }

    #[test]
    fn test_parse_quantity_saturates() {
        assert_eq!(parse_quantity("99999999999999999999999"), u32::MAX);
    }

    #[test]
    fn test_standard_shipping_scenario() {
        let summary = OrderSummary::compute(&PricingTable::default(), "3", ShippingType::Standard);
        let display = summary.display();

        assert_eq!(display.subtotal, "$60.00");
        assert_eq!(display.shipping, "$5.00");
        assert_eq!(display.total, "$65.00");
    }

    #[test]
    fn test_invalid_quantity_is_one_unit() {
        let pricing = PricingTable::default();
        for input in ["0", "not a number"] {
            let summary = OrderSummary::compute(&pricing, input, ShippingType::Standard);
            assert_eq!(summary.quantity, 1);
            assert_eq!(summary.display().subtotal, "$20.00");
            assert_eq!(summary.display().total, "$25.00");
        }
    }

    #[test]
    fn test_shipping_types_priced_equally() {
        let pricing = PricingTable::default();
        for shipping_type in ShippingType::ALL {
            let summary = OrderSummary::compute(&pricing, "2", shipping_type);
            assert_eq!(summary.display().shipping, "$5.00");
            assert_eq!(summary.total, summary.subtotal + summary.shipping_cost);
        }
    }

    #[test]
    fn test_total_always_two_decimals() {
        let pricing = PricingTable::default();
        for q in 1..=50u32 {
            let summary = OrderSummary::compute(&pricing, &q.to_string(), ShippingType::Rural);
            let total = summary.display().total;
            let decimals = total.rsplit('.').next().unwrap();
            assert_eq!(decimals.len(), 2);
            assert_eq!(summary.total.amount, 2000 * i64::from(q) + 500);
        }
    }
}
