//! # Product & Pricing Types
//!
//! The single product on sale, shipping options and the pricing table.
//! Pricing is loaded from `config/pricing.toml` when present.

use crate::error::{CheckoutError, CheckoutResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, Mul};
use std::str::FromStr;

/// Unit price of the product, in dollars
pub const DEFAULT_UNIT_PRICE: f64 = 20.00;

/// Shipping cost for every shipping type, in dollars
pub const DEFAULT_SHIPPING_COST: f64 = 5.00;

/// Price with amount in the smallest currency unit (cents)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Price {
    /// Amount in cents
    pub amount: i64,
}

impl Price {
    /// Zero amount
    pub const ZERO: Price = Price { amount: 0 };

    /// Create a price from a decimal amount
    pub fn new(amount: f64) -> Self {
        Self {
            amount: (amount * 100.0).round() as i64,
        }
    }

    /// Create a price from cents
    pub fn from_cents(amount: i64) -> Self {
        Self { amount }
    }

    /// Fixed-point amount without symbol (e.g., "65.00")
    pub fn amount_string(&self) -> String {
        let sign = if self.amount < 0 { "-" } else { "" };
        let abs = self.amount.unsigned_abs();
        format!("{}{}.{:02}", sign, abs / 100, abs % 100)
    }

    /// Format for display (e.g., "$65.00")
    pub fn display(&self) -> String {
        format!("${}", self.amount_string())
    }
}

impl Add for Price {
    type Output = Price;

    fn add(self, rhs: Price) -> Price {
        Price {
            amount: self.amount.saturating_add(rhs.amount),
        }
    }
}

impl Mul<u32> for Price {
    type Output = Price;

    fn mul(self, quantity: u32) -> Price {
        Price {
            amount: self.amount.saturating_mul(quantity as i64),
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Shipping option chosen on the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ShippingType {
    Standard,
    Rural,
}

impl ShippingType {
    pub const ALL: [ShippingType; 2] = [ShippingType::Standard, ShippingType::Rural];

    /// Value used by the `shipping-type` select
    pub fn as_str(&self) -> &'static str {
        match self {
            ShippingType::Standard => "standard",
            ShippingType::Rural => "rural",
        }
    }
}

impl Default for ShippingType {
    fn default() -> Self {
        ShippingType::Standard
    }
}

impl fmt::Display for ShippingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShippingType {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(ShippingType::Standard),
            "rural" => Ok(ShippingType::Rural),
            other => Err(CheckoutError::UnknownShippingType(other.to_string())),
        }
    }
}

impl TryFrom<String> for ShippingType {
    type Error = CheckoutError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// The product being sold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier (e.g., "umbrella-baby")
    pub id: String,
    /// Display name, used in wallet purchase descriptions
    pub name: String,
    /// Price of one unit
    pub unit_price: Price,
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, unit_price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_price,
        }
    }
}

impl Default for Product {
    fn default() -> Self {
        Self::new("umbrella-baby", "Umbrella Baby", Price::new(DEFAULT_UNIT_PRICE))
    }
}

/// Pricing file layout (decimal amounts, as written by humans)
#[derive(Debug, Deserialize)]
struct PricingFile {
    product: ProductEntry,
    shipping: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct ProductEntry {
    id: String,
    name: String,
    unit_price: f64,
}

/// Product price plus a cost for every shipping type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingTable {
    pub product: Product,
    shipping: BTreeMap<ShippingType, Price>,
}

impl PricingTable {
    /// Create a table; every shipping type must have a cost
    pub fn new(product: Product, shipping: BTreeMap<ShippingType, Price>) -> CheckoutResult<Self> {
        if product.unit_price.amount < 0 {
            return Err(CheckoutError::Configuration(format!(
                "unit price for {} must not be negative",
                product.id
            )));
        }
        for shipping_type in ShippingType::ALL {
            match shipping.get(&shipping_type) {
                None => {
                    return Err(CheckoutError::Configuration(format!(
                        "no shipping cost for {}",
                        shipping_type
                    )))
                }
                Some(cost) if cost.amount < 0 => {
                    return Err(CheckoutError::Configuration(format!(
                        "shipping cost for {} must not be negative",
                        shipping_type
                    )))
                }
                Some(_) => {}
            }
        }
        Ok(Self { product, shipping })
    }

    /// Unit price of the product
    pub fn unit_price(&self) -> Price {
        self.product.unit_price
    }

    /// Shipping cost for a shipping type
    pub fn shipping_cost(&self, shipping_type: ShippingType) -> Price {
        // `new` guarantees an entry for every type
        self.shipping
            .get(&shipping_type)
            .copied()
            .unwrap_or(Price::ZERO)
    }

    /// Load pricing from a TOML string
    pub fn from_toml(toml_str: &str) -> CheckoutResult<Self> {
        let file: PricingFile = toml::from_str(toml_str)
            .map_err(|e| CheckoutError::Configuration(format!("invalid pricing file: {}", e)))?;

        let mut shipping = BTreeMap::new();
        for (name, cost) in file.shipping {
            let shipping_type: ShippingType = name
                .parse()
                .map_err(|_| CheckoutError::Configuration(format!("unknown shipping type {}", name)))?;
            let cost = decimal_price(&format!("shipping cost for {}", name), cost)?;
            shipping.insert(shipping_type, cost);
        }

        let unit_price = decimal_price(
            &format!("unit price for {}", file.product.id),
            file.product.unit_price,
        )?;
        let product = Product::new(file.product.id, file.product.name, unit_price);
        Self::new(product, shipping)
    }
}

/// TOML accepts `nan` and `inf`, which have no price in cents
fn decimal_price(what: &str, amount: f64) -> CheckoutResult<Price> {
    if amount.is_finite() {
        Ok(Price::new(amount))
    } else {
        Err(CheckoutError::Configuration(format!(
            "{} must be a finite amount, got {}",
            what, amount
        )))
    }
}

impl Default for PricingTable {
    fn default() -> Self {
        let shipping = ShippingType::ALL
            .into_iter()
            .map(|t| (t, Price::new(DEFAULT_SHIPPING_COST)))
            .collect();
        Self {
            product: Product::default(),
            shipping,
        }
    }
}
