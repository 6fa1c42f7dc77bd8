//! # Order Types
//!
//! Form state, constraint validation, the order snapshot handed to a payment
//! strategy and the confirmation returned when a payment succeeds.

use crate::error::{CheckoutError, CheckoutResult};
use crate::method::PaymentMethod;
use crate::product::{Price, PricingTable, ShippingType};
use crate::summary::OrderSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Editable text fields on the order form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum FormField {
    Name,
    Email,
    Quantity,
    Address,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Email => "email",
            FormField::Quantity => "quantity",
            FormField::Address => "address",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormField {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(FormField::Name),
            "email" => Ok(FormField::Email),
            "quantity" => Ok(FormField::Quantity),
            "address" => Ok(FormField::Address),
            other => Err(CheckoutError::UnknownField(other.to_string())),
        }
    }
}

impl TryFrom<String> for FormField {
    type Error = CheckoutError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Constraint that a field failed (named after the browser's `ValidityState`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Violation {
    /// Required field left blank
    ValueMissing,
    /// Not a well-formed email address
    TypeMismatch,
    /// Not a whole number
    BadInput,
    /// Below the minimum of 1
    RangeUnderflow,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Violation::ValueMissing => "value missing",
            Violation::TypeMismatch => "type mismatch",
            Violation::BadInput => "bad input",
            Violation::RangeUnderflow => "range underflow",
        };
        f.write_str(s)
    }
}

/// A single failed constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: FormField,
    pub violation: Violation,
}

impl FieldViolation {
    pub fn new(field: FormField, violation: Violation) -> Self {
        Self { field, violation }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.violation)
    }
}

/// Live state of the order form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderForm {
    pub name: String,
    pub email: String,
    /// Raw text of the quantity input
    pub quantity: String,
    pub address: String,
    pub shipping_type: ShippingType,
    pub payment_method: PaymentMethod,
}

impl OrderForm {
    /// Blank form with the given payment method preselected
    pub fn new(payment_method: PaymentMethod) -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            quantity: "1".to_string(),
            address: String::new(),
            shipping_type: ShippingType::Standard,
            payment_method,
        }
    }

    /// Restore defaults, keeping `default_method` as the selected payment method
    pub fn reset(&mut self, default_method: PaymentMethod) {
        *self = Self::new(default_method);
    }

    /// Set a text field
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Name => self.name = value,
            FormField::Email => self.email = value,
            FormField::Quantity => self.quantity = value,
            FormField::Address => self.address = value,
        }
    }

    /// Builder: fill in customer details
    pub fn with_customer(
        mut self,
        name: impl Into<String>,
        email: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        self.name = name.into();
        self.email = email.into();
        self.address = address.into();
        self
    }

    /// Builder: set quantity text
    pub fn with_quantity(mut self, quantity: impl Into<String>) -> Self {
        self.quantity = quantity.into();
        self
    }

    /// All constraint violations, in field order
    pub fn violations(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();

        if self.name.trim().is_empty() {
            violations.push(FieldViolation::new(FormField::Name, Violation::ValueMissing));
        }

        if self.email.trim().is_empty() {
            violations.push(FieldViolation::new(FormField::Email, Violation::ValueMissing));
        } else if !is_valid_email(self.email.trim()) {
            violations.push(FieldViolation::new(FormField::Email, Violation::TypeMismatch));
        }

        if let Some(violation) = quantity_violation(&self.quantity) {
            violations.push(FieldViolation::new(FormField::Quantity, violation));
        }

        if self.address.trim().is_empty() {
            violations.push(FieldViolation::new(FormField::Address, Violation::ValueMissing));
        }

        violations
    }

    /// Check the form, failing with every violation found
    pub fn validate(&self) -> CheckoutResult<()> {
        let violations = self.violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(CheckoutError::FormInvalid { violations })
        }
    }

    /// Fresh summary for the current quantity and shipping selection
    pub fn summary(&self, pricing: &PricingTable) -> OrderSummary {
        OrderSummary::compute(pricing, &self.quantity, self.shipping_type)
    }
}

impl Default for OrderForm {
    fn default() -> Self {
        Self::new(PaymentMethod::default())
    }
}

fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    !local.is_empty()
        && !email.chars().any(char::is_whitespace)
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

fn quantity_violation(quantity: &str) -> Option<Violation> {
    let quantity = quantity.trim();
    if quantity.is_empty() {
        return Some(Violation::ValueMissing);
    }
    match quantity.parse::<i64>() {
        Err(_) => Some(Violation::BadInput),
        Ok(n) if n < 1 => Some(Violation::RangeUnderflow),
        Ok(_) => None,
    }
}

/// Snapshot of the customer's order handed to a payment strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderData {
    pub name: String,
    pub email: String,
    pub quantity: u32,
    pub address: String,
    pub shipping_type: ShippingType,
    pub total: Price,
    /// Product name, used in provider descriptions
    pub product_name: String,
}

impl OrderData {
    /// Build a snapshot from the form, recomputing the total
    pub fn from_form(form: &OrderForm, pricing: &PricingTable) -> Self {
        let summary = form.summary(pricing);
        Self {
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            quantity: summary.quantity,
            address: form.address.trim().to_string(),
            shipping_type: summary.shipping_type,
            total: summary.total,
            product_name: pricing.product.name.clone(),
        }
    }

    /// Purchase description (e.g., "Umbrella Baby x3")
    pub fn description(&self) -> String {
        format!("{} x{}", self.product_name, self.quantity)
    }

    /// Total as a plain fixed-point amount (e.g., "65.00")
    pub fn amount_value(&self) -> String {
        self.total.amount_string()
    }
}

/// What a provider reports back for a successful charge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    /// Provider name (e.g., "stripe", "paypal")
    pub provider: String,
    /// Provider's payment/transaction id
    pub payment_id: String,
    /// Provider's status string (e.g., "succeeded", "COMPLETED")
    pub status: String,
}

impl PaymentReceipt {
    pub fn new(
        provider: impl Into<String>,
        payment_id: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            payment_id: payment_id.into(),
            status: status.into(),
        }
    }
}

/// Result of a successful payment flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    /// Generated order id
    pub order_id: String,
    pub method: PaymentMethod,
    pub provider: String,
    pub payment_id: String,
    pub payment_status: String,
    pub total: Price,
    pub confirmed_at: DateTime<Utc>,
}

impl OrderConfirmation {
    pub fn new(method: PaymentMethod, order: &OrderData, receipt: PaymentReceipt) -> Self {
        Self {
            order_id: Uuid::new_v4().to_string(),
            method,
            provider: receipt.provider,
            payment_id: receipt.payment_id,
            payment_status: receipt.status,
            total: order.total,
            confirmed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> OrderForm {
        OrderForm::new(PaymentMethod::Card)
            .with_customer("Ana Ruiz", "ana@example.com", "12 Wharf Rd")
            .with_quantity("3")
    }

    #[test]
    fn test_valid_form() {
        assert!(filled_form().validate().is_ok());
    }

    #[test]
    fn test_blank_fields_missing() {
        let form = OrderForm::new(PaymentMethod::Card);
        let violations = form.violations();

        assert_eq!(
            violations,
            vec![
                FieldViolation::new(FormField::Name, Violation::ValueMissing),
                FieldViolation::new(FormField::Email, Violation::ValueMissing),
                FieldViolation::new(FormField::Address, Violation::ValueMissing),
            ]
        );
    }

    #[test]
    fn test_email_format() {
        for bad in ["ana", "ana@", "@example.com", "ana@example", "a@b@c.com", "ana @x.com", "ana@.com"] {
            let form = filled_form();
            let mut form = form;
            form.email = bad.to_string();
            assert_eq!(
                form.violations(),
                vec![FieldViolation::new(FormField::Email, Violation::TypeMismatch)],
                "email {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_quantity_constraints() {
        let cases = [
            ("", Violation::ValueMissing),
            ("2.5", Violation::BadInput),
            ("abc", Violation::BadInput),
            ("0", Violation::RangeUnderflow),
            ("-1", Violation::RangeUnderflow),
        ];
        for (input, expected) in cases {
            let form = filled_form().with_quantity(input);
            assert_eq!(
                form.violations(),
                vec![FieldViolation::new(FormField::Quantity, expected)],
                "quantity {:?}",
                input
            );
        }
    }

    #[test]
    fn test_order_data_snapshot() {
        let data = OrderData::from_form(&filled_form(), &PricingTable::default());

        assert_eq!(data.quantity, 3);
        assert_eq!(data.total, Price::from_cents(6500));
        assert_eq!(data.description(), "Umbrella Baby x3");
        assert_eq!(data.amount_value(), "65.00");
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut form = filled_form();
        form.shipping_type = ShippingType::Rural;
        form.reset(PaymentMethod::Wallet);

        assert_eq!(form, OrderForm::new(PaymentMethod::Wallet));
        assert_eq!(form.quantity, "1");
    }

    #[test]
    fn test_set_field() {
        let mut form = OrderForm::default();
        form.set("address".parse().unwrap(), "1 Main St");
        assert_eq!(form.address, "1 Main St");
        assert!("phone".parse::<FormField>().is_err());
    }

    #[test]
    fn test_confirmation_carries_receipt() {
        let data = OrderData::from_form(&filled_form(), &PricingTable::default());
        let receipt = PaymentReceipt::new("stripe", "pi_123", "succeeded");
        let confirmation = OrderConfirmation::new(PaymentMethod::Card, &data, receipt);

        assert_eq!(confirmation.provider, "stripe");
        assert_eq!(confirmation.total, data.total);
        assert!(Uuid::parse_str(&confirmation.order_id).is_ok());
    }
}
