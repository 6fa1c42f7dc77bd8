//! # Payment Methods
//!
//! The three payment methods offered on the form and the UI text that goes
//! with each of them.

use crate::error::CheckoutError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Payment method selected in the `payment-method` select
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum PaymentMethod {
    /// Wallet redirect (PayPal buttons)
    #[serde(rename = "paypal")]
    Wallet,
    /// Hosted card field (Stripe card element)
    #[serde(rename = "credit-card")]
    Card,
    /// Bank redirect (POLi)
    #[serde(rename = "poli")]
    BankRedirect,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Wallet,
        PaymentMethod::Card,
        PaymentMethod::BankRedirect,
    ];

    /// Value used by the `payment-method` select
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Wallet => "paypal",
            PaymentMethod::Card => "credit-card",
            PaymentMethod::BankRedirect => "poli",
        }
    }

    /// Id of the container shown while this method is selected
    pub fn panel_id(&self) -> &'static str {
        match self {
            PaymentMethod::Wallet => "paypal-button-container",
            PaymentMethod::Card => "stripe-card-container",
            PaymentMethod::BankRedirect => "poli-button-container",
        }
    }

    /// Button label while idle
    pub fn idle_label(&self) -> &'static str {
        match self {
            PaymentMethod::Wallet => "Pay with PayPal",
            PaymentMethod::Card => "Pay with Card",
            PaymentMethod::BankRedirect => "Pay with POLi",
        }
    }

    /// Button label while a payment is being processed
    pub fn processing_label(&self) -> &'static str {
        match self {
            PaymentMethod::BankRedirect => "Redirecting...",
            _ => "Processing...",
        }
    }

    /// Error banner text when a payment with this method fails
    pub fn failure_message(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "Payment failed. Please check your card details.",
            _ => "Payment failed. Please try again.",
        }
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Wallet
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| CheckoutError::UnknownPaymentMethod(s.to_string()))
    }
}

impl TryFrom<String> for PaymentMethod {
    type Error = CheckoutError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Which payment panels are shown; exactly one is visible at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelVisibility {
    pub wallet: bool,
    pub card: bool,
    pub bank_redirect: bool,
}

impl PanelVisibility {
    /// Show only the panel for `method`
    pub fn for_method(method: PaymentMethod) -> Self {
        Self {
            wallet: method == PaymentMethod::Wallet,
            card: method == PaymentMethod::Card,
            bank_redirect: method == PaymentMethod::BankRedirect,
        }
    }

    pub fn is_visible(&self, method: PaymentMethod) -> bool {
        match method {
            PaymentMethod::Wallet => self.wallet,
            PaymentMethod::Card => self.card,
            PaymentMethod::BankRedirect => self.bank_redirect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_select_values() {
        assert_eq!("paypal".parse::<PaymentMethod>().unwrap(), PaymentMethod::Wallet);
        assert_eq!("credit-card".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert_eq!("poli".parse::<PaymentMethod>().unwrap(), PaymentMethod::BankRedirect);
        assert!("bitcoin".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_serde_uses_select_values() {
        let json = serde_json::to_string(&PaymentMethod::Card).unwrap();
        assert_eq!(json, "\"credit-card\"");
        let method: PaymentMethod = serde_json::from_str("\"poli\"").unwrap();
        assert_eq!(method, PaymentMethod::BankRedirect);

        let err = serde_json::from_str::<PaymentMethod>("\"bitcoin\"").unwrap_err();
        assert!(err.to_string().contains("Unknown payment method: bitcoin"));
    }

    #[test]
    fn test_exactly_one_panel_visible() {
        for method in PaymentMethod::ALL {
            let panels = PanelVisibility::for_method(method);
            let visible = PaymentMethod::ALL
                .iter()
                .filter(|m| panels.is_visible(**m))
                .count();
            assert_eq!(visible, 1);
            assert!(panels.is_visible(method));
        }
    }

    #[test]
    fn test_method_text() {
        assert_eq!(PaymentMethod::BankRedirect.processing_label(), "Redirecting...");
        assert_eq!(PaymentMethod::Card.processing_label(), "Processing...");
        assert_eq!(
            PaymentMethod::Card.failure_message(),
            "Payment failed. Please check your card details."
        );
        assert_eq!(
            PaymentMethod::Wallet.failure_message(),
            "Payment failed. Please try again."
        );
    }
}
