//! # UI Actions
//!
//! Every interaction the checkout page supports, as data. The controller maps
//! each action to one handler and returns a typed outcome.
//!
//! ```json
//! {"type": "set_quantity", "value": "3"}
//! {"type": "select_payment_method", "method": "credit-card"}
//! {"type": "submit"}
//! ```

use crate::method::PaymentMethod;
use crate::order::{FormField, OrderConfirmation};
use crate::product::ShippingType;
use crate::summary::OrderSummary;
use serde::{Deserialize, Serialize};

/// A UI action on the checkout page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckoutAction {
    /// Text typed into a form field
    SetField { field: FormField, value: String },
    /// Quantity input changed
    SetQuantity { value: String },
    /// Shipping select changed
    SelectShipping { shipping_type: ShippingType },
    /// Payment method select changed
    SelectPaymentMethod { method: PaymentMethod },
    /// Pay button clicked; defaults to the selected method
    Submit {
        #[serde(default)]
        method: Option<PaymentMethod>,
    },
    /// Clear the form
    Reset,
}

impl CheckoutAction {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            CheckoutAction::SetField { .. } => "set_field",
            CheckoutAction::SetQuantity { .. } => "set_quantity",
            CheckoutAction::SelectShipping { .. } => "select_shipping",
            CheckoutAction::SelectPaymentMethod { .. } => "select_payment_method",
            CheckoutAction::Submit { .. } => "submit",
            CheckoutAction::Reset => "reset",
        }
    }
}

/// Result of a successfully handled action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionOutcome {
    /// Form state changed; carries the freshly derived summary
    Updated { summary: OrderSummary },
    /// Payment completed
    Paid { confirmation: OrderConfirmation },
    /// Form cleared
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_wire_format() {
        let action: CheckoutAction =
            serde_json::from_str(r#"{"type":"set_field","field":"email","value":"a@b.co"}"#).unwrap();
        assert_eq!(
            action,
            CheckoutAction::SetField {
                field: FormField::Email,
                value: "a@b.co".into()
            }
        );

        let action: CheckoutAction = serde_json::from_str(r#"{"type":"submit"}"#).unwrap();
        assert_eq!(action, CheckoutAction::Submit { method: None });

        let action: CheckoutAction =
            serde_json::from_str(r#"{"type":"select_shipping","shipping_type":"rural"}"#).unwrap();
        assert_eq!(action.name(), "select_shipping");
    }

    #[test]
    fn test_unknown_action_rejected() {
        assert!(serde_json::from_str::<CheckoutAction>(r#"{"type":"refund"}"#).is_err());
        assert!(serde_json::from_str::<CheckoutAction>(
            r#"{"type":"select_payment_method","method":"bitcoin"}"#
        )
        .is_err());
    }
}
