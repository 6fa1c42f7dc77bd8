//! # Hosted Card Field
//!
//! Card payments through a hosted card-entry element. The element is mounted
//! once when the page loads. Confirming the payment intent server-side is not
//! wired up; `charge` simulates the provider round-trip.

use crate::config::{GatewayConfig, SimulatedOutcome};
use async_trait::async_trait;
use checkout_core::{
    CheckoutError, CheckoutResult, OrderData, PaymentMethod, PaymentReceipt, PaymentStrategy,
    Widget, WidgetKind,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Element id the card field mounts into
pub const CARD_ELEMENT_ID: &str = "card-element";

/// Placeholder text styling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderStyle {
    pub color: String,
}

/// Base text styling for the card element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseStyle {
    pub font_size: String,
    pub color: String,
    pub font_family: String,
    #[serde(rename = "::placeholder")]
    pub placeholder: PlaceholderStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardStyle {
    pub base: BaseStyle,
}

/// Options passed to `elements.create('card', ...)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardElementOptions {
    pub style: CardStyle,
}

impl Default for CardElementOptions {
    fn default() -> Self {
        Self {
            style: CardStyle {
                base: BaseStyle {
                    font_size: "16px".to_string(),
                    color: "#333".to_string(),
                    font_family: "Poppins, sans-serif".to_string(),
                    placeholder: PlaceholderStyle {
                        color: "#aaa".to_string(),
                    },
                },
            },
        }
    }
}

/// Hosted card field strategy
pub struct HostedCardStrategy {
    config: GatewayConfig,
    options: CardElementOptions,
}

impl HostedCardStrategy {
    /// Create a new hosted card strategy
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            options: CardElementOptions::default(),
        }
    }
}

#[async_trait]
impl PaymentStrategy for HostedCardStrategy {
    fn method(&self) -> PaymentMethod {
        PaymentMethod::Card
    }

    fn provider_name(&self) -> &'static str {
        "stripe"
    }

    async fn prepare(&self) -> CheckoutResult<Option<Widget>> {
        let options = serde_json::json!({
            "publishableKey": self.config.publishable_key,
            "element": "card",
            "options": self.options,
        });
        Ok(Some(Widget::new(CARD_ELEMENT_ID, WidgetKind::CardElement, options)))
    }

    #[instrument(skip(self, order), fields(quantity = order.quantity, total = %order.total))]
    async fn charge(&self, order: &OrderData) -> CheckoutResult<PaymentReceipt> {
        debug!(
            name = %order.name,
            email = %order.email,
            "Confirming card payment"
        );

        tokio::time::sleep(self.config.latency).await;

        match self.config.outcome {
            SimulatedOutcome::Approve => {
                let payment_id = format!("pi_sim_{}", Uuid::new_v4().simple());
                info!(payment_id = %payment_id, "Card payment confirmed");
                Ok(PaymentReceipt::new(self.provider_name(), payment_id, "succeeded"))
            }
            SimulatedOutcome::Decline => Err(CheckoutError::Provider {
                provider: self.provider_name().to_string(),
                message: "Your card was declined.".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkout_core::{OrderForm, PricingTable};
    use std::time::Duration;

    fn order() -> OrderData {
        let form = OrderForm::new(PaymentMethod::Card)
            .with_customer("Ana Ruiz", "ana@example.com", "12 Wharf Rd")
            .with_quantity("2");
        OrderData::from_form(&form, &PricingTable::default())
    }

    #[test]
    fn test_element_options_shape() {
        let json = serde_json::to_value(CardElementOptions::default()).unwrap();
        assert_eq!(json["style"]["base"]["fontSize"], "16px");
        assert_eq!(json["style"]["base"]["fontFamily"], "Poppins, sans-serif");
        assert_eq!(json["style"]["base"]["::placeholder"]["color"], "#aaa");
    }

    #[tokio::test]
    async fn test_prepare_mounts_card_element() {
        let strategy = HostedCardStrategy::new(GatewayConfig::new("pk_test_abc"));
        let widget = strategy.prepare().await.unwrap().unwrap();

        assert_eq!(widget.container_id, "card-element");
        assert_eq!(widget.kind, WidgetKind::CardElement);
        assert_eq!(widget.options["publishableKey"], "pk_test_abc");
        assert!(!strategy.remounts_on_select());
    }

    #[tokio::test(start_paused = true)]
    async fn test_charge_waits_for_latency() {
        let strategy = HostedCardStrategy::new(GatewayConfig::default());
        let started = tokio::time::Instant::now();

        let receipt = strategy.charge(&order()).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(2000));
        assert_eq!(receipt.provider, "stripe");
        assert_eq!(receipt.status, "succeeded");
        assert!(receipt.payment_id.starts_with("pi_sim_"));
    }

    #[tokio::test]
    async fn test_charge_declined() {
        let config = GatewayConfig::default()
            .with_latency(Duration::ZERO)
            .with_outcome(SimulatedOutcome::Decline);
        let strategy = HostedCardStrategy::new(config);

        let err = strategy.charge(&order()).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Provider { provider, .. } if provider == "stripe"));
    }
}
