//! # Bank Redirect
//!
//! Bank-redirect payments. The real flow creates a transaction server-side and
//! redirects the customer to their bank; neither step is wired up, so `charge`
//! simulates the round-trip. There is no widget, only the pay button.

use crate::config::{GatewayConfig, SimulatedOutcome};
use async_trait::async_trait;
use checkout_core::{
    CheckoutError, CheckoutResult, OrderData, PaymentMethod, PaymentReceipt, PaymentStrategy,
};
use tracing::{info, instrument};
use uuid::Uuid;

/// Bank redirect strategy
pub struct BankRedirectStrategy {
    config: GatewayConfig,
}

impl BankRedirectStrategy {
    pub fn new(config: GatewayConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl PaymentStrategy for BankRedirectStrategy {
    fn method(&self) -> PaymentMethod {
        PaymentMethod::BankRedirect
    }

    fn provider_name(&self) -> &'static str {
        "poli"
    }

    #[instrument(skip(self, order), fields(quantity = order.quantity, total = %order.total))]
    async fn charge(&self, order: &OrderData) -> CheckoutResult<PaymentReceipt> {
        tokio::time::sleep(self.config.latency).await;

        match self.config.outcome {
            SimulatedOutcome::Approve => {
                let token = Uuid::new_v4().simple().to_string();
                info!(token = %token, "Bank transaction completed");
                Ok(PaymentReceipt::new(self.provider_name(), token, "Completed"))
            }
            SimulatedOutcome::Decline => Err(CheckoutError::Provider {
                provider: self.provider_name().to_string(),
                message: "transaction cancelled at bank".to_string(),
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
        let form = OrderForm::new(PaymentMethod::BankRedirect)
            .with_customer("Ana Ruiz", "ana@example.com", "12 Wharf Rd");
        OrderData::from_form(&form, &PricingTable::default())
    }

    #[tokio::test]
    async fn test_no_widget() {
        let strategy = BankRedirectStrategy::new(GatewayConfig::default());
        assert!(strategy.prepare().await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_charge_completes() {
        let receipt = BankRedirectStrategy::new(GatewayConfig::default())
            .charge(&order())
            .await
            .unwrap();

        assert_eq!(receipt.provider, "poli");
        assert_eq!(receipt.status, "Completed");
    }

    #[tokio::test]
    async fn test_charge_declined() {
        let config = GatewayConfig::default()
            .with_latency(Duration::ZERO)
            .with_outcome(SimulatedOutcome::Decline);
        let result = BankRedirectStrategy::new(config).charge(&order()).await;

        assert!(matches!(result, Err(CheckoutError::Provider { .. })));
    }
}
