//! # Wallet Redirect
//!
//! Wallet checkout buttons. The buttons are rendered again every time the
//! method is selected, clearing the previous render. A charge creates a
//! capture-intent order from the order snapshot and then captures it.

use crate::config::{GatewayConfig, SimulatedOutcome};
use async_trait::async_trait;
use checkout_core::{
    CheckoutError, CheckoutResult, OrderData, PaymentMethod, PaymentReceipt, PaymentStrategy,
    Widget, WidgetKind,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Element id the wallet buttons render into
pub const WALLET_CONTAINER_ID: &str = "paypal-button-container";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseUnit {
    pub description: String,
    pub amount: Amount,
}

/// Body of the wallet's create-order call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub intent: String,
    pub purchase_units: Vec<PurchaseUnit>,
}

impl CreateOrderRequest {
    /// One purchase unit for the whole order, captured immediately
    pub fn from_order(order: &OrderData) -> Self {
        Self {
            intent: "CAPTURE".to_string(),
            purchase_units: vec![PurchaseUnit {
                description: order.description(),
                amount: Amount {
                    value: order.amount_value(),
                },
            }],
        }
    }
}

/// What the wallet reports after capture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureDetails {
    pub id: String,
    pub status: String,
    pub payer_email: String,
    pub amount: Amount,
}

/// Wallet redirect strategy
pub struct WalletRedirectStrategy {
    config: GatewayConfig,
}

impl WalletRedirectStrategy {
    pub fn new(config: GatewayConfig) -> Self {
        Self { config }
    }

    fn create_order(&self, request: &CreateOrderRequest) -> CheckoutResult<String> {
        let body = serde_json::to_string(request)
            .map_err(|e| CheckoutError::Serialization(e.to_string()))?;
        debug!(request = %body, "Creating wallet order");
        Ok(format!("WO-{}", Uuid::new_v4().simple()))
    }

    async fn capture(&self, wallet_order_id: &str, order: &OrderData) -> CheckoutResult<CaptureDetails> {
        tokio::time::sleep(self.config.latency).await;

        match self.config.outcome {
            SimulatedOutcome::Approve => Ok(CaptureDetails {
                id: wallet_order_id.to_string(),
                status: "COMPLETED".to_string(),
                payer_email: order.email.clone(),
                amount: Amount {
                    value: order.amount_value(),
                },
            }),
            SimulatedOutcome::Decline => Err(CheckoutError::Provider {
                provider: self.provider_name().to_string(),
                message: format!("order {} was not approved", wallet_order_id),
            }),
        }
    }
}

#[async_trait]
impl PaymentStrategy for WalletRedirectStrategy {
    fn method(&self) -> PaymentMethod {
        PaymentMethod::Wallet
    }

    fn provider_name(&self) -> &'static str {
        "paypal"
    }

    async fn prepare(&self) -> CheckoutResult<Option<Widget>> {
        let options = serde_json::json!({ "clientId": self.config.wallet_client_id });
        Ok(Some(Widget::new(WALLET_CONTAINER_ID, WidgetKind::WalletButtons, options)))
    }

    fn remounts_on_select(&self) -> bool {
        true
    }

    #[instrument(skip(self, order), fields(quantity = order.quantity, total = %order.total))]
    async fn charge(&self, order: &OrderData) -> CheckoutResult<PaymentReceipt> {
        let request = CreateOrderRequest::from_order(order);
        let wallet_order_id = self.create_order(&request)?;

        let details = self.capture(&wallet_order_id, order).await?;
        info!(
            id = %details.id,
            status = %details.status,
            amount = %details.amount.value,
            "Payment completed"
        );

        Ok(PaymentReceipt::new(self.provider_name(), details.id, details.status))
    }
}
