//! # Payment Strategy Trait
//!
//! Strategy pattern trait for the payment methods on the form.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PaymentStrategy (trait)                  │
//! │  ├── prepare()   mount the widget into its container        │
//! │  ├── charge()    run the payment for an OrderData snapshot  │
//! │  └── method() / provider_name()                             │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!          ┌─────────────────┼─────────────────┐
//!          │                 │                 │
//!  ┌───────┴───────┐ ┌───────┴───────┐ ┌───────┴───────┐
//!  │ WalletRedirect│ │  HostedCard   │ │ BankRedirect  │
//!  │   Strategy    │ │   Strategy    │ │   Strategy    │
//!  └───────────────┘ └───────────────┘ └───────────────┘
//! ```

use crate::error::CheckoutResult;
use crate::method::PaymentMethod;
use crate::order::{OrderData, PaymentReceipt};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Kind of SDK element mounted into a payment panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    /// Hosted card-entry field
    CardElement,
    /// Wallet checkout buttons
    WalletButtons,
}

/// Description of what a strategy mounts and where
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    /// Element id the widget renders into
    pub container_id: String,
    pub kind: WidgetKind,
    /// SDK options (style, client id, ...)
    #[serde(default)]
    pub options: serde_json::Value,
}

impl Widget {
    pub fn new(container_id: impl Into<String>, kind: WidgetKind, options: serde_json::Value) -> Self {
        Self {
            container_id: container_id.into(),
            kind,
            options,
        }
    }
}

/// Core trait for payment method implementations.
#[async_trait]
pub trait PaymentStrategy: Send + Sync {
    /// Payment method this strategy handles
    fn method(&self) -> PaymentMethod;

    /// Provider name (for logging and receipts)
    fn provider_name(&self) -> &'static str;

    /// Build the widget to mount into the method's panel.
    /// Strategies without an SDK widget return `None`.
    async fn prepare(&self) -> CheckoutResult<Option<Widget>> {
        Ok(None)
    }

    /// Whether the widget is rendered again every time the method is selected
    /// (instead of once when the page loads).
    fn remounts_on_select(&self) -> bool {
        false
    }

    /// Charge the customer for `order`.
    async fn charge(&self, order: &OrderData) -> CheckoutResult<PaymentReceipt>;
}

/// Type alias for a boxed payment strategy (dynamic dispatch)
pub type BoxedPaymentStrategy = Arc<dyn PaymentStrategy>;

/// Strategy registry keyed by payment method
#[derive(Clone)]
pub struct PaymentStrategySelector {
    strategies: HashMap<PaymentMethod, BoxedPaymentStrategy>,
    default_method: PaymentMethod,
}

impl PaymentStrategySelector {
    /// Create a new selector with a default method
    pub fn new(default_method: PaymentMethod) -> Self {
        Self {
            strategies: HashMap::new(),
            default_method,
        }
    }

    /// Register a payment strategy, replacing any previous one for its method
    pub fn register(&mut self, strategy: BoxedPaymentStrategy) {
        self.strategies.insert(strategy.method(), strategy);
    }

    /// Register with builder pattern
    pub fn with_strategy(mut self, strategy: BoxedPaymentStrategy) -> Self {
        self.register(strategy);
        self
    }

    /// Method preselected on a fresh form
    pub fn default_method(&self) -> PaymentMethod {
        self.default_method
    }

    /// Get a strategy by method
    pub fn get(&self, method: PaymentMethod) -> Option<&BoxedPaymentStrategy> {
        self.strategies.get(&method)
    }

    /// Registered methods, in form order
    pub fn methods(&self) -> Vec<PaymentMethod> {
        PaymentMethod::ALL
            .into_iter()
            .filter(|m| self.strategies.contains_key(m))
            .collect()
    }

    /// Check if a method is registered
    pub fn has_method(&self, method: PaymentMethod) -> bool {
        self.strategies.contains_key(&method)
    }
}

impl Default for PaymentStrategySelector {
    fn default() -> Self {
        Self::new(PaymentMethod::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedStrategy(PaymentMethod);

    #[async_trait]
    impl PaymentStrategy for FixedStrategy {
        fn method(&self) -> PaymentMethod {
            self.0
        }

        fn provider_name(&self) -> &'static str {
            "fixed"
        }

        async fn charge(&self, _order: &OrderData) -> CheckoutResult<PaymentReceipt> {
            Ok(PaymentReceipt::new("fixed", "fx_1", "ok"))
        }
    }

    #[test]
    fn test_empty_selector() {
        let selector = PaymentStrategySelector::new(PaymentMethod::Card);

        assert!(selector.methods().is_empty());
        assert!(!selector.has_method(selector.default_method()));
    }

    #[test]
    fn test_register_in_form_order() {
        let selector = PaymentStrategySelector::new(PaymentMethod::Card)
            .with_strategy(Arc::new(FixedStrategy(PaymentMethod::BankRedirect)))
            .with_strategy(Arc::new(FixedStrategy(PaymentMethod::Card)));

        assert_eq!(
            selector.methods(),
            vec![PaymentMethod::Card, PaymentMethod::BankRedirect]
        );
        assert!(selector.has_method(PaymentMethod::BankRedirect));
        assert!(!selector.has_method(PaymentMethod::Wallet));

        let replaced = selector
            .clone()
            .with_strategy(Arc::new(FixedStrategy(PaymentMethod::Card)));
        assert_eq!(replaced.methods().len(), 2);
        assert_eq!(
            selector.get(PaymentMethod::Card).map(|s| s.method()),
            Some(PaymentMethod::Card)
        );
    }

    #[tokio::test]
    async fn test_default_prepare_has_no_widget() {
        let strategy = FixedStrategy(PaymentMethod::BankRedirect);
        assert!(strategy.prepare().await.unwrap().is_none());
    }
}
