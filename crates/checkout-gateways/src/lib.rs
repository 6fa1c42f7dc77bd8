//! # checkout-gateways
//!
//! Payment strategies for the three methods on the checkout form:
//!
//! 1. **HostedCardStrategy** - hosted card-entry element
//!    - Mounted once on page load
//!    - Publishable key validated on startup
//!
//! 2. **WalletRedirectStrategy** - wallet checkout buttons
//!    - Re-rendered every time the method is selected
//!    - Create-order then capture
//!
//! 3. **BankRedirectStrategy** - bank redirect
//!    - Pay button only, no widget
//!
//! None of them talk to a real provider: each waits for the configured
//! latency and answers with the configured `SimulatedOutcome`.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use checkout_gateways::{register_all, GatewayConfig};
//! use checkout_core::{PaymentMethod, PaymentStrategySelector};
//!
//! let config = GatewayConfig::from_env()?;
//! let strategies = register_all(PaymentStrategySelector::new(PaymentMethod::Wallet), &config);
//! ```

pub mod bank;
pub mod card;
pub mod config;
pub mod wallet;

use checkout_core::PaymentStrategySelector;
use std::sync::Arc;

// Re-exports
pub use bank::BankRedirectStrategy;
pub use card::{CardElementOptions, HostedCardStrategy};
pub use config::{GatewayConfig, SimulatedOutcome};
pub use wallet::{CreateOrderRequest, WalletRedirectStrategy};

/// Register all three strategies, sharing one configuration
pub fn register_all(
    selector: PaymentStrategySelector,
    config: &GatewayConfig,
) -> PaymentStrategySelector {
    selector
        .with_strategy(Arc::new(WalletRedirectStrategy::new(config.clone())))
        .with_strategy(Arc::new(HostedCardStrategy::new(config.clone())))
        .with_strategy(Arc::new(BankRedirectStrategy::new(config.clone())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkout_core::PaymentMethod;

    #[test]
    fn test_register_all() {
        let selector = register_all(
            PaymentStrategySelector::new(PaymentMethod::Wallet),
            &GatewayConfig::default(),
        );

        assert_eq!(selector.methods(), PaymentMethod::ALL.to_vec());
        assert_eq!(
            selector.get(PaymentMethod::Card).unwrap().provider_name(),
            "stripe"
        );
    }
}
