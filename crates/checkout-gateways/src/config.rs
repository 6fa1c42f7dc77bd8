//! # Gateway Configuration
//!
//! Configuration for the three payment gateways.
//! Values are loaded from environment variables (and `.env` if present).

use checkout_core::CheckoutError;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Placeholder key used when no publishable key is configured
pub const PLACEHOLDER_PUBLISHABLE_KEY: &str = "pk_test_YOUR_PUBLISHABLE_KEY";

/// Default simulated provider round-trip
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(2000);

/// How simulated providers answer a charge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulatedOutcome {
    #[default]
    Approve,
    Decline,
}

impl FromStr for SimulatedOutcome {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "approve" => Ok(SimulatedOutcome::Approve),
            "decline" => Ok(SimulatedOutcome::Decline),
            other => Err(CheckoutError::Configuration(format!(
                "SIMULATED_OUTCOME must be approve or decline, got {}",
                other
            ))),
        }
    }
}

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Hosted card publishable key (pk_test_... or pk_live_...)
    pub publishable_key: String,

    /// Wallet SDK client id ("sb" is the sandbox id)
    pub wallet_client_id: String,

    /// Simulated provider round-trip
    pub latency: Duration,

    /// Simulated provider answer
    pub outcome: SimulatedOutcome,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional env vars:
    /// - `CARD_PUBLISHABLE_KEY` (placeholder test key when unset)
    /// - `WALLET_CLIENT_ID` (default `sb`)
    /// - `SIMULATED_LATENCY_MS` (default 2000)
    /// - `SIMULATED_OUTCOME` (`approve` or `decline`, default `approve`)
    pub fn from_env() -> Result<Self, CheckoutError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let publishable_key = match env::var("CARD_PUBLISHABLE_KEY") {
            Ok(key) => key,
            Err(_) => {
                warn!("CARD_PUBLISHABLE_KEY not set, using placeholder test key");
                PLACEHOLDER_PUBLISHABLE_KEY.to_string()
            }
        };

        let latency = match env::var("SIMULATED_LATENCY_MS") {
            Ok(ms) => Duration::from_millis(ms.parse().map_err(|_| {
                CheckoutError::Configuration(format!(
                    "SIMULATED_LATENCY_MS must be a number of milliseconds, got {}",
                    ms
                ))
            })?),
            Err(_) => DEFAULT_LATENCY,
        };

        let outcome = match env::var("SIMULATED_OUTCOME") {
            Ok(value) => value.parse()?,
            Err(_) => SimulatedOutcome::Approve,
        };

        let config = Self {
            publishable_key,
            wallet_client_id: env::var("WALLET_CLIENT_ID").unwrap_or_else(|_| "sb".to_string()),
            latency,
            outcome,
        };
        config.validate()?;
        Ok(config)
    }

    /// Create config with explicit values (for testing)
    pub fn new(publishable_key: impl Into<String>) -> Self {
        Self {
            publishable_key: publishable_key.into(),
            wallet_client_id: "sb".to_string(),
            latency: DEFAULT_LATENCY,
            outcome: SimulatedOutcome::Approve,
        }
    }

    /// Check key formats
    pub fn validate(&self) -> Result<(), CheckoutError> {
        if !self.publishable_key.starts_with("pk_test_") && !self.publishable_key.starts_with("pk_live_") {
            return Err(CheckoutError::Configuration(
                "CARD_PUBLISHABLE_KEY must start with pk_test_ or pk_live_".to_string(),
            ));
        }
        if self.wallet_client_id.trim().is_empty() {
            return Err(CheckoutError::Configuration(
                "WALLET_CLIENT_ID must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.publishable_key.starts_with("pk_test_")
    }

    /// Builder: set simulated latency
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Builder: set simulated outcome
    pub fn with_outcome(mut self, outcome: SimulatedOutcome) -> Self {
        self.outcome = outcome;
        self
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new(PLACEHOLDER_PUBLISHABLE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_validation() {
        assert!(GatewayConfig::new("pk_test_abc123").validate().is_ok());
        assert!(GatewayConfig::new("pk_live_abc123").validate().is_ok());
        assert!(matches!(
            GatewayConfig::new("sk_test_abc123").validate(),
            Err(CheckoutError::Configuration(_))
        ));
    }

    #[test]
    fn test_mode() {
        assert!(GatewayConfig::default().is_test_mode());
        assert!(!GatewayConfig::new("pk_live_abc").is_test_mode());
    }

    #[test]
    fn test_outcome_parse() {
        assert_eq!("Decline".parse::<SimulatedOutcome>().unwrap(), SimulatedOutcome::Decline);
        assert!("maybe".parse::<SimulatedOutcome>().is_err());
    }

    #[test]
    fn test_builders() {
        let config = GatewayConfig::default()
            .with_latency(Duration::ZERO)
            .with_outcome(SimulatedOutcome::Decline);
        assert_eq!(config.latency, Duration::ZERO);
        assert_eq!(config.outcome, SimulatedOutcome::Decline);
    }
}
