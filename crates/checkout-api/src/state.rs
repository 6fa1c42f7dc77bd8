//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the pricing table, payment strategies and live checkout sessions.

use checkout_core::{
    BannerTimings, CheckoutController, CheckoutError, CheckoutResult, PaymentMethod,
    PaymentStrategySelector, PricingTable,
};
use checkout_gateways::GatewayConfig;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Payment method preselected on a fresh form
    pub default_method: PaymentMethod,
    /// Idle time after which a checkout session is dropped
    pub session_idle: Duration,
    /// Most checkout sessions held at once
    pub max_sessions: usize,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let default_method = match std::env::var("DEFAULT_PAYMENT_METHOD") {
            Ok(value) => value.parse()?,
            Err(_) => PaymentMethod::default(),
        };

        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            default_method,
            session_idle: std::env::var("SESSION_IDLE_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_SESSION_IDLE),
            max_sessions: std::env::var("MAX_SESSIONS")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(DEFAULT_MAX_SESSIONS),
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: "development".to_string(),
            default_method: PaymentMethod::default(),
            session_idle: DEFAULT_SESSION_IDLE,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

/// Idle time after which a session is dropped
pub const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(30 * 60);

/// Most sessions held at once
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

struct SessionEntry {
    controller: CheckoutController,
    last_seen: Instant,
}

/// In-memory checkout sessions, one controller per visitor.
///
/// Sessions idle for longer than `idle_timeout` are dropped, and the store
/// never holds more than `max_sessions`: inserting into a full store evicts
/// the least recently used session.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout,
            max_sessions: max_sessions.max(1),
        }
    }

    pub async fn insert(&self, controller: CheckoutController) -> Uuid {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;

        self.evict_idle(&mut sessions, now);
        while sessions.len() >= self.max_sessions {
            let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| *id)
            else {
                break;
            };
            sessions.remove(&oldest);
            debug!(session_id = %oldest, "Evicted least recently used session");
        }

        let id = Uuid::new_v4();
        sessions.insert(
            id,
            SessionEntry {
                controller,
                last_seen: now,
            },
        );
        id
    }

    /// Look up a live session and mark it as used
    pub async fn get(&self, id: Uuid) -> CheckoutResult<CheckoutController> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;

        let expired = match sessions.get_mut(&id) {
            Some(entry) if now.duration_since(entry.last_seen) <= self.idle_timeout => {
                entry.last_seen = now;
                return Ok(entry.controller.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            sessions.remove(&id);
            debug!(session_id = %id, "Session expired");
        }

        Err(CheckoutError::SessionNotFound {
            session_id: id.to_string(),
        })
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    /// Drop every idle session; returns how many were dropped
    pub async fn prune(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        self.evict_idle(&mut sessions, Instant::now())
    }

    /// Prune on a fixed interval for as long as the runtime lives
    pub fn spawn_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let dropped = store.prune().await;
                if dropped > 0 {
                    info!(dropped, "Dropped idle checkout sessions");
                }
            }
        })
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn evict_idle(&self, sessions: &mut HashMap<Uuid, SessionEntry>, now: Instant) -> usize {
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) <= self.idle_timeout);
        before - sessions.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_IDLE, DEFAULT_MAX_SESSIONS)
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment strategy selector
    pub strategies: PaymentStrategySelector,
    /// Product and shipping prices
    pub pricing: PricingTable,
    /// Live checkout sessions
    pub sessions: SessionStore,
    /// Banner auto-hide delays
    pub timings: BannerTimings,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState from the environment with all three gateways
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        let gateway = GatewayConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize gateways: {}", e))?;

        let pricing = load_pricing()?;
        let strategies = checkout_gateways::register_all(
            PaymentStrategySelector::new(config.default_method),
            &gateway,
        );
        if !strategies.has_method(config.default_method) {
            anyhow::bail!(
                "Default payment method {} has no registered gateway",
                config.default_method
            );
        }

        Ok(Self::from_parts(config, pricing, strategies))
    }

    /// Assemble state from already-built parts
    pub fn from_parts(
        config: AppConfig,
        pricing: PricingTable,
        strategies: PaymentStrategySelector,
    ) -> Self {
        Self {
            strategies,
            pricing,
            sessions: SessionStore::new(config.session_idle, config.max_sessions),
            timings: BannerTimings::default(),
            config,
        }
    }

    /// Builder: override banner timings
    pub fn with_timings(mut self, timings: BannerTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Build a controller for a new visitor and run its page-load step
    pub async fn open_session(&self) -> CheckoutResult<(Uuid, CheckoutController)> {
        let controller =
            CheckoutController::with_timings(self.pricing.clone(), self.strategies.clone(), self.timings);
        controller.start().await?;
        let id = self.sessions.insert(controller.clone()).await;
        Ok((id, controller))
    }
}

/// Load pricing from config file, falling back to built-in prices
fn load_pricing() -> anyhow::Result<PricingTable> {
    let config_paths = [
        "config/pricing.toml",
        "../config/pricing.toml",
        "../../config/pricing.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let pricing = PricingTable::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            info!("Loaded pricing from {}", path);
            return Ok(pricing);
        }
    }

    warn!("No pricing file found, using built-in prices");
    Ok(PricingTable::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            ..AppConfig::default()
        };

        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_bad_socket_addr() {
        let config = AppConfig {
            host: "not a host".to_string(),
            ..AppConfig::default()
        };
        assert!(config.socket_addr().is_err());
    }

    fn controller() -> CheckoutController {
        CheckoutController::new(PricingTable::default(), PaymentStrategySelector::default())
    }

    #[tokio::test]
    async fn test_session_store() {
        let store = SessionStore::default();

        let id = store.insert(controller()).await;
        assert_eq!(store.len().await, 1);
        assert!(store.get(id).await.is_ok());

        assert!(store.remove(id).await);
        assert!(store.is_empty().await);
        assert!(matches!(
            store.get(id).await,
            Err(CheckoutError::SessionNotFound { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_session_expires() {
        let store = SessionStore::new(Duration::from_secs(60), 100);
        let idle = store.insert(controller()).await;
        let active = store.insert(controller()).await;

        tokio::time::advance(Duration::from_secs(45)).await;
        assert!(store.get(active).await.is_ok());

        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(matches!(
            store.get(idle).await,
            Err(CheckoutError::SessionNotFound { .. })
        ));
        assert!(store.get(active).await.is_ok());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_insert_drops_idle_sessions() {
        let store = SessionStore::new(Duration::from_secs(60), 100);
        for _ in 0..5 {
            store.insert(controller()).await;
        }

        tokio::time::advance(Duration::from_secs(61)).await;
        store.insert(controller()).await;

        assert_eq!(store.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_store_evicts_least_recent() {
        let store = SessionStore::new(Duration::from_secs(600), 2);
        let first = store.insert(controller()).await;
        tokio::time::advance(Duration::from_secs(1)).await;
        let second = store.insert(controller()).await;
        tokio::time::advance(Duration::from_secs(1)).await;

        // touching `first` makes `second` the least recently used
        store.get(first).await.unwrap();
        tokio::time::advance(Duration::from_secs(1)).await;
        let third = store.insert(controller()).await;

        assert_eq!(store.len().await, 2);
        assert!(store.get(first).await.is_ok());
        assert!(store.get(second).await.is_err());
        assert!(store.get(third).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_prunes() {
        let store = SessionStore::new(Duration::from_secs(60), 100);
        store.insert(controller()).await;
        let sweeper = store.spawn_sweeper(Duration::from_secs(30));

        tokio::time::sleep(Duration::from_secs(95)).await;

        assert!(store.is_empty().await);
        sweeper.abort();
    }
}
