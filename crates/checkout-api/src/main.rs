//! # Umbrella Checkout
//!
//! Checkout form service for a single product.
//!
//! ## Usage
//!
//! ```bash
//! # Optional: real publishable key and a faster simulated provider
//! export CARD_PUBLISHABLE_KEY=pk_test_...
//! export SIMULATED_LATENCY_MS=500
//!
//! # Run the server
//! umbrella-checkout
//! ```

use checkout_api::{routes, state::AppState};
use tracing::{info, Level};
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!(
        "Product: {} at {}",
        state.pricing.product.name,
        state.pricing.unit_price()
    );
    info!("Payment methods: {:?}", state.strategies.methods());
    info!(
        "Sessions: idle timeout {:?}, at most {}",
        state.config.session_idle, state.config.max_sessions
    );

    state.sessions.spawn_sweeper(SESSION_SWEEP_INTERVAL);

    let app = routes::create_router(state);

    info!("Umbrella Checkout starting on http://{}", addr);

    if !is_prod {
        info!("Health: http://{}/health", addr);
        info!("Sessions: POST http://{}/api/v1/sessions", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  ☂ Umbrella Checkout ☂
  ━━━━━━━━━━━━━━━━━━━━━━━
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
