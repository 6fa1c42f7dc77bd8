//! # checkout-core
//!
//! Core types and the checkout controller for the umbrella-checkout form.
//!
//! This crate provides:
//! - `PricingTable`, `Price` and `ShippingType` for the single product on sale
//! - `OrderSummary` for subtotal/shipping/total derivation
//! - `OrderForm` validation, `OrderData` snapshots and `OrderConfirmation`
//! - `PaymentStrategy` trait for implementing payment methods
//! - `CheckoutView` view-model and `CheckoutAction` UI actions
//! - `CheckoutController` payment flows (feature `runtime`)
//! - `CheckoutError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use checkout_core::{CheckoutController, CheckoutAction, PricingTable, PaymentStrategySelector};
//!
//! let controller = CheckoutController::new(PricingTable::default(), strategies);
//! controller.start().await?;
//!
//! controller.dispatch(CheckoutAction::SetQuantity { value: "3".into() }).await?;
//! let outcome = controller.dispatch(CheckoutAction::Submit { method: None }).await?;
//! ```

#[cfg(feature = "runtime")]
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod guard;
pub mod method;
pub mod order;
pub mod product;
pub mod strategy;
pub mod summary;
pub mod view;

// Re-exports for convenience
#[cfg(feature = "runtime")]
pub use controller::{BannerTimings, CheckoutController};
pub use dispatch::{ActionOutcome, CheckoutAction};
pub use error::{CheckoutError, CheckoutResult};
pub use guard::{SubmissionGuard, SubmissionTicket};
pub use method::{PanelVisibility, PaymentMethod};
pub use order::{
    FieldViolation, FormField, OrderConfirmation, OrderData, OrderForm, PaymentReceipt, Violation,
};
pub use product::{Price, PricingTable, Product, ShippingType};
pub use strategy::{
    BoxedPaymentStrategy, PaymentStrategy, PaymentStrategySelector, Widget, WidgetKind,
};
pub use summary::{parse_quantity, OrderSummary, SummaryDisplay};
pub use view::{Banner, BannerToken, ButtonState, CheckoutView, MountedWidget};
