//! # Checkout Controller
//!
//! Runs the checkout page: owns the view-model, the pricing table and the
//! registered payment strategies, and executes payment flows.
//!
//! Payment flow for every method:
//!
//! ```text
//! acquire submission guard ──✗──> SubmissionInProgress
//!      │
//! validate form ──✗──> FormInvalid (no provider call)
//!      │  (same lock hold)
//! build OrderData, button -> processing
//!      │
//! strategy.charge() ──✗──> error banner (5s) ── PaymentFailed
//!      │
//! success banner (3.5s) ── then reset form
//!      │
//! button restored (always)
//! ```

use crate::dispatch::{ActionOutcome, CheckoutAction};
use crate::error::{CheckoutError, CheckoutResult};
use crate::guard::SubmissionGuard;
use crate::method::PaymentMethod;
use crate::order::{FormField, OrderConfirmation, OrderData};
use crate::product::{PricingTable, ShippingType};
use crate::strategy::{BoxedPaymentStrategy, PaymentStrategySelector};
use crate::summary::OrderSummary;
use crate::view::{BannerToken, ButtonState, CheckoutView};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

/// How long banners stay up before hiding themselves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BannerTimings {
    pub success: Duration,
    pub error: Duration,
}

impl Default for BannerTimings {
    fn default() -> Self {
        Self {
            success: Duration::from_millis(3500),
            error: Duration::from_millis(5000),
        }
    }
}

struct Inner {
    pricing: PricingTable,
    strategies: PaymentStrategySelector,
    timings: BannerTimings,
    guard: SubmissionGuard,
    view: Mutex<CheckoutView>,
    pending_hides: Mutex<Vec<JoinHandle<()>>>,
}

impl Inner {
    fn view(&self) -> MutexGuard<'_, CheckoutView> {
        self.view.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn pending_hides(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.pending_hides
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Restores a payment button to idle when dropped
struct ButtonRestore {
    inner: Arc<Inner>,
    method: PaymentMethod,
}

impl Drop for ButtonRestore {
    fn drop(&mut self) {
        self.inner
            .view()
            .set_button(self.method, ButtonState::idle(self.method));
    }
}

/// Checkout page controller (cheap to clone; clones share state)
#[derive(Clone)]
pub struct CheckoutController {
    inner: Arc<Inner>,
}

impl CheckoutController {
    /// Create a controller with default banner timings
    pub fn new(pricing: PricingTable, strategies: PaymentStrategySelector) -> Self {
        Self::with_timings(pricing, strategies, BannerTimings::default())
    }

    /// Create a controller with custom banner timings
    pub fn with_timings(
        pricing: PricingTable,
        strategies: PaymentStrategySelector,
        timings: BannerTimings,
    ) -> Self {
        let mut view = CheckoutView::new(strategies.default_method());
        view.recalculate(&pricing);

        Self {
            inner: Arc::new(Inner {
                pricing,
                strategies,
                timings,
                guard: SubmissionGuard::new(),
                view: Mutex::new(view),
                pending_hides: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Snapshot of the current view-model
    pub fn view(&self) -> CheckoutView {
        self.inner.view().clone()
    }

    /// Method of the payment currently in flight, if any
    pub fn active_submission(&self) -> Option<PaymentMethod> {
        self.inner.guard.active()
    }

    /// Fresh summary derived from the live form
    pub fn summary(&self) -> OrderSummary {
        self.inner.view().form.summary(&self.inner.pricing)
    }

    /// Page load: mount load-time widgets, compute prices and show the
    /// selected method's panel.
    #[instrument(skip(self))]
    pub async fn start(&self) -> CheckoutResult<()> {
        for method in self.inner.strategies.methods() {
            let Some(strategy) = self.inner.strategies.get(method).cloned() else {
                continue;
            };
            if !strategy.remounts_on_select() {
                self.mount(&strategy).await?;
            }
        }

        self.recalculate();
        let selected = self.inner.view().form.payment_method;
        self.select_payment_method(selected).await
    }

    fn recalculate(&self) -> OrderSummary {
        self.inner.view().recalculate(&self.inner.pricing)
    }

    async fn mount(&self, strategy: &BoxedPaymentStrategy) -> CheckoutResult<()> {
        if let Some(widget) = strategy.prepare().await? {
            debug!(
                method = %strategy.method(),
                container = %widget.container_id,
                "Mounting payment widget"
            );
            self.inner.view().mount_widget(strategy.method(), widget);
        }
        Ok(())
    }

    /// Update a text field; returns the recomputed summary
    pub fn set_field(&self, field: FormField, value: impl Into<String>) -> OrderSummary {
        let mut view = self.inner.view();
        view.form.set(field, value);
        view.recalculate(&self.inner.pricing)
    }

    /// Quantity input changed
    pub fn set_quantity(&self, value: impl Into<String>) -> OrderSummary {
        self.set_field(FormField::Quantity, value)
    }

    /// Shipping select changed
    pub fn select_shipping(&self, shipping_type: ShippingType) -> OrderSummary {
        let mut view = self.inner.view();
        view.form.shipping_type = shipping_type;
        view.recalculate(&self.inner.pricing)
    }

    /// Show the panel for `method`, re-rendering its widget if it renders on select
    #[instrument(skip(self), fields(method = %method))]
    pub async fn select_payment_method(&self, method: PaymentMethod) -> CheckoutResult<()> {
        let strategy = self.strategy(method)?;
        self.inner.view().select_method(method);

        if strategy.remounts_on_select() {
            self.mount(&strategy).await?;
        }
        Ok(())
    }

    fn strategy(&self, method: PaymentMethod) -> CheckoutResult<BoxedPaymentStrategy> {
        self.inner
            .strategies
            .get(method)
            .cloned()
            .ok_or_else(|| CheckoutError::UnknownPaymentMethod(method.to_string()))
    }

    /// Clear the form, recompute prices and re-select the default method
    pub async fn reset(&self) -> CheckoutResult<()> {
        let default_method = self.inner.strategies.default_method();
        self.inner.view().reset_form(default_method);
        self.recalculate();
        self.select_payment_method(default_method).await
    }

    /// Run the payment flow for `method`
    #[instrument(skip(self), fields(method = %method))]
    pub async fn submit(&self, method: PaymentMethod) -> CheckoutResult<OrderConfirmation> {
        let strategy = self.strategy(method)?;
        let _ticket = self.inner.guard.try_begin(method)?;

        // validate, snapshot and mark processing under one lock hold
        let order = {
            let mut view = self.inner.view();
            if let Err(err) = view.form.validate() {
                if let CheckoutError::FormInvalid { violations } = &err {
                    view.violations = violations.clone();
                }
                warn!(error = %err, "Checkout form failed validation");
                return Err(err);
            }
            view.violations.clear();
            view.recalculate(&self.inner.pricing);
            view.set_button(method, ButtonState::processing(method));
            OrderData::from_form(&view.form, &self.inner.pricing)
        };
        let _restore = ButtonRestore {
            inner: Arc::clone(&self.inner),
            method,
        };

        info!(
            provider = strategy.provider_name(),
            quantity = order.quantity,
            total = %order.total,
            "Starting payment"
        );

        match strategy.charge(&order).await {
            Ok(receipt) => {
                let confirmation = OrderConfirmation::new(method, &order, receipt);
                info!(
                    order_id = %confirmation.order_id,
                    payment_id = %confirmation.payment_id,
                    "Payment completed"
                );
                self.show_success();
                Ok(confirmation)
            }
            Err(err) => {
                error!(provider = strategy.provider_name(), error = %err, "Payment failed");
                let message = method.failure_message();
                self.show_error(message);
                Err(CheckoutError::PaymentFailed {
                    method,
                    message: message.to_string(),
                    cause: err.to_string(),
                })
            }
        }
    }

    /// Route an action to its handler
    #[instrument(skip(self, action), fields(action = action.name()))]
    pub async fn dispatch(&self, action: CheckoutAction) -> CheckoutResult<ActionOutcome> {
        match action {
            CheckoutAction::SetField { field, value } => Ok(ActionOutcome::Updated {
                summary: self.set_field(field, value),
            }),
            CheckoutAction::SetQuantity { value } => Ok(ActionOutcome::Updated {
                summary: self.set_quantity(value),
            }),
            CheckoutAction::SelectShipping { shipping_type } => Ok(ActionOutcome::Updated {
                summary: self.select_shipping(shipping_type),
            }),
            CheckoutAction::SelectPaymentMethod { method } => {
                self.select_payment_method(method).await?;
                Ok(ActionOutcome::Updated {
                    summary: self.summary(),
                })
            }
            CheckoutAction::Submit { method } => {
                let method = method.unwrap_or_else(|| self.inner.view().form.payment_method);
                let confirmation = self.submit(method).await?;
                Ok(ActionOutcome::Paid { confirmation })
            }
            CheckoutAction::Reset => {
                self.reset().await?;
                Ok(ActionOutcome::Reset)
            }
        }
    }

    fn cancel_pending_hides(&self) {
        for handle in self.inner.pending_hides().drain(..) {
            handle.abort();
        }
    }

    fn track_hide(&self, handle: JoinHandle<()>) {
        let mut pending = self.inner.pending_hides();
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }

    fn show_success(&self) {
        self.cancel_pending_hides();
        let token = self.inner.view().show_success();

        let controller = self.clone();
        let delay = self.inner.timings.success;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            controller.finish_success(token).await;
        });
        self.track_hide(handle);
    }

    async fn finish_success(&self, token: BannerToken) {
        if !self.inner.view().hide_success(token) {
            return;
        }
        let selected = {
            let mut view = self.inner.view();
            view.reset_form(self.inner.strategies.default_method());
            view.recalculate(&self.inner.pricing);
            view.form.payment_method
        };
        if let Err(err) = self.select_payment_method(selected).await {
            warn!(error = %err, "Could not re-select payment method after reset");
        }
    }

    fn show_error(&self, message: &str) {
        self.cancel_pending_hides();
        let token = self.inner.view().show_error(message);

        let controller = self.clone();
        let delay = self.inner.timings.error;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            controller.inner.view().hide_error(token);
        });
        self.track_hide(handle);
    }
}
