//! # Checkout View-Model
//!
//! Everything the checkout page displays, held in one explicit object instead
//! of scattered element handles. A renderer (the browser page, the HTTP API)
//! only reads it; handlers mutate it.

use crate::method::{PanelVisibility, PaymentMethod};
use crate::order::{FieldViolation, OrderForm};
use crate::product::PricingTable;
use crate::strategy::Widget;
use crate::summary::{OrderSummary, SummaryDisplay};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A message banner; `generation` changes every time it is shown
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub visible: bool,
    pub message: String,
    pub generation: u64,
}

/// Token identifying one showing of a banner, used to hide it later
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BannerToken(u64);

/// State of a payment button
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonState {
    pub label: String,
    pub disabled: bool,
}

impl ButtonState {
    pub fn idle(method: PaymentMethod) -> Self {
        Self {
            label: method.idle_label().to_string(),
            disabled: false,
        }
    }

    pub fn processing(method: PaymentMethod) -> Self {
        Self {
            label: method.processing_label().to_string(),
            disabled: true,
        }
    }
}

/// A widget currently rendered into a panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MountedWidget {
    pub widget: Widget,
    /// How many times this panel has been rendered; each render replaces the last
    pub renders: u32,
}

/// Complete UI state of the checkout page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutView {
    pub form: OrderForm,
    pub summary: SummaryDisplay,
    pub panels: PanelVisibility,
    pub buttons: BTreeMap<PaymentMethod, ButtonState>,
    pub success_banner: Banner,
    pub error_banner: Banner,
    /// Violations from the last failed validation, cleared on a valid submit
    pub violations: Vec<FieldViolation>,
    pub widgets: BTreeMap<PaymentMethod, MountedWidget>,
    #[serde(skip)]
    banner_generation: u64,
}

impl CheckoutView {
    /// Fresh page state with `method` selected
    pub fn new(method: PaymentMethod) -> Self {
        Self {
            form: OrderForm::new(method),
            summary: SummaryDisplay::default(),
            panels: PanelVisibility::for_method(method),
            buttons: PaymentMethod::ALL
                .into_iter()
                .map(|m| (m, ButtonState::idle(m)))
                .collect(),
            success_banner: Banner::default(),
            error_banner: Banner::default(),
            violations: Vec::new(),
            widgets: BTreeMap::new(),
            banner_generation: 0,
        }
    }

    /// Recompute the summary from the live form and write the display fields
    pub fn recalculate(&mut self, pricing: &PricingTable) -> OrderSummary {
        let summary = self.form.summary(pricing);
        self.summary = summary.display();
        summary
    }

    /// Show the panel for `method` and hide the other two
    pub fn select_method(&mut self, method: PaymentMethod) {
        self.form.payment_method = method;
        self.panels = PanelVisibility::for_method(method);
    }

    /// Render a widget into its panel, replacing whatever was there
    pub fn mount_widget(&mut self, method: PaymentMethod, widget: Widget) {
        let renders = self.widgets.get(&method).map_or(0, |w| w.renders) + 1;
        self.widgets.insert(method, MountedWidget { widget, renders });
    }

    pub fn set_button(&mut self, method: PaymentMethod, state: ButtonState) {
        self.buttons.insert(method, state);
    }

    pub fn button(&self, method: PaymentMethod) -> Option<&ButtonState> {
        self.buttons.get(&method)
    }

    fn next_generation(&mut self) -> u64 {
        self.banner_generation += 1;
        self.banner_generation
    }

    /// Show the success banner and hide the error banner
    pub fn show_success(&mut self) -> BannerToken {
        let generation = self.next_generation();
        self.success_banner = Banner {
            visible: true,
            message: String::new(),
            generation,
        };
        self.error_banner.visible = false;
        BannerToken(generation)
    }

    /// Show the error banner with `message` and hide the success banner
    pub fn show_error(&mut self, message: impl Into<String>) -> BannerToken {
        let generation = self.next_generation();
        self.error_banner = Banner {
            visible: true,
            message: message.into(),
            generation,
        };
        self.success_banner.visible = false;
        BannerToken(generation)
    }

    /// Hide the success banner if `token` is still the latest showing.
    /// Returns false when a newer banner has been shown since.
    pub fn hide_success(&mut self, token: BannerToken) -> bool {
        if self.success_banner.generation != token.0 || self.error_banner.generation > token.0 {
            return false;
        }
        self.success_banner.visible = false;
        true
    }

    /// Hide the error banner if `token` is still the latest showing
    pub fn hide_error(&mut self, token: BannerToken) -> bool {
        if self.error_banner.generation != token.0 || self.success_banner.generation > token.0 {
            return false;
        }
        self.error_banner.visible = false;
        true
    }

    /// Clear the form back to defaults
    pub fn reset_form(&mut self, default_method: PaymentMethod) {
        self.form.reset(default_method);
        self.violations.clear();
    }
}

impl Default for CheckoutView {
    fn default() -> Self {
        Self::new(PaymentMethod::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::ShippingType;
    use crate::strategy::WidgetKind;

    #[test]
    fn test_initial_state() {
        let view = CheckoutView::new(PaymentMethod::Card);

        assert!(view.panels.card);
        assert!(!view.panels.wallet);
        assert_eq!(view.summary.total, "$25.00");
        assert_eq!(view.button(PaymentMethod::BankRedirect).unwrap().label, "Pay with POLi");
        assert!(!view.success_banner.visible);
    }

    #[test]
    fn test_recalculate_writes_display() {
        let mut view = CheckoutView::default();
        view.form.quantity = "3".into();
        view.form.shipping_type = ShippingType::Rural;

        let summary = view.recalculate(&PricingTable::default());

        assert_eq!(summary.quantity, 3);
        assert_eq!(view.summary.subtotal, "$60.00");
        assert_eq!(view.summary.shipping, "$5.00");
        assert_eq!(view.summary.total, "$65.00");
    }

    #[test]
    fn test_banners_exclusive() {
        let mut view = CheckoutView::default();

        view.show_success();
        assert!(view.success_banner.visible);

        view.show_error("Payment failed. Please try again.");
        assert!(view.error_banner.visible);
        assert!(!view.success_banner.visible);
        assert_eq!(view.error_banner.message, "Payment failed. Please try again.");
    }

    #[test]
    fn test_stale_hide_is_ignored() {
        let mut view = CheckoutView::default();

        let first = view.show_error("first");
        let second = view.show_error("second");

        assert!(!view.hide_error(first));
        assert!(view.error_banner.visible);
        assert!(view.hide_error(second));
        assert!(!view.error_banner.visible);
    }

    #[test]
    fn test_stale_success_hide_after_error() {
        let mut view = CheckoutView::default();

        let success = view.show_success();
        view.show_error("oops");

        assert!(!view.hide_success(success));
        assert!(view.error_banner.visible);
    }

    #[test]
    fn test_mount_widget_replaces_render() {
        let mut view = CheckoutView::default();
        let widget = Widget::new(
            "paypal-button-container",
            WidgetKind::WalletButtons,
            serde_json::Value::Null,
        );

        view.mount_widget(PaymentMethod::Wallet, widget.clone());
        view.mount_widget(PaymentMethod::Wallet, widget);

        assert_eq!(view.widgets.len(), 1);
        assert_eq!(view.widgets[&PaymentMethod::Wallet].renders, 2);
    }
}
