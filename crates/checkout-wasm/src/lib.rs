//! # checkout-wasm
//!
//! WebAssembly bindings for the checkout page.
//!
//! This crate provides WASM-compatible functions for:
//! - Recomputing prices from the quantity and shipping inputs
//! - Showing the panel for the selected payment method
//! - Client-side form checks before a payment is started
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { CheckoutWidget } from 'umbrella-checkout-wasm';
//!
//! await init();
//! const checkout = new CheckoutWidget();
//!
//! quantityInput.addEventListener('input', () => checkout.update_prices());
//! shippingSelect.addEventListener('change', () => checkout.update_prices());
//! paymentSelect.addEventListener('change', () => checkout.toggle_payment_method());
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

use checkout_core::{
    OrderForm, OrderSummary, PanelVisibility, PaymentMethod, Price, PricingTable, ShippingType,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, HtmlInputElement, HtmlSelectElement};

const QUANTITY_ID: &str = "quantity";
const SHIPPING_TYPE_ID: &str = "shipping-type";
const PAYMENT_METHOD_ID: &str = "payment-method";
const PRODUCT_PRICE_ID: &str = "product-price";
const SHIPPING_COST_ID: &str = "shipping-cost";
const TOTAL_PRICE_ID: &str = "total-price";

/// Initialize the WASM module (called automatically)
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// CSS `display` value for a panel
pub fn panel_display(visible: bool) -> &'static str {
    if visible {
        ""
    } else {
        "none"
    }
}

/// Shipping select value, falling back to standard for anything unknown
pub fn shipping_or_default(value: &str) -> ShippingType {
    value.parse().unwrap_or_default()
}

fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document available"))
}

fn element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{}", id)))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("element #{} has an unexpected type", id)))
}

fn set_text(document: &Document, id: &str, text: &str) -> Result<(), JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{}", id)))?
        .set_text_content(Some(text));
    Ok(())
}

/// Checkout page bindings
#[wasm_bindgen]
pub struct CheckoutWidget {
    pricing: PricingTable,
}

#[wasm_bindgen]
impl CheckoutWidget {
    /// Widget with built-in prices
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            pricing: PricingTable::default(),
        }
    }

    /// Widget with prices from a pricing TOML document
    pub fn from_pricing_toml(toml: &str) -> Result<CheckoutWidget, JsValue> {
        let pricing =
            PricingTable::from_toml(toml).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self { pricing })
    }

    /// Summary for raw input values, as a plain JS object
    pub fn order_summary(&self, quantity: &str, shipping_type: &str) -> Result<JsValue, JsValue> {
        let summary = OrderSummary::compute(&self.pricing, quantity, shipping_or_default(shipping_type));
        serde_wasm_bindgen::to_value(&summary.display())
            .map_err(|e| JsValue::from_str(&format!("Invalid summary: {}", e)))
    }

    /// Read the quantity and shipping inputs, write the three price fields.
    /// Returns the displayed total.
    pub fn update_prices(&self) -> Result<String, JsValue> {
        let document = document()?;
        let quantity = element::<HtmlInputElement>(&document, QUANTITY_ID)?.value();
        let shipping_value = element::<HtmlSelectElement>(&document, SHIPPING_TYPE_ID)?.value();

        let shipping_type = shipping_or_default(&shipping_value);
        if shipping_type.as_str() != shipping_value {
            log(&format!("unknown shipping type {:?}, using standard", shipping_value));
        }

        let display = OrderSummary::compute(&self.pricing, &quantity, shipping_type).display();
        set_text(&document, PRODUCT_PRICE_ID, &display.subtotal)?;
        set_text(&document, SHIPPING_COST_ID, &display.shipping)?;
        set_text(&document, TOTAL_PRICE_ID, &display.total)?;

        Ok(display.total)
    }

    /// Show the panel for the selected payment method and hide the others.
    /// Returns the selected method's value.
    pub fn toggle_payment_method(&self) -> Result<String, JsValue> {
        let document = document()?;
        let value = element::<HtmlSelectElement>(&document, PAYMENT_METHOD_ID)?.value();
        let method: PaymentMethod = value
            .parse()
            .map_err(|e: checkout_core::CheckoutError| JsValue::from_str(&e.to_string()))?;

        let panels = PanelVisibility::for_method(method);
        for m in PaymentMethod::ALL {
            element::<HtmlElement>(&document, m.panel_id())?
                .style()
                .set_property("display", panel_display(panels.is_visible(m)))?;
        }

        Ok(method.as_str().to_string())
    }

    /// Constraint violations for the given form values (empty when valid)
    pub fn form_violations(
        &self,
        name: &str,
        email: &str,
        quantity: &str,
        address: &str,
    ) -> Result<JsValue, JsValue> {
        let form = OrderForm::default()
            .with_customer(name, email, address)
            .with_quantity(quantity);
        serde_wasm_bindgen::to_value(&form.violations())
            .map_err(|e| JsValue::from_str(&format!("Invalid violations: {}", e)))
    }
}

impl Default for CheckoutWidget {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a price in cents to display string
#[wasm_bindgen]
pub fn format_price(cents: i64) -> String {
    Price::from_cents(cents).display()
}

/// Log to browser console
#[wasm_bindgen]
pub fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(6500), "$65.00");
        assert_eq!(format_price(2005), "$20.05");
    }

    #[test]
    fn test_panel_display() {
        assert_eq!(panel_display(true), "");
        assert_eq!(panel_display(false), "none");
    }

    #[test]
    fn test_shipping_fallback() {
        assert_eq!(shipping_or_default("rural"), ShippingType::Rural);
        assert_eq!(shipping_or_default("express"), ShippingType::Standard);
    }
}
