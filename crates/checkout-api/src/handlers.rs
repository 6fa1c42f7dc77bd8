//! # Request Handlers
//!
//! Axum request handlers for the checkout API.
//! Session endpoints drive a `CheckoutController` with UI actions and always
//! answer with the resulting view-model.

use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts, Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use checkout_core::{
    ActionOutcome, CheckoutAction, CheckoutError, CheckoutView, OrderSummary, PaymentMethod,
    Price, Product, ShippingType, SummaryDisplay,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Summary request: raw form values
#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    /// Quantity input text (clamped to >= 1)
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub shipping_type: ShippingType,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: OrderSummary,
    pub display: SummaryDisplay,
}

#[derive(Debug, Serialize)]
pub struct ShippingOption {
    pub shipping_type: ShippingType,
    pub cost: Price,
    pub display: String,
}

#[derive(Debug, Serialize)]
pub struct MethodOption {
    pub method: PaymentMethod,
    pub label: &'static str,
    pub panel_id: &'static str,
}

#[derive(Debug, Serialize)]
pub struct PricingResponse {
    pub product: Product,
    pub shipping: Vec<ShippingOption>,
    pub payment_methods: Vec<MethodOption>,
    pub default_method: PaymentMethod,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub view: CheckoutView,
}

#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub outcome: ActionOutcome,
    pub view: CheckoutView,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// View-model after a failed action, so the page can render banners
    /// and validity hints
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<CheckoutView>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
            view: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_view(mut self, view: CheckoutView) -> Self {
        self.view = Some(view);
        self
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn checkout_error_response(err: &CheckoutError) -> ErrorResponse {
    let response = ErrorResponse::new(err.to_string(), err.status_code());
    match err.banner_message() {
        Some(message) => response.with_details(message),
        None => response,
    }
}

fn to_api_error(response: ErrorResponse) -> ApiError {
    let status = StatusCode::from_u16(response.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response))
}

fn checkout_error_to_response(err: CheckoutError) -> ApiError {
    to_api_error(checkout_error_response(&err))
}

// =============================================================================
// Extractors
// =============================================================================

/// JSON body whose rejections answer with an `ErrorResponse`
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiRejection))]
pub struct CheckoutJson<T>(pub T);

/// Path parameters whose rejections answer with an `ErrorResponse`
#[derive(FromRequestParts)]
#[from_request(via(Path), rejection(ApiRejection))]
pub struct CheckoutPath<T>(pub T);

/// Unreadable request, reported as `CheckoutError::InvalidRequest` (400)
#[derive(Debug)]
pub struct ApiRejection(CheckoutError);

impl From<JsonRejection> for ApiRejection {
    fn from(rejection: JsonRejection) -> Self {
        Self(CheckoutError::InvalidRequest(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiRejection {
    fn from(rejection: PathRejection) -> Self {
        Self(CheckoutError::InvalidRequest(rejection.body_text()))
    }
}

impl IntoResponse for ApiRejection {
    fn into_response(self) -> Response {
        warn!(error = %self.0, "Rejected request");
        checkout_error_to_response(self.0).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "umbrella-checkout",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Product, shipping and payment method options
pub async fn get_pricing(State(state): State<AppState>) -> Json<PricingResponse> {
    let shipping = ShippingType::ALL
        .into_iter()
        .map(|shipping_type| {
            let cost = state.pricing.shipping_cost(shipping_type);
            ShippingOption {
                shipping_type,
                cost,
                display: cost.display(),
            }
        })
        .collect();

    let payment_methods = state
        .strategies
        .methods()
        .into_iter()
        .map(|method| MethodOption {
            method,
            label: method.idle_label(),
            panel_id: method.panel_id(),
        })
        .collect();

    Json(PricingResponse {
        product: state.pricing.product.clone(),
        shipping,
        payment_methods,
        default_method: state.strategies.default_method(),
    })
}

/// Stateless summary for a quantity and shipping type
pub async fn compute_summary(
    State(state): State<AppState>,
    CheckoutJson(request): CheckoutJson<SummaryRequest>,
) -> Json<SummaryResponse> {
    let summary = OrderSummary::compute(&state.pricing, &request.quantity, request.shipping_type);
    Json(SummaryResponse {
        display: summary.display(),
        summary,
    })
}

/// Open a checkout session
#[instrument(skip(state))]
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let (session_id, controller) = state
        .open_session()
        .await
        .map_err(checkout_error_to_response)?;

    info!(session_id = %session_id, "Opened checkout session");

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            session_id,
            view: controller.view(),
        }),
    ))
}

/// Current view-model of a session
pub async fn get_session(
    State(state): State<AppState>,
    CheckoutPath(session_id): CheckoutPath<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    let controller = state
        .sessions
        .get(session_id)
        .await
        .map_err(checkout_error_to_response)?;

    Ok(Json(SessionResponse {
        session_id,
        view: controller.view(),
    }))
}

/// Dispatch a UI action to a session
#[instrument(skip(state, action), fields(session_id = %session_id, action = action.name()))]
pub async fn dispatch_action(
    State(state): State<AppState>,
    CheckoutPath(session_id): CheckoutPath<Uuid>,
    CheckoutJson(action): CheckoutJson<CheckoutAction>,
) -> Result<Json<ActionResponse>, ApiError> {
    let controller = state
        .sessions
        .get(session_id)
        .await
        .map_err(checkout_error_to_response)?;

    match controller.dispatch(action).await {
        Ok(outcome) => Ok(Json(ActionResponse {
            outcome,
            view: controller.view(),
        })),
        Err(err) => {
            warn!(error = %err, "Checkout action failed");
            Err(to_api_error(
                checkout_error_response(&err).with_view(controller.view()),
            ))
        }
    }
}

/// Close a session
pub async fn delete_session(
    State(state): State<AppState>,
    CheckoutPath(session_id): CheckoutPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(session_id).await {
        info!(session_id = %session_id, "Closed checkout session");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(checkout_error_to_response(CheckoutError::SessionNotFound {
            session_id: session_id.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new("Test error", 400);
        assert_eq!(err.error, "Test error");
        assert_eq!(err.code, 400);
        assert!(err.view.is_none());
    }

    #[test]
    fn test_checkout_error_conversion() {
        let (status, _json) = checkout_error_to_response(CheckoutError::FormInvalid {
            violations: vec![],
        });
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, json) = checkout_error_to_response(CheckoutError::PaymentFailed {
            method: PaymentMethod::BankRedirect,
            message: "Payment failed. Please try again.".into(),
            cause: "cancelled".into(),
        });
        assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
        assert_eq!(json.details.as_deref(), Some("Payment failed. Please try again."));
    }

    #[test]
    fn test_rejection_is_bad_request() {
        let response =
            ApiRejection(CheckoutError::InvalidRequest("missing field `type`".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
