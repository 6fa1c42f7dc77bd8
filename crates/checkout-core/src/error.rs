//! # Checkout Error Types
//!
//! Typed error handling for the checkout form.
//! All checkout operations return `Result<T, CheckoutError>`.

use crate::method::PaymentMethod;
use crate::order::FieldViolation;
use thiserror::Error;

/// Core error type for all checkout operations
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Configuration errors (bad keys, invalid pricing)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Form failed constraint validation; no payment step was attempted
    #[error("Form invalid: {}", summarize(.violations))]
    FormInvalid { violations: Vec<FieldViolation> },

    /// Payment flow failed; `message` is what the customer sees
    #[error("Payment failed [{method}]: {message}")]
    PaymentFailed {
        method: PaymentMethod,
        message: String,
        cause: String,
    },

    /// Payment provider rejected or errored (collapsed into `PaymentFailed` by the flow)
    #[error("Provider error [{provider}]: {message}")]
    Provider { provider: String, message: String },

    /// Another payment flow is still running
    #[error("A {active} payment is already in progress")]
    SubmissionInProgress { active: PaymentMethod },

    /// Payment method not recognised or not registered
    #[error("Unknown payment method: {0}")]
    UnknownPaymentMethod(String),

    /// Shipping type not recognised
    #[error("Unknown shipping type: {0}")]
    UnknownShippingType(String),

    /// Form field name not recognised
    #[error("Unknown form field: {0}")]
    UnknownField(String),

    /// Request body could not be read (bad JSON, unknown method or shipping value)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Checkout session not found
    #[error("Session not found: {session_id}")]
    SessionNotFound { session_id: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl CheckoutError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CheckoutError::Configuration(_) => 500,
            CheckoutError::FormInvalid { .. } => 422,
            CheckoutError::PaymentFailed { .. } => 402,
            CheckoutError::Provider { .. } => 502,
            CheckoutError::SubmissionInProgress { .. } => 409,
            CheckoutError::UnknownPaymentMethod(_) => 400,
            CheckoutError::UnknownShippingType(_) => 400,
            CheckoutError::UnknownField(_) => 400,
            CheckoutError::InvalidRequest(_) => 400,
            CheckoutError::SessionNotFound { .. } => 404,
            CheckoutError::Serialization(_) => 500,
        }
    }

    /// Returns true if the error was raised by something the customer did
    /// (and can fix), rather than by the service or a provider.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            CheckoutError::FormInvalid { .. }
                | CheckoutError::PaymentFailed { .. }
                | CheckoutError::SubmissionInProgress { .. }
        )
    }

    /// Message for the customer-facing banner, if this error has one
    pub fn banner_message(&self) -> Option<&str> {
        match self {
            CheckoutError::PaymentFailed { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Result type alias for checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{FormField, Violation};

    #[test]
    fn test_status_codes() {
        assert_eq!(
            CheckoutError::FormInvalid { violations: vec![] }.status_code(),
            422
        );
        assert_eq!(
            CheckoutError::SubmissionInProgress {
                active: PaymentMethod::Card
            }
            .status_code(),
            409
        );
        assert_eq!(
            CheckoutError::SessionNotFound {
                session_id: "x".into()
            }
            .status_code(),
            404
        );
        assert_eq!(
            CheckoutError::InvalidRequest("missing field `type`".into()).status_code(),
            400
        );
    }

    #[test]
    fn test_form_invalid_display() {
        let err = CheckoutError::FormInvalid {
            violations: vec![
                FieldViolation::new(FormField::Name, Violation::ValueMissing),
                FieldViolation::new(FormField::Email, Violation::TypeMismatch),
            ],
        };
        assert_eq!(
            err.to_string(),
            "Form invalid: name: value missing, email: type mismatch"
        );
        assert!(err.is_user_facing());
    }

    #[test]
    fn test_banner_message() {
        let err = CheckoutError::PaymentFailed {
            method: PaymentMethod::Card,
            message: "Payment failed. Please check your card details.".into(),
            cause: "declined".into(),
        };
        assert_eq!(
            err.banner_message(),
            Some("Payment failed. Please check your card details.")
        );
        assert!(CheckoutError::Configuration("x".into())
            .banner_message()
            .is_none());
    }
}
