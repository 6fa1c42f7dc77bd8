//! # Submission Guard
//!
//! Allows one payment flow at a time across all payment methods. A ticket is
//! handed out when a flow starts and the guard is released when the ticket
//! is dropped, whichever way the flow ends.

use crate::error::{CheckoutError, CheckoutResult};
use crate::method::PaymentMethod;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct GuardState {
    active: Option<(PaymentMethod, u64)>,
    next_token: u64,
}

/// Single-in-flight submission guard
#[derive(Debug, Clone, Default)]
pub struct SubmissionGuard {
    state: Arc<Mutex<GuardState>>,
}

impl SubmissionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, GuardState> {
        // A panic while holding this lock cannot leave the state half-written
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Start a submission for `method`, or fail if one is already running
    pub fn try_begin(&self, method: PaymentMethod) -> CheckoutResult<SubmissionTicket> {
        let mut state = self.lock();
        if let Some((active, _)) = state.active {
            return Err(CheckoutError::SubmissionInProgress { active });
        }
        state.next_token += 1;
        let token = state.next_token;
        state.active = Some((method, token));

        Ok(SubmissionTicket {
            guard: self.clone(),
            method,
            token,
        })
    }

    /// Method of the running submission, if any
    pub fn active(&self) -> Option<PaymentMethod> {
        self.lock().active.map(|(method, _)| method)
    }

    fn release(&self, token: u64) {
        let mut state = self.lock();
        if matches!(state.active, Some((_, t)) if t == token) {
            state.active = None;
        }
    }
}

/// Proof of an in-flight submission; dropping it releases the guard
#[derive(Debug)]
pub struct SubmissionTicket {
    guard: SubmissionGuard,
    method: PaymentMethod,
    token: u64,
}

impl SubmissionTicket {
    pub fn method(&self) -> PaymentMethod {
        self.method
    }
}

impl Drop for SubmissionTicket {
    fn drop(&mut self) {
        self.guard.release(self.token);
    }
}
