//! Host-facing error presentation.
//!
//! # Design
//! The client itself returns typed errors; this adapter is where those
//! errors turn into user-visible alerts. Hosts implement [`UiNotifier`]
//! (marshalling onto their UI thread as needed) and route every endpoint
//! result through [`ErrorPresenter::handle`], which collapses failures to
//! `None` — the caller only ever sees "no result", the detail lives in the
//! alert already shown.
//!
//! Concurrent requests can fail together when the network drops. A
//! single-slot gate around the network alert makes sure only one such
//! dialog is on screen; it frees up when the user dismisses it.

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::error::ApiError;

/// Blocking alerts shown by the host.
pub trait UiNotifier: Send + Sync {
    /// Show a network-error alert and return once the user dismisses it.
    fn show_network_error(&self, message: &str);

    /// Show a "sign in again" alert. Not dismissable by back navigation;
    /// its single acknowledgement action must take the host to the login
    /// screen and close the current one.
    fn show_session_expired(&self, message: &str);
}

/// Routes `ApiError`s to the host's alerts, deduplicating network dialogs.
pub struct ErrorPresenter {
    notifier: Arc<dyn UiNotifier>,
    network_alert_gate: Mutex<()>,
}

impl ErrorPresenter {
    pub fn new(notifier: Arc<dyn UiNotifier>) -> Self {
        Self {
            notifier,
            network_alert_gate: Mutex::new(()),
        }
    }

    /// Collapse a result to `Some(value)` or `None`, showing the matching
    /// alert on failure.
    pub fn handle<T>(&self, result: Result<T, ApiError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.report(&err);
                None
            }
        }
    }

    /// Show the alert for `error` without consuming a result.
    pub fn report(&self, error: &ApiError) {
        match error {
            ApiError::Transport(detail) => {
                // Holding the guard across the blocking alert keeps the
                // slot taken until the user dismisses it.
                match self.network_alert_gate.try_lock() {
                    Ok(_guard) => {
                        let message = format!(
                            "Check your network connection, then reopen this page.\n\nDetails:\n{detail}"
                        );
                        self.notifier.show_network_error(&message);
                    }
                    Err(_) => {
                        debug!("network alert already on screen, skipping duplicate");
                    }
                }
            }
            err => {
                let message = format!("Please sign in again.\n\nDetails:\n{err}");
                self.notifier.show_session_expired(&message);
            }
        }
    }
}
