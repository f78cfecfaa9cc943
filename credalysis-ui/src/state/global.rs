//! Global Application State
//!
//! Reactive state management using Leptos signals. The identity is read
//! from local storage once, here, and handed to every page.

use leptos::*;

use credalysis::error::AppError;
use credalysis::models::{check_access, Identity, ACCESS_KEY, AUTH_KEY, IDENTITY_KEY};

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// Session read from local storage at startup
    pub session: RwSignal<StoredSession>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
}

/// The identity keys kept in local storage
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StoredSession {
    pub email: Option<String>,
    pub auth: Option<String>,
    pub access: Option<String>,
}

impl StoredSession {
    /// Read the session keys from local storage
    pub fn load() -> Self {
        let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten())
        else {
            return Self::default();
        };
        let get = |key: &str| storage.get_item(key).ok().flatten();

        Self {
            email: get(IDENTITY_KEY),
            auth: get(AUTH_KEY),
            access: get(ACCESS_KEY),
        }
    }

    pub fn identity(&self) -> Option<Identity> {
        self.email.clone().and_then(Identity::new)
    }

    /// Check the auth flag and access role
    pub fn check_user(&self) -> Result<(), AppError> {
        check_access(self.auth.as_deref() == Some("true"), self.access.as_deref())
    }
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let state = GlobalState {
        session: create_rw_signal(StoredSession::load()),
        error: create_rw_signal(None),
        success: create_rw_signal(None),
    };

    provide_context(state);
}

impl GlobalState {
    pub fn identity(&self) -> Option<Identity> {
        self.session.with_untracked(StoredSession::identity)
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(3000, move || {
            success_signal.set(None);
        }).forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        }).forget();
    }

    /// Log a failed action and show its alert
    pub fn report(&self, err: &AppError) {
        web_sys::console::error_1(&err.to_string().into());
        self.show_error(&err.alert_message());
    }

    /// Clear error message
    pub fn clear_error(&self) {
        self.error.set(None);
    }
}
