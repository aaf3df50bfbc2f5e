//! Suppression of repeated network and server error toasts.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::api::errors::ApiError;

/// Shared across workers; remembers when each administrator last saw each
/// error class.
#[derive(Debug)]
pub struct ErrorToastThrottle {
    cooldown: Duration,
    last_shown: Mutex<HashMap<(String, &'static str), Instant>>,
}

impl ErrorToastThrottle {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_shown: Mutex::new(HashMap::new()),
        }
    }

    /// View of the throttle for one administrator.
    pub fn scoped(&self, owner: impl Into<String>) -> ToastScope<'_> {
        ToastScope {
            throttle: self,
            owner: owner.into(),
        }
    }

    /// Whether `owner` should see `err` now. Client errors always show.
    pub fn should_show_at(&self, owner: &str, err: &ApiError, now: Instant) -> bool {
        let Some(class) = err.toast_class() else {
            return true;
        };
        let mut last_shown = match self.last_shown.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let cooldown = self.cooldown;
        last_shown.retain(|_, shown| now.saturating_duration_since(*shown) < cooldown);

        let key = (owner.to_string(), class);
        if last_shown.contains_key(&key) {
            return false;
        }
        last_shown.insert(key, now);
        true
    }
}

/// [`ErrorToastThrottle`] bound to the administrator of the current request.
#[derive(Debug)]
pub struct ToastScope<'a> {
    throttle: &'a ErrorToastThrottle,
    owner: String,
}

impl ToastScope<'_> {
    pub fn should_show(&self, err: &ApiError) -> bool {
        self.throttle.should_show_at(&self.owner, err, Instant::now())
    }
}
