use serde_json::Value;
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::coerce;

/// Page navigation capability (the `window.location.href = ...` side effect).
pub trait Navigator: Send + Sync {
    fn navigate(&self, href: &str);
}

/// Records every navigation instead of leaving the page.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    history: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, href: &str) {
        info!(href, "navigating");
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(href.to_string());
    }
}

/// The redirect requested by a document's `auto` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    Immediate { href: String },
    Delayed { href: String, delay: Duration },
}

impl Redirect {
    /// Read `{ href, delay }`. A falsy `href` means no redirect; any truthy
    /// one is navigated to in its string form (`7` -> `"7"`).
    ///
    /// `delay` is taken for its truthiness: absent, `null`, `false`, `0` and
    /// `""` all mean "navigate now", never a zero-length timer.
    pub fn from_auto(auto: &Value) -> Option<Self> {
        if !coerce::is_truthy(Some(auto)) {
            return None;
        }
        let href = auto.get("href");
        if !coerce::is_truthy(href) {
            debug!(?href, "auto has no href; no redirect");
            return None;
        }
        let href = coerce::display_string(href);

        match auto.get("delay").and_then(truthy_delay) {
            Some(delay) => Some(Redirect::Delayed { href, delay }),
            None => Some(Redirect::Immediate { href }),
        }
    }

    pub fn href(&self) -> &str {
        match self {
            Redirect::Immediate { href } | Redirect::Delayed { href, .. } => href,
        }
    }

    /// Navigate now, or spawn a one-shot timer that navigates later.
    ///
    /// A scheduled redirect cannot be cancelled; dropping the handle detaches it.
    ///
    /// # Panics
    ///
    /// A `Delayed` redirect spawns onto the current tokio runtime and panics
    /// when called outside one. `Immediate` never touches the runtime.
    pub fn dispatch(self, navigator: Arc<dyn Navigator>) -> DispatchedRedirect {
        match self {
            Redirect::Immediate { href } => {
                navigator.navigate(&href);
                DispatchedRedirect::Immediate { href }
            }
            Redirect::Delayed { href, delay } => {
                debug!(href = %href, delay_ms = delay.as_millis() as u64, "redirect scheduled");
                let target = href.clone();
                let handle = tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    navigator.navigate(&target);
                });
                DispatchedRedirect::Scheduled {
                    href,
                    delay,
                    handle,
                }
            }
        }
    }
}

#[derive(Debug)]
pub enum DispatchedRedirect {
    Immediate {
        href: String,
    },
    Scheduled {
        href: String,
        delay: Duration,
        handle: JoinHandle<()>,
    },
}

impl DispatchedRedirect {
    pub fn href(&self) -> &str {
        match self {
            DispatchedRedirect::Immediate { href } | DispatchedRedirect::Scheduled { href, .. } => {
                href
            }
        }
    }

    /// Wait for a scheduled redirect to fire. Immediate ones are already done.
    pub async fn wait(self) {
        if let DispatchedRedirect::Scheduled { handle, .. } = self {
            let _ = handle.await;
        }
    }
}

/// Timer delay for a truthy `delay` value, `None` for a falsy one.
///
/// Truthy values that are not a positive count of milliseconds (negative
/// numbers, non-numeric strings) still schedule a timer, clamped to zero.
fn truthy_delay(delay: &Value) -> Option<Duration> {
    if !coerce::is_truthy(Some(delay)) {
        return None;
    }
    let millis = match delay {
        Value::Bool(_) => 1.0,
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };

    if millis.is_finite() && millis > 0.0 {
        Some(Duration::from_millis(millis as u64))
    } else {
        Some(Duration::ZERO)
    }
}
