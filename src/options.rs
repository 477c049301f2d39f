use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::{Deserialize, Deserializer};
use tokio::sync::Notify;

/// Per-call settings handed to the transport untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CallOptions {
    /// Overrides the client-wide request timeout. Given in milliseconds when
    /// deserialized.
    #[serde(deserialize_with = "deserialize_millis")]
    pub request_timeout: Option<Duration>,

    /// Lets the caller abandon the call while it is in flight.
    #[serde(skip)]
    pub abort: Option<AbortSignal>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn with_abort_signal(mut self, signal: AbortSignal) -> Self {
        self.abort = Some(signal);
        self
    }
}

fn deserialize_millis<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
}

struct AbortState {
    aborted: AtomicBool,
    notify: Notify,
}

/// Shared flag that cancels in-flight calls once raised.
///
/// Clones observe the same flag. Two signals compare equal only when they are
/// clones of each other.
#[derive(Clone)]
pub struct AbortSignal {
    state: Arc<AbortState>,
}

impl Default for AbortSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl AbortSignal {
    pub fn new() -> Self {
        Self {
            state: Arc::new(AbortState {
                aborted: AtomicBool::new(false),
                notify: Notify::new(),
            }),
        }
    }

    /// Raises the signal. Idempotent.
    pub fn abort(&self) {
        self.state.aborted.store(true, Ordering::Release);
        self.state.notify.notify_waiters();
    }

    pub fn is_aborted(&self) -> bool {
        self.state.aborted.load(Ordering::Acquire)
    }

    /// Completes once [`abort`](Self::abort) has been called.
    pub async fn aborted(&self) {
        loop {
            let notified = self.state.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.is_aborted() {
                return;
            }
            notified.await;
        }
    }
}

impl PartialEq for AbortSignal {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl fmt::Debug for AbortSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbortSignal")
            .field("aborted", &self.is_aborted())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_request_timeout_millis() {
        let options: CallOptions = serde_json::from_str(r#"{"requestTimeout": 1500}"#).unwrap();
        assert_eq!(options.request_timeout, Some(Duration::from_millis(1500)));
        assert!(options.abort.is_none());
    }

    #[test]
    fn deserialize_empty_object() {
        let options: CallOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, CallOptions::default());
    }

    #[test]
    fn signals_compare_by_identity() {
        let a = AbortSignal::new();
        let b = AbortSignal::new();
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn aborted_resolves_after_abort() {
        let signal = AbortSignal::new();
        let waiter = {
            let signal = signal.clone();
            tokio::spawn(async move { signal.aborted().await })
        };
        tokio::task::yield_now().await;
        assert!(!signal.is_aborted());
        signal.abort();
        waiter.await.unwrap();
        assert!(signal.is_aborted());
    }

    #[tokio::test]
    async fn aborted_returns_immediately_when_already_raised() {
        let signal = AbortSignal::new();
        signal.abort();
        signal.aborted().await;
    }
}
