//! Toast notification queue.
//!
//! Notices are shown in insertion order. A notice posted with a non-zero
//! time-to-live schedules its own removal on the `tokio` runtime; dismissing
//! it first aborts that timer, and an expiry that still fires only ever
//! removes the notice with its own id.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::AbortHandle;
use tracing::{debug, warn};

use crate::lock;

/// Default time-to-live for notices posted without an explicit one.
pub const DEFAULT_TTL: Duration = Duration::from_millis(5000);

/// Ids are unique for the whole process, even across store containers.
static NEXT_NOTICE_ID: AtomicU64 = AtomicU64::new(0);

/// Kind of notice, affecting styling and icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Info,
    Warning,
}

/// Process-unique notice identifier. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoticeId(u64);

impl NoticeId {
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NoticeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Optional button shown on a notice.
#[derive(Clone)]
pub struct NoticeAction {
    pub label: String,
    on_invoke: Arc<dyn Fn() + Send + Sync>,
}

impl NoticeAction {
    pub fn new<F>(label: impl Into<String>, on_invoke: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            on_invoke: Arc::new(on_invoke),
        }
    }

    pub fn invoke(&self) {
        (self.on_invoke)();
    }
}

impl fmt::Debug for NoticeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoticeAction")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// A short-lived user-facing message.
#[derive(Debug, Clone)]
pub struct Notice {
    pub id: NoticeId,
    pub message: String,
    pub severity: Severity,
    /// Zero means the notice stays until dismissed.
    pub ttl: Duration,
    pub action: Option<NoticeAction>,
}

#[derive(Default)]
struct ToastState {
    notices: Vec<Notice>,
    timers: HashMap<NoticeId, AbortHandle>,
}

struct ToastInner {
    state: Mutex<ToastState>,
    default_ttl: Duration,
}

/// Shared handle to the toast queue.
#[derive(Clone)]
pub struct ToastStore {
    inner: Arc<ToastInner>,
}

impl ToastStore {
    pub(crate) fn new(default_ttl: Duration) -> Self {
        Self {
            inner: Arc::new(ToastInner {
                state: Mutex::new(ToastState::default()),
                default_ttl,
            }),
        }
    }

    /// Append a notice and return its id immediately.
    ///
    /// With a non-zero `ttl` the notice removes itself once `ttl` has
    /// elapsed. Scheduling needs a `tokio` runtime; without one the notice
    /// stays until dismissed.
    pub fn post(
        &self,
        message: impl Into<String>,
        severity: Severity,
        ttl: Duration,
        action: Option<NoticeAction>,
    ) -> NoticeId {
        let id = NoticeId(NEXT_NOTICE_ID.fetch_add(1, Ordering::Relaxed));
        let notice = Notice {
            id,
            message: message.into(),
            severity,
            ttl,
            action,
        };

        let mut state = lock(&self.inner.state);
        state.notices.push(notice);
        if !ttl.is_zero() {
            if let Some(timer) = self.schedule_expiry(id, ttl) {
                state.timers.insert(id, timer);
            }
        }
        debug!(%id, ?severity, ttl_ms = ttl.as_millis(), "Notice posted");

        id
    }

    /// Post with the configured default time-to-live and no action.
    pub fn post_default(&self, message: impl Into<String>, severity: Severity) -> NoticeId {
        self.post(message, severity, self.inner.default_ttl, None)
    }

    /// Remove the notice with `id` and cancel its expiry.
    ///
    /// Unknown ids are ignored. Returns whether a notice was removed.
    pub fn dismiss(&self, id: NoticeId) -> bool {
        let mut state = lock(&self.inner.state);
        if let Some(timer) = state.timers.remove(&id) {
            timer.abort();
        }
        let removed = remove_notice(&mut state.notices, id);
        if removed {
            debug!(%id, "Notice dismissed");
        }
        removed
    }

    /// Run the action attached to notice `id`.
    ///
    /// Returns `false` if the notice is gone or has no action. The callback
    /// runs without the queue locked, so it may post or dismiss notices.
    pub fn invoke_action(&self, id: NoticeId) -> bool {
        let action = lock(&self.inner.state)
            .notices
            .iter()
            .find(|notice| notice.id == id)
            .and_then(|notice| notice.action.clone());

        match action {
            Some(action) => {
                action.invoke();
                true
            }
            None => false,
        }
    }

    /// Dismiss every notice and cancel all pending expiries.
    pub fn clear(&self) {
        let mut state = lock(&self.inner.state);
        for (_, timer) in state.timers.drain() {
            timer.abort();
        }
        state.notices.clear();
    }

    /// Snapshot of the queued notices, in display order.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        lock(&self.inner.state).notices.clone()
    }

    #[must_use]
    pub fn get(&self, id: NoticeId) -> Option<Notice> {
        lock(&self.inner.state)
            .notices
            .iter()
            .find(|notice| notice.id == id)
            .cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.inner.state).notices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.inner.state).notices.is_empty()
    }

    fn schedule_expiry(&self, id: NoticeId, ttl: Duration) -> Option<AbortHandle> {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(%id, "No tokio runtime, notice will not expire on its own");
            return None;
        };

        let store: Weak<ToastInner> = Arc::downgrade(&self.inner);
        let task = runtime.spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Some(inner) = store.upgrade() {
                Self { inner }.expire(id);
            }
        });
        Some(task.abort_handle())
    }

    fn expire(&self, id: NoticeId) {
        let mut state = lock(&self.inner.state);
        state.timers.remove(&id);
        if remove_notice(&mut state.notices, id) {
            debug!(%id, "Notice expired");
        }
    }
}

fn remove_notice(notices: &mut Vec<Notice>, id: NoticeId) -> bool {
    match notices.iter().position(|notice| notice.id == id) {
        Some(index) => {
            notices.remove(index);
            true
        }
        None => false,
    }
}

impl fmt::Debug for ToastStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastStore")
            .field("notices", &lock(&self.inner.state).notices)
            .field("default_ttl", &self.inner.default_ttl)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn store() -> ToastStore {
        ToastStore::new(DEFAULT_TTL)
    }

    fn pending_timers(store: &ToastStore) -> usize {
        lock(&store.inner.state).timers.len()
    }

    #[test]
    fn test_ids_increase_and_order_is_insertion() {
        let toasts = store();
        let a = toasts.post("first", Severity::Info, Duration::ZERO, None);
        let b = toasts.post("second", Severity::Error, Duration::ZERO, None);

        assert!(b > a);
        let messages: Vec<_> = toasts.notices().into_iter().map(|n| n.message).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[test]
    fn test_ids_unique_across_stores() {
        let first = store().post("x", Severity::Info, Duration::ZERO, None);
        let second = store().post("x", Severity::Info, Duration::ZERO, None);
        assert_ne!(first, second);
    }

    #[test]
    fn test_dismiss_unknown_id_is_noop() {
        let toasts = store();
        let id = toasts.post("x", Severity::Info, Duration::ZERO, None);

        assert!(toasts.dismiss(id));
        assert!(!toasts.dismiss(id));
        assert!(toasts.is_empty());
    }

    #[test]
    fn test_post_without_runtime_does_not_expire() {
        let toasts = store();
        let id = toasts.post("x", Severity::Warning, Duration::from_millis(50), None);

        assert!(toasts.get(id).is_some());
        assert_eq!(pending_timers(&toasts), 0);
    }

    #[test]
    fn test_invoke_action() {
        let toasts = store();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_action = Arc::clone(&calls);
        let action = NoticeAction::new("Try Again", move || {
            calls_in_action.fetch_add(1, Ordering::SeqCst);
        });

        let with_action = toasts.post("failed", Severity::Error, Duration::ZERO, Some(action));
        let without_action = toasts.post("ok", Severity::Success, Duration::ZERO, None);

        assert!(toasts.invoke_action(with_action));
        assert!(!toasts.invoke_action(without_action));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            toasts.get(with_action).unwrap().action.unwrap().label,
            "Try Again"
        );
    }

    #[test]
    fn test_action_may_dismiss_its_notice() {
        let toasts = store();
        let handle = toasts.clone();
        let slot: Arc<Mutex<Option<NoticeId>>> = Arc::new(Mutex::new(None));
        let slot_in_action = Arc::clone(&slot);
        let action = NoticeAction::new("Undo", move || {
            if let Some(id) = *slot_in_action.lock().unwrap() {
                handle.dismiss(id);
            }
        });

        let id = toasts.post("removed", Severity::Info, Duration::ZERO, Some(action));
        *slot.lock().unwrap() = Some(id);

        assert!(toasts.invoke_action(id));
        assert!(toasts.is_empty());
    }

    #[test]
    fn test_severity_wire_names() {
        assert_eq!(serde_json::to_string(&Severity::Warning).unwrap(), "\"warning\"");
        assert_eq!(
            serde_json::from_str::<Severity>("\"success\"").unwrap(),
            Severity::Success
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_ttl_never_expires() {
        let toasts = store();
        let id = toasts.post("sticky", Severity::Info, Duration::ZERO, None);

        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert!(toasts.get(id).is_some());
        assert_eq!(pending_timers(&toasts), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_notice_expires_after_ttl() {
        let toasts = store();
        let id = toasts.post("x", Severity::Info, Duration::from_millis(50), None);

        tokio::time::sleep(Duration::from_millis(49)).await;
        assert!(toasts.get(id).is_some());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(toasts.get(id).is_none());
        assert_eq!(pending_timers(&toasts), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_post_default_uses_configured_ttl() {
        let toasts = ToastStore::new(Duration::from_millis(200));
        let id = toasts.post_default("added to cart", Severity::Success);
        assert_eq!(toasts.get(id).unwrap().ttl, Duration::from_millis(200));

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(toasts.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_before_expiry_leaves_newer_notice() {
        let toasts = store();
        let early = toasts.post("saved", Severity::Success, Duration::from_millis(50), None);
        assert!(toasts.dismiss(early));
        assert_eq!(pending_timers(&toasts), 0);

        let newer = toasts.post("saved", Severity::Success, Duration::ZERO, None);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(toasts.get(newer).is_some());
        assert_eq!(toasts.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_removes_by_id_not_position() {
        let toasts = store();
        let first = toasts.post("a", Severity::Info, Duration::ZERO, None);
        let expiring = toasts.post("b", Severity::Info, Duration::from_millis(30), None);
        let last = toasts.post("c", Severity::Info, Duration::ZERO, None);

        toasts.dismiss(first);
        tokio::time::sleep(Duration::from_millis(40)).await;

        let ids: Vec<_> = toasts.notices().into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![last]);
        assert!(toasts.get(expiring).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_cancels_pending_expiries() {
        let toasts = store();
        toasts.post("a", Severity::Info, Duration::from_millis(10), None);
        toasts.post("b", Severity::Info, Duration::from_millis(20), None);

        toasts.clear();
        assert!(toasts.is_empty());
        assert_eq!(pending_timers(&toasts), 0);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(toasts.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_store_does_not_panic_on_expiry() {
        let toasts = store();
        toasts.post("a", Severity::Info, Duration::from_millis(10), None);
        drop(toasts);

        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
