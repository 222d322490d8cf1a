//! Metadata pre-fill behavior of the submission form's URL field.
//!
//! The browser runs an equivalent inline script; this module is the
//! reference model of that behavior:
//!
//! - **Paste** fetches metadata for the field's trimmed value, or for the
//!   pasted text when the field is still empty.
//! - **Change** schedules the same fetch after a quiet period. Each change
//!   cancels the previously scheduled fetch, so a burst of typing results in
//!   at most one fetch, for the last value.
//! - Every fetch is tagged with a sequence number. A response is applied
//!   only if no newer fetch has been issued since, so a slow early response
//!   can never overwrite a later one.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::meta::{Meta, MetadataSource};

/// Quiet period after the last change before metadata is fetched.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1500);

/// What the form shows: pre-fill defaults, an inline error, and whether a
/// submission is in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    /// Result of the last applied metadata fetch.
    pub meta: Option<Meta>,
    /// Error from the last applied fetch or submission.
    pub error: Option<String>,
    /// A submission is in flight.
    pub submitting: bool,
}

/// Runs a task after a delay, cancelling whatever was scheduled before.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    /// Create a debouncer with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Configured quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `task` to run after the quiet period, aborting the task
    /// scheduled by the previous call if it has not finished.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });

        if let Some(previous) = self.pending.lock().replace(handle) {
            previous.abort();
        }
    }

    /// Abort the scheduled task, if any.
    pub fn cancel(&self) {
        if let Some(pending) = self.pending.lock().take() {
            pending.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// State shared between the controller and its spawned fetches.
#[derive(Debug, Default)]
struct Shared {
    field: Mutex<String>,
    state: Mutex<FormState>,
    issued: AtomicU64,
}

impl Shared {
    /// Issue the next fetch sequence number.
    fn next_seq(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// Drives metadata pre-fill for the URL field.
pub struct PrefillController {
    source: Arc<dyn MetadataSource>,
    shared: Arc<Shared>,
    debouncer: Debouncer,
}

impl PrefillController {
    /// Create a controller fetching from `source` after `debounce` of quiet.
    pub fn new(source: Arc<dyn MetadataSource>, debounce: Duration) -> Self {
        Self {
            source,
            shared: Arc::new(Shared::default()),
            debouncer: Debouncer::new(debounce),
        }
    }

    /// Current value of the URL field.
    pub fn field_value(&self) -> String {
        self.shared.field.lock().clone()
    }

    /// Snapshot of what the form currently shows.
    pub fn snapshot(&self) -> FormState {
        self.shared.state.lock().clone()
    }

    /// Number of fetches issued so far.
    pub fn fetches_issued(&self) -> u64 {
        self.shared.issued.load(Ordering::SeqCst)
    }

    /// The URL field changed to `value`.
    pub fn on_change(&self, value: &str) {
        *self.shared.field.lock() = value.to_string();

        let captured = value.to_string();
        let shared = Arc::clone(&self.shared);
        let source = Arc::clone(&self.source);
        self.debouncer.schedule(async move {
            let unchanged = *shared.field.lock() == captured;
            if unchanged {
                let seq = shared.next_seq();
                fetch(shared, source, captured, seq).await;
            }
        });
    }

    /// Text was pasted into the URL field.
    ///
    /// Returns the handle of the spawned fetch.
    pub fn on_paste(&self, clipboard: &str) -> JoinHandle<()> {
        let current = self.shared.field.lock().trim().to_string();
        let url = if current.is_empty() {
            clipboard.to_string()
        } else {
            current
        };

        // Numbered before spawning so the order follows the user, not the
        // scheduler.
        let seq = self.shared.next_seq();
        tokio::spawn(fetch(
            Arc::clone(&self.shared),
            Arc::clone(&self.source),
            url,
            seq,
        ))
    }

    /// A submission started.
    pub fn submission_started(&self) {
        self.shared.state.lock().submitting = true;
    }

    /// A submission finished; `error` carries the handler's message if it
    /// was rejected.
    pub fn submission_finished(&self, error: Option<String>) {
        let mut state = self.shared.state.lock();
        state.submitting = false;
        if error.is_some() {
            state.meta = None;
            state.error = error;
        }
    }
}

/// Apply the response for fetch `seq` unless a newer fetch was issued.
async fn fetch(shared: Arc<Shared>, source: Arc<dyn MetadataSource>, url: String, seq: u64) {
    tracing::debug!(seq, url = %url, "fetching link metadata");

    let result = source.fetch(&url).await;

    if shared.issued.load(Ordering::SeqCst) != seq {
        tracing::debug!(seq, "discarding stale metadata response");
        return;
    }

    let mut state = shared.state.lock();
    match result {
        Ok(meta) => {
            state.meta = Some(meta);
            state.error = None;
        }
        Err(err) => {
            tracing::debug!(seq, error = %err, "metadata fetch failed");
            state.meta = None;
            state.error = Some(err.user_message());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::MetaError;
    use async_trait::async_trait;

    /// Records every requested URL; `slow` URLs take longer to answer.
    #[derive(Default)]
    struct RecordingSource {
        requests: Mutex<Vec<String>>,
    }

    impl RecordingSource {
        fn requests(&self) -> Vec<String> {
            self.requests.lock().clone()
        }
    }

    #[async_trait]
    impl MetadataSource for RecordingSource {
        async fn fetch(&self, url: &str) -> Result<Meta, MetaError> {
            self.requests.lock().push(url.to_string());
            if url.contains("slow") {
                tokio::time::sleep(Duration::from_millis(1000)).await;
            } else {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            if url.contains("broken") {
                return Err(MetaError::Rejected("Sayfa okunamadı".to_string()));
            }
            Ok(Meta {
                title: Some(format!("title of {url}")),
                description: Some(format!("about {url}")),
            })
        }
    }

    fn controller() -> (Arc<RecordingSource>, PrefillController) {
        let source = Arc::new(RecordingSource::default());
        let controller = PrefillController::new(source.clone(), DEFAULT_DEBOUNCE);
        (source, controller)
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_changes_fetches_once_with_last_value() {
        let (source, controller) = controller();

        controller.on_change("e");
        tokio::time::sleep(Duration::from_millis(400)).await;
        controller.on_change("example.com");
        tokio::time::sleep(Duration::from_millis(400)).await;
        controller.on_change("example.com/a");

        tokio::time::sleep(Duration::from_millis(2000)).await;

        assert_eq!(source.requests(), vec!["example.com/a".to_string()]);
        assert_eq!(controller.fetches_issued(), 1);
        let state = controller.snapshot();
        assert_eq!(
            state.meta.unwrap().title.as_deref(),
            Some("title of example.com/a")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn no_fetch_before_quiet_period() {
        let (source, controller) = controller();

        controller.on_change("example.com");
        tokio::time::sleep(Duration::from_millis(1400)).await;
        assert!(source.requests().is_empty());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(source.requests(), vec!["example.com".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn separate_pauses_fetch_each_value() {
        let (source, controller) = controller();

        controller.on_change("a.com");
        tokio::time::sleep(Duration::from_millis(1600)).await;
        controller.on_change("b.com");
        tokio::time::sleep(Duration::from_millis(1600)).await;

        assert_eq!(source.requests(), vec!["a.com".to_string(), "b.com".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn paste_uses_clipboard_when_field_empty() {
        let (source, controller) = controller();

        controller.on_paste("https://kamp.us").await.unwrap();

        assert_eq!(source.requests(), vec!["https://kamp.us".to_string()]);
        assert!(controller.snapshot().meta.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn paste_prefers_trimmed_field_value() {
        let (source, controller) = controller();

        controller.on_change("  https://field.example  ");
        controller.on_paste("https://clipboard.example").await.unwrap();

        assert_eq!(source.requests(), vec!["https://field.example".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_response_is_discarded() {
        let (source, controller) = controller();

        let slow = controller.on_paste("https://slow.example");
        tokio::time::sleep(Duration::from_millis(1)).await;
        let fast = controller.on_paste("https://fast.example");

        fast.await.unwrap();
        slow.await.unwrap();

        assert_eq!(source.requests().len(), 2);
        let meta = controller.snapshot().meta.unwrap();
        assert_eq!(meta.title.as_deref(), Some("title of https://fast.example"));
    }

    #[tokio::test(start_paused = true)]
    async fn endpoint_error_replaces_meta() {
        let (_source, controller) = controller();

        controller.on_paste("https://ok.example").await.unwrap();
        assert!(controller.snapshot().meta.is_some());

        controller.on_paste("https://broken.example").await.unwrap();
        let state = controller.snapshot();
        assert_eq!(state.meta, None);
        assert_eq!(state.error.as_deref(), Some("Sayfa okunamadı"));
    }

    /// Answers `old` URLs after a delay and everything else at once.
    struct LaggingSource;

    #[async_trait]
    impl MetadataSource for LaggingSource {
        async fn fetch(&self, url: &str) -> Result<Meta, MetaError> {
            if url.contains("old") {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            Ok(Meta {
                title: Some(url.to_string()),
                description: None,
            })
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn latest_paste_wins_across_workers() {
        for round in 0..50 {
            let controller = PrefillController::new(Arc::new(LaggingSource), DEFAULT_DEBOUNCE);

            let old = controller.on_paste("https://old.example");
            let new = controller.on_paste("https://new.example");
            old.await.unwrap();
            new.await.unwrap();

            let meta = controller.snapshot().meta.unwrap();
            assert_eq!(
                meta.title.as_deref(),
                Some("https://new.example"),
                "round {round}"
            );
            assert_eq!(controller.fetches_issued(), 2);
        }
    }

    #[tokio::test]
    async fn submission_state() {
        let (_source, controller) = controller();

        controller.submission_started();
        assert!(controller.snapshot().submitting);

        controller.submission_finished(Some("Başlık en az iki harfli olmalıdır.".to_string()));
        let state = controller.snapshot();
        assert!(!state.submitting);
        assert_eq!(
            state.error.as_deref(),
            Some("Başlık en az iki harfli olmalıdır.")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn debouncer_cancel_prevents_run() {
        let ran = Arc::new(AtomicU64::new(0));
        let debouncer = Debouncer::new(Duration::from_millis(100));

        let counter = ran.clone();
        debouncer.schedule(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        debouncer.cancel();

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(ran.load(Ordering::SeqCst), 0);
        assert_eq!(debouncer.delay(), Duration::from_millis(100));
    }
}
