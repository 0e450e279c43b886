use super::*;
use parking_lot::{Mutex, MutexGuard};

type InMemorySinkInner = Vec<(Context, Notification)>;

/// Sink that keeps every notification it receives
///
/// Useful for unit-tests, and for a UI that polls instead of being called.
#[derive(Debug, Default)]
pub struct InMemorySink {
    inner: Mutex<InMemorySinkInner>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn lock(&self) -> MutexGuard<'_, InMemorySinkInner> {
        self.inner.lock()
    }

    /// Remove and return everything received so far
    pub fn take(&self) -> InMemorySinkInner {
        std::mem::take(&mut *self.lock())
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().iter().map(|(_, n)| n.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl NotificationSink for InMemorySink {
    fn notify(&self, context: ContextRef, notification: Notification) -> Result<()> {
        self.lock().push((context.to_owned(), notification));
        Ok(())
    }
}
