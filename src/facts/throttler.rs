use std::sync::Arc;
use tokio::sync::Semaphore;

/// Limits how many source fetches run simultaneously.
///
/// Wrap in an `Arc` via [`Throttler::new`], then call [`Throttler::acquire`]
/// before each fetch. At most `max_concurrent` fetches will be in flight at a
/// time, across all projects and source kinds.
#[derive(Debug)]
pub struct Throttler {
    semaphore: Arc<Semaphore>,
}

impl Throttler {
    /// Create a new throttler that allows at most `max_concurrent` tasks at a time.
    pub fn new(max_concurrent: usize) -> Arc<Self> {
        Arc::new(Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
        })
    }

    /// Acquire a concurrency slot.
    ///
    /// The returned permit must be held for the duration of the work. When it
    /// is dropped, the slot becomes available for another task.
    pub async fn acquire(&self) -> tokio::sync::OwnedSemaphorePermit {
        Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .expect("semaphore is never closed")
    }
}
