//! Bounded pool of exclusive-use handles.
//!
//! A semaphore with one permit per handle guards a free list. Holding a
//! permit guarantees a handle is on the free list, so checkout never
//! blocks on the mutex for longer than a `Vec::pop`. Waiters are served
//! in FIFO order by the tokio semaphore, so no caller is starved.

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::{Notify, OwnedSemaphorePermit, Semaphore};

use crate::error::RuntimeError;

/// Configuration for the handle pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of handles built at startup.
    pub size: usize,
    /// Longest wait for a free handle; `None` waits indefinitely.
    pub acquire_timeout: Option<Duration>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            size: 4,
            acquire_timeout: Some(Duration::from_secs(5)),
        }
    }
}

struct PoolInner<H> {
    free: Mutex<Vec<H>>,
    permits: Arc<Semaphore>,
    /// Signalled whenever a handle is pushed back.
    returned: Notify,
    size: usize,
    acquire_timeout: Option<Duration>,
}

impl<H> PoolInner<H> {
    fn lock_free(&self) -> MutexGuard<'_, Vec<H>> {
        // A panic while holding the lock cannot leave the Vec half-updated.
        self.free.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Thread-safe pool handing out one handle per caller.
pub struct HandlePool<H> {
    inner: Arc<PoolInner<H>>,
}

impl<H> Clone for HandlePool<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<H: Send + 'static> HandlePool<H> {
    /// Creates a pool owning `handles`.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::InvalidConfig` if `handles` is empty.
    pub fn new(handles: Vec<H>, acquire_timeout: Option<Duration>) -> Result<Self, RuntimeError> {
        if handles.is_empty() {
            return Err(RuntimeError::InvalidConfig(
                "pool needs at least one handle".into(),
            ));
        }
        let size = handles.len();
        Ok(Self {
            inner: Arc::new(PoolInner {
                free: Mutex::new(handles),
                permits: Arc::new(Semaphore::new(size)),
                returned: Notify::new(),
                size,
                acquire_timeout,
            }),
        })
    }

    /// Checks out a handle, waiting up to the configured timeout.
    ///
    /// The handle returns to the pool when the guard is dropped, including
    /// when the caller's future is cancelled.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::PoolExhausted` if the wait times out and
    /// `RuntimeError::PoolClosed` after [`HandlePool::close`].
    pub async fn acquire(&self) -> Result<PooledHandle<H>, RuntimeError> {
        let permits = Arc::clone(&self.inner.permits);
        let permit = match self.inner.acquire_timeout {
            Some(limit) => tokio::time::timeout(limit, permits.acquire_owned())
                .await
                .map_err(|_| RuntimeError::PoolExhausted {
                    waited_ms: limit.as_millis() as u64,
                })?,
            None => permits.acquire_owned().await,
        }
        .map_err(|_| RuntimeError::PoolClosed)?;

        let handle = self.inner.lock_free().pop().ok_or_else(|| {
            RuntimeError::TaskFailed("no free handle behind a granted permit".into())
        })?;
        Ok(PooledHandle {
            handle: Some(handle),
            pool: Arc::clone(&self.inner),
            _permit: permit,
        })
    }

    /// Waits until every handle is back in the pool.
    ///
    /// Works on a closed pool, so shutdown can `close` first and then
    /// wait for scoring that is still running.
    pub async fn drain(&self) {
        loop {
            let returned = self.inner.returned.notified();
            if self.inner.lock_free().len() == self.inner.size {
                return;
            }
            returned.await;
        }
    }

    /// Rejects all current and future waiters with `PoolClosed`.
    /// Handles already checked out still return on drop.
    pub fn close(&self) {
        self.inner.permits.close();
    }

    /// Total number of handles.
    pub fn size(&self) -> usize {
        self.inner.size
    }

    /// Handles currently free.
    pub fn available(&self) -> usize {
        self.inner.permits.available_permits()
    }

    /// Handles currently checked out.
    pub fn in_use(&self) -> usize {
        self.inner.size - self.available()
    }
}

/// Exclusive access to one pooled handle.
pub struct PooledHandle<H> {
    /// Always `Some` until `drop`.
    handle: Option<H>,
    pool: Arc<PoolInner<H>>,
    _permit: OwnedSemaphorePermit,
}

impl<H> Deref for PooledHandle<H> {
    type Target = H;

    fn deref(&self) -> &H {
        self.handle.as_ref().expect("pooled handle present until drop")
    }
}

impl<H> DerefMut for PooledHandle<H> {
    fn deref_mut(&mut self) -> &mut H {
        self.handle.as_mut().expect("pooled handle present until drop")
    }
}

impl<H> Drop for PooledHandle<H> {
    fn drop(&mut self) {
        // Push back before the permit field is dropped and wakes a waiter.
        if let Some(handle) = self.handle.take() {
            self.pool.lock_free().push(handle);
            self.pool.returned.notify_waiters();
        }
    }
}
