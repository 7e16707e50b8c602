use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::SqlConnectorError;
use crate::results::SqlResult;
use crate::statement::Statement;
use crate::types::Dialect;

/// Contract every backend binding satisfies.
///
/// A connector exclusively owns one underlying driver handle, created lazily
/// on first use and memoized afterwards.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Driver handle returned by [`Connector::get_instance`].
    type Instance: Send + Sync;

    fn name(&self) -> &str;

    fn dialect(&self) -> Dialect;

    /// Return the driver handle, creating it on first call.
    async fn get_instance(&self) -> Result<Self::Instance, SqlConnectorError>;

    /// Run SQL text with no bound parameters.
    async fn exec(&self, sql: &str) -> Result<SqlResult, SqlConnectorError>;

    fn prepare(&self, sql: &str) -> Statement;

    /// Release the driver handle.
    async fn dispose(&self) -> Result<(), SqlConnectorError> {
        Ok(())
    }
}

/// Memoized, lazily created driver handle.
///
/// The slot lock is held across the connect future, so concurrent first
/// callers wait on the same attempt instead of opening duplicates.
#[derive(Debug)]
pub struct LazyHandle<H> {
    slot: Mutex<Option<Arc<H>>>,
}

impl<H> Default for LazyHandle<H> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }
}

impl<H> LazyHandle<H> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the live handle or create it with `init`.
    ///
    /// # Errors
    /// Returns whatever `init` fails with; the slot stays empty in that case.
    pub async fn get_or_try_init<F, Fut>(&self, init: F) -> Result<Arc<H>, SqlConnectorError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<H, SqlConnectorError>>,
    {
        self.get_valid_or_try_init(|_| true, init).await
    }

    /// Like [`LazyHandle::get_or_try_init`], but replaces a handle that fails `is_valid`.
    ///
    /// # Errors
    /// Returns whatever `init` fails with; the slot stays empty in that case.
    pub async fn get_valid_or_try_init<P, F, Fut>(
        &self,
        is_valid: P,
        init: F,
    ) -> Result<Arc<H>, SqlConnectorError>
    where
        P: FnOnce(&H) -> bool,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<H, SqlConnectorError>>,
    {
        let mut slot = self.slot.lock().await;
        if let Some(handle) = slot.as_ref() {
            if is_valid(handle) {
                return Ok(Arc::clone(handle));
            }
            tracing::debug!("discarding stale driver handle");
            *slot = None;
        }
        let handle = Arc::new(init().await?);
        *slot = Some(Arc::clone(&handle));
        Ok(handle)
    }

    /// Remove the handle from the slot, leaving it empty.
    pub async fn take(&self) -> Option<Arc<H>> {
        self.slot.lock().await.take()
    }

    pub async fn is_initialized(&self) -> bool {
        self.slot.lock().await.is_some()
    }
}

/// Reject empty SQL before any connection is attempted.
pub(crate) fn ensure_sql(sql: &str) -> Result<(), SqlConnectorError> {
    if sql.is_empty() {
        Err(SqlConnectorError::EmptyQuery)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test]
    async fn concurrent_first_access_connects_once() {
        let handle = Arc::new(LazyHandle::<usize>::new());
        let attempts = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let handle = Arc::clone(&handle);
            let attempts = Arc::clone(&attempts);
            tasks.push(tokio::spawn(async move {
                handle
                    .get_or_try_init(|| async {
                        tokio::task::yield_now().await;
                        Ok(attempts.fetch_add(1, Ordering::SeqCst))
                    })
                    .await
            }));
        }
        for task in tasks {
            assert_eq!(*task.await.unwrap().unwrap(), 0);
        }
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_init_leaves_slot_empty() {
        let handle = LazyHandle::<u8>::new();
        let err = handle
            .get_or_try_init(|| async { Err(SqlConnectorError::ConnectionError("down".into())) })
            .await;
        assert!(err.is_err());
        assert!(!handle.is_initialized().await);
        let ok = handle.get_or_try_init(|| async { Ok(3) }).await.unwrap();
        assert_eq!(*ok, 3);
    }

    #[tokio::test]
    async fn invalid_handle_is_replaced() {
        let handle = LazyHandle::<u8>::new();
        handle.get_or_try_init(|| async { Ok(1) }).await.unwrap();
        let next = handle
            .get_valid_or_try_init(|v| *v != 1, || async { Ok(2) })
            .await
            .unwrap();
        assert_eq!(*next, 2);
        assert_eq!(*handle.take().await.unwrap(), 2);
        assert!(!handle.is_initialized().await);
    }

    #[test]
    fn empty_sql_is_rejected() {
        assert!(matches!(ensure_sql(""), Err(SqlConnectorError::EmptyQuery)));
        assert!(ensure_sql("SELECT 1").is_ok());
    }
}
