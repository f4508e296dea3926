//! Bounded blocking wait for blocking stub facets.

use std::future::Future;
use std::time::Duration;

use tokio::runtime::Handle;

use crate::Error;

/// Await `future` on `handle`, failing with [`Error::Timeout`] once
/// `deadline` elapses.
///
/// Blocking stubs are a thin wrapper over the corresponding async call;
/// this helper is that wrapper. There is no separate blocking code path —
/// the future is the same one the async facet returns, driven to
/// completion (or abandoned) from the calling thread.
///
/// On timeout the future is dropped, which cancels whatever work was in
/// flight.
///
/// # Panics
///
/// Panics if called from within an asynchronous context; blocking facets
/// are for threads that do not run on the runtime.
pub fn await_with_deadline<T, F>(handle: &Handle, deadline: Duration, future: F) -> Result<T, Error>
where
    F: Future<Output = Result<T, Error>>,
{
    match handle.block_on(async move { tokio::time::timeout(deadline, future).await }) {
        Ok(result) => result,
        Err(_elapsed) => Err(Error::Timeout {
            millis: deadline.as_millis() as u64,
        }),
    }
}
