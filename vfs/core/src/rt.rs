//! Scheduling seam between the entry layer and the host executor.

use futures::future::BoxFuture;
use std::future::Future;

/// Executor that pending resolutions run on.
///
/// Implementations decide where and when the future is polled. Dropping the
/// future without polling it to completion abandons the operation.
pub trait VfsRuntime: Send + Sync + 'static {
    fn spawn_boxed(&self, fut: BoxFuture<'static, ()>);
}

pub trait VfsRuntimeExt {
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

impl<R> VfsRuntimeExt for R
where
    R: VfsRuntime + ?Sized,
{
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.spawn_boxed(Box::pin(fut));
    }
}
