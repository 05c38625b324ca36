//! [`VfsRuntime`] implementations.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::Context;
use std::thread::{self, Thread};

use entryfs_core::VfsRuntime;
use futures::future::BoxFuture;
use futures::task::{self as future_task, ArcWake};

thread_local! {
    /// Futures spawned while this thread is already draining inline work.
    static RUN_QUEUE: RefCell<Option<VecDeque<BoxFuture<'static, ()>>>> =
        const { RefCell::new(None) };
}

/// Runs spawned futures on the calling thread.
///
/// The outermost `spawn_boxed` on a thread runs its future to completion
/// before returning. Futures spawned while that is in progress (for example
/// from a continuation that starts another resolution) are queued and run
/// in order once the current one finishes. Nothing here enters a `futures`
/// executor, so spawning from inside `block_on` is fine.
///
/// Meant for tests and single-threaded embedders where deferred completion
/// is not required.
#[derive(Clone, Copy, Debug, Default)]
pub struct InlineTestRuntime;

impl VfsRuntime for InlineTestRuntime {
    fn spawn_boxed(&self, fut: BoxFuture<'static, ()>) {
        let fut = RUN_QUEUE.with_borrow_mut(|queue| match queue {
            Some(queue) => {
                queue.push_back(fut);
                tracing::trace!(queued = queue.len(), "inline runtime queued nested task");
                None
            }
            None => {
                *queue = Some(VecDeque::new());
                Some(fut)
            }
        });
        let Some(fut) = fut else {
            return;
        };

        let _drain = DrainGuard;
        let mut next = Some(fut);
        while let Some(fut) = next {
            run_to_completion(fut);
            next = RUN_QUEUE.with_borrow_mut(|queue| queue.as_mut().and_then(VecDeque::pop_front));
        }
    }
}

/// Ends the drain on this thread, dropping whatever is still queued if a
/// task panicked.
struct DrainGuard;

impl Drop for DrainGuard {
    fn drop(&mut self) {
        let leftover = RUN_QUEUE.with_borrow_mut(Option::take);
        if let Some(leftover) = leftover.filter(|queue| !queue.is_empty()) {
            tracing::debug!(dropped = leftover.len(), "inline runtime dropped queued tasks");
        }
    }
}

struct ThreadWaker {
    thread: Thread,
    woken: AtomicBool,
}

impl ArcWake for ThreadWaker {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.woken.store(true, Ordering::Release);
        arc_self.thread.unpark();
    }
}

/// Poll `fut` until it finishes, parking the thread while it is pending.
fn run_to_completion(mut fut: BoxFuture<'static, ()>) {
    let state = Arc::new(ThreadWaker {
        thread: thread::current(),
        woken: AtomicBool::new(false),
    });
    let waker = future_task::waker(state.clone());
    let mut cx = Context::from_waker(&waker);
    while fut.as_mut().poll(&mut cx).is_pending() {
        while !state.woken.swap(false, Ordering::Acquire) {
            thread::park();
        }
    }
}

#[cfg(feature = "tokio")]
pub use self::tokio_rt::TokioRuntime;

#[cfg(feature = "tokio")]
mod tokio_rt {
    use entryfs_core::VfsRuntime;
    use futures::future::BoxFuture;
    use tokio::runtime::Handle;

    /// Spawns resolutions as tasks on a tokio runtime.
    #[derive(Clone, Debug)]
    pub struct TokioRuntime {
        handle: Handle,
    }

    impl TokioRuntime {
        pub fn new(handle: Handle) -> Self {
            Self { handle }
        }

        /// Create a new [`TokioRuntime`] using the current
        /// [`tokio::runtime::Handle`].
        ///
        /// # Panics
        ///
        /// This will panic if called outside of a `tokio` context.
        pub fn current() -> Self {
            Self::new(Handle::current())
        }

        pub fn handle(&self) -> &Handle {
            &self.handle
        }
    }

    impl VfsRuntime for TokioRuntime {
        fn spawn_boxed(&self, fut: BoxFuture<'static, ()>) {
            // Completion is reported through the future itself.
            drop(self.handle.spawn(fut));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entryfs_core::VfsRuntimeExt;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    #[test]
    fn inline_runs_before_returning() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        InlineTestRuntime.spawn(async move {
            flag.store(true, Ordering::SeqCst);
        });
        assert!(ran.load(Ordering::SeqCst));
    }

    #[test]
    fn nested_spawn_runs_after_the_current_task() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let outer = order.clone();
        InlineTestRuntime.spawn(async move {
            outer.lock().unwrap().push("outer start");
            let inner = outer.clone();
            InlineTestRuntime.spawn(async move {
                inner.lock().unwrap().push("inner");
            });
            outer.lock().unwrap().push("outer end");
        });
        assert_eq!(*order.lock().unwrap(), ["outer start", "outer end", "inner"]);
    }

    #[test]
    fn spawn_inside_block_on() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        futures::executor::block_on(async move {
            InlineTestRuntime.spawn(async move {
                flag.store(true, Ordering::SeqCst);
            });
        });
        assert!(ran.load(Ordering::SeqCst));
    }

    #[test]
    fn pending_task_is_polled_again_when_woken() {
        let (tx, rx) = futures::channel::oneshot::channel();
        let worker = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(20));
            let _ = tx.send(7);
        });
        let got = Arc::new(Mutex::new(None));
        let slot = got.clone();
        InlineTestRuntime.spawn(async move {
            *slot.lock().unwrap() = rx.await.ok();
        });
        worker.join().unwrap();
        assert_eq!(*got.lock().unwrap(), Some(7));
    }

    #[cfg(feature = "tokio")]
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn tokio_runs_spawned_future() {
        let (tx, rx) = tokio::sync::oneshot::channel();
        TokioRuntime::current().spawn(async move {
            let _ = tx.send(42);
        });
        assert_eq!(rx.await.unwrap(), 42);
    }
}
