//! Resolving a [`FileEntry`] to a [`FileHandle`].
//!
//! Two equivalent surfaces are offered:
//!
//! - [`FileEntry::resolve`] is a plain `async fn` returning a `Result`.
//!   Ignoring failures means discarding the `Err`.
//! - [`FileEntry::resolve_to_file`] / [`FileEntry::resolve_with`] take
//!   continuations, schedule the backend call on the context's runtime and
//!   return immediately. Exactly one continuation runs, once, when the
//!   backend finishes. If no error continuation was given, failures are
//!   dropped.

use crate::rt::VfsRuntimeExt;
use crate::{FileEntry, FileHandle, ResolveError, VfsContext, VfsResult, VirtualPath};
use std::fmt;

pub type SuccessCallback = Box<dyn FnOnce(FileHandle) + Send + 'static>;
pub type ErrorCallback = Box<dyn FnOnce(ResolveError) + Send + 'static>;

/// Terminal state of one resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolveState {
    /// The success continuation received the handle.
    Resolved,
    /// The error continuation received the error.
    Failed,
    /// The backend failed and no error continuation was registered.
    FailedUnreported,
}

/// The continuations of a single pending resolution.
///
/// [`Completion::complete`] consumes the value, so a completion fires at
/// most once. Dropping it uncompleted (for example because the runtime
/// discarded the task) invokes neither continuation.
pub struct Completion {
    on_success: Option<SuccessCallback>,
    on_error: Option<ErrorCallback>,
    path: Option<VirtualPath>,
    fs: Option<String>,
}

impl Completion {
    pub fn new<S>(on_success: S) -> Self
    where
        S: FnOnce(FileHandle) + Send + 'static,
    {
        Self {
            on_success: Some(Box::new(on_success)),
            on_error: None,
            path: None,
            fs: None,
        }
    }

    pub fn on_error<E>(self, on_error: E) -> Self
    where
        E: FnOnce(ResolveError) + Send + 'static,
    {
        self.with_error_callback(Box::new(on_error))
    }

    pub fn with_error_callback(mut self, on_error: ErrorCallback) -> Self {
        self.on_error = Some(on_error);
        self
    }

    pub fn has_error_callback(&self) -> bool {
        self.on_error.is_some()
    }

    fn locate(&mut self, entry: &FileEntry) {
        self.path = Some(entry.virtual_path().clone());
        self.fs = Some(entry.filesystem().name().to_owned());
    }

    /// Dispatch the backend result to the matching continuation.
    pub fn complete(mut self, result: VfsResult<FileHandle>) -> ResolveState {
        let on_success = self.on_success.take();
        let on_error = self.on_error.take();
        match result {
            Ok(handle) => {
                drop(on_error);
                if let Some(on_success) = on_success {
                    on_success(handle);
                }
                ResolveState::Resolved
            }
            Err(err) => {
                drop(on_success);
                tracing::debug!(
                    path = ?self.path,
                    fs = ?self.fs,
                    error = %err,
                    reported = on_error.is_some(),
                    "file resolution failed"
                );
                match on_error {
                    Some(on_error) => {
                        on_error(ResolveError::from(err));
                        ResolveState::Failed
                    }
                    None => ResolveState::FailedUnreported,
                }
            }
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if self.on_success.is_some() {
            tracing::debug!(
                path = ?self.path,
                fs = ?self.fs,
                "file resolution abandoned before completion"
            );
        }
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("pending", &self.on_success.is_some())
            .field("has_error_callback", &self.on_error.is_some())
            .field("path", &self.path)
            .field("fs", &self.fs)
            .finish()
    }
}

impl FileEntry {
    /// Resolve this entry to a snapshot of the file it denotes.
    pub async fn resolve(&self, ctx: &VfsContext) -> Result<FileHandle, ResolveError> {
        tracing::trace!(
            fs = self.filesystem().name(),
            path = %self.virtual_path(),
            "resolving file entry"
        );
        self.filesystem()
            .get_file(ctx, self)
            .await
            .map_err(ResolveError::from)
    }

    /// Schedule resolution on `ctx`'s runtime and report through
    /// continuations.
    ///
    /// Returns as soon as the work is handed to the runtime. Passing `None`
    /// for `on_error` means failures are silently ignored.
    pub fn resolve_to_file<S>(
        &self,
        ctx: &VfsContext,
        on_success: S,
        on_error: Option<ErrorCallback>,
    ) where
        S: FnOnce(FileHandle) + Send + 'static,
    {
        let mut completion = Completion::new(on_success);
        if let Some(on_error) = on_error {
            completion = completion.with_error_callback(on_error);
        }
        self.resolve_with(ctx, completion);
    }

    pub fn resolve_with(&self, ctx: &VfsContext, mut completion: Completion) {
        completion.locate(self);
        let entry = self.clone();
        let task_ctx = ctx.clone();
        tracing::trace!(
            fs = entry.filesystem().name(),
            path = %entry.virtual_path(),
            "scheduling file resolution"
        );
        ctx.runtime.spawn(async move {
            let result = entry.filesystem().get_file(&task_ctx, &entry).await;
            let state = completion.complete(result);
            tracing::trace!(
                fs = entry.filesystem().name(),
                path = %entry.virtual_path(),
                ?state,
                "file resolution completed"
            );
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{VfsError, VfsErrorKind, VfsTimespec};
    use bytes::Bytes;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn handle() -> FileHandle {
        FileHandle::new(
            VirtualPath::new("/a.txt").unwrap(),
            Bytes::from_static(b"a"),
            VfsTimespec::default(),
        )
    }

    struct NamedFs;

    #[async_trait::async_trait]
    impl crate::Filesystem for NamedFs {
        fn name(&self) -> &str {
            "named"
        }

        async fn get_file(&self, _ctx: &VfsContext, _entry: &FileEntry) -> VfsResult<FileHandle> {
            Err(VfsError::new(VfsErrorKind::NotSupported, "named.get_file"))
        }
    }

    struct Counters {
        success: Arc<AtomicUsize>,
        error: Arc<AtomicUsize>,
    }

    fn counted(with_error: bool) -> (Completion, Counters) {
        let success = Arc::new(AtomicUsize::new(0));
        let error = Arc::new(AtomicUsize::new(0));
        let s = success.clone();
        let mut completion = Completion::new(move |_| {
            s.fetch_add(1, Ordering::SeqCst);
        });
        if with_error {
            let e = error.clone();
            completion = completion.on_error(move |_| {
                e.fetch_add(1, Ordering::SeqCst);
            });
        }
        (completion, Counters { success, error })
    }

    #[test]
    fn success_runs_only_success() {
        let (completion, counters) = counted(true);
        assert_eq!(completion.complete(Ok(handle())), ResolveState::Resolved);
        assert_eq!(counters.success.load(Ordering::SeqCst), 1);
        assert_eq!(counters.error.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failure_runs_only_error() {
        let (completion, counters) = counted(true);
        let state = completion.complete(Err(VfsError::new(VfsErrorKind::NotFound, "test")));
        assert_eq!(state, ResolveState::Failed);
        assert_eq!(counters.success.load(Ordering::SeqCst), 0);
        assert_eq!(counters.error.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failure_without_error_callback_is_dropped() {
        let (completion, counters) = counted(false);
        assert!(!completion.has_error_callback());
        let state = completion.complete(Err(VfsError::new(VfsErrorKind::Io, "test")));
        assert_eq!(state, ResolveState::FailedUnreported);
        assert_eq!(counters.success.load(Ordering::SeqCst), 0);
        assert_eq!(counters.error.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn abandoned_completion_invokes_nothing() {
        let (completion, counters) = counted(true);
        drop(completion);
        assert_eq!(counters.success.load(Ordering::SeqCst), 0);
        assert_eq!(counters.error.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn located_completion_carries_path_and_filesystem() {
        let fs = Arc::new(NamedFs);
        let entry = FileEntry::new(fs, "/logs/app.log").unwrap();
        let (mut completion, _counters) = counted(true);
        completion.locate(&entry);

        let debug = format!("{completion:?}");
        assert!(debug.contains("/logs/app.log"), "{debug}");
        assert!(debug.contains("\"named\""), "{debug}");
    }

    #[test]
    fn continuations_are_released_after_completion() {
        let token = Arc::new(());
        let held = token.clone();
        let completion = Completion::new(move |_| drop(held));
        assert_eq!(Arc::strong_count(&token), 2);
        completion.complete(Err(VfsError::new(VfsErrorKind::Io, "test")));
        assert_eq!(Arc::strong_count(&token), 1);
    }
}
