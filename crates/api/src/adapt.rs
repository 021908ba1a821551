//! Async adaptation of synchronous operations
//!
//! The storage engine is synchronous. Test code, however, is written
//! against an awaitable API. This module bridges the two without a thread
//! pool: an operation is captured in a [`Deferred`] future, runs on the
//! first poll and completes in that same poll.
//!
//! ## Contract
//!
//! For every operation listed in a [`deferred_ops!`] table:
//!
//! - calling the method performs no work and returns a future
//! - awaiting the future runs the synchronous operation exactly once
//! - the output is exactly what the synchronous operation returns, value
//!   or error, unchanged
//! - the future is `Ready` on its first poll
//!
//! Methods not listed in a table are ordinary synchronous methods.
//!
//! ## Example
//!
//! ```ignore
//! impl Widgets {
//!     fn count_blocking(&self, kind: String) -> Result<u64> { ... }
//! }
//!
//! deferred_ops! {
//!     impl Widgets {
//!         /// Count widgets of a kind
//!         pub fn count(&self, kind: String) -> Result<u64> => count_blocking;
//!     }
//! }
//!
//! let n = widgets.count("bolt").await?;
//! ```

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Future that runs a synchronous operation when first polled
#[must_use = "futures do nothing unless you `.await` or poll them"]
#[derive(Debug)]
pub struct Deferred<F> {
    op: Option<F>,
}

// The operation is never pinned; it is moved out and called.
impl<F> Unpin for Deferred<F> {}

impl<F, T> Future for Deferred<F>
where
    F: FnOnce() -> T,
{
    type Output = T;

    fn poll(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<T> {
        let op = self
            .op
            .take()
            .expect("Deferred polled after completion");
        Poll::Ready(op())
    }
}

/// Defer `op` until the returned future is first polled
pub fn defer<F, T>(op: F) -> Deferred<F>
where
    F: FnOnce() -> T,
{
    Deferred { op: Some(op) }
}

/// Generate awaitable wrappers for a table of synchronous operations
///
/// Each entry `fn name(&self, arg: Ty, ...) -> Ret => blocking;` produces
/// a method `name` taking `impl Into<Ty>` arguments and returning
/// `impl Future<Output = Ret>`, which calls `self.blocking(arg, ...)` when
/// polled. Arguments are converted before the future is created, so the
/// future only borrows `self`.
///
/// The table also defines `DEFERRED_OPERATIONS`, the names of the
/// generated methods in table order.
#[macro_export]
macro_rules! deferred_ops {
    (
        impl $target:ty {
            $(
                $(#[$meta:meta])*
                $vis:vis fn $name:ident(&self $(, $arg:ident: $arg_ty:ty)* $(,)?) -> $ret:ty => $blocking:ident;
            )+
        }
    ) => {
        impl $target {
            /// Names of the operations that return deferred futures
            pub const DEFERRED_OPERATIONS: &'static [&'static str] = &[$(stringify!($name)),+];

            $(
                $(#[$meta])*
                $vis fn $name(
                    &self
                    $(, $arg: impl ::std::convert::Into<$arg_ty>)*
                ) -> impl ::std::future::Future<Output = $ret> + '_ {
                    $(let $arg: $arg_ty = $arg.into();)*
                    $crate::adapt::defer(move || self.$blocking($($arg),*))
                }
            )+
        }
    };
}
