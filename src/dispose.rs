//! Pluggable release strategies.
//!
//! Every wrapper in [`ptr`](crate::ptr) stores a disposer by value and hands
//! it the raw pointer when its ownership ends. Disposers are always called,
//! even for a null pointer, so every implementation must treat null as a
//! no-op.

use crate::heap;
use core::ptr::NonNull;

/// Releases a raw pointer owned by a wrapper.
///
/// Closures of type `FnMut(*mut T)` implement this trait, so a wrapper can be
/// built with an ad-hoc disposer:
///
/// ```
/// use holdfast::ptr::TransferPtr;
/// use std::cell::Cell;
///
/// let released = Cell::new(0);
/// let mut slot = 5_i32;
/// {
///     let on_release = |p: *mut i32| {
///         if !p.is_null() {
///             released.set(released.get() + 1);
///         }
///     };
///     // SAFETY: `slot` outlives the wrapper and the disposer never frees it.
///     let _p = unsafe { TransferPtr::from_raw_with(std::ptr::addr_of_mut!(slot), on_release) };
/// }
/// assert_eq!(released.get(), 1);
/// ```
pub trait Dispose<T> {
    /// Releases `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` is either null or a pointer whose ownership the caller gives up
    /// with this call. It must not be used again afterwards.
    unsafe fn dispose(&mut self, ptr: *mut T);
}

/// Drops the pointee and frees its single-object heap allocation.
///
/// Matches pointers from [`heap::allocate`] and [`Box::into_raw`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DefaultDisposer;

impl<T> Dispose<T> for DefaultDisposer {
    #[inline]
    unsafe fn dispose(&mut self, ptr: *mut T) {
        if let Some(ptr) = NonNull::new(ptr) {
            heap::reclaim(ptr);
        }
    }
}

/// Never releases anything.
///
/// For pointers into storage the wrapper does not own, such as statics or an
/// arena that frees in bulk.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LeakDisposer;

impl<T> Dispose<T> for LeakDisposer {
    #[inline]
    unsafe fn dispose(&mut self, _ptr: *mut T) {}
}

impl<T, F> Dispose<T> for F
where
    F: FnMut(*mut T),
{
    #[inline]
    unsafe fn dispose(&mut self, ptr: *mut T) {
        self(ptr);
    }
}
