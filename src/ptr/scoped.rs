//! `ScopedPtr`: single owner, released where it was created.

use super::empty_deref;
use crate::dispose::{DefaultDisposer, Dispose};
use crate::heap;
use crate::trace::trace_event;
use core::fmt;
use core::marker::{PhantomData, PhantomPinned};
use core::mem;
use core::ops::{Deref, DerefMut};
use core::pin::{pin, Pin};
use core::ptr;

/// An owning pointer that never hands its value to another owner.
///
/// It has no `Clone` and no transfer operations, so the value is released by
/// this pointer and no other. The only exchange it supports is
/// [`swap`](Self::swap) with another `ScopedPtr`.
///
/// `ScopedPtr` is `!Unpin`. An owned binding can still be moved like any Rust
/// value, but the pinned handle given out by [`scope`](ScopedPtr::scope)
/// cannot be moved out of or swapped away.
///
/// Duplicating a `ScopedPtr` does not compile:
///
/// ```compile_fail
/// use holdfast::ptr::ScopedPtr;
///
/// let a = ScopedPtr::new(1);
/// let b = a.clone();
/// ```
///
/// ```compile_fail
/// use holdfast::ptr::ScopedPtr;
///
/// let mut a = ScopedPtr::new(1);
/// let b = ScopedPtr::new(2);
/// a.clone_from(&b);
/// ```
///
/// Neither does moving the pointer out of a scope:
///
/// ```compile_fail
/// use holdfast::ptr::ScopedPtr;
///
/// let escaped = ScopedPtr::scope(1, |mut p| std::mem::replace(&mut *p, ScopedPtr::empty()));
/// ```
///
/// ```compile_fail
/// use holdfast::ptr::ScopedPtr;
///
/// let mut outside = ScopedPtr::empty();
/// ScopedPtr::scope(1, |mut p| std::mem::swap(&mut *p, &mut outside));
/// ```
pub struct ScopedPtr<T, D: Dispose<T> = DefaultDisposer> {
    ptr: *mut T,
    disposer: D,
    _owns: PhantomData<T>,
    _pinned: PhantomPinned,
}

impl<T> ScopedPtr<T> {
    /// Moves `value` to the heap and owns it.
    pub fn new(value: T) -> Self {
        // SAFETY: fresh allocation from `heap::allocate`, matching `DefaultDisposer`.
        unsafe { Self::from_raw(heap::allocate(value).as_ptr()) }
    }

    /// Runs `f` with a pinned pointer owning `value` and releases whatever
    /// that pointer holds once `f` returns or unwinds.
    ///
    /// The pointer lives on this function's stack frame; `f` can change what
    /// it holds but cannot move it out.
    ///
    /// ```
    /// use holdfast::ptr::ScopedPtr;
    ///
    /// let len = ScopedPtr::scope(vec![1, 2, 3], |mut p| {
    ///     if let Some(v) = p.as_mut().value_mut() {
    ///         v.push(4);
    ///     }
    ///     p.len()
    /// });
    /// assert_eq!(len, 4);
    /// ```
    pub fn scope<R, F>(value: T, f: F) -> R
    where
        F: FnOnce(Pin<&mut ScopedPtr<T>>) -> R,
    {
        let owner = pin!(Self::new(value));
        f(owner)
    }

    /// Disposes the current value and owns `value` instead.
    pub fn replace(&mut self, value: T) {
        // SAFETY: fresh allocation from `heap::allocate`, matching `DefaultDisposer`.
        unsafe { self.reset(heap::allocate(value).as_ptr()) }
    }

    /// [`replace`](Self::replace) through a pinned handle.
    pub fn replace_pinned(self: Pin<&mut Self>, value: T) {
        self.unpinned().replace(value);
    }
}

impl<T, D: Dispose<T>> ScopedPtr<T, D> {
    /// Takes ownership of `ptr` with a default-constructed disposer.
    ///
    /// # Safety
    ///
    /// `ptr` is null or a pointer that `D::default()` may dispose once, and no
    /// one else will dispose it.
    pub unsafe fn from_raw(ptr: *mut T) -> Self
    where
        D: Default,
    {
        Self::from_raw_with(ptr, D::default())
    }

    /// Takes ownership of `ptr`, to be released by `disposer`.
    ///
    /// # Safety
    ///
    /// `ptr` is null or a pointer that `disposer` may dispose once, and no one
    /// else will dispose it.
    pub unsafe fn from_raw_with(ptr: *mut T, disposer: D) -> Self {
        trace_event!(ptr = ?ptr, "scoped pointer adopted");
        Self {
            ptr,
            disposer,
            _owns: PhantomData,
            _pinned: PhantomPinned,
        }
    }

    /// An empty pointer.
    pub fn empty() -> Self
    where
        D: Default,
    {
        Self::empty_with(D::default())
    }

    /// An empty pointer that will use `disposer` for anything it adopts later.
    pub fn empty_with(disposer: D) -> Self {
        // SAFETY: null is always accepted by disposers.
        unsafe { Self::from_raw_with(ptr::null_mut(), disposer) }
    }

    /// Disposes the current value and adopts `other`.
    ///
    /// # Safety
    ///
    /// Same contract as [`from_raw_with`](Self::from_raw_with) for `other`
    /// and this pointer's disposer.
    pub unsafe fn reset(&mut self, other: *mut T) {
        let old = mem::replace(&mut self.ptr, other);
        trace_event!(ptr = ?old, "scoped pointer disposing");
        self.disposer.dispose(old);
    }

    /// Disposes the current value and becomes empty.
    pub fn clear(&mut self) {
        // SAFETY: null is always accepted by disposers.
        unsafe { self.reset(ptr::null_mut()) }
    }

    /// Exchanges the owned pointers. Disposers stay where they are and none
    /// of them is called.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.ptr, &mut other.ptr);
        trace_event!(left = ?self.ptr, right = ?other.ptr, "scoped pointers swapped");
    }

    /// The raw pointer, null when empty. Ownership is kept.
    #[inline]
    pub fn get(&self) -> *mut T {
        self.ptr
    }

    /// `true` when a value is owned.
    #[inline]
    pub fn is_some(&self) -> bool {
        !self.ptr.is_null()
    }

    /// `true` when nothing is owned.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ptr.is_null()
    }

    /// Borrows the value, if any.
    #[inline]
    pub fn as_ref(&self) -> Option<&T> {
        // SAFETY: a non-null owned pointer is valid while we own it.
        unsafe { self.ptr.as_ref() }
    }

    /// Mutably borrows the value, if any.
    #[inline]
    pub fn as_mut(&mut self) -> Option<&mut T> {
        // SAFETY: sole owner, and `&mut self` rules out other borrows.
        unsafe { self.ptr.as_mut() }
    }

    /// The stored disposer.
    pub fn disposer(&self) -> &D {
        &self.disposer
    }

    /// [`reset`](Self::reset) through a pinned handle.
    ///
    /// # Safety
    ///
    /// Same as [`reset`](Self::reset).
    pub unsafe fn reset_pinned(self: Pin<&mut Self>, other: *mut T) {
        self.unpinned().reset(other);
    }

    /// [`clear`](Self::clear) through a pinned handle.
    pub fn clear_pinned(self: Pin<&mut Self>) {
        self.unpinned().clear();
    }

    /// [`swap`](Self::swap) between two pinned handles.
    pub fn swap_pinned(self: Pin<&mut Self>, other: Pin<&mut Self>) {
        self.unpinned().swap(other.unpinned());
    }

    /// Mutably borrows the value of a pinned pointer, if any.
    pub fn value_mut(self: Pin<&mut Self>) -> Option<&mut T> {
        self.unpinned().as_mut()
    }

    /// Only the pointee is ever handed out from here, and it lives in its own
    /// allocation. Callers must not move or replace the `ScopedPtr` itself.
    fn unpinned(self: Pin<&mut Self>) -> &mut Self {
        // SAFETY: every caller above only edits `ptr` in place or borrows the
        // pointee; the pointer is never moved.
        unsafe { self.get_unchecked_mut() }
    }
}

impl<T, D: Dispose<T>> Drop for ScopedPtr<T, D> {
    fn drop(&mut self) {
        trace_event!(ptr = ?self.ptr, "scoped pointer disposing");
        // SAFETY: we own `ptr`; it is not used again.
        unsafe { self.disposer.dispose(self.ptr) };
    }
}

impl<T, D: Dispose<T>> Deref for ScopedPtr<T, D> {
    type Target = T;

    #[track_caller]
    fn deref(&self) -> &T {
        match self.as_ref() {
            Some(value) => value,
            None => empty_deref("ScopedPtr"),
        }
    }
}

impl<T, D: Dispose<T>> DerefMut for ScopedPtr<T, D> {
    #[track_caller]
    fn deref_mut(&mut self) -> &mut T {
        match self.as_mut() {
            Some(value) => value,
            None => empty_deref("ScopedPtr"),
        }
    }
}

impl<T: fmt::Debug, D: Dispose<T>> fmt::Debug for ScopedPtr<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ScopedPtr").field(&self.as_ref()).finish()
    }
}

// SAFETY: sole ownership of T, like Box<T>.
unsafe impl<T: Send, D: Dispose<T> + Send> Send for ScopedPtr<T, D> {}
unsafe impl<T: Sync, D: Dispose<T> + Sync> Sync for ScopedPtr<T, D> {}
