//! `SharedPtr`: counted shared ownership.
//!
//! Owners of one value form a group that shares a separately allocated count.
//! The value is disposed, and the count freed, when the last owner of the
//! group is dropped or reassigned.
//!
//! Owner states:
//!
//! | State     | `use_count()` | Entered by                                             |
//! |-----------|---------------|--------------------------------------------------------|
//! | sole      | 1             | construction, co-owners leaving, `reset` when detached |
//! | shared    | > 1           | `clone`, `clone_from`                                  |
//! | detached  | 0             | being the source of `take_from` / `assign_move`        |
//!
//! [`release`](SharedPtr::release) and [`reset`](SharedPtr::reset) act on the
//! raw pointer only and leave the count alone. They are meant for a sole
//! owner; using them while co-owners exist leaves those co-owners pointing at
//! a value this pointer no longer accounts for.

use super::counter::RefCount;
use super::empty_deref;
use crate::dispose::{DefaultDisposer, Dispose};
use crate::error::ReleaseError;
use crate::heap;
use crate::trace::trace_event;
use core::fmt;
use core::marker::PhantomData;
use core::mem;
use core::ops::Deref;
use core::ptr;

/// A reference-counted owning pointer with a pluggable disposer.
///
/// The count is not atomic, so `SharedPtr` is neither `Send` nor `Sync`.
///
/// ```
/// use holdfast::ptr::SharedPtr;
///
/// let p1 = SharedPtr::new(10);
/// let p2 = p1.clone();
/// let p3 = p2.clone();
/// assert_eq!(p1.use_count(), 3);
///
/// drop(p2);
/// drop(p3);
/// assert!(p1.unique());
/// ```
pub struct SharedPtr<T, D: Dispose<T> = DefaultDisposer> {
    ptr: *mut T,
    count: Option<RefCount>,
    disposer: D,
    _owns: PhantomData<T>,
}

impl<T> SharedPtr<T> {
    /// Moves `value` to the heap and becomes its sole owner.
    pub fn new(value: T) -> Self {
        // SAFETY: fresh allocation from `heap::allocate`, matching `DefaultDisposer`.
        unsafe { Self::from_raw(heap::allocate(value).as_ptr()) }
    }
}

impl<T, D: Dispose<T>> SharedPtr<T, D> {
    /// Becomes the sole owner of `ptr`, with a default-constructed disposer.
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

    /// Becomes the sole owner of `ptr`, to be released by `disposer`.
    ///
    /// A new count is allocated even when `ptr` is null.
    ///
    /// # Safety
    ///
    /// `ptr` is null or a pointer that `disposer` may dispose once, and no one
    /// else will dispose it.
    pub unsafe fn from_raw_with(ptr: *mut T, disposer: D) -> Self {
        trace_event!(ptr = ?ptr, count = 1_usize, "shared pointer adopted");
        Self {
            ptr,
            count: Some(RefCount::new()),
            disposer,
            _owns: PhantomData,
        }
    }

    /// An empty sole owner.
    pub fn empty() -> Self
    where
        D: Default,
    {
        Self::empty_with(D::default())
    }

    /// An empty sole owner with the given disposer.
    pub fn empty_with(disposer: D) -> Self {
        // SAFETY: null is always accepted by disposers.
        unsafe { Self::from_raw_with(ptr::null_mut(), disposer) }
    }

    /// Moves `src`'s ownership into a new pointer without touching the count.
    ///
    /// `src` is left detached: null, with `use_count() == 0`. Dropping it is a
    /// no-op.
    pub fn take_from(src: &mut Self) -> Self
    where
        D: Clone,
    {
        let ptr = mem::replace(&mut src.ptr, ptr::null_mut());
        trace_event!(ptr = ?ptr, "shared pointer taken");
        Self {
            ptr,
            count: src.count.take(),
            disposer: src.disposer.clone(),
            _owns: PhantomData,
        }
    }

    /// Leaves the current group and moves `src`'s ownership into `self`.
    ///
    /// The number of owners of `src`'s value does not change: `src`'s share
    /// is relocated, not duplicated. `src` is left detached and holding
    /// `self`'s old disposer. When both already belong to the same group the
    /// group simply loses one owner.
    pub fn assign_move(&mut self, src: &mut Self) {
        self.leave_group();
        mem::swap(&mut self.disposer, &mut src.disposer);
        self.ptr = mem::replace(&mut src.ptr, ptr::null_mut());
        self.count = src.count.take();
        trace_event!(ptr = ?self.ptr, count = self.use_count(), "shared pointer move-assigned");
    }

    /// Number of owners in this pointer's group, `0` when detached.
    #[inline]
    pub fn use_count(&self) -> usize {
        self.count.as_ref().map_or(0, RefCount::get)
    }

    /// `true` when this is the only owner.
    #[inline]
    pub fn unique(&self) -> bool {
        self.use_count() == 1
    }

    /// `true` when both pointers belong to the same owner group.
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        match (&this.count, &other.count) {
            (Some(a), Some(b)) => a.same_group(b),
            _ => false,
        }
    }

    /// Detaches the raw pointer without disposing it. The count is not
    /// touched: this pointer stays a member of its group, holding null.
    ///
    /// Only sound to use as a sole owner. With co-owners the value they still
    /// point at will be disposed by whichever of them is last, while the
    /// caller also holds it. Prefer [`try_release`](Self::try_release).
    #[must_use = "the released pointer leaks unless it is disposed"]
    pub fn release(&mut self) -> *mut T {
        let ptr = mem::replace(&mut self.ptr, ptr::null_mut());
        trace_event!(ptr = ?ptr, count = self.use_count(), "shared pointer released");
        ptr
    }

    /// [`release`](Self::release) that refuses unless this is the sole owner.
    ///
    /// # Errors
    ///
    /// [`ReleaseError::Shared`] when other owners exist,
    /// [`ReleaseError::Detached`] when this pointer has been moved from.
    pub fn try_release(&mut self) -> Result<*mut T, ReleaseError> {
        match self.use_count() {
            0 => Err(ReleaseError::Detached),
            1 => Ok(self.release()),
            count => Err(ReleaseError::Shared { count }),
        }
    }

    /// Disposes the current value right away and adopts `other`. An existing
    /// count is not touched.
    ///
    /// Only sound to use as a sole owner: co-owners are left pointing at the
    /// disposed value. A detached pointer gets a fresh count and becomes the
    /// sole owner of `other`.
    ///
    /// # Safety
    ///
    /// Same contract as [`from_raw_with`](Self::from_raw_with) for `other`,
    /// and no other owner of the current value may exist.
    pub unsafe fn reset(&mut self, other: *mut T) {
        let old = mem::replace(&mut self.ptr, other);
        if self.count.is_none() {
            self.count = Some(RefCount::new());
        }
        trace_event!(ptr = ?old, count = self.use_count(), "shared pointer reset");
        self.disposer.dispose(old);
    }

    /// The raw pointer, null when empty. Ownership is kept.
    #[inline]
    pub fn get(&self) -> *mut T {
        self.ptr
    }

    /// `true` when a value is held.
    #[inline]
    pub fn is_some(&self) -> bool {
        !self.ptr.is_null()
    }

    /// `true` when no value is held.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ptr.is_null()
    }

    /// Borrows the value, if any.
    #[inline]
    pub fn as_ref(&self) -> Option<&T> {
        // SAFETY: the group keeps the value alive while we are a member.
        unsafe { self.ptr.as_ref() }
    }

    /// Mutably borrows the value when this is the sole owner.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        if self.unique() {
            // SAFETY: no co-owner can observe the value, and `&mut self`
            // rules out other borrows through this one.
            unsafe { self.ptr.as_mut() }
        } else {
            None
        }
    }

    /// The stored disposer.
    pub fn disposer(&self) -> &D {
        &self.disposer
    }

    fn leave_group(&mut self) {
        let ptr = mem::replace(&mut self.ptr, ptr::null_mut());
        let Some(count) = self.count.take() else {
            return;
        };
        #[cfg(feature = "tracing")]
        let counter = count.addr();
        if count.leave() {
            trace_event!(ptr = ?ptr, counter = ?counter, "last shared owner left; disposing");
            // SAFETY: the group is gone, so nobody else holds `ptr`.
            unsafe { self.disposer.dispose(ptr) };
        }
    }
}

impl<T, D: Dispose<T> + Clone> Clone for SharedPtr<T, D> {
    /// Adds an owner to this pointer's group. Cloning a detached pointer
    /// yields another detached pointer.
    fn clone(&self) -> Self {
        let count = self.count.as_ref().map(RefCount::share);
        trace_event!(ptr = ?self.ptr, count = self.use_count(), "shared pointer cloned");
        Self {
            ptr: self.ptr,
            count,
            disposer: self.disposer.clone(),
            _owns: PhantomData,
        }
    }

    /// Leaves the current group and joins `source`'s. A no-op when both are
    /// already in the same group.
    fn clone_from(&mut self, source: &Self) {
        if Self::ptr_eq(self, source) {
            return;
        }
        *self = source.clone();
    }
}

impl<T, D: Dispose<T>> Drop for SharedPtr<T, D> {
    fn drop(&mut self) {
        self.leave_group();
    }
}

impl<T, D: Dispose<T>> Deref for SharedPtr<T, D> {
    type Target = T;

    #[track_caller]
    fn deref(&self) -> &T {
        match self.as_ref() {
            Some(value) => value,
            None => empty_deref("SharedPtr"),
        }
    }
}

impl<T, D: Dispose<T> + Default> Default for SharedPtr<T, D> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: fmt::Debug, D: Dispose<T>> fmt::Debug for SharedPtr<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedPtr")
            .field("value", &self.as_ref())
            .field("use_count", &self.use_count())
            .finish()
    }
}

impl<T> From<Box<T>> for SharedPtr<T> {
    fn from(boxed: Box<T>) -> Self {
        // SAFETY: `Box::into_raw` pointers are reclaimed by `DefaultDisposer`.
        unsafe { Self::from_raw(Box::into_raw(boxed)) }
    }
}
