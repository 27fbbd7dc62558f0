//! `TransferPtr`: single owner, explicitly transferable.

use super::empty_deref;
use crate::dispose::{DefaultDisposer, Dispose};
use crate::heap;
use crate::trace::trace_event;
use core::fmt;
use core::marker::PhantomData;
use core::mem;
use core::ops::{Deref, DerefMut};
use core::ptr::{self, NonNull};

/// An owning pointer whose ownership can be handed to another `TransferPtr`.
///
/// There is never more than one owner. Ownership moves with
/// [`take_from`](Self::take_from) (a new owner, the source is left empty) or
/// [`assign_from`](Self::assign_from) (an existing owner, its old value is
/// disposed first). There is no `Clone`: a transfer always empties its source,
/// so it is spelled out at the call site.
///
/// ```
/// use holdfast::ptr::TransferPtr;
///
/// let mut a = TransferPtr::new(String::from("payload"));
/// let b = TransferPtr::take_from(&mut a);
///
/// assert!(a.is_empty());
/// assert_eq!(*b, "payload");
/// ```
pub struct TransferPtr<T, D: Dispose<T> = DefaultDisposer> {
    ptr: *mut T,
    disposer: D,
    _owns: PhantomData<T>,
}

impl<T> TransferPtr<T> {
    /// Moves `value` to the heap and owns it.
    pub fn new(value: T) -> Self {
        // SAFETY: fresh allocation from `heap::allocate`, matching `DefaultDisposer`.
        unsafe { Self::from_raw(heap::allocate(value).as_ptr()) }
    }

    /// Disposes the current value and owns `value` instead.
    pub fn replace(&mut self, value: T) {
        // SAFETY: fresh allocation from `heap::allocate`, matching `DefaultDisposer`.
        unsafe { self.reset(heap::allocate(value).as_ptr()) }
    }

    /// Moves the value out, leaving nothing to dispose.
    pub fn into_inner(mut self) -> Option<T> {
        // SAFETY: a default-disposer pointer came from `heap::allocate` or `Box::into_raw`.
        NonNull::new(self.release()).map(|ptr| unsafe { heap::take(ptr) })
    }
}

impl<T, D: Dispose<T>> TransferPtr<T, D> {
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
        trace_event!(ptr = ?ptr, "transfer pointer adopted");
        Self {
            ptr,
            disposer,
            _owns: PhantomData,
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

    /// Moves ownership out of `src` into a new pointer.
    ///
    /// `src` is left empty and keeps its disposer; the new owner gets a copy of
    /// it. Dropping `src` afterwards disposes nothing.
    pub fn take_from(src: &mut Self) -> Self
    where
        D: Clone,
    {
        let ptr = mem::replace(&mut src.ptr, ptr::null_mut());
        trace_event!(ptr = ?ptr, "transfer pointer taken");
        Self {
            ptr,
            disposer: src.disposer.clone(),
            _owns: PhantomData,
        }
    }

    /// Disposes the current value and takes ownership out of `src`.
    ///
    /// The disposer travels with the value: `self` ends up with `src`'s
    /// disposer and `src` with `self`'s old one, next to a null pointer. Both
    /// arguments are `&mut`, so assigning a pointer to itself cannot be
    /// expressed.
    pub fn assign_from(&mut self, src: &mut Self) {
        self.dispose_current();
        mem::swap(&mut self.disposer, &mut src.disposer);
        self.ptr = mem::replace(&mut src.ptr, ptr::null_mut());
        trace_event!(ptr = ?self.ptr, "transfer pointer assigned");
    }

    /// Gives up ownership without disposing and returns the raw pointer.
    ///
    /// The caller becomes responsible for releasing it.
    #[must_use = "the released pointer leaks unless it is disposed"]
    pub fn release(&mut self) -> *mut T {
        let ptr = mem::replace(&mut self.ptr, ptr::null_mut());
        trace_event!(ptr = ?ptr, "transfer pointer released");
        ptr
    }

    /// Disposes the current value and adopts `other`.
    ///
    /// # Safety
    ///
    /// Same contract as [`from_raw_with`](Self::from_raw_with) for `other`
    /// and this pointer's disposer.
    pub unsafe fn reset(&mut self, other: *mut T) {
        self.dispose_current();
        self.ptr = other;
    }

    /// Disposes the current value and becomes empty.
    pub fn clear(&mut self) {
        // SAFETY: null is always accepted by disposers.
        unsafe { self.reset(ptr::null_mut()) }
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

    fn dispose_current(&mut self) {
        let ptr = mem::replace(&mut self.ptr, ptr::null_mut());
        trace_event!(ptr = ?ptr, "transfer pointer disposing");
        // SAFETY: we owned `ptr` and nobody else holds it.
        unsafe { self.disposer.dispose(ptr) };
    }
}

impl<T, D: Dispose<T>> Drop for TransferPtr<T, D> {
    fn drop(&mut self) {
        self.dispose_current();
    }
}

impl<T, D: Dispose<T>> Deref for TransferPtr<T, D> {
    type Target = T;

    /// # Panics
    ///
    /// Panics if the pointer is empty.
    #[track_caller]
    fn deref(&self) -> &T {
        match self.as_ref() {
            Some(value) => value,
            None => empty_deref("TransferPtr"),
        }
    }
}

impl<T, D: Dispose<T>> DerefMut for TransferPtr<T, D> {
    #[track_caller]
    fn deref_mut(&mut self) -> &mut T {
        match self.as_mut() {
            Some(value) => value,
            None => empty_deref("TransferPtr"),
        }
    }
}

impl<T, D: Dispose<T> + Default> Default for TransferPtr<T, D> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: fmt::Debug, D: Dispose<T>> fmt::Debug for TransferPtr<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TransferPtr").field(&self.as_ref()).finish()
    }
}

impl<T> From<Box<T>> for TransferPtr<T> {
    fn from(boxed: Box<T>) -> Self {
        // SAFETY: `Box::into_raw` pointers are reclaimed by `DefaultDisposer`.
        unsafe { Self::from_raw(Box::into_raw(boxed)) }
    }
}

// SAFETY: sole ownership of T, like Box<T>; the disposer moves along with it.
unsafe impl<T: Send, D: Dispose<T> + Send> Send for TransferPtr<T, D> {}
unsafe impl<T: Sync, D: Dispose<T> + Sync> Sync for TransferPtr<T, D> {}
