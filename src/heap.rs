//! Single-object heap allocation.
//!
//! These helpers produce and reclaim the raw pointers that
//! [`DefaultDisposer`](crate::dispose::DefaultDisposer) expects. They use
//! `std::alloc` with `Layout::new::<T>()` and a dangling pointer for
//! zero-sized types, which is the same scheme `Box<T>` uses, so pointers from
//! [`Box::into_raw`] may be passed to [`reclaim`] and pointers from
//! [`allocate`] may be turned back into a `Box` with [`Box::from_raw`].

use core::alloc::Layout;
use core::ptr::{self, NonNull};
use std::alloc::{alloc, dealloc, handle_alloc_error};

/// Moves `value` into a fresh heap allocation and returns the owning pointer.
///
/// The caller is responsible for eventually passing the pointer to
/// [`reclaim`] or [`take`] (or handing it to a wrapper that will).
pub fn allocate<T>(value: T) -> NonNull<T> {
    let layout = Layout::new::<T>();
    let raw = if layout.size() == 0 {
        NonNull::dangling().as_ptr()
    } else {
        // SAFETY: T is Sized and the layout has a non-zero size.
        unsafe { alloc(layout).cast::<T>() }
    };

    let Some(ptr) = NonNull::new(raw) else {
        handle_alloc_error(layout)
    };

    // SAFETY: ptr is non-null, properly aligned and valid for writes of T.
    unsafe { ptr::write(ptr.as_ptr(), value) };
    ptr
}

/// Drops the pointee and frees its allocation.
///
/// # Safety
///
/// `ptr` must come from [`allocate`] or [`Box::into_raw`] and must not have
/// been reclaimed already. It is dangling once this returns.
pub unsafe fn reclaim<T>(ptr: NonNull<T>) {
    ptr::drop_in_place(ptr.as_ptr());
    free(ptr);
}

/// Moves the pointee out and frees its allocation.
///
/// # Safety
///
/// Same contract as [`reclaim`].
pub unsafe fn take<T>(ptr: NonNull<T>) -> T {
    let value = ptr::read(ptr.as_ptr());
    free(ptr);
    value
}

unsafe fn free<T>(ptr: NonNull<T>) {
    let layout = Layout::new::<T>();
    if layout.size() != 0 {
        dealloc(ptr.as_ptr().cast::<u8>(), layout);
    }
}
