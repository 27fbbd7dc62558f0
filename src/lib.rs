//! # `holdfast` - Owning Pointer Primitives
//!
//! Three owning pointers for heap values, each parameterized by a pluggable
//! [`Dispose`] strategy that releases the value when ownership ends.
//!
//! ## Pointers
//!
//! 1. **[`TransferPtr`]**: one owner at a time. Ownership is handed over
//!    explicitly with [`TransferPtr::take_from`] or
//!    [`TransferPtr::assign_from`], both of which leave the source empty.
//!
//! 2. **[`ScopedPtr`]**: one owner, never handed over. No clone, no transfer;
//!    the value is released by the pointer that adopted it (or by the one it
//!    was [swapped](ScopedPtr::swap) into).
//!
//! 3. **[`SharedPtr`]**: counted shared ownership. Owners share a separately
//!    allocated count, and the last one to leave disposes the value and frees
//!    the count. Single-threaded only.
//!
//! ## Guarantees
//!
//! - **Exactly-once disposal**: every value adopted by a pointer is passed to
//!   a disposer exactly once over its whole ownership history, unless the
//!   caller detaches it with `release`.
//! - **Null tolerance**: disposers are invoked even for empty pointers and
//!   treat null as a no-op.
//! - **Defined misuse**: dereferencing an empty pointer panics instead of
//!   reading through null. Use `as_ref` for a checked borrow.
//!
//! ## Example
//!
//! ```rust
//! use holdfast::{SharedPtr, TransferPtr};
//!
//! let mut first = TransferPtr::new(String::from("config"));
//! let second = TransferPtr::take_from(&mut first);
//! assert!(first.is_empty());
//! assert_eq!(second.len(), 6);
//!
//! let shared = SharedPtr::new(42);
//! let alias = shared.clone();
//! assert_eq!(shared.use_count(), 2);
//! drop(alias);
//! assert!(shared.unique());
//! ```
//!
//! ## Features
//!
//! - `tracing`: emit a `TRACE` event (target `holdfast`) for every adopt,
//!   transfer and disposal.

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod dispose;
pub mod error;
pub mod heap;
pub mod ptr;

mod serde_impls;
mod trace;

pub use dispose::{DefaultDisposer, Dispose, LeakDisposer};
pub use error::ReleaseError;
pub use ptr::{ScopedPtr, SharedPtr, TransferPtr};

// Compile-time layout checks.
const _: () = {
    use core::mem;

    // Zero-sized disposers cost nothing.
    assert!(mem::size_of::<DefaultDisposer>() == 0);
    assert!(mem::size_of::<LeakDisposer>() == 0);

    // Single owners are exactly one raw pointer wide.
    assert!(mem::size_of::<TransferPtr<u64>>() == mem::size_of::<*mut u64>());
    assert!(mem::size_of::<ScopedPtr<u64>>() == mem::size_of::<*mut u64>());

    // Shared owners add the count pointer; a detached count uses the null niche.
    assert!(mem::size_of::<SharedPtr<u64>>() == 2 * mem::size_of::<*mut u64>());
};
