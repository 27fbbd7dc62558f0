//! The three owning pointers.
//!
//! | Type           | Owners              | Transfer                                   |
//! |----------------|---------------------|--------------------------------------------|
//! | [`TransferPtr`]| one                 | explicit [`TransferPtr::take_from`]        |
//! | [`ScopedPtr`]  | one                 | none; [`ScopedPtr::swap`] only             |
//! | [`SharedPtr`]  | counted             | `Clone`, [`SharedPtr::take_from`]          |
//!
//! All three hold a raw pointer that may be null ("empty") and a disposer
//! that is invoked with that pointer when ownership ends. A value is disposed
//! exactly once over its whole ownership history unless it is detached with
//! `release`.

mod counter;
pub mod scoped;
pub mod shared;
pub mod transfer;

pub use scoped::ScopedPtr;
pub use shared::SharedPtr;
pub use transfer::TransferPtr;

#[cold]
#[inline(never)]
#[track_caller]
fn empty_deref(kind: &'static str) -> ! {
    panic!("dereferenced an empty {kind}")
}
