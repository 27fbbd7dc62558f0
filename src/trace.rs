//! Ownership event logging.
//!
//! With the `tracing` feature enabled every adopt, transfer, dispose and
//! counter free is reported as a `TRACE` event carrying the raw pointer and,
//! for shared pointers, the owner count. Without the feature the macro
//! expands to nothing and its arguments are never evaluated.

macro_rules! trace_event {
    ($($arg:tt)+) => {
        #[cfg(feature = "tracing")]
        {
            tracing::trace!(target: "holdfast", $($arg)+);
        }
    };
}

pub(crate) use trace_event;
