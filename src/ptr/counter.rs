use crate::heap;
use core::cell::Cell;
use core::ptr::NonNull;

/// A handle to a heap-allocated owner count shared by one `SharedPtr` group.
///
/// Each handle stands for one owner. Handles are neither `Clone` nor `Drop`:
/// a new owner is made with [`share`](Self::share) and an owner leaves with
/// [`leave`](Self::leave), which frees the cell when it was the last.
pub(crate) struct RefCount {
    cell: NonNull<Cell<usize>>,
}

impl RefCount {
    /// A fresh count of one.
    pub(crate) fn new() -> Self {
        Self {
            cell: heap::allocate(Cell::new(1)),
        }
    }

    #[inline]
    fn cell(&self) -> &Cell<usize> {
        // SAFETY: the cell lives until the last handle leaves, and this handle
        // has not left yet.
        unsafe { self.cell.as_ref() }
    }

    #[inline]
    pub(crate) fn get(&self) -> usize {
        self.cell().get()
    }

    /// Registers one more owner and returns its handle.
    pub(crate) fn share(&self) -> Self {
        let cell = self.cell();
        // Matches `Rc`: overflowing the count would let a live value be freed.
        let Some(next) = cell.get().checked_add(1) else {
            std::process::abort()
        };
        cell.set(next);
        Self { cell: self.cell }
    }

    /// Removes this owner. Returns `true` when it was the last one, in which
    /// case the cell has been freed.
    pub(crate) fn leave(self) -> bool {
        let cell = self.cell();
        let remaining = cell.get() - 1;
        cell.set(remaining);
        if remaining == 0 {
            // SAFETY: no handle references the cell any more.
            unsafe { heap::reclaim(self.cell) };
            true
        } else {
            false
        }
    }

    /// `true` when both handles belong to the same group.
    #[inline]
    pub(crate) fn same_group(&self, other: &Self) -> bool {
        self.cell == other.cell
    }

    #[cfg(feature = "tracing")]
    pub(crate) fn addr(&self) -> *const Cell<usize> {
        self.cell.as_ptr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_and_leave() {
        let first = RefCount::new();
        let second = first.share();
        let third = second.share();
        assert_eq!(first.get(), 3);
        assert!(first.same_group(&third));

        assert!(!third.leave());
        assert!(!first.leave());
        assert_eq!(second.get(), 1);
        assert!(second.leave());
    }

    #[test]
    fn test_groups_are_distinct() {
        let a = RefCount::new();
        let b = RefCount::new();
        assert!(!a.same_group(&b));
        assert!(a.leave());
        assert!(b.leave());
    }
}
