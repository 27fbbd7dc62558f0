#![allow(dead_code)]

use holdfast::dispose::{DefaultDisposer, Dispose};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// A disposer that records every pointer it is handed, then frees it like
/// `DefaultDisposer`.
#[derive(Clone, Default)]
pub struct Recorder {
    disposed: Rc<RefCell<Vec<usize>>>,
    nulls: Rc<Cell<usize>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Addresses of every non-null pointer disposed so far, in order.
    pub fn disposed(&self) -> Vec<usize> {
        self.disposed.borrow().clone()
    }

    /// How many times `addr` has been disposed.
    pub fn times<T>(&self, addr: *mut T) -> usize {
        let addr = addr as usize;
        self.disposed.borrow().iter().filter(|&&a| a == addr).count()
    }

    pub fn null_calls(&self) -> usize {
        self.nulls.get()
    }
}

impl<T> Dispose<T> for Recorder {
    unsafe fn dispose(&mut self, ptr: *mut T) {
        if ptr.is_null() {
            self.nulls.set(self.nulls.get() + 1);
        } else {
            self.disposed.borrow_mut().push(ptr as usize);
        }
        DefaultDisposer.dispose(ptr);
    }
}

/// A value that counts its own drops.
#[derive(Debug)]
pub struct Tracked {
    pub id: u32,
    drops: Rc<Cell<usize>>,
}

impl Tracked {
    pub fn new(id: u32, drops: &Rc<Cell<usize>>) -> Self {
        Self {
            id,
            drops: drops.clone(),
        }
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

/// Heap-allocates `value` the way `DefaultDisposer` expects.
pub fn raw<T>(value: T) -> *mut T {
    holdfast::heap::allocate(value).as_ptr()
}
