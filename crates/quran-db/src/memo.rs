//! Compute-once cache for derived values.

use std::fmt;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A value computed on first read and returned by reference afterwards.
///
/// The number of times the initializer actually ran is kept so callers (and
/// tests) can confirm a cache is not rebuilt.
pub struct Memo<T> {
    cell: OnceLock<T>,
    computations: AtomicUsize,
}

impl<T> Memo<T> {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
            computations: AtomicUsize::new(0),
        }
    }

    /// Return the cached value, running `compute` if nothing is cached yet.
    pub fn get_or_compute(&self, compute: impl FnOnce() -> T) -> &T {
        self.cell.get_or_init(|| {
            self.computations.fetch_add(1, Ordering::Relaxed);
            compute()
        })
    }

    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn is_computed(&self) -> bool {
        self.cell.get().is_some()
    }

    /// How many times the initializer has run.
    pub fn computations(&self) -> usize {
        self.computations.load(Ordering::Relaxed)
    }
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memo")
            .field("value", &self.cell.get())
            .field("computations", &self.computations())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_once() {
        let memo = Memo::new();
        assert!(!memo.is_computed());
        let first = memo.get_or_compute(|| vec![1, 2, 3]).clone();
        let second = memo.get_or_compute(|| vec![9]).clone();
        assert_eq!(first, second);
        assert_eq!(memo.computations(), 1);
    }
}
