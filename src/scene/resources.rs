//! Live-allocation bookkeeping for regenerated scene objects.
//!
//! Every regeneration swaps the point cloud and planet for new ones. A
//! [`ResourceSlot`] makes the swap dispose the old allocation before the
//! new one is built, and the [`ResourceLedger`] counts what is alive so
//! the peak never exceeds a single generation.

/// A group of GPU allocations that can be released explicitly.
pub trait Disposable {
    /// Number of underlying allocations (buffers, textures) held.
    fn resource_count(&self) -> usize;

    /// Release the allocations immediately instead of waiting for drop.
    fn dispose(self);
}

/// Running count of live scene allocations.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResourceLedger {
    live: usize,
    peak: usize,
    disposed: usize,
}

impl ResourceLedger {
    /// Empty ledger.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            live: 0,
            peak: 0,
            disposed: 0,
        }
    }

    /// Allocations currently alive.
    #[must_use]
    pub fn live(&self) -> usize {
        self.live
    }

    /// Highest live count ever observed.
    #[must_use]
    pub fn peak(&self) -> usize {
        self.peak
    }

    /// Total allocations released so far.
    #[must_use]
    pub fn disposed(&self) -> usize {
        self.disposed
    }

    fn acquire(&mut self, count: usize) {
        self.live += count;
        self.peak = self.peak.max(self.live);
    }

    fn release(&mut self, count: usize) {
        self.live = self.live.saturating_sub(count);
        self.disposed += count;
    }
}

/// Holds at most one `T`, disposing the previous value before a
/// replacement is built.
pub struct ResourceSlot<T> {
    current: Option<T>,
}

impl<T> Default for ResourceSlot<T> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<T: Disposable> ResourceSlot<T> {
    /// Empty slot.
    #[must_use]
    pub const fn empty() -> Self {
        Self { current: None }
    }

    /// The held value, if any.
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.current.as_ref()
    }

    /// Whether the slot holds a value.
    #[must_use]
    pub fn is_occupied(&self) -> bool {
        self.current.is_some()
    }

    /// Dispose the held value (if any), then build and store a new one.
    pub fn replace_with<F>(&mut self, ledger: &mut ResourceLedger, build: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        self.clear(ledger);
        let fresh = build();
        ledger.acquire(fresh.resource_count());
        self.current.insert(fresh)
    }

    /// Dispose the held value, leaving the slot empty.
    pub fn clear(&mut self, ledger: &mut ResourceLedger) {
        if let Some(old) = self.current.take() {
            ledger.release(old.resource_count());
            old.dispose();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    /// Stand-in for a GPU allocation group; tracks how many are alive.
    struct Fake {
        alive: Rc<Cell<usize>>,
        count: usize,
    }

    impl Fake {
        fn new(alive: &Rc<Cell<usize>>, count: usize) -> Self {
            alive.set(alive.get() + count);
            Self {
                alive: Rc::clone(alive),
                count,
            }
        }
    }

    impl Disposable for Fake {
        fn resource_count(&self) -> usize {
            self.count
        }

        fn dispose(self) {
            self.alive.set(self.alive.get() - self.count);
        }
    }

    #[test]
    fn regeneration_never_grows_live_count() {
        let alive = Rc::new(Cell::new(0));
        let mut ledger = ResourceLedger::new();
        let mut slot = ResourceSlot::empty();

        let _ = slot.replace_with(&mut ledger, || Fake::new(&alive, 2));
        let baseline = ledger.live();
        for _ in 0..50 {
            let _ = slot.replace_with(&mut ledger, || Fake::new(&alive, 2));
            assert_eq!(ledger.live(), baseline);
            assert_eq!(alive.get(), baseline);
        }
        assert_eq!(ledger.peak(), 2);
        assert_eq!(ledger.disposed(), 100);
    }

    #[test]
    fn old_value_is_disposed_before_build() {
        let alive = Rc::new(Cell::new(0));
        let mut ledger = ResourceLedger::new();
        let mut slot = ResourceSlot::empty();
        let _ = slot.replace_with(&mut ledger, || Fake::new(&alive, 3));

        let alive_probe = Rc::clone(&alive);
        let _ = slot.replace_with(&mut ledger, || {
            assert_eq!(alive_probe.get(), 0, "old allocation still alive");
            Fake::new(&alive_probe, 3)
        });
        assert_eq!(alive.get(), 3);
    }

    #[test]
    fn clear_empties_slot() {
        let alive = Rc::new(Cell::new(0));
        let mut ledger = ResourceLedger::new();
        let mut slot = ResourceSlot::empty();
        let _ = slot.replace_with(&mut ledger, || Fake::new(&alive, 1));
        assert!(slot.is_occupied());
        slot.clear(&mut ledger);
        assert!(!slot.is_occupied());
        assert_eq!(ledger.live(), 0);
        assert_eq!(alive.get(), 0);
        slot.clear(&mut ledger);
        assert_eq!(ledger.disposed(), 1);
    }

    #[test]
    fn slots_share_one_ledger() {
        let alive = Rc::new(Cell::new(0));
        let mut ledger = ResourceLedger::new();
        let mut points = ResourceSlot::empty();
        let mut planet = ResourceSlot::empty();
        for _ in 0..5 {
            let _ = points.replace_with(&mut ledger, || Fake::new(&alive, 2));
            let _ = planet.replace_with(&mut ledger, || Fake::new(&alive, 2));
        }
        assert_eq!(ledger.live(), 4);
        assert_eq!(ledger.peak(), 4);
    }
}
