use std::sync::atomic::{AtomicUsize, Ordering};

/// Round-robin pool over a fixed, ordered list of addresses for one family.
///
/// The entry list is immutable after construction; only the cursor advances.
/// [`RoundRobin::next`] atomically claims the next slot, so the sequence of
/// returned entries is a deterministic cycle over the configured order across
/// all concurrent callers. Which caller gets which slot is unspecified.
#[derive(Debug)]
pub struct RoundRobin<T> {
    entries: Vec<T>,
    cursor: AtomicUsize,
}

impl<T: Copy> RoundRobin<T> {
    pub fn new(entries: Vec<T>) -> Self {
        RoundRobin {
            entries,
            cursor: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn has_entries(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Claim and return the next entry in the cycle.
    ///
    /// Must not be called on an empty pool; callers check
    /// [`RoundRobin::has_entries`] first.
    pub fn next(&self) -> T {
        let n = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.entries[n % self.entries.len()]
    }
}
