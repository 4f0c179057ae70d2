//! Bounded per-year memo for holiday tables.
//!
//! Each year maps to a once-cell handed out under a short map lock. The
//! table is materialized outside the lock, so callers asking for different
//! years never wait on each other, and callers asking for the same year
//! block on one computation instead of repeating it.
//!
//! When more than `capacity` years are resident the least-recently-used year
//! is evicted. Evicting a year whose table is still being computed is safe:
//! in-flight callers hold their own handle to the cell.

use crate::holidays::HolidayTable;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use tracing::debug;

/// Default number of resident years.
pub const DEFAULT_CACHE_CAPACITY: usize = 32;

type Cell = Arc<OnceLock<Arc<HolidayTable>>>;

#[derive(Debug)]
struct Slot {
    cell: Cell,
    last_used: u64,
}

#[derive(Debug, Default)]
struct Inner {
    slots: HashMap<i32, Slot>,
    clock: u64,
}

/// Snapshot of cache counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub resident: usize,
    pub capacity: usize,
}

#[derive(Debug)]
pub struct HolidayCache {
    capacity: usize,
    inner: Mutex<Inner>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl HolidayCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(Inner::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lock().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lock().slots.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            resident: self.len(),
            capacity: self.capacity,
        }
    }

    /// Return the table for `year`, running `compute` at most once per
    /// resident year.
    pub fn get_or_compute<F>(&self, year: i32, compute: F) -> Arc<HolidayTable>
    where
        F: FnOnce() -> HolidayTable,
    {
        if self.capacity == 0 {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return Arc::new(compute());
        }

        let cell = self.cell_for(year);

        let mut computed = false;
        let table = cell.get_or_init(|| {
            computed = true;
            Arc::new(compute())
        });

        if computed {
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!(year, holidays = table.len(), "holiday table computed");
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        Arc::clone(table)
    }

    fn cell_for(&self, year: i32) -> Cell {
        let mut inner = self.lock();
        inner.clock += 1;
        let now = inner.clock;

        if let Some(slot) = inner.slots.get_mut(&year) {
            slot.last_used = now;
            return Arc::clone(&slot.cell);
        }

        let cell: Cell = Arc::new(OnceLock::new());
        inner.slots.insert(
            year,
            Slot {
                cell: Arc::clone(&cell),
                last_used: now,
            },
        );

        while inner.slots.len() > self.capacity {
            let victim = inner
                .slots
                .iter()
                .filter(|(y, _)| **y != year)
                .min_by_key(|(_, s)| s.last_used)
                .map(|(y, _)| *y);
            match victim {
                Some(v) => {
                    inner.slots.remove(&v);
                    debug!(year = v, "holiday table evicted");
                }
                None => break,
            }
        }
        cell
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Inner holds no invariant a panicking holder could break.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
