/*
 * Test-and-Set Lock
 *
 * A lock is a single 0/1 cell: no queue, no ownership tracking, no
 * priority inheritance. The LOCK syscall performs the test-and-set under
 * the interrupt-disabled kernel context; user code spins on LOCK between
 * calls to get mutual exclusion. This is a known priority-inversion hazard
 * the design notes call out explicitly rather than fix.
 */

use volatile::Volatile;

pub const UNLOCKED: u8 = 0;
pub const LOCKED: u8 = 1;

/// A single lock cell, addressable by user code across thread boundaries.
/// `volatile` so the compiler never elides or reorders the test-and-set
/// around syscall entry.
#[repr(transparent)]
pub struct Lock(Volatile<u8>);

impl Lock {
    pub const fn new() -> Self {
        Lock(Volatile::new(UNLOCKED))
    }

    /// If the cell reads 0, sets it to 1 and returns `true`; otherwise
    /// returns `false` without changing the cell. Called with interrupts
    /// already disabled by the syscall dispatcher, so this is atomic with
    /// respect to every other kernel entry on this core.
    pub fn try_lock(&mut self) -> bool {
        if self.0.read() == UNLOCKED {
            self.0.write(LOCKED);
            true
        } else {
            false
        }
    }

    /// Unconditionally releases the lock.
    pub fn unlock(&mut self) {
        self.0.write(UNLOCKED);
    }
}

impl Default for Lock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_lock_succeeds_second_fails() {
        let mut lock = Lock::new();
        assert!(lock.try_lock());
        assert!(!lock.try_lock());
    }

    #[test]
    fn unlock_allows_relock() {
        let mut lock = Lock::new();
        assert!(lock.try_lock());
        lock.unlock();
        assert!(lock.try_lock());
    }

    #[test]
    fn locked_cell_is_unchanged_by_failed_attempt() {
        let mut lock = Lock::new();
        lock.try_lock();
        let before = lock.0.read();
        assert!(!lock.try_lock());
        assert_eq!(lock.0.read(), before);
    }
}
