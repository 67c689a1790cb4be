/*
 * Thread Table and Lifecycle Operations
 *
 * Pure manipulators on the static thread table: spawn, copy/fork, kill,
 * notify-waiters, lookup-by-id, slot-index, zero-slot. None of these drive
 * scheduling; they only mutate table state. Grounded on the reference
 * kernel's thread_spawn/thread_kill/thread_copy/thread_fork/
 * thread_notify_waiting family.
 *
 * first_empty falls back to reclaiming the lowest-indexed Zombie slot when
 * no Empty slot exists, implementing the redesign noted for the
 * never-reaped-zombie hazard: plain EMPTY search first, ZOMBIE fallback
 * second, so a spawn storm that outlives its own exits does not
 * permanently exhaust the table.
 */

use crate::config::MAX_THREADS;
use crate::registers::Registers;
use crate::scheduler::thread::{Slot, ThreadId, ThreadState, WaitStatus};

pub struct ThreadTable {
    slots: [Slot; MAX_THREADS],
    next_tid: u32,
}

impl ThreadTable {
    pub const fn new() -> Self {
        ThreadTable {
            slots: [const { Slot::empty() }; MAX_THREADS],
            next_tid: 0,
        }
    }

    pub fn slot(&self, idx: usize) -> &Slot {
        &self.slots[idx]
    }

    pub fn slot_mut(&mut self, idx: usize) -> &mut Slot {
        &mut self.slots[idx]
    }

    pub fn len(&self) -> usize {
        MAX_THREADS
    }

    /// Index of `slot_ptr` within the table, or `None` if it does not point
    /// into this table's slot array.
    pub fn position_of(&self, slot_ptr: *const Slot) -> Option<usize> {
        let base = self.slots.as_ptr() as usize;
        let addr = slot_ptr as usize;
        let stride = core::mem::size_of::<Slot>();
        if addr < base {
            return None;
        }
        let offset = addr - base;
        if offset % stride != 0 {
            return None;
        }
        let idx = offset / stride;
        (idx < MAX_THREADS).then_some(idx)
    }

    /// First `Empty` slot; falls back to reclaiming the lowest-indexed
    /// `Zombie` slot if none is `Empty`.
    pub fn first_empty(&mut self) -> Option<usize> {
        if let Some(idx) = self.slots.iter().position(|s| s.state == ThreadState::Empty) {
            return Some(idx);
        }
        if let Some(idx) = self.slots.iter().position(|s| s.state == ThreadState::Zombie) {
            self.zero_slot(idx);
            return Some(idx);
        }
        None
    }

    /// Index of the live (non-Empty) slot carrying `id`, if any.
    pub fn lookup_by_id(&self, id: ThreadId) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.state != ThreadState::Empty && s.id == id)
    }

    /// Mints a new thread id; never returns `ThreadId::NONE` (0).
    pub fn fresh_tid(&mut self) -> ThreadId {
        self.next_tid = self.next_tid.wrapping_add(1);
        if self.next_tid == 0 {
            self.next_tid = self.next_tid.wrapping_add(1);
        }
        ThreadId(self.next_tid)
    }

    /// Clears id, state, sleep deadline, wait status, register image and
    /// the entire stack region of slot `idx` to zero. No-op if out of
    /// range.
    pub fn zero_slot(&mut self, idx: usize) {
        if idx >= MAX_THREADS {
            return;
        }
        self.slots[idx] = Slot::empty();
    }

    /// Zeros the tid counter and every slot.
    pub fn thread_init(&mut self) {
        self.next_tid = 0;
        for idx in 0..MAX_THREADS {
            self.zero_slot(idx);
        }
    }

    /// Finds an `Empty` slot, seeds it to run `entry_fn(arg)`, and returns
    /// its new id. Returns `ThreadId::NONE` if the table is exhausted.
    pub fn thread_spawn(&mut self, entry_fn: u32, arg: u32) -> ThreadId {
        let Some(idx) = self.first_empty() else {
            return ThreadId::NONE;
        };
        self.zero_slot(idx);
        let id = self.fresh_tid();
        let stack_top = self.slots[idx].stack_top();
        let slot = &mut self.slots[idx];
        slot.state = ThreadState::Runnable;
        slot.id = id;
        slot.regs = Registers::seed(entry_fn, arg, stack_top);
        id
    }

    /// Copies `src_idx`'s entire slot record and stack region byte-for-byte
    /// into `dest_idx`, which must be `Empty`; `src_idx` must be non-Empty.
    /// Mints a fresh id for the destination. Any absolute pointer `src`
    /// held on its own stack still points into `src`'s stack after the
    /// copy; this is an inherited hazard, not one this operation can fix.
    pub fn thread_copy(&mut self, dest_idx: usize, src_idx: usize) -> bool {
        if dest_idx >= MAX_THREADS || src_idx >= MAX_THREADS || dest_idx == src_idx {
            return false;
        }
        if self.slots[dest_idx].state != ThreadState::Empty {
            return false;
        }
        if self.slots[src_idx].state == ThreadState::Empty {
            return false;
        }
        let new_id = self.fresh_tid();
        let split = dest_idx.max(src_idx);
        let (left, right) = self.slots.split_at_mut(split);
        if dest_idx < src_idx {
            left[dest_idx].copy_from(&right[0]);
        } else {
            right[0].copy_from(&left[src_idx]);
        }
        self.slots[dest_idx].id = new_id;
        true
    }

    /// Finds an `Empty` slot and `thread_copy`s `src_idx` into it. Returns
    /// the new slot's index on success.
    pub fn thread_fork(&mut self, src_idx: usize) -> Option<usize> {
        let dest_idx = self.first_empty()?;
        self.thread_copy(dest_idx, src_idx).then_some(dest_idx)
    }

    /// Marks slot `idx` `Zombie`. Registers and stack are left stale;
    /// reclamation happens on next reuse via `zero_slot`/`first_empty`'s
    /// fallback. Out-of-table indices are a no-op, not a panic.
    pub fn thread_kill(&mut self, idx: usize) -> bool {
        if idx >= MAX_THREADS {
            return false;
        }
        self.slots[idx].state = ThreadState::Zombie;
        true
    }

    /// Wakes every slot `Blocked` on `exiting_idx`'s id, handing it the
    /// exit status `exiting_idx` stashed in its own `regs.r1`.
    pub fn thread_notify_waiting(&mut self, exiting_idx: usize) {
        let exiting_id = self.slots[exiting_idx].id;
        let exit_status = self.slots[exiting_idx].regs.r1;
        for slot in self.slots.iter_mut() {
            if slot.state == ThreadState::Blocked
                && slot.wait_status == WaitStatus::Thread
                && ThreadId(slot.regs.r1) == exiting_id
            {
                slot.regs.r0 = exit_status;
                slot.state = ThreadState::Runnable;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_init_zeroes_every_slot() {
        let mut table = ThreadTable::new();
        table.slots[3].state = ThreadState::Runnable;
        table.slots[3].id = ThreadId(77);
        table.thread_init();
        for idx in 0..MAX_THREADS {
            assert_eq!(table.slots[idx].state, ThreadState::Empty);
            assert_eq!(table.slots[idx].id, ThreadId::NONE);
            assert!(table.slots[idx].stack.iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn fresh_tid_never_returns_zero() {
        let mut table = ThreadTable::new();
        table.next_tid = u32::MAX;
        let id = table.fresh_tid();
        assert_ne!(id, ThreadId::NONE);
    }

    #[test]
    fn spawn_exhaustion_returns_none_id() {
        let mut table = ThreadTable::new();
        for _ in 0..MAX_THREADS {
            assert_ne!(table.thread_spawn(0x1000, 0), ThreadId::NONE);
        }
        assert_eq!(table.thread_spawn(0x1000, 0), ThreadId::NONE);
    }

    #[test]
    fn spawn_then_kill_frees_slot_for_reuse() {
        let mut table = ThreadTable::new();
        let id = table.thread_spawn(0x2000, 0);
        let idx = table.lookup_by_id(id).unwrap();
        table.thread_kill(idx);
        assert_eq!(table.slots[idx].state, ThreadState::Zombie);
        // first_empty must reclaim the zombie when no Empty slot remains.
        for _ in 0..(MAX_THREADS - 1) {
            table.thread_spawn(0x3000, 0);
        }
        let reused = table.thread_spawn(0x4000, 0);
        assert_ne!(reused, ThreadId::NONE);
    }

    #[test]
    fn notify_waiting_wakes_matching_waiters_only() {
        let mut table = ThreadTable::new();
        let exiting_id = table.thread_spawn(0x1000, 0);
        let exiting_idx = table.lookup_by_id(exiting_id).unwrap();

        let waiter_id = table.thread_spawn(0x2000, 0);
        let waiter_idx = table.lookup_by_id(waiter_id).unwrap();
        table.slots[waiter_idx].state = ThreadState::Blocked;
        table.slots[waiter_idx].wait_status = WaitStatus::Thread;
        table.slots[waiter_idx].regs.r1 = exiting_id.0;

        let bystander_id = table.thread_spawn(0x3000, 0);
        let bystander_idx = table.lookup_by_id(bystander_id).unwrap();
        table.slots[bystander_idx].state = ThreadState::Blocked;
        table.slots[bystander_idx].wait_status = WaitStatus::Thread;
        table.slots[bystander_idx].regs.r1 = 0xDEAD;

        table.slots[exiting_idx].regs.r1 = 42;
        table.thread_notify_waiting(exiting_idx);

        assert_eq!(table.slots[waiter_idx].state, ThreadState::Runnable);
        assert_eq!(table.slots[waiter_idx].regs.r0, 42);
        assert_eq!(table.slots[bystander_idx].state, ThreadState::Blocked);
    }

    #[test]
    fn kill_on_out_of_range_index_is_noop() {
        let mut table = ThreadTable::new();
        assert!(!table.thread_kill(MAX_THREADS));
    }

    #[test]
    fn position_of_matches_index() {
        let table = ThreadTable::new();
        for idx in 0..MAX_THREADS {
            let ptr: *const Slot = table.slot(idx);
            assert_eq!(table.position_of(ptr), Some(idx));
        }
    }
}
