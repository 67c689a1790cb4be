/*
 * Scheduler
 *
 * Round-robin dispatch: picks the next runnable thread starting from the
 * successor of the current slot, searching at most N slots in circular
 * order, and hands off to the architecture-specific exit-to-user routine.
 * Panics if a full revolution finds no runnable slot: the table's own
 * "no idle thread" design choice, not a bug to work around here.
 */

pub mod table;
pub mod thread;
pub mod tick;

use crate::config::MAX_THREADS;
use crate::kernel::{kernel_panic, with_kernel};
use crate::scheduler::thread::ThreadState;

/// Finds the index of the next runnable slot starting at the successor of
/// `current`, searching circularly. Pure and host-testable; `schedule`
/// wraps this with the noreturn hand-off to user mode.
pub fn next_runnable(table: &table::ThreadTable, current: usize) -> Option<usize> {
    for step in 1..=MAX_THREADS {
        let idx = (current + step) % MAX_THREADS;
        if table.slot(idx).state == ThreadState::Runnable {
            return Some(idx);
        }
    }
    None
}

/// Selects the next runnable thread and transfers control to it. Never
/// returns: either it reaches `kernel_run` (which is itself noreturn) or it
/// panics because every slot is sleeping or blocked.
pub fn schedule() -> ! {
    let next = with_kernel(|k| {
        let idx = next_runnable(&k.table, k.current);
        if let Some(idx) = idx {
            k.current = idx;
        }
        idx
    });

    match next {
        Some(idx) => crate::arch::kernel_run(idx),
        None => kernel_panic("scheduler: no runnable thread"),
    }
}
