/*
 * Tick Handler
 *
 * Invoked once per scheduler IRQ period (default 1 kHz / 1 ms per tick).
 * Advances the monotonic millisecond counter, wakes sleepers whose
 * deadline has arrived, and recomputes the nearest future deadline so
 * later ticks can short-circuit the wake-scan via `next_wake_ms`.
 *
 * Deadlines are compared by subtracting `systime_ms` first, producing a
 * forward distance that wraps naturally on 32-bit overflow; `NO_WAKE`
 * means "nobody is sleeping".
 */

use crate::config::NO_WAKE;
use crate::scheduler::table::ThreadTable;
use crate::scheduler::thread::ThreadState;
use crate::utils::debug::irq_log::irq_log_simple;

/// Advances `systime_ms` by one and, if it now matches `next_wake_ms`,
/// wakes every sleeper whose deadline has arrived and recomputes
/// `next_wake_ms` from whoever is left sleeping. Pure function of the
/// table and the two counters so it is fully host-testable without a real
/// timer.
pub fn tick(table: &mut ThreadTable, systime_ms: &mut u32, next_wake_ms: &mut u32) {
    *systime_ms = systime_ms.wrapping_add(1);

    if *systime_ms != *next_wake_ms {
        return;
    }

    *next_wake_ms = NO_WAKE;

    for idx in 0..table.len() {
        let slot = table.slot_mut(idx);
        if slot.state != ThreadState::Sleeping {
            continue;
        }
        if slot.sleep_deadline == *systime_ms {
            slot.state = ThreadState::Runnable;
            // SLEEP's documented return convention: R0 on wake carries the
            // tick count the thread originally asked to sleep for, which
            // was stashed in R2 at sleep time.
            slot.regs.r0 = slot.regs.r2;
            irq_log_simple("woke sleeper");
        } else {
            let norm = slot.sleep_deadline.wrapping_sub(*systime_ms);
            if norm < *next_wake_ms {
                *next_wake_ms = norm;
            }
        }
    }

    if *next_wake_ms != NO_WAKE {
        *next_wake_ms = next_wake_ms.wrapping_add(*systime_ms);
    }
}

/// Entry point called from the architecture-specific SysTick handler with
/// interrupts already masked. Runs `tick` against the kernel singleton and
/// falls through to the scheduler so a newly woken thread is eligible for
/// dispatch on this same tick, then never returns.
#[cfg(feature = "preemption")]
pub fn on_systick() -> ! {
    crate::kernel::with_kernel(|k| {
        tick(&mut k.table, &mut k.systime_ms, &mut k.next_wake_ms);
    });
    crate::scheduler::schedule()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sleep_wakes_on_exact_deadline() {
        let mut table = ThreadTable::new();
        let id = table.thread_spawn(0x1000, 0);
        let idx = table.lookup_by_id(id).unwrap();
        table.slot_mut(idx).state = ThreadState::Sleeping;
        table.slot_mut(idx).sleep_deadline = 150;
        table.slot_mut(idx).regs.r2 = 50;

        let mut systime_ms = 99;
        let mut next_wake_ms = 150;
        for _ in 0..51 {
            tick(&mut table, &mut systime_ms, &mut next_wake_ms);
        }

        assert_eq!(systime_ms, 150);
        assert_eq!(table.slot(idx).state, ThreadState::Runnable);
        assert_eq!(table.slot(idx).regs.r0, 50);
        assert_eq!(next_wake_ms, NO_WAKE);
    }

    #[test]
    fn next_wake_tracks_earliest_of_several_sleepers() {
        let mut table = ThreadTable::new();
        let a = table.thread_spawn(0x1000, 0);
        let b = table.thread_spawn(0x2000, 0);
        let idx_a = table.lookup_by_id(a).unwrap();
        let idx_b = table.lookup_by_id(b).unwrap();
        table.slot_mut(idx_a).state = ThreadState::Sleeping;
        table.slot_mut(idx_a).sleep_deadline = 200;
        table.slot_mut(idx_b).state = ThreadState::Sleeping;
        table.slot_mut(idx_b).sleep_deadline = 120;

        let mut systime_ms = 99;
        let mut next_wake_ms = 120;
        tick(&mut table, &mut systime_ms, &mut next_wake_ms);
        assert_eq!(systime_ms, 100);
        // Not yet at next_wake_ms (120), so no scan happens this tick.
        assert_eq!(next_wake_ms, 120);
        assert_eq!(table.slot(idx_a).state, ThreadState::Sleeping);

        systime_ms = 119;
        tick(&mut table, &mut systime_ms, &mut next_wake_ms);
        assert_eq!(systime_ms, 120);
        assert_eq!(table.slot(idx_b).state, ThreadState::Runnable);
        assert_eq!(table.slot(idx_a).state, ThreadState::Sleeping);
        assert_eq!(next_wake_ms, 200);
    }

    #[test]
    fn no_wake_sentinel_holds_with_nobody_sleeping() {
        let mut table = ThreadTable::new();
        let mut systime_ms = 0;
        let mut next_wake_ms = NO_WAKE;
        for _ in 0..10 {
            tick(&mut table, &mut systime_ms, &mut next_wake_ms);
        }
        assert_eq!(next_wake_ms, NO_WAKE);
    }
}
