/*
 * Syscall Dispatcher
 *
 * Switches on the current thread's R0 (the syscall number) and mutates
 * kernel state accordingly, per the external-interface table. The pure
 * decision logic lives in `dispatch_syscall`, separated from the noreturn
 * hand-off so it is host-testable; `handle_trap` is the noreturn entry
 * point the architecture layer calls from the SVC exception handler.
 *
 * KILL and RESET are fully separate match arms: the reference dispatcher
 * falls through from KILL into RESET for lack of a break statement, which
 * this dispatcher does not reproduce.
 */

use crate::config::{NO_WAKE, SYSTIME_CYCLES_PER_MS};
use crate::kernel::Kernel;
use crate::lock::Lock;
use crate::scheduler::thread::{ThreadId, ThreadState, WaitStatus};
use crate::syscall::numbers;

/// What the dispatcher decided should happen after mutating kernel state.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Resume the named slot directly, without rescheduling.
    Resume(usize),
    /// Hand off to the scheduler.
    Reschedule,
    /// RESET was requested; the caller triggers the architecture reset.
    Reset,
    /// No match arm for this syscall number; the caller panics.
    Unknown(u32),
}

/// Runs the syscall currently parked in `kernel.table[kernel.current].regs`
/// against kernel state and reports what should happen next. Never panics
/// itself; unknown syscall numbers are reported as `Outcome::Unknown` so
/// the panic (a kernel-wide policy, not dispatch-table logic) happens at
/// the call site.
pub fn dispatch_syscall(kernel: &mut Kernel) -> Outcome {
    let current = kernel.current;
    let syscall = kernel.table.slot(current).regs.r0;

    match syscall {
        numbers::EXIT => {
            kernel.table.thread_notify_waiting(current);
            kernel.table.thread_kill(current);
            Outcome::Reschedule
        }

        numbers::YIELD => Outcome::Reschedule,

        numbers::SLEEP => {
            let ms = kernel.table.slot(current).regs.r1;
            if ms == 0 {
                kernel.table.slot_mut(current).regs.r0 = 0;
                return Outcome::Resume(current);
            }
            let ticks = ms / SYSTIME_CYCLES_PER_MS;
            let deadline = kernel.systime_ms.wrapping_add(ticks);
            {
                let slot = kernel.table.slot_mut(current);
                slot.state = ThreadState::Sleeping;
                slot.sleep_deadline = deadline;
                // Stashed for the tick handler to copy back into R0 on
                // wake, per the documented SLEEP return-value convention.
                slot.regs.r2 = ticks;
            }
            let norm_new = deadline.wrapping_sub(kernel.systime_ms);
            let norm_existing = kernel.next_wake_ms.wrapping_sub(kernel.systime_ms);
            if kernel.next_wake_ms == NO_WAKE || norm_new < norm_existing {
                kernel.next_wake_ms = deadline;
            }
            Outcome::Reschedule
        }

        numbers::SPAWN => {
            let entry = kernel.table.slot(current).regs.r1;
            let arg = kernel.table.slot(current).regs.r2;
            let new_id = kernel.table.thread_spawn(entry, arg);
            kernel.table.slot_mut(current).regs.r0 = new_id.0;
            Outcome::Reschedule
        }

        numbers::FORK => {
            match kernel.table.thread_fork(current) {
                Some(child_idx) => {
                    let child_id = kernel.table.slot(child_idx).id;
                    kernel.table.slot_mut(child_idx).regs.r0 = 0;
                    kernel.table.slot_mut(current).regs.r0 = child_id.0;
                }
                None => {
                    kernel.table.slot_mut(current).regs.r0 = 0;
                }
            }
            Outcome::Resume(current)
        }

        numbers::RESET => Outcome::Reset,

        numbers::WAIT => {
            let awaited = ThreadId(kernel.table.slot(current).regs.r1);
            match kernel.table.lookup_by_id(awaited) {
                Some(_) => {
                    let slot = kernel.table.slot_mut(current);
                    slot.state = ThreadState::Blocked;
                    slot.wait_status = WaitStatus::Thread;
                    // regs.r1 already holds the awaited id.
                    Outcome::Reschedule
                }
                None => Outcome::Resume(current),
            }
        }

        numbers::KILL => {
            let target = ThreadId(kernel.table.slot(current).regs.r1);
            match kernel.table.lookup_by_id(target) {
                Some(idx) => {
                    kernel.table.thread_notify_waiting(idx);
                    kernel.table.thread_kill(idx);
                    kernel.table.slot_mut(current).regs.r0 = 1;
                }
                None => {
                    kernel.table.slot_mut(current).regs.r0 = 0;
                }
            }
            Outcome::Resume(current)
        }

        numbers::GET_TID => {
            let id = kernel.table.slot(current).id;
            kernel.table.slot_mut(current).regs.r0 = id.0;
            Outcome::Resume(current)
        }

        numbers::LOCK => {
            let lock_addr = kernel.table.slot(current).regs.r1;
            // SAFETY: the syscall ABI contract requires R1 to hold a valid
            // pointer to a `Lock` cell the caller owns; the kernel only
            // performs the test-and-set the caller asked for.
            let acquired = unsafe { (*(lock_addr as *mut Lock)).try_lock() };
            kernel.table.slot_mut(current).regs.r0 = acquired as u32;
            Outcome::Resume(current)
        }

        numbers::UNLOCK => {
            let lock_addr = kernel.table.slot(current).regs.r1;
            // SAFETY: see LOCK above.
            unsafe { (*(lock_addr as *mut Lock)).unlock() };
            Outcome::Reschedule
        }

        other => Outcome::Unknown(other),
    }
}

/// Noreturn entry point invoked by the architecture layer's SVC handler
/// with interrupts masked. Runs the dispatcher against the kernel
/// singleton and acts on its `Outcome`.
pub fn handle_trap() -> ! {
    let outcome = crate::kernel::with_kernel(dispatch_syscall);
    match outcome {
        Outcome::Resume(idx) => crate::arch::kernel_run(idx),
        Outcome::Reschedule => crate::scheduler::schedule(),
        Outcome::Reset => crate::arch::trigger_reset(),
        Outcome::Unknown(n) => crate::kernel::kernel_panic_fmt(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::Kernel;
    use crate::scheduler::table::ThreadTable;

    fn fresh_kernel_with_current_at(idx: usize) -> Kernel {
        let mut table = ThreadTable::new();
        table.slot_mut(idx).state = ThreadState::Runnable;
        table.slot_mut(idx).id = ThreadId(1);
        Kernel::for_test(table, idx)
    }

    #[test]
    fn sleep_zero_resumes_immediately_with_zero() {
        let mut kernel = fresh_kernel_with_current_at(0);
        kernel.table.slot_mut(0).regs.r0 = numbers::SLEEP;
        kernel.table.slot_mut(0).regs.r1 = 0;
        let outcome = dispatch_syscall(&mut kernel);
        assert_eq!(outcome, Outcome::Resume(0));
        assert_eq!(kernel.table.slot(0).regs.r0, 0);
        assert_eq!(kernel.table.slot(0).state, ThreadState::Runnable);
    }

    #[test]
    fn sleep_positive_blocks_and_updates_next_wake() {
        let mut kernel = fresh_kernel_with_current_at(0);
        kernel.systime_ms = 100;
        kernel.table.slot_mut(0).regs.r0 = numbers::SLEEP;
        kernel.table.slot_mut(0).regs.r1 = 50;
        let outcome = dispatch_syscall(&mut kernel);
        assert_eq!(outcome, Outcome::Reschedule);
        assert_eq!(kernel.table.slot(0).state, ThreadState::Sleeping);
        assert_eq!(kernel.table.slot(0).sleep_deadline, 150);
        assert_eq!(kernel.next_wake_ms, 150);
    }

    #[test]
    // R1 carries the lock's address as a genuine 32-bit Cortex-M pointer;
    // on a 64-bit host that address cannot be reconstructed, so this is
    // only meaningful run against a 32-bit target.
    #[cfg(target_pointer_width = "32")]
    fn lock_then_lock_again_fails() {
        let mut lock = Lock::new();
        let mut kernel = fresh_kernel_with_current_at(0);

        kernel.table.slot_mut(0).regs.r0 = numbers::LOCK;
        kernel.table.slot_mut(0).regs.r1 = &mut lock as *mut Lock as u32;
        dispatch_syscall(&mut kernel);
        assert_eq!(kernel.table.slot(0).regs.r0, 1);

        dispatch_syscall(&mut kernel);
        assert_eq!(kernel.table.slot(0).regs.r0, 0);
    }

    #[test]
    fn kill_unknown_target_returns_false_and_resumes_caller() {
        let mut kernel = fresh_kernel_with_current_at(0);
        kernel.table.slot_mut(0).regs.r0 = numbers::KILL;
        kernel.table.slot_mut(0).regs.r1 = 0xDEAD;
        let outcome = dispatch_syscall(&mut kernel);
        assert_eq!(outcome, Outcome::Resume(0));
        assert_eq!(kernel.table.slot(0).regs.r0, 0);
    }

    #[test]
    fn wait_exit_handshake_delivers_status() {
        let mut table = ThreadTable::new();
        let p = table.thread_spawn(0x1000, 0); // id 1
        let q = table.thread_spawn(0x2000, 0); // id 2
        let idx_p = table.lookup_by_id(p).unwrap();
        let idx_q = table.lookup_by_id(q).unwrap();

        let mut kernel = Kernel::for_test(table, idx_p);
        kernel.table.slot_mut(idx_p).regs.r0 = numbers::WAIT;
        kernel.table.slot_mut(idx_p).regs.r1 = q.0;
        let outcome = dispatch_syscall(&mut kernel);
        assert_eq!(outcome, Outcome::Reschedule);
        assert_eq!(kernel.table.slot(idx_p).state, ThreadState::Blocked);

        kernel.current = idx_q;
        kernel.table.slot_mut(idx_q).regs.r0 = numbers::EXIT;
        kernel.table.slot_mut(idx_q).regs.r1 = 42;
        dispatch_syscall(&mut kernel);

        assert_eq!(kernel.table.slot(idx_p).state, ThreadState::Runnable);
        assert_eq!(kernel.table.slot(idx_p).regs.r0, 42);
        assert_eq!(kernel.table.slot(idx_q).state, ThreadState::Zombie);
    }

    #[test]
    fn unknown_syscall_is_reported_not_panicked() {
        let mut kernel = fresh_kernel_with_current_at(0);
        kernel.table.slot_mut(0).regs.r0 = 0xFF;
        let outcome = dispatch_syscall(&mut kernel);
        assert_eq!(outcome, Outcome::Unknown(0xFF));
    }
}
