/*
 * Host Test Stub
 *
 * The scheduler and syscall dispatcher reference `crate::arch::kernel_run`
 * and `crate::arch::trigger_reset` unconditionally so their noreturn
 * hand-off sites type-check; on a host test build there is no Cortex-M to
 * hand off to. These paths are exercised only through the pure,
 * host-testable logic in `scheduler::next_runnable` and
 * `syscall::dispatch::dispatch_syscall`, never by actually calling these
 * stubs.
 */

pub fn disable_interrupts() {}

pub fn kernel_run(_idx: usize) -> ! {
    unreachable!("kernel_run has no host implementation; exercised via next_runnable in tests")
}

pub fn trigger_reset() -> ! {
    unreachable!("trigger_reset has no host implementation; exercised via dispatch_syscall in tests")
}

#[cfg(feature = "preemption")]
pub fn program_tick(_freq_hz: u32) {
    // No hardware timer on the host; `tick::tick` is exercised directly in
    // tests instead of through this entry point.
}
