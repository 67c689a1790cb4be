/*
 * Cortex-M Architecture Support
 *
 * Everything this kernel needs from the concrete hardware: masking
 * interrupts, handing a chosen thread's register image to the external
 * resume trampoline, programming the SysTick periodic interrupt, and
 * triggering a system reset via the SCB.
 */

pub mod systick;

use crate::kernel::with_kernel;
use crate::registers::Registers;

extern "C" {
    /// Platform-defined resume routine: loads `regs` into the CPU and
    /// performs the exception return into user mode at `regs.pc`, with
    /// `regs.sp`, `regs.lr`, and `regs.psr` restored. This is the
    /// low-level trampoline that marshals registers into/out of the
    /// per-thread image; it is a contract this crate calls into, not code
    /// this crate provides. The platform integration that owns the vector
    /// table links this symbol.
    fn tinytask_resume(regs: *const Registers) -> !;
}

/// Masks interrupts for the current core. Used by bootstrap and by
/// `kernel_panic`; every other kernel entry point (tick, SVC) is already
/// running with interrupts masked by the hardware exception mechanism.
pub fn disable_interrupts() {
    cortex_m::interrupt::disable();
}

/// Sets the current-thread pointer to `idx` and hands its register image
/// to the platform resume trampoline. Never returns.
///
/// The kernel lock is released before calling into the trampoline: once
/// control leaves Rust here, the CPU is no longer executing kernel code,
/// and holding the lock across that transition would deadlock the next
/// kernel entry.
pub fn kernel_run(idx: usize) -> ! {
    let regs_ptr: *const Registers = with_kernel(|k| {
        k.current = idx;
        &k.table.slot(idx).regs as *const Registers
    });
    unsafe { tinytask_resume(regs_ptr) }
}

/// Triggers a system reset via the SCB's AIRCR, per the documented reset
/// register contract (`0x05FA0004` written to `0xE000ED0C`).
pub fn trigger_reset() -> ! {
    // SAFETY: SCB::sys_reset requires exclusive access to the peripheral;
    // this crate does not own a `Peripherals` instance (the platform
    // integration that calls `cortex_m_rt::entry` does), so it steals the
    // handle rather than threading ownership through every caller. A
    // reset is by definition the last thing this core does, so the
    // aliasing the steal introduces never has a chance to matter.
    let mut scb = unsafe { cortex_m::peripheral::SCB::steal() };
    scb.sys_reset()
}
