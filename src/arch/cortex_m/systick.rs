/*
 * Periodic Interrupt Programming
 *
 * Programs the SysTick timer for the scheduler's tick frequency, as part
 * of kernel bootstrap (component 7: "program the periodic interrupt
 * source for the scheduler frequency, if preemption is compiled in").
 * Grounded on the reference kernel's `kernel_set_scheduler_freq`, which
 * pokes the same three SysTick registers directly; here it goes through
 * the `cortex-m` crate's typed SYST peripheral instead of raw MMIO.
 */

use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::SYST;
#[cfg(feature = "preemption")]
use cortex_m_rt::exception;

/// SysTick never returns the way a normal exception handler does: it
/// always ends by falling into `on_systick`, which hands off to a thread
/// via the resume trampoline and so never comes back here. Unlike SVC and
/// PendSV, SysTick needs no register-bank marshaling on entry, since the
/// handler body touches no thread state directly and `on_systick` reads
/// and writes the table through the kernel lock rather than through CPU
/// registers; that is why this handler can be an ordinary `#[exception]`
/// function instead of a naked trampoline.
#[cfg(feature = "preemption")]
#[exception]
fn SysTick() {
    crate::scheduler::tick::on_systick()
}

/// Core clock frequency assumed for reload-value computation. The actual
/// clock/PLL configuration is an external collaborator (boot prelude) out
/// of this crate's scope; this constant documents the assumption the
/// reload computation below depends on.
const CORE_CLOCK_HZ: u32 = 16_000_000;

/// Programs SysTick to fire at `freq_hz`, using the core clock, and
/// enables its interrupt and counter. Called once during bootstrap, with
/// interrupts already masked.
pub fn program(freq_hz: u32) {
    // SAFETY: called once during single-threaded bootstrap, before the
    // scheduler or any user thread runs; no other code touches SYST
    // concurrently.
    let mut syst = unsafe { SYST::steal() };
    let reload = CORE_CLOCK_HZ / freq_hz - 1;
    syst.set_clock_source(SystClkSource::Core);
    syst.set_reload(reload);
    syst.clear_current();
    syst.enable_interrupt();
    syst.enable_counter();
}
