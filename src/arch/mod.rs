/*
 * Architecture Layer
 *
 * The concrete Cortex-M pieces behind the context-switch contract and the
 * bootstrap's periodic-interrupt programming. The trampoline that actually
 * marshals CPU registers into and out of a thread's register image on
 * exception entry/exit is an external collaborator referenced only by
 * contract (see `registers::Registers`); this module is everything on the
 * kernel's side of that boundary: disabling interrupts, resuming a chosen
 * thread's saved image, programming the tick source, and triggering a
 * reset.
 */

#[cfg(target_arch = "arm")]
pub mod cortex_m;

#[cfg(target_arch = "arm")]
pub use self::cortex_m::{disable_interrupts, kernel_run, trigger_reset};
#[cfg(all(target_arch = "arm", feature = "preemption"))]
pub use self::cortex_m::systick::program as program_tick;

#[cfg(not(target_arch = "arm"))]
mod host_stub;
#[cfg(not(target_arch = "arm"))]
pub use host_stub::{disable_interrupts, kernel_run, trigger_reset};
#[cfg(all(not(target_arch = "arm"), feature = "preemption"))]
pub use host_stub::program_tick;
