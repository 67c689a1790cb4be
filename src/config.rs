/*
 * Kernel Compile-Time Configuration
 *
 * Every tunable named by the external interface contract lives here as a
 * single source of truth instead of scattered magic numbers. Mirrors the
 * `#define`-based configuration of the reference kernel.
 */

/// Maximum number of thread slots in the table.
pub const MAX_THREADS: usize = 12;

/// Size in bytes of each slot's dedicated stack region. Must be a power of
/// two; checked below so a misconfiguration fails at compile time.
pub const THREAD_MEM_SIZE: usize = 1024;

/// Size in bytes of the kernel's own stack, reserved while executing kernel
/// code (tick handler, syscall dispatcher) rather than user-thread code.
pub const KERNEL_STACKSIZE: usize = 1024;

/// Scheduler tick frequency in Hz. One tick handler invocation per period.
pub const KERNEL_SCHEDULER_IRQ_FREQ: u32 = 1000;

/// Milliseconds per tick at the configured frequency.
pub const SYSTIME_CYCLES_PER_MS: u32 = 1000 / KERNEL_SCHEDULER_IRQ_FREQ;

/// "No sleepers" sentinel for `next_wake_ms`.
pub const NO_WAKE: u32 = u32::MAX;

/// Sentinel thread id meaning "no thread" / "not found".
pub const NO_TID: u32 = 0;

/// Index sentinel returned by table lookups that find nothing.
pub const INVALID_INDEX: usize = usize::MAX;

const _: () = assert!(THREAD_MEM_SIZE.is_power_of_two());
const _: () = assert!(MAX_THREADS > 0);
