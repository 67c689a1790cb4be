/*
 * Kernel Singleton and Bootstrap
 *
 * The thread table, current-thread index, and tick counters are
 * process-wide singletons. Rather than loose globals, they are owned by a
 * single `Kernel` value behind one lock, consistent with treating kernel
 * state as a value with interior-mutability discipline guarded by the
 * kernel-entry interrupt mask rather than scattered statics.
 *
 * Every public entry point here (tick, syscall dispatch, scheduler) runs
 * with interrupts disabled for its duration, so the lock never actually
 * contends; it exists to make the aliasing discipline explicit rather than
 * to arbitrate real concurrency.
 */

use spin::Mutex;

use crate::config::{KERNEL_STACKSIZE, MAX_THREADS, NO_WAKE};
use crate::scheduler::table::ThreadTable;
use crate::scheduler::thread::ThreadState;

/// The stack used while executing kernel code: the tick handler and syscall
/// dispatcher run on this stack, not on whichever thread happened to trap
/// in. Aligned to 8 bytes to satisfy the AAPCS stack alignment the
/// architecture layer's exception entry relies on.
#[repr(align(8))]
struct KernelStack([u8; KERNEL_STACKSIZE]);

static mut KERNEL_STACK: KernelStack = KernelStack([0; KERNEL_STACKSIZE]);

/// Returns the one-past-the-end address of the static kernel stack, i.e.
/// the initial value the architecture layer seeds its kernel-mode stack
/// pointer (MSP) with before the first exception entry.
pub fn kernel_stack_top() -> *const u8 {
    // SAFETY: only the address of the static is taken, never its contents;
    // no other code reads or writes `KERNEL_STACK` through this symbol.
    unsafe { core::ptr::addr_of!(KERNEL_STACK.0).cast::<u8>().add(KERNEL_STACKSIZE) }
}

pub struct Kernel {
    pub table: ThreadTable,
    /// Index of the slot that is currently executing.
    pub current: usize,
    pub systime_ms: u32,
    pub next_wake_ms: u32,
}

impl Kernel {
    const fn new() -> Self {
        Kernel {
            table: ThreadTable::new(),
            current: 0,
            systime_ms: 0,
            next_wake_ms: NO_WAKE,
        }
    }

    /// Builds a standalone `Kernel` value for unit tests that need to drive
    /// the dispatcher or scheduler against a specific table/current-index
    /// combination without going through the process-wide singleton.
    #[cfg(test)]
    pub fn for_test(table: ThreadTable, current: usize) -> Self {
        Kernel {
            table,
            current,
            systime_ms: 0,
            next_wake_ms: NO_WAKE,
        }
    }
}

static KERNEL: Mutex<Kernel> = Mutex::new(Kernel::new());

/// Runs `f` with exclusive access to the kernel singleton. Callers are
/// expected to already be running with interrupts masked (tick handler,
/// syscall dispatcher, scheduler); see the module doc comment.
pub fn with_kernel<R>(f: impl FnOnce(&mut Kernel) -> R) -> R {
    f(&mut KERNEL.lock())
}

/// Copies `caller_stack`'s bytes into the tail of `slot0_stack`, so the
/// stack's top aligns with `slot0_stack`'s top, and returns the offset into
/// `slot0_stack` where the relocated stack pointer now sits. Pure and
/// pointer-free so it can be exercised on the host against the exact
/// boundary scenario named for bootstrap.
pub fn relocate_stack(slot0_stack: &mut [u8], caller_stack: &[u8]) -> usize {
    let len = caller_stack.len();
    debug_assert!(len <= slot0_stack.len());
    let offset = slot0_stack.len() - len;
    slot0_stack[offset..].copy_from_slice(caller_stack);
    offset
}

/// Bootstraps the kernel: reserves the static kernel stack, initializes the
/// thread table, relocates the caller's live stack into slot 0
/// byte-for-byte, marks slot 0 runnable as thread 0, resets the tick
/// counters, sanity-checks table positions, and (if preemption is compiled
/// in) programs the periodic interrupt.
///
/// # Safety
///
/// `current_sp` and `current_stack_top` must describe the caller's own,
/// currently live stack, with `current_sp <= current_stack_top` and both
/// addresses valid to read for the byte range between them. The caller
/// must hold no pointer into that range that survives this call: after
/// `kernel_init` returns, the range has been copied elsewhere and the
/// caller's own stack pointer must be reseated to the returned address
/// before anything else touches the stack.
pub unsafe fn kernel_init(current_sp: *const u8, current_stack_top: *const u8) -> *mut u8 {
    debug_assert!(current_sp <= current_stack_top);
    let len = unsafe { current_stack_top.offset_from(current_sp) as usize };
    let caller_stack = unsafe { core::slice::from_raw_parts(current_sp, len) };

    // Step 1: reserve the static kernel stack. It is not switched to here
    // (relocating the live caller stack takes priority); the architecture
    // layer seats `kernel_stack_top()` as MSP before the first exception
    // entry so tick/syscall handling never runs on a thread's own stack.
    let _ = kernel_stack_top();

    let mut kernel = KERNEL.lock();
    kernel.table.thread_init();

    let slot0_base = kernel.table.slot(0).stack.as_ptr() as usize;
    let offset = {
        let slot0_stack = &mut kernel.table.slot_mut(0).stack;
        relocate_stack(slot0_stack, caller_stack)
    };

    kernel.table.slot_mut(0).state = ThreadState::Runnable;
    kernel.current = 0;
    kernel.systime_ms = 0;
    kernel.next_wake_ms = NO_WAKE;

    for idx in 0..MAX_THREADS {
        let ptr: *const crate::scheduler::thread::Slot = kernel.table.slot(idx);
        match kernel.table.position_of(ptr) {
            Some(found) if found == idx => {}
            _ => kernel_panic("thread table position mismatch at bootstrap"),
        }
    }

    #[cfg(feature = "preemption")]
    crate::arch::program_tick(crate::config::KERNEL_SCHEDULER_IRQ_FREQ);

    (slot0_base + offset) as *mut u8
}

/// The single funnel for every unrecoverable kernel condition: masks
/// interrupts, logs the cause, and spins forever in a state a debugger can
/// halt and inspect. Never returns; no kernel code attempts recovery after
/// a panic.
pub fn kernel_panic(msg: &str) -> ! {
    crate::arch::disable_interrupts();
    log::error!("kernel panic: {}", msg);
    loop {
        core::hint::spin_loop();
    }
}

/// Convenience wrapper for the "unknown syscall number" panic, which needs
/// the offending number in the message.
pub fn kernel_panic_fmt(syscall_number: u32) -> ! {
    crate::arch::disable_interrupts();
    log::error!("kernel panic: unknown syscall number {}", syscall_number);
    loop {
        core::hint::spin_loop();
    }
}

/// Entry point for the crate's `#[panic_handler]`: any Rust-level panic
/// (an out-of-bounds index, an unwrap on a `None` that should not have
/// been reachable) funnels through the same disable-log-spin path as every
/// other unrecoverable condition.
pub fn kernel_panic_from_panic_info(info: &core::panic::PanicInfo) -> ! {
    crate::arch::disable_interrupts();
    log::error!("kernel panic: {}", info);
    loop {
        core::hint::spin_loop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relocate_stack_matches_boundary_scenario() {
        // Scenario: top=0x20008000, caller sp=0x20007F00 -> 0x100 bytes of
        // caller stack land at the tail of a 1024-byte slot-0 region.
        let mut slot0 = [0xAAu8; 1024];
        let caller = [0x11u8; 0x100];
        let offset = relocate_stack(&mut slot0, &caller);
        assert_eq!(offset, 1024 - 0x100);
        assert!(slot0[offset..].iter().all(|&b| b == 0x11));
        assert!(slot0[..offset].iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn kernel_init_marks_slot_zero_runnable() {
        let caller = [0u8; 64];
        let ptr = unsafe { kernel_init(caller.as_ptr(), caller.as_ptr().add(caller.len())) };
        assert!(!ptr.is_null());
        with_kernel(|k| {
            assert_eq!(k.table.slot(0).state, ThreadState::Runnable);
            assert_eq!(k.current, 0);
            assert_eq!(k.systime_ms, 0);
            assert_eq!(k.next_wake_ms, NO_WAKE);
        });
    }
}
