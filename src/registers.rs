/*
 * Register Image / Context-Switch Contract
 *
 * Defines the fixed, explicitly ordered layout that the context-switch
 * trampoline treats as a CPU-register bank. The field order matches the
 * reference header's `registers_t` exactly so a saved image can be
 * overlaid onto a thread's stack without translation: callee-saved bank
 * first, then SP, then the hardware-pushed exception frame (R0-R3, R12,
 * LR, PC, PSR) last, in Cortex-M exception-frame order.
 *
 * Do not reorder these fields or rely on `#[repr(Rust)]` layout; the
 * trampoline that seeds and restores this struct depends on exactly this
 * order.
 */

use bitflags::bitflags;

bitflags! {
    /// Cortex-M Program Status Register bits this kernel cares about.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Psr: u32 {
        /// T-bit: Thumb instruction state. Cortex-M has no ARM state, so
        /// every seeded thread must start with this bit set or it takes an
        /// invalid-state fault on its first instruction.
        const THUMB = 0x0100_0000;
    }
}

/// Full register image for one thread, laid out for direct overlay by the
/// architecture-specific context-switch trampoline.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct Registers {
    // Callee-saved bank (saved/restored by the trampoline, not by hardware).
    pub r4: u32,
    pub r5: u32,
    pub r6: u32,
    pub r7: u32,
    pub r8: u32,
    pub r9: u32,
    pub r10: u32,
    pub r11: u32,

    /// Stack pointer at the point of suspension.
    pub sp: u32,

    // Hardware exception frame (pushed/popped by the CPU on exception
    // entry/return on Cortex-M; R0 and R1 double as syscall number/arg).
    pub r0: u32,
    pub r1: u32,
    pub r2: u32,
    pub r3: u32,
    pub r12: u32,
    pub lr: u32,
    pub pc: u32,
    pub psr: u32,
}

impl Registers {
    /// All-zero image, used by `zero_slot`.
    pub const fn zeroed() -> Self {
        Registers {
            r4: 0,
            r5: 0,
            r6: 0,
            r7: 0,
            r8: 0,
            r9: 0,
            r10: 0,
            r11: 0,
            sp: 0,
            r0: 0,
            r1: 0,
            r2: 0,
            r3: 0,
            r12: 0,
            lr: 0,
            pc: 0,
            psr: 0,
        }
    }

    /// Seeds a fresh image for a thread about to run `entry_fn(arg)` on the
    /// given stack top. `lr` is left at 0: this kernel never returns from a
    /// thread entry function via `bx lr`; a thread that falls off the end
    /// of its entry function has undefined behavior.
    pub fn seed(entry_fn: u32, arg: u32, stack_top: u32) -> Self {
        Registers {
            sp: stack_top,
            r0: arg,
            pc: entry_fn,
            psr: Psr::THUMB.bits(),
            ..Registers::zeroed()
        }
    }
}
