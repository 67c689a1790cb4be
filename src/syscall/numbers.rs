/*
 * Syscall Numbers
 *
 * Stable contract: user code places one of these in R0 before the
 * supervisor-call trap. Arguments follow in R1..R3 as documented per
 * syscall below.
 */

/// status in R1: notify waiters, kill self, reschedule. Never returns.
pub const EXIT: u32 = 0;
/// No arguments: reschedule. Resume value in R0 is unspecified.
pub const YIELD: u32 = 1;
/// ms in R1: sleep, or resume immediately with R0=0 if ms==0. On wake, R0
/// carries the requested tick count.
pub const SLEEP: u32 = 2;
/// entry in R1, arg in R2: spawn a new thread. Returns new tid, or 0.
pub const SPAWN: u32 = 3;
/// No arguments: fork the current thread. Child resumes with R0=0; parent
/// resumes with R0=child tid, or 0 on failure.
pub const FORK: u32 = 4;
/// No arguments: trigger a hardware reset. Never returns.
pub const RESET: u32 = 5;
/// awaited tid in R1: block until that thread exits, or resume immediately
/// if the tid does not exist. On wake, R0 carries the exited thread's exit
/// status.
pub const WAIT: u32 = 6;
/// target tid in R1: kill that thread if it exists. Returns true/false.
pub const KILL: u32 = 7;
/// No arguments: return the caller's own thread id.
pub const GET_TID: u32 = 8;
/// lock pointer in R1: test-and-set. Returns true/false.
pub const LOCK: u32 = 9;
/// lock pointer in R1: release and reschedule.
pub const UNLOCK: u32 = 10;
