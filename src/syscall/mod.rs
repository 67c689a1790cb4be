/*
 * Syscall Trap Mechanism
 *
 * User code places the syscall number in R0 and up to three arguments in
 * R1..R3, then executes the platform supervisor-call instruction. On
 * Cortex-M this is `SVC #imm`; the immediate is ignored. R4..R11 are
 * preserved across the call by the context-switch contract.
 */

pub mod dispatch;
pub mod numbers;
