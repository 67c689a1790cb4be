/*
 * IRQ-Safe Logging
 *
 * Minimal logging path for interrupt context (the tick handler) that
 * skips the `log` crate's `Record` formatting machinery entirely. Still
 * goes through the same ring buffer as the rest of logging; the only
 * thing it avoids is building a `core::fmt::Arguments` on every tick.
 */

use super::log_buffer;

/// Logs `prefix: msg` with an `[IRQ]` tag, with no formatting.
pub fn irq_log(prefix: &str, msg: &str) {
    log_buffer::write_log("[IRQ] ");
    log_buffer::write_log(prefix);
    log_buffer::write_log(": ");
    log_buffer::write_log(msg);
    log_buffer::write_log("\n");
}

/// Logs just a prefix, for the very minimal cases.
pub fn irq_log_simple(prefix: &str) {
    log_buffer::write_log("[IRQ] ");
    log_buffer::write_log(prefix);
    log_buffer::write_log("\n");
}
