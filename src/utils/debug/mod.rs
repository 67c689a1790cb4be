/*
 * Debugging and Logging Utilities
 *
 * Structured logging (via the `log` crate facade), the ring buffer it
 * accumulates into, and the buffered-drain API an external serial owner
 * calls to get the bytes out.
 */

pub mod irq_log;
pub mod log_buffer;
pub mod logger;
pub mod ring_buffer;

/// Installs the kernel logger. The kernel owns no serial device of its
/// own, so there is nothing further to initialize here; an external
/// collaborator drains `log_buffer` into its own `SerialSink` on its own
/// schedule.
pub fn init_debug_infrastructure() {
    logger::init();
}
