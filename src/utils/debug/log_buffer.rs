/*
 * Buffered Logging System
 *
 * Log messages are written into a lock-free ring buffer without blocking
 * and without ever touching a concrete serial device; the kernel has no
 * UART of its own (the serial driver is an external collaborator). An
 * external caller that does own a `SerialSink` drains the buffer into it
 * periodically.
 *
 * Benefits:
 * - No deadlocks from logging in interrupt context
 * - Fast logging (just write to buffer)
 * - Safe to call from any context
 */

use spin::Mutex;

use super::ring_buffer::RingBuffer;
use crate::serial::SerialSink;

static LOG_BUFFER: Mutex<RingBuffer> = Mutex::new(RingBuffer::new());

/// Writes a log message to the buffer. Safe to call from any context,
/// including interrupt handlers; briefly holds the buffer's own lock,
/// never a serial device's.
pub fn write_log(message: &str) {
    let mut buffer = LOG_BUFFER.lock();
    buffer.write(message);
}

/// Drains everything currently buffered into `sink`, in order. Intended to
/// be called periodically by whoever owns the real serial device; the
/// kernel itself never calls this.
pub fn drain(sink: &mut dyn SerialSink) {
    let mut buffer = LOG_BUFFER.lock();
    let mut chunk = [0u8; 256];
    while !buffer.is_empty() {
        let read = buffer.read(&mut chunk);
        if read == 0 {
            break;
        }
        sink.write_buf(&chunk[..read]);
    }
}

/// Current buffer occupancy in bytes, for monitoring.
pub fn buffer_usage() -> usize {
    LOG_BUFFER.lock().len()
}
