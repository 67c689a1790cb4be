/*
 * Kernel Logging System
 *
 * Implements the `log` crate's facade over the buffered ring-buffer
 * logger, so kernel code can call `log::info!`/`log::warn!`/`log::error!`
 * without owning a concrete serial device. Records accumulate in
 * `log_buffer`; draining them to an actual byte sink is the external
 * caller's job.
 */

use core::fmt::Write;

use heapless::String;
use log::{Level, LevelFilter, Metadata, Record};

use super::log_buffer;

/// A small fixed-capacity formatting scratch buffer so `write_log` sees a
/// complete line even when the `log` crate hands us a `Record` whose
/// arguments require formatting. No heap allocation.
struct LineWriter {
    buf: String<256>,
}

impl LineWriter {
    fn new() -> Self {
        LineWriter { buf: String::new() }
    }

    fn as_str(&self) -> &str {
        self.buf.as_str()
    }
}

impl Write for LineWriter {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let space = self.buf.capacity() - self.buf.len();
        let mut take = s.len().min(space);
        while take > 0 && !s.is_char_boundary(take) {
            take -= 1;
        }
        // Capacity is checked above, so this never fails on a full string.
        let _ = self.buf.push_str(&s[..take]);
        Ok(())
    }
}

struct TinyTaskLogger;

impl log::Log for TinyTaskLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Info
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut line = LineWriter::new();
        let _ = write!(line, "[{}] {}\n", record.level(), record.args());
        log_buffer::write_log(line.as_str());
    }

    fn flush(&self) {}
}

static LOGGER: TinyTaskLogger = TinyTaskLogger;

/// Installs the kernel logger as the `log` crate's global logger. Idempotent
/// in the sense that a second call is reported, not panicked on, since a
/// platform integration may call this defensively.
pub fn init() {
    match log::set_logger(&LOGGER).map(|()| log::set_max_level(LevelFilter::Info)) {
        Ok(()) => log::info!("logger initialized"),
        Err(err) => log::warn!("logger already initialized: {}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_writer_truncates_rather_than_overflows() {
        let mut line = LineWriter::new();
        let long = "x".repeat(300);
        let _ = line.write_str(&long);
        assert_eq!(line.buf.len(), 256);
    }
}
