/*
 * Serial Byte Sink Contract
 *
 * The kernel itself never talks to a UART; the driver is an external
 * collaborator referenced only by the contract it must satisfy. This
 * trait exists so an external driver crate has something concrete to
 * implement, and so the log drain (see `utils::debug`) has a sink type to
 * hand bytes to, without the kernel depending on any particular hardware
 * crate.
 */

/// A byte-oriented serial device, addressable by logical module/baud at
/// init time. Implemented by an external driver; never by this crate.
pub trait SerialSink {
    /// Initializes the given serial module at the given baud rate.
    fn init(&mut self, module: u8, baud: u32);

    /// Writes a single byte, blocking if the transmit path is busy.
    fn put_char(&mut self, byte: u8);

    /// Reads a single byte, blocking until one is available.
    fn get_char(&mut self) -> u8;

    /// Writes a whole buffer, in order.
    fn write_buf(&mut self, buf: &[u8]) {
        for &byte in buf {
            self.put_char(byte);
        }
    }

    /// Blocks until any buffered output has been transmitted.
    fn flush(&mut self);

    /// Number of bytes currently available to read without blocking.
    fn available(&self) -> usize;
}
