/*
 * Kernel Utilities and Support Functions
 *
 * Support infrastructure used throughout the kernel: the ring-buffer-
 * backed structured logging system.
 */

pub mod debug;
