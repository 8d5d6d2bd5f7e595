//! Shared utilities for the KangSantri AI crates.

mod atomic_write;

pub use atomic_write::{AtomicWriteOptions, atomic_write, atomic_write_with_options};
