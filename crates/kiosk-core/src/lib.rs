//! Shared low-level persistence helper for kiosk crates.
//!
//! Client-local identity state is written through [`write_text_atomic`] so a
//! crash mid-write can never leave a reader with a partial value.

pub mod atomic_io;

pub use atomic_io::write_text_atomic;
