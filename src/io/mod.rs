//! I/O utilities.
//!
//! Reads model files into memory, memory-mapping large ones.

pub mod reader;

pub use reader::{FileReader, read_model};
