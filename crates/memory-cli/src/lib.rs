//! Support code for the memory-cli binary.

pub mod import;
