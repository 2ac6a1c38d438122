//! A toy 16-bit load/store machine with a direct-mapped, write-back cache
//! between its registers and memory.

pub mod address;
pub mod cache;
pub mod instruction;
pub mod memory;
pub mod parse;
pub mod register;
pub mod session;
pub mod simulator;
pub mod snapshot;
pub mod trace;
