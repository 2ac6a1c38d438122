use std::fmt;

use crate::cache::CacheArray;
use crate::memory::Memory;
use crate::register::RegisterFile;

/// Bytes of memory included in a snapshot
pub const MEMORY_VIEW: usize = 128;
const REGISTERS_PER_ROW: usize = 4;
const BYTES_PER_ROW: usize = 16;

/// A read-only view of the whole machine, rendered with `Display`
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    registers: &'a RegisterFile,
    cache: &'a CacheArray,
    memory: &'a Memory,
}

impl<'a> Snapshot<'a> {
    pub fn new(registers: &'a RegisterFile, cache: &'a CacheArray, memory: &'a Memory) -> Self {
        Self {
            registers,
            cache,
            memory,
        }
    }

    fn fmt_registers(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.registers.values().iter().enumerate() {
            write!(f, "R{:x}: {:04x}", i, value)?;
            if i % REGISTERS_PER_ROW == REGISTERS_PER_ROW - 1 {
                writeln!(f)?;
            } else {
                write!(f, "   ")?;
            }
        }
        writeln!(f)
    }

    fn fmt_cache(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "   V M Tag  0  1  2  3  4  5  6  7")?;
        writeln!(f, "----------------------------------")?;
        for (i, line) in self.cache.lines().iter().enumerate() {
            write!(
                f,
                "{:x}  {} {} {:03x} ",
                i, line.valid as u8, line.dirty as u8, line.tag
            )?;
            fmt_bytes(f, &line.data)?;
            writeln!(f)?;
        }
        writeln!(f)
    }

    fn fmt_memory(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, bytes) in self.memory.head(MEMORY_VIEW).chunks(BYTES_PER_ROW).enumerate() {
            write!(f, "{:04x}: ", row * BYTES_PER_ROW)?;
            fmt_bytes(f, bytes)?;
            writeln!(f)?;
        }
        writeln!(f)
    }
}

fn fmt_bytes(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{:02x}", byte)?;
    }
    Ok(())
}

impl<'a> fmt::Display for Snapshot<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_registers(f)?;
        self.fmt_cache(f)?;
        self.fmt_memory(f)
    }
}
