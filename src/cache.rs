use std::fmt;

use crate::address::Address;
use crate::memory::{Byte, Memory, Word};

/// Number of lines in the cache
pub const LINE_COUNT: usize = 8;
/// Bytes per block
pub const BLOCK_SIZE: usize = 8;

pub type Block = [Byte; BLOCK_SIZE];

/// Outcome of looking an address up in the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lookup {
    Hit,
    Miss,
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Hit => f.write_str("H"),
            Lookup::Miss => f.write_str("M"),
        }
    }
}

/// One cached block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CacheLine {
    pub valid: bool,
    /// Holds writes memory has not seen yet
    pub dirty: bool,
    pub tag: Word,
    pub data: Block,
}

impl CacheLine {
    pub fn holds(&self, tag: Word) -> bool {
        self.valid && self.tag == tag
    }

    /// Reads a word at `offset` (little endian).
    ///
    /// At offset 7 the high byte comes from byte 0 of the same block, not
    /// from the next address: a word at `a` with `a & 7 == 7` overlaps the
    /// byte at `a & 0xFFF8`.
    pub fn read_word(&self, offset: u8) -> Word {
        let (lo, hi) = word_slots(offset);
        (self.data[hi] as Word) << 8 | (self.data[lo] as Word)
    }

    /// Writes a word at `offset` (little endian) and marks the line dirty.
    ///
    /// At offset 7 the high byte lands in byte 0 of the same block, so it
    /// overwrites the low byte of the word at the block base.
    pub fn write_word(&mut self, offset: u8, value: Word) {
        let (lo, hi) = word_slots(offset);
        self.data[lo] = (value & 0xFF) as Byte;
        self.data[hi] = (value >> 8) as Byte;
        self.dirty = true;
    }
}

fn word_slots(offset: u8) -> (usize, usize) {
    let lo = offset as usize % BLOCK_SIZE;
    (lo, (lo + 1) % BLOCK_SIZE)
}

/// Direct-mapped, write-back cache of eight lines
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CacheArray {
    lines: [CacheLine; LINE_COUNT],
}

impl CacheArray {
    pub fn lookup(&self, index: u8, tag: Word) -> Lookup {
        if self.lines[index as usize].holds(tag) {
            Lookup::Hit
        } else {
            Lookup::Miss
        }
    }

    pub fn line(&self, index: u8) -> &CacheLine {
        &self.lines[index as usize]
    }

    pub fn lines(&self) -> &[CacheLine; LINE_COUNT] {
        &self.lines
    }

    /// Makes the block containing `address` resident and hands out its line.
    ///
    /// On a miss the resident line is written back first if it is valid and
    /// dirty, then the new block is filled from memory and left clean.
    pub fn access(&mut self, address: &Address, memory: &mut Memory) -> (Lookup, &mut CacheLine) {
        let lookup = self.lookup(address.index, address.tag);

        if lookup == Lookup::Miss {
            let line = &mut self.lines[address.index as usize];
            if line.valid && line.dirty {
                let victim = Address::block_base_of(line.tag, address.index);
                log::debug!(
                    "Write back line {} (tag 0x{:03X}) to 0x{:04X}",
                    address.index,
                    line.tag,
                    victim
                );
                memory.write_array(victim, &line.data);
            }

            line.data = memory.read_array(address.block_base);
            line.valid = true;
            line.dirty = false;
            line.tag = address.tag;

            log::debug!(
                "Fill line {} from 0x{:04X} (tag 0x{:03X})",
                address.index,
                address.block_base,
                address.tag
            );
        }

        (lookup, &mut self.lines[address.index as usize])
    }
}
