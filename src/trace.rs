use std::fmt;
use std::io::Write;

use crate::address::Address;
use crate::cache::Lookup;
use crate::instruction::Opcode;
use crate::memory::Word;
use crate::register::Register;
use crate::snapshot::Snapshot;
use color_eyre::eyre::{Result, WrapErr};

/// What happened while executing one instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceRecord {
    pub opcode: Opcode,
    pub register: Register,
    pub address: Address,
    pub lookup: Lookup,
    /// The value loaded into, or stored from, the register
    pub value: Word,
}

impl fmt::Display for TraceRecord {
    /// `LDR 2 0010 000 2 0 H 1234`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {:04x} {:03x} {:x} {:x} {} {:04x}",
            self.opcode,
            self.register,
            self.address.raw,
            self.address.tag,
            self.address.index,
            self.address.offset,
            self.lookup,
            self.value
        )
    }
}

/// Writes trace lines and machine snapshots to an output sink
#[derive(Debug)]
pub struct Tracer<W: Write> {
    out: W,
    /// Snapshot after every instruction
    verbose: bool,
}

impl<W: Write> Tracer<W> {
    pub fn new(out: W, verbose: bool) -> Self {
        Self { out, verbose }
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Emits one trace line
    pub fn trace(&mut self, record: &TraceRecord) -> Result<()> {
        writeln!(self.out, "{}", record).wrap_err("Failed to write trace line")
    }

    /// Emits a snapshot unconditionally
    pub fn snapshot(&mut self, snapshot: &Snapshot<'_>) -> Result<()> {
        write!(self.out, "{}", snapshot).wrap_err("Failed to write snapshot")
    }

    /// Emits a snapshot only in verbose mode
    pub fn checkpoint(&mut self, snapshot: &Snapshot<'_>) -> Result<()> {
        if self.verbose {
            self.snapshot(snapshot)?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
