use std::io::Write;

use crate::address::Address;
use crate::cache::CacheArray;
use crate::instruction::{Instruction, Opcode};
use crate::memory::{Memory, Word};
use crate::register::{Register, RegisterFile};
use crate::snapshot::Snapshot;
use crate::trace::{TraceRecord, Tracer};
use color_eyre::eyre::Result;
use log::*;

/// The machine: registers and memory with a direct-mapped, write-back cache
/// in between. All state is owned here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Simulator {
    cache: CacheArray,
    registers: RegisterFile,
    memory: Memory,
}

impl Simulator {
    /// Initializes a machine with a cold cache and zeroed registers on top
    /// of `memory`
    pub fn new(memory: Memory) -> Self {
        Self {
            cache: CacheArray::default(),
            registers: RegisterFile::default(),
            memory,
        }
    }

    pub fn cache(&self) -> &CacheArray {
        &self.cache
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut RegisterFile {
        &mut self.registers
    }

    /// Main memory as last written back. Dirty lines are not reflected.
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::new(&self.registers, &self.cache, &self.memory)
    }

    /// LDR: reads the word at `address` through the cache into `register`
    pub fn load(&mut self, register: Register, address: Word) -> TraceRecord {
        let address = Address::decompose(address);
        let (lookup, line) = self.cache.access(&address, &mut self.memory);
        let value = line.read_word(address.offset);
        self.registers.write(register, value);

        debug!("LDR {} 0x{:04X}: {} 0x{:04X}", register, address.raw, lookup, value);

        TraceRecord {
            opcode: Opcode::LDR,
            register,
            address,
            lookup,
            value,
        }
    }

    /// STR: writes `register` to `address` through the cache
    pub fn store(&mut self, register: Register, address: Word) -> TraceRecord {
        let address = Address::decompose(address);
        let value = self.registers.read(register);
        let (lookup, line) = self.cache.access(&address, &mut self.memory);
        line.write_word(address.offset, value);

        debug!("STR {} 0x{:04X}: {} 0x{:04X}", register, address.raw, lookup, value);

        TraceRecord {
            opcode: Opcode::STR,
            register,
            address,
            lookup,
            value,
        }
    }

    /// Executes a single instruction
    pub fn execute(&mut self, instruction: Instruction) -> TraceRecord {
        match instruction.opcode {
            Opcode::LDR => self.load(instruction.register, instruction.address),
            Opcode::STR => self.store(instruction.register, instruction.address),
        }
    }

    /// Runs every instruction in order, tracing each one. A snapshot follows
    /// every instruction in verbose mode and always closes the run.
    pub fn run<W: Write>(
        &mut self,
        instructions: &[Instruction],
        tracer: &mut Tracer<W>,
    ) -> Result<()> {
        for instruction in instructions {
            let record = self.execute(*instruction);
            tracer.trace(&record)?;
            tracer.checkpoint(&self.snapshot())?;
        }

        info!("Program terminated after {} instructions", instructions.len());

        tracer.snapshot(&self.snapshot())
    }
}
