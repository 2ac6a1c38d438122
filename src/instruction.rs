use std::fmt;

use crate::memory::Word;
use crate::register::Register;
use color_eyre::eyre::{Result, WrapErr};
use num_enum::{IntoPrimitive, TryFromPrimitive};

pub mod parse;

macro_rules! opcodes {
    ( $( $( #[doc = $doc:expr] )+ $name:ident = $repr:literal , )+ ) => {
        /// The operations the machine understands
        #[repr(u8)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[derive(TryFromPrimitive, IntoPrimitive)]
        pub enum Opcode {
            $(
                $( #[doc = $doc] )+
                $name = $repr,
            )+
        }

        impl Opcode {
            pub const ALL: &'static [Self] = &[
                $( Self::$name , )+
            ];

            pub fn name(&self) -> &'static str {
                match self {
                    $( Self::$name => stringify!($name) , )+
                }
            }
        }

        impl ::std::fmt::Display for Opcode {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $( Self::$name => f.write_str(stringify!($name)) , )+
                }
            }
        }
    }
}

opcodes! {
    /// Load a word from memory into a register
    /// @param reg The destination register
    /// @param addr The address to read
    LDR = 0x0,
    /// Store a register into memory
    /// @param reg The source register
    /// @param addr The address to write
    STR = 0x1,
}

/// One decoded record of the instruction stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction {
    pub opcode: Opcode,
    pub register: Register,
    pub address: Word,
}

impl Instruction {
    pub fn new(opcode: Opcode, register: Register, address: Word) -> Self {
        Self {
            opcode,
            register,
            address,
        }
    }

    /// Builds an instruction from raw fields, rejecting anything that is not
    /// a known opcode or a valid register
    pub fn from_raw(opcode: u8, register: u8, address: Word) -> Result<Self> {
        let opcode = Opcode::try_from(opcode)
            .wrap_err_with(|| format!("Invalid opcode: 0x{:02X}", opcode))?;
        let register = Register::from_index(register)?;
        Ok(Self::new(opcode, register, address))
    }

    pub fn ldr(register: Register, address: Word) -> Self {
        Self::new(Opcode::LDR, register, address)
    }

    pub fn str(register: Register, address: Word) -> Self {
        Self::new(Opcode::STR, register, address)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {:04x}", self.opcode, self.register, self.address)
    }
}
