use std::fmt;

use crate::memory::Word;
use color_eyre::eyre::{Result, WrapErr};
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Number of general purpose registers
pub const REGISTER_COUNT: usize = 16;

macro_rules! registers {
    ( $( $name:ident = $repr:literal , )+ ) => {
        /// A register index. Only the sixteen valid indices can be represented.
        #[repr(u8)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[derive(TryFromPrimitive, IntoPrimitive)]
        pub enum Register {
            $( $name = $repr, )+
        }

        impl Register {
            pub const ALL: &'static [Self] = &[
                $( Self::$name , )+
            ];
        }
    }
}

registers! {
    R0 = 0x0, R1 = 0x1, R2 = 0x2, R3 = 0x3,
    R4 = 0x4, R5 = 0x5, R6 = 0x6, R7 = 0x7,
    R8 = 0x8, R9 = 0x9, RA = 0xA, RB = 0xB,
    RC = 0xC, RD = 0xD, RE = 0xE, RF = 0xF,
}

impl Register {
    /// Checks a raw index coming from outside the simulator
    pub fn from_index(index: u8) -> Result<Self> {
        Register::try_from(index).wrap_err_with(|| format!("invalid register: 0x{:X}", index))
    }

    pub fn index(self) -> usize {
        u8::from(self) as usize
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", u8::from(*self))
    }
}

/// Sixteen independent 16-bit registers, all zero at start
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RegisterFile {
    values: [Word; REGISTER_COUNT],
}

impl RegisterFile {
    pub fn read(&self, register: Register) -> Word {
        self.values[register.index()]
    }

    pub fn write(&mut self, register: Register, value: Word) {
        self.values[register.index()] = value;
    }

    pub fn values(&self) -> &[Word; REGISTER_COUNT] {
        &self.values
    }
}
