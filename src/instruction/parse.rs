//! Reader for the instruction stream. One record per line:
//!
//! ```text
//! LDR 0 0000
//! STR 1 0010
//! ```
//!
//! The register and the address are hexadecimal. Anything after the address
//! is ignored.

use std::str::Lines;

use super::{Instruction, Opcode};
use crate::memory::Word;
use crate::parse::{parse_hex, ParseError, ParseErrorKind, Result};
use crate::register::Register;

#[derive(Debug, Clone)]
pub struct Parser<'a> {
    lines: Lines<'a>,
    line_nr: usize,
}

impl<'a> Parser<'a> {
    /// Creates a new parser over the text of an instruction stream
    pub fn new(data: &'a str) -> Self {
        Self {
            lines: data.lines(),
            line_nr: 0,
        }
    }

    /// Consumes `self` and returns every well-formed instruction in order.
    ///
    /// Malformed records are logged and dropped; they never stop the parse.
    pub fn parse(self) -> Vec<Instruction> {
        self.filter_map(|res| match res {
            Ok(instruction) => Some(instruction),
            Err(err) => {
                log::warn!("Skipping record: {}", err);
                None
            }
        })
        .collect()
    }

    /// Tries to parse a single record. The `line` should already be trimmed.
    ///
    /// # Examples
    ///
    /// - `LDR 3 00a0`
    /// - `STR f 0xffff`
    fn parse_instruction(&self, line: &str) -> Result<Instruction> {
        let mut tokens = line.split_whitespace();

        let mnemonic = tokens.next().ok_or_else(|| {
            ParseError::new(
                ParseErrorKind::InvalidInstruction,
                "empty record",
                self.line_nr,
            )
        })?;
        let opcode = *Opcode::ALL
            .iter()
            .find(|opcode| mnemonic == opcode.name())
            .ok_or_else(|| {
                ParseError::new(
                    ParseErrorKind::InvalidInstruction,
                    format!("unknown mnemonic `{}`", mnemonic),
                    self.line_nr,
                )
            })?;

        let register = tokens.next().ok_or_else(|| self.missing("register"))?;
        let address = tokens.next().ok_or_else(|| self.missing("address"))?;

        let register = self.parse_register(register)?;
        let address = self.parse_address(address)?;

        log::debug!("[{}] Found instruction {}", self.line_nr, opcode);

        Ok(Instruction::new(opcode, register, address))
    }

    fn parse_register(&self, token: &str) -> Result<Register> {
        let index = parse_hex(token, u32::from_str_radix).ok_or_else(|| {
            ParseError::new(
                ParseErrorKind::InvalidNumber { radix: 16 },
                format!("register `{}` is not a hexadecimal number", token),
                self.line_nr,
            )
        })?;

        u8::try_from(index)
            .ok()
            .and_then(|index| Register::try_from(index).ok())
            .ok_or_else(|| {
                ParseError::new(
                    ParseErrorKind::InvalidRegister { register: index },
                    "registers are numbered 0 to f",
                    self.line_nr,
                )
            })
    }

    fn parse_address(&self, token: &str) -> Result<Word> {
        parse_hex(token, Word::from_str_radix).ok_or_else(|| {
            ParseError::new(
                ParseErrorKind::InvalidAddress,
                format!("address `{}` is not a 16-bit hexadecimal number", token),
                self.line_nr,
            )
        })
    }

    fn missing(&self, operand: &'static str) -> ParseError {
        ParseError::new(ParseErrorKind::MissingOperand, operand, self.line_nr)
    }
}

impl<'a> Iterator for Parser<'a> {
    type Item = Result<Instruction>;

    /// Parses the next non-blank line
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?.trim();
            self.line_nr += 1;

            if !line.is_empty() {
                return Some(self.parse_instruction(line));
            }
        }
    }
}
