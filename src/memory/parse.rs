//! 0000: 00 01 02 03 04 05 06 07 08 09 0a 0b 0c 0d 0e 0f
//! 0010: 10 11 12 13 14 15 16 17 18 19 1a 1b 1c 1d 1e 1f

use std::str::Lines;

use super::{Byte, ImageRow, Word, ROW_SIZE};
use crate::parse::{parse_hex, ParseError, ParseErrorKind, Result};

#[derive(Debug, Clone)]
pub struct Parser<'a> {
    lines: Lines<'a>,
    line_nr: usize,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the text of a memory image
    pub fn new(data: &'a str) -> Self {
        Self {
            lines: data.lines(),
            line_nr: 0,
        }
    }

    /// Consumes `self` and returns every well-formed row in file order.
    ///
    /// # Errors
    ///
    /// Malformed rows are logged and skipped. The remaining rows are still
    /// returned so they can be applied.
    pub fn parse(self) -> Vec<ImageRow> {
        self.filter_map(|res| match res {
            Ok(row) => Some(row),
            Err(err) => {
                log::warn!("Skipping image row: {}", err);
                None
            }
        })
        .collect()
    }

    /// Tries to parse a line as an image row. The `line` should already be
    /// trimmed.
    ///
    /// # Examples
    ///
    /// - `0040: de ad be ef 00 00 00 00 00 00 00 00 00 00 00 00`
    /// - `0x0040 de ad be ef 00 00 00 00 00 00 00 00 00 00 00 00`
    fn parse_row(&self, line: &str) -> Result<ImageRow> {
        let mut tokens = line.split_whitespace();

        let base = tokens.next().unwrap_or_default();
        let base = base.strip_suffix(':').unwrap_or(base);
        let base = parse_hex(base, Word::from_str_radix).ok_or_else(|| {
            ParseError::new(
                ParseErrorKind::InvalidAddress,
                format!("row address `{}` is not a 16-bit hexadecimal number", base),
                self.line_nr,
            )
        })?;

        let mut bytes = [0; ROW_SIZE];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let token = tokens.next().ok_or_else(|| {
                ParseError::new(
                    ParseErrorKind::MissingOperand,
                    format!("row has {} of {} bytes", i, ROW_SIZE),
                    self.line_nr,
                )
            })?;

            *byte = parse_hex(token, Byte::from_str_radix).ok_or_else(|| {
                ParseError::new(
                    ParseErrorKind::InvalidByte,
                    format!("`{}` is not a hexadecimal byte", token),
                    self.line_nr,
                )
            })?;
        }

        log::debug!("[{}] Image row `0x{:04x}`", self.line_nr, base);

        Ok(ImageRow { base, bytes })
    }
}

impl<'a> Iterator for Parser<'a> {
    type Item = Result<ImageRow>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?.trim();
            self.line_nr += 1;

            if !line.is_empty() {
                return Some(self.parse_row(line));
            }
        }
    }
}
