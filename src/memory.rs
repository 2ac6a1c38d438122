use std::fmt;

pub mod parse;

pub type Byte = u8; // 1 byte
pub type Word = u16; // 2 bytes

/// Number of addressable bytes
pub const MEMORY_SIZE: usize = 0x10000;
/// Bytes per image row
pub const ROW_SIZE: usize = 16;

/// One row of an initial memory image: 16 bytes placed at `base`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageRow {
    pub base: Word,
    pub bytes: [Byte; ROW_SIZE],
}

/// Main memory of the machine. Every 16-bit address is backed by a byte.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Memory {
    /// The actual data of the memory
    data: Box<[Byte; MEMORY_SIZE]>,
}

impl Default for Memory {
    /// Zero-initialized memory
    fn default() -> Self {
        Memory {
            data: Box::new([0; MEMORY_SIZE]),
        }
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let used = self.data.iter().filter(|byte| **byte != 0).count();
        f.debug_struct("Memory")
            .field("size", &MEMORY_SIZE)
            .field("non_zero", &used)
            .finish()
    }
}

impl Memory {
    /// Memory seeded with `rows`, applied in order
    pub fn with_image(rows: &[ImageRow]) -> Self {
        let mut memory = Self::default();
        memory.apply_image(rows);
        memory
    }

    /// Reads a byte from the memory
    pub fn read_byte(&self, position: Word) -> Byte {
        self.data[position as usize]
    }

    /// Writes a byte to the memory
    pub fn write_byte(&mut self, position: Word, value: Byte) {
        self.data[position as usize] = value;
    }

    /// Writes an array of bytes to the memory, wrapping at the end of the
    /// address space
    pub fn write_array(&mut self, position: Word, data: &[Byte]) {
        for (i, byte) in data.iter().enumerate() {
            self.write_byte(position.wrapping_add(i as Word), *byte);
        }
    }

    /// Copies `N` bytes starting at `position`, wrapping at the end of the
    /// address space
    pub fn read_array<const N: usize>(&self, position: Word) -> [Byte; N] {
        let mut out = [0; N];
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = self.read_byte(position.wrapping_add(i as Word));
        }
        out
    }

    /// Overlays image rows in order; later rows win
    pub fn apply_image(&mut self, rows: &[ImageRow]) {
        for row in rows {
            log::debug!("Image row at 0x{:04X}", row.base);
            self.write_array(row.base, &row.bytes);
        }
    }

    /// The first `len` bytes of memory
    pub fn head(&self, len: usize) -> &[Byte] {
        &self.data[..len.min(MEMORY_SIZE)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_eyre::eyre::Result;

    #[test]
    fn test_read_byte() -> Result<()> {
        let mut mem = Memory::default();
        mem.data[0x2] = 0x12;
        assert_eq!(mem.read_byte(0x2), 0x12);

        Ok(())
    }

    #[test]
    fn test_write_byte() -> Result<()> {
        let mut mem = Memory::default();
        mem.write_byte(0xFFFF, 12);
        assert_eq!(mem.data[0xFFFF], 12);

        Ok(())
    }

    #[test]
    fn test_write_array() -> Result<()> {
        let mut mem = Memory::default();
        mem.write_array(0x44, &[0x12, 0x34, 0x56, 0x78]);
        assert_eq!(mem.data[0x44], 0x12);
        assert_eq!(mem.data[0x45], 0x34);
        assert_eq!(mem.data[0x46], 0x56);
        assert_eq!(mem.data[0x47], 0x78);

        Ok(())
    }

    #[test]
    fn test_write_array_wraps() -> Result<()> {
        let mut mem = Memory::default();
        mem.write_array(0xFFFE, &[0x12, 0x34, 0x56]);
        assert_eq!(mem.data[0xFFFE], 0x12);
        assert_eq!(mem.data[0xFFFF], 0x34);
        assert_eq!(mem.data[0x0000], 0x56);
        assert_eq!(mem.read_array::<3>(0xFFFE), [0x12, 0x34, 0x56]);

        Ok(())
    }

    #[test]
    fn test_apply_image_in_order() -> Result<()> {
        let first = ImageRow {
            base: 0x0010,
            bytes: [0xAA; ROW_SIZE],
        };
        let mut second = ImageRow {
            base: 0x0018,
            bytes: [0; ROW_SIZE],
        };
        second.bytes[0] = 0x01;

        let mem = Memory::with_image(&[first, second]);
        assert_eq!(mem.read_byte(0x0010), 0xAA);
        assert_eq!(mem.read_byte(0x0017), 0xAA);
        assert_eq!(mem.read_byte(0x0018), 0x01);
        assert_eq!(mem.read_byte(0x0019), 0x00);
        assert_eq!(mem.read_byte(0x0027), 0x00);

        Ok(())
    }

    #[test]
    fn test_head() -> Result<()> {
        let mut mem = Memory::default();
        mem.write_byte(0x7F, 0x42);
        let head = mem.head(128);
        assert_eq!(head.len(), 128);
        assert_eq!(head[0x7F], 0x42);

        Ok(())
    }
}
