use crate::memory::Word;

/// Mask selecting the byte within a block
pub const OFFSET_MASK: Word = 0x7;
/// Mask selecting the cache line (after shifting)
pub const INDEX_MASK: Word = 0x7;
/// Mask selecting the tag (after shifting)
pub const TAG_MASK: Word = 0x3FF;
/// Mask clearing the offset bits
pub const BLOCK_MASK: Word = 0xFFF8;

pub const INDEX_SHIFT: u32 = 3;
pub const TAG_SHIFT: u32 = 6;

/// A 16-bit address split into the fields the cache works with.
///
/// ```text
///  15            6 5   3 2    0
/// +---------------+-----+------+
/// |      tag      |index|offset|
/// +---------------+-----+------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    /// The address as it was given
    pub raw: Word,
    /// Byte within the block (3 bits)
    pub offset: u8,
    /// Cache line the block maps to (3 bits)
    pub index: u8,
    /// Identifies the block within its line (10 bits)
    pub tag: Word,
    /// First address of the 8-byte block
    pub block_base: Word,
}

impl Address {
    /// Splits `raw` into offset, index, tag and block base
    pub const fn decompose(raw: Word) -> Self {
        Self {
            raw,
            offset: (raw & OFFSET_MASK) as u8,
            index: ((raw >> INDEX_SHIFT) & INDEX_MASK) as u8,
            tag: (raw >> TAG_SHIFT) & TAG_MASK,
            block_base: raw & BLOCK_MASK,
        }
    }

    /// Rebuilds the block base a line holding `tag` at `index` came from
    pub const fn block_base_of(tag: Word, index: u8) -> Word {
        (tag << TAG_SHIFT) | ((index as Word) << INDEX_SHIFT)
    }
}

impl From<Word> for Address {
    fn from(raw: Word) -> Self {
        Self::decompose(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_eyre::eyre::Result;

    #[test]
    fn test_decompose() -> Result<()> {
        let address = Address::decompose(0xABCD);
        assert_eq!(address.offset, 0x5);
        assert_eq!(address.index, 0x1);
        assert_eq!(address.tag, 0x2AF);
        assert_eq!(address.block_base, 0xABC8);

        Ok(())
    }

    #[test]
    fn test_decompose_is_lossless() -> Result<()> {
        for raw in 0..=Word::MAX {
            let address = Address::from(raw);
            assert_eq!(
                Address::block_base_of(address.tag, address.index),
                raw & BLOCK_MASK
            );
            assert_eq!(address.block_base + address.offset as Word, raw);
            assert!(address.tag <= TAG_MASK);
            assert!(address.index < 8 && address.offset < 8);
        }

        Ok(())
    }

    #[test]
    fn test_same_index_different_tag() -> Result<()> {
        let a = Address::decompose(0x0000);
        let b = Address::decompose(0x0040);
        assert_eq!(a.index, b.index);
        assert_ne!(a.tag, b.tag);

        Ok(())
    }
}
