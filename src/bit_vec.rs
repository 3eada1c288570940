use std::fmt;

/// Growable bit string, most significant bit first within each byte.
///
/// Huffman codes over a 256-symbol alphabet can be up to 255 bits deep, so
/// codes are stored here rather than in a fixed-width integer.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct BitVec {
    bits: Vec<u8>,
    bit_count: usize,
}

impl BitVec {
    pub fn new() -> Self {
        BitVec {
            bits: Vec::new(),
            bit_count: 0,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bit_count
    }

    pub fn is_empty(&self) -> bool {
        self.bit_count == 0
    }

    pub fn push_bit(&mut self, bit: bool) {
        let byte_index = self.bit_count / 8; // which byte is target?
        let bit_offset = self.bit_count % 8; // which bit position is target?

        // make a new byte if needed
        if byte_index >= self.bits.len() {
            self.bits.push(0);
        }

        if bit {
            self.bits[byte_index] |= 1 << (7 - bit_offset);
        }

        self.bit_count += 1;
    }

    /// Copy of `self` with one more bit on the end.
    pub fn with_bit(&self, bit: bool) -> Self {
        let mut extended = self.clone();
        extended.push_bit(bit);
        extended
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.bit_count {
            return None;
        }
        Some(self.bits[index / 8] & (1 << (7 - index % 8)) != 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.bit_count).map(move |i| self.bits[i / 8] & (1 << (7 - i % 8)) != 0)
    }

    /// True if `self` is a prefix of `other` (or equal to it).
    pub fn is_prefix_of(&self, other: &BitVec) -> bool {
        self.bit_count <= other.bit_count && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl fmt::Display for BitVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl From<&str> for BitVec {
    /// Parses a string of `0`/`1` characters; anything else counts as `1`.
    fn from(text: &str) -> Self {
        let mut bits = BitVec::new();
        for c in text.chars() {
            bits.push_bit(c != '0');
        }
        bits
    }
}
