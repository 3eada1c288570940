//! The two-byte container header.
//!
//! ```text
//!  15   13 12                        0
//! +-------+---------------------------+
//! |padding|        tree length        |
//! +-------+---------------------------+
//! ```
//!
//! Stored big-endian at offset 0, followed by `tree length` bytes of
//! serialized tree and then the packed payload.

use std::io::{self, Read, Write};

use crate::error::{HuffmanError, Result};

/// Size of the header in bytes.
pub const HEADER_LEN: usize = 2;

/// Largest tree length the 13-bit field can hold.
pub const MAX_TREE_LEN: usize = 0x1FFF;

/// Largest padding count the 3-bit field can hold.
pub const MAX_PADDING_BITS: u8 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    pub padding_bits: u8,
    pub tree_len: u16,
}

impl Header {
    pub fn new(padding_bits: u8, tree_len: usize) -> Result<Self> {
        if padding_bits > MAX_PADDING_BITS {
            return Err(HuffmanError::corrupted(format!(
                "padding of {} bits does not fit in a byte",
                padding_bits
            )));
        }
        if tree_len > MAX_TREE_LEN {
            return Err(HuffmanError::TreeTooLarge {
                len: tree_len,
                max: MAX_TREE_LEN,
            });
        }
        Ok(Header {
            padding_bits,
            tree_len: tree_len as u16,
        })
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let packed = (u16::from(self.padding_bits) << 13) | (self.tree_len & MAX_TREE_LEN as u16);
        packed.to_be_bytes()
    }

    pub fn from_bytes(bytes: [u8; HEADER_LEN]) -> Self {
        let packed = u16::from_be_bytes(bytes);
        Header {
            padding_bits: (packed >> 13) as u8,
            tree_len: packed & MAX_TREE_LEN as u16,
        }
    }

    pub fn tree_len(&self) -> usize {
        self.tree_len as usize
    }
}

pub fn write_header<W: Write>(writer: &mut W, header: &Header) -> io::Result<()> {
    writer.write_all(&header.to_bytes())
}

pub fn read_header<R: Read>(reader: &mut R) -> Result<Header> {
    let mut bytes = [0u8; HEADER_LEN];
    reader.read_exact(&mut bytes).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => HuffmanError::corrupted("container shorter than its header"),
        _ => HuffmanError::Io(e),
    })?;
    Ok(Header::from_bytes(bytes))
}

/// Read the `tree_len` bytes of serialized tree that follow the header.
pub fn read_tree_bytes<R: Read>(reader: &mut R, header: &Header) -> Result<Vec<u8>> {
    let mut tree_data = vec![0u8; header.tree_len()];
    reader.read_exact(&mut tree_data).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => HuffmanError::corrupted_at(
            format!("tree region of {} bytes cut short", header.tree_len()),
            HEADER_LEN,
        ),
        _ => HuffmanError::Io(e),
    })?;
    Ok(tree_data)
}
