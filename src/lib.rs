//! # huffpack
//!
//! Byte-oriented Huffman compression into a small self-describing container.
//!
//! A container is a two-byte header (3 bits of padding count, 13 bits of tree
//! length), the tree in escaped preorder form, and the bit-packed payload.
//!
//! ## Quick Start
//!
//! ```no_run
//! // Compress a file
//! let summary = huffpack::compress("input.txt", "input.huff")?;
//! println!("{}", summary);
//!
//! // Decompress it again
//! huffpack::decompress("input.huff", "restored.txt")?;
//! # Ok::<(), huffpack::HuffmanError>(())
//! ```
//!
//! In memory:
//!
//! ```
//! let packed = huffpack::compress_bytes(b"abracadabra")?;
//! assert_eq!(huffpack::decompress_bytes(&packed)?, b"abracadabra");
//! # Ok::<(), huffpack::HuffmanError>(())
//! ```

pub mod bit_io;
pub mod bit_vec;
pub mod code_table;
pub mod error;
pub mod frequency;
pub mod huffman_codec;
pub mod hufftree;
pub mod metadata;
pub mod naming;
pub mod priority_list;

// Re-export main types for convenience
pub use bit_vec::BitVec;
pub use code_table::{Code, CodeTable};
pub use error::{HuffmanError, Result};
pub use frequency::FrequencyTable;
pub use huffman_codec::{
    compress, compress_bytes, compress_with, decompress, decompress_bytes, decompress_with,
    CodecConfig, DecodeSummary, EncodeSummary, HuffmanCodec,
};
pub use hufftree::{HuffNode, HuffmanTree};
pub use metadata::Header;
pub use naming::huff_file_name;
