use std::fmt;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::bit_io::{BitReader, BitWriter};
use crate::code_table::CodeTable;
use crate::error::{HuffmanError, Result};
use crate::frequency::{FrequencyTable, DEFAULT_CHUNK_SIZE};
use crate::hufftree::{HuffNode, HuffmanTree};
use crate::metadata::{read_header, read_tree_bytes, write_header, Header, HEADER_LEN};

/// Tuning knobs for a codec run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Chunk size for the counting pass and the buffered file handles.
    pub read_buffer_size: usize,
}

impl CodecConfig {
    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size.max(1);
        self
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            read_buffer_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// What a compression run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeSummary {
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub tree_len: usize,
    pub payload_bits: u64,
    pub padding_bits: u8,
}

impl EncodeSummary {
    /// Output size over input size; 0 for empty input.
    pub fn ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            return 0.0;
        }
        self.output_bytes as f64 / self.input_bytes as f64
    }
}

impl fmt::Display for EncodeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} bytes -> {} bytes ({:.1}%), tree {} bytes, {} payload bits",
            self.input_bytes,
            self.output_bytes,
            self.ratio() * 100.0,
            self.tree_len,
            self.payload_bits
        )
    }
}

/// What a decompression run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeSummary {
    pub input_bytes: u64,
    pub output_bytes: u64,
}

impl fmt::Display for DecodeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bytes -> {} bytes", self.input_bytes, self.output_bytes)
    }
}

/// A tree and its code table, ready to write containers.
pub struct HuffmanCodec {
    tree: Option<HuffmanTree>,
    code_table: CodeTable,
    config: CodecConfig,
}

impl HuffmanCodec {
    /// `None` is the codec for empty input.
    pub fn new(tree: Option<HuffmanTree>) -> Self {
        let code_table = tree.as_ref().map(CodeTable::from_tree).unwrap_or_default();
        HuffmanCodec {
            tree,
            code_table,
            config: CodecConfig::default(),
        }
    }

    pub fn with_config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }

    pub fn from_frequencies(frequencies: &FrequencyTable) -> Self {
        Self::new(HuffmanTree::from_frequencies(frequencies))
    }

    /// Codec for the byte frequencies of the file at `path`.
    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(Self::from_frequencies(&FrequencyTable::from_path(path)?))
    }

    pub fn tree(&self) -> Option<&HuffmanTree> {
        self.tree.as_ref()
    }

    pub fn code_table(&self) -> &CodeTable {
        &self.code_table
    }

    /// Write a complete container for `input` at the current position of
    /// `output`.
    ///
    /// `input` must only hold bytes this codec has codes for. The header is
    /// written as a placeholder first and patched once the payload is done.
    pub fn write_container<R: Read, W: Write + Seek>(
        &self,
        input: R,
        mut output: W,
    ) -> Result<EncodeSummary> {
        let start = output.stream_position()?;
        write_header(&mut output, &Header::default())?;

        let tree_len = match &self.tree {
            Some(tree) => tree.serialize_into(&mut output)?,
            None => 0,
        };

        let mut input_bytes = 0u64;
        let input = BufReader::with_capacity(self.config.read_buffer_size, input);
        let mut bits = BitWriter::new(&mut output);
        for byte in input.bytes() {
            let byte = byte?;
            let code = self
                .code_table
                .get(byte)
                .ok_or(HuffmanError::MissingSymbol { symbol: byte })?;
            bits.write_code(code)?;
            input_bytes += 1;
        }

        let payload_bits = bits.total_bits();
        let padding_bits = bits.padding_bits();
        let payload_bytes = bits.byte_len();
        bits.finish()?;

        let header = Header::new(padding_bits, tree_len)?;
        debug!(padding_bits, tree_len, payload_bits, "patching container header");

        let end = start + (HEADER_LEN + tree_len) as u64 + payload_bytes;
        output.seek(SeekFrom::Start(start))?;
        write_header(&mut output, &header)?;
        output.seek(SeekFrom::Start(end))?;
        output.flush()?;

        Ok(EncodeSummary {
            input_bytes,
            output_bytes: end - start,
            tree_len,
            payload_bits,
            padding_bits,
        })
    }

    /// Count `input`, rewind it, and write its container to `output`.
    pub fn encode_stream<R: Read + Seek, W: Write + Seek>(
        mut input: R,
        output: W,
        config: &CodecConfig,
    ) -> Result<EncodeSummary> {
        let start = input.stream_position()?;
        let frequencies = FrequencyTable::from_reader(&mut input, config.read_buffer_size)?;
        input.seek(SeekFrom::Start(start))?;

        let codec = Self::from_frequencies(&frequencies).with_config(*config);
        codec.write_container(input, output)
    }

    /// Decode a whole container from `input` into `output`.
    pub fn decode_stream<R: Read, W: Write>(
        input: R,
        output: W,
        config: &CodecConfig,
    ) -> Result<DecodeSummary> {
        let mut input = BufReader::with_capacity(config.read_buffer_size, input);
        let (header, tree) = read_preamble(&mut input)?;
        let mut output = BufWriter::with_capacity(config.read_buffer_size, output);
        let summary = decode_payload(&header, tree.as_ref(), &mut input, &mut output)?;
        output.flush()?;
        Ok(summary)
    }
}

/// Read the header and the tree. `None` means the container holds empty input.
fn read_preamble<R: BufRead>(input: &mut R) -> Result<(Header, Option<HuffmanTree>)> {
    let header = read_header(input)?;
    debug!(
        padding_bits = header.padding_bits,
        tree_len = header.tree_len(),
        "read container header"
    );

    if header.tree_len() == 0 {
        if header.padding_bits != 0 || !input.fill_buf()?.is_empty() {
            return Err(HuffmanError::corrupted_at(
                "payload present without a tree",
                HEADER_LEN,
            ));
        }
        return Ok((header, None));
    }

    let tree_bytes = read_tree_bytes(input, &header)?;
    let tree = HuffmanTree::deserialize(&tree_bytes)?;
    Ok((header, Some(tree)))
}

/// Walk the tree one payload bit at a time, writing a symbol at every leaf.
fn decode_payload<R: Read, W: Write>(
    header: &Header,
    tree: Option<&HuffmanTree>,
    input: R,
    output: &mut W,
) -> Result<DecodeSummary> {
    let preamble_bytes = (HEADER_LEN + header.tree_len()) as u64;
    let root = match tree {
        Some(tree) => &tree.root,
        None => {
            return Ok(DecodeSummary {
                input_bytes: preamble_bytes,
                output_bytes: 0,
            })
        }
    };

    let mut reader = BitReader::new(input, header.padding_bits);
    let mut node = root;
    let mut dangling_bits = 0usize;
    let mut output_bytes = 0u64;

    while let Some(bit) = reader.read_bit()? {
        node = match node {
            // a lone leaf root spends one bit per symbol
            HuffNode::Leaf { .. } => node,
            HuffNode::Internal { left, right, .. } => {
                if bit {
                    right.as_ref()
                } else {
                    left.as_ref()
                }
            }
        };

        if let HuffNode::Leaf { byte, .. } = node {
            output.write_all(&[*byte])?;
            output_bytes += 1;
            node = root;
            dangling_bits = 0;
        } else {
            dangling_bits += 1;
        }
    }

    if dangling_bits > 0 {
        return Err(HuffmanError::TruncatedPayload { dangling_bits });
    }

    let payload_bits = reader.bits_read();
    if payload_bits == 0 && header.padding_bits != 0 {
        return Err(HuffmanError::corrupted("padding declared for an empty payload"));
    }

    Ok(DecodeSummary {
        input_bytes: preamble_bytes + (payload_bits + u64::from(header.padding_bits)) / 8,
        output_bytes,
    })
}

/// Compress the file at `input` into a new container at `output`.
pub fn compress(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<EncodeSummary> {
    compress_with(input, output, &CodecConfig::default())
}

pub fn compress_with(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &CodecConfig,
) -> Result<EncodeSummary> {
    let (input, output) = (input.as_ref(), output.as_ref());

    // open the source first so a missing input never creates the target
    let source = File::open(input)?;
    ensure_distinct(input, output)?;

    let summary = write_staged(output, config, |writer| {
        HuffmanCodec::encode_stream(source, writer, config)
    })?;

    info!(
        input = %input.display(),
        output = %output.display(),
        input_bytes = summary.input_bytes,
        output_bytes = summary.output_bytes,
        "compressed"
    );
    Ok(summary)
}

/// Restore the original bytes of the container at `input` into `output`.
pub fn decompress(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<DecodeSummary> {
    decompress_with(input, output, &CodecConfig::default())
}

pub fn decompress_with(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &CodecConfig,
) -> Result<DecodeSummary> {
    let (input, output) = (input.as_ref(), output.as_ref());

    let mut source = BufReader::with_capacity(config.read_buffer_size, File::open(input)?);
    ensure_distinct(input, output)?;
    let (header, tree) = read_preamble(&mut source)?;

    let summary = write_staged(output, config, |writer| {
        decode_payload(&header, tree.as_ref(), &mut source, writer)
    })?;

    info!(
        input = %input.display(),
        output = %output.display(),
        input_bytes = summary.input_bytes,
        output_bytes = summary.output_bytes,
        "decompressed"
    );
    Ok(summary)
}

/// Refuse to run when `output` already is the file behind `input`.
fn ensure_distinct(input: &Path, output: &Path) -> Result<()> {
    if output.exists() && fs::canonicalize(input)? == fs::canonicalize(output)? {
        return Err(HuffmanError::SameFile {
            path: output.to_path_buf(),
        });
    }
    Ok(())
}

/// Run `body` against a temporary file next to `output` and move it into
/// place only once `body` succeeds. On error the temporary file is removed.
fn write_staged<T, F>(output: &Path, config: &CodecConfig, body: F) -> Result<T>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> Result<T>,
{
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staging = NamedTempFile::new_in(dir)?;

    let mut writer = BufWriter::with_capacity(config.read_buffer_size, staging.as_file_mut());
    let value = body(&mut writer)?;
    writer.flush()?;
    drop(writer);

    staging.persist(output).map_err(|e| HuffmanError::Io(e.error))?;
    Ok(value)
}

/// In-memory version of [`compress`].
pub fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    HuffmanCodec::encode_stream(Cursor::new(data), &mut out, &CodecConfig::default())?;
    Ok(out.into_inner())
}

/// In-memory version of [`decompress`].
pub fn decompress_bytes(container: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    HuffmanCodec::decode_stream(container, &mut out, &CodecConfig::default())?;
    Ok(out)
}
