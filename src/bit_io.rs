//! Bit-level writing and reading over byte streams.
//!
//! Bits are packed most significant first. The last byte of a session is
//! padded with zero bits on the low end.

use std::io::{self, Read, Write};

use crate::bit_vec::BitVec;

/// Number of zero bits needed to round `total_bits` up to a whole byte.
pub fn padding_for(total_bits: u64) -> u8 {
    ((8 - total_bits % 8) % 8) as u8
}

/// Packs bits into bytes and hands each full byte to the sink.
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    sink: W,
    buffer: u8,
    buffered: u8,
    total_bits: u64,
    bytes_written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(sink: W) -> Self {
        BitWriter {
            sink,
            buffer: 0,
            buffered: 0,
            total_bits: 0,
            bytes_written: 0,
        }
    }

    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        self.buffer = (self.buffer << 1) | bit as u8;
        self.buffered += 1;
        self.total_bits += 1;
        if self.buffered == 8 {
            self.emit()?;
        }
        Ok(())
    }

    pub fn write_code(&mut self, code: &BitVec) -> io::Result<()> {
        for bit in code.iter() {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    fn emit(&mut self) -> io::Result<()> {
        self.sink.write_all(&[self.buffer])?;
        self.buffer = 0;
        self.buffered = 0;
        self.bytes_written += 1;
        Ok(())
    }

    /// Bits written so far, padding excluded.
    pub fn total_bits(&self) -> u64 {
        self.total_bits
    }

    /// Bytes the session occupies once finished.
    pub fn byte_len(&self) -> u64 {
        self.bytes_written + u64::from(self.buffered > 0)
    }

    pub fn padding_bits(&self) -> u8 {
        padding_for(self.total_bits)
    }

    /// Flush a partial final byte, zero-padded, and return the sink.
    pub fn finish(mut self) -> io::Result<W> {
        if self.buffered > 0 {
            self.buffer <<= 8 - self.buffered;
            self.emit()?;
        }
        Ok(self.sink)
    }
}

/// Reads bits back out of a byte stream, ignoring the padding on the last byte.
#[derive(Debug)]
pub struct BitReader<R: Read> {
    source: R,
    current: u8,
    valid_bits: u8,
    next: Option<u8>,
    primed: bool,
    padding_bits: u8,
    bits_read: u64,
}

impl<R: Read> BitReader<R> {
    /// `padding_bits` is how many low bits of the final byte are filler.
    pub fn new(source: R, padding_bits: u8) -> Self {
        BitReader {
            source,
            current: 0,
            valid_bits: 0,
            next: None,
            primed: false,
            padding_bits: padding_bits.min(7),
            bits_read: 0,
        }
    }

    /// Next data bit, or `None` once the stream is exhausted.
    pub fn read_bit(&mut self) -> io::Result<Option<bool>> {
        while self.valid_bits == 0 {
            if !self.refill()? {
                return Ok(None);
            }
        }
        let bit = self.current & 0x80 != 0;
        self.current <<= 1;
        self.valid_bits -= 1;
        self.bits_read += 1;
        Ok(Some(bit))
    }

    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }

    // one byte of lookahead tells us whether `current` is the final byte
    fn refill(&mut self) -> io::Result<bool> {
        if !self.primed {
            self.next = read_byte(&mut self.source)?;
            self.primed = true;
        }
        match self.next.take() {
            None => Ok(false),
            Some(byte) => {
                self.current = byte;
                self.next = read_byte(&mut self.source)?;
                self.valid_bits = if self.next.is_some() {
                    8
                } else {
                    8 - self.padding_bits
                };
                Ok(true)
            }
        }
    }
}

fn read_byte<R: Read>(source: &mut R) -> io::Result<Option<u8>> {
    let mut byte = [0u8; 1];
    loop {
        match source.read(&mut byte) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(byte[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_all(bits: &str) -> (Vec<u8>, u64, u8) {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_code(&BitVec::from(bits)).unwrap();
        let total = writer.total_bits();
        let padding = writer.padding_bits();
        (writer.finish().unwrap(), total, padding)
    }

    fn read_all(bytes: &[u8], padding: u8) -> String {
        let mut reader = BitReader::new(bytes, padding);
        let mut out = String::new();
        while let Some(bit) = reader.read_bit().unwrap() {
            out.push(if bit { '1' } else { '0' });
        }
        out
    }

    #[test]
    fn test_bit_writer_full_bytes() {
        let (bytes, total, padding) = write_all("1011010011001010");
        assert_eq!(bytes, vec![0b1011_0100, 0b1100_1010]);
        assert_eq!(total, 16);
        assert_eq!(padding, 0);
    }

    #[test]
    fn test_bit_writer_pads_low_bits() {
        let (bytes, total, padding) = write_all("101");
        assert_eq!(bytes, vec![0b1010_0000]);
        assert_eq!(total, 3);
        assert_eq!(padding, 5);
    }

    #[test]
    fn test_byte_len_counts_partial_byte() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_code(&BitVec::from("111111111")).unwrap();
        assert_eq!(writer.byte_len(), 2);
    }

    #[test]
    fn test_empty_session_writes_nothing() {
        let (bytes, total, padding) = write_all("");
        assert!(bytes.is_empty());
        assert_eq!(total, 0);
        assert_eq!(padding, 0);
    }

    #[test]
    fn test_bit_reader_skips_padding() {
        assert_eq!(read_all(&[0b1011_0100, 0b1110_0000], 5), "10110100111");
        assert_eq!(read_all(&[0b1111_1111], 7), "1");
        assert_eq!(read_all(&[0b1010_1010], 0), "10101010");
        assert_eq!(read_all(&[], 3), "");
    }

    #[test]
    fn test_reader_counts_bits() {
        let data = [0xff, 0x80];
        let mut reader = BitReader::new(&data[..], 7);
        while reader.read_bit().unwrap().is_some() {}
        assert_eq!(reader.bits_read(), 9);
    }

    #[test]
    fn test_padding_for() {
        assert_eq!(padding_for(0), 0);
        assert_eq!(padding_for(1), 7);
        assert_eq!(padding_for(8), 0);
        assert_eq!(padding_for(13), 3);
    }
}
