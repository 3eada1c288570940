//! Byte frequency counting.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use tracing::debug;

/// Number of distinct byte values.
pub const SYMBOL_COUNT: usize = 256;

/// Default chunk size for the counting pass.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Occurrence count for every byte value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; SYMBOL_COUNT],
}

impl FrequencyTable {
    pub fn new() -> Self {
        FrequencyTable {
            counts: [0; SYMBOL_COUNT],
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut table = FrequencyTable::new();
        table.add(bytes);
        table
    }

    /// Count every byte of `reader`, `chunk_size` bytes at a time.
    pub fn from_reader<R: Read>(reader: &mut R, chunk_size: usize) -> io::Result<Self> {
        let mut table = FrequencyTable::new();
        let mut buffer = vec![0u8; chunk_size.max(1)];
        loop {
            let n = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            table.add(&buffer[..n]);
        }
        debug!(
            total = table.total(),
            distinct = table.distinct_symbols(),
            "counted byte frequencies"
        );
        Ok(table)
    }

    pub fn from_path(path: &Path) -> io::Result<Self> {
        let mut file = File::open(path)?;
        Self::from_reader(&mut file, DEFAULT_CHUNK_SIZE)
    }

    pub fn add(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.counts[byte as usize] += 1;
        }
    }

    pub fn set(&mut self, symbol: u8, count: u64) {
        self.counts[symbol as usize] = count;
    }

    pub fn count(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Number of byte values that occur at least once.
    pub fn distinct_symbols(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Total number of bytes counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// `(symbol, count)` pairs with a non-zero count, in increasing symbol order.
    pub fn present(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(symbol, &count)| (symbol as u8, count))
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_counts_aba() {
        let table = FrequencyTable::from_bytes(b"ABA");
        assert_eq!(table.count(b'A'), 2);
        assert_eq!(table.count(b'B'), 1);
        assert_eq!(table.distinct_symbols(), 2);
        assert_eq!(table.total(), 3);
        for symbol in 0..=255u8 {
            if symbol != b'A' && symbol != b'B' {
                assert_eq!(table.count(symbol), 0);
            }
        }
    }

    #[test]
    fn test_reader_accumulates_across_chunks() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 7) as u8).collect();
        let mut cursor = Cursor::new(&data);
        let table = FrequencyTable::from_reader(&mut cursor, 3).unwrap();
        assert_eq!(table, FrequencyTable::from_bytes(&data));
        assert_eq!(table.total(), 10_000);
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        let mut cursor = Cursor::new(Vec::<u8>::new());
        let table = FrequencyTable::from_reader(&mut cursor, DEFAULT_CHUNK_SIZE).unwrap();
        assert_eq!(table, FrequencyTable::new());
        assert_eq!(table.present().count(), 0);
    }

    #[test]
    fn test_missing_file_is_error() {
        let result = FrequencyTable::from_path(Path::new("definitely/not/here.bin"));
        assert!(result.is_err());
    }
}
