use crate::bit_vec::BitVec;
use crate::frequency::{FrequencyTable, SYMBOL_COUNT};
use crate::hufftree::{HuffNode, HuffmanTree};

/// The bit string assigned to one symbol.
pub type Code = BitVec;

/// Symbol to code mapping for one compression run.
#[derive(Debug, Clone)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl CodeTable {
    /// A table with no codes, used for empty input.
    pub fn empty() -> Self {
        CodeTable {
            codes: vec![None; SYMBOL_COUNT],
        }
    }

    /// Walk `tree` and record the root-to-leaf path of every leaf
    /// (left = 0, right = 1).
    ///
    /// A tree that is a single leaf gets the one-bit code `0`.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut table = CodeTable::empty();
        match &tree.root {
            HuffNode::Leaf { byte, .. } => table.codes[*byte as usize] = Some(BitVec::from("0")),
            root => table.generate(root, BitVec::new()),
        }
        table
    }

    fn generate(&mut self, node: &HuffNode, path: Code) {
        match node {
            HuffNode::Leaf { byte, .. } => {
                self.codes[*byte as usize] = Some(path);
            }
            HuffNode::Internal { left, right, .. } => {
                self.generate(left, path.with_bit(false));
                self.generate(right, path.with_bit(true));
            }
        }
    }

    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes[symbol as usize].as_ref()
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.codes.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.as_ref().map(|c| (symbol as u8, c)))
    }

    /// Payload size in bits for input with these frequencies.
    pub fn total_bits(&self, frequencies: &FrequencyTable) -> u64 {
        self.iter()
            .map(|(symbol, code)| frequencies.count(symbol) * code.len() as u64)
            .sum()
    }
}

impl Default for CodeTable {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_two_symbol_codes() {
        let mut freqs = FrequencyTable::new();
        freqs.set(b'A', 2);
        freqs.set(b'B', 3);
        let tree = HuffmanTree::from_frequencies(&freqs).unwrap();
        let table = CodeTable::from_tree(&tree);

        assert_eq!(table.get(b'A').unwrap().to_string(), "0");
        assert_eq!(table.get(b'B').unwrap().to_string(), "1");
        assert_eq!(table.len(), 2);
        assert_eq!(table.total_bits(&freqs), 5);
    }

    #[test]
    fn test_single_symbol_gets_zero() {
        let tree = HuffmanTree::from_bytes(b"AAAA").unwrap();
        let table = CodeTable::from_tree(&tree);
        assert_eq!(table.get(b'A').unwrap().to_string(), "0");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_empty_table() {
        let table = CodeTable::empty();
        assert!(table.is_empty());
        assert_eq!(table.iter().count(), 0);
    }

    #[test]
    fn test_codes_are_prefix_free() {
        let text = b"this is an example of a huffman tree, with some ** and \\\\ thrown in";
        let freqs = FrequencyTable::from_bytes(text);
        let table = CodeTable::from_tree(&HuffmanTree::from_frequencies(&freqs).unwrap());

        assert_eq!(table.len(), freqs.distinct_symbols());
        let codes: Vec<&Code> = table.iter().map(|(_, c)| c).collect();
        for (i, a) in codes.iter().enumerate() {
            assert!(!a.is_empty());
            for (j, b) in codes.iter().enumerate() {
                if i != j {
                    assert!(!a.is_prefix_of(b), "{} is a prefix of {}", a, b);
                }
            }
        }
    }

    #[test]
    fn test_skewed_frequencies_exceed_32_bits() {
        // fibonacci weights give a maximally deep tree
        let mut freqs = FrequencyTable::new();
        let (mut a, mut b) = (1u64, 1u64);
        for symbol in 0..40u8 {
            freqs.set(symbol, a);
            let next = a + b;
            a = b;
            b = next;
        }
        let table = CodeTable::from_tree(&HuffmanTree::from_frequencies(&freqs).unwrap());
        let longest = table.iter().map(|(_, c)| c.len()).max().unwrap();
        assert_eq!(longest, 39);
    }
}
