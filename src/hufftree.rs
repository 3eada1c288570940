use std::io::{self, Write};

use tracing::{debug, trace};

use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::priority_list::{PriorityList, Weighted};

/// Byte written for every internal node in the serialized tree.
pub const INTERNAL_MARKER: u8 = b'*';

/// Byte written before a leaf whose symbol collides with a control byte.
pub const ESCAPE: u8 = b'\\';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        weight: u64,
        byte: u8,
    },
    Internal {
        weight: u64,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn new(b: u8, f: u64) -> Self {
        HuffNode::Leaf { weight: f, byte: b }
    }

    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }

    /// Join two subtrees; `a` goes left.
    pub fn merge(a: Self, b: Self) -> Self {
        let weight = a.weight() + b.weight();
        HuffNode::Internal {
            weight,
            left: Box::new(a),
            right: Box::new(b),
        }
    }

    pub fn left(&self) -> Option<&HuffNode> {
        match self {
            HuffNode::Internal { left, .. } => Some(left),
            HuffNode::Leaf { .. } => None,
        }
    }

    pub fn right(&self) -> Option<&HuffNode> {
        match self {
            HuffNode::Internal { right, .. } => Some(right),
            HuffNode::Leaf { .. } => None,
        }
    }

    pub fn symbol(&self) -> Option<u8> {
        match self {
            HuffNode::Leaf { byte, .. } => Some(*byte),
            HuffNode::Internal { .. } => None,
        }
    }

    fn serialize_into<W: Write>(&self, out: &mut W) -> io::Result<usize> {
        match self {
            HuffNode::Leaf { byte, .. } => {
                if *byte == INTERNAL_MARKER || *byte == ESCAPE {
                    out.write_all(&[ESCAPE, *byte])?;
                    Ok(2)
                } else {
                    out.write_all(&[*byte])?;
                    Ok(1)
                }
            }
            HuffNode::Internal { left, right, .. } => {
                out.write_all(&[INTERNAL_MARKER])?;
                let left_len = left.serialize_into(out)?;
                let right_len = right.serialize_into(out)?;
                Ok(1 + left_len + right_len)
            }
        }
    }
}

impl Weighted for HuffNode {
    fn weight(&self) -> u64 {
        HuffNode::weight(self)
    }
}

/// A preorder token of the serialized tree.
#[derive(Debug, Clone, Copy)]
enum Token {
    Internal,
    Leaf(u8),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    pub root: HuffNode,
}

impl HuffmanTree {
    pub fn new(root: HuffNode) -> Self {
        HuffmanTree { root }
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(bytes))
    }

    /// Build the tree for `frequencies`, or `None` if every count is zero.
    ///
    /// Leaves enter the list in increasing symbol order; each round merges the
    /// two lightest nodes with the first one removed on the left.
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Option<Self> {
        let mut list = PriorityList::new();
        for (byte, count) in frequencies.present() {
            list.insert(HuffNode::new(byte, count));
        }

        while list.size() > 1 {
            let x = list.remove_min()?;
            let y = list.remove_min()?;
            list.insert(HuffNode::merge(x, y));
        }

        let tree = HuffmanTree::new(list.remove_min()?);
        debug!(
            leaves = tree.leaf_count(),
            depth = tree.depth(),
            weight = tree.root.weight(),
            "built huffman tree"
        );
        Some(tree)
    }

    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            match node {
                HuffNode::Leaf { .. } => count += 1,
                HuffNode::Internal { left, right, .. } => {
                    stack.push(left.as_ref());
                    stack.push(right.as_ref());
                }
            }
        }
        count
    }

    /// Length of the longest root-to-leaf path; a lone leaf has depth 0.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(&self.root, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            match node {
                HuffNode::Leaf { .. } => deepest = deepest.max(depth),
                HuffNode::Internal { left, right, .. } => {
                    stack.push((left.as_ref(), depth + 1));
                    stack.push((right.as_ref(), depth + 1));
                }
            }
        }
        deepest
    }

    /// Write the preorder encoding and return how many bytes it took.
    pub fn serialize_into<W: Write>(&self, out: &mut W) -> io::Result<usize> {
        self.root.serialize_into(out)
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        // writing into a Vec cannot fail
        let _ = self.serialize_into(&mut bytes);
        bytes
    }

    /// Rebuild a tree from exactly `data`.
    ///
    /// Leaves come back with weight 0. The bytes must hold one complete tree
    /// and nothing else.
    pub fn deserialize(data: &[u8]) -> Result<HuffmanTree> {
        let tokens = tokenize(data)?;

        // reversed preorder: children are on the stack when their parent shows up
        let mut stack: Vec<HuffNode> = Vec::with_capacity(tokens.len());
        for token in tokens.into_iter().rev() {
            match token {
                Token::Leaf(byte) => stack.push(HuffNode::new(byte, 0)),
                Token::Internal => {
                    let left = stack.pop();
                    let right = stack.pop();
                    match (left, right) {
                        (Some(left), Some(right)) => stack.push(HuffNode::merge(left, right)),
                        _ => {
                            return Err(HuffmanError::corrupted(
                                "internal node without two children",
                            ))
                        }
                    }
                }
            }
        }

        match (stack.pop(), stack.is_empty()) {
            (Some(root), true) => {
                let tree = HuffmanTree::new(root);
                trace!(leaves = tree.leaf_count(), bytes = data.len(), "read huffman tree");
                Ok(tree)
            }
            _ => Err(HuffmanError::corrupted("tree region does not hold exactly one tree")),
        }
    }

    pub fn print_structure(&self) -> String {
        let mut out = String::from("Huffman Tree Structure:\n");
        Self::print_node(&self.root, 0, "root", &mut out);
        out
    }

    fn print_node(node: &HuffNode, depth: usize, label: &str, out: &mut String) {
        let indent = "  ".repeat(depth);
        match node {
            HuffNode::Leaf { byte, weight } => {
                out.push_str(&format!(
                    "{}{}-> Leaf: {:?} ({}) [weight: {}]\n",
                    indent, label, *byte as char, byte, weight
                ));
            }
            HuffNode::Internal { weight, left, right } => {
                out.push_str(&format!("{}{}-> Internal [weight: {}]\n", indent, label, weight));
                Self::print_node(left, depth + 1, "L", out);
                Self::print_node(right, depth + 1, "R", out);
            }
        }
    }
}

/// Split the tree bytes into preorder tokens, checking that they describe one
/// complete tree that ends exactly at the last byte.
fn tokenize(data: &[u8]) -> Result<Vec<Token>> {
    let mut tokens = Vec::with_capacity(data.len());
    // subtrees still owed by the nodes read so far
    let mut pending = 1usize;
    let mut pos = 0;

    while pos < data.len() {
        if pending == 0 {
            return Err(HuffmanError::corrupted_at("trailing bytes after tree", pos));
        }
        pending -= 1;

        match data[pos] {
            ESCAPE => {
                let symbol = *data
                    .get(pos + 1)
                    .ok_or_else(|| HuffmanError::corrupted_at("escape byte without symbol", pos))?;
                tokens.push(Token::Leaf(symbol));
                pos += 2;
            }
            INTERNAL_MARKER => {
                tokens.push(Token::Internal);
                pending += 2;
                pos += 1;
            }
            symbol => {
                tokens.push(Token::Leaf(symbol));
                pos += 1;
            }
        }
    }

    if pending > 0 {
        return Err(HuffmanError::corrupted_at(
            format!("tree truncated, {} subtrees missing", pending),
            data.len(),
        ));
    }
    Ok(tokens)
}
