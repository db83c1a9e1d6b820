//! A Huffman code table kept in a piece trie of bits
use piece_trie::{PieceKey, Trie};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

/// A code word of `len` bits, most significant bit first.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Code {
    bits: u64,
    len: u32,
}

impl Code {
    fn with(mut self, bit: bool) -> Code {
        push_bit(&mut self, &bit);
        self
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for bit in self.pieces() {
            write!(f, "{}", u8::from(bit))?;
        }
        Ok(())
    }
}

/// Shifts one bit into the code under construction.
fn push_bit(code: &mut Code, bit: &bool) {
    code.bits = (code.bits << 1) | u64::from(*bit);
    code.len += 1;
}

struct Bits {
    code: Code,
    next: u32,
}

impl Iterator for Bits {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        if self.next == self.code.len {
            return None;
        }
        let shift = self.code.len - 1 - self.next;
        self.next += 1;
        Some((self.code.bits >> shift) & 1 == 1)
    }
}

impl PieceKey for Code {
    type Piece = bool;
    type Pieces<'a> = Bits;

    fn pieces(&self) -> Bits {
        Bits {
            code: *self,
            next: 0,
        }
    }
}

enum Tree {
    Leaf(char),
    Branch(Box<Tree>, Box<Tree>),
}

/// Builds the Huffman tree of `text` and assigns a code to every symbol.
fn code_table(text: &str) -> BTreeMap<char, Code> {
    let mut frequencies = BTreeMap::new();
    for symbol in text.chars() {
        *frequencies.entry(symbol).or_insert(0usize) += 1;
    }

    // the sequence number keeps ties deterministic
    let mut heap = BinaryHeap::new();
    let mut forest = Vec::new();
    for (seq, (&symbol, &weight)) in frequencies.iter().enumerate() {
        heap.push(Reverse((weight, seq)));
        forest.push(Some(Tree::Leaf(symbol)));
    }
    while heap.len() > 1 {
        let (Some(Reverse((w0, a))), Some(Reverse((w1, b)))) = (heap.pop(), heap.pop()) else {
            break;
        };
        let (Some(left), Some(right)) = (forest[a].take(), forest[b].take()) else {
            break;
        };
        heap.push(Reverse((w0 + w1, forest.len())));
        forest.push(Some(Tree::Branch(Box::new(left), Box::new(right))));
    }

    let mut table = BTreeMap::new();
    let root = heap
        .pop()
        .and_then(|Reverse((_, index))| forest[index].take());
    let mut pending: Vec<(Tree, Code)> = root.map(|tree| (tree, Code::default())).into_iter().collect();
    while let Some((tree, code)) = pending.pop() {
        match tree {
            // a lone symbol still needs one bit
            Tree::Leaf(symbol) if code.len == 0 => {
                table.insert(symbol, code.with(false));
            }
            Tree::Leaf(symbol) => {
                table.insert(symbol, code);
            }
            Tree::Branch(left, right) => {
                pending.push((*left, code.with(false)));
                pending.push((*right, code.with(true)));
            }
        }
    }
    table
}

fn main() {
    let text = "abracadabra alakazam";
    let table = code_table(text);

    // the decoding side only needs the trie
    let mut decoder = Trie::<Code, char, _>::new(push_bit);
    for (&symbol, code) in &table {
        let (_, inserted) = decoder.emplace(code, symbol);
        assert!(inserted, "codes must be unique");
    }

    println!("Code table, in code order:");
    for (code, symbol) in &decoder {
        println!("  {:>8} -> {:?}", code.to_string(), symbol);
    }

    let encoded: Vec<bool> = text
        .chars()
        .filter_map(|symbol| table.get(&symbol))
        .flat_map(|code| code.pieces())
        .collect();

    let mut decoded = String::new();
    let mut current = Code::default();
    for bit in encoded.iter().copied() {
        push_bit(&mut current, &bit);
        if let Some(&symbol) = decoder.get(&current) {
            decoded.push(symbol);
            current = Code::default();
        }
    }

    println!(
        "\n{} bits instead of {}: {:?}",
        encoded.len(),
        text.len() * 8,
        decoded
    );
    assert_eq!(decoded, text);
}
