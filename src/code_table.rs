//! Symbol-to-path codes derived from a [`HuffmanTree`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::{HuffmanError, Result};
use crate::frequency::{FrequencyTable, Symbol};
use crate::hufftree::{HuffNode, HuffmanTree};

/// Code given to the only symbol of a single-leaf tree, whose natural path
/// is empty.
pub const SINGLE_SYMBOL_CODE: bool = true;

/// A root-to-leaf path: `false` is a left edge (0), `true` a right edge (1).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    pub fn as_bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(&self.bits)
    }
}

impl From<Vec<bool>> for Code {
    fn from(bits: Vec<bool>) -> Self {
        Code { bits }
    }
}

impl FromStr for Code {
    type Err = HuffmanError;

    fn from_str(s: &str) -> Result<Self> {
        s.chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(HuffmanError::corrupt(format!(
                    "invalid code character {:?}",
                    other
                ))),
            })
            .collect::<Result<Vec<bool>>>()
            .map(Code::from)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// One code per distinct symbol, iterated in ascending symbol order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<Symbol, Code>,
}

impl CodeTable {
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = BTreeMap::new();
        let mut path = Vec::new();
        collect_codes(tree.root(), &mut path, &mut codes);

        if codes.len() == 1 {
            for code in codes.values_mut() {
                if code.is_empty() {
                    *code = Code::from(vec![SINGLE_SYMBOL_CODE]);
                }
            }
        }

        let table = CodeTable { codes };
        debug!(
            symbols = table.len(),
            max_code_len = table.max_code_len(),
            "derived code table"
        );
        table
    }

    pub fn get(&self, symbol: Symbol) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Code)> + '_ {
        self.codes.iter().map(|(&symbol, code)| (symbol, code))
    }

    pub fn max_code_len(&self) -> usize {
        self.codes.values().map(Code::len).max().unwrap_or(0)
    }

    /// True when no code is a prefix of another code.
    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<&Code> = self.codes.values().collect();
        codes.iter().enumerate().all(|(i, a)| {
            codes
                .iter()
                .skip(i + 1)
                .all(|b| !a.is_prefix_of(b) && !b.is_prefix_of(a))
        })
    }

    /// Bits needed to encode an input with these counts: the sum over
    /// symbols of count times code length. Fails with `WeightOverflow` when
    /// that sum does not fit in a `u64`.
    pub fn encoded_bit_length(&self, frequencies: &FrequencyTable) -> Result<u64> {
        frequencies.iter().try_fold(0u64, |total, entry| {
            let code = self
                .get(entry.symbol)
                .ok_or(HuffmanError::UnknownSymbol {
                    symbol: entry.symbol,
                })?;
            entry
                .count
                .checked_mul(code.len() as u64)
                .and_then(|bits| total.checked_add(bits))
                .ok_or_else(|| {
                    HuffmanError::weight_overflow(format!(
                        "encoded length passes u64::MAX at symbol 0x{:02x}",
                        entry.symbol
                    ))
                })
        })
    }
}

fn collect_codes(node: &HuffNode, path: &mut Vec<bool>, codes: &mut BTreeMap<Symbol, Code>) {
    match node {
        HuffNode::Leaf { symbol, .. } => {
            codes.insert(*symbol, Code::from(path.clone()));
        }
        HuffNode::Internal { left, right, .. } => {
            path.push(false);
            collect_codes(left, path, codes);
            path.pop();

            path.push(true);
            collect_codes(right, path, codes);
            path.pop();
        }
    }
}
