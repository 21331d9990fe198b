//! Symbol frequency counting and the persisted frequency table format.

use std::collections::BTreeMap;
use std::io::{self, Cursor, ErrorKind, Read, Write};

use crate::error::{HuffmanError, Result};

/// One input unit. The alphabet is the 256 byte values.
pub type Symbol = u8;

/// A symbol with its occurrence count. `count` is always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyEntry {
    pub symbol: Symbol,
    pub count: u64,
}

/// Occurrence counts per symbol, iterated in ascending symbol order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<Symbol, u64>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut table = FrequencyTable::new();
        table.update(bytes);
        table
    }

    /// Counts every byte the reader produces.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut table = FrequencyTable::new();
        let mut chunk = [0u8; 8192];
        loop {
            match reader.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => table.update(&chunk[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(table)
    }

    pub fn update(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.increment(byte);
        }
    }

    pub fn increment(&mut self, symbol: Symbol) {
        self.insert(symbol, 1);
    }

    /// Records `count` occurrences of `symbol`. A zero count is ignored and
    /// a single symbol's count saturates at `u64::MAX`.
    pub fn insert(&mut self, symbol: Symbol, count: u64) {
        if count > 0 {
            let slot = self.counts.entry(symbol).or_insert(0);
            *slot = slot.saturating_add(count);
        }
    }

    pub fn get(&self, symbol: Symbol) -> Option<u64> {
        self.counts.get(&symbol).copied()
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, i.e. the length of the counted input. Saturates;
    /// see [`FrequencyTable::checked_total`].
    pub fn total(&self) -> u64 {
        self.checked_total().unwrap_or(u64::MAX)
    }

    /// Sum of all counts, or `None` if it does not fit in a `u64`.
    pub fn checked_total(&self) -> Option<u64> {
        self.counts
            .values()
            .try_fold(0u64, |acc, &count| acc.checked_add(count))
    }

    pub fn iter(&self) -> impl Iterator<Item = FrequencyEntry> + '_ {
        self.counts
            .iter()
            .map(|(&symbol, &count)| FrequencyEntry { symbol, count })
    }

    /// Writes a `u32` entry count followed by `(u8 symbol, u64 count)` pairs,
    /// little-endian, ascending symbol order.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.serialize())
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(4 + self.counts.len() * 9);
        bytes.extend_from_slice(&(self.counts.len() as u32).to_le_bytes());
        for entry in self.iter() {
            bytes.push(entry.symbol);
            bytes.extend_from_slice(&entry.count.to_le_bytes());
        }
        bytes
    }

    pub fn deserialize(data: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(data);

        let mut count_bytes = [0u8; 4];
        read_field(&mut cursor, &mut count_bytes, "entry count")?;
        let entry_count = u32::from_le_bytes(count_bytes) as usize;
        if entry_count > 256 {
            return Err(HuffmanError::invalid_header(format!(
                "frequency table claims {} symbols",
                entry_count
            )));
        }

        let mut table = FrequencyTable::new();
        for _ in 0..entry_count {
            let mut symbol = [0u8; 1];
            read_field(&mut cursor, &mut symbol, "symbol")?;

            let mut freq_bytes = [0u8; 8];
            read_field(&mut cursor, &mut freq_bytes, "symbol count")?;
            let count = u64::from_le_bytes(freq_bytes);

            if count == 0 {
                return Err(HuffmanError::invalid_header(format!(
                    "symbol 0x{:02x} has a zero count",
                    symbol[0]
                )));
            }
            if table.counts.insert(symbol[0], count).is_some() {
                return Err(HuffmanError::invalid_header(format!(
                    "symbol 0x{:02x} listed twice",
                    symbol[0]
                )));
            }
        }

        if table.checked_total().is_none() {
            return Err(HuffmanError::invalid_header("frequency total overflows u64"));
        }

        if cursor.position() as usize != data.len() {
            return Err(HuffmanError::invalid_header(
                "trailing bytes after frequency table",
            ));
        }
        Ok(table)
    }
}

fn read_field(cursor: &mut Cursor<&[u8]>, buf: &mut [u8], field: &str) -> Result<()> {
    cursor.read_exact(buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => {
            HuffmanError::invalid_header(format!("frequency table truncated in {}", field))
        }
        _ => e.into(),
    })
}

impl FromIterator<(Symbol, u64)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (Symbol, u64)>>(iter: I) -> Self {
        let mut table = FrequencyTable::new();
        for (symbol, count) in iter {
            table.insert(symbol, count);
        }
        table
    }
}
