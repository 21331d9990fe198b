//! Header of the compressed artifact.
//!
//! Everything a decoder needs besides the payload itself: the symbol count,
//! the exact number of meaningful bits and the frequency table the tree is
//! rebuilt from. All integers are little-endian.
//!
//! ```text
//! magic "HUFF" | version u8 | original_length u64 | bit_count u64
//! | table_len u64 | table | payload_len u64 | payload
//! ```

use std::io::{self, ErrorKind, Read, Write};

use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;

pub const MAGIC: [u8; 4] = *b"HUFF";
pub const FORMAT_VERSION: u8 = 1;

/// Largest serialized frequency table: count plus 256 `(symbol, u64)` pairs.
const MAX_TABLE_LEN: u64 = 4 + 256 * 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactHeader {
    pub original_length: u64,
    pub bit_count: u64,
    pub frequencies: FrequencyTable,
}

impl ArtifactHeader {
    /// Payload bytes implied by `bit_count`, the last one zero-padded.
    pub fn payload_len(&self) -> u64 {
        self.bit_count.div_ceil(8)
    }

    /// Writes the header up to and including `payload_len`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.to_bytes())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let table = self.frequencies.serialize();
        let mut bytes = Vec::with_capacity(4 + 1 + 8 * 4 + table.len());
        bytes.extend_from_slice(&MAGIC);
        bytes.push(FORMAT_VERSION);
        bytes.extend_from_slice(&self.original_length.to_le_bytes());
        bytes.extend_from_slice(&self.bit_count.to_le_bytes());
        bytes.extend_from_slice(&(table.len() as u64).to_le_bytes());
        bytes.extend_from_slice(&table);
        bytes.extend_from_slice(&self.payload_len().to_le_bytes());
        bytes
    }

    /// Reads and validates a header, leaving the reader at the payload.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut magic = [0u8; 4];
        read_field(reader, &mut magic, "magic")?;
        if magic != MAGIC {
            return Err(HuffmanError::invalid_header(format!(
                "bad magic {:02x?}",
                magic
            )));
        }

        let mut version = [0u8; 1];
        read_field(reader, &mut version, "version")?;
        if version[0] != FORMAT_VERSION {
            return Err(HuffmanError::invalid_header(format!(
                "unsupported format version {}",
                version[0]
            )));
        }

        let original_length = read_u64(reader, "original length")?;
        let bit_count = read_u64(reader, "bit count")?;

        let table_len = read_u64(reader, "table length")?;
        if table_len > MAX_TABLE_LEN {
            return Err(HuffmanError::invalid_header(format!(
                "frequency table of {} bytes exceeds {}",
                table_len, MAX_TABLE_LEN
            )));
        }
        let mut table = vec![0u8; table_len as usize];
        read_field(reader, &mut table, "frequency table")?;
        let frequencies = FrequencyTable::deserialize(&table)?;
        if frequencies.is_empty() {
            return Err(HuffmanError::invalid_header("empty frequency table"));
        }
        if original_length == 0 {
            return Err(HuffmanError::invalid_header("artifact holds no symbols"));
        }

        let header = ArtifactHeader {
            original_length,
            bit_count,
            frequencies,
        };

        let payload_len = read_u64(reader, "payload length")?;
        if payload_len != header.payload_len() {
            return Err(HuffmanError::corrupt(format!(
                "payload is {} bytes but {} bits need {}",
                payload_len,
                bit_count,
                header.payload_len()
            )));
        }
        // every symbol costs at least one bit
        if original_length > bit_count {
            return Err(HuffmanError::corrupt(format!(
                "{} symbols cannot fit in {} bits",
                original_length, bit_count
            )));
        }

        Ok(header)
    }
}

fn read_u64<R: Read>(reader: &mut R, field: &str) -> Result<u64> {
    let mut bytes = [0u8; 8];
    read_field(reader, &mut bytes, field)?;
    Ok(u64::from_le_bytes(bytes))
}

fn read_field<R: Read>(reader: &mut R, buf: &mut [u8], field: &str) -> Result<()> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => {
            HuffmanError::invalid_header(format!("header truncated in {}", field))
        }
        _ => e.into(),
    })
}
