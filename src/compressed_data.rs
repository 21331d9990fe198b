use std::io::{self, Read, Write};

use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::metadata::ArtifactHeader;

/// A complete compressed artifact: header plus bit-packed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedData {
    pub header: ArtifactHeader,
    pub compressed_bits: Vec<u8>,
}

impl CompressedData {
    pub fn original_length(&self) -> u64 {
        self.header.original_length
    }

    pub fn bit_count(&self) -> u64 {
        self.header.bit_count
    }

    pub fn frequencies(&self) -> &FrequencyTable {
        &self.header.frequencies
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.header.write_to(writer)?;
        writer.write_all(&self.compressed_bits)
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = self.header.to_bytes();
        bytes.extend_from_slice(&self.compressed_bits);
        bytes
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let header = ArtifactHeader::read_from(reader)?;

        let mut compressed_bits = Vec::new();
        reader
            .by_ref()
            .take(header.payload_len())
            .read_to_end(&mut compressed_bits)?;
        if (compressed_bits.len() as u64) < header.payload_len() {
            return Err(HuffmanError::corrupt(format!(
                "payload truncated: {} of {} bytes",
                compressed_bits.len(),
                header.payload_len()
            )));
        }

        Ok(CompressedData {
            header,
            compressed_bits,
        })
    }

    /// Parses an artifact that must span the whole slice.
    pub fn deserialize(mut bytes: &[u8]) -> Result<Self> {
        let data = CompressedData::read_from(&mut bytes)?;
        if !bytes.is_empty() {
            return Err(HuffmanError::corrupt(format!(
                "{} trailing bytes after payload",
                bytes.len()
            )));
        }
        Ok(data)
    }
}

impl TryFrom<&[u8]> for CompressedData {
    type Error = HuffmanError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        CompressedData::deserialize(bytes)
    }
}
