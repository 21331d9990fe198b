use std::io::{BufWriter, ErrorKind, Read, Write};

use tracing::debug;

use crate::bit_io::{BitReader, BitWriter};
use crate::code_table::CodeTable;
use crate::compressed_data::CompressedData;
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::hufftree::{HuffNode, HuffmanTree};
use crate::metadata::ArtifactHeader;

/// Encoder and decoder sharing one tree and the code table derived from it.
#[derive(Debug, Clone)]
pub struct HuffmanCodec {
    tree: HuffmanTree,
    encode_table: CodeTable,
}

impl HuffmanCodec {
    pub fn new(tree: HuffmanTree) -> Self {
        let encode_table = CodeTable::from_tree(&tree);
        HuffmanCodec { tree, encode_table }
    }

    pub fn from_frequencies(frequencies: &FrequencyTable) -> Result<Self> {
        Ok(Self::new(HuffmanTree::from_frequencies(frequencies)?))
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Ok(Self::new(HuffmanTree::from_bytes(data)?))
    }

    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    pub fn code_table(&self) -> &CodeTable {
        &self.encode_table
    }

    /// Writes the code of every symbol, in input order, without finishing
    /// the writer.
    pub fn encode_bits<W: Write>(&self, data: &[u8], writer: &mut BitWriter<W>) -> Result<()> {
        for &symbol in data {
            let code = self
                .encode_table
                .get(symbol)
                .ok_or(HuffmanError::UnknownSymbol { symbol })?;
            writer.write_code(code)?;
        }
        Ok(())
    }

    /// Encodes `data` into `sink`, padding and flushing the final byte.
    ///
    /// Returns the number of meaningful bits written.
    pub fn encode_to<W: Write>(&self, data: &[u8], sink: W) -> Result<u64> {
        let mut writer = BitWriter::new(sink);
        self.encode_bits(data, &mut writer)?;
        writer.finish()
    }

    /// Lazily decodes symbols until the reader runs out of bits.
    pub fn decoder<R: Read>(&self, reader: BitReader<R>) -> Decoder<'_, R> {
        Decoder {
            tree: &self.tree,
            reader,
            remaining: None,
            failed: false,
        }
    }

    pub fn decode_from<R: Read>(&self, reader: BitReader<R>) -> Result<Vec<u8>> {
        self.decoder(reader).collect()
    }

    /// Encodes `data` into a self-describing artifact. Empty input fails
    /// with `EmptyInput` even when the codec has codes.
    pub fn compress(&self, data: &[u8]) -> Result<CompressedData> {
        if data.is_empty() {
            return Err(HuffmanError::EmptyInput);
        }
        let mut compressed_bits = Vec::new();
        let bit_count = self.encode_to(data, &mut compressed_bits)?;

        debug!(
            original_length = data.len(),
            bit_count,
            payload_bytes = compressed_bits.len(),
            "encoded payload"
        );

        Ok(CompressedData {
            header: ArtifactHeader {
                original_length: data.len() as u64,
                bit_count,
                frequencies: self.tree.frequencies(),
            },
            compressed_bits,
        })
    }

    /// Rebuilds the tree from the artifact's own frequency table and decodes
    /// the payload.
    pub fn decompress(compressed: &CompressedData) -> Result<Vec<u8>> {
        let codec = HuffmanCodec::from_frequencies(compressed.frequencies())?;
        let mut result = Vec::with_capacity(compressed.original_length().min(1 << 24) as usize);
        codec.decode_payload(&compressed.header, &compressed.compressed_bits[..], &mut result)?;
        Ok(result)
    }

    /// Decodes an artifact from `reader` straight into `writer` without
    /// holding the payload in memory. Returns the number of bytes written.
    ///
    /// The artifact must end the stream: trailing bytes are `CorruptStream`,
    /// as with [`CompressedData::deserialize`].
    pub fn decompress_stream<R: Read, W: Write>(mut reader: R, writer: W) -> Result<u64> {
        let header = ArtifactHeader::read_from(&mut reader)?;
        let codec = HuffmanCodec::from_frequencies(&header.frequencies)?;

        let mut sink = BufWriter::new(writer);
        let written = codec.decode_payload(
            &header,
            reader.by_ref().take(header.payload_len()),
            &mut sink,
        )?;

        let mut trailing = 0u64;
        let mut chunk = [0u8; 512];
        loop {
            match reader.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => trailing += n as u64,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        if trailing > 0 {
            return Err(HuffmanError::corrupt(format!(
                "{} trailing bytes after payload",
                trailing
            )));
        }

        sink.flush()?;
        Ok(written)
    }

    fn decode_payload<R: Read, W: Write>(
        &self,
        header: &ArtifactHeader,
        payload: R,
        mut sink: W,
    ) -> Result<u64> {
        if header.original_length == 0 {
            return Err(HuffmanError::invalid_header("artifact holds no symbols"));
        }
        let reader = BitReader::with_bit_limit(payload, header.bit_count);
        let mut decoder = self
            .decoder(reader)
            .with_symbol_limit(header.original_length);

        let mut written = 0u64;
        for symbol in &mut decoder {
            sink.write_all(&[symbol?])?;
            written += 1;
        }

        if written != header.original_length {
            return Err(HuffmanError::corrupt(format!(
                "expected {} symbols, decoded {}",
                header.original_length, written
            )));
        }
        if decoder.has_remaining_bits()? {
            return Err(HuffmanError::corrupt(format!(
                "unread bits after symbol {} (bit {} of {})",
                written,
                decoder.bits_read(),
                header.bit_count
            )));
        }

        debug!(symbols = written, bits = decoder.bits_read(), "decoded payload");
        Ok(written)
    }
}

/// Iterator over decoded symbols.
///
/// Stops when the reader has no more bits or the symbol limit is reached.
/// After the first error it yields nothing further.
#[derive(Debug)]
pub struct Decoder<'a, R: Read> {
    tree: &'a HuffmanTree,
    reader: BitReader<R>,
    remaining: Option<u64>,
    failed: bool,
}

impl<'a, R: Read> Decoder<'a, R> {
    /// Stops after `limit` symbols even if bits remain.
    pub fn with_symbol_limit(mut self, limit: u64) -> Self {
        self.remaining = Some(limit);
        self
    }

    pub fn bits_read(&self) -> u64 {
        self.reader.bits_read()
    }

    pub fn has_remaining_bits(&mut self) -> Result<bool> {
        self.reader.has_next()
    }

    fn decode_symbol(&mut self) -> Result<Option<u8>> {
        if !self.reader.has_next()? {
            return Ok(None);
        }

        let mut node = self.tree.root();
        if let HuffNode::Leaf { symbol, .. } = node {
            // single-symbol tree: one bit per occurrence, value ignored
            self.reader.read_bit()?;
            return Ok(Some(*symbol));
        }

        loop {
            match node {
                HuffNode::Leaf { symbol, .. } => return Ok(Some(*symbol)),
                HuffNode::Internal { left, right, .. } => {
                    if !self.reader.has_next()? {
                        return Err(HuffmanError::corrupt(format!(
                            "ran out of bits mid-code after {} bits",
                            self.reader.bits_read()
                        )));
                    }
                    node = if self.reader.read_bit()? { right } else { left };
                }
            }
        }
    }
}

impl<'a, R: Read> Iterator for Decoder<'a, R> {
    type Item = Result<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.remaining == Some(0) {
            return None;
        }
        match self.decode_symbol() {
            Ok(Some(symbol)) => {
                if let Some(remaining) = self.remaining.as_mut() {
                    *remaining -= 1;
                }
                Some(Ok(symbol))
            }
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
