//! # huffpack
//!
//! Huffman coding of byte streams into a self-describing, bit-packed
//! artifact.
//!
//! ## Quick Start
//!
//! ```rust
//! let original = b"abracadabra";
//!
//! let artifact = huffpack::compress(original)?;
//! let restored = huffpack::decompress(&artifact)?;
//!
//! assert_eq!(restored, original);
//! # Ok::<(), huffpack::HuffmanError>(())
//! ```
//!
//! The pieces can also be driven by hand:
//!
//! ```rust
//! use huffpack::{BitReader, HuffmanCodec};
//!
//! let codec = HuffmanCodec::from_bytes(b"abracadabra")?;
//! let code = codec.code_table().get(b'a').unwrap();
//! assert_eq!(code.to_string(), "0");
//!
//! let mut packed = Vec::new();
//! let bits = codec.encode_to(b"abracadabra", &mut packed)?;
//! let decoded = codec.decode_from(BitReader::with_bit_limit(&packed[..], bits))?;
//! assert_eq!(decoded, b"abracadabra");
//! # Ok::<(), huffpack::HuffmanError>(())
//! ```

pub mod bit_io;
pub mod code_table;
pub mod compressed_data;
pub mod config;
pub mod error;
pub mod files;
pub mod frequency;
pub mod huffman_codec;
pub mod hufftree;
pub mod metadata;

// Internal modules - not part of public API
mod min_heap;

// Re-export main types for convenience
pub use bit_io::{BitReader, BitWriter};
pub use code_table::{Code, CodeTable};
pub use compressed_data::CompressedData;
pub use config::{CodecConfig, OutputPaths};
pub use error::{HuffmanError, Result};
pub use files::{compress_file, decompress_file, CompressionStats};
pub use frequency::{FrequencyEntry, FrequencyTable, Symbol};
pub use huffman_codec::{Decoder, HuffmanCodec};
pub use hufftree::{HuffNode, HuffmanTree};

/// Compresses `data` into a serialized artifact. Empty input fails with
/// [`HuffmanError::EmptyInput`].
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    Ok(HuffmanCodec::from_bytes(data)?.compress(data)?.serialize())
}

/// Reconstructs the original bytes from a serialized artifact.
pub fn decompress(artifact: &[u8]) -> Result<Vec<u8>> {
    HuffmanCodec::decompress(&CompressedData::deserialize(artifact)?)
}
