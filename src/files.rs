//! Path-based compression and decompression.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::{info, warn};

use crate::compressed_data::CompressedData;
use crate::config::CodecConfig;
use crate::error::{HuffmanError, Result};
use crate::huffman_codec::HuffmanCodec;

/// Sizes reported after compressing one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionStats {
    pub original_bytes: u64,
    pub compressed_bytes: u64,
    pub bit_count: u64,
    pub distinct_symbols: usize,
}

impl CompressionStats {
    /// Artifact size over input size.
    pub fn ratio(&self) -> f64 {
        if self.original_bytes == 0 {
            return 0.0;
        }
        self.compressed_bytes as f64 / self.original_bytes as f64
    }

    /// Average payload bits per input symbol, header excluded.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.original_bytes == 0 {
            return 0.0;
        }
        self.bit_count as f64 / self.original_bytes as f64
    }
}

/// Opens `path` for reading, reporting a missing file as `NotFound`.
pub fn open_input(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => HuffmanError::NotFound {
            path: path.to_path_buf(),
        },
        _ => e.into(),
    })
}

/// Compresses `input` into an artifact at `output`.
pub fn compress_file(
    input: &Path,
    output: &Path,
    config: &CodecConfig,
) -> Result<CompressionStats> {
    let mut data = Vec::new();
    BufReader::with_capacity(config.io_buffer_size, open_input(input)?).read_to_end(&mut data)?;

    let codec = HuffmanCodec::from_bytes(&data)?;
    let compressed = codec.compress(&data)?;

    if config.verify_roundtrip && HuffmanCodec::decompress(&compressed)? != data {
        return Err(HuffmanError::corrupt("round-trip verification failed"));
    }

    write_output(output, config, |writer| Ok(compressed.write_to(writer)?))?;

    let stats = CompressionStats {
        original_bytes: data.len() as u64,
        compressed_bytes: fs::metadata(output)?.len(),
        bit_count: compressed.bit_count(),
        distinct_symbols: compressed.frequencies().len(),
    };
    info!(
        input = %input.display(),
        output = %output.display(),
        original_bytes = stats.original_bytes,
        compressed_bytes = stats.compressed_bytes,
        "compressed file ({:.1}% of original)",
        stats.ratio() * 100.0
    );
    Ok(stats)
}

/// Decodes an artifact file into `output`. Returns the bytes written.
pub fn decompress_file(input: &Path, output: &Path, config: &CodecConfig) -> Result<u64> {
    let reader = BufReader::with_capacity(config.io_buffer_size, open_input(input)?);

    let written = write_output(output, config, |writer| {
        HuffmanCodec::decompress_stream(reader, writer)
    })?;

    info!(
        input = %input.display(),
        output = %output.display(),
        bytes = written,
        "decompressed file"
    );
    Ok(written)
}

/// Reads an artifact file fully into memory.
pub fn read_artifact(path: &Path) -> Result<CompressedData> {
    let mut reader = BufReader::new(open_input(path)?);
    CompressedData::read_from(&mut reader)
}

/// Runs `write` against a buffered file at `output`. On failure the partial
/// file is removed so no truncated output is left behind.
fn write_output<T, F>(output: &Path, config: &CodecConfig, write: F) -> Result<T>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<T>,
{
    let mut writer = BufWriter::with_capacity(config.io_buffer_size, File::create(output)?);
    let result = write(&mut writer).and_then(|value| {
        writer.flush()?;
        Ok(value)
    });

    if result.is_err() {
        drop(writer);
        if let Err(e) = fs::remove_file(output) {
            warn!(output = %output.display(), "failed to remove partial output: {}", e);
        }
    }
    result
}
