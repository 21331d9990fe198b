//! Codec configuration.

use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;
use crate::files::open_input;

/// Settings for file-level compression, loadable from a JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CodecConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Extension given to compressed artifacts
    #[serde(default = "default_compressed_extension")]
    pub compressed_extension: String,

    /// Prefix prepended to the file name of reconstructed output
    #[serde(default = "default_decompressed_prefix")]
    pub decompressed_prefix: String,

    /// Decode in memory and compare before writing an artifact
    #[serde(default = "default_verify_roundtrip")]
    pub verify_roundtrip: bool,

    /// Buffer size for file readers and writers (bytes)
    #[serde(default = "default_io_buffer_size")]
    pub io_buffer_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            compressed_extension: default_compressed_extension(),
            decompressed_prefix: default_decompressed_prefix(),
            verify_roundtrip: default_verify_roundtrip(),
            io_buffer_size: default_io_buffer_size(),
        }
    }
}

/// Where the artifact and the reconstructed file go for one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub compressed: PathBuf,
    pub decompressed: PathBuf,
}

impl CodecConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let reader = BufReader::new(open_input(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Derives sibling paths for `input`: `war.txt` becomes `war.txt.huff`
    /// and `decompressedwar.txt` with the default settings.
    pub fn output_paths(&self, input: &Path) -> OutputPaths {
        let file_name = input
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());

        let compressed =
            input.with_file_name(format!("{}.{}", file_name, self.compressed_extension));
        let decompressed = self.decompressed_path_for(&compressed);
        OutputPaths {
            compressed,
            decompressed,
        }
    }

    /// Reconstructed path for an artifact: the artifact extension is dropped
    /// and the prefix added, so `war.txt.huff` becomes `decompressedwar.txt`.
    pub fn decompressed_path_for(&self, artifact: &Path) -> PathBuf {
        let stem = artifact
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        artifact.with_file_name(format!("{}{}", self.decompressed_prefix, stem))
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_compressed_extension() -> String {
    "huff".to_string()
}

fn default_decompressed_prefix() -> String {
    "decompressed".to_string()
}

fn default_verify_roundtrip() -> bool {
    true
}

fn default_io_buffer_size() -> usize {
    64 * 1024 // 64KB
}
