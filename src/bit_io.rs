//! Bit-level reader and writer over byte-oriented I/O.
//!
//! Bits are packed most-significant-bit first on both sides: the first bit
//! written lands in bit 7 of the first byte.

use std::io::{self, ErrorKind, Read, Write};

use tracing::warn;

use crate::code_table::Code;
use crate::error::{HuffmanError, Result};

/// Accumulates bits and writes whole bytes to the sink.
///
/// A partial final byte is padded with zero bits by [`BitWriter::finish`].
/// A writer dropped without `finish` pads and flushes on a best-effort basis.
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    sink: W,
    current: u8,
    filled: u8, // 0-7
    bits_written: u64,
    finished: bool,
}

impl<W: Write> BitWriter<W> {
    pub fn new(sink: W) -> Self {
        BitWriter {
            sink,
            current: 0,
            filled: 0,
            bits_written: 0,
            finished: false,
        }
    }

    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        if self.finished {
            return Err(io::Error::other("bit writer already finished").into());
        }

        if bit {
            self.current |= 1 << (7 - self.filled);
        }
        self.filled += 1;
        self.bits_written += 1;

        if self.filled == 8 {
            self.emit_byte()?;
        }
        Ok(())
    }

    pub fn write_code(&mut self, code: &Code) -> Result<()> {
        for bit in code.iter() {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    /// Number of meaningful bits written so far, padding excluded.
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Pads the last partial byte with zeros, writes it and flushes the sink.
    ///
    /// Returns the meaningful bit count. Calling it again is a no-op.
    pub fn finish(&mut self) -> Result<u64> {
        if !self.finished {
            self.pad_and_flush()?;
            self.finished = true;
        }
        Ok(self.bits_written)
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    fn emit_byte(&mut self) -> io::Result<()> {
        self.sink.write_all(&[self.current])?;
        self.current = 0;
        self.filled = 0;
        Ok(())
    }

    fn pad_and_flush(&mut self) -> io::Result<()> {
        if self.filled > 0 {
            self.emit_byte()?;
        }
        self.sink.flush()
    }
}

impl<W: Write> Drop for BitWriter<W> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(e) = self.pad_and_flush() {
            warn!(
                bits_written = self.bits_written,
                "failed to flush bit writer on drop: {}", e
            );
        }
    }
}

/// Reads bits back in the order they were written.
///
/// With a bit limit the reader stops at the logical end of the data, so
/// padding in the final byte is never handed out as real bits.
#[derive(Debug)]
pub struct BitReader<R: Read> {
    source: R,
    current: u8,
    available: u8, // bits left in `current`
    bits_read: u64,
    bit_limit: Option<u64>,
}

impl<R: Read> BitReader<R> {
    pub fn new(source: R) -> Self {
        BitReader {
            source,
            current: 0,
            available: 0,
            bits_read: 0,
            bit_limit: None,
        }
    }

    pub fn with_bit_limit(source: R, bit_limit: u64) -> Self {
        BitReader {
            bit_limit: Some(bit_limit),
            ..BitReader::new(source)
        }
    }

    /// Whether one more bit can be read without fabricating data.
    pub fn has_next(&mut self) -> Result<bool> {
        if let Some(limit) = self.bit_limit {
            if self.bits_read >= limit {
                return Ok(false);
            }
        }
        if self.available > 0 {
            return Ok(true);
        }
        self.fill()
    }

    pub fn read_bit(&mut self) -> Result<bool> {
        if !self.has_next()? {
            return Err(HuffmanError::EndOfStream {
                bits_read: self.bits_read,
            });
        }
        self.available -= 1;
        self.bits_read += 1;
        Ok((self.current >> self.available) & 1 == 1)
    }

    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }

    fn fill(&mut self) -> Result<bool> {
        let mut byte = [0u8; 1];
        loop {
            match self.source.read(&mut byte) {
                Ok(0) => return Ok(false),
                Ok(_) => {
                    self.current = byte[0];
                    self.available = 8;
                    return Ok(true);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}
