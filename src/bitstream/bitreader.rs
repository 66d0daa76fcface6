//! BitReader: the input half of the huff I/O subsystem.
//!
//! Reads a packed, most-significant-bit-first bitstream from any source that supports read().
//! End of data is reported as `None` rather than as an error, so callers can decide whether
//! running out of bits is normal (end of the input file) or a failure (truncated payload).
//!

use std::io::{self, ErrorKind, Read};

const BUFFER_SIZE: usize = 64 * 1024;

/// Reads bits from a byte-oriented source.
#[derive(Debug)]
pub struct BitReader<R> {
    buffer: Vec<u8>,
    cursor: usize,
    bit_index: usize,
    source: R,
}

impl<R: Read> BitReader<R> {
    /// Creates a new BitReader (with a 64k buffer).
    pub fn new(source: R) -> Self {
        Self {
            buffer: Vec::with_capacity(BUFFER_SIZE),
            cursor: 0,
            bit_index: 0,
            source,
        }
    }

    /// Check (and refill) buffer. Returns true if we have data, false if there is no more
    fn have_data(&mut self) -> io::Result<bool> {
        // Only try to read more data when the whole buffer has been consumed
        if self.cursor < self.buffer.len() {
            return Ok(true);
        }
        self.buffer.resize(BUFFER_SIZE, 0);
        let size = loop {
            match self.source.read(&mut self.buffer) {
                Ok(size) => break size,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.buffer.clear();
                    return Err(e);
                }
            }
        };
        // Adjust the buffer if we read less than the buffer size
        self.buffer.truncate(size);
        self.cursor = 0;
        self.bit_index = 0;
        Ok(size > 0)
    }

    /// Return the next bit (1 or 0), or None if there is no more data to read
    pub fn bit(&mut self) -> io::Result<Option<u32>> {
        if self.bit_index == 0 && !self.have_data()? {
            return Ok(None);
        }
        let bit = (self.buffer[self.cursor] >> (7 - self.bit_index)) & 1;
        self.bit_index += 1;
        if self.bit_index == 8 {
            self.bit_index = 0;
            self.cursor += 1;
        }
        Ok(Some(bit as u32))
    }

    /// Return the next n bits (n <= 32) as an unsigned value, or None if the source runs
    /// out before all n bits could be read.
    pub fn bint(&mut self, n: usize) -> io::Result<Option<u32>> {
        debug_assert!(n <= 32, "bint reads at most 32 bits");
        let mut result = 0_u32;
        let mut needed = n;

        // Take as many bits as possible from each byte rather than looping bit by bit.
        while needed > 0 {
            if self.bit_index == 0 && !self.have_data()? {
                return Ok(None);
            }
            let available = 8 - self.bit_index;
            let take = needed.min(available);
            let byte = self.buffer[self.cursor] as u32;
            let bits = (byte >> (available - take)) & ((1 << take) - 1);
            result = (result << take) | bits;

            self.bit_index += take;
            needed -= take;
            if self.bit_index == 8 {
                self.bit_index = 0;
                self.cursor += 1;
            }
        }
        Ok(Some(result))
    }

    /// Returns a byte, or None if there is no more data to read. This is
    /// a convenience function, and calls bint(8).
    pub fn byte(&mut self) -> io::Result<Option<u8>> {
        Ok(self.bint(8)?.map(|byte| byte as u8))
    }

    /// Debugging function. Report current position in the buffer.
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.cursor, self.bit_index)
    }
}
