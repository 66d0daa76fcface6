use std::io::{self, Write};

use crate::huffman_coding::code_table::Code;

/// Size at which the output buffer is handed to the underlying writer.
const BUFFER_SIZE: usize = 64 * 1024;

/// Writes a most-significant-bit-first bitstream for output. Bits are collected in a queue, packed
/// into bytes in an output buffer, and the buffer is written to the underlying stream as it fills.
pub struct BitWriter<W: Write> {
    /// Output buffer used to write the bitstream.
    output: Vec<u8>,
    /// Private queue to hold bits that are waiting to be put as bytes into the output buffer.
    queue: u64,
    /// Count of valid bits in the queue.
    q_bits: u8,
    /// Handle to the output stream
    writer: W,
    /// Total number of bits put on the stream, not counting flush padding.
    bits_written: u64,
}

impl<W: Write> BitWriter<W> {
    /// Create a new BitWriter around the output stream. Call flush() when done or the last
    /// partial byte will never be written.
    pub fn new(writer: W) -> Self {
        Self {
            output: Vec::with_capacity(BUFFER_SIZE),
            queue: 0,
            q_bits: 0,
            writer,
            bits_written: 0,
        }
    }

    /// Move all full bytes from the queue to the output buffer, writing the buffer out when full.
    fn push_queue(&mut self) -> io::Result<()> {
        while self.q_bits > 7 {
            let byte = (self.queue >> (self.q_bits - 8)) as u8;
            self.output.push(byte); //push the packed byte out
            self.q_bits -= 8; //adjust the count of bits left in the queue
        }
        if self.output.len() >= BUFFER_SIZE {
            self.writer.write_all(&self.output)?;
            self.output.clear();
        }
        Ok(())
    }

    /// Write the low n bits (n <= 32) of value, most significant first.
    pub fn put_bits(&mut self, n: u8, value: u32) -> io::Result<()> {
        debug_assert!(n <= 32, "put_bits writes at most 32 bits");
        if n == 0 {
            return Ok(());
        }
        let mask = u64::MAX >> (64 - n);
        self.queue = (self.queue << n) | (value as u64 & mask);
        self.q_bits += n;
        self.bits_written += n as u64;
        self.push_queue()
    }

    /// Put a single bit on the stream.
    pub fn put_bit(&mut self, bit: bool) -> io::Result<()> {
        self.put_bits(1, bit as u32)
    }

    /// Put a byte on the stream.
    pub fn out8(&mut self, data: u8) -> io::Result<()> {
        self.put_bits(8, data as u32)
    }

    /// Put a huffman code on the stream, exactly code.len bits. Empty codes write nothing.
    pub fn put_code(&mut self, code: &Code) -> io::Result<()> {
        let mut remaining = code.len;
        while remaining > 0 {
            let chunk = remaining.min(32);
            remaining -= chunk;
            self.put_bits(chunk, (code.bits >> remaining) as u32)?;
        }
        Ok(())
    }

    /// Count of bits put on the stream so far.
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Flushes the remaining bits (1-7) from the queue, padding with 0s in the least
    /// signficant bits, and writes everything out. Flush MUST be called before the stream
    /// is dropped or data may be left in the internal queue.
    pub fn flush(&mut self) -> io::Result<()> {
        if self.q_bits > 0 {
            let pad = 8 - self.q_bits;
            self.queue <<= pad;
            self.q_bits += pad;
        }
        while self.q_bits > 7 {
            let byte = (self.queue >> (self.q_bits - 8)) as u8;
            self.output.push(byte);
            self.q_bits -= 8;
        }
        self.writer.write_all(&self.output)?;
        self.output.clear();
        self.writer.flush()
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.flush()?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod test {
    use super::BitWriter;
    use crate::huffman_coding::code_table::Code;

    fn written(f: impl FnOnce(&mut BitWriter<Vec<u8>>)) -> Vec<u8> {
        let mut bw = BitWriter::new(Vec::new());
        f(&mut bw);
        bw.into_inner().unwrap()
    }

    #[test]
    fn out8_test() {
        let out = written(|bw| bw.out8(b'x').unwrap());
        assert_eq!(out, "x".as_bytes());
    }

    #[test]
    fn last_bits_test() {
        let out = written(|bw| {
            for byte in [255, 1, 128, 255] {
                bw.out8(byte).unwrap();
            }
            bw.put_bits(3, 0b111).unwrap();
        });
        assert_eq!(out, vec![255, 1, 128, 255, 224]);
    }

    #[test]
    fn put_bits_masks_high_bits_test() {
        let out = written(|bw| {
            bw.put_bits(4, 0xfff5).unwrap();
            bw.put_bits(4, 0x0).unwrap();
        });
        assert_eq!(out, vec![0b0101_0000]);
    }

    #[test]
    fn put_bits_32_test() {
        let out = written(|bw| {
            bw.put_bit(true).unwrap();
            bw.put_bits(32, 0xface8201).unwrap();
        });
        assert_eq!(out, vec![0xfd, 0x67, 0x41, 0x00, 0x80]);
    }

    #[test]
    fn put_code_test() {
        // A code longer than one 32 bit chunk keeps its leading zeros.
        let code = Code {
            bits: 1,
            len: 40,
        };
        let out = written(|bw| bw.put_code(&code).unwrap());
        assert_eq!(out, vec![0, 0, 0, 0, 1]);

        let empty = Code { bits: 0, len: 0 };
        let out = written(|bw| bw.put_code(&empty).unwrap());
        assert!(out.is_empty());
    }

    #[test]
    fn bits_written_test() {
        let mut bw = BitWriter::new(Vec::new());
        bw.put_bits(9, 256).unwrap();
        bw.put_bit(false).unwrap();
        assert_eq!(bw.bits_written(), 10);
        assert_eq!(bw.into_inner().unwrap(), vec![0b1000_0000, 0b0000_0000]);
    }
}
