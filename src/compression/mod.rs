//! The compression module drives the two passes of huff compression and the single pass of
//! decompression.
//!
//! Compression happens in the following steps:
//! - Frequency count: read the whole input once and count each byte value.
//! - Tree build: turn the counts (plus one PSEUDO_EOF) into a Huffman tree.
//! - Code table: derive the bit code of every symbol from the tree.
//! - Output: write the magic number, the tree header, every input byte's code (second pass over
//!   the rewound input), and finally the PSEUDO_EOF code.
//!
//! Decompression checks the magic number, rebuilds the tree from the header and walks it bit by
//! bit until the PSEUDO_EOF leaf is reached.
//!
//! The compressed format is:
//!
//! | Field      | Width    | Content                                      |
//! |------------|----------|----------------------------------------------|
//! | Magic      | 32 bits  | `HUFF_TREE`                                  |
//! | Header     | variable | pre-order tree: internal=0, leaf=1 + 9 bits  |
//! | Payload    | variable | one code per input byte                      |
//! | Terminator | variable | the PSEUDO_EOF code, once                    |
//!

pub mod compress;
pub mod decompress;

use std::fs::{File, OpenOptions};
use std::io::{self, Cursor};

use crate::error::{HuffError, Result};

pub const BITS_PER_INT: u8 = 32;
pub const HUFF_NUMBER: u32 = 0xface8200;
/// Magic number of files carrying a tree-topology header.
pub const HUFF_TREE: u32 = HUFF_NUMBER | 1;
/// Magic number reserved for a byte-count header. Recognised, but not supported.
pub const HUFF_COUNTS: u32 = HUFF_NUMBER | 2;

/// File name extension for compressed files.
pub const EXTENSION: &str = ".hf";

/// Compress a byte slice held in memory.
pub fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len() / 2 + 16);
    compress::compress(&mut Cursor::new(data), &mut out)?;
    Ok(out)
}

/// Decompress a byte slice held in memory.
pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len() * 2);
    decompress::decompress(data, &mut out)?;
    Ok(out)
}

/// Open an output file. Unless forced, refuse to replace a file that already exists.
pub(crate) fn create_output(path: &str, force: bool) -> io::Result<File> {
    if force {
        File::create(path)
    } else {
        OpenOptions::new().write(true).create_new(true).open(path)
    }
}

/// Summary error for a run over several files, after each failure has been logged.
pub(crate) fn failures(failed: usize, total: usize) -> Result<()> {
    if failed == 0 {
        Ok(())
    } else {
        Err(HuffError::Io(io::Error::new(
            io::ErrorKind::Other,
            format!("{} of {} files failed", failed, total),
        )))
    }
}

/// A fresh, empty directory for tests that work on real files.
#[cfg(test)]
pub(crate) fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("huff-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[cfg(test)]
mod test {
    use super::*;

    fn pack(data: &[u8]) -> Vec<u8> {
        compress_bytes(data).unwrap()
    }

    /// Small xorshift generator so test data is repeatable without extra crates.
    fn noise(len: usize, seed: u32) -> Vec<u8> {
        let mut state = seed | 1;
        (0..len)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state >> 24) as u8
            })
            .collect()
    }

    #[test]
    fn scenario_a_test() {
        let data = [65_u8, 65, 65, 66];
        let packed = pack(&data);
        // magic, 32 bit header, payload 1 1 1 00 then EOF 01, one bit of padding
        assert_eq!(
            packed,
            vec![0xfa, 0xce, 0x82, 0x01, 0x24, 0x2c, 0x02, 0x41, 0xe2]
        );
        assert_eq!(decompress_bytes(&packed).unwrap(), data);
    }

    #[test]
    fn scenario_b_empty_test() {
        let packed = pack(&[]);
        // magic then a single EOF leaf: 1 + 100000000, no payload bits at all
        assert_eq!(packed, vec![0xfa, 0xce, 0x82, 0x01, 0xc0, 0x00]);
        assert!(decompress_bytes(&packed).unwrap().is_empty());
    }

    #[test]
    fn single_symbol_test() {
        let data = vec![b'z'; 1000];
        let packed = pack(&data);
        assert!(packed.len() < 200);
        assert_eq!(decompress_bytes(&packed).unwrap(), data);
    }

    #[test]
    fn text_round_trip_test() {
        let data = "It was the best of times, it was the worst of times, it was the age of \
                    wisdom, it was the age of foolishness."
            .repeat(50);
        let packed = pack(data.as_bytes());
        assert!(packed.len() < data.len());
        assert_eq!(decompress_bytes(&packed).unwrap(), data.as_bytes());
    }

    #[test]
    fn all_bytes_round_trip_test() {
        let data: Vec<u8> = (0..=255_u8).collect();
        assert_eq!(decompress_bytes(&pack(&data)).unwrap(), data);
    }

    #[test]
    fn noise_round_trip_test() {
        for (len, seed) in [(1, 3), (2, 5), (17, 7), (4_096, 11), (150_000, 13)] {
            let data = noise(len, seed);
            assert_eq!(decompress_bytes(&pack(&data)).unwrap(), data);
        }
    }

    #[test]
    fn skewed_round_trip_test() {
        // Fibonacci-like counts make the deepest trees a byte alphabet allows in a small input.
        let mut data = vec![];
        let (mut a, mut b) = (1_usize, 1_usize);
        for sym in 0_u8..20 {
            data.extend(std::iter::repeat(sym).take(a));
            let next = a + b;
            a = b;
            b = next;
        }
        assert_eq!(decompress_bytes(&pack(&data)).unwrap(), data);
    }

    #[test]
    fn bad_magic_test() {
        let mut packed = pack(b"hello huffman");
        packed[0] ^= 0x80;
        assert!(matches!(
            decompress_bytes(&packed),
            Err(HuffError::InvalidFormat(_))
        ));
    }

    #[test]
    fn short_magic_test() {
        assert!(matches!(
            decompress_bytes(&[0xfa, 0xce]),
            Err(HuffError::InvalidFormat(_))
        ));
        assert!(matches!(
            decompress_bytes(&[]),
            Err(HuffError::InvalidFormat(_))
        ));
    }

    #[test]
    fn count_header_rejected_test() {
        let mut packed = pack(b"hello huffman");
        packed[3] = 0x02;
        assert!(matches!(
            decompress_bytes(&packed),
            Err(HuffError::InvalidFormat(_))
        ));
    }

    #[test]
    fn truncated_payload_test() {
        // Scenario A without its last byte: the header is intact, the payload is gone.
        let packed = pack(&[65, 65, 65, 66]);
        assert!(matches!(
            decompress_bytes(&packed[..8]),
            Err(HuffError::TruncatedInput)
        ));

        let data = noise(10_000, 17);
        let packed = pack(&data);
        assert!(matches!(
            decompress_bytes(&packed[..packed.len() / 2]),
            Err(HuffError::TruncatedInput)
        ));
    }

    #[test]
    fn truncated_header_test() {
        let packed = pack(&[65, 65, 65, 66]);
        assert!(matches!(
            decompress_bytes(&packed[..6]),
            Err(HuffError::InvalidFormat(_))
        ));
    }

    #[test]
    fn failures_test() {
        assert!(failures(0, 3).is_ok());
        let err = failures(1, 2).unwrap_err();
        assert_eq!(err.to_string(), "IO error: 1 of 2 files failed");
    }

    #[test]
    fn create_output_test() {
        let dir = scratch_dir("create-output");
        let path = dir.join("out.hf");
        let name = path.to_string_lossy();
        std::fs::write(&path, b"first").unwrap();

        let err = create_output(&name, false).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(std::fs::read(&path).unwrap(), b"first");

        drop(create_output(&name, true).unwrap());
        assert!(std::fs::read(&path).unwrap().is_empty());
    }
}
