use std::io::{self, Read};

use crate::bitstream::bitreader::BitReader;
use crate::huffman_coding::tree::ALPH_SIZE;

/// Returns a frequency count of every byte value in the source, reading until it is exhausted.
/// The source must be rewound before it can be read again.
pub fn freqs<R: Read>(br: &mut BitReader<R>) -> io::Result<[u64; ALPH_SIZE]> {
    let mut freqs = [0_u64; ALPH_SIZE];
    while let Some(byte) = br.byte()? {
        freqs[byte as usize] += 1;
    }
    Ok(freqs)
}
