use std::fs::{self, File};
use std::io::{self, Read, Write};

use log::{debug, error, info};

use super::{create_output, failures, BITS_PER_INT, EXTENSION, HUFF_COUNTS, HUFF_TREE};
use crate::bitstream::{bitreader::BitReader, bitwriter::BitWriter};
use crate::error::{HuffError, Result};
use crate::huffman_coding::header::read_header;
use crate::huffman_coding::tree::{Node, NodeData, PSEUDO_EOF};
use crate::tools::cli::{HuffOpts, Mode, Output};

/// Decompress input to output. Returns the number of bytes written.
pub fn decompress<R: Read, W: Write>(input: R, output: W) -> Result<u64> {
    let mut br = BitReader::new(input);

    // Look for a valid signature.
    match br.bint(BITS_PER_INT as usize)? {
        Some(HUFF_TREE) => debug!("Found a valid tree header signature."),
        Some(HUFF_COUNTS) => {
            return Err(HuffError::format("count headers are not supported"));
        }
        Some(id) => {
            return Err(HuffError::format(format!("bad magic number {:#010x}", id)));
        }
        None => {
            return Err(HuffError::format("input is shorter than the magic number"));
        }
    }

    let root = read_header(&mut br)?;
    let mut bw = BitWriter::new(output);
    let written = read_compressed_bits(&root, &mut br, &mut bw)?;
    bw.flush()?;
    Ok(written)
}

/// Walk the tree one bit at a time from the root, writing a byte at each leaf, until the
/// PSEUDO_EOF leaf is reached.
fn read_compressed_bits<R: Read, W: Write>(
    root: &Node,
    br: &mut BitReader<R>,
    bw: &mut BitWriter<W>,
) -> Result<u64> {
    // A lone root leaf has the empty code. read_header guarantees it is PSEUDO_EOF.
    if root.is_leaf() {
        return Ok(0);
    }

    let mut current = root;
    let mut written = 0_u64;
    loop {
        let tree_bit = br.bit()?.ok_or(HuffError::TruncatedInput)?;

        if let NodeData::Kids(left, right) = &current.node_data {
            current = if tree_bit == 0 { &**left } else { &**right };
        }

        if let NodeData::Leaf(sym) = current.node_data {
            if sym == PSEUDO_EOF {
                break;
            }
            bw.out8(sym as u8)?;
            written += 1;
            current = root;
        }
    }
    Ok(written)
}

/// Output name for a compressed file: strip the extension, or add .out if there isn't one.
fn output_name(fname: &str) -> String {
    match fname.strip_suffix(EXTENSION) {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => format!("{}.out", fname),
    }
}

/// Decompress (or test) every file named in opts, or stdin when there are none.
pub fn decompress_files(opts: &HuffOpts) -> Result<()> {
    if opts.files.is_empty() {
        let stdin = io::stdin().lock();
        let written = if opts.op_mode == Mode::Test {
            decompress(stdin, io::sink())?
        } else {
            decompress(stdin, io::stdout().lock())?
        };
        info!("(stdin): {} bytes decoded.", written);
        return Ok(());
    }

    let mut failed = 0;
    for fname in &opts.files {
        if let Err(e) = decompress_file(opts, fname) {
            error!("Can't decompress {}: {}", fname, e);
            failed += 1;
        }
    }
    failures(failed, opts.files.len())
}

fn decompress_file(opts: &HuffOpts, fname: &str) -> Result<()> {
    let fin = File::open(fname)?;

    if opts.op_mode == Mode::Test {
        let written = decompress(fin, io::sink())?;
        info!("{}: ok ({} bytes).", fname, written);
        return Ok(());
    }

    info!("Decompressing {}", fname);
    let written = match opts.output {
        Output::Stdout => decompress(fin, io::stdout().lock())?,
        Output::File => {
            let out_name = output_name(fname);
            let f_out = create_output(&out_name, opts.force_overwrite)?;
            match decompress(fin, f_out) {
                Ok(written) => written,
                Err(e) => {
                    // Partial output is not meaningful on its own
                    let _ = fs::remove_file(&out_name);
                    return Err(e);
                }
            }
        }
    };
    info!("{}: {} bytes decoded.", fname, written);

    if opts.output == Output::File && !opts.keep_input_files {
        fs::remove_file(fname)?;
    }
    Ok(())
}
