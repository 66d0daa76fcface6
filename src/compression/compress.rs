use std::fs::{self, File};
use std::io::{self, Cursor, Read, Seek, Write};

use log::{debug, error, info, warn};

use super::{create_output, failures, BITS_PER_INT, EXTENSION, HUFF_TREE};
use crate::bitstream::{bitreader::BitReader, bitwriter::BitWriter};
use crate::error::Result;
use crate::huffman_coding::code_table::CodeTable;
use crate::huffman_coding::header::write_header;
use crate::huffman_coding::tree::{tree_from_counts, Node, Symbol, PSEUDO_EOF};
use crate::tools::cli::{HuffOpts, Output};
use crate::tools::freq_count::freqs;

/// What one compression run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressStats {
    /// Bytes read by the encoding pass.
    pub bytes_in: u64,
    /// Distinct symbols coded, including PSEUDO_EOF.
    pub symbols: usize,
    /// Size of the tree header.
    pub header_bits: u64,
    /// Everything written: magic, header, payload and terminator, before padding.
    pub bits_out: u64,
}

impl CompressStats {
    /// Size of the output in bytes, including padding of the last byte.
    pub fn bytes_out(&self) -> u64 {
        (self.bits_out + 7) / 8
    }
}

/// Compress input to output. The whole input is read twice from its start, once to count bytes
/// and once to encode them, so it must be seekable.
pub fn compress<R: Read + Seek, W: Write>(input: &mut R, output: W) -> Result<CompressStats> {
    input.rewind()?;
    let counts = freqs(&mut BitReader::new(&mut *input))?;
    let root = tree_from_counts(&counts);
    let codings = CodeTable::from_tree(&root);

    let mut bw = BitWriter::new(output);
    bw.put_bits(BITS_PER_INT, HUFF_TREE)?;
    write_header(&root, &mut bw)?;
    let header_bits = bw.bits_written() - BITS_PER_INT as u64;

    input.rewind()?;
    let mut br = BitReader::new(&mut *input);
    let bytes_in = write_compressed_bits(&root, &codings, &mut br, &mut bw)?;

    let stats = CompressStats {
        bytes_in,
        symbols: codings.len(),
        header_bits,
        bits_out: bw.bits_written(),
    };
    bw.flush()?;
    debug!("{:?}", stats);
    Ok(stats)
}

/// The source yielded a byte the first pass never saw.
fn source_changed(byte: u8) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("input changed between passes: byte {} has no code", byte),
    )
}

/// Write the code of every byte in the source, then the PSEUDO_EOF code. Returns the count of
/// bytes encoded.
fn write_compressed_bits<R: Read, W: Write>(
    root: &Node,
    codings: &CodeTable,
    br: &mut BitReader<R>,
    bw: &mut BitWriter<W>,
) -> Result<u64> {
    // A lone PSEUDO_EOF leaf: empty input, and an empty terminator code. Nothing to write.
    if root.is_leaf() {
        return match br.byte()? {
            Some(byte) => Err(source_changed(byte).into()),
            None => Ok(0),
        };
    }

    let mut count = 0_u64;
    while let Some(byte) = br.byte()? {
        let code = codings
            .get(byte as Symbol)
            .ok_or_else(|| source_changed(byte))?;
        bw.put_code(code)?;
        count += 1;
    }
    // Every tree has a PSEUDO_EOF leaf, so this code always exists.
    if let Some(eof) = codings.get(PSEUDO_EOF) {
        bw.put_code(eof)?;
    }
    Ok(count)
}

/// Compress every file named in opts, or stdin when there are none.
pub fn compress_files(opts: &HuffOpts) -> Result<()> {
    if opts.files.is_empty() {
        // Stdin can't be rewound, so hold it in memory for the second pass.
        let mut data = Vec::new();
        io::stdin().lock().read_to_end(&mut data)?;
        let stats = compress(&mut Cursor::new(data), io::stdout().lock())?;
        report("(stdin)", &stats);
        return Ok(());
    }

    let mut failed = 0;
    for fname in &opts.files {
        if fname.ends_with(EXTENSION) {
            warn!("{} already has {} suffix -- unchanged.", fname, EXTENSION);
            continue;
        }
        if let Err(e) = compress_file(opts, fname) {
            error!("Can't compress {}: {}", fname, e);
            failed += 1;
        }
    }
    failures(failed, opts.files.len())
}

fn compress_file(opts: &HuffOpts, fname: &str) -> Result<()> {
    let mut fin = File::open(fname)?;
    info!("Compressing {}", fname);

    let stats = match opts.output {
        Output::Stdout => compress(&mut fin, io::stdout().lock())?,
        Output::File => {
            let out_name = format!("{}{}", fname, EXTENSION);
            let f_out = create_output(&out_name, opts.force_overwrite)?;
            match compress(&mut fin, f_out) {
                Ok(stats) => stats,
                Err(e) => {
                    // Don't leave a partial output file behind
                    let _ = fs::remove_file(&out_name);
                    return Err(e);
                }
            }
        }
    };
    report(fname, &stats);

    if opts.output == Output::File && !opts.keep_input_files {
        fs::remove_file(fname)?;
    }
    Ok(())
}

fn report(fname: &str, stats: &CompressStats) {
    let ratio = if stats.bytes_in == 0 {
        0.0
    } else {
        stats.bytes_out() as f64 / stats.bytes_in as f64
    };
    info!(
        "{}: {} bytes in, {} bytes out ({:.3}), {} symbols, {} bit header.",
        fname,
        stats.bytes_in,
        stats.bytes_out(),
        ratio,
        stats.symbols,
        stats.header_bits
    );
}
