//Enable more cargo lint tests
#![warn(rust_2018_idioms)]
#![warn(clippy::disallowed_types)]

use huff::compression::{compress::compress_files, decompress::decompress_files};
use huff::tools::cli::{huffopts_init, Mode};

use log::{error, info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() {
    // Available log levels are Error, Warn, Info, Debug, Trace. The cli lowers this ceiling.
    // Log to stderr so -c output on stdout is never mixed with messages.
    if TermLogger::init(
        LevelFilter::Trace,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .is_err()
    {
        eprintln!("huff: logger already initialized");
    }

    let options = huffopts_init();

    //----- Figure how what we need to do and go do it
    let result = match options.op_mode {
        Mode::Zip => compress_files(&options),
        Mode::Unzip | Mode::Test => decompress_files(&options),
    };

    match result {
        Ok(()) => info!("Done."),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
