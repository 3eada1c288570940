//! huffpack command line
//!
//! ## Usage
//!
//! ```bash
//! # Compress, output name derived from the input (report.txt -> report.huff)
//! huffpack compress report.txt
//!
//! # Explicit output
//! huffpack compress report.txt -o /tmp/report.huff
//!
//! # Decompress
//! huffpack decompress report.huff -o report.txt
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

use huffpack::{huff_file_name, CodecConfig};

#[derive(Parser, Debug)]
#[command(name = "huffpack")]
#[command(version)]
#[command(about = "Huffman compression tool", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Read/write buffer size in bytes
    #[arg(long, global = true, default_value = "4096")]
    buffer_size: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress a file into a .huff container
    Compress {
        /// File to compress
        input: PathBuf,

        /// Output path; defaults to the input with its extension replaced by .huff
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Restore the original file from a .huff container
    Decompress {
        /// Container to read
        input: PathBuf,

        /// Where to write the restored bytes
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install logger: {}", e);
    }

    let config = CodecConfig::default().with_read_buffer_size(args.buffer_size);

    let outcome = match args.command {
        Command::Compress { input, output } => {
            let output = output
                .unwrap_or_else(|| PathBuf::from(huff_file_name(&input.to_string_lossy())));
            huffpack::compress_with(&input, &output, &config).map(|summary| {
                println!("compressed '{}' -> '{}'", input.display(), output.display());
                println!("{}", summary);
            })
        }
        Command::Decompress { input, output } => {
            huffpack::decompress_with(&input, &output, &config).map(|summary| {
                println!("decompressed '{}' -> '{}'", input.display(), output.display());
                println!("{}", summary);
            })
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(category = e.category(), "{}", e);
            eprintln!("huffpack: {}", e);
            ExitCode::FAILURE
        }
    }
}
