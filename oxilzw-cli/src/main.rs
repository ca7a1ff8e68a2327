//! OxiLZW CLI - adaptive LZW streams from the command line
//!
//! Encodes and decodes self-describing LZW streams with optional escape
//! learning and windowed dictionary pruning.

mod commands;
mod utils;

use clap::{Parser, Subcommand};
use commands::{EncodeOptions, cmd_decode, cmd_encode, cmd_info, cmd_test};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "oxilzw")]
#[command(
    author,
    version,
    about = "Adaptive LZW compressor with windowed dictionary pruning"
)]
#[command(long_about = "
OxiLZW compresses data with an adaptive LZW dictionary. Codes widen as the
dictionary grows; with a pruning window, strings unused for that many codes
are evicted whenever the code space fills. Escape mode learns single bytes on
first use instead of pre-seeding all 256.

Examples:
  oxilzw encode input.txt -o input.lzw
  oxilzw encode -m 16 -p 20000 -e < input.txt > input.lzw
  oxilzw decode input.lzw -o input.txt
  oxilzw info input.lzw --json
  oxilzw test input.lzw -v
")]
struct Cli {
    /// Show verbose output (also raises the log level to info)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress data into an LZW stream
    #[command(alias = "e")]
    Encode {
        /// Input file (stdin if omitted)
        input: Option<PathBuf>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum code width in bits (9-24; others fall back to 12)
        #[arg(short = 'm', long, value_parser = clap::value_parser!(u32).range(1..))]
        max_bits: Option<u32>,

        /// Pruning window in codes
        #[arg(short = 'p', long, value_parser = clap::value_parser!(i64).range(1..=oxilzw::LzwConfig::MAX_WINDOW))]
        window: Option<i64>,

        /// Learn single bytes through escapes
        #[arg(short, long)]
        escape: bool,
    },

    /// Decompress an LZW stream
    #[command(alias = "d")]
    Decode {
        /// Input file (stdin if omitted)
        input: Option<PathBuf>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the parameters and statistics of a stream
    #[command(alias = "i")]
    Info {
        /// Stream file
        file: PathBuf,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },

    /// Check that a stream decodes cleanly
    #[command(alias = "t")]
    Test {
        /// Stream file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    utils::init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Encode {
            input,
            output,
            max_bits,
            window,
            escape,
        } => cmd_encode(
            input.as_deref(),
            output.as_deref(),
            &EncodeOptions {
                max_bits,
                window,
                escape,
                verbose: cli.verbose,
            },
        ),
        Commands::Decode { input, output } => {
            cmd_decode(input.as_deref(), output.as_deref(), cli.verbose)
        }
        Commands::Info { file, json } => cmd_info(&file, json),
        Commands::Test { file } => cmd_test(&file, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
