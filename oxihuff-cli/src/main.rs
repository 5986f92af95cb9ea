//! OxiHuff CLI - Huffman compression from the command line
//!
//! Compresses files into self-describing OXHF frames and back.

mod commands;
mod utils;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use commands::{CompressOptions, cmd_compress, cmd_decompress, cmd_info, cmd_test};
use oxihuff_codec::MAX_CODE_LENGTH;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "oxihuff")]
#[command(author, version, about = "Pure Rust Huffman compressor")]
#[command(long_about = "
OxiHuff compresses files with a byte-oriented Huffman code whose dictionary is
stored in the output. Incompressible input is stored verbatim.

Examples:
  oxihuff compress notes.txt
  oxihuff compress --max-code-length 12 *.log -o packed/
  oxihuff decompress notes.txt.ohf
  oxihuff test notes.txt.ohf
  oxihuff info --dictionary notes.txt.ohf
  oxihuff completions bash > oxihuff.bash
")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress files into .ohf frames
    #[command(alias = "c")]
    Compress {
        /// Files to compress
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output file (one input) or directory (several inputs)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Store without Huffman coding
        #[arg(long)]
        store: bool,

        /// Longest allowed codeword, in bits
        #[arg(short = 'l', long, default_value_t = MAX_CODE_LENGTH,
              value_parser = clap::value_parser!(u8).range(1..=i64::from(MAX_CODE_LENGTH)))]
        max_code_length: u8,

        /// Code 16-bit symbols instead of bytes (input length must be even)
        #[arg(short, long)]
        wide: bool,

        /// Copy the modification time of each input to its output
        #[arg(long)]
        keep_mtime: bool,
    },

    /// Decompress .ohf frames
    #[command(alias = "x")]
    Decompress {
        /// Files to decompress
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output file (one input) or directory (several inputs)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Copy the modification time of each input to its output
        #[arg(long)]
        keep_mtime: bool,
    },

    /// Check that frames decompress cleanly
    #[command(alias = "t")]
    Test {
        /// Files to test
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Show information about a frame
    #[command(alias = "i")]
    Info {
        /// Frame to inspect
        file: PathBuf,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,

        /// Print the dictionary groups
        #[arg(short, long)]
        dictionary: bool,

        /// Print every codeword path
        #[arg(short, long)]
        tree: bool,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Install the log subscriber. `RUST_LOG` wins unless `-v` was given.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    };
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Compress {
            files,
            output,
            store,
            max_code_length,
            wide,
            keep_mtime,
        } => cmd_compress(
            &files,
            output.as_deref(),
            &CompressOptions {
                store,
                max_code_length,
                wide,
                keep_mtime,
            },
        ),
        Commands::Decompress {
            files,
            output,
            keep_mtime,
        } => cmd_decompress(&files, output.as_deref(), keep_mtime),
        Commands::Test { files } => cmd_test(&files),
        Commands::Info {
            file,
            json,
            dictionary,
            tree,
        } => cmd_info(&file, json, dictionary, tree),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "oxihuff", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
