mod construction;
mod encoder;
mod generator;
mod stats;

use anyhow::Result;
use clap::{Parser, Subcommand};
use construction::CodeArgs;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(about = "Polar code construction and encoding tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Construct a code and print its frozen and information positions.
    Construct {
        #[command(flatten)]
        code: CodeArgs,
    },
    /// Write random information frames to a packed bit file.
    Gen {
        #[arg(long, default_value = "info.bin")]
        out: String,
        #[arg(short, long)]
        k: usize,
        #[arg(long, default_value_t = 100_000)]
        frames: usize,
        #[arg(long, default_value_t = 12345)]
        seed: u64,
    },
    /// Encode every information frame of a bit file in parallel.
    Encode {
        #[command(flatten)]
        code: CodeArgs,
        #[arg(short, long)]
        input: String,
        #[arg(short, long, default_value = "codewords.bin")]
        output: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Construct { code } => {
            construction::run_construct(&code)?;
        }
        Commands::Gen {
            out,
            k,
            frames,
            seed,
        } => {
            generator::generate_info_frames(&out, k, frames, seed)?;
        }
        Commands::Encode {
            code,
            input,
            output,
        } => {
            encoder::run_encode(&code, &input, &output)?;
        }
    }
    Ok(())
}
