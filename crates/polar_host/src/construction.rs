//! Code construction from command-line parameters.
//!
//! Collects the construction parameters shared by the `construct` and
//! `encode` subcommands, opens the z-parameter cache and prints construction
//! reports.

use anyhow::{Context, Result};
use clap::Args;
use polar_common::channel::ChannelKind;
use polar_core::code::PolarCode;
use polar_io::cache::{ParameterCache, default_root};
use polar_io::construct::{self, ConstructionRequest, FrozenBitInfo, ModelPolicy};
use polar_io::source::BhattacharyyaBound;
use std::path::PathBuf;
use std::sync::Arc;

/// Construction parameters accepted on the command line.
#[derive(Args, Debug, Clone)]
pub struct CodeArgs {
    /// Channel model used to rank bit channels (bec or awgn).
    #[arg(long, default_value = "awgn")]
    pub channel: ChannelKind,
    /// Block length N (power of two).
    #[arg(short, long, default_value_t = 256)]
    pub n: usize,
    /// Information length K.
    #[arg(short, long, default_value_t = 128)]
    pub k: usize,
    /// Design SNR in dB.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub snr: f64,
    /// Construction resolution; non-positive selects the default.
    #[arg(long, default_value_t = 2, allow_negative_numbers = true)]
    pub resolution: i64,
    /// Serve AWGN requests with the erasure-channel approximation.
    #[arg(long)]
    pub erasure_approximation: bool,
    /// Z-parameter cache directory (defaults to the per-user cache).
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,
}

impl CodeArgs {
    pub fn request(&self) -> ConstructionRequest {
        let policy = if self.erasure_approximation {
            ModelPolicy::ErasureApproximation
        } else {
            ModelPolicy::Requested
        };
        ConstructionRequest::new(self.channel, self.n, self.k, self.snr)
            .with_resolution(self.resolution)
            .with_policy(policy)
    }

    pub fn cache(&self) -> Result<ParameterCache> {
        let root = match &self.cache_dir {
            Some(dir) => dir.clone(),
            None => default_root().context("no --cache-dir given and no HOME to derive one")?,
        };
        Ok(ParameterCache::new(root, Arc::new(BhattacharyyaBound)))
    }
}

/// Builds the frozen set and the transform core for the given parameters.
pub fn build_code(args: &CodeArgs) -> Result<(FrozenBitInfo, PolarCode)> {
    let cache = args.cache()?;
    let info = construct::build(&args.request(), &cache)?;
    let code = info.to_code()?;
    Ok((info, code))
}

pub fn run_construct(args: &CodeArgs) -> Result<()> {
    let (info, code) = build_code(args)?;

    println!("Polar Code Construction");
    println!("Channel:     {}", info.channel);
    println!("Block size:  {}", info.block_size);
    println!("Info bits:   {}", info.num_info_bits);
    println!("Frozen bits: {}", info.num_frozen_bits);
    println!("Design SNR:  {} dB", info.design_snr_db);
    println!("Resolution:  {}", info.resolution);
    println!("Rate:        {:.4}", info.num_info_bits as f64 / info.block_size as f64);
    println!("Frozen positions:");
    print_positions(&info.positions);
    println!("Info positions:");
    print_positions(code.info_bit_position());
    Ok(())
}

fn print_positions(positions: &[usize]) {
    for row in positions.chunks(16) {
        let line: Vec<String> = row.iter().map(|p| format!("{:5}", p)).collect();
        println!("{}", line.join(""));
    }
}
