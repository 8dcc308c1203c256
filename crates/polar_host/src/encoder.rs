use crate::construction::{CodeArgs, build_code};
use crate::stats::LatencyStats;
use anyhow::Result;
use polar_core::PolarError;
use polar_io::loader;
use rayon::prelude::*;
use std::time::Instant;
use tracing::info;

pub fn run_encode(args: &CodeArgs, input: &str, output: &str) -> Result<()> {
    let start_build = Instant::now();
    let (info, code) = build_code(args)?;
    info!(
        elapsed = ?start_build.elapsed(),
        block_size = info.block_size,
        num_info_bits = info.num_info_bits,
        channel = %info.channel,
        "code constructed"
    );

    info!(path = input, "loading frames");
    let raw_bits = loader::load_bit_file(input)?;
    let frames = loader::slice_frames(&raw_bits, code.num_info_bits());
    info!(frames = frames.len(), "frames loaded, encoding in parallel");
    let start_encode = Instant::now();

    // The code is read-only after construction; every worker shares it
    let encoded: Vec<(Vec<u8>, u64)> = frames
        .par_iter()
        .map(|u| -> Result<(Vec<u8>, u64), PolarError> {
            let start = Instant::now();
            let codeword = code.encode_info(u)?;
            Ok((codeword, start.elapsed().as_nanos() as u64))
        })
        .collect::<Result<_, _>>()?;

    let duration = start_encode.elapsed();
    let seconds = duration.as_secs_f64();

    let mut stats = LatencyStats::new();
    let mut codewords = Vec::with_capacity(encoded.len());
    for (codeword, nanos) in encoded {
        stats.update(nanos);
        codewords.push(codeword);
    }

    loader::save_frames(output, &codewords)?;

    println!("Results");
    println!("Time: {:.4} s", seconds);
    if seconds > 0.0 {
        println!("Throughput: {:.2} frames/s", codewords.len() as f64 / seconds);
        println!(
            "Info rate: {:.2} Mbit/s",
            (codewords.len() * code.num_info_bits()) as f64 / seconds / 1e6
        );
    }
    info!(codewords = codewords.len(), path = output, "codewords written");
    stats.print_report();

    Ok(())
}
