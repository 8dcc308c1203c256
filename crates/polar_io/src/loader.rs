use anyhow::{Context, Result, bail};
use bitvec::prelude::*;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

/// Loads a packed bit file.
pub fn load_bit_file<P: AsRef<Path>>(path: P) -> Result<BitVec<u8, Lsb0>> {
    let path = path.as_ref();
    let mut file =
        File::open(path).with_context(|| format!("Failed to open bit file {}", path.display()))?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;

    // Bit i of a frame lives in bit (i % 8) of byte (i / 8)
    Ok(BitVec::<u8, Lsb0>::from_vec(buffer))
}

/// Splits a packed bit stream into frames of `bits_per_frame` bits.
///
/// Every frame starts on a byte boundary. A trailing partial frame is dropped.
pub fn slice_frames(raw_bits: &BitSlice<u8, Lsb0>, bits_per_frame: usize) -> Vec<Vec<u8>> {
    if bits_per_frame == 0 {
        return Vec::new();
    }
    let stride_bits = bits_per_frame.div_ceil(8) * 8;
    let num_frames = raw_bits.len() / stride_bits;

    (0..num_frames)
        .map(|i| {
            let start = i * stride_bits;
            raw_bits[start..start + bits_per_frame]
                .iter()
                .map(|b| u8::from(*b))
                .collect()
        })
        .collect()
}

/// Writes equally sized frames of 0/1 bits as a packed bit file.
///
/// The inverse of `load_bit_file` followed by `slice_frames`.
pub fn save_frames<P: AsRef<Path>>(path: P, frames: &[Vec<u8>]) -> Result<()> {
    let path = path.as_ref();
    let Some(first) = frames.first() else {
        File::create(path)?;
        return Ok(());
    };
    let bits_per_frame = first.len();
    let stride_bits = bits_per_frame.div_ceil(8) * 8;

    let mut out = BufWriter::new(
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
    );
    let mut packed: BitVec<u8, Lsb0> = BitVec::with_capacity(stride_bits * frames.len());
    for (n, frame) in frames.iter().enumerate() {
        if frame.len() != bits_per_frame {
            bail!(
                "frame {} has {} bits, expected {}",
                n,
                frame.len(),
                bits_per_frame
            );
        }
        for &bit in frame {
            if bit > 1 {
                bail!("frame {} holds non-binary value {}", n, bit);
            }
            packed.push(bit == 1);
        }
        packed.resize(packed.len() + (stride_bits - bits_per_frame), false);
    }
    out.write_all(packed.as_raw_slice())?;
    out.flush()?;
    Ok(())
}
