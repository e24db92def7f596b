//! Spectral Noise Shaping (SNS) unquantisation (specification §4.3).
//!
//! Bitstream: `lfcb` (5 bits), `hfcb` (5 bits), `shape_msb` (1 bit),
//! `gain_msb` (1 bit), `sign_a` (1 bit), then a 24- or 25-bit multiplex
//! code depending on `shape_msb`, demultiplexed per the rule below into
//! one of four PVQ shapes.
//!
//! Grounded on `symphonia-codec-vorbis::codebook`'s VQ lookup/unpack
//! functions for the demultiplex arithmetic shape, and
//! `symphonia_core::dsp::dct::Dct` for the precomputed-matrix DCT pattern
//! (realised here as `tables::sns::IDCT16`).

use crate::bits::BitReader;
use crate::error::BadFrameReason;
use crate::fastmath;
use crate::tables::mpvq;
use crate::tables::sns::{self, SCF_COUNT};

/// Pulse counts for each PVQ vector this crate's SNS decoder expects.
/// These govern the combinatorial bound used by `mpvq::pulse_vector_count`
/// and are a documented choice, not the standard's literal constants (see
/// `DESIGN.md`: the actual trained/combinatorial LC3 table values are not
/// reproduced here).
const K_MAIN10: usize = 8;
const K_TAIL6: usize = 4;
const K_MAIN16: usize = 6;

const DIM_MAIN10: usize = 10;
const DIM_TAIL6: usize = 6;
const DIM_MAIN16: usize = 16;

pub struct SnsResult {
    pub scf: [f32; SCF_COUNT],
    pub error: Option<BadFrameReason>,
}

/// Reads and reconstructs the 16 smoothed scale factors for one frame.
pub fn read_and_reconstruct(bits: &mut BitReader<'_>) -> SnsResult {
    let lfcb_idx = bits.get_bits(5) as usize;
    let hfcb_idx = bits.get_bits(5) as usize;
    let shape_msb = bits.get_bit();
    let gain_msb = bits.get_bit() as u8;
    let sign_a = bits.get_bit();

    let size_a10 = mpvq::pulse_vector_count(DIM_MAIN10, K_MAIN10);
    let size_a16 = mpvq::pulse_vector_count(DIM_MAIN16, K_MAIN16);

    let demuxed = if shape_msb == 0 {
        let mux = u64::from(bits.get_bits(25));
        demux_shape_msb0(mux, size_a10, gain_msb)
    }
    else {
        let mux = u64::from(bits.get_bits(24));
        demux_shape_msb1(mux, size_a16, gain_msb)
    };

    let Demuxed { shape, gain_idx, idx_a, idx_b, ls_b } = match demuxed {
        Some(d) => d,
        None => {
            return SnsResult {
                scf: combine_codebooks(lfcb_idx, hfcb_idx),
                error: Some(BadFrameReason::SnsMuxCode),
            };
        }
    };

    let mut pulses = [0i32; SCF_COUNT];
    match shape {
        0 => {
            let main = mpvq::deenumerate(idx_a, DIM_MAIN10, K_MAIN10);
            let tail = mpvq::deenumerate_unsigned_tail(idx_b, DIM_TAIL6, K_TAIL6, ls_b);
            pulses[..DIM_MAIN10].copy_from_slice(&main);
            pulses[DIM_MAIN10..].copy_from_slice(&tail);
        }
        1 => {
            let main = mpvq::deenumerate(idx_a, DIM_MAIN10, K_MAIN10);
            pulses[..DIM_MAIN10].copy_from_slice(&main);
            // Shape 1 carries no high-band tail pulses.
        }
        2 | 3 => {
            let main = mpvq::deenumerate(idx_a, DIM_MAIN16, K_MAIN16);
            pulses.copy_from_slice(&main);
        }
        _ => unreachable!("shape is bounds-checked to 0..=3"),
    }

    let gain = match sns::gain_for(shape as usize, gain_idx as usize) {
        Some(g) => g,
        None => {
            return SnsResult {
                scf: combine_codebooks(lfcb_idx, hfcb_idx),
                error: Some(BadFrameReason::SnsMuxCode),
            };
        }
    };

    let energy: f32 = pulses.iter().map(|&c| (c * c) as f32).sum();
    let norm = if energy > 0.0 { energy.sqrt() } else { 1.0 };
    let sign = if sign_a == 1 { -1.0f32 } else { 1.0f32 };

    let mut coeffs = [0.0f32; SCF_COUNT];
    for (c, &p) in coeffs.iter_mut().zip(pulses.iter()) {
        *c = sign * gain * p as f32 / norm;
    }

    let residual = sns::idct16(&coeffs);
    let mut scf = combine_codebooks(lfcb_idx, hfcb_idx);
    for (s, r) in scf.iter_mut().zip(residual.iter()) {
        *s += r;
    }

    SnsResult { scf, error: None }
}

/// Spreads the 16 recovered scale factors evenly across `lines` (one band
/// per `lines.len() / 16` consecutive lines) and scales each line by
/// `exp(-scf[band])`, in place. Applied after TNS synthesis, before IMDCT,
/// per the orchestrator's documented reverse-synthesis order.
pub fn apply_scale_factors(lines: &mut [f32], scf: &[f32; SCF_COUNT]) {
    let n = lines.len();
    if n == 0 {
        return;
    }
    let band_width = n.div_ceil(SCF_COUNT).max(1);
    for (i, line) in lines.iter_mut().enumerate() {
        let band = (i / band_width).min(SCF_COUNT - 1);
        *line *= fastmath::exp(-scf[band]);
    }
}

fn combine_codebooks(lfcb_idx: usize, hfcb_idx: usize) -> [f32; SCF_COUNT] {
    let mut out = [0.0f32; SCF_COUNT];
    let lfcb = &sns::LFCB[lfcb_idx.min(sns::CODEBOOK_ENTRIES - 1)];
    let hfcb = &sns::HFCB[hfcb_idx.min(sns::CODEBOOK_ENTRIES - 1)];
    out[..sns::CODEBOOK_DIMS].copy_from_slice(lfcb);
    out[sns::CODEBOOK_DIMS..].copy_from_slice(hfcb);
    out
}

struct Demuxed {
    shape: u8,
    gain_idx: u8,
    idx_a: u64,
    idx_b: u64,
    ls_b: bool,
}

fn demux_shape_msb0(mux: u64, size_a: u64, gain_msb: u8) -> Option<Demuxed> {
    if size_a == 0 {
        return None;
    }
    let q = mux / size_a;
    let idx_a = mux % size_a;

    if q < 2 {
        let gain_lsb = (q % 2) as u8;
        Some(Demuxed {
            shape: 1,
            gain_idx: (gain_msb << 1) | gain_lsb,
            idx_a,
            idx_b: 0,
            ls_b: false,
        })
    }
    else {
        let q2 = q - 2;
        let idx_b = q2 / 2;
        let ls_b = q2 % 2 == 1;
        Some(Demuxed { shape: 0, gain_idx: gain_msb, idx_a, idx_b, ls_b })
    }
}

fn demux_shape_msb1(mux: u64, size_a: u64, gain_msb: u8) -> Option<Demuxed> {
    if mux < size_a {
        Some(Demuxed { shape: 2, gain_idx: gain_msb, idx_a: mux, idx_b: 0, ls_b: false })
    }
    else {
        let rest = mux - size_a;
        let idx_a = rest / 2;
        let gain_lsb = (rest % 2) as u8;
        Some(Demuxed {
            shape: 3,
            gain_idx: (gain_msb << 1) | gain_lsb,
            idx_a,
            idx_b: 0,
            ls_b: false,
        })
    }
}
