//! Spectral line decoding (specification §4.6): arithmetic-coded pair
//! magnitudes with an escape path for larger values, and sign bits read
//! from the tail. Scale factors are not applied here: per the
//! orchestrator's documented reverse-synthesis order (spectrum → TNS →
//! SNS → IMDCT), SNS scaling is applied after TNS, not during spectral
//! decode — see `sns::apply_scale_factors`.
//!
//! Grounded on `symphonia-codec-vorbis::residue`'s partition-by-partition
//! residue decode (context selected from neighbouring partitions) and
//! `symphonia-codec-opus::range_decoder`'s raw-bit "escape" extension
//! alongside range-coded symbols.

use crate::bits::{AcModel, BitReader};
use crate::error::BadFrameReason;
use crate::fastmath;
use crate::tables::spectral::{CONTEXT_MODELS, ESCAPE_SYMBOL, NUM_CONTEXTS, PAIR_TABLE};

/// Escape-extension chunk width: additional magnitude is accumulated in
/// 4-bit plain-bit chunks, continuing while a chunk reads all-ones.
const ESCAPE_CHUNK_BITS: u32 = 4;
const ESCAPE_CONTINUE: u32 = (1 << ESCAPE_CHUNK_BITS) - 1;

/// Maps an 8-bit gain code to a linear amplitude scale.
pub fn read_global_gain(bits: &mut BitReader<'_>) -> f32 {
    let code = bits.get_bits(8) as i32;
    // Half-dB steps centred so the mid-code (128) is unity gain.
    let db = (code - 128) as f32 * 0.5;
    fastmath::db_to_lin(db)
}

pub struct SpectralResult {
    pub lines: Vec<f32>,
    pub error: Option<BadFrameReason>,
}

/// Decodes `ne` spectral lines, scaled only by `global_gain` (the SNS
/// scale factors are applied later, after TNS synthesis).
pub fn decode(bits: &mut BitReader<'_>, ne: usize, global_gain: f32) -> SpectralResult {
    let mut lines = vec![0.0f32; ne];
    let mut error = None;
    let mut context = 0usize;

    let mut i = 0;
    while i < ne {
        if error.is_some() {
            break;
        }

        let model = AcModel::new(&CONTEXT_MODELS[context.min(NUM_CONTEXTS - 1)]);
        let symbol = bits.get_symbol(model);

        let (mag_a, mag_b) = if symbol == ESCAPE_SYMBOL {
            let extra_a = read_escape_magnitude(bits);
            let extra_b = read_escape_magnitude(bits);
            (4 + extra_a, 4 + extra_b)
        }
        else {
            let (a, b) = PAIR_TABLE[symbol as usize];
            (u32::from(a), u32::from(b))
        };

        let sign_a = if mag_a > 0 { sign_bit(bits) } else { 1.0 };
        lines[i] = sign_a * mag_a as f32 * global_gain;

        if i + 1 < ne {
            let sign_b = if mag_b > 0 { sign_bit(bits) } else { 1.0 };
            lines[i + 1] = sign_b * mag_b as f32 * global_gain;
        }

        context = ((mag_a + mag_b) as usize).min(NUM_CONTEXTS - 1);

        if let Some(reason) = bits.check_error() {
            error = Some(reason);
        }

        i += 2;
    }

    SpectralResult { lines, error }
}

fn read_escape_magnitude(bits: &mut BitReader<'_>) -> u32 {
    let mut extra = 0u32;
    loop {
        let chunk = bits.get_bits(ESCAPE_CHUNK_BITS);
        extra += chunk;
        if chunk != ESCAPE_CONTINUE || bits.check_error().is_some() {
            break;
        }
    }
    extra
}

fn sign_bit(bits: &mut BitReader<'_>) -> f32 {
    if bits.get_bit() == 1 {
        -1.0
    }
    else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_gain_of_midpoint_code_is_unity() {
        // First three bytes are consumed priming the arithmetic coder; the
        // gain code is read as plain bits from the tail, so it sits in the
        // last byte.
        let buf = [0u8, 0, 0, 0, 0, 0x80];
        let mut bits = BitReader::new(&buf);
        let gain = read_global_gain(&mut bits);
        assert!((gain - 1.0).abs() < 0.05);
    }

    #[test]
    fn decode_produces_requested_line_count() {
        let buf = [0x12u8, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x11, 0x22];
        let mut bits = BitReader::new(&buf);
        let result = decode(&mut bits, 32, 1.0);
        assert_eq!(result.lines.len(), 32);
    }

    #[test]
    fn decode_stops_cleanly_on_starved_input() {
        let buf = [0u8; 3];
        let mut bits = BitReader::new(&buf);
        let result = decode(&mut bits, 64, 1.0);
        assert_eq!(result.lines.len(), 64);
        assert!(result.error.is_some());
    }
}
