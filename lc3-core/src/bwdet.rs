//! Bandwidth indicator (specification §4.2).

use crate::bits::BitReader;
use crate::config::SampleRate;
use crate::error::BadFrameReason;
use crate::tables::band_edges::Bandwidth;

/// Result of reading the bandwidth field: the detected bandwidth and,
/// when the decoded index exceeded what the sample rate allows, the
/// reason it was clamped.
pub struct BwDetResult {
    pub bandwidth: Bandwidth,
    pub overrun: Option<BadFrameReason>,
}

/// Reads 0–3 bits selecting a [`Bandwidth`], capped by `sr`. HR streams
/// use zero bits (their bandwidth is always [`Bandwidth::Fb`]).
pub fn read_bandwidth(bits: &mut BitReader<'_>, sr: SampleRate, hr_mode: bool) -> BwDetResult {
    if hr_mode {
        return BwDetResult { bandwidth: Bandwidth::Fb, overrun: None };
    }

    let max = Bandwidth::max_for_rate(sr);
    let n_bits = Bandwidth::bits_for_max(max);

    if n_bits == 0 {
        return BwDetResult { bandwidth: max, overrun: None };
    }

    let raw = bits.get_bits(n_bits) as u8;
    match Bandwidth::from_index(raw) {
        Some(bw) if bw <= max => BwDetResult { bandwidth: bw, overrun: None },
        _ => {
            // Per Design Notes §9's open question: an out-of-range
            // bandwidth is always treated as a bad-frame indication by
            // this implementation, even though the historical reference
            // orchestrator does not always consult the flag.
            BwDetResult { bandwidth: max, overrun: Some(BadFrameReason::BandwidthOverrun) }
        }
    }
}
