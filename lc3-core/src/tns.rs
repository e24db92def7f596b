//! Temporal Noise Shaping (specification §4.4): an all-pole lattice filter
//! applied to the spectral envelope, parameterised per filter by an order
//! and a set of quantised reflection coefficients.
//!
//! Grounded on `symphonia-codec-vorbis::floor`'s per-band lattice-style
//! envelope filter shape; the lattice recursion itself follows the
//! textbook reflection-coefficient synthesis form used throughout that
//! module.

use crate::bits::{AcModel, BitReader};
use crate::error::BadFrameReason;
use crate::tables::tns::{self, MAX_RC_ORDER_SHORT_FRAME, ORDER_MODEL, RC_CODE_MODEL};

pub const MAX_FILTERS: usize = 2;
pub const MAX_ORDER: usize = 8;

/// One TNS filter's unquantised reflection coefficients.
#[derive(Clone, Copy)]
pub struct Filter {
    pub order: u8,
    pub rc: [f32; MAX_ORDER],
}

impl Filter {
    const fn silent() -> Self {
        Filter { order: 0, rc: [0.0; MAX_ORDER] }
    }
}

pub struct TnsResult {
    pub filters: [Filter; MAX_FILTERS],
    pub num_filters: usize,
    pub error: Option<BadFrameReason>,
}

/// Reads the TNS activation flag, per-filter orders, and reflection
/// coefficients for up to [`MAX_FILTERS`] filters (two when the decoded
/// bandwidth spans both spectral halves, one otherwise).
pub fn read(bits: &mut BitReader<'_>, num_filters: usize, short_frame: bool) -> TnsResult {
    let num_filters = num_filters.min(MAX_FILTERS);
    let mut filters = [Filter::silent(); MAX_FILTERS];

    let active = bits.get_bit() == 1;
    if !active {
        return TnsResult { filters, num_filters: 0, error: None };
    }

    let mut error = None;
    let order_model = AcModel::new(&ORDER_MODEL);
    let rc_model = AcModel::new(&RC_CODE_MODEL);
    for filter in filters.iter_mut().take(num_filters) {
        let order_code = bits.get_symbol(order_model) + 1;
        if short_frame && order_code > MAX_RC_ORDER_SHORT_FRAME {
            error.get_or_insert(BadFrameReason::TnsOrder);
        }
        let order = order_code.min(MAX_ORDER as u8);
        filter.order = order;
        for rc in filter.rc.iter_mut().take(order as usize) {
            let code = bits.get_symbol(rc_model);
            *rc = tns::unquantise_rc(code);
        }
    }

    TnsResult { filters, num_filters, error }
}

/// Applies the all-pole synthesis (decoder-side) lattice filter for one
/// TNS filter in place over `band: &mut [f32]`.
///
/// Single-pass reflection-coefficient recursion: each stage `k` (from
/// `order - 1` down to `0`) removes that stage's feedback from the
/// running value `t` and folds it into `state[k + 1]` before the next
/// stage runs, so the updated states are visible to the very next sample
/// rather than discarded by a separate shift pass.
pub fn synthesize(filter: &Filter, band: &mut [f32]) {
    if filter.order == 0 {
        return;
    }
    let order = filter.order as usize;
    let mut state = [0.0f32; MAX_ORDER + 1];

    for sample in band.iter_mut() {
        let mut t = *sample;
        for k in (0..order).rev() {
            t -= filter.rc[k] * state[k];
            state[k + 1] = state[k] + filter.rc[k] * t;
        }
        state[0] = t;
        *sample = t;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactive_flag_yields_zero_filters() {
        let buf = [0x00u8; 4];
        let mut bits = BitReader::new(&buf);
        let result = read(&mut bits, 2, true);
        assert_eq!(result.num_filters, 0);
    }

    #[test]
    fn synthesis_is_identity_for_zero_order() {
        let filter = Filter::silent();
        let mut band = [1.0, 2.0, 3.0];
        synthesize(&filter, &mut band);
        assert_eq!(band, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn synthesis_stays_finite_for_max_order() {
        let mut filter = Filter::silent();
        filter.order = MAX_ORDER as u8;
        for (i, rc) in filter.rc.iter_mut().enumerate() {
            *rc = tns::unquantise_rc((i as u8 % 16) + 1);
        }
        let mut band = [0.5f32; 32];
        synthesize(&filter, &mut band);
        assert!(band.iter().all(|v| v.is_finite()));
    }
}
