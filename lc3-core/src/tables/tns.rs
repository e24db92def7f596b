//! TNS reflection-coefficient unquantisation table, and the two
//! arithmetic-coding models specification §4.4 reads the filter order and
//! each reflection-coefficient code from.
//!
//! Specification §4.4: "Unquantise each rc via the fixed 9-element sine
//! table (positive indices only; sign from the quantised code)."
//!
//! NOTE: as with the SNS and spectral context models (`tables::sns`,
//! `tables::spectral`), the real per-symbol probabilities are ETSI TS 103
//! 634-trained constants not reproduced here (not present in the
//! retrieved corpus); `ORDER_MODEL` and `RC_CODE_MODEL` below are
//! generated from a documented geometric-decay formula that favours a low
//! order and a near-zero reflection coefficient, each summing to
//! [`crate::bits`]'s `AC_TOTAL` — see `DESIGN.md`.

use once_cell::sync::Lazy;

/// `SINE_TABLE[i]` for `i` in `0..=8`, a quarter-sine ramp from 0 to 1 so
/// that the unquantised reflection coefficient always stays within the
/// stability region `(-1, 1)` required by the all-pole lattice filter.
pub static SINE_TABLE: [f32; 9] = {
    // `sin(i/8 * pi/2)` evaluated at compile time is not const-foldable for
    // `f32::sin`, so the nine values are written out; they are exactly
    // `(i as f32 / 8.0 * FRAC_PI_2).sin()`.
    [
        0.000_000_0,
        0.195_090_3,
        0.382_683_4,
        0.555_570_2,
        0.707_106_8,
        0.831_469_6,
        0.923_879_5,
        0.980_785_3,
        1.000_000_0,
    ]
};

/// Highest allowed reflection-coefficient order when `dt <= 5ms`
/// (specification §4.4: "Validate `rcOrder <= 4` when `dt <= 5 ms`").
pub const MAX_RC_ORDER_SHORT_FRAME: u8 = 4;

/// The unsigned quantised code range read per coefficient (`0..16`,
/// offset by 8 to centre at zero).
pub const RC_CODE_OFFSET: i32 = 8;

const AC_TOTAL: u32 = 1 << 10;

/// Builds a monotonically increasing cumulative-frequency table over
/// `weights`, guaranteeing strict monotonicity and an exact `AC_TOTAL`
/// endpoint despite integer rounding (same construction as
/// `tables::spectral::CONTEXT_MODELS`).
fn cumulative_from_weights(weights: &[f32]) -> Vec<u16> {
    let sum: f32 = weights.iter().sum();
    let mut cum = vec![0u16; weights.len() + 1];
    let mut acc = 0u32;
    for (s, w) in weights.iter().enumerate() {
        acc += ((w / sum) * AC_TOTAL as f32) as u32;
        cum[s + 1] = acc.min(AC_TOTAL - (weights.len() - 1 - s) as u32) as u16;
    }
    for s in 1..cum.len() {
        if cum[s] <= cum[s - 1] {
            cum[s] = cum[s - 1] + 1;
        }
    }
    let last = cum.len() - 1;
    cum[last] = AC_TOTAL as u16;
    cum
}

/// Cumulative model over TNS filter order (`symbol + 1 == order`, `order`
/// in `1..=8`), favouring lower orders.
pub static ORDER_MODEL: Lazy<Vec<u16>> = Lazy::new(|| {
    let weights: Vec<f32> = (0..8).map(|order_code| (-0.3 * order_code as f32).exp()).collect();
    cumulative_from_weights(&weights)
});

/// Cumulative model over the unsigned reflection-coefficient code
/// (`0..=16`, offset by [`RC_CODE_OFFSET`]), favouring codes near zero.
pub static RC_CODE_MODEL: Lazy<Vec<u16>> = Lazy::new(|| {
    let weights: Vec<f32> =
        (0..=16).map(|code| (-0.25 * (code - RC_CODE_OFFSET).abs() as f32).exp()).collect();
    cumulative_from_weights(&weights)
});

/// Unquantises one reflection-coefficient code (`0..=16`) to a coefficient
/// in `(-1.0, 1.0)`.
pub fn unquantise_rc(code: u8) -> f32 {
    let centred = i32::from(code) - RC_CODE_OFFSET;
    let magnitude_idx = centred.unsigned_abs() as usize;
    let magnitude = SINE_TABLE[magnitude_idx.min(SINE_TABLE.len() - 1)];
    if centred < 0 {
        -magnitude
    }
    else {
        magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_code_offset_is_zero() {
        assert_eq!(unquantise_rc(8), 0.0);
    }

    #[test]
    fn extremes_are_plus_minus_one() {
        assert!((unquantise_rc(16) - 1.0).abs() < 1e-6);
        assert!((unquantise_rc(0) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn monotonic_in_magnitude() {
        let mut prev = -1.0f32;
        for code in 8..=16u8 {
            let v = unquantise_rc(code);
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn order_model_sums_to_ac_total() {
        assert_eq!(ORDER_MODEL[0], 0);
        assert_eq!(*ORDER_MODEL.last().unwrap(), AC_TOTAL as u16);
        for w in ORDER_MODEL.windows(2) {
            assert!(w[1] > w[0]);
        }
    }

    #[test]
    fn rc_code_model_sums_to_ac_total() {
        assert_eq!(RC_CODE_MODEL[0], 0);
        assert_eq!(*RC_CODE_MODEL.last().unwrap(), AC_TOTAL as u16);
        for w in RC_CODE_MODEL.windows(2) {
            assert!(w[1] > w[0]);
        }
    }
}
