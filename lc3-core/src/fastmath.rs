//! Small numeric helpers shared by the two places the decoder converts
//! between a log-ish domain and a linear one.
//!
//! `exp` backs the SNS synthesis gain (`exp(-scf)`, see `sns::
//! apply_scale_factors`); `db_to_lin` backs the spectral decoder's
//! dB-to-linear global gain (`spectral::read_global_gain`). Kept as a
//! small, independently unit-tested numeric module, matching the shape of
//! `symphonia_core::conv`/`util` helper modules. No decode-path caller
//! needs a log2/exp2/dB-from-linear direction, so this module carries only
//! the two directions actually used.

/// Natural exponential, used for the SNS synthesis gain `exp(-scf)`.
#[inline]
pub fn exp(x: f32) -> f32 {
    x.exp()
}

/// Convert decibels to a linear amplitude ratio: `10^(db/20)`.
#[inline]
pub fn db_to_lin(db: f32) -> f32 {
    10f32.powf(db / 20.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exp_of_zero_is_one() {
        assert!((exp(0.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn db_to_lin_of_zero_db_is_unity_gain() {
        assert!((db_to_lin(0.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn db_to_lin_matches_known_point() {
        // +6.0206 dB doubles the linear amplitude.
        assert!((db_to_lin(20.0) - 10.0).abs() < 1e-4);
    }
}
