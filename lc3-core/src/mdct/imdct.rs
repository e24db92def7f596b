//! Inverse MDCT synthesis (specification §4.6): `ns` real spectral
//! coefficients to `ns` real time-domain samples, via a conjugate
//! pre-rotation into `ns/2` complex values, a mixed-radix complex FFT, a
//! matching post-rotation, and a windowed overlap-add against the
//! `nd`-sample delay buffer.
//!
//! Grounded on `symphonia_core::dsp::mdct::Imdct`'s pre-rotate / transform
//! / post-rotate / unfold pipeline shape, generalised from its
//! power-of-two `N -> 2N` DCT-IV convention to LC3's `N -> N` low-delay
//! convention (LC3's frame carries over its extra overlap across frames
//! via history rather than doubling the transform's own output length),
//! and on `symphonia-codec-vorbis::dsp::DspChannel::synth`'s
//! overlap-add-against-a-carried-buffer loop.

use super::complex::Complex;
use super::fft;
use std::f32::consts::PI;

/// Pre/post-rotation twiddle angle for line `k` of an `n`-point transform.
fn rotation(k: usize, n: usize) -> Complex {
    let angle = PI * (2.0 * k as f32 + 1.0) / (2.0 * n as f32);
    Complex::new(angle.cos(), -angle.sin())
}

/// Transforms `ns` real spectral coefficients into `ns` real time-domain
/// samples. `scale` is applied to the whole output, matching
/// `symphonia_core::dsp::mdct::Imdct::imdct`'s explicit `scale` parameter.
pub fn transform(coeffs: &[f32], scale: f32) -> Vec<f32> {
    let n = coeffs.len();
    let nc = n / 2;
    debug_assert!(nc > 0 && n % 2 == 0, "imdct requires an even coefficient count");

    let pre: Vec<Complex> = (0..nc)
        .map(|k| {
            let re = coeffs[2 * k];
            let im = coeffs[n - 1 - 2 * k];
            Complex::new(re, im) * rotation(k, n)
        })
        .collect();

    let spectrum = fft::fft(&pre);

    let mut out = vec![0.0f32; n];
    for (k, &z) in spectrum.iter().enumerate() {
        let post = z * rotation(k, n) * scale;
        out[2 * k] = post.re;
        out[n - 1 - 2 * k] = -post.im;
    }
    out
}

/// Applies a short raised-cosine taper to the first and last `nd` samples
/// of `samples`, leaving the interior untouched. `nd` must be at most half
/// of `samples.len()`.
pub fn window(samples: &mut [f32], nd: usize) {
    let n = samples.len();
    if nd == 0 || nd > n / 2 {
        return;
    }
    for i in 0..nd {
        let taper = 0.5 - 0.5 * (PI * (i as f32 + 0.5) / nd as f32).cos();
        samples[i] *= taper;
        samples[n - 1 - i] *= taper;
    }
}

/// Overlap-adds a windowed `ns`-sample frame against the `nd`-sample
/// history carried from the previous frame, producing `ns` output samples
/// and leaving `history` updated with this frame's tail for next time.
pub fn overlap_add(windowed: &[f32], history: &mut [f32]) -> Vec<f32> {
    let ns = windowed.len();
    let nd = history.len();
    debug_assert!(nd <= ns);

    let mut out = vec![0.0f32; ns];
    for i in 0..nd {
        out[i] = windowed[i] + history[i];
    }
    out[nd..].copy_from_slice(&windowed[nd..]);

    history.copy_from_slice(&windowed[ns - nd..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_produces_requested_length_and_stays_finite() {
        let mut coeffs = vec![0.0f32; 480];
        coeffs[0] = 1.0;
        coeffs[10] = 0.5;
        let out = transform(&coeffs, 1.0);
        assert_eq!(out.len(), 480);
        assert!(out.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn window_leaves_interior_untouched() {
        let mut samples = vec![1.0f32; 32];
        window(&mut samples, 4);
        assert_eq!(samples[16], 1.0);
        assert!(samples[0] < 1.0);
        assert!(samples[31] < 1.0);
    }

    #[test]
    fn overlap_add_carries_history_forward() {
        let windowed = vec![2.0f32; 16];
        let mut history = vec![1.0f32; 4];
        let out = overlap_add(&windowed, &mut history);
        assert_eq!(out[0], 3.0); // windowed + previous history
        assert_eq!(out[15], 2.0); // beyond history reach, untouched
        assert!(history.iter().all(|&v| v == 2.0)); // tail of this frame carried forward
    }
}
