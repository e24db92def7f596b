//! Mixed-radix complex FFT.
//!
//! `symphonia_core::dsp::fft` is a radix-2-only Cooley-Tukey FFT restricted
//! to power-of-two sizes, sized by precomputed twiddle tables. LC3's frame
//! lengths are not powers of two (e.g. 480 at 48 kHz/10 ms factors as
//! `2^5 * 3 * 5`), so this module generalises that algorithm's recursive
//! decimation structure to mixed radix: at each level, the smallest of
//! `{5, 3, 2}` dividing the current length is pulled out first (falling
//! back to trial division for any other prime factor), matching the
//! "radix-5 once, up to two radix-3, then radix-2 down to 1" factorisation
//! every frame length this crate configures actually takes.

use super::complex::Complex;
use std::f32::consts::PI;

/// Smallest usable radix dividing `n`, preferring 5, then 3, then 2 before
/// falling back to trial division for an odd composite or prime factor.
fn smallest_radix(n: usize) -> usize {
    for p in [5, 3, 2] {
        if n % p == 0 {
            return p;
        }
    }
    let mut d = 7;
    while d * d <= n {
        if n % d == 0 {
            return d;
        }
        d += 2;
    }
    n
}

/// Recursive mixed-radix decimation-in-time transform. `inverse` selects
/// the sign of the twiddle exponent; the caller is responsible for the
/// `1/n` normalisation on the inverse direction.
fn transform(x: &[Complex], inverse: bool) -> Vec<Complex> {
    let n = x.len();
    if n == 1 {
        return vec![x[0]];
    }

    let p = smallest_radix(n);
    let m = n / p;

    let subs: Vec<Vec<Complex>> = (0..p)
        .map(|r| {
            let sub: Vec<Complex> = (0..m).map(|i| x[r + i * p]).collect();
            transform(&sub, inverse)
        })
        .collect();

    let sign = if inverse { 1.0 } else { -1.0 };
    let mut out = vec![Complex::default(); n];
    for (k, slot) in out.iter_mut().enumerate() {
        let mut sum = Complex::default();
        for (r, sub) in subs.iter().enumerate() {
            let angle = sign * 2.0 * PI * (k as f32) * (r as f32) / (n as f32);
            let twiddle = Complex::new(angle.cos(), angle.sin());
            sum += sub[k % m] * twiddle;
        }
        *slot = sum;
    }
    out
}

/// Forward FFT, unnormalised.
pub fn fft(x: &[Complex]) -> Vec<Complex> {
    transform(x, false)
}

/// Inverse FFT, normalised by `1/n`.
pub fn ifft(x: &[Complex]) -> Vec<Complex> {
    let n = x.len() as f32;
    transform(x, true).iter().map(|c| c.scale(1.0 / n)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn direct_dft(x: &[Complex]) -> Vec<Complex> {
        let n = x.len();
        (0..n)
            .map(|k| {
                let mut sum = Complex::default();
                for (j, &xj) in x.iter().enumerate() {
                    let angle = -2.0 * PI * (k as f32) * (j as f32) / (n as f32);
                    sum += xj * Complex::new(angle.cos(), angle.sin());
                }
                sum
            })
            .collect()
    }

    #[test]
    fn matches_direct_dft_for_mixed_radix_size() {
        // 30 = 2 * 3 * 5, exercising all three radices in one transform.
        let input: Vec<Complex> =
            (0..30).map(|i| Complex::new((i as f32).sin(), (i as f32 * 0.5).cos())).collect();
        let expected = direct_dft(&input);
        let actual = fft(&input);
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!((a.re - e.re).abs() < 1e-3);
            assert!((a.im - e.im).abs() < 1e-3);
        }
    }

    #[test]
    fn inverse_of_forward_is_identity() {
        let input: Vec<Complex> = (0..16).map(|i| Complex::new(i as f32, 0.0)).collect();
        let roundtrip = ifft(&fft(&input));
        for (a, e) in roundtrip.iter().zip(input.iter()) {
            assert!((a.re - e.re).abs() < 1e-3);
            assert!(a.im.abs() < 1e-3);
        }
    }
}
