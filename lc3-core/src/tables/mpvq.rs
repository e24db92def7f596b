//! (Modified) Pyramid Vector Quantisation combinatorics.
//!
//! `pulse_vector_count(n, k)` counts the number of length-`n` integer
//! vectors whose components' absolute values sum to `k` (each nonzero
//! component independently signed) — the standard PVQ "shell size". The
//! MPVQ de-enumeration used by SNS (specification §4.3) walks this count
//! function component-by-component to recover a pulse vector from a single
//! combinatorial index, exactly as CELT/Opus's `cwrsi`/`icwrs` do, except
//! here the counting table is derived from the first-principles recursion
//! below rather than reproduced from a vendor table (see DESIGN.md).
//!
//! Grounded on `symphonia_core::dsp::fft`'s `lazy_static!`-style
//! once-computed table pattern, modernised to `once_cell::sync::Lazy`.

use once_cell::sync::Lazy;

/// Maximum vector dimension this crate ever de-enumerates (SNS uses 16).
const MAX_DIM: usize = 17;
/// Maximum pulse count ever de-enumerated.
const MAX_PULSES: usize = 16;

/// `table[n][k]` for `n in 0..=MAX_DIM`, `k in 0..=MAX_PULSES`, built once
/// in full (bottom-up over `n`) rather than memoised lazily per-call: the
/// table is tiny and bounded, so there is no benefit to paying a lock on
/// every decode-path lookup for something that is read-only process state
/// after the first access (specification §5).
///
/// `f(0, 0) = 1`, `f(0, k > 0) = 0`, and for `n >= 1`:
/// `f(n, k) = f(n-1, k) + 2 * sum_{j=1}^{k} f(n-1, k - j)`.
static COUNT_TABLE: Lazy<Vec<Vec<u64>>> = Lazy::new(|| {
    let mut table = vec![vec![0u64; MAX_PULSES + 1]; MAX_DIM + 1];
    for n in 0..=MAX_DIM {
        for k in 0..=MAX_PULSES {
            table[n][k] = if n == 0 {
                u64::from(k == 0)
            }
            else {
                let mut sum = table[n - 1][k];
                for j in 1..=k {
                    sum += 2 * table[n - 1][k - j];
                }
                sum
            };
        }
    }
    table
});

/// Number of length-`n` signed-integer vectors with L1 norm `k`.
pub fn pulse_vector_count(n: usize, k: usize) -> u64 {
    assert!(n <= MAX_DIM && k <= MAX_PULSES, "mpvq table bounds exceeded");
    COUNT_TABLE[n][k]
}

/// Number of length-`n` *unsigned* integer vectors with L1 norm `k`
/// (no per-component sign, used for the SNS length-6 tail, which carries a
/// single overall sign bit rather than per-pulse signs).
pub fn unsigned_vector_count(n: usize, k: usize) -> u64 {
    // Equivalent to placing `k` indistinguishable pulses into `n` bins:
    // C(n + k - 1, k).
    binomial(n as u64 + k as u64 - 1, k as u64)
}

fn binomial(n: u64, k: u64) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result = 1u64;
    for i in 0..k {
        result = result * (n - i) / (i + 1);
    }
    result
}

/// De-enumerates a combinatorial index into a length-`n` signed pulse
/// vector with L1 norm `k`.
pub fn deenumerate(mut idx: u64, n: usize, k: usize) -> Vec<i32> {
    let mut vec = vec![0i32; n];
    let mut remaining_k = k;

    for i in 0..n {
        let remaining_n = n - i;
        if remaining_n == 1 {
            vec[i] = if remaining_k == 0 {
                0
            }
            else if idx == 0 {
                remaining_k as i32
            }
            else {
                -(remaining_k as i32)
            };
            break;
        }

        let mut j = 0usize;
        loop {
            let count = if j == 0 {
                pulse_vector_count(remaining_n - 1, remaining_k)
            }
            else {
                2 * pulse_vector_count(remaining_n - 1, remaining_k - j)
            };

            if idx < count {
                if j == 0 {
                    vec[i] = 0;
                }
                else {
                    let half = count / 2;
                    if idx < half {
                        vec[i] = j as i32;
                    }
                    else {
                        vec[i] = -(j as i32);
                        idx -= half;
                    }
                    remaining_k -= j;
                }
                break;
            }
            else {
                idx -= count;
                j += 1;
            }
        }
    }

    vec
}

/// Inverse of [`deenumerate`]; used only by tests to validate the
/// round-trip invariant from specification §8 ("the enumerate→deenumerate
/// path recovers `c` exactly"). Not part of the decode path.
#[cfg(test)]
pub fn enumerate(vec: &[i32]) -> u64 {
    let n = vec.len();
    let mut idx = 0u64;
    let mut remaining_k: usize = vec.iter().map(|&c| c.unsigned_abs() as usize).sum();

    for i in 0..n {
        let remaining_n = n - i;
        if remaining_n == 1 {
            if remaining_k != 0 && vec[i] < 0 {
                idx += 1;
            }
            break;
        }

        let actual_j = vec[i].unsigned_abs() as usize;
        for j in 0..actual_j {
            idx += if j == 0 {
                pulse_vector_count(remaining_n - 1, remaining_k)
            }
            else {
                2 * pulse_vector_count(remaining_n - 1, remaining_k - j)
            };
        }

        if actual_j > 0 {
            let count = 2 * pulse_vector_count(remaining_n - 1, remaining_k - actual_j);
            let half = count / 2;
            if vec[i] < 0 {
                idx += half;
            }
            remaining_k -= actual_j;
        }
    }

    idx
}

/// De-enumerates the SNS length-6 tail: an unsigned magnitude index plus a
/// single overall sign bit applied to every nonzero component.
pub fn deenumerate_unsigned_tail(idx: u64, n: usize, k: usize, negate: bool) -> Vec<i32> {
    let mut remaining_idx = idx;
    let mut remaining_k = k;
    let mut vec = vec![0i32; n];

    for i in 0..n {
        let remaining_n = n - i;
        if remaining_n == 1 {
            vec[i] = remaining_k as i32;
            break;
        }

        let mut j = 0usize;
        loop {
            let count = unsigned_vector_count(remaining_n - 1, remaining_k - j);
            if remaining_idx < count {
                vec[i] = j as i32;
                remaining_k -= j;
                break;
            }
            remaining_idx -= count;
            j += 1;
        }
    }

    if negate {
        for v in &mut vec {
            *v = -*v;
        }
    }

    vec
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_base_cases() {
        assert_eq!(pulse_vector_count(0, 0), 1);
        assert_eq!(pulse_vector_count(0, 3), 0);
        assert_eq!(pulse_vector_count(1, 0), 1);
        assert_eq!(pulse_vector_count(1, 2), 2); // [+2] or [-2]
    }

    #[test]
    fn count_two_dims_one_pulse() {
        // n=2, k=1: (±1, 0) or (0, ±1) = 4 vectors.
        assert_eq!(pulse_vector_count(2, 1), 4);
    }

    #[test]
    fn enumerate_deenumerate_round_trip() {
        for n in [2usize, 4, 6] {
            for k in 0..=4usize {
                let total = pulse_vector_count(n, k);
                for idx in 0..total.min(50) {
                    let vec = deenumerate(idx, n, k);
                    let sum: i32 = vec.iter().map(|v| v.unsigned_abs() as i32).sum();
                    assert_eq!(sum as usize, k);
                    assert_eq!(enumerate(&vec), idx);
                }
            }
        }
    }

    #[test]
    fn unsigned_tail_preserves_norm() {
        let vec = deenumerate_unsigned_tail(5, 6, 3, false);
        let sum: i32 = vec.iter().sum();
        assert_eq!(sum, 3);
    }
}
