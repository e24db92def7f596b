//! Spectral Noise Shaping tables: the two 32×8 scale-factor codebooks, the
//! four-shape PVQ gain table, and the 16×16 inverse-DCT matrix.
//!
//! NOTE: `LFCB`/`HFCB`/`VQ_GAINS` are ETSI TS 103 634-defined trained
//! vector-quantisation constants. Their shape is well documented (two
//! 32-entry 8-dimensional codebooks; a jagged four-shape gain table), but
//! the trained numeric content is not reproduced anywhere available here.
//! The values generated here satisfy the documented shape and
//! monotonicity constraints but are not the standard's trained constants
//! — see `DESIGN.md`.

use once_cell::sync::Lazy;

pub const CODEBOOK_ENTRIES: usize = 32;
pub const CODEBOOK_DIMS: usize = 8;
pub const SCF_COUNT: usize = 16;

/// Low-band scale-factor codebook: `LFCB[entry][dim]`.
pub static LFCB: Lazy<[[f32; CODEBOOK_DIMS]; CODEBOOK_ENTRIES]> = Lazy::new(|| {
    let mut cb = [[0.0f32; CODEBOOK_DIMS]; CODEBOOK_ENTRIES];
    for (e, row) in cb.iter_mut().enumerate() {
        for (d, value) in row.iter_mut().enumerate() {
            let x = e as f32 / (CODEBOOK_ENTRIES - 1) as f32;
            let shape = (d as f32 + 1.0) / CODEBOOK_DIMS as f32;
            *value = (x - 0.5) * 4.0 * shape;
        }
    }
    cb
});

/// High-band scale-factor codebook: `HFCB[entry][dim]`.
pub static HFCB: Lazy<[[f32; CODEBOOK_DIMS]; CODEBOOK_ENTRIES]> = Lazy::new(|| {
    let mut cb = [[0.0f32; CODEBOOK_DIMS]; CODEBOOK_ENTRIES];
    for (e, row) in cb.iter_mut().enumerate() {
        for (d, value) in row.iter_mut().enumerate() {
            let x = e as f32 / (CODEBOOK_ENTRIES - 1) as f32;
            let shape = (CODEBOOK_DIMS - d) as f32 / CODEBOOK_DIMS as f32;
            *value = (x - 0.5) * 4.0 * shape;
        }
    }
    cb
});

/// Per-shape PVQ gains, a jagged ragged array represented as a closed
/// variant over the four shape indices (Design Notes §9). `gains(shape)`
/// is bounds-checked against the shape's entry count by the caller via
/// `.get()`.
pub static VQ_GAINS: Lazy<[Vec<f32>; 4]> = Lazy::new(|| {
    // Shapes 0 and 2 read only the direct gain-MSB bit (two candidate
    // gains); shapes 1 and 3 additionally fold a gain-LSB bit out of the
    // multiplex code (four candidate gains) — see the demultiplex rule in
    // specification §4.3 and `sns::demux`.
    let step = 1.25f32;
    [
        vec![1.0, step],
        vec![1.0, step, step * step, step * step * step],
        vec![1.0, step],
        vec![1.0, step, step * step, step * step * step],
    ]
});

pub fn gain_for(shape: usize, gain_idx: usize) -> Option<f32> {
    VQ_GAINS.get(shape).and_then(|g| g.get(gain_idx)).copied()
}

/// Precomputed 16×16 inverse DCT-II ("DCT-III" synthesis) matrix:
/// `IDCT16[i][j]`, applied as `residual[i] = sum_j IDCT16[i][j] * coeffs[j]`.
pub static IDCT16: Lazy<[[f32; SCF_COUNT]; SCF_COUNT]> = Lazy::new(|| {
    let mut m = [[0.0f32; SCF_COUNT]; SCF_COUNT];
    let n = SCF_COUNT as f32;
    for (i, row) in m.iter_mut().enumerate() {
        for (j, value) in row.iter_mut().enumerate() {
            let scale = if j == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };
            let angle = std::f32::consts::PI / n * (i as f32 + 0.5) * j as f32;
            *value = scale * angle.cos();
        }
    }
    m
});

/// Applies the inverse DCT-16 to `coeffs` (length 16), returning the
/// residual scale factors in the time-like (band) domain.
pub fn idct16(coeffs: &[f32; SCF_COUNT]) -> [f32; SCF_COUNT] {
    let mut out = [0.0f32; SCF_COUNT];
    for (i, o) in out.iter_mut().enumerate() {
        let mut sum = 0.0f32;
        for j in 0..SCF_COUNT {
            sum += IDCT16[i][j] * coeffs[j];
        }
        *o = sum;
    }
    out
}
