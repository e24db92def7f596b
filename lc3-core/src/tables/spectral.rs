//! Spectral-line arithmetic-coding tables: the pair-magnitude alphabet and
//! its per-context cumulative-frequency models.
//!
//! NOTE: as with the SNS and LTPF tables, the real per-context probability
//! tables are ETSI TS 103 634-trained constants not reproduced here (not
//! present in the retrieved corpus); `CONTEXT_MODELS` below is generated
//! from a documented geometric-decay formula that gives each context a
//! valid, monotonically increasing cumulative-frequency table summing to
//! [`crate::bits`]'s `AC_TOTAL`, with higher contexts favouring larger
//! magnitude pairs — see `DESIGN.md`.

use once_cell::sync::Lazy;

/// Number of plain (non-escape) pair-magnitude symbols, plus one escape
/// symbol, for 17 total intervals — the maximum [`crate::bits::AcModel`]
/// supports.
pub const NUM_CONTEXTS: usize = 4;
pub const ESCAPE_SYMBOL: u8 = 16;

/// `PAIR_TABLE[symbol] = (a, b)`, the two line magnitudes (each `0..=3`)
/// a non-escape symbol decodes to.
pub static PAIR_TABLE: [(u8, u8); 16] = [
    (0, 0),
    (0, 1),
    (1, 0),
    (1, 1),
    (0, 2),
    (2, 0),
    (1, 2),
    (2, 1),
    (2, 2),
    (0, 3),
    (3, 0),
    (1, 3),
    (3, 1),
    (2, 3),
    (3, 2),
    (3, 3),
];

const AC_TOTAL: u32 = 1 << 10;

/// `CONTEXT_MODELS[ctx]` is an 18-entry cumulative-frequency table (17
/// intervals: 16 pair symbols plus the escape symbol), one per context.
pub static CONTEXT_MODELS: Lazy<Vec<[u16; 18]>> = Lazy::new(|| {
    (0..NUM_CONTEXTS)
        .map(|ctx| {
            let shift = ctx as f32;
            let mut weights = [0.0f32; 17];
            for (s, w) in weights.iter_mut().enumerate().take(16) {
                let (a, b) = PAIR_TABLE[s];
                let total_mag = f32::from(a + b);
                // Higher contexts flatten the distribution toward larger
                // magnitudes; lower contexts strongly favour (0, 0).
                *w = (-(total_mag - shift * 0.5).abs()).exp().max(1e-4);
            }
            weights[16] = 0.02;

            let sum: f32 = weights.iter().sum();
            let mut cum = [0u16; 18];
            let mut acc = 0u32;
            for (s, w) in weights.iter().enumerate() {
                acc += ((w / sum) * AC_TOTAL as f32) as u32;
                cum[s + 1] = acc.min(AC_TOTAL - (16 - s as u32)) as u16;
            }
            // Guarantee strict monotonicity and an exact AC_TOTAL endpoint,
            // since rounding above can leave gaps or overshoot.
            for s in 1..18 {
                if cum[s] <= cum[s - 1] {
                    cum[s] = cum[s - 1] + 1;
                }
            }
            cum[17] = AC_TOTAL as u16;
            cum
        })
        .collect()
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_context_model_sums_to_ac_total() {
        for model in CONTEXT_MODELS.iter() {
            assert_eq!(model[0], 0);
            assert_eq!(model[17], AC_TOTAL as u16);
            for w in model.windows(2) {
                assert!(w[1] > w[0]);
            }
        }
    }

    #[test]
    fn pair_table_magnitudes_bounded() {
        for &(a, b) in PAIR_TABLE.iter() {
            assert!(a <= 3 && b <= 3);
        }
    }
}
