//! Long-Term Postfilter (specification §4.5): a pitch-synchronous adaptive
//! IIR applied in the time domain after IMDCT synthesis, using a rolling
//! history of previously synthesised samples.
//!
//! Grounded on `symphonia-codec-vorbis::dsp`'s per-channel delay-line state
//! (`DspChannel`, holding an overlap buffer across packets) generalised
//! here to a pitch-lag history ring, and on
//! `symphonia_core::dsp::mdct::Mdct`'s "construct once per stream, reuse
//! every call" lifecycle for the coefficient bank.

use crate::config::{FrameConfig, SampleRate};
use crate::bits::BitReader;
use crate::error::BadFrameReason;
use crate::tables::ltpf::{self, CoeffSet, GAIN_INDICES, PHASES};

/// Bits used to encode the pitch index; wide enough to address the longest
/// history this crate configures (±1 over [`SampleRate::Hz48k`]'s `nh`).
const PITCH_INDEX_BITS: u32 = 9;
const GAIN_INDEX_BITS: u32 = 2;

#[derive(Clone, Copy, Debug, Default)]
pub struct LtpfParams {
    pub active: bool,
    pub pitch_index: u16,
    /// Sample-accurate pitch lag, derived from `pitch_index` via
    /// [`map_pitch_index`].
    pub pitch_lag: u32,
    pub gain_index: u8,
}

/// Reads the LTPF activation flag and, when active, its pitch and gain
/// indices. Activation additionally requires `gain_index < 4`
/// (specification §4.5).
pub fn read(bits: &mut BitReader<'_>) -> (LtpfParams, Option<BadFrameReason>) {
    let active = bits.get_bit() == 1;
    if !active {
        return (LtpfParams::default(), None);
    }

    let pitch_index = bits.get_bits(PITCH_INDEX_BITS) as u16;
    let gain_index = bits.get_bits(GAIN_INDEX_BITS) as u8;
    let pitch_lag = map_pitch_index(u32::from(pitch_index));
    let active = gain_index < GAIN_INDICES as u8;

    (LtpfParams { active, pitch_index, pitch_lag, gain_index }, None)
}

/// Three-range piecewise pitch-index-to-sample-lag mapping (specification
/// §4.5).
fn map_pitch_index(pi: u32) -> u32 {
    if pi >= 440 {
        4 * (pi - 283)
    }
    else if pi >= 380 {
        4 * (pi / 2 - 63) + 2 * (pi & 1)
    }
    else {
        4 * (pi / 4 + 32) + (pi & 3)
    }
}

/// Per-channel LTPF synthesis state: the coefficient bank (built once for
/// this stream's configuration), a rolling history of synthesised output
/// samples, and the previous frame's activation/coefficients needed to
/// drive the four cross-frame transition cases of specification §4.5.
pub struct LtpfState {
    bank: Vec<Vec<CoeffSet>>,
    history: Vec<f32>,
    /// Transition length `nt` (specification §4.5: `ns / (1 + dt_ordinal)`).
    nt: usize,
    prev_active: bool,
    prev_gain_idx: usize,
    prev_phase: usize,
    prev_lag: usize,
}

impl LtpfState {
    pub fn new(cfg: &FrameConfig) -> Self {
        let w = (cfg.ns / 16).max(4);
        LtpfState {
            bank: ltpf::bank(w),
            history: vec![0.0; cfg.nh.max(1)],
            nt: cfg.nt,
            prev_active: false,
            prev_gain_idx: 0,
            prev_phase: 0,
            prev_lag: 0,
        }
    }

    /// Applies the postfilter in place to `samples` (one frame's worth of
    /// time-domain output), driving the documented transition across the
    /// previous frame's activation state, then rolls `samples` into the
    /// history ring.
    ///
    /// - inactive -> active: fades in over `nt` samples with the new
    ///   coefficients, then applies them unchanged for the remainder.
    /// - active -> inactive: fades out over `nt` samples with the
    ///   *previous* coefficients, then leaves the remainder unfiltered.
    /// - active -> active, same pitch: the filter is unchanged across the
    ///   boundary, so the whole frame is filtered steadily.
    /// - active -> active, different pitch: fades out the previous filter
    ///   then fades in the new one, consecutively within `nt`, then
    ///   applies the new filter unchanged for the remainder.
    pub fn synthesize(&mut self, params: &LtpfParams, samples: &mut [f32]) -> Option<BadFrameReason> {
        let mut error = None;
        let n = samples.len();

        if params.active && self.history.is_empty() {
            error = Some(BadFrameReason::LtpfPitchIndex);
        }

        let now_active = params.active && !self.history.is_empty();
        let gain_idx = (params.gain_index as usize).min(GAIN_INDICES - 1);
        let phase = params.pitch_index as usize % PHASES;
        let lag = params.pitch_lag as usize % self.history.len().max(1);
        let nt = self.nt.min(n);

        match (self.prev_active, now_active) {
            (false, false) => {}
            (false, true) => {
                let coeffs = self.bank[gain_idx][phase].clone();
                if nt > 0 {
                    crossfade(&mut self.history, lag, &coeffs, &mut samples[..nt], 0.0, 1.0);
                }
                if nt < n {
                    apply_iir(&mut self.history, lag, &coeffs, &mut samples[nt..]);
                }
            }
            (true, false) => {
                let coeffs = self.bank[self.prev_gain_idx][self.prev_phase].clone();
                if nt > 0 {
                    crossfade(&mut self.history, self.prev_lag, &coeffs, &mut samples[..nt], 1.0, 0.0);
                }
                // Remainder of the frame stays unfiltered: the postfilter
                // is now off.
            }
            (true, true) => {
                let same_pitch = self.prev_gain_idx == gain_idx
                    && self.prev_phase == phase
                    && self.prev_lag == lag;
                if same_pitch {
                    let coeffs = self.bank[gain_idx][phase].clone();
                    apply_iir(&mut self.history, lag, &coeffs, samples);
                }
                else {
                    let half = nt / 2;
                    let prev_coeffs = self.bank[self.prev_gain_idx][self.prev_phase].clone();
                    if half > 0 {
                        crossfade(&mut self.history, self.prev_lag, &prev_coeffs, &mut samples[..half], 1.0, 0.0);
                    }
                    let new_coeffs = self.bank[gain_idx][phase].clone();
                    if nt > half {
                        crossfade(&mut self.history, lag, &new_coeffs, &mut samples[half..nt], 0.0, 1.0);
                    }
                    if nt < n {
                        apply_iir(&mut self.history, lag, &new_coeffs, &mut samples[nt..]);
                    }
                }
            }
        }

        self.prev_active = now_active;
        if now_active {
            self.prev_gain_idx = gain_idx;
            self.prev_phase = phase;
            self.prev_lag = lag;
        }

        self.push_history(samples);
        error
    }

    fn push_history(&mut self, samples: &[f32]) {
        let len = self.history.len();
        if len == 0 {
            return;
        }
        if samples.len() >= len {
            self.history.copy_from_slice(&samples[samples.len() - len..]);
        }
        else {
            self.history.rotate_left(samples.len());
            let tail = len - samples.len();
            self.history[tail..].copy_from_slice(samples);
        }
    }
}

/// Applies `coeffs` to a copy of `region` and linearly cross-fades between
/// the dry (unfiltered) and wet (filtered) signal from `from` at the first
/// sample to `to` at the last, writing the blend back into `region` in
/// place. Used for the fade-in/fade-out portions of the transition
/// (specification §4.5); a plain [`apply_iir`] call is used wherever no
/// fade is required.
fn crossfade(history: &mut [f32], lag: usize, coeffs: &CoeffSet, region: &mut [f32], from: f32, to: f32) {
    let dry: Vec<f32> = region.to_vec();
    let mut wet = dry.clone();
    apply_iir(history, lag, coeffs, &mut wet);

    let n = region.len();
    for i in 0..n {
        let t = if n <= 1 { 1.0 } else { i as f32 / (n - 1) as f32 };
        let alpha = from + (to - from) * t;
        region[i] = (1.0 - alpha) * dry[i] + alpha * wet[i];
    }
}

/// A direct-form IIR: `y[n] = sum(num[k] * x[n-k-lag]) - sum(den[k] *
/// y[n-k])`, drawing `x` from `history` for negative indices and from
/// `samples` itself for the current frame, with `y` state tracked in
/// `fb_state`.
fn apply_iir(history: &mut [f32], lag: usize, coeffs: &CoeffSet, samples: &mut [f32]) {
    let num = &coeffs.num;
    let den = &coeffs.den;
    let mut fb_state = vec![0.0f32; den.len().saturating_sub(1)];

    for n in 0..samples.len() {
        let mut acc = 0.0f32;
        for (k, &c) in num.iter().enumerate() {
            let idx = n as isize - k as isize - lag as isize;
            let x = sample_at(history, samples, idx);
            acc += c * x;
        }
        for (k, &c) in den.iter().skip(1).enumerate() {
            acc -= c * fb_state[k];
        }
        for k in (1..fb_state.len()).rev() {
            fb_state[k] = fb_state[k - 1];
        }
        if !fb_state.is_empty() {
            fb_state[0] = acc;
        }
        samples[n] = acc;
    }
}

fn sample_at(history: &[f32], current: &[f32], idx: isize) -> f32 {
    if idx >= 0 {
        current.get(idx as usize).copied().unwrap_or(0.0)
    }
    else {
        let back = (-idx) as usize;
        if back <= history.len() {
            history[history.len() - back]
        }
        else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FrameDuration, HrMode, PlcMode};

    fn test_config() -> FrameConfig {
        FrameConfig::new(FrameDuration::D10, SampleRate::Hz48k, HrMode::Off, PlcMode::Standard, 100)
            .unwrap()
    }

    #[test]
    fn inactive_params_leave_samples_unchanged() {
        let cfg = test_config();
        let mut state = LtpfState::new(&cfg);
        let params = LtpfParams::default();
        let mut samples = vec![1.0, 2.0, 3.0];
        let err = state.synthesize(&params, &mut samples);
        assert!(err.is_none());
        assert_eq!(samples, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn active_filter_produces_finite_output() {
        let cfg = test_config();
        let mut state = LtpfState::new(&cfg);
        let params = LtpfParams { active: true, pitch_index: 64, pitch_lag: map_pitch_index(64), gain_index: 1 };
        let mut samples = vec![0.3f32; 480];
        let err = state.synthesize(&params, &mut samples);
        assert!(err.is_none());
        assert!(samples.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn history_rolls_forward_across_frames() {
        let cfg = test_config();
        let mut state = LtpfState::new(&cfg);
        let params = LtpfParams::default();
        let mut first = vec![1.0; cfg.ns];
        state.synthesize(&params, &mut first);
        assert!(state.history.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn pitch_index_mapping_is_piecewise_monotonic() {
        let low = map_pitch_index(100);
        let mid = map_pitch_index(400);
        let high = map_pitch_index(500);
        assert!(low < mid);
        assert!(mid < high);
    }

    #[test]
    fn fade_in_leaves_first_sample_dry() {
        let cfg = test_config();
        let mut state = LtpfState::new(&cfg);
        let params = LtpfParams { active: true, pitch_index: 64, pitch_lag: map_pitch_index(64), gain_index: 1 };
        let mut samples = vec![0.3f32; cfg.ns];
        state.synthesize(&params, &mut samples);
        // Fade-in starts at alpha=0 (fully dry) on the very first sample.
        assert!((samples[0] - 0.3).abs() < 1e-5);
    }

    #[test]
    fn fade_out_on_deactivation_then_silence_after() {
        let cfg = test_config();
        let mut state = LtpfState::new(&cfg);
        let on = LtpfParams { active: true, pitch_index: 64, pitch_lag: map_pitch_index(64), gain_index: 1 };
        let mut samples = vec![0.3f32; cfg.ns];
        state.synthesize(&on, &mut samples);

        let off = LtpfParams::default();
        let mut next = vec![0.3f32; cfg.ns];
        state.synthesize(&off, &mut next);
        // Fade-out starts at alpha=1 (fully wet) and ends at alpha=0 (dry);
        // the remainder past `nt` is untouched.
        assert!(next.iter().all(|v| v.is_finite()));
        assert!((next[cfg.nt..].iter().sum::<f32>() - 0.3 * (cfg.ns - cfg.nt) as f32).abs() < 1e-3);
    }

    #[test]
    fn steady_state_same_pitch_applies_filter_across_whole_frame() {
        let cfg = test_config();
        let mut state = LtpfState::new(&cfg);
        let params = LtpfParams { active: true, pitch_index: 64, pitch_lag: map_pitch_index(64), gain_index: 1 };
        let mut first = vec![0.3f32; cfg.ns];
        state.synthesize(&params, &mut first);
        let mut second = vec![0.3f32; cfg.ns];
        state.synthesize(&params, &mut second);
        assert!(second.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn different_pitch_transition_crossfades_within_nt() {
        let cfg = test_config();
        let mut state = LtpfState::new(&cfg);
        let first_params = LtpfParams { active: true, pitch_index: 64, pitch_lag: map_pitch_index(64), gain_index: 1 };
        let mut first = vec![0.3f32; cfg.ns];
        state.synthesize(&first_params, &mut first);

        let second_params = LtpfParams { active: true, pitch_index: 200, pitch_lag: map_pitch_index(200), gain_index: 2 };
        let mut second = vec![0.3f32; cfg.ns];
        state.synthesize(&second_params, &mut second);
        assert!(second.iter().all(|v| v.is_finite()));
    }
}
