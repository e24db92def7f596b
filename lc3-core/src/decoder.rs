//! The per-channel frame orchestrator (specification §4.8): reads header
//! fields in bitstream order (bandwidth, SNS, TNS, LTPF, spectrum), then
//! runs synthesis in the reverse order (spectrum → TNS → SNS → IMDCT →
//! LTPF), diverting to packet-loss concealment when any read left the
//! bitstream in an error state.
//!
//! Grounded on `symphonia-codec-vorbis::dsp::Dsp`'s per-packet `decode()`
//! entry point (validate bounds, then drive each DSP stage in a fixed
//! order against `DspChannel` state) and, for construction-time
//! validation, the `try_new` idiom of `symphonia_core::codecs::Decoder`
//! (this crate does not implement that trait directly, since the
//! container/format-registry plumbing it assumes is out of scope).

use crate::bits::BitReader;
use crate::bwdet;
use crate::config::{FrameConfig, FrameDuration};
use crate::error::{BadFrameReason, Lc3Error, Result};
use crate::ltpf;
use crate::mdct::imdct;
use crate::sns;
use crate::spectral;
use crate::state::ChannelState;
use crate::tables::band_edges::Bandwidth;
use crate::tns;

/// Per-frame, per-channel diagnostics returned alongside the decoded
/// samples. A `bad_frame` of `Some(..)` means the samples were produced by
/// concealment, not by decoding this frame's payload.
#[derive(Clone, Copy, Debug)]
pub struct FrameReport {
    pub bandwidth: Bandwidth,
    pub bad_frame: Option<BadFrameReason>,
    pub ltpf_active: bool,
}

/// A per-stream decoder: one [`FrameConfig`] plus one [`ChannelState`] per
/// channel, decoded independently and in per-channel frame order.
pub struct Lc3Decoder {
    cfg: FrameConfig,
    channels: Vec<ChannelState>,
}

impl Lc3Decoder {
    pub fn new(cfg: FrameConfig, num_channels: usize) -> Result<Self> {
        if num_channels == 0 {
            return Err(Lc3Error::InvalidConfig("num_channels must be at least 1"));
        }
        let channels = (0..num_channels).map(|_| ChannelState::new(&cfg)).collect();
        log::debug!("lc3-core: decoder created for {num_channels} channel(s)");
        Ok(Lc3Decoder { cfg, channels })
    }

    pub fn config(&self) -> &FrameConfig {
        &self.cfg
    }

    /// Decodes one frame's payload for `channel`, mutating that channel's
    /// persistent state. Always returns `ns` samples; a corrupt frame is
    /// reported via `FrameReport::bad_frame` rather than an `Err`.
    pub fn decode_frame(&mut self, channel: usize, payload: &[u8]) -> Result<(Vec<f32>, FrameReport)> {
        let state = self
            .channels
            .get_mut(channel)
            .ok_or(Lc3Error::InvalidConfig("channel index out of range"))?;

        let mut bits = BitReader::new(payload);

        let bw_result = bwdet::read_bandwidth(&mut bits, self.cfg.sr, self.cfg.hr_mode == crate::config::HrMode::On);
        let sns_result = sns::read_and_reconstruct(&mut bits);

        let short_frame = matches!(self.cfg.dt, FrameDuration::D2_5 | FrameDuration::D5);
        let num_filters =
            if !short_frame && bw_result.bandwidth >= Bandwidth::Swb { 2 } else { 1 };
        let tns_result = tns::read(&mut bits, num_filters, short_frame);

        let (ltpf_params, ltpf_read_err) = ltpf::read(&mut bits);
        let global_gain = spectral::read_global_gain(&mut bits);

        let ne = Bandwidth::coded_lines(bw_result.bandwidth, self.cfg.ns, self.cfg.sr.hz()).min(self.cfg.ne_max);
        let spectral_result = spectral::decode(&mut bits, ne, global_gain);

        let combined_error = bw_result
            .overrun
            .or(sns_result.error)
            .or(tns_result.error)
            .or(ltpf_read_err)
            .or(spectral_result.error)
            .or(bits.check_error());

        let mut lines = vec![0.0f32; self.cfg.ne_max];
        if let Some(reason) = combined_error {
            let concealed = state.plc.conceal();
            let n = lines.len().min(concealed.len());
            lines[..n].copy_from_slice(&concealed[..n]);
        }
        else {
            let n = lines.len().min(spectral_result.lines.len());
            lines[..n].copy_from_slice(&spectral_result.lines[..n]);
            state.plc.on_good_frame(&lines);
        }

        apply_tns_synthesis(&tns_result, &mut lines);
        sns::apply_scale_factors(&mut lines, &sns_result.scf);

        let scale = 1.0 / (self.cfg.ns as f32).sqrt();
        let mut windowed = imdct::transform(&lines, scale);
        let overlap = self.cfg.nd.saturating_sub(self.cfg.ns / 2);
        imdct::window(&mut windowed, overlap);
        let mut samples = imdct::overlap_add(&windowed, &mut state.mdct_delay);

        let ltpf_err = state.ltpf.synthesize(&ltpf_params, &mut samples);

        let report = FrameReport {
            bandwidth: bw_result.bandwidth,
            bad_frame: combined_error.or(ltpf_err),
            ltpf_active: ltpf_params.active,
        };

        Ok((samples, report))
    }
}

/// Applies each TNS filter to its contiguous sub-band of `lines` (one
/// band when `tns_result.num_filters == 1`, the lower and upper halves
/// when `2`).
fn apply_tns_synthesis(tns_result: &tns::TnsResult, lines: &mut [f32]) {
    if tns_result.num_filters == 0 {
        return;
    }
    if tns_result.num_filters == 1 {
        tns::synthesize(&tns_result.filters[0], lines);
        return;
    }
    let mid = lines.len() / 2;
    let (lo, hi) = lines.split_at_mut(mid);
    tns::synthesize(&tns_result.filters[0], lo);
    tns::synthesize(&tns_result.filters[1], hi);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HrMode, PlcMode, SampleRate};

    fn test_decoder() -> Lc3Decoder {
        let cfg = FrameConfig::new(FrameDuration::D10, SampleRate::Hz48k, HrMode::Off, PlcMode::Standard, 100)
            .unwrap();
        Lc3Decoder::new(cfg, 1).unwrap()
    }

    #[test]
    fn decode_frame_always_returns_ns_samples() {
        let mut decoder = test_decoder();
        let payload = vec![0x42u8; 100];
        let (samples, _report) = decoder.decode_frame(0, &payload).unwrap();
        assert_eq!(samples.len(), decoder.config().ns);
    }

    #[test]
    fn decode_frame_rejects_out_of_range_channel() {
        let mut decoder = test_decoder();
        let payload = vec![0u8; 100];
        assert!(decoder.decode_frame(3, &payload).is_err());
    }

    #[test]
    fn starved_payload_is_reported_as_bad_frame_and_still_produces_samples() {
        let mut decoder = test_decoder();
        let payload = vec![0u8; 3]; // far too short to carry a real frame
        let (samples, report) = decoder.decode_frame(0, &payload).unwrap();
        assert_eq!(samples.len(), decoder.config().ns);
        assert!(report.bad_frame.is_some());
    }

    #[test]
    fn repeated_decodes_do_not_panic_and_stay_finite() {
        let mut decoder = test_decoder();
        let payload = vec![0x77u8; 100];
        for _ in 0..5 {
            let (samples, _) = decoder.decode_frame(0, &payload).unwrap();
            assert!(samples.iter().all(|v| v.is_finite()));
        }
    }
}
