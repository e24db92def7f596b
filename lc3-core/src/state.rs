//! Per-channel decoder state: everything that persists across frames.
//!
//! Grounded on `symphonia-codec-vorbis::dsp::{Dsp, DspChannel}`, which owns
//! all per-channel scratch state in one struct allocated once at stream
//! construction and mutated frame-to-frame, rather than reallocating or
//! threading state through free functions.

use crate::config::FrameConfig;
use crate::ltpf::LtpfState;
use crate::plc::PlcState;

/// Persistent, per-channel state: the MDCT overlap-add delay buffer, the
/// LTPF coefficient bank and pitch history, and the PLC fade/LFSR state.
/// Allocated once per channel and zeroed at construction; every
/// [`crate::decoder::Lc3Decoder::decode_frame`] call mutates it in place.
pub struct ChannelState {
    pub mdct_delay: Vec<f32>,
    pub ltpf: LtpfState,
    pub plc: PlcState,
}

impl ChannelState {
    pub fn new(cfg: &FrameConfig) -> Self {
        ChannelState {
            mdct_delay: vec![0.0; cfg.nd],
            ltpf: LtpfState::new(cfg),
            plc: PlcState::new(cfg.ne_max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FrameDuration, HrMode, PlcMode, SampleRate};

    #[test]
    fn delay_buffer_matches_configured_length() {
        let cfg = FrameConfig::new(FrameDuration::D10, SampleRate::Hz48k, HrMode::Off, PlcMode::Standard, 100)
            .unwrap();
        let state = ChannelState::new(&cfg);
        assert_eq!(state.mdct_delay.len(), cfg.nd);
    }
}
