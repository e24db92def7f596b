//! Frame configuration: immutable, derived-once sizing for one stream.
//!
//! Grounded on `symphonia-codec-vorbis`'s identification-header parsing,
//! which derives every per-stream constant once at `try_new` and stores it
//! in a plain struct rather than recomputing it per packet.

use crate::error::{Lc3Error, Result};

/// Frame duration. LC3plus adds 2.5 ms and 5 ms to the two durations
/// (7.5 ms, 10 ms) supported by the Bluetooth LC3 base profile.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum FrameDuration {
    D2_5,
    D5,
    D7_5,
    D10,
}

impl FrameDuration {
    /// Duration in tenths of a millisecond, kept as an integer so that
    /// `ns = dt * sr` is always computed exactly.
    fn tenths_of_ms(self) -> u32 {
        match self {
            FrameDuration::D2_5 => 25,
            FrameDuration::D5 => 50,
            FrameDuration::D7_5 => 75,
            FrameDuration::D10 => 100,
        }
    }

    /// `dt_ordinal` in the LTPF transition-length formula `nt = ns / (1 +
    /// dt_ordinal)` (specification §4.5).
    pub fn ordinal(self) -> u32 {
        match self {
            FrameDuration::D2_5 => 0,
            FrameDuration::D5 => 1,
            FrameDuration::D7_5 => 2,
            FrameDuration::D10 => 3,
        }
    }
}

/// Output sample rate. The high-resolution variants are only constructible
/// when [`HrMode::On`] is selected.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SampleRate {
    Hz8k,
    Hz16k,
    Hz24k,
    Hz32k,
    Hz48k,
    Hz48kHr,
    Hz96kHr,
}

impl SampleRate {
    pub fn hz(self) -> u32 {
        match self {
            SampleRate::Hz8k => 8_000,
            SampleRate::Hz16k => 16_000,
            SampleRate::Hz24k => 24_000,
            SampleRate::Hz32k => 32_000,
            SampleRate::Hz48k => 48_000,
            SampleRate::Hz48kHr => 48_000,
            SampleRate::Hz96kHr => 96_000,
        }
    }

    fn is_hr(self) -> bool {
        matches!(self, SampleRate::Hz48kHr | SampleRate::Hz96kHr)
    }
}

/// High-resolution (LC3plus-HR) mode toggle.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum HrMode {
    Off,
    On,
}

/// Packet-loss concealment strategy.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum PlcMode {
    Off,
    Standard,
    Advanced,
}

/// The maximum payload size in bytes, per specification §6.
const MAX_NBYTES_STANDARD: usize = 400;
const MAX_NBYTES_HR: usize = 625;

/// All sizes derived from `(dt, sr, hrMode)`, computed once.
#[derive(Clone, Copy, Debug)]
pub struct FrameConfig {
    pub dt: FrameDuration,
    pub sr: SampleRate,
    pub hr_mode: HrMode,
    pub plc_mode: PlcMode,
    pub nbytes: usize,
    /// Samples per frame, per channel: `ns = dt * sr`.
    pub ns: usize,
    /// Maximum number of encoded MDCT lines (`ne <= ns`).
    pub ne_max: usize,
    /// MDCT delay-buffer length (`ns/2 + overlap`).
    pub nd: usize,
    /// LTPF history length, 18 ms aligned on `ns`.
    pub nh: usize,
    /// LTPF transition length, `ns / (1 + dt_ordinal)`.
    pub nt: usize,
}

impl FrameConfig {
    /// Fraction of `ns/2` added to the MDCT delay buffer beyond the
    /// 50%-overlap baseline, matching LC3's "low-delay" window (more than
    /// 50% but well under 100% overlap). There is no single named constant
    /// for this ratio in the cited corpus; 1/8 is chosen to keep `nd`
    /// comfortably larger than `ns/2` without approaching `ns`.
    const MDCT_OVERLAP_NUM: usize = 1;
    const MDCT_OVERLAP_DEN: usize = 8;

    /// LTPF history target length in milliseconds before alignment to `ns`.
    const HISTORY_MS_NUM: usize = 18;
    const HISTORY_MS_DEN: usize = 1;

    pub fn new(
        dt: FrameDuration,
        sr: SampleRate,
        hr_mode: HrMode,
        plc_mode: PlcMode,
        nbytes: usize,
    ) -> Result<Self> {
        if sr.is_hr() && hr_mode == HrMode::Off {
            return Err(Lc3Error::InvalidConfig(
                "HR sample rate requires HrMode::On",
            ));
        }

        let max_nbytes = if hr_mode == HrMode::On { MAX_NBYTES_HR } else { MAX_NBYTES_STANDARD };
        if nbytes == 0 || nbytes > max_nbytes {
            return Err(Lc3Error::InvalidConfig("nbytes out of range for configuration"));
        }

        let ns = (sr.hz() as u64 * dt.tenths_of_ms() as u64 / 10_000) as usize;
        if ns == 0 {
            return Err(Lc3Error::InvalidConfig("(dt, sr) combination yields zero-length frame"));
        }

        let ne_max = ns;

        let overlap = (ns / 2 * Self::MDCT_OVERLAP_NUM) / Self::MDCT_OVERLAP_DEN;
        let nd = ns / 2 + overlap;

        let history_samples =
            sr.hz() as usize * Self::HISTORY_MS_NUM / (1000 * Self::HISTORY_MS_DEN);
        let nh = history_samples.div_ceil(ns) * ns;

        let nt = ns / (1 + dt.ordinal() as usize);

        log::debug!(
            "lc3-core: configured dt={:?} sr={:?} hr={:?} plc={:?} nbytes={} ns={} nd={} nh={} nt={}",
            dt, sr, hr_mode, plc_mode, nbytes, ns, nd, nh, nt
        );

        Ok(FrameConfig { dt, sr, hr_mode, plc_mode, nbytes, ns, ne_max, nd, nh, nt })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ns_matches_dt_times_sr() {
        let cfg = FrameConfig::new(FrameDuration::D10, SampleRate::Hz48k, HrMode::Off, PlcMode::Standard, 100)
            .unwrap();
        assert_eq!(cfg.ns, 480);
    }

    #[test]
    fn small_frame_sizes() {
        let cfg = FrameConfig::new(FrameDuration::D2_5, SampleRate::Hz8k, HrMode::Off, PlcMode::Off, 20)
            .unwrap();
        assert_eq!(cfg.ns, 20);
    }

    #[test]
    fn rejects_oversized_payload() {
        let err = FrameConfig::new(FrameDuration::D10, SampleRate::Hz48k, HrMode::Off, PlcMode::Off, 401);
        assert!(matches!(err, Err(Lc3Error::InvalidConfig(_))));
    }

    #[test]
    fn rejects_hr_rate_without_hr_mode() {
        let err = FrameConfig::new(FrameDuration::D10, SampleRate::Hz96kHr, HrMode::Off, PlcMode::Off, 100);
        assert!(matches!(err, Err(Lc3Error::InvalidConfig(_))));
    }

    #[test]
    fn history_is_aligned_on_ns() {
        let cfg = FrameConfig::new(FrameDuration::D10, SampleRate::Hz48k, HrMode::Off, PlcMode::Standard, 100)
            .unwrap();
        assert_eq!(cfg.nh % cfg.ns, 0);
        assert!(cfg.nh >= 18 * 48); // at least 18ms worth of samples
    }
}
