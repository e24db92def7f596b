//! Error types surfaced to callers of [`crate::decoder::Lc3Decoder`].

use std::fmt;

/// Reasons a frame was diverted to packet-loss concealment.
///
/// These are informational: concealment always produces a valid block of
/// samples, so a `BadFrameReason` is never returned as an `Err` on its own
/// (see [`crate::decoder::FrameReport`]).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BadFrameReason {
    /// The arithmetic decoder's range/bit-budget check failed
    /// (`Bits::checkError()` in ETSI TS 103 634).
    ArithmeticCoder,
    /// The forward and backward bit cursors crossed.
    BitBudget,
    /// The decoded bandwidth index exceeds what the configured sample rate
    /// allows.
    BandwidthOverrun,
    /// A TNS reflection-coefficient order was out of the allowed range.
    TnsOrder,
    /// The SNS multiplex code exceeded its validated upper bound.
    SnsMuxCode,
    /// The LTPF pitch index was out of range for the configured rate.
    LtpfPitchIndex,
    /// The frame was marked bad (or "redundancy") by a G.192 envelope.
    ExternalIndicator,
}

impl BadFrameReason {
    fn as_str(&self) -> &'static str {
        match self {
            BadFrameReason::ArithmeticCoder => "arithmetic decoder range/state violation",
            BadFrameReason::BitBudget => "bit cursors crossed before spectrum was fully read",
            BadFrameReason::BandwidthOverrun => "decoded bandwidth exceeds sample-rate maximum",
            BadFrameReason::TnsOrder => "TNS reflection-coefficient order out of range",
            BadFrameReason::SnsMuxCode => "SNS multiplex code out of range",
            BadFrameReason::LtpfPitchIndex => "LTPF pitch index out of range",
            BadFrameReason::ExternalIndicator => "frame marked bad/redundant by envelope",
        }
    }
}

impl fmt::Display for BadFrameReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The error type for this crate.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Lc3Error {
    /// Construction-time: an unsupported `(dt, sr, nbytes)` combination.
    InvalidConfig(&'static str),
    /// Decode-time: the frame was corrupt and concealment was applied.
    /// Carried for statistics; the caller still receives a full frame of
    /// samples alongside this.
    BadFrame(BadFrameReason),
    /// Container-level: no more frames are available.
    EndOfStream,
}

impl fmt::Display for Lc3Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lc3Error::InvalidConfig(msg) => write!(f, "invalid decoder configuration: {msg}"),
            Lc3Error::BadFrame(reason) => write!(f, "bad frame: {reason}"),
            Lc3Error::EndOfStream => write!(f, "end of stream"),
        }
    }
}

impl std::error::Error for Lc3Error {}

pub type Result<T> = std::result::Result<T, Lc3Error>;
