//! Byte-layout-only readers for the two framing conventions a caller
//! typically wraps this crate's frame decoder in: the LC3 binary header
//! (specification §6) and the G.192 bitstream-test-vector envelope. These
//! are thin structural views, not an I/O layer: they borrow from a caller-
//! supplied byte slice and own nothing.
//!
//! Grounded on `ebarnard-alac.rs::caf`/`::mp4`'s pattern of a small struct
//! that parses a fixed header out of a borrowed buffer and returns plain
//! fields, with no internal read/seek state of its own.

use crate::error::Lc3Error;

const LC3_MAGIC: u16 = 0xCC1C;
const MIN_HEADER_SIZE: u16 = 18;

fn read_u16(buf: &[u8], offset: usize) -> Option<u16> {
    buf.get(offset..offset + 2).map(|b| u16::from_le_bytes([b[0], b[1]]))
}

/// A parsed view over an LC3 binary file header (specification §6). Does
/// not itself iterate the data section's `(nBytes, bytes)` frame records;
/// `Lc3HeaderView::header_len` tells the caller where they start.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Lc3HeaderView {
    pub header_len: u16,
    pub sr_hz: u32,
    pub bitrate_bps: u32,
    pub channels: u16,
    pub frame_us: u32,
    pub ep_mode: u16,
    pub num_samples: u32,
    pub hr_mode: bool,
}

impl Lc3HeaderView {
    /// Parses the fixed 18-byte prefix and, when `headerSize > 18`, the
    /// trailing `hrMode` word.
    pub fn parse(buf: &[u8]) -> Result<Lc3HeaderView, Lc3Error> {
        let magic = read_u16(buf, 0).ok_or(Lc3Error::InvalidConfig("header shorter than magic field"))?;
        if magic != LC3_MAGIC {
            return Err(Lc3Error::InvalidConfig("missing LC3 container magic"));
        }

        let header_len =
            read_u16(buf, 2).ok_or(Lc3Error::InvalidConfig("header shorter than headerSize field"))?;
        if header_len < MIN_HEADER_SIZE {
            return Err(Lc3Error::InvalidConfig("headerSize below the minimum fixed layout"));
        }

        let sr_field = read_u16(buf, 4).ok_or(Lc3Error::InvalidConfig("header truncated at sr field"))?;
        let br_field = read_u16(buf, 6).ok_or(Lc3Error::InvalidConfig("header truncated at br field"))?;
        let channels = read_u16(buf, 8).ok_or(Lc3Error::InvalidConfig("header truncated at channels field"))?;
        let frame_field =
            read_u16(buf, 10).ok_or(Lc3Error::InvalidConfig("header truncated at frame_us field"))?;
        let ep_mode = read_u16(buf, 12).ok_or(Lc3Error::InvalidConfig("header truncated at epMode field"))?;
        let samples_low =
            read_u16(buf, 14).ok_or(Lc3Error::InvalidConfig("header truncated at nSamplesLow field"))?;
        let samples_high =
            read_u16(buf, 16).ok_or(Lc3Error::InvalidConfig("header truncated at nSamplesHigh field"))?;

        if ep_mode != 0 {
            return Err(Lc3Error::InvalidConfig("error-protection mode is not supported by this core"));
        }

        let hr_mode = if header_len > MIN_HEADER_SIZE {
            let raw = read_u16(buf, MIN_HEADER_SIZE as usize)
                .ok_or(Lc3Error::InvalidConfig("headerSize promises an hrMode word the buffer lacks"))?;
            raw != 0
        }
        else {
            false
        };

        Ok(Lc3HeaderView {
            header_len,
            sr_hz: u32::from(sr_field) * 100,
            bitrate_bps: u32::from(br_field) * 100,
            channels,
            frame_us: u32::from(frame_field) * 10,
            ep_mode,
            num_samples: (u32::from(samples_high) << 16) | u32::from(samples_low),
            hr_mode,
        })
    }
}

/// One G.192 frame indicator word.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum G192FrameIndicator {
    Good,
    Bad,
    /// "Redundancy" (`bfiExt = 3` in the reference encoding). Per the
    /// resolved open question in `DESIGN.md`, this core treats it the same
    /// as `Bad` for concealment purposes, since it has no partial-data
    /// concealment path of its own, and logs the coarsening at debug level.
    Redundancy,
}

impl G192FrameIndicator {
    const GOOD: u16 = 0x6B21;
    const BAD: u16 = 0x6B20;
    const REDUNDANCY: u16 = 0x6B22;

    pub fn from_word(word: u16) -> Option<G192FrameIndicator> {
        match word {
            Self::GOOD => Some(G192FrameIndicator::Good),
            Self::BAD => Some(G192FrameIndicator::Bad),
            Self::REDUNDANCY => Some(G192FrameIndicator::Redundancy),
            _ => None,
        }
    }

    /// Whether the orchestrator should treat this indicator as a bad
    /// frame requiring concealment.
    pub fn is_bad(self) -> bool {
        match self {
            G192FrameIndicator::Good => false,
            G192FrameIndicator::Bad => true,
            G192FrameIndicator::Redundancy => {
                log::debug!("lc3-core: G.192 redundancy indicator coarsened to bad-frame");
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&LC3_MAGIC.to_le_bytes());
        buf.extend_from_slice(&18u16.to_le_bytes()); // headerSize
        buf.extend_from_slice(&480u16.to_le_bytes()); // sr_hz/100 -> 48000
        buf.extend_from_slice(&1000u16.to_le_bytes()); // br_bps/100 -> 100000
        buf.extend_from_slice(&1u16.to_le_bytes()); // channels
        buf.extend_from_slice(&100u16.to_le_bytes()); // frame_us/10 -> 1000
        buf.extend_from_slice(&0u16.to_le_bytes()); // epMode
        buf.extend_from_slice(&48000u16.to_le_bytes()); // nSamplesLow
        buf.extend_from_slice(&0u16.to_le_bytes()); // nSamplesHigh
        buf
    }

    #[test]
    fn parses_minimal_fixed_header() {
        let buf = sample_header();
        let header = Lc3HeaderView::parse(&buf).unwrap();
        assert_eq!(header.sr_hz, 48_000);
        assert_eq!(header.bitrate_bps, 100_000);
        assert_eq!(header.channels, 1);
        assert_eq!(header.frame_us, 1_000);
        assert_eq!(header.num_samples, 48_000);
        assert!(!header.hr_mode);
    }

    #[test]
    fn rejects_wrong_magic() {
        let mut buf = sample_header();
        buf[0] = 0x00;
        assert!(Lc3HeaderView::parse(&buf).is_err());
    }

    #[test]
    fn parses_extended_header_hr_flag() {
        let mut buf = sample_header();
        buf[2..4].copy_from_slice(&20u16.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes());
        let header = Lc3HeaderView::parse(&buf).unwrap();
        assert!(header.hr_mode);
    }

    #[test]
    fn g192_redundancy_is_coarsened_to_bad() {
        let indicator = G192FrameIndicator::from_word(0x6B22).unwrap();
        assert!(indicator.is_bad());
    }

    #[test]
    fn g192_good_is_not_bad() {
        let indicator = G192FrameIndicator::from_word(0x6B21).unwrap();
        assert!(!indicator.is_bad());
    }

    #[test]
    fn unrecognised_word_is_none() {
        assert!(G192FrameIndicator::from_word(0x1234).is_none());
    }
}
