//! Dual-ended bitstream reader: a 24-bit range (arithmetic) decoder growing
//! from the head of the frame, and a plain bit-unpacker growing from the
//! tail, converging on a shared byte slice.
//!
//! Grounded on `symphonia_core::io::bit::{BitReaderLtr, BitReaderRtl}`'s
//! borrowed-slice, cursor-based reader shape, and
//! `symphonia-codec-opus::range::Decoder`'s `(val, rng)` state/renormalise
//! loop — adapted here to LC3's 24-bit, 1024-unit-total range coder
//! instead of Opus's 8-bit range coder.

use crate::error::{BadFrameReason, Lc3Error};

/// Total probability mass used by LC3's arithmetic coder: 10 bits of
/// cumulative-frequency precision (specification §4.1).
const AC_TOTAL_BITS: u32 = 10;
const AC_TOTAL: u32 = 1 << AC_TOTAL_BITS;

/// An arithmetic-coding probability model: an ordered set of (at most 17)
/// intervals whose widths sum to [`AC_TOTAL`], represented as cumulative
/// lower bounds. `cum[0] == 0` and `cum[cum.len() - 1] == AC_TOTAL`.
#[derive(Clone, Copy)]
pub struct AcModel<'a> {
    pub cum: &'a [u16],
}

impl<'a> AcModel<'a> {
    pub const fn new(cum: &'a [u16]) -> Self {
        AcModel { cum }
    }

    #[inline]
    fn symbol_count(&self) -> usize {
        self.cum.len() - 1
    }

    /// Finds `k` such that `cum[k] <= scaled < cum[k + 1]`.
    ///
    /// Implemented as a binary search, which for this table's fixed size of
    /// up to 17 intervals performs the same number of comparisons as the
    /// 5-step dyadic subtract sequence around pivot 16 described in the
    /// specification.
    fn find(&self, scaled: u32) -> usize {
        debug_assert!(scaled < AC_TOTAL);
        match self.cum.binary_search(&(scaled as u16)) {
            Ok(k) => k,
            Err(k) => k - 1,
        }
    }
}

/// The dual-ended bit reader owning one frame's byte slice.
pub struct BitReader<'a> {
    buf: &'a [u8],
    /// Next unread byte index for the arithmetic coder, growing toward the
    /// tail.
    p_fw: usize,
    /// Next unread byte index (exclusive upper bound) for plain bits,
    /// shrinking toward the head.
    p_bw: usize,
    /// Plain-bit accumulator, LSB-aligned.
    bw_acc: u32,
    bw_acc_bits: u32,
    /// Arithmetic coder state.
    low: u32,
    range: u32,
    error: Option<BadFrameReason>,
}

impl<'a> BitReader<'a> {
    /// `RANGE_TOP` is the initial (maximum) value of `range`: a 24-bit
    /// field initialised to all ones.
    const RANGE_TOP: u32 = 0x00FF_FFFF;
    const RANGE_RENORM_THRESHOLD: u32 = 0x0001_0000;

    pub fn new(buf: &'a [u8]) -> Self {
        let mut reader = BitReader {
            buf,
            p_fw: 0,
            p_bw: buf.len(),
            bw_acc: 0,
            bw_acc_bits: 0,
            low: 0,
            range: Self::RANGE_TOP,
            error: None,
        };
        // Prime the arithmetic decoder with its initial 24-bit window.
        for _ in 0..3 {
            let byte = reader.next_fw_byte();
            reader.low = (reader.low << 8) | u32::from(byte);
        }
        reader
    }

    fn next_fw_byte(&mut self) -> u8 {
        if self.p_fw >= self.p_bw {
            self.error.get_or_insert(BadFrameReason::BitBudget);
            return 0;
        }
        let byte = self.buf[self.p_fw];
        self.p_fw += 1;
        byte
    }

    /// Reads a single plain bit, tail-first.
    pub fn get_bit(&mut self) -> u32 {
        self.get_bits(1)
    }

    /// Reads `n` (1..=32) plain bits, tail-first, growing toward the head.
    pub fn get_bits(&mut self, n: u32) -> u32 {
        debug_assert!((1..=32).contains(&n));
        while self.bw_acc_bits < n {
            if self.p_bw <= self.p_fw {
                self.error.get_or_insert(BadFrameReason::BitBudget);
                // Starve the accumulator with zero bits rather than reading
                // out of bounds; the error flag is what the orchestrator
                // checks.
                self.bw_acc_bits = n;
                break;
            }
            self.p_bw -= 1;
            let byte = self.buf[self.p_bw];
            self.bw_acc |= u32::from(byte) << self.bw_acc_bits;
            self.bw_acc_bits += 8;
        }
        let mask = if n == 32 { u32::MAX } else { (1u32 << n) - 1 };
        let value = self.bw_acc & mask;
        self.bw_acc >>= n;
        self.bw_acc_bits -= n;
        value
    }

    /// Decodes one symbol using `model`, LC3's 24-bit range coder.
    ///
    /// On a malformed state (`low >= r * AC_TOTAL`) the symbol is forced to
    /// `0` and the error flag is set, per specification §4.1.
    pub fn get_symbol(&mut self, model: AcModel<'_>) -> u8 {
        if self.error.is_some() {
            return 0;
        }

        let r = (self.range >> AC_TOTAL_BITS) & 0xFFFF;
        if r == 0 || self.low >= r * AC_TOTAL {
            self.error.get_or_insert(BadFrameReason::ArithmeticCoder);
            return 0;
        }

        let scaled = self.low / r;
        let k = model.find(scaled);
        debug_assert!(k < model.symbol_count());

        let cum_low = u32::from(model.cum[k]);
        let cum_high = u32::from(model.cum[k + 1]);

        self.low -= r * cum_low;
        self.range = r * (cum_high - cum_low);
        self.normalize();

        k as u8
    }

    fn normalize(&mut self) {
        while self.range < Self::RANGE_RENORM_THRESHOLD {
            let byte = self.next_fw_byte();
            self.low = ((self.low << 8) | u32::from(byte)) & 0x00FF_FFFF;
            self.range <<= 8;
        }
    }

    /// Remaining unread bits between the two cursors.
    pub fn bits_left(&self) -> usize {
        if self.p_bw <= self.p_fw {
            self.bw_acc_bits as usize
        }
        else {
            (self.p_bw - self.p_fw) * 8 + self.bw_acc_bits as usize
        }
    }

    /// Returns the first error encountered so far, if any.
    pub fn check_error(&self) -> Option<BadFrameReason> {
        self.error
    }

    /// Converts an internal error (if any) into an `Lc3Error`, for callers
    /// that want a `Result` rather than the orchestrator's PLC-diverting
    /// behaviour.
    pub fn into_result(self) -> Result<(), Lc3Error> {
        match self.error {
            Some(reason) => Err(Lc3Error::BadFrame(reason)),
            None => Ok(()),
        }
    }
}
