//! Pure Rust LC3 / LC3plus per-frame decoder core: the signal-processing
//! pipeline that turns one compressed frame into a block of linear PCM
//! samples for a single channel (bandwidth detection, SNS, TNS, LTPF,
//! spectral decode, IMDCT, and packet-loss concealment).
//!
//! Container parsing, audio I/O, and the encoder are deliberately out of
//! scope; [`container`] exposes only the byte-layout readers a caller
//! needs to frame this core's input.
//!
//! ```no_run
//! use lc3_core::config::{FrameConfig, FrameDuration, HrMode, PlcMode, SampleRate};
//! use lc3_core::decoder::Lc3Decoder;
//!
//! let cfg = FrameConfig::new(FrameDuration::D10, SampleRate::Hz48k, HrMode::Off, PlcMode::Standard, 100)?;
//! let mut decoder = Lc3Decoder::new(cfg, 1)?;
//! let payload = [0u8; 100];
//! let (samples, report) = decoder.decode_frame(0, &payload)?;
//! assert_eq!(samples.len(), 480);
//! assert!(report.bad_frame.is_none());
//! # Ok::<(), lc3_core::error::Lc3Error>(())
//! ```

pub mod bits;
pub mod bwdet;
pub mod config;
pub mod container;
pub mod decoder;
pub mod error;
pub mod fastmath;
pub mod ltpf;
pub mod mdct;
pub mod plc;
pub mod sns;
pub mod spectral;
pub mod state;
pub mod tables;
pub mod tns;

pub use decoder::{FrameReport, Lc3Decoder};
pub use error::{BadFrameReason, Lc3Error, Result};
