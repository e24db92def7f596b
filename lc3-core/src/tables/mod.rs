//! Read-only, process-wide tables: band edges, MDCT/FFT support tables,
//! SNS codebooks, TNS sine table, LTPF coefficient banks, and MPVQ
//! combinatorics.
//!
//! All tables here are built once (either as plain `const`/`static` data,
//! or lazily behind `once_cell::sync::Lazy` for anything derived by a
//! formula) and never mutated afterwards, matching the "read-only,
//! process-wide, initialised before the first decode" resource-model
//! requirement (specification §5).

pub mod band_edges;
pub mod ltpf;
pub mod mpvq;
pub mod sns;
pub mod spectral;
pub mod tns;
