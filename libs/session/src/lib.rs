#![forbid(unsafe_code)]

//! The asynchronous edge of the core: submitting encoded records.
//!
//! Everything before this crate is synchronous; only the network
//! transmission suspends. [`RecordTransport`] is the seam the UI and the
//! tests implement, and [`Autosaver`] drives it on a fixed interval,
//! serialized with explicit saves so no two submits for the same
//! protocol ever overlap.

mod autosave;
mod transport;

pub use autosave::Autosaver;
pub use transport::{RecordTransport, TransportError};
